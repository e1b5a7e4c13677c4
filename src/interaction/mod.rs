//! Interaction state machines: the brush drag and the resize debouncer.
//!
//! Both are deterministic: the drag advances on explicit pointer calls and
//! the debouncer on explicit timestamps from the host event loop, so every
//! scheduling edge is unit-testable without timers.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Pointer modifier selecting the drill-down slicing axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DrilldownModifier {
    /// Slice the clicked month across years.
    #[default]
    None,
    /// Slice the clicked year across months.
    Alternate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Idle,
    Dragging { anchor_px: f64, current_px: f64 },
}

/// Horizontal range-selection drag over the brush strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushDrag {
    phase: DragPhase,
}

impl Default for BrushDrag {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushDrag {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: DragPhase::Idle,
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Current (anchor, cursor) selection in pixels, while dragging.
    #[must_use]
    pub fn selection_px(&self) -> Option<(f64, f64)> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging {
                anchor_px,
                current_px,
            } => Some((anchor_px, current_px)),
        }
    }

    /// Anchors a new selection; an in-flight drag restarts at the new anchor.
    pub fn on_start(&mut self, x: f64) {
        self.phase = DragPhase::Dragging {
            anchor_px: x,
            current_px: x,
        };
    }

    /// Extends the selection; returns the live bounds, or `None` when no
    /// drag is active (stray move events are ignored).
    pub fn on_move(&mut self, x: f64) -> Option<(f64, f64)> {
        match &mut self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { current_px, .. } => {
                *current_px = x;
                self.selection_px()
            }
        }
    }

    /// Finishes the drag, returning the final selection bounds.
    pub fn on_end(&mut self) -> Option<(f64, f64)> {
        let selection = self.selection_px();
        self.phase = DragPhase::Idle;
        selection
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingResize {
    width: f64,
    due: Instant,
}

/// Debounced window-resize gate.
///
/// Scheduling replaces any pending timer (last-write-wins); the timer fires
/// at most once per debounce window, and sub-threshold width deltas are
/// swallowed so continuous resize events cannot cause a redraw storm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeDebouncer {
    delay: Duration,
    noise_threshold_px: f64,
    applied_width: f64,
    pending: Option<PendingResize>,
}

impl ResizeDebouncer {
    #[must_use]
    pub fn new(delay: Duration, noise_threshold_px: f64, initial_width: f64) -> Self {
        Self {
            delay,
            noise_threshold_px,
            applied_width: initial_width,
            pending: None,
        }
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Width that last passed the noise gate.
    #[must_use]
    pub fn applied_width(&self) -> f64 {
        self.applied_width
    }

    /// Schedules a relayout for `width`, replacing any pending schedule.
    pub fn observe(&mut self, width: f64, now: Instant) {
        self.pending = Some(PendingResize {
            width,
            due: now + self.delay,
        });
    }

    /// Fires the pending timer once it is due. Returns the new width when
    /// the delta against the last applied width exceeds the noise threshold.
    pub fn fire_due(&mut self, now: Instant) -> Option<f64> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        if (pending.width - self.applied_width).abs() <= self.noise_threshold_px {
            return None;
        }
        self.applied_width = pending.width;
        Some(pending.width)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{BrushDrag, ResizeDebouncer};

    #[test]
    fn drag_tracks_anchor_and_cursor() {
        let mut drag = BrushDrag::new();
        assert!(drag.on_move(50.0).is_none());

        drag.on_start(10.0);
        assert_eq!(drag.on_move(42.0), Some((10.0, 42.0)));
        assert_eq!(drag.on_end(), Some((10.0, 42.0)));
        assert!(!drag.is_dragging());
        assert!(drag.on_end().is_none());
    }

    #[test]
    fn debounce_is_last_write_wins() {
        let start = Instant::now();
        let mut debounce = ResizeDebouncer::new(Duration::from_millis(250), 50.0, 1000.0);

        debounce.observe(1100.0, start);
        debounce.observe(1300.0, start + Duration::from_millis(100));

        // The first schedule was replaced, so nothing is due at its deadline.
        assert_eq!(debounce.fire_due(start + Duration::from_millis(260)), None);
        assert_eq!(
            debounce.fire_due(start + Duration::from_millis(360)),
            Some(1300.0)
        );
        assert!(!debounce.has_pending());
    }

    #[test]
    fn sub_threshold_deltas_are_swallowed() {
        let start = Instant::now();
        let mut debounce = ResizeDebouncer::new(Duration::from_millis(250), 50.0, 1000.0);

        debounce.observe(1040.0, start);
        assert_eq!(debounce.fire_due(start + Duration::from_millis(300)), None);
        assert_eq!(debounce.applied_width(), 1000.0);
    }
}
