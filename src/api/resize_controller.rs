use std::time::Instant;

use tracing::debug;

use crate::error::DashboardResult;
use crate::render::Renderer;
use crate::view::ChartView;

use super::{DashboardEngine, ViewMeasures};

impl<R: Renderer> DashboardEngine<R> {
    /// Records a window resize. Scheduling is debounced last-write-wins: a
    /// newer observation replaces any pending one, and nothing redraws until
    /// the debounce window elapses.
    pub fn observe_resize(&mut self, measures: ViewMeasures, viewport_width: f64, now: Instant) {
        self.pending_measures = Some(measures);
        self.resize.observe(viewport_width, now);
    }

    /// Fires the pending resize once due. Sub-threshold width deltas are
    /// swallowed. A real resize relayouts every view (scales and label
    /// positions move) and re-renders; display data is not re-derived.
    /// Returns whether a relayout happened.
    pub fn fire_due_resize(&mut self, now: Instant) -> DashboardResult<bool> {
        let Some(width) = self.resize.fire_due(now) else {
            if !self.resize.has_pending() {
                self.pending_measures = None;
            }
            return Ok(false);
        };

        let measures = self.pending_measures.take().unwrap_or(self.measures);
        self.measures = measures;
        debug!(width, "applying debounced resize");

        self.heatmap.relayout(&measures.heatmap)?;
        self.bar.relayout(&measures.bar)?;
        self.line.relayout(&measures.line)?;
        self.brush.relayout(&measures.brush)?;
        self.render_all()?;
        Ok(true)
    }
}
