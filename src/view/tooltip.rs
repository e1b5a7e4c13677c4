use smallvec::SmallVec;

use crate::render::Color;
use crate::view::reconcile::ElementKey;

/// One "label: value" row inside a tooltip body.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipRow {
    pub label: String,
    pub value: String,
    pub accent: Option<Color>,
}

impl TooltipRow {
    #[must_use]
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            accent: None,
        }
    }

    #[must_use]
    pub fn with_accent(mut self, accent: Color) -> Self {
        self.accent = Some(accent);
        self
    }
}

/// Transient overlay anchored near the pointer, owned by exactly one element.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub key: ElementKey,
    pub title: String,
    pub rows: SmallVec<[TooltipRow; 4]>,
    pub x: f64,
    pub y: f64,
}

/// Single-slot tooltip holder.
///
/// A view never has more than one tooltip alive: showing a new one replaces
/// the old, and render passes drop the tooltip when its owning element exits.
#[derive(Debug, Clone, Default)]
pub struct TooltipState {
    active: Option<Tooltip>,
}

impl TooltipState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<&Tooltip> {
        self.active.as_ref()
    }

    pub fn show(&mut self, tooltip: Tooltip) {
        self.active = Some(tooltip);
    }

    pub fn hide(&mut self) {
        self.active = None;
    }

    /// Drops the tooltip unless its owning element is still alive.
    pub fn retain_if_alive(&mut self, is_alive: impl Fn(ElementKey) -> bool) {
        if let Some(tooltip) = &self.active {
            if !is_alive(tooltip.key) {
                self.active = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::{Tooltip, TooltipState};
    use crate::core::Month;
    use crate::view::reconcile::ElementKey;

    fn tooltip(year: i32) -> Tooltip {
        Tooltip {
            key: ElementKey::Cell {
                year,
                month: Month::January,
            },
            title: format!("January {year}"),
            rows: smallvec![],
            x: 10.0,
            y: 20.0,
        }
    }

    #[test]
    fn showing_a_second_tooltip_replaces_the_first() {
        let mut state = TooltipState::new();
        state.show(tooltip(2019));
        state.show(tooltip(2020));

        let active = state.active().expect("tooltip alive");
        assert_eq!(active.title, "January 2020");
    }

    #[test]
    fn retain_drops_tooltips_of_exited_elements() {
        let mut state = TooltipState::new();
        state.show(tooltip(2019));

        state.retain_if_alive(|_| true);
        assert!(state.active().is_some());

        state.retain_if_alive(|_| false);
        assert!(state.active().is_none());
    }
}
