use tracing::debug;

use crate::core::{Gender, GenderSelection, YearRange};
use crate::error::DashboardResult;
use crate::render::Renderer;
use crate::view::ChartView;

use super::DashboardEngine;

impl<R: Renderer> DashboardEngine<R> {
    /// Sets the shared year range and fans the change out to every view.
    /// Swapped bounds auto-correct; both bounds clamp to the observed span.
    pub fn set_year_range(&mut self, min: i32, max: i32) -> DashboardResult<()> {
        self.filter.set_year_range(min, max);
        let applied = self.filter.year_range();
        debug!(min = applied.min(), max = applied.max(), "set year range");
        self.fan_out()
    }

    /// Toggles one gender category and fans the change out to every view.
    /// Views for which the toggle is irrelevant still re-derive; re-deriving
    /// is cheap at this record count and keeps the update path uniform.
    pub fn set_gender_enabled(&mut self, gender: Gender, enabled: bool) -> DashboardResult<()> {
        self.filter.set_gender_enabled(gender, enabled);
        debug!(gender = gender.label(), enabled, "set gender toggle");
        self.fan_out()
    }

    /// Restores the full observed span and all gender categories, clears the
    /// brush selection visual alongside the state, and fans out.
    pub fn reset_filters(&mut self) -> DashboardResult<()> {
        self.filter.reset();
        self.brush.clear_selection();
        self.heatmap.clear_tooltip();
        self.bar.clear_tooltip();
        self.line.clear_tooltip();
        debug!("reset filters");
        self.fan_out()
    }

    /// Checked state the host mirrors onto its gender toggle controls.
    #[must_use]
    pub fn gender_toggles(&self) -> GenderSelection {
        self.filter.genders()
    }

    #[must_use]
    pub fn year_range(&self) -> YearRange {
        self.filter.year_range()
    }

    /// Text shown by the numeric year-range readout, e.g. `2007 – 2024`.
    #[must_use]
    pub fn year_range_readout(&self) -> String {
        let range = self.filter.year_range();
        format!("{} \u{2013} {}", range.min(), range.max())
    }
}
