use crate::error::DashboardResult;
use crate::interaction::DrilldownModifier;
use crate::render::{RegionId, Renderer};
use crate::view::ChartView;
use crate::view::drilldown::{DrilldownAxis, DrilldownSeries, derive_drilldown};

use super::DashboardEngine;

impl<R: Renderer> DashboardEngine<R> {
    /// Routes a pointer move in region-local pixels to that view's hover
    /// handler. Tooltips are overlay state read back by the host; frames are
    /// not re-rendered for pointer motion.
    pub fn pointer_move(&mut self, region: RegionId, x: f64, y: f64) {
        match region {
            RegionId::Heatmap => self.heatmap.hover(x, y),
            RegionId::BarChart => self.bar.hover(x, y),
            RegionId::LineChart => self.line.hover(x, y),
            _ => {}
        }
    }

    /// Tears down the region's tooltip when the pointer leaves it.
    pub fn pointer_leave(&mut self, region: RegionId) {
        match region {
            RegionId::Heatmap => self.heatmap.clear_tooltip(),
            RegionId::BarChart => self.bar.clear_tooltip(),
            RegionId::LineChart => self.line.clear_tooltip(),
            _ => {}
        }
    }

    /// Heatmap cell click: derives the drill-down from the clicked cell's
    /// own identity (never from the shared filter state). An empty result
    /// keeps the previous drill-down display intact.
    pub fn heatmap_click(
        &mut self,
        x: f64,
        y: f64,
        modifier: DrilldownModifier,
    ) -> DashboardResult<Option<&DrilldownSeries>> {
        let Some((year, month)) = self.heatmap.cell_at(x, y) else {
            return Ok(self.last_drilldown.as_ref());
        };
        let axis = match modifier {
            DrilldownModifier::None => DrilldownAxis::MonthAcrossYears,
            DrilldownModifier::Alternate => DrilldownAxis::YearAcrossMonths,
        };
        if let Some(series) = derive_drilldown(&self.records, year, month, axis) {
            self.last_drilldown = Some(series);
        }
        Ok(self.last_drilldown.as_ref())
    }
}
