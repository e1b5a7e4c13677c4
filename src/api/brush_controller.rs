use tracing::debug;

use crate::error::DashboardResult;
use crate::render::Renderer;

use super::DashboardEngine;

impl<R: Renderer> DashboardEngine<R> {
    /// Anchors a brush drag at `x` (brush-strip pixels). Only the strip's
    /// selection visual updates until the drag ends.
    pub fn brush_start(&mut self, x: f64) -> DashboardResult<()> {
        self.brush_drag.on_start(x);
        self.brush
            .set_drag_selection(self.brush_drag.selection_px());
        self.render_brush_region()
    }

    /// Extends the in-flight drag; stray moves outside a drag are ignored.
    pub fn brush_move(&mut self, x: f64) -> DashboardResult<()> {
        let Some(selection) = self.brush_drag.on_move(x) else {
            return Ok(());
        };
        self.brush.set_drag_selection(Some(selection));
        self.render_brush_region()
    }

    /// Finishes the drag: an empty or degenerate selection resets the year
    /// range to the full observed span; otherwise the pixel bounds map back
    /// through the strip's scale to the nearest year bounds. Either way the
    /// change fans out to every view.
    pub fn brush_end(&mut self) -> DashboardResult<()> {
        let selection_px = self.brush_drag.on_end();
        self.brush.set_drag_selection(None);

        let resolved = selection_px
            .and_then(|(a_px, b_px)| self.brush.resolve_selection(a_px, b_px));
        match resolved {
            Some((start, end)) => {
                debug!(start, end, "brush selection applied");
                self.filter.set_year_range(start, end);
            }
            None => {
                let domain = self.filter.domain();
                debug!("brush selection cleared; resetting to full span");
                self.filter.set_year_range(domain.min(), domain.max());
            }
        }
        self.fan_out()
    }
}
