mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RectPrimitive, StrokeStyle,
    TextHAlign, TextPrimitive,
};

use serde::{Deserialize, Serialize};

use crate::error::DashboardResult;

/// Named mount regions supplied by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionId {
    Heatmap,
    BarChart,
    LineChart,
    BrushStrip,
    ColorLegend,
    YearReadout,
}

/// Contract implemented by any rendering backend.
///
/// Backends receive fully materialized, deterministic `RenderFrame`s per
/// region, so drawing code remains isolated from chart domain, filter, and
/// interaction logic. Animated transitions are advisory descriptors layered
/// on top of the frames; a backend that ignores them simply snaps elements
/// to their target state.
pub trait Renderer {
    fn render(&mut self, region: RegionId, frame: &RenderFrame) -> DashboardResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoRenderer};
