use indexmap::IndexMap;

use crate::error::DashboardResult;
use crate::render::{RegionId, RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It validates every frame so tests catch invalid geometry before a real
/// backend is introduced, and keeps the last frame per region so assertions
/// can inspect exactly what each view produced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    frames: IndexMap<RegionId, RenderFrame>,
    render_count: usize,
}

impl NullRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last frame rendered into `region`, if any.
    #[must_use]
    pub fn last_frame(&self, region: RegionId) -> Option<&RenderFrame> {
        self.frames.get(&region)
    }

    /// Total number of frames accepted across all regions.
    #[must_use]
    pub fn render_count(&self) -> usize {
        self.render_count
    }
}

impl Renderer for NullRenderer {
    fn render(&mut self, region: RegionId, frame: &RenderFrame) -> DashboardResult<()> {
        frame.validate()?;
        self.frames.insert(region, frame.clone());
        self.render_count += 1;
        Ok(())
    }
}
