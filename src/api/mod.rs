mod brush_controller;
mod filter_controller;
mod pointer_controller;
mod resize_controller;

use std::time::Duration;

use indexmap::IndexMap;
use tracing::trace;

use crate::core::{FilterSnapshot, FilterState, MortalityRecord, Viewport};
use crate::error::DashboardResult;
use crate::interaction::{BrushDrag, ResizeDebouncer};
use crate::render::{RegionId, RenderFrame, Renderer, TextHAlign, TextPrimitive};
use crate::view::bar::BarView;
use crate::view::brush::BrushView;
use crate::view::drilldown::DrilldownSeries;
use crate::view::heatmap::HeatmapView;
use crate::view::line::LineView;
use crate::view::{AnimationSpec, ChartView, ContainerMeasure, ReconcileStats, axis_color};

/// Measured mount regions for the four chart views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMeasures {
    pub heatmap: ContainerMeasure,
    pub bar: ContainerMeasure,
    pub line: ContainerMeasure,
    pub brush: ContainerMeasure,
}

impl ViewMeasures {
    /// All four regions share one measured width, the common host layout.
    #[must_use]
    pub fn uniform(measure: ContainerMeasure) -> Self {
        Self {
            heatmap: measure,
            bar: measure,
            line: measure,
            brush: measure,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    pub measures: ViewMeasures,
    pub resize_debounce: Duration,
    pub resize_noise_threshold_px: f64,
}

impl DashboardConfig {
    #[must_use]
    pub fn new(measures: ViewMeasures) -> Self {
        Self {
            measures,
            resize_debounce: Duration::from_millis(250),
            resize_noise_threshold_px: 50.0,
        }
    }

    #[must_use]
    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce = delay;
        self
    }

    #[must_use]
    pub fn with_resize_noise_threshold(mut self, threshold_px: f64) -> Self {
        self.resize_noise_threshold_px = threshold_px;
        self
    }
}

/// The orchestrator: owns the records, the shared filter state, and the four
/// views, and fans every filter mutation out as a full re-derive/re-render
/// pass over all views in registration order.
pub struct DashboardEngine<R: Renderer> {
    renderer: R,
    records: Vec<MortalityRecord>,
    filter: FilterState,
    heatmap: HeatmapView,
    bar: BarView,
    line: LineView,
    brush: BrushView,
    brush_drag: BrushDrag,
    resize: ResizeDebouncer,
    measures: ViewMeasures,
    pending_measures: Option<ViewMeasures>,
    last_drilldown: Option<DrilldownSeries>,
    last_stats: IndexMap<RegionId, ReconcileStats>,
    last_animations: IndexMap<RegionId, Vec<AnimationSpec>>,
}

impl<R: Renderer> DashboardEngine<R> {
    /// Builds the engine and performs the first full paint.
    ///
    /// The record set is the one-shot data load; it must be complete before
    /// any view is constructed.
    pub fn new(
        renderer: R,
        records: Vec<MortalityRecord>,
        config: DashboardConfig,
    ) -> DashboardResult<Self> {
        let filter = FilterState::from_records(&records)?;
        let snapshot = filter.snapshot();

        let mut heatmap = HeatmapView::new();
        let mut bar = BarView::new();
        let mut line = LineView::new();
        let mut brush = BrushView::new();
        heatmap.initialize(&config.measures.heatmap, &records, snapshot)?;
        bar.initialize(&config.measures.bar, &records, snapshot)?;
        line.initialize(&config.measures.line, &records, snapshot)?;
        brush.initialize(&config.measures.brush, &records, snapshot)?;

        let resize = ResizeDebouncer::new(
            config.resize_debounce,
            config.resize_noise_threshold_px,
            config.measures.heatmap.viewport_width,
        );

        let mut engine = Self {
            renderer,
            records,
            filter,
            heatmap,
            bar,
            line,
            brush,
            brush_drag: BrushDrag::new(),
            resize,
            measures: config.measures,
            pending_measures: None,
            last_drilldown: None,
            last_stats: IndexMap::new(),
            last_animations: IndexMap::new(),
        };
        engine.fan_out()?;
        Ok(engine)
    }

    #[must_use]
    pub fn records(&self) -> &[MortalityRecord] {
        &self.records
    }

    #[must_use]
    pub fn filter_snapshot(&self) -> FilterSnapshot {
        self.filter.snapshot()
    }

    #[must_use]
    pub fn heatmap(&self) -> &HeatmapView {
        &self.heatmap
    }

    #[must_use]
    pub fn bar(&self) -> &BarView {
        &self.bar
    }

    #[must_use]
    pub fn line(&self) -> &LineView {
        &self.line
    }

    #[must_use]
    pub fn brush(&self) -> &BrushView {
        &self.brush
    }

    /// Drill-down from the last accepted heatmap cell click, if any.
    #[must_use]
    pub fn drilldown(&self) -> Option<&DrilldownSeries> {
        self.last_drilldown.as_ref()
    }

    /// Reconcile stats of the last render pass into `region`.
    #[must_use]
    pub fn last_stats(&self, region: RegionId) -> Option<ReconcileStats> {
        self.last_stats.get(&region).copied()
    }

    /// Animation descriptors of the last render pass into `region`.
    #[must_use]
    pub fn last_animations(&self, region: RegionId) -> Option<&[AnimationSpec]> {
        self.last_animations.get(&region).map(Vec::as_slice)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Full fan-out: every view re-derives from the current snapshot and
    /// re-renders, in registration order. Every filter mutation ends here;
    /// there is no selective or batched update path.
    pub(crate) fn fan_out(&mut self) -> DashboardResult<()> {
        let snapshot = self.filter.snapshot();
        let Self {
            renderer,
            records,
            heatmap,
            bar,
            line,
            brush,
            last_stats,
            last_animations,
            ..
        } = self;

        let views: [(RegionId, &mut dyn ChartView); 4] = [
            (RegionId::Heatmap, heatmap),
            (RegionId::BarChart, bar),
            (RegionId::LineChart, line),
            (RegionId::BrushStrip, brush),
        ];
        for (region, view) in views {
            view.derive_display_data(records, snapshot);
            let output = view.render()?;
            trace!(
                view = view.name(),
                entered = output.stats.entered,
                updated = output.stats.updated,
                exited = output.stats.exited,
                "fan-out render pass"
            );
            renderer.render(region, &output.frame)?;
            last_stats.insert(region, output.stats);
            last_animations.insert(region, output.animations);
        }

        self.render_companions()
    }

    /// Re-renders every view from its existing display data (the resize
    /// path: layout changed, data did not).
    pub(crate) fn render_all(&mut self) -> DashboardResult<()> {
        let Self {
            renderer,
            heatmap,
            bar,
            line,
            brush,
            last_stats,
            last_animations,
            ..
        } = self;

        let views: [(RegionId, &mut dyn ChartView); 4] = [
            (RegionId::Heatmap, heatmap),
            (RegionId::BarChart, bar),
            (RegionId::LineChart, line),
            (RegionId::BrushStrip, brush),
        ];
        for (region, view) in views {
            let output = view.render()?;
            renderer.render(region, &output.frame)?;
            last_stats.insert(region, output.stats);
            last_animations.insert(region, output.animations);
        }

        self.render_companions()
    }

    /// The stateless companion regions: gradient legend and year readout.
    fn render_companions(&mut self) -> DashboardResult<()> {
        let legend = self.heatmap.legend_frame()?;
        self.renderer.render(RegionId::ColorLegend, &legend)?;

        let range = self.filter.year_range();
        let readout = RenderFrame::new(Viewport::new(200, 30)).with_text(TextPrimitive::new(
            format!("{} \u{2013} {}", range.min(), range.max()),
            0.0,
            8.0,
            14.0,
            axis_color(),
            TextHAlign::Left,
        ));
        self.renderer.render(RegionId::YearReadout, &readout)
    }

    pub(crate) fn render_brush_region(&mut self) -> DashboardResult<()> {
        let output = self.brush.render()?;
        self.renderer.render(RegionId::BrushStrip, &output.frame)?;
        self.last_stats.insert(RegionId::BrushStrip, output.stats);
        self.last_animations
            .insert(RegionId::BrushStrip, output.animations);
        Ok(())
    }
}
