use crate::core::{BandScale, FilterSnapshot, Margin, MortalityRecord, YearRange};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::view::reconcile::{ElementKey, KeyedScene};
use crate::view::{
    AnimationKind, AnimationSpec, ChartView, ContainerMeasure, RenderOutput, ViewLayout, axis_color,
};

const VIEW_NAME: &str = "brush-strip";
const MARGIN: Margin = Margin::new(10.0, 20.0, 20.0, 40.0);
const STRIP_HEIGHT: f64 = 60.0;
const BAND_PADDING_RATIO: f64 = 0.1;
const TWEEN_MS: u32 = 400;
/// Pixel selections narrower than this count as cleared.
const EMPTY_SELECTION_PX: f64 = 1.0;

/// One overview-strip bar: total deaths across all months of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearlyTotal {
    pub year: i32,
    pub total: u32,
}

/// Retained visual state of one strip bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripBar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Compact yearly-total overview strip with a horizontal range-selection
/// affordance that drives the shared year filter.
///
/// The strip itself always shows the full observed span; only the selection
/// overlay tracks the filter. The overlay derives from the filter snapshot
/// except while a drag is in flight, so state and visual cannot desync.
#[derive(Debug)]
pub struct BrushView {
    layout: Option<ViewLayout>,
    display: Vec<YearlyTotal>,
    selection: Option<YearRange>,
    drag_selection_px: Option<(f64, f64)>,
    scene: KeyedScene<StripBar>,
}

impl Default for BrushView {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: None,
            display: Vec::new(),
            selection: None,
            drag_selection_px: None,
            scene: KeyedScene::new(),
        }
    }

    #[must_use]
    pub fn display_data(&self) -> &[YearlyTotal] {
        &self.display
    }

    /// Live drag overlay in pixels; `None` outside a drag.
    pub fn set_drag_selection(&mut self, selection_px: Option<(f64, f64)>) {
        self.drag_selection_px = selection_px;
    }

    /// Clears the visual selection affordance together with any in-flight
    /// drag overlay. The reset control calls this so the visual can never
    /// outlive the state it mirrors.
    pub fn clear_selection(&mut self) {
        self.drag_selection_px = None;
    }

    /// Maps a finished pixel selection to inclusive integer year bounds.
    ///
    /// Returns `None` for an empty or degenerate selection, which the engine
    /// treats as "reset to the full observed span".
    #[must_use]
    pub fn resolve_selection(&self, a_px: f64, b_px: f64) -> Option<(i32, i32)> {
        if !a_px.is_finite() || !b_px.is_finite() || (a_px - b_px).abs() < EMPTY_SELECTION_PX {
            return None;
        }
        let start = self.year_at(a_px.min(b_px))?;
        let end = self.year_at(a_px.max(b_px))?;
        Some((start, end))
    }

    /// Year owning the band nearest to `pixel`, clamped into the strip.
    #[must_use]
    pub fn year_at(&self, pixel: f64) -> Option<i32> {
        let layout = self.layout?;
        if self.display.is_empty() {
            return None;
        }
        let scale = self.band_scale(layout).ok()?;
        let clamped = pixel.clamp(layout.margin.left, layout.margin.left + layout.width);
        let index = scale
            .index_at(clamped)
            .unwrap_or_else(|| self.display.len() - 1);
        self.display.get(index).map(|entry| entry.year)
    }

    fn band_scale(&self, layout: ViewLayout) -> DashboardResult<BandScale> {
        BandScale::new(
            self.display.len(),
            layout.margin.left,
            layout.margin.left + layout.width,
            BAND_PADDING_RATIO,
        )
    }

    fn layout(&self) -> DashboardResult<ViewLayout> {
        self.layout.ok_or(DashboardError::NotInitialized(VIEW_NAME))
    }

    fn resolve_layout(measure: &ContainerMeasure) -> DashboardResult<ViewLayout> {
        ViewLayout::resolve(VIEW_NAME, measure, MARGIN, |_| STRIP_HEIGHT)
    }

    /// Selection overlay bounds in pixels: the live drag while one is in
    /// flight, otherwise the snapshot-derived year range.
    fn selection_overlay_px(&self, layout: ViewLayout, scale: BandScale) -> Option<(f64, f64)> {
        if let Some((a, b)) = self.drag_selection_px {
            let left = a.min(b).clamp(layout.margin.left, layout.margin.left + layout.width);
            let right = a.max(b).clamp(layout.margin.left, layout.margin.left + layout.width);
            return Some((left, right));
        }
        let selection = self.selection?;
        let first = self
            .display
            .iter()
            .position(|entry| entry.year == selection.min())?;
        let last = self
            .display
            .iter()
            .position(|entry| entry.year == selection.max())?;
        Some((
            scale.position(first),
            scale.position(last) + scale.bandwidth(),
        ))
    }
}

impl ChartView for BrushView {
    fn name(&self) -> &'static str {
        VIEW_NAME
    }

    fn initialize(
        &mut self,
        measure: &ContainerMeasure,
        _records: &[MortalityRecord],
        _snapshot: FilterSnapshot,
    ) -> DashboardResult<()> {
        if self.layout.is_some() {
            return Err(DashboardError::AlreadyInitialized(VIEW_NAME));
        }
        self.layout = Some(Self::resolve_layout(measure)?);
        Ok(())
    }

    fn relayout(&mut self, measure: &ContainerMeasure) -> DashboardResult<()> {
        self.layout()?;
        self.layout = Some(Self::resolve_layout(measure)?);
        Ok(())
    }

    fn derive_display_data(&mut self, records: &[MortalityRecord], snapshot: FilterSnapshot) {
        // The overview strip always spans the full record set; only the
        // selection overlay follows the filter.
        let mut totals: Vec<YearlyTotal> = Vec::new();
        for record in records {
            match totals.iter_mut().find(|entry| entry.year == record.year) {
                Some(entry) => entry.total += record.total,
                None => totals.push(YearlyTotal {
                    year: record.year,
                    total: record.total,
                }),
            }
        }
        totals.sort_by_key(|entry| entry.year);
        self.display = totals;
        self.selection = Some(snapshot.year_range);
    }

    fn render(&mut self) -> DashboardResult<RenderOutput> {
        let layout = self.layout()?;

        let mut targets = Vec::with_capacity(self.display.len());
        if !self.display.is_empty() {
            let scale = self.band_scale(layout)?;
            let max_total = self
                .display
                .iter()
                .map(|entry| entry.total)
                .max()
                .unwrap_or(0)
                .max(1);
            for (index, entry) in self.display.iter().enumerate() {
                let height = layout.height * f64::from(entry.total) / f64::from(max_total);
                targets.push((
                    ElementKey::YearBar { year: entry.year },
                    StripBar {
                        x: scale.position(index),
                        y: layout.margin.top + layout.height - height,
                        width: scale.bandwidth(),
                        height,
                    },
                ));
            }
        }

        let plan = self.scene.reconcile(targets);
        let stats = plan.stats();

        let mut animations = Vec::with_capacity(stats.entered + stats.updated + stats.exited);
        for (key, _) in &plan.enter {
            animations.push(AnimationSpec {
                key: *key,
                kind: AnimationKind::FadeIn,
                delay_ms: 0,
                duration_ms: TWEEN_MS,
            });
        }
        for update in &plan.update {
            animations.push(AnimationSpec {
                key: update.key,
                kind: AnimationKind::Morph,
                delay_ms: 0,
                duration_ms: TWEEN_MS,
            });
        }
        for (key, _) in &plan.exit {
            animations.push(AnimationSpec {
                key: *key,
                kind: AnimationKind::FadeOut,
                delay_ms: 0,
                duration_ms: TWEEN_MS,
            });
        }

        let mut frame = RenderFrame::new(layout.surface());
        for (_, bar) in self.scene.iter() {
            frame = frame.with_rect(RectPrimitive::filled(
                bar.x,
                bar.y,
                bar.width,
                bar.height,
                Color::from_rgb8(170, 170, 170),
            ));
        }

        if !self.display.is_empty() {
            let scale = self.band_scale(layout)?;
            if let Some((left, right)) = self.selection_overlay_px(layout, scale) {
                frame = frame.with_rect(
                    RectPrimitive::filled(
                        left,
                        layout.margin.top,
                        (right - left).max(0.0),
                        layout.height,
                        Color::rgba(19.0 / 255.0, 79.0 / 255.0, 189.0 / 255.0, 0.25),
                    )
                    .with_border(Color::from_rgb8(19, 79, 189), 1.0),
                );
            }

            let first = self.display.first().map(|entry| entry.year).unwrap_or_default();
            let last = self.display.last().map(|entry| entry.year).unwrap_or_default();
            frame = frame
                .with_text(TextPrimitive::new(
                    first.to_string(),
                    layout.margin.left,
                    layout.margin.top + layout.height + 4.0,
                    10.0,
                    axis_color(),
                    TextHAlign::Left,
                ))
                .with_text(TextPrimitive::new(
                    last.to_string(),
                    layout.margin.left + layout.width,
                    layout.margin.top + layout.height + 4.0,
                    10.0,
                    axis_color(),
                    TextHAlign::Right,
                ));
        }

        Ok(RenderOutput {
            frame,
            animations,
            stats,
        })
    }

    fn clear_tooltip(&mut self) {}
}
