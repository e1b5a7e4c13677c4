use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::{
    BandScale, FilterSnapshot, Gender, GenderSelection, LinearScale, Margin, Month,
    MortalityRecord, nice_domain,
};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{Color, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::view::reconcile::{ElementKey, KeyedScene};
use crate::view::tooltip::{Tooltip, TooltipRow, TooltipState};
use crate::view::{
    AnimationKind, AnimationSpec, ChartView, ContainerMeasure, HitShape, RenderOutput, ViewLayout,
    axis_color, gender_color,
};

const VIEW_NAME: &str = "bar-chart";
const MARGIN: Margin = Margin::new(40.0, 120.0, 80.0, 60.0);
const BAND_PADDING_RATIO: f64 = 0.2;
const HEADROOM_RATIO: f64 = 1.15;
const TWEEN_MS: u32 = 600;
const Y_TICK_COUNT: usize = 10;

/// Per-calendar-month means across the selected years: the "typical month"
/// comparison stays meaningful no matter how many years are selected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyAverage {
    pub month: Month,
    pub male: f64,
    pub female: f64,
    pub trans: f64,
    pub total: f64,
}

impl MonthlyAverage {
    #[must_use]
    pub fn mean_of(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
            Gender::Trans => self.trans,
        }
    }
}

/// Retained visual state of one stacked segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentVisual {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Pixel y of this segment's own stack base; exits squash toward it.
    pub base_y: f64,
    pub fill: Color,
}

impl HitShape for SegmentVisual {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Stacked monthly averages over the enabled gender categories.
///
/// Disabling a category removes its layer from the stack entirely, so the
/// stack's visual total shrinks rather than flattening to zero.
#[derive(Debug)]
pub struct BarView {
    layout: Option<ViewLayout>,
    display: Vec<MonthlyAverage>,
    genders: GenderSelection,
    scene: KeyedScene<SegmentVisual>,
    tooltip: TooltipState,
}

impl Default for BarView {
    fn default() -> Self {
        Self::new()
    }
}

impl BarView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: None,
            display: Vec::new(),
            genders: GenderSelection::default(),
            scene: KeyedScene::new(),
            tooltip: TooltipState::new(),
        }
    }

    #[must_use]
    pub fn display_data(&self) -> &[MonthlyAverage] {
        &self.display
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.active()
    }

    /// Visual stack total of one month: the sum of the enabled means only.
    #[must_use]
    pub fn stacked_total(&self, month: Month) -> f64 {
        self.display
            .iter()
            .find(|average| average.month == month)
            .map(|average| {
                self.genders
                    .enabled()
                    .iter()
                    .map(|gender| average.mean_of(*gender))
                    .sum()
            })
            .unwrap_or(0.0)
    }

    /// Shows the hover tooltip for the segment under the pointer.
    pub fn hover(&mut self, x: f64, y: f64) {
        let hit = self.scene.hit_test(x, y).map(|(key, _)| key);
        let Some(ElementKey::Segment { gender, month }) = hit else {
            self.tooltip.hide();
            return;
        };
        let Some(average) = self
            .display
            .iter()
            .find(|average| average.month == month)
            .copied()
        else {
            self.tooltip.hide();
            return;
        };

        let mut rows: SmallVec<[TooltipRow; 4]> = SmallVec::new();
        rows.push(
            TooltipRow::new(gender.label(), format!("{:.1}", average.mean_of(gender)))
                .with_accent(gender_color(gender)),
        );
        rows.push(TooltipRow::new(
            "Total Average",
            format!("{:.1}", average.total),
        ));

        self.tooltip.show(Tooltip {
            key: ElementKey::Segment { gender, month },
            title: month.name().to_owned(),
            rows,
            x: x + 10.0,
            y: y - 40.0,
        });
    }

    fn layout(&self) -> DashboardResult<ViewLayout> {
        self.layout.ok_or(DashboardError::NotInitialized(VIEW_NAME))
    }

    fn resolve_layout(measure: &ContainerMeasure) -> DashboardResult<ViewLayout> {
        ViewLayout::resolve(VIEW_NAME, measure, MARGIN, |width| {
            (width * 0.4).clamp(400.0, 600.0)
        })
    }

    fn y_scale(&self, layout: ViewLayout) -> DashboardResult<LinearScale> {
        let max_total = self
            .display
            .iter()
            .map(|average| OrderedFloat(average.total))
            .max()
            .map_or(0.0, OrderedFloat::into_inner);
        let headroom = if max_total > 0.0 {
            max_total * HEADROOM_RATIO
        } else {
            1.0
        };
        let (_, nice_max) = nice_domain(0.0, headroom, Y_TICK_COUNT);
        LinearScale::new(0.0, nice_max)?
            .with_range(layout.margin.top + layout.height, layout.margin.top)
    }
}

impl ChartView for BarView {
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
        self.genders = snapshot.genders;
        self.display = Month::ALL
            .iter()
            .map(|month| {
                let month_records: Vec<&MortalityRecord> = records
                    .iter()
                    .filter(|record| snapshot.matches(record) && record.month == *month)
                    .collect();
                let mean = |value: fn(&MortalityRecord) -> u32| -> f64 {
                    if month_records.is_empty() {
                        0.0
                    } else {
                        month_records
                            .iter()
                            .map(|record| f64::from(value(record)))
                            .sum::<f64>()
                            / month_records.len() as f64
                    }
                };
                MonthlyAverage {
                    month: *month,
                    male: mean(|record| record.male),
                    female: mean(|record| record.female),
                    trans: mean(|record| record.trans),
                    total: mean(|record| record.total),
                }
            })
            .collect();
    }

    fn render(&mut self) -> DashboardResult<RenderOutput> {
        let layout = self.layout()?;
        let x_scale = BandScale::new(
            Month::ALL.len(),
            layout.margin.left,
            layout.margin.left + layout.width,
            BAND_PADDING_RATIO,
        )?;
        let y_scale = self.y_scale(layout)?;

        let enabled = self.genders.enabled();
        let mut targets = Vec::with_capacity(self.display.len() * enabled.len());
        for average in &self.display {
            let mut cumulative = 0.0;
            for gender in &enabled {
                let value = average.mean_of(*gender);
                let base = cumulative;
                cumulative += value;
                let top_px = y_scale.map(cumulative);
                let base_px = y_scale.map(base);
                targets.push((
                    ElementKey::Segment {
                        gender: *gender,
                        month: average.month,
                    },
                    SegmentVisual {
                        x: x_scale.position(average.month.index()),
                        y: top_px,
                        width: x_scale.bandwidth(),
                        height: base_px - top_px,
                        base_y: base_px,
                        fill: gender_color(*gender),
                    },
                ));
            }
        }

        let plan = self.scene.reconcile(targets);
        let stats = plan.stats();

        let mut animations = Vec::with_capacity(stats.entered + stats.updated + stats.exited);
        for (key, visual) in &plan.enter {
            animations.push(AnimationSpec {
                key: *key,
                kind: AnimationKind::GrowFromBase {
                    base_y: visual.base_y,
                },
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
        // Exiting layers squash to their own base offset, never to the top.
        for (key, visual) in &plan.exit {
            animations.push(AnimationSpec {
                key: *key,
                kind: AnimationKind::CollapseToBase {
                    base_y: visual.base_y,
                },
                delay_ms: 0,
                duration_ms: TWEEN_MS,
            });
        }

        self.tooltip.retain_if_alive(|key| self.scene.contains(key));

        let mut frame = RenderFrame::new(layout.surface());
        for (_, visual) in self.scene.iter() {
            if visual.height > 0.0 {
                frame = frame.with_rect(RectPrimitive::filled(
                    visual.x,
                    visual.y,
                    visual.width,
                    visual.height,
                    visual.fill,
                ));
            }
        }

        let baseline_y = layout.margin.top + layout.height;
        frame = frame.with_line(LinePrimitive::new(
            layout.margin.left,
            baseline_y,
            layout.margin.left + layout.width,
            baseline_y,
            1.0,
            axis_color(),
        ));
        for month in Month::ALL {
            frame = frame.with_text(TextPrimitive::new(
                month.name(),
                x_scale.position(month.index()) + x_scale.bandwidth() / 2.0,
                baseline_y + 8.0,
                11.0,
                axis_color(),
                TextHAlign::Center,
            ));
        }
        for tick in y_scale.nice_ticks(Y_TICK_COUNT) {
            let tick_y = y_scale.map(tick);
            frame = frame
                .with_line(LinePrimitive::new(
                    layout.margin.left - 5.0,
                    tick_y,
                    layout.margin.left,
                    tick_y,
                    1.0,
                    axis_color(),
                ))
                .with_text(TextPrimitive::new(
                    format!("{tick}"),
                    layout.margin.left - 8.0,
                    tick_y,
                    12.0,
                    axis_color(),
                    TextHAlign::Right,
                ));
        }
        frame = frame
            .with_text(TextPrimitive::new(
                "Month",
                layout.margin.left + layout.width / 2.0,
                baseline_y + 65.0,
                13.0,
                axis_color(),
                TextHAlign::Center,
            ))
            .with_text(TextPrimitive::new(
                "Average Monthly Deaths",
                layout.margin.left,
                layout.margin.top - 25.0,
                13.0,
                axis_color(),
                TextHAlign::Left,
            ));

        let legend_x = layout.margin.left + layout.width + 20.0;
        for (index, gender) in enabled.iter().enumerate() {
            let legend_y = layout.margin.top + 20.0 + index as f64 * 25.0;
            frame = frame
                .with_rect(RectPrimitive::filled(
                    legend_x,
                    legend_y,
                    20.0,
                    12.0,
                    gender_color(*gender),
                ))
                .with_text(TextPrimitive::new(
                    gender.label(),
                    legend_x + 28.0,
                    legend_y + 2.0,
                    12.0,
                    axis_color(),
                    TextHAlign::Left,
                ));
        }

        Ok(RenderOutput {
            frame,
            animations,
            stats,
        })
    }

    fn clear_tooltip(&mut self) {
        self.tooltip.hide();
    }
}
