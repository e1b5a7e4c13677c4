use chrono::{Datelike, NaiveDate};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::core::{
    CalendarScale, FilterSnapshot, Gender, GenderSelection, LinearScale, Margin, Month,
    MortalityRecord, nice_domain,
};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, PolylinePrimitive, RenderFrame, StrokeStyle,
    TextHAlign, TextPrimitive,
};
use crate::view::reconcile::{ElementKey, KeyedScene, SeriesId};
use crate::view::tooltip::{Tooltip, TooltipRow, TooltipState};
use crate::view::{
    AnimationKind, AnimationSpec, ChartView, ContainerMeasure, HitShape, RenderOutput, ViewLayout,
    axis_color, series_color,
};

const VIEW_NAME: &str = "line-chart";
const MARGIN: Margin = Margin::new(40.0, 120.0, 60.0, 60.0);
const HEADROOM_RATIO: f64 = 1.1;
const TWEEN_MS: u32 = 800;
const MARKER_TWEEN_MS: u32 = 800;
const Y_TICK_COUNT: usize = 10;
const POINT_RADIUS: f64 = 3.0;
const POINT_HIT_RADIUS: f64 = 6.0;

/// Fixed calendar annotation: the pandemic onset month.
const MARKER_YEAR: i32 = 2020;
const MARKER_MONTH: Month = Month::January;
const MARKER_LABEL: &str = "COVID-19 Begins (Jan 2020)";

/// One time-series sample: a (year, month) pair with every category count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub year: i32,
    pub month: Month,
    pub male: u32,
    pub female: u32,
    pub trans: u32,
    pub total: u32,
}

impl SeriesPoint {
    #[must_use]
    pub fn value_of(&self, series: SeriesId) -> f64 {
        let value = match series {
            SeriesId::Gender(Gender::Male) => self.male,
            SeriesId::Gender(Gender::Female) => self.female,
            SeriesId::Gender(Gender::Trans) => self.trans,
            SeriesId::Total => self.total,
        };
        f64::from(value)
    }

    fn max_value(&self) -> f64 {
        f64::from(self.male.max(self.female).max(self.trans).max(self.total))
    }
}

/// Retained visual state of one line-chart element.
#[derive(Debug, Clone, PartialEq)]
pub enum LineElement {
    Path {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    Point {
        cx: f64,
        cy: f64,
        color: Color,
    },
    Marker {
        x: f64,
        top_y: f64,
        baseline_y: f64,
    },
}

impl HitShape for LineElement {
    fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Point { cx, cy, .. } => {
                let dx = x - cx;
                let dy = y - cy;
                (dx * dx + dy * dy).sqrt() <= POINT_HIT_RADIUS
            }
            Self::Path { .. } | Self::Marker { .. } => false,
        }
    }
}

/// Monthly time series per enabled gender category plus an always-visible
/// total series, with a conditional pandemic-onset marker.
#[derive(Debug)]
pub struct LineView {
    layout: Option<ViewLayout>,
    display: Vec<SeriesPoint>,
    genders: GenderSelection,
    scene: KeyedScene<LineElement>,
    tooltip: TooltipState,
}

impl Default for LineView {
    fn default() -> Self {
        Self::new()
    }
}

impl LineView {
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
    pub fn display_data(&self) -> &[SeriesPoint] {
        &self.display
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.active()
    }

    /// Series drawn by the current selection: enabled genders, then Total.
    #[must_use]
    pub fn active_series(&self) -> SmallVec<[SeriesId; 4]> {
        let mut series: SmallVec<[SeriesId; 4]> = self
            .genders
            .enabled()
            .into_iter()
            .map(SeriesId::Gender)
            .collect();
        series.push(SeriesId::Total);
        series
    }

    /// Whether the pandemic-onset marker is inside the current x-domain.
    #[must_use]
    pub fn marker_visible(&self) -> bool {
        self.scene.contains(ElementKey::DateMarker {
            year: MARKER_YEAR,
            month: MARKER_MONTH,
        })
    }

    /// Shows the hover tooltip for the point marker under the pointer.
    pub fn hover(&mut self, x: f64, y: f64) {
        let hit = self.scene.hit_test(x, y).map(|(key, _)| key);
        let Some(ElementKey::SeriesPoint {
            series,
            year,
            month,
        }) = hit
        else {
            self.tooltip.hide();
            return;
        };
        let Some(point) = self
            .display
            .iter()
            .find(|point| point.year == year && point.month == month)
            .copied()
        else {
            self.tooltip.hide();
            return;
        };

        let mut rows: SmallVec<[TooltipRow; 4]> = SmallVec::new();
        rows.push(
            TooltipRow::new(series.label(), format!("{:.1}", point.value_of(series)))
                .with_accent(series_color(series)),
        );

        self.tooltip.show(Tooltip {
            key: ElementKey::SeriesPoint {
                series,
                year,
                month,
            },
            title: format!("{month} {year}"),
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

    fn marker_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(MARKER_YEAR, MARKER_MONTH.number(), 1)
            .unwrap_or(NaiveDate::MIN)
    }
}

impl ChartView for LineView {
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
        self.display = records
            .iter()
            .filter(|record| snapshot.matches(record))
            .map(|record| SeriesPoint {
                date: record.date(),
                year: record.year,
                month: record.month,
                male: record.male,
                female: record.female,
                trans: record.trans,
                total: record.total,
            })
            .collect();
        self.display.sort_by_key(|point| point.date);
    }

    fn render(&mut self) -> DashboardResult<RenderOutput> {
        let layout = self.layout()?;
        let baseline_y = layout.margin.top + layout.height;

        let mut targets = Vec::new();
        let mut scales: Option<(CalendarScale, LinearScale)> = None;

        if let (Some(first), Some(last)) = (self.display.first(), self.display.last()) {
            let x_scale = CalendarScale::new(first.date, last.date)?
                .with_range(layout.margin.left, layout.margin.left + layout.width)?;

            let max_value = self
                .display
                .iter()
                .map(|point| OrderedFloat(point.max_value()))
                .max()
                .map_or(0.0, OrderedFloat::into_inner);
            let headroom = if max_value > 0.0 {
                max_value * HEADROOM_RATIO
            } else {
                1.0
            };
            let (_, nice_max) = nice_domain(0.0, headroom, Y_TICK_COUNT);
            let y_scale = LinearScale::new(0.0, nice_max)?.with_range(baseline_y, layout.margin.top)?;

            // Conditional-existence overlay: present iff the marker date falls
            // inside the x-domain, independent of any toggle.
            let marker_date = Self::marker_date();
            if x_scale.contains(marker_date) {
                targets.push((
                    ElementKey::DateMarker {
                        year: MARKER_YEAR,
                        month: MARKER_MONTH,
                    },
                    LineElement::Marker {
                        x: x_scale.map(marker_date),
                        top_y: layout.margin.top,
                        baseline_y,
                    },
                ));
            }

            for series in self.active_series() {
                let points: Vec<(f64, f64)> = self
                    .display
                    .iter()
                    .map(|point| (x_scale.map(point.date), y_scale.map(point.value_of(series))))
                    .collect();
                if points.len() >= 2 {
                    targets.push((
                        ElementKey::SeriesPath { series },
                        LineElement::Path {
                            points,
                            color: series_color(series),
                        },
                    ));
                }
                for point in &self.display {
                    targets.push((
                        ElementKey::SeriesPoint {
                            series,
                            year: point.year,
                            month: point.month,
                        },
                        LineElement::Point {
                            cx: x_scale.map(point.date),
                            cy: y_scale.map(point.value_of(series)),
                            color: series_color(series),
                        },
                    ));
                }
            }

            scales = Some((x_scale, y_scale));
        }

        let plan = self.scene.reconcile(targets);
        let stats = plan.stats();

        let mut animations = Vec::with_capacity(stats.entered + stats.updated + stats.exited);
        for (key, element) in &plan.enter {
            let kind = match element {
                LineElement::Marker { baseline_y, .. } => AnimationKind::GrowFromBase {
                    base_y: *baseline_y,
                },
                _ => AnimationKind::FadeIn,
            };
            animations.push(AnimationSpec {
                key: *key,
                kind,
                delay_ms: 0,
                duration_ms: if matches!(element, LineElement::Marker { .. }) {
                    MARKER_TWEEN_MS
                } else {
                    TWEEN_MS
                },
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
        for (key, element) in &plan.exit {
            let kind = match element {
                LineElement::Marker { baseline_y, .. } => AnimationKind::CollapseToBase {
                    base_y: *baseline_y,
                },
                _ => AnimationKind::FadeOut,
            };
            animations.push(AnimationSpec {
                key: *key,
                kind,
                delay_ms: 0,
                duration_ms: if matches!(element, LineElement::Marker { .. }) {
                    MARKER_TWEEN_MS
                } else {
                    TWEEN_MS
                },
            });
        }

        self.tooltip.retain_if_alive(|key| self.scene.contains(key));

        let mut frame = RenderFrame::new(layout.surface());
        for (_, element) in self.scene.iter() {
            match element {
                LineElement::Path { points, color } => {
                    frame = frame.with_polyline(PolylinePrimitive::new(points.clone(), 3.0, *color));
                }
                LineElement::Point { cx, cy, color } => {
                    frame = frame.with_circle(
                        CirclePrimitive::new(*cx, *cy, POINT_RADIUS, *color)
                            .with_stroke(Color::rgb(1.0, 1.0, 1.0), 2.0),
                    );
                }
                LineElement::Marker { x, top_y, baseline_y } => {
                    frame = frame
                        .with_line(
                            LinePrimitive::new(
                                *x,
                                *top_y,
                                *x,
                                *baseline_y,
                                2.0,
                                Color::rgb(1.0, 0.0, 0.0),
                            )
                            .with_stroke_style(StrokeStyle::Dashed { on: 6.0, off: 4.0 }),
                        )
                        .with_text(TextPrimitive::new(
                            MARKER_LABEL,
                            *x + 6.0,
                            *top_y + 15.0,
                            13.0,
                            Color::rgb(1.0, 0.0, 0.0),
                            TextHAlign::Left,
                        ));
                }
            }
        }

        frame = frame.with_line(LinePrimitive::new(
            layout.margin.left,
            baseline_y,
            layout.margin.left + layout.width,
            baseline_y,
            1.0,
            axis_color(),
        ));
        if let Some((x_scale, y_scale)) = scales {
            let (domain_start, domain_end) = x_scale.domain();
            for year in domain_start.year()..=domain_end.year() {
                let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) else {
                    continue;
                };
                if !x_scale.contains(date) {
                    continue;
                }
                let tick_x = x_scale.map(date);
                frame = frame
                    .with_line(LinePrimitive::new(
                        tick_x,
                        baseline_y,
                        tick_x,
                        baseline_y + 5.0,
                        1.0,
                        axis_color(),
                    ))
                    .with_text(TextPrimitive::new(
                        year.to_string(),
                        tick_x,
                        baseline_y + 8.0,
                        12.0,
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
        }
        frame = frame
            .with_text(TextPrimitive::new(
                "Year",
                layout.margin.left + layout.width / 2.0,
                baseline_y + 50.0,
                13.0,
                axis_color(),
                TextHAlign::Center,
            ))
            .with_text(TextPrimitive::new(
                "Total Monthly Deaths",
                layout.margin.left,
                layout.margin.top - 25.0,
                13.0,
                axis_color(),
                TextHAlign::Left,
            ));

        let legend_x = layout.margin.left + layout.width + 20.0;
        for (index, series) in self.active_series().iter().enumerate() {
            let legend_y = layout.margin.top + 20.0 + index as f64 * 25.0;
            let color = series_color(*series);
            frame = frame
                .with_line(LinePrimitive::new(
                    legend_x,
                    legend_y + 6.0,
                    legend_x + 30.0,
                    legend_y + 6.0,
                    3.0,
                    color,
                ))
                .with_circle(
                    CirclePrimitive::new(legend_x + 15.0, legend_y + 6.0, 4.0, color)
                        .with_stroke(Color::rgb(1.0, 1.0, 1.0), 2.0),
                )
                .with_text(TextPrimitive::new(
                    series.label(),
                    legend_x + 38.0,
                    legend_y,
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
