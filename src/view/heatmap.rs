use smallvec::SmallVec;

use crate::core::{BandScale, FilterSnapshot, GenderSelection, Margin, Month, MortalityRecord};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{Color, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::view::reconcile::{ElementKey, KeyedScene};
use crate::view::tooltip::{Tooltip, TooltipRow, TooltipState};
use crate::view::{
    AnimationKind, AnimationSpec, ChartView, ContainerMeasure, HitShape, RenderOutput, ViewLayout,
    axis_color, heat_ramp, legend,
};

const VIEW_NAME: &str = "heatmap";
const MARGIN: Margin = Margin::new(60.0, 40.0, 60.0, 60.0);
const CELL_PADDING_RATIO: f64 = 0.01;
const SWEEP_DELAY_PER_CELL_MS: u32 = 15;
const SWEEP_FADE_MS: u32 = 300;
const UPDATE_TWEEN_MS: u32 = 600;
const EXIT_FADE_MS: u32 = 300;

/// One displayed grid cell: the source record plus the gender-filtered value
/// that drives its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub record: MortalityRecord,
    pub filtered_value: u32,
}

/// Retained visual state of one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellVisual {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Color,
}

impl HitShape for CellVisual {
    fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// One-shot sweep-animation state machine: the staggered first-load fade is
/// consumed by the first render pass and never re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadPhase {
    Uninitialized,
    Rendered,
}

/// Year-by-month grid colored by the gender-filtered monthly death count.
#[derive(Debug)]
pub struct HeatmapView {
    layout: Option<ViewLayout>,
    display: Vec<HeatmapCell>,
    years: Vec<i32>,
    genders: GenderSelection,
    color_domain_max: f64,
    scene: KeyedScene<CellVisual>,
    tooltip: TooltipState,
    load_phase: LoadPhase,
}

impl Default for HeatmapView {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatmapView {
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: None,
            display: Vec::new(),
            years: Vec::new(),
            genders: GenderSelection::default(),
            color_domain_max: 1.0,
            scene: KeyedScene::new(),
            tooltip: TooltipState::new(),
            load_phase: LoadPhase::Uninitialized,
        }
    }

    #[must_use]
    pub fn display_data(&self) -> &[HeatmapCell] {
        &self.display
    }

    /// Years present under the current filter, ascending.
    #[must_use]
    pub fn displayed_years(&self) -> &[i32] {
        &self.years
    }

    /// Upper bound of the color-scale domain used by the last derivation.
    #[must_use]
    pub fn color_domain_max(&self) -> f64 {
        self.color_domain_max
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.active()
    }

    /// Identity of the cell under the pointer, if any.
    #[must_use]
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(i32, Month)> {
        match self.scene.hit_test(x, y)? {
            (ElementKey::Cell { year, month }, _) => Some((year, month)),
            _ => None,
        }
    }

    /// Shows the hover tooltip for the cell under the pointer; clears it when
    /// the pointer is over empty grid space.
    pub fn hover(&mut self, x: f64, y: f64) {
        let Some((year, month)) = self.cell_at(x, y) else {
            self.tooltip.hide();
            return;
        };
        let Some(cell) = self
            .display
            .iter()
            .find(|cell| cell.record.year == year && cell.record.month == month)
            .copied()
        else {
            self.tooltip.hide();
            return;
        };

        let mut rows: SmallVec<[TooltipRow; 4]> = SmallVec::new();
        rows.push(TooltipRow::new(
            "Total deaths",
            cell.filtered_value.to_string(),
        ));
        for gender in self.genders.enabled() {
            rows.push(TooltipRow::new(
                gender.label(),
                gender.count_in(&cell.record).to_string(),
            ));
        }

        self.tooltip.show(Tooltip {
            key: ElementKey::Cell { year, month },
            title: format!("{month} {year}"),
            rows,
            x: x + 15.0,
            y: y - 35.0,
        });
    }

    /// Gradient legend for the current color-scale domain, rebuilt in full.
    pub fn legend_frame(&self) -> DashboardResult<RenderFrame> {
        let (low, high) = heat_ramp();
        legend::build_gradient_legend(self.color_domain_max, low, high)
    }

    fn layout(&self) -> DashboardResult<ViewLayout> {
        self.layout.ok_or(DashboardError::NotInitialized(VIEW_NAME))
    }

    fn resolve_layout(measure: &ContainerMeasure) -> DashboardResult<ViewLayout> {
        ViewLayout::resolve(VIEW_NAME, measure, MARGIN, |width| {
            (width * 0.5).clamp(400.0, 700.0)
        })
    }
}

impl ChartView for HeatmapView {
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
            .map(|record| HeatmapCell {
                record: *record,
                filtered_value: snapshot.genders.filtered_value(record),
            })
            .collect();

        self.years = self.display.iter().map(|cell| cell.record.year).collect::<Vec<_>>();
        self.years.sort_unstable();
        self.years.dedup();

        let max = self
            .display
            .iter()
            .map(|cell| cell.filtered_value)
            .max()
            .unwrap_or(0);
        // A degenerate all-zero domain would collapse the color ramp.
        self.color_domain_max = if max == 0 { 1.0 } else { f64::from(max) };
    }

    fn render(&mut self) -> DashboardResult<RenderOutput> {
        let layout = self.layout()?;
        let (low, high) = heat_ramp();

        let x_scale = BandScale::new(
            Month::ALL.len(),
            layout.margin.left,
            layout.margin.left + layout.width,
            CELL_PADDING_RATIO,
        )?;

        let mut targets = Vec::with_capacity(self.display.len());
        if !self.years.is_empty() {
            let y_scale = BandScale::new(
                self.years.len(),
                layout.margin.top,
                layout.margin.top + layout.height,
                CELL_PADDING_RATIO,
            )?;

            for cell in &self.display {
                let year_index = self
                    .years
                    .binary_search(&cell.record.year)
                    .unwrap_or_default();
                // Earliest year sits at the bottom of the grid.
                let band_index = self.years.len() - 1 - year_index;
                let t = f64::from(cell.filtered_value) / self.color_domain_max;
                targets.push((
                    ElementKey::Cell {
                        year: cell.record.year,
                        month: cell.record.month,
                    },
                    CellVisual {
                        x: x_scale.position(cell.record.month.index()),
                        y: y_scale.position(band_index),
                        width: x_scale.bandwidth(),
                        height: y_scale.bandwidth(),
                        fill: low.lerp(high, t),
                    },
                ));
            }
        }

        let plan = self.scene.reconcile(targets);
        let stats = plan.stats();

        let mut animations = Vec::with_capacity(stats.entered + stats.updated + stats.exited);
        for (key, _) in &plan.enter {
            let delay_ms = match (self.load_phase, key) {
                (LoadPhase::Uninitialized, ElementKey::Cell { year, month }) => {
                    let year_index = self.years.binary_search(year).unwrap_or_default();
                    (year_index * 12 + month.index()) as u32 * SWEEP_DELAY_PER_CELL_MS
                }
                _ => 0,
            };
            animations.push(AnimationSpec {
                key: *key,
                kind: AnimationKind::FadeIn,
                delay_ms,
                duration_ms: if self.load_phase == LoadPhase::Uninitialized {
                    SWEEP_FADE_MS
                } else {
                    0
                },
            });
        }
        for update in &plan.update {
            animations.push(AnimationSpec {
                key: update.key,
                kind: AnimationKind::Morph,
                delay_ms: 0,
                duration_ms: UPDATE_TWEEN_MS,
            });
        }
        for (key, _) in &plan.exit {
            animations.push(AnimationSpec {
                key: *key,
                kind: AnimationKind::FadeOut,
                delay_ms: 0,
                duration_ms: EXIT_FADE_MS,
            });
        }
        // The sweep is consumed by the first pass and never re-armed.
        self.load_phase = LoadPhase::Rendered;

        self.tooltip.retain_if_alive(|key| self.scene.contains(key));

        let mut frame = RenderFrame::new(layout.surface());
        for (_, visual) in self.scene.iter() {
            frame = frame.with_rect(RectPrimitive::filled(
                visual.x,
                visual.y,
                visual.width,
                visual.height,
                visual.fill,
            ));
        }
        for month in Month::ALL {
            frame = frame.with_text(TextPrimitive::new(
                month.name(),
                x_scale.position(month.index()) + x_scale.bandwidth() / 2.0,
                layout.margin.top - 18.0,
                11.0,
                axis_color(),
                TextHAlign::Center,
            ));
        }
        if !self.years.is_empty() {
            let y_scale = BandScale::new(
                self.years.len(),
                layout.margin.top,
                layout.margin.top + layout.height,
                CELL_PADDING_RATIO,
            )?;
            for (index, year) in self.years.iter().enumerate() {
                let band_index = self.years.len() - 1 - index;
                frame = frame.with_text(TextPrimitive::new(
                    year.to_string(),
                    layout.margin.left - 8.0,
                    y_scale.position(band_index) + y_scale.bandwidth() / 2.0,
                    11.0,
                    axis_color(),
                    TextHAlign::Right,
                ));
            }
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
