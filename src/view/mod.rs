//! Chart views and the shared derive/render contract.
//!
//! Every view follows the same three-phase lifecycle: initialize once
//! against a measured container, re-derive its display data from the shared
//! records under the current filter snapshot, and render by reconciling the
//! derived data against its retained keyed scene.

pub mod bar;
pub mod brush;
pub mod drilldown;
pub mod heatmap;
pub mod legend;
pub mod line;
pub mod reconcile;
pub mod tooltip;

pub use reconcile::{ElementKey, KeyedScene, KeyedUpdate, ReconcilePlan, ReconcileStats, SeriesId};
pub use tooltip::{Tooltip, TooltipRow, TooltipState};

use serde::{Deserialize, Serialize};

use crate::core::{FilterSnapshot, Gender, Margin, MortalityRecord, Viewport};
use crate::error::{DashboardError, DashboardResult};
use crate::render::{Color, RenderFrame};

/// Widest drawing surface a view will allocate.
pub const MAX_SURFACE_WIDTH: f64 = 1200.0;
/// Viewport share used when neither container nor ancestor is measurable.
pub const VIEWPORT_FALLBACK_RATIO: f64 = 0.85;

/// Measured geometry of one host-page mount region.
///
/// A region behind an inactive tab measures zero wide; the width resolution
/// chain then falls back to the nearest measurable ancestor and finally to a
/// fraction of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerMeasure {
    present: bool,
    container_width: Option<f64>,
    ancestor_width: Option<f64>,
    pub viewport_width: f64,
}

impl ContainerMeasure {
    /// A container measured at a usable width.
    #[must_use]
    pub fn measured(container_width: f64, viewport_width: f64) -> Self {
        Self {
            present: true,
            container_width: Some(container_width),
            ancestor_width: None,
            viewport_width,
        }
    }

    /// A container that exists but measures zero wide (hidden tab), with an
    /// optionally measurable ancestor.
    #[must_use]
    pub fn hidden(ancestor_width: Option<f64>, viewport_width: f64) -> Self {
        Self {
            present: true,
            container_width: None,
            ancestor_width,
            viewport_width,
        }
    }

    /// No such container exists in the host page at all.
    #[must_use]
    pub fn missing(viewport_width: f64) -> Self {
        Self {
            present: false,
            container_width: None,
            ancestor_width: None,
            viewport_width,
        }
    }

    /// Resolves the drawing-surface width through the fallback chain:
    /// container width, nearest ancestor width, then a viewport fraction.
    /// Fails fast when the container does not exist.
    pub fn resolve_width(&self, view: &'static str) -> DashboardResult<f64> {
        if !self.present {
            return Err(DashboardError::MissingContainer(view));
        }
        let fallback = MAX_SURFACE_WIDTH.min(self.viewport_width * VIEWPORT_FALLBACK_RATIO);
        let width = self
            .container_width
            .filter(|width| width.is_finite() && *width > 0.0)
            .or_else(|| {
                self.ancestor_width
                    .filter(|width| width.is_finite() && *width > 0.0)
            })
            .unwrap_or(fallback);
        Ok(width)
    }
}

/// Resolved plot geometry for one view: inner plot size plus margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewLayout {
    pub margin: Margin,
    pub width: f64,
    pub height: f64,
}

impl ViewLayout {
    /// Builds a layout from a resolved surface width; `height_for` maps the
    /// inner plot width to an inner plot height.
    pub fn resolve(
        view: &'static str,
        measure: &ContainerMeasure,
        margin: Margin,
        height_for: impl Fn(f64) -> f64,
    ) -> DashboardResult<Self> {
        let surface_width = measure.resolve_width(view)?;
        let width = (surface_width - margin.horizontal()).max(1.0);
        let height = height_for(width).max(1.0);
        Ok(Self {
            margin,
            width,
            height,
        })
    }

    /// Full drawing-surface viewport including margins.
    #[must_use]
    pub fn surface(&self) -> Viewport {
        Viewport::new(
            (self.width + self.margin.horizontal()).round().max(1.0) as u32,
            (self.height + self.margin.vertical()).round().max(1.0) as u32,
        )
    }
}

/// Fire-and-forget transition descriptor layered on a synchronous render.
///
/// Re-emitting a descriptor for a key re-targets that element's in-flight
/// animation; nothing is queued and nothing needs cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationKind {
    FadeIn,
    FadeOut,
    /// Tween a persisting element to its new geometry and color.
    Morph,
    /// Grow upward from a baseline or stack-base offset.
    GrowFromBase { base_y: f64 },
    /// Squash down to a baseline or stack-base offset, then remove.
    CollapseToBase { base_y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSpec {
    pub key: ElementKey,
    pub kind: AnimationKind,
    pub delay_ms: u32,
    pub duration_ms: u32,
}

/// Output of one view render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    pub frame: RenderFrame,
    pub animations: Vec<AnimationSpec>,
    pub stats: ReconcileStats,
}

/// Visual payload that supports pointer hit-testing.
pub trait HitShape {
    fn contains(&self, x: f64, y: f64) -> bool;
}

impl<T: Clone + HitShape> KeyedScene<T> {
    /// Topmost element under the pointer (last in paint order wins).
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Option<(ElementKey, &T)> {
        self.iter().rev().find(|(_, shape)| shape.contains(x, y))
    }
}

/// Contract shared by the four chart views.
pub trait ChartView {
    fn name(&self) -> &'static str;

    /// Allocates the persistent drawing surface. Called exactly once per view
    /// instance; a second call is an error rather than a duplicated scene.
    fn initialize(
        &mut self,
        measure: &ContainerMeasure,
        records: &[MortalityRecord],
        snapshot: FilterSnapshot,
    ) -> DashboardResult<()>;

    /// Recomputes the layout after a size change. Scales and label positions
    /// move; display data is not re-derived.
    fn relayout(&mut self, measure: &ContainerMeasure) -> DashboardResult<()>;

    /// Pure recomputation of display records from (records, snapshot).
    fn derive_display_data(&mut self, records: &[MortalityRecord], snapshot: FilterSnapshot);

    /// Reconciles display records against the retained scene and builds the
    /// frame plus animation descriptors for this pass.
    fn render(&mut self) -> DashboardResult<RenderOutput>;

    /// Tears down the view's transient overlay, if any.
    fn clear_tooltip(&mut self);
}

/// Fill color of one gender category, shared by every view.
#[must_use]
pub fn gender_color(gender: Gender) -> Color {
    match gender {
        Gender::Male => Color::from_rgb8(79, 136, 202),
        Gender::Female => Color::from_rgb8(212, 114, 191),
        Gender::Trans => Color::from_rgb8(127, 35, 189),
    }
}

/// Stroke/fill color of one line-chart series.
#[must_use]
pub fn series_color(series: SeriesId) -> Color {
    match series {
        SeriesId::Gender(gender) => gender_color(gender),
        SeriesId::Total => Color::from_rgb8(45, 93, 47),
    }
}

/// Neutral-to-accent ramp endpoints of the heatmap color scale.
#[must_use]
pub fn heat_ramp() -> (Color, Color) {
    (Color::rgb(1.0, 1.0, 1.0), Color::from_rgb8(123, 26, 40))
}

/// Muted color used for axis lines and labels.
#[must_use]
pub fn axis_color() -> Color {
    Color::from_rgb8(85, 85, 85)
}

#[cfg(test)]
mod tests {
    use super::{ContainerMeasure, MAX_SURFACE_WIDTH};

    #[test]
    fn width_resolution_prefers_the_container() {
        let measure = ContainerMeasure::measured(900.0, 1600.0);
        assert_eq!(measure.resolve_width("heatmap").expect("present"), 900.0);
    }

    #[test]
    fn hidden_container_falls_back_to_ancestor_then_viewport() {
        let with_ancestor = ContainerMeasure::hidden(Some(800.0), 1600.0);
        assert_eq!(with_ancestor.resolve_width("heatmap").expect("present"), 800.0);

        let without_ancestor = ContainerMeasure::hidden(None, 1600.0);
        assert_eq!(
            without_ancestor.resolve_width("heatmap").expect("present"),
            MAX_SURFACE_WIDTH.min(1600.0 * 0.85)
        );
    }

    #[test]
    fn missing_container_fails_fast() {
        let measure = ContainerMeasure::missing(1600.0);
        assert!(measure.resolve_width("heatmap").is_err());
    }
}
