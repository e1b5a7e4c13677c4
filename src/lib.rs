//! mortality-dashboard: a cross-filtered charting dashboard engine.
//!
//! One shared filter state (year range + gender toggles) fans out to four
//! independently stateful chart views, each of which re-derives its display
//! data and reconciles its rendered elements through stable identity keys.
//! Rasterization stays behind the [`render::Renderer`] trait.

pub mod api;
pub mod core;
pub mod data;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;
pub mod view;

pub use api::{DashboardConfig, DashboardEngine, ViewMeasures};
pub use error::{DashboardError, DashboardResult};
