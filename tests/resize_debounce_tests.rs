use std::time::{Duration, Instant};

use mortality_dashboard::core::{Month, MortalityRecord};
use mortality_dashboard::interaction::ResizeDebouncer;
use mortality_dashboard::render::{NullRenderer, RegionId};
use mortality_dashboard::view::ContainerMeasure;
use mortality_dashboard::{DashboardConfig, DashboardEngine, ViewMeasures};

fn record(year: i32, month: Month, total: u32) -> MortalityRecord {
    MortalityRecord {
        year,
        month,
        total,
        male: total / 2,
        female: total / 3,
        trans: total / 10,
    }
}

fn engine() -> DashboardEngine<NullRenderer> {
    let measures = ViewMeasures::uniform(ContainerMeasure::measured(1000.0, 1600.0));
    DashboardEngine::new(
        NullRenderer::new(),
        vec![record(2019, Month::January, 10), record(2020, Month::January, 40)],
        DashboardConfig::new(measures),
    )
    .expect("engine init")
}

#[test]
fn debouncer_replaces_pending_schedules_last_write_wins() {
    let start = Instant::now();
    let mut debounce = ResizeDebouncer::new(Duration::from_millis(250), 50.0, 1600.0);

    debounce.observe(1200.0, start);
    debounce.observe(900.0, start + Duration::from_millis(200));

    // The replaced schedule never fires at its original deadline.
    assert_eq!(debounce.fire_due(start + Duration::from_millis(260)), None);
    assert!(debounce.has_pending());
    assert_eq!(debounce.fire_due(start + Duration::from_millis(460)), Some(900.0));
    assert!(!debounce.has_pending());
}

#[test]
fn debouncer_swallows_sub_threshold_deltas() {
    let start = Instant::now();
    let mut debounce = ResizeDebouncer::new(Duration::from_millis(250), 50.0, 1600.0);

    debounce.observe(1560.0, start);
    assert_eq!(debounce.fire_due(start + Duration::from_millis(300)), None);
    assert_eq!(debounce.applied_width(), 1600.0);

    // The boundary delta is still noise; only a larger one passes.
    debounce.observe(1550.0, start);
    assert_eq!(debounce.fire_due(start + Duration::from_millis(600)), None);
    debounce.observe(1540.0, start);
    assert_eq!(
        debounce.fire_due(start + Duration::from_millis(900)),
        Some(1540.0)
    );
}

#[test]
fn engine_resize_waits_for_the_debounce_window() {
    let mut engine = engine();
    let now = Instant::now();
    let smaller = ViewMeasures::uniform(ContainerMeasure::measured(700.0, 1200.0));

    engine.observe_resize(smaller, 1200.0, now);
    let fired_early = engine
        .fire_due_resize(now + Duration::from_millis(100))
        .expect("early fire");
    assert!(!fired_early);

    let fired = engine
        .fire_due_resize(now + Duration::from_millis(300))
        .expect("due fire");
    assert!(fired);
}

#[test]
fn engine_resize_relayouts_without_rederiving() {
    let mut engine = engine();
    let before_width = engine
        .renderer()
        .last_frame(RegionId::Heatmap)
        .expect("frame")
        .viewport
        .width;
    let display_before: Vec<_> = engine.bar().display_data().to_vec();

    let now = Instant::now();
    let smaller = ViewMeasures::uniform(ContainerMeasure::measured(700.0, 1200.0));
    engine.observe_resize(smaller, 1200.0, now);
    let fired = engine
        .fire_due_resize(now + Duration::from_millis(300))
        .expect("due fire");
    assert!(fired);

    let after_width = engine
        .renderer()
        .last_frame(RegionId::Heatmap)
        .expect("frame")
        .viewport
        .width;
    assert!(after_width < before_width);
    // Scales moved; the derived data did not.
    assert_eq!(engine.bar().display_data(), display_before.as_slice());
}

#[test]
fn engine_resize_ignores_noise_deltas() {
    let mut engine = engine();
    let now = Instant::now();
    let nearly_same = ViewMeasures::uniform(ContainerMeasure::measured(995.0, 1580.0));

    engine.observe_resize(nearly_same, 1580.0, now);
    let fired = engine
        .fire_due_resize(now + Duration::from_millis(300))
        .expect("due fire");
    assert!(!fired);
}

#[test]
fn resized_views_keep_their_scenes_keyed_in_place() {
    let mut engine = engine();
    let now = Instant::now();
    let smaller = ViewMeasures::uniform(ContainerMeasure::measured(700.0, 1200.0));
    engine.observe_resize(smaller, 1200.0, now);
    engine
        .fire_due_resize(now + Duration::from_millis(300))
        .expect("due fire");

    // A relayout re-targets existing elements rather than rebuilding them.
    for region in [RegionId::Heatmap, RegionId::BarChart, RegionId::LineChart, RegionId::BrushStrip] {
        let stats = engine.last_stats(region).expect("stats recorded");
        assert_eq!(stats.entered, 0, "region {region:?} entered");
        assert_eq!(stats.exited, 0, "region {region:?} exited");
    }
}
