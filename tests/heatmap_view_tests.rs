use mortality_dashboard::core::{
    FilterSnapshot, Gender, GenderSelection, Month, MortalityRecord, YearRange,
};
use mortality_dashboard::view::heatmap::HeatmapView;
use mortality_dashboard::view::{AnimationKind, ChartView, ContainerMeasure, ElementKey};

fn record(year: i32, month: Month, total: u32, male: u32, female: u32, trans: u32) -> MortalityRecord {
    MortalityRecord {
        year,
        month,
        total,
        male,
        female,
        trans,
    }
}

fn sample_records() -> Vec<MortalityRecord> {
    vec![
        record(2019, Month::January, 10, 6, 3, 1),
        record(2019, Month::February, 8, 4, 3, 1),
        record(2020, Month::January, 40, 30, 8, 2),
    ]
}

fn snapshot(min: i32, max: i32) -> FilterSnapshot {
    FilterSnapshot {
        year_range: YearRange::new(min, max),
        genders: GenderSelection::default(),
    }
}

fn initialized_view(records: &[MortalityRecord], snap: FilterSnapshot) -> HeatmapView {
    let measure = ContainerMeasure::measured(1000.0, 1600.0);
    let mut view = HeatmapView::new();
    view.initialize(&measure, records, snap).expect("initialize");
    view
}

#[test]
fn double_initialization_is_rejected() {
    let records = sample_records();
    let snap = snapshot(2019, 2020);
    let measure = ContainerMeasure::measured(1000.0, 1600.0);

    let mut view = HeatmapView::new();
    view.initialize(&measure, &records, snap).expect("first initialize");
    assert!(view.initialize(&measure, &records, snap).is_err());
}

#[test]
fn render_before_initialize_is_rejected() {
    let mut view = HeatmapView::new();
    view.derive_display_data(&sample_records(), snapshot(2019, 2020));
    assert!(view.render().is_err());
}

#[test]
fn derivation_is_deterministic() {
    let records = sample_records();
    let snap = snapshot(2019, 2020);
    let mut view = initialized_view(&records, snap);

    view.derive_display_data(&records, snap);
    let first: Vec<_> = view.display_data().to_vec();
    view.derive_display_data(&records, snap);

    assert_eq!(view.display_data(), first.as_slice());
    assert_eq!(view.displayed_years(), &[2019, 2020]);
}

#[test]
fn filtered_value_follows_the_gender_selection() {
    let records = sample_records();
    let mut snap = snapshot(2019, 2020);
    snap.genders.set_enabled(Gender::Male, false);

    let mut view = initialized_view(&records, snap);
    view.derive_display_data(&records, snap);

    let jan_2020 = view
        .display_data()
        .iter()
        .find(|cell| cell.record.year == 2020 && cell.record.month == Month::January)
        .expect("cell present");
    assert_eq!(jan_2020.filtered_value, 8 + 2);
    assert_eq!(view.color_domain_max(), 10.0);
}

#[test]
fn all_zero_cells_fall_back_to_a_unit_color_domain() {
    let records = vec![record(2019, Month::January, 5, 0, 0, 0)];
    let snap = snapshot(2019, 2019);
    let mut view = initialized_view(&records, snap);

    view.derive_display_data(&records, snap);
    assert_eq!(view.color_domain_max(), 1.0);
}

#[test]
fn first_render_sweeps_in_with_staggered_delays() {
    let records = sample_records();
    let snap = snapshot(2019, 2020);
    let mut view = initialized_view(&records, snap);

    view.derive_display_data(&records, snap);
    let output = view.render().expect("render");

    assert_eq!(output.stats.entered, 3);
    let delay_of = |year: i32, month: Month| {
        output
            .animations
            .iter()
            .find(|spec| spec.key == ElementKey::Cell { year, month })
            .expect("animation present")
            .delay_ms
    };
    // Delay grows with (year index * 12 + month index).
    assert_eq!(delay_of(2019, Month::January), 0);
    assert_eq!(delay_of(2019, Month::February), 15);
    assert_eq!(delay_of(2020, Month::January), 12 * 15);
}

#[test]
fn the_sweep_is_consumed_by_the_first_render() {
    let records = sample_records();
    let narrow = snapshot(2019, 2019);
    let mut view = initialized_view(&records, narrow);

    view.derive_display_data(&records, narrow);
    let _ = view.render().expect("first render");

    // Widening the range makes the 2020 cell enter, now without stagger.
    let wide = snapshot(2019, 2020);
    view.derive_display_data(&records, wide);
    let output = view.render().expect("second render");

    assert_eq!(output.stats.entered, 1);
    let entering = output
        .animations
        .iter()
        .find(|spec| {
            spec.key
                == ElementKey::Cell {
                    year: 2020,
                    month: Month::January,
                }
        })
        .expect("entering animation");
    assert_eq!(entering.kind, AnimationKind::FadeIn);
    assert_eq!(entering.delay_ms, 0);
    assert_eq!(entering.duration_ms, 0);
}

#[test]
fn unchanged_filter_rerender_only_updates_in_place() {
    let records = sample_records();
    let snap = snapshot(2019, 2020);
    let mut view = initialized_view(&records, snap);

    view.derive_display_data(&records, snap);
    let _ = view.render().expect("first render");

    view.derive_display_data(&records, snap);
    let output = view.render().expect("second render");
    assert_eq!(output.stats.entered, 0);
    assert_eq!(output.stats.exited, 0);
    assert_eq!(output.stats.updated, 3);
}

#[test]
fn exiting_cells_fade_out_instead_of_lingering() {
    let records = sample_records();
    let wide = snapshot(2019, 2020);
    let mut view = initialized_view(&records, wide);
    view.derive_display_data(&records, wide);
    let _ = view.render().expect("first render");

    let narrow = snapshot(2019, 2019);
    view.derive_display_data(&records, narrow);
    let output = view.render().expect("second render");

    assert_eq!(output.stats.exited, 1);
    assert!(output.animations.iter().any(|spec| {
        spec.kind == AnimationKind::FadeOut
            && spec.key
                == ElementKey::Cell {
                    year: 2020,
                    month: Month::January,
                }
    }));
    // The exited cell is gone from the frame, not orphaned.
    assert_eq!(output.frame.rects.len(), 2);
}

#[test]
fn hover_owns_at_most_one_tooltip() {
    let records = sample_records();
    let snap = snapshot(2019, 2020);
    let mut view = initialized_view(&records, snap);
    view.derive_display_data(&records, snap);
    let _ = view.render().expect("render");

    // Grid rows run newest-first from the top: 2020 on top, 2019 below.
    assert_eq!(view.cell_at(100.0, 100.0), Some((2020, Month::January)));
    view.hover(100.0, 100.0);
    let first = view.tooltip().expect("tooltip alive");
    assert_eq!(first.title, "January 2020");
    assert_eq!(first.rows.len(), 4);

    view.hover(100.0, 300.0);
    let second = view.tooltip().expect("tooltip alive");
    assert_eq!(second.title, "January 2019");

    view.hover(10.0, 10.0);
    assert!(view.tooltip().is_none());
}

#[test]
fn render_drops_tooltips_of_cells_that_left_the_filter() {
    let records = sample_records();
    let wide = snapshot(2019, 2020);
    let mut view = initialized_view(&records, wide);
    view.derive_display_data(&records, wide);
    let _ = view.render().expect("render");

    view.hover(100.0, 100.0);
    assert!(view.tooltip().is_some());

    let narrow = snapshot(2019, 2019);
    view.derive_display_data(&records, narrow);
    let _ = view.render().expect("re-render");
    assert!(view.tooltip().is_none());
}

#[test]
fn legend_reflects_the_current_color_domain() {
    let records = sample_records();
    let snap = snapshot(2019, 2020);
    let mut view = initialized_view(&records, snap);
    view.derive_display_data(&records, snap);

    let legend = view.legend_frame().expect("legend frame");
    let labels: Vec<&str> = legend.texts.iter().map(|text| text.text.as_str()).collect();
    assert!(labels.contains(&"40"));
    assert!(labels.contains(&"0"));
}
