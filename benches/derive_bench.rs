use criterion::{Criterion, criterion_group, criterion_main};
use mortality_dashboard::core::{
    FilterSnapshot, GenderSelection, Month, MortalityRecord, YearRange,
};
use mortality_dashboard::render::NullRenderer;
use mortality_dashboard::view::bar::BarView;
use mortality_dashboard::view::heatmap::HeatmapView;
use mortality_dashboard::view::{ChartView, ContainerMeasure};
use mortality_dashboard::{DashboardConfig, DashboardEngine, ViewMeasures};
use std::hint::black_box;

fn synthetic_records(years: i32) -> Vec<MortalityRecord> {
    (0..years)
        .flat_map(|offset| {
            Month::ALL.iter().map(move |month| {
                let base = (offset as u32 % 7) * 3 + month.index() as u32;
                MortalityRecord {
                    year: 2007 + offset,
                    month: *month,
                    total: 20 + base,
                    male: 10 + base / 2,
                    female: 8 + base / 3,
                    trans: 1 + base / 10,
                }
            })
        })
        .collect()
}

fn full_span_snapshot(records: &[MortalityRecord]) -> FilterSnapshot {
    let first = records.first().expect("non-empty").year;
    let last = records.last().expect("non-empty").year;
    FilterSnapshot {
        year_range: YearRange::new(first, last),
        genders: GenderSelection::default(),
    }
}

fn bench_heatmap_derive(c: &mut Criterion) {
    let records = synthetic_records(18);
    let snapshot = full_span_snapshot(&records);
    let measure = ContainerMeasure::measured(1000.0, 1600.0);
    let mut view = HeatmapView::new();
    view.initialize(&measure, &records, snapshot).expect("initialize");

    c.bench_function("heatmap_derive_18y", |b| {
        b.iter(|| {
            view.derive_display_data(black_box(&records), black_box(snapshot));
        })
    });
}

fn bench_bar_derive_and_render(c: &mut Criterion) {
    let records = synthetic_records(18);
    let snapshot = full_span_snapshot(&records);
    let measure = ContainerMeasure::measured(1000.0, 1600.0);
    let mut view = BarView::new();
    view.initialize(&measure, &records, snapshot).expect("initialize");

    c.bench_function("bar_derive_render_18y", |b| {
        b.iter(|| {
            view.derive_display_data(black_box(&records), black_box(snapshot));
            let _ = view.render().expect("render should succeed");
        })
    });
}

fn bench_engine_fan_out(c: &mut Criterion) {
    let records = synthetic_records(18);
    let measures = ViewMeasures::uniform(ContainerMeasure::measured(1000.0, 1600.0));
    let mut engine = DashboardEngine::new(
        NullRenderer::new(),
        records,
        DashboardConfig::new(measures),
    )
    .expect("engine init");

    let mut narrow = true;
    c.bench_function("engine_fan_out_18y", |b| {
        b.iter(|| {
            // Alternate the range so every pass is a real filter change.
            if narrow {
                engine.set_year_range(2010, 2018).expect("set range");
            } else {
                engine.set_year_range(2007, 2024).expect("set range");
            }
            narrow = !narrow;
        })
    });
}

criterion_group!(
    benches,
    bench_heatmap_derive,
    bench_bar_derive_and_render,
    bench_engine_fan_out
);
criterion_main!(benches);
