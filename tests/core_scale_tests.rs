use chrono::NaiveDate;
use mortality_dashboard::core::{BandScale, CalendarScale, LinearScale, nice_domain};

fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid date")
}

#[test]
fn linear_scale_round_trip_within_tolerance() {
    let scale = LinearScale::new(10.0, 110.0)
        .expect("valid domain")
        .with_range(0.0, 1000.0)
        .expect("valid range");

    let original = 42.5;
    let px = scale.map(original);
    let recovered = scale.invert(px);
    assert!((recovered - original).abs() <= 1e-9);
}

#[test]
fn linear_scale_supports_inverted_pixel_ranges() {
    // y axes grow downward, so the pixel range is descending.
    let scale = LinearScale::new(0.0, 100.0)
        .expect("valid domain")
        .with_range(600.0, 40.0)
        .expect("valid range");

    assert_eq!(scale.map(0.0), 600.0);
    assert_eq!(scale.map(100.0), 40.0);
    assert!((scale.invert(320.0) - 50.0).abs() <= 1e-9);
}

#[test]
fn degenerate_domains_are_rejected() {
    assert!(LinearScale::new(5.0, 5.0).is_err());
    assert!(LinearScale::new(f64::NAN, 1.0).is_err());
    assert!(
        LinearScale::new(0.0, 1.0)
            .expect("valid domain")
            .with_range(3.0, 3.0)
            .is_err()
    );
}

#[test]
fn even_ticks_pin_both_domain_endpoints() {
    let scale = LinearScale::new(0.0, 37.0).expect("valid domain");
    let ticks = scale.even_ticks(6);

    assert_eq!(ticks.len(), 6);
    assert_eq!(ticks[0], 0.0);
    assert_eq!(*ticks.last().expect("non-empty"), 37.0);
}

#[test]
fn nice_ticks_land_on_step_multiples() {
    let scale = LinearScale::new(0.0, 97.0).expect("valid domain");
    let ticks = scale.nice_ticks(10);

    assert!(!ticks.is_empty());
    assert!(ticks.windows(2).all(|pair| pair[1] > pair[0]));
    assert!(ticks.iter().all(|tick| *tick >= 0.0 && *tick <= 97.0));
    assert!(ticks.iter().all(|tick| tick % 10.0 == 0.0));
}

#[test]
fn nice_domain_covers_the_raw_extent() {
    let (min, max) = nice_domain(3.0, 96.3, 10);
    assert!(min <= 3.0);
    assert!(max >= 96.3);
    assert_eq!(max, 100.0);
}

#[test]
fn band_scale_partitions_an_ascending_range() {
    let scale = BandScale::new(12, 60.0, 960.0, 0.0).expect("valid bands");
    assert_eq!(scale.step(), 75.0);
    assert_eq!(scale.position(0), 60.0);
    assert_eq!(scale.bandwidth(), 75.0);
    assert_eq!(scale.index_at(60.0), Some(0));
    assert_eq!(scale.index_at(500.0), Some(5));
    assert_eq!(scale.index_at(59.0), None);
    assert_eq!(scale.index_at(961.0), None);
}

#[test]
fn band_scale_padding_shrinks_the_bands() {
    let padded = BandScale::new(10, 0.0, 100.0, 0.2).expect("valid bands");
    assert_eq!(padded.step(), 10.0);
    assert_eq!(padded.bandwidth(), 8.0);
    assert_eq!(padded.position(0), 1.0);
}

#[test]
fn band_scale_rejects_bad_inputs() {
    assert!(BandScale::new(0, 0.0, 100.0, 0.0).is_err());
    assert!(BandScale::new(5, 100.0, 0.0, 0.0).is_err());
    assert!(BandScale::new(5, 0.0, 100.0, 1.0).is_err());
}

#[test]
fn calendar_scale_maps_domain_edges_to_range_edges() {
    let scale = CalendarScale::new(date(2019, 1), date(2020, 1))
        .expect("valid scale")
        .with_range(60.0, 860.0)
        .expect("valid range");

    assert_eq!(scale.map(date(2019, 1)), 60.0);
    assert_eq!(scale.map(date(2020, 1)), 860.0);
    assert!(scale.contains(date(2019, 7)));
    assert!(!scale.contains(date(2020, 2)));
}

#[test]
fn calendar_scale_orders_swapped_dates_and_widens_a_single_point() {
    let swapped = CalendarScale::new(date(2020, 1), date(2019, 1)).expect("valid scale");
    assert_eq!(swapped.domain(), (date(2019, 1), date(2020, 1)));

    // A single-date extent stays invertible by widening one month.
    let single = CalendarScale::new(date(2020, 1), date(2020, 1)).expect("valid scale");
    assert_eq!(single.domain(), (date(2020, 1), date(2020, 2)));
}
