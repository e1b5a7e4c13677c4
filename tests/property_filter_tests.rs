use mortality_dashboard::core::{
    FilterState, Gender, GenderSelection, Month, MortalityRecord, YearRange,
};
use proptest::prelude::*;

fn record(year: i32, month_index: usize, male: u32, female: u32, trans: u32) -> MortalityRecord {
    MortalityRecord {
        year,
        month: Month::ALL[month_index % 12],
        total: male + female + trans,
        male,
        female,
        trans,
    }
}

proptest! {
    #[test]
    fn year_range_orders_any_bounds(a in -5000i32..5000, b in -5000i32..5000) {
        let range = YearRange::new(a, b);
        prop_assert!(range.min() <= range.max());
        prop_assert_eq!(range.min(), a.min(b));
        prop_assert_eq!(range.max(), a.max(b));
    }

    #[test]
    fn set_year_range_always_lands_inside_the_domain(
        a in -5000i32..5000,
        b in -5000i32..5000,
        span_start in 1990i32..2020,
        span_len in 0i32..30
    ) {
        let records = [
            record(span_start, 0, 1, 1, 1),
            record(span_start + span_len, 5, 2, 2, 2),
        ];
        let mut state = FilterState::from_records(&records).expect("non-empty records");

        state.set_year_range(a, b);
        let range = state.year_range();
        prop_assert!(range.min() <= range.max());
        prop_assert!(range.min() >= state.domain().min());
        prop_assert!(range.max() <= state.domain().max());
    }

    #[test]
    fn filtered_value_never_exceeds_the_category_sum(
        male in 0u32..10_000,
        female in 0u32..10_000,
        trans in 0u32..10_000,
        male_on in any::<bool>(),
        female_on in any::<bool>(),
        trans_on in any::<bool>()
    ) {
        let sample = record(2020, 0, male, female, trans);
        let selection = GenderSelection {
            male: male_on,
            female: female_on,
            trans: trans_on,
        };

        let filtered = selection.filtered_value(&sample);
        prop_assert!(filtered <= male + female + trans);

        let expected = [male_on, female_on, trans_on]
            .iter()
            .zip([male, female, trans])
            .filter(|(enabled, _)| **enabled)
            .map(|(_, count)| count)
            .sum::<u32>();
        prop_assert_eq!(filtered, expected);
    }

    #[test]
    fn enabled_order_is_stable_regardless_of_toggle_order(
        toggles in proptest::collection::vec((0usize..3, any::<bool>()), 0..12)
    ) {
        let mut selection = GenderSelection::default();
        for (index, enabled) in toggles {
            selection.set_enabled(Gender::ALL[index], enabled);
        }

        let enabled = selection.enabled();
        // Stack order is fixed Male, Female, Trans no matter the mutation order.
        let positions: Vec<usize> = enabled
            .iter()
            .map(|gender| Gender::ALL.iter().position(|g| g == gender).expect("known"))
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn snapshots_are_value_equal_for_equal_state(
        a in 2000i32..2030,
        b in 2000i32..2030
    ) {
        let records = [record(2000, 0, 1, 1, 1), record(2030, 3, 2, 2, 2)];
        let mut left = FilterState::from_records(&records).expect("non-empty");
        let mut right = FilterState::from_records(&records).expect("non-empty");

        left.set_year_range(a, b);
        right.set_year_range(b, a);
        // Swapped argument order converges to the same snapshot.
        prop_assert_eq!(left.snapshot(), right.snapshot());
    }
}
