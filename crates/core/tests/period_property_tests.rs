//! Property-based tests for period arithmetic.
//!
//! These verify that the window invariants hold across all valid anchors and
//! "as of" instants, using the `proptest` crate for random case generation.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use spendguard_core::budgets::period::{
    previous_window, window_at, window_containing, PeriodUnit,
};

// =============================================================================
// Generators
// =============================================================================

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap()
}

/// Generates an anchor date between 2015 and roughly 2033.
fn arb_anchor() -> impl Strategy<Value = NaiveDate> {
    (0u64..7000).prop_map(|offset| base_date() + Days::new(offset))
}

/// Generates an "as of" date within about twelve years after the base date.
fn arb_as_of() -> impl Strategy<Value = NaiveDate> {
    (0u64..4500).prop_map(|offset| base_date() + Days::new(offset))
}

fn arb_unit() -> impl Strategy<Value = PeriodUnit> {
    prop_oneof![
        Just(PeriodUnit::Day),
        Just(PeriodUnit::Week),
        Just(PeriodUnit::Month),
        Just(PeriodUnit::Year),
    ]
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The returned window always contains `as_of` when `as_of` is on or
    /// after the anchor; earlier instants fall back to the first window.
    #[test]
    fn window_contains_as_of(
        anchor in arb_anchor(),
        unit in arb_unit(),
        as_of in arb_as_of(),
    ) {
        let window = window_containing(anchor, unit, as_of);
        prop_assert!(window.start < window.end);
        if as_of >= anchor {
            prop_assert!(
                window.contains(as_of),
                "window {:?} misses as_of {as_of}",
                window
            );
        } else {
            prop_assert_eq!(window.start, anchor);
            prop_assert!(as_of < window.start);
        }
    }

    /// Consecutive windows tile the calendar: no gaps, no overlaps.
    #[test]
    fn windows_are_contiguous(
        anchor in arb_anchor(),
        unit in arb_unit(),
        index in 0u32..60,
    ) {
        let current = window_at(anchor, unit, index);
        let next = window_at(anchor, unit, index + 1);
        prop_assert_eq!(current.end, next.start);
    }

    /// The first window starts on the anchor itself.
    #[test]
    fn first_window_starts_on_anchor(anchor in arb_anchor(), unit in arb_unit()) {
        let first = window_at(anchor, unit, 0);
        prop_assert_eq!(first.start, anchor);
    }

    /// `previous_window` inverts forward stepping and abuts the current
    /// window; the first window has no predecessor.
    #[test]
    fn previous_window_abuts_current(
        anchor in arb_anchor(),
        unit in arb_unit(),
        index in 0u32..60,
    ) {
        let current = window_at(anchor, unit, index);
        match previous_window(anchor, unit, &current) {
            Some(previous) => {
                prop_assert!(index > 0);
                prop_assert_eq!(previous.end, current.start);
                prop_assert_eq!(previous, window_at(anchor, unit, index - 1));
            }
            None => prop_assert_eq!(index, 0),
        }
    }
}
