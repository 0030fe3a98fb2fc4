//! Property-based tests for the public generator API.
//!
//! # Properties Tested
//!
//! ## Linear ranges
//! - Strictly ascending, first value `start`, last value `<= stop` and `> stop - step`
//! - Length `ceil((stop - start + 1) / step)`
//!
//! ## Corner cases
//! - Exponent and bounds forms are strictly ascending
//! - Bounds form starts at `min`, ends at `max`, and stays inside `[min, max]`
//! - Every interior bounds value is within one of a power of two (or its negation)
//!
//! ## Wildcard masks
//! - `wildcard_parse(wildcard_format(b, w)) == (b & !w, w)`
//! - Expansion has `2^popcount(w)` distinct values differing from `b` only under `w`
//!
//! ## Sampling
//! - Unique samples are distinct and in range; samples with duplicates are in range
//! - Both return exactly `amount` values

// Allow test-specific patterns that are appropriate for test code
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use std::collections::{BTreeSet, HashSet};

use intvec::rng::{Pcg32, SeedableRng};
use intvec::{
    corner_cases_by_bounds, corner_cases_by_exponent, range_generate, sample_with_duplicates,
    sample_without_duplicates, wildcard_expand, wildcard_format, wildcard_parse,
};
use proptest::prelude::*;

// ============================================================================
// Property Test Strategies
// ============================================================================

/// `(start, stop, step)` with a modest number of values anywhere in the i64 domain.
fn linear_spec_strategy() -> impl Strategy<Value = (i64, i64, i64)> {
    (any::<i64>(), 0i64..100_000, 1i64..5_000).prop_filter_map(
        "stop must not overflow",
        |(start, width, step)| start.checked_add(width).map(|stop| (start, stop, step)),
    )
}

/// Wildcard masks with at most 12 free bits.
fn sparse_mask_strategy() -> impl Strategy<Value = i64> {
    proptest::collection::btree_set(0u32..64, 0..=12)
        .prop_map(|bits| bits.into_iter().fold(0u64, |mask, bit| mask | (1 << bit)) as i64)
}

/// Whether `value` is one away from `±2^e` for some exponent.
fn near_power_of_two(value: i64) -> bool {
    let value = i128::from(value);
    (0..=63).any(|exp| {
        let base = 1_i128 << exp;
        (value - base).abs() <= 1 || (value + base).abs() <= 1
    })
}

// ============================================================================
// Linear Range Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_linear_range_shape((start, stop, step) in linear_spec_strategy()) {
        let values = range_generate(start, stop, step).unwrap();

        let span = i128::from(stop) - i128::from(start) + 1;
        let step_wide = i128::from(step);
        let expected_len = (span + step_wide - 1) / step_wide;
        prop_assert_eq!(values.len() as i128, expected_len);

        prop_assert_eq!(values[0], start);
        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        prop_assert!(values.windows(2).all(|pair| pair[1] - pair[0] == step));

        let last = i128::from(*values.last().unwrap());
        prop_assert!(last <= i128::from(stop));
        prop_assert!(last > i128::from(stop) - step_wide);
    }

    #[test]
    fn prop_linear_range_huge_steps(start in any::<i64>(), stop in any::<i64>()) {
        let (start, stop) = if start <= stop { (start, stop) } else { (stop, start) };
        let result = range_generate(start, stop, i64::MAX);
        let span = i128::from(stop) - i128::from(start) + 1;
        if span > i128::from(i64::MAX) {
            prop_assert!(result.unwrap_err().is_invalid_specification());
        } else {
            let values = result.unwrap();
            prop_assert!(values.len() <= 2);
            prop_assert_eq!(values[0], start);
        }
    }
}

// ============================================================================
// Corner Case Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_exponent_form_ascending(
        start_exp in -62i64..=61,
        width in 1i64..40,
        step_exp in 1i64..4,
    ) {
        let stop_exp = (start_exp + width).min(62);
        prop_assume!(stop_exp > start_exp);
        match corner_cases_by_exponent(start_exp, stop_exp, step_exp) {
            Ok(values) => {
                prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
                prop_assert!(values.iter().all(|&v| near_power_of_two(v)));
            }
            // only a step that selects a single exponent is rejected
            Err(err) => {
                prop_assert!(err.is_invalid_specification());
                prop_assert!(step_exp > stop_exp - start_exp);
            }
        }
    }

    #[test]
    fn prop_bounds_form_shape(
        a in any::<i64>(),
        b in any::<i64>(),
        step_exp in 1i64..8,
    ) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let values = corner_cases_by_bounds(min, max, step_exp).unwrap();

        prop_assert_eq!(values[0], min);
        prop_assert_eq!(*values.last().unwrap(), max);
        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        if values.len() > 2 {
            for &interior in &values[1..values.len() - 1] {
                prop_assert!(near_power_of_two(interior), "{} is not a corner case", interior);
            }
        }
    }
}

// ============================================================================
// Wildcard Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_wildcard_format_parse_round_trip(base in any::<i64>(), mask in any::<i64>()) {
        let text = wildcard_format(base, mask);
        prop_assert!(text.len() <= 64);
        prop_assert_eq!(wildcard_parse(&text).unwrap(), (base & !mask, mask));
    }

    #[test]
    fn prop_wildcard_expansion(base in any::<i64>(), mask in sparse_mask_strategy()) {
        let values = wildcard_expand(base, mask).unwrap();

        prop_assert_eq!(values.len(), 1usize << mask.count_ones());
        let distinct: HashSet<i64> = values.iter().copied().collect();
        prop_assert_eq!(distinct.len(), values.len());

        let fixed = base & !mask;
        for &value in values.iter() {
            prop_assert_eq!(value & !mask, fixed);
        }
        prop_assert!(values.contains(&fixed));
        prop_assert!(values.contains(&(fixed | mask)));
        prop_assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

// ============================================================================
// Sampling Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_unique_samples(
        seed in any::<u64>(),
        min in any::<i32>(),
        width in 0i64..20_000,
        amount in 1i64..500,
    ) {
        let min = i64::from(min);
        let max = min + width;
        let mut rng = Pcg32::seed_from_u64(seed);
        let result = sample_without_duplicates(min, max, amount, &mut rng);
        if amount > width + 1 {
            prop_assert!(result.unwrap_err().is_invalid_specification());
        } else {
            let values = result.unwrap();
            prop_assert_eq!(values.len() as i64, amount);
            let distinct: BTreeSet<i64> = values.iter().copied().collect();
            prop_assert_eq!(distinct.len(), values.len());
            prop_assert!(values.iter().all(|v| (min..=max).contains(v)));
        }
    }

    #[test]
    fn prop_samples_with_duplicates(
        seed in any::<u64>(),
        min in any::<i64>(),
        width in 0i64..i64::from(i32::MAX - 1),
        amount in 1i64..500,
    ) {
        prop_assume!(min.checked_add(width).is_some());
        let max = min + width;
        let mut rng = Pcg32::seed_from_u64(seed);
        let values = sample_with_duplicates(min, max, amount, &mut rng).unwrap();
        prop_assert_eq!(values.len() as i64, amount);
        prop_assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        prop_assert!(values.iter().all(|v| (min..=max).contains(v)));
    }
}
