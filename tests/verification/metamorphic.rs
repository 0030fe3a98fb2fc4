//! Metamorphic testing for the generators.
//!
//! Metamorphic tests check relationships between the outputs of related calls instead of
//! specific expected values.
//!
//! # Test Categories
//!
//! 1. **Translation**: shifting a linear range by `d` shifts every value by `d`
//! 2. **Refinement**: a coarser step selects a subsequence of a finer one
//! 3. **Agreement**: the bounds form and the exponent form agree on shared ranges
//! 4. **Replay consistency**: the same seed produces the same samples
//! 5. **Variant consistency**: 32-bit and list variants match the primary output

// Allow test-specific patterns that are appropriate for test code
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use intvec::rng::{Pcg32, SeedableRng};
use intvec::{
    corner_cases_by_bounds, corner_cases_by_exponent, range_generate, wildcard_expand,
    BoundedCornerCases, IntegerListGenerator, LinearRange, RandomListGenerator, RandomSamples,
    UniqueRandomSamples, WildcardMask,
};
use proptest::prelude::*;

// ============================================================================
// Translation and Refinement
// ============================================================================

proptest! {
    #[test]
    fn meta_linear_translation(
        start in -1_000_000i64..1_000_000,
        width in 0i64..10_000,
        step in 1i64..100,
        shift in -1_000_000i64..1_000_000,
    ) {
        let base = range_generate(start, start + width, step).unwrap();
        let shifted = range_generate(start + shift, start + width + shift, step).unwrap();
        prop_assert_eq!(base.len(), shifted.len());
        for (a, b) in base.iter().zip(shifted.iter()) {
            prop_assert_eq!(a + shift, *b);
        }
    }

    #[test]
    fn meta_linear_refinement(
        start in any::<i32>(),
        width in 0i64..10_000,
        step in 1i64..50,
        factor in 1i64..10,
    ) {
        let start = i64::from(start);
        let fine = range_generate(start, start + width, step).unwrap();
        let coarse = range_generate(start, start + width, step * factor).unwrap();
        let every_nth: Vec<i64> = fine.iter().copied().step_by(factor as usize).collect();
        prop_assert_eq!(coarse.into_vec(), every_nth);
    }
}

// ============================================================================
// Corner Case Agreement
// ============================================================================

/// For `[2^a, 2^b - 1]` the bounds form emits the same values as the exponent form over
/// `a..=b`.
#[test]
fn meta_bounds_matches_exponent_form_on_power_ranges() {
    for a in 1..20 {
        for b in (a + 1)..21 {
            let min = 1_i64 << a;
            let max = (1_i64 << b) - 1;
            let by_bounds = corner_cases_by_bounds(min, max, 1).unwrap();
            let by_exponent = corner_cases_by_exponent(a, b, 1).unwrap();
            assert_eq!(by_bounds, by_exponent, "range [2^{a}, 2^{b} - 1]");
        }
    }
}

proptest! {
    /// Narrowing the bounds keeps exactly the values of the wider call that still fit,
    /// plus the new bounds.
    #[test]
    fn meta_bounds_restriction(
        min in -1_000_000i64..1_000_000,
        width in 0i64..1_000_000,
        inset in 0.0f64..0.5,
    ) {
        let max = min + width;
        let cut = (width as f64 * inset) as i64;
        let (inner_min, inner_max) = (min + cut, max - cut);

        let outer = corner_cases_by_bounds(min, max, 1).unwrap();
        let inner = corner_cases_by_bounds(inner_min, inner_max, 1).unwrap();

        let mut expected: Vec<i64> = outer
            .iter()
            .copied()
            .filter(|v| (inner_min..=inner_max).contains(v))
            .collect();
        expected.push(inner_min);
        expected.push(inner_max);
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(inner.into_vec(), expected);
    }
}

// ============================================================================
// Wildcard Relationships
// ============================================================================

proptest! {
    /// Adding one wildcard bit doubles the expansion and contains the original.
    #[test]
    fn meta_wildcard_extra_bit(base in any::<i64>(), bits in 0u64..(1 << 10), extra in 10u32..64) {
        let mask = bits as i64;
        let wider = mask | (1_i64 << extra);
        let narrow = wildcard_expand(base, mask).unwrap();
        let wide = wildcard_expand(base & !(1_i64 << extra), wider).unwrap();
        prop_assert_eq!(wide.len(), narrow.len() * 2);
        let fixed_narrow = wildcard_expand(base & !(1_i64 << extra), mask).unwrap();
        for value in fixed_narrow.iter() {
            prop_assert!(wide.contains(value));
        }
    }
}

// ============================================================================
// Replay Consistency
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn meta_same_seed_same_samples(seed in any::<u64>(), amount in 1i64..200) {
        let first = UniqueRandomSamples::new()
            .generate_with(0, 1 << 20, amount, &mut Pcg32::seed_from_u64(seed))
            .unwrap();
        let second = UniqueRandomSamples::new()
            .generate_with(0, 1 << 20, amount, &mut Pcg32::seed_from_u64(seed))
            .unwrap();
        prop_assert_eq!(first, second);

        let first = RandomSamples::new()
            .generate_with(-50, 50, amount, &mut Pcg32::seed_from_u64(seed))
            .unwrap();
        let second = RandomSamples::new()
            .generate_with(-50, 50, amount, &mut Pcg32::seed_from_u64(seed))
            .unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Variant Consistency
// ============================================================================

fn assert_variants_agree<G: IntegerListGenerator>(generator: &mut G, controls: (i64, i64, i64)) {
    let (a, b, c) = controls;
    let primary = generator.generate(a, b, c).unwrap();
    let list = generator.generate_list(a, b, c).unwrap();
    let narrow = generator.generate_i32(a, b, c).unwrap();
    assert_eq!(primary.to_vec(), list);
    assert_eq!(
        narrow.iter().map(|&v| i64::from(v)).collect::<Vec<_>>(),
        list
    );
}

#[test]
fn meta_variants_agree() {
    assert_variants_agree(&mut LinearRange, (-100, 100, 7));
    assert_variants_agree(&mut BoundedCornerCases, (-70_000, 70_000, 2));
    assert_variants_agree(&mut WildcardMask::new(), (0x0F00, 0x00F0, 0));
}

#[test]
fn meta_bound_rng_variants_agree() {
    let sampler = UniqueRandomSamples::new();
    let mut primary_rng = Pcg32::seed_from_u64(77);
    let mut list_rng = Pcg32::seed_from_u64(77);

    let primary = sampler.with_rng(&mut primary_rng).generate(0, 999, 25).unwrap();
    let list = sampler.with_rng(&mut list_rng).generate_list(0, 999, 25).unwrap();
    assert_eq!(primary.into_vec(), list);
}
