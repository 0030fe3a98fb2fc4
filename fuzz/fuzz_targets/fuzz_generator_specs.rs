//! Fuzz target for generator control values.
//!
//! Every generator receives arbitrary `(a, b, c)` triples. It must either fail with a
//! `GenError` or return a sequence satisfying its documented shape.
//!
//! # Safety Properties Tested
//!
//! - No panics or overflows for any control values, including the i64 extremes
//! - Outputs are sorted where documented and stay inside the requested bounds
//! - Unique samples are pairwise distinct

#![no_main]

use arbitrary::Arbitrary;
use intvec::rng::{Pcg32, SeedableRng};
use intvec::{
    corner_cases_by_bounds, corner_cases_by_exponent, range_generate, sample_with_duplicates,
    sample_without_duplicates, wildcard_expand,
};
use libfuzzer_sys::fuzz_target;

/// Upper bound on outputs the target will materialize, to keep iterations fast
const MAX_FUZZ_VALUES: i128 = 1 << 16;

#[derive(Debug, Arbitrary)]
enum Controls {
    Range { start: i64, stop: i64, step: i64 },
    Exponent { start: i64, stop: i64, step: i64 },
    Bounds { min: i64, max: i64, step: i64 },
    Mask { base: i64, mask: i64 },
    Random { min: i64, max: i64, amount: u16, seed: u64 },
    Unique { min: i64, max: i64, amount: u16, seed: u64 },
}

fn strictly_ascending(values: &[i64]) -> bool {
    values.windows(2).all(|pair| pair[0] < pair[1])
}

fuzz_target!(|controls: Controls| {
    match controls {
        Controls::Range { start, stop, step } => {
            if step > 0 && stop >= start {
                let span = i128::from(stop) - i128::from(start) + 1;
                if span / i128::from(step) > MAX_FUZZ_VALUES {
                    return;
                }
            }
            if let Ok(values) = range_generate(start, stop, step) {
                assert_eq!(values.first(), Some(&start));
                assert!(values.iter().all(|&v| v <= stop));
                assert!(strictly_ascending(&values));
            }
        }
        Controls::Exponent { start, stop, step } => {
            if let Ok(values) = corner_cases_by_exponent(start, stop, step) {
                assert!(strictly_ascending(&values));
            }
        }
        Controls::Bounds { min, max, step } => {
            if let Ok(values) = corner_cases_by_bounds(min, max, step) {
                assert_eq!(values.first(), Some(&min));
                assert_eq!(values.last(), Some(&max));
                assert!(strictly_ascending(&values));
            }
        }
        Controls::Mask { base, mask } => {
            if mask.count_ones() > 16 {
                return;
            }
            let values = wildcard_expand(base, mask).expect("16 free bits fit the default cap");
            assert_eq!(values.len(), 1 << mask.count_ones());
            assert!(strictly_ascending(&values));
        }
        Controls::Random {
            min,
            max,
            amount,
            seed,
        } => {
            let mut rng = Pcg32::seed_from_u64(seed);
            if let Ok(values) = sample_with_duplicates(min, max, i64::from(amount), &mut rng) {
                assert_eq!(values.len(), usize::from(amount));
                assert!(values.iter().all(|v| (min..=max).contains(v)));
            }
        }
        Controls::Unique {
            min,
            max,
            amount,
            seed,
        } => {
            let mut rng = Pcg32::seed_from_u64(seed);
            if let Ok(values) = sample_without_duplicates(min, max, i64::from(amount), &mut rng) {
                assert_eq!(values.len(), usize::from(amount));
                assert!(strictly_ascending(&values));
                assert!(values.iter().all(|v| (min..=max).contains(v)));
            }
        }
    }
});
