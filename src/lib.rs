//! # intvec
//!
//! Deterministic and pseudorandom sequences of 64-bit integers for exercising numeric code.
//!
//! Every generator is selected by three control values and returns a fresh sequence, or a
//! [`GenError`] when the control values cannot describe one. Nothing is produced partially:
//! output sizes are validated before anything is allocated.
//!
//! | Generator | Control values | Produces |
//! |-----------|----------------|----------|
//! | [`LinearRange`] | `start, stop, step` | `start, start + step, ...` up to `stop` |
//! | [`ExponentialCornerCases`] | `start_exp, stop_exp, step_exp` | values around `±2^e` |
//! | [`BoundedCornerCases`] | `min, max, step_exp` | corner cases inside `[min, max]` |
//! | [`WildcardMask`] | `base, mask, _` | every value matching a bit pattern |
//! | [`RandomSamples`] | `min, max, amount` | uniform samples, sorted |
//! | [`UniqueRandomSamples`] | `min, max, amount` | distinct uniform samples |
//!
//! Each family also has a free function (for example [`range_generate`]) and every
//! generator derives a 32-bit variant and a list variant through
//! [`IntegerListGenerator`]. Random generators take the random source as an argument; see
//! [`rng`] for the bundled PCG32 implementation.
//!
//! ```
//! use intvec::rng::{Pcg32, SeedableRng};
//! use intvec::{corner_cases_by_bounds, range_generate, sample_without_duplicates};
//!
//! assert_eq!(&*range_generate(1, 10, 4)?, &[1, 5, 9]);
//! assert_eq!(&*corner_cases_by_bounds(4, 15, 1)?, &[4, 5, 7, 8, 9, 15]);
//!
//! let mut rng = Pcg32::seed_from_u64(42);
//! let picks = sample_without_duplicates(1, 49, 6, &mut rng)?;
//! assert_eq!(picks.len(), 6);
//! # Ok::<(), intvec::GenError>(())
//! ```
//!
//! Sequences can also be described as text or serialized documents through
//! [`GenerationRequest`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub use config::{SamplingConfig, WildcardConfig};
pub use error::GenError;
pub use generator::{
    count_iterations, narrow_sequence, to_list, IntegerListGenerator, RandomListGenerator,
    WithRng,
};
pub use generators::corner_cases::{
    corner_cases_by_bounds, corner_cases_by_exponent, BoundedCornerCases, ExponentialCornerCases,
};
pub use generators::linear::{range_generate, LinearRange};
pub use generators::sampling::{
    sample_with_duplicates, sample_without_duplicates, sample_without_duplicates_with_factor,
    RandomSamples, SamplingStrategy, UniqueRandomSamples,
};
pub use generators::wildcard::{wildcard_expand, wildcard_format, wildcard_parse, WildcardMask};
pub use request::GenerationRequest;

pub mod config;
pub mod error;
pub mod generator;
pub mod range_check;
pub mod request;
/// Minimal PCG32 random number generator.
///
/// Any type implementing [`rng::Rng`] can drive the random generators.
pub mod rng;
pub mod telemetry;

/// The generator families.
pub mod generators {
    pub mod corner_cases;
    pub mod linear;
    pub mod sampling;
    pub mod wildcard;
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::rng::{Pcg32, SeedableRng};

    fn assert_generator<G: IntegerListGenerator>(_: &G) {}

    #[test]
    fn deterministic_families_share_the_trait() {
        assert_generator(&LinearRange);
        assert_generator(&ExponentialCornerCases);
        assert_generator(&BoundedCornerCases);
        assert_generator(&WildcardMask::new());
    }

    #[test]
    fn generators_usable_as_trait_objects() {
        let mut rng = Pcg32::seed_from_u64(9);
        let unique = UniqueRandomSamples::new();
        let mut generators: Vec<(Box<dyn IntegerListGenerator + '_>, [i64; 3])> = vec![
            (Box::new(LinearRange), [0, 4, 2]),
            (Box::new(ExponentialCornerCases), [2, 4, 1]),
            (Box::new(WildcardMask::new()), [9, 18, 0]),
            (Box::new(unique.with_rng(&mut rng)), [0, 2, 3]),
        ];
        let outputs: Vec<Vec<i64>> = generators
            .iter_mut()
            .map(|(generator, [a, b, c])| generator.generate_list(*a, *b, *c).unwrap())
            .collect();
        assert_eq!(outputs[0], vec![0, 2, 4]);
        assert_eq!(outputs[1], vec![4, 5, 7, 8, 9, 15]);
        assert_eq!(outputs[2], vec![9, 11, 25, 27]);
        assert_eq!(outputs[3], vec![0, 1, 2]);
    }

    #[test]
    fn errors_are_std_errors() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&range_generate(1, 0, 1).unwrap_err());
    }
}
