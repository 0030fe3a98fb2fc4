//! Uniform random samples from an inclusive range, with or without repetition.
//!
//! Draws go through the 32-bit bounded primitive [`Rng::gen_range`], so the range
//! `[min, max]` must hold at most `i32::MAX` values. The random source is passed into
//! every call; the samplers themselves only carry a [`SamplingConfig`].
//!
//! Unique sampling picks one of two strategies from the density of the request:
//!
//! - **Permutation** when `range_size <= density_factor * amount`: materialize the range,
//!   shuffle it, keep the first `amount` values.
//! - **Rejection** otherwise: draw until `amount` distinct values have been seen.
//!
//! # Example
//!
//! ```
//! use intvec::rng::{Pcg32, SeedableRng};
//! use intvec::{sample_with_duplicates, sample_without_duplicates};
//!
//! let mut rng = Pcg32::seed_from_u64(7);
//! let unique = sample_without_duplicates(1, 100, 10, &mut rng)?;
//! assert_eq!(unique.len(), 10);
//! assert!(unique.windows(2).all(|pair| pair[0] < pair[1]));
//!
//! let repeated = sample_with_duplicates(1, 6, 20, &mut rng)?;
//! assert!(repeated.iter().all(|v| (1..=6).contains(v)));
//! # Ok::<(), intvec::GenError>(())
//! ```

use std::collections::HashSet;

use crate::config::SamplingConfig;
use crate::generator::{check_output_len, RandomListGenerator};
use crate::range_check::{fits_in_32, safe_difference_fits_32};
use crate::rng::Rng;
use crate::telemetry::ViolationKind;
use crate::GenError;

/// How [`UniqueRandomSamples`] produces its values for a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplingStrategy {
    /// Shuffle the whole range and keep a prefix.
    Permutation,
    /// Draw repeatedly, discarding values already seen.
    Rejection,
}

/// Independent uniform samples, returned sorted ascending.
///
/// Control values: `(min, max, amount)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RandomSamples {
    config: SamplingConfig,
}

/// Pairwise distinct uniform samples.
///
/// Control values: `(min, max, amount)`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UniqueRandomSamples {
    config: SamplingConfig,
}

/// A validated sampling request.
#[derive(Debug, Clone, Copy)]
struct Request {
    min: i64,
    /// Number of values in `[min, max]`, at most `i32::MAX`.
    range_size: u32,
    amount: usize,
}

impl Request {
    fn new(min: i64, max: i64, amount: i64, config: &SamplingConfig) -> Result<Self, GenError> {
        if max < min {
            return Err(GenError::invalid(format!(
                "max {max} is smaller than min {min}"
            )));
        }
        if amount < 1 {
            return Err(GenError::invalid(format!(
                "amount must be >= 1, got {amount}"
            )));
        }
        if !fits_in_32(amount) {
            return Err(GenError::invalid(format!(
                "amount {amount} does not fit into 32 bits"
            )));
        }
        // max - min < i32::MAX so that the size itself fits
        if !safe_difference_fits_32(min, max) || max - min == i64::from(i32::MAX) {
            return Err(GenError::invalid(format!(
                "range [{min}, {max}] holds more than {} values",
                i32::MAX
            )));
        }
        if amount as u64 > config.max_values {
            return Err(GenError::TooManyValues {
                requested: amount as u64,
                limit: config.max_values,
            });
        }
        Ok(Self {
            min,
            range_size: (max - min + 1) as u32,
            amount: amount as usize,
        })
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        self.min + i64::from(rng.gen_range(0..self.range_size))
    }
}

impl RandomSamples {
    /// Creates a sampler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sampler with a custom configuration. `sort_output` is ignored; samples with
    /// repetition are always sorted.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidSpecification`] if the configuration does not validate.
    pub fn with_config(config: SamplingConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this sampler was built with.
    #[must_use]
    pub const fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Draws `amount` independent samples from `[min, max]`, sorted ascending.
    ///
    /// # Errors
    ///
    /// - [`GenError::InvalidSpecification`] if `max < min`, `amount < 1`, or the range size or
    ///   `amount` does not fit into 32 bits.
    /// - [`GenError::TooManyValues`] if `amount` exceeds the configured cap.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        min: i64,
        max: i64,
        amount: i64,
        rng: &mut R,
    ) -> Result<Box<[i64]>, GenError> {
        let request = Request::new(min, max, amount, &self.config)?;
        tracing::debug!(min, max, amount, "sampling with duplicates");

        let mut values: Vec<i64> = (0..request.amount).map(|_| request.draw(rng)).collect();
        values.sort_unstable();

        check_output_len(ViolationKind::Sampling, request.amount, values.len());
        Ok(values.into_boxed_slice())
    }
}

impl RandomListGenerator for RandomSamples {
    fn generate_with<R: Rng + ?Sized>(
        &self,
        min: i64,
        max: i64,
        amount: i64,
        rng: &mut R,
    ) -> Result<Box<[i64]>, GenError> {
        self.sample(min, max, amount, rng)
    }
}

impl UniqueRandomSamples {
    /// Creates a sampler with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a sampler with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidSpecification`] if the configuration does not validate.
    pub fn with_config(config: SamplingConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this sampler was built with.
    #[must_use]
    pub const fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// The strategy [`sample`](Self::sample) would use for this request.
    ///
    /// # Errors
    ///
    /// As for [`sample`](Self::sample).
    pub fn strategy(&self, min: i64, max: i64, amount: i64) -> Result<SamplingStrategy, GenError> {
        let request = self.request(min, max, amount)?;
        Ok(self.strategy_for(&request))
    }

    /// Draws `amount` pairwise distinct samples from `[min, max]`.
    ///
    /// Sorted ascending unless the configuration's `sort_output` is false, in which case
    /// the values keep the order the chosen strategy produced them in.
    ///
    /// # Errors
    ///
    /// - [`GenError::InvalidSpecification`] for everything [`RandomSamples::sample`] rejects,
    ///   and if `amount` exceeds the number of values in `[min, max]`.
    /// - [`GenError::TooManyValues`] if `amount` exceeds the configured cap.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        min: i64,
        max: i64,
        amount: i64,
        rng: &mut R,
    ) -> Result<Box<[i64]>, GenError> {
        let request = self.request(min, max, amount)?;
        let strategy = self.strategy_for(&request);
        tracing::debug!(
            min,
            max,
            amount,
            strategy = ?strategy,
            "sampling without duplicates"
        );

        let mut values = match strategy {
            SamplingStrategy::Permutation => permutation_prefix(&request, rng),
            SamplingStrategy::Rejection => rejection_draws(&request, rng),
        };
        if self.config.sort_output {
            values.sort_unstable();
        }

        check_output_len(ViolationKind::Sampling, request.amount, values.len());
        Ok(values.into_boxed_slice())
    }

    fn request(&self, min: i64, max: i64, amount: i64) -> Result<Request, GenError> {
        let request = Request::new(min, max, amount, &self.config)?;
        if request.amount > request.range_size as usize {
            return Err(GenError::invalid(format!(
                "cannot draw {amount} unique values from [{min}, {max}], which holds {}",
                request.range_size
            )));
        }
        Ok(request)
    }

    fn strategy_for(&self, request: &Request) -> SamplingStrategy {
        let threshold = self
            .config
            .density_factor
            .saturating_mul(request.amount as i64);
        if i64::from(request.range_size) <= threshold {
            SamplingStrategy::Permutation
        } else {
            SamplingStrategy::Rejection
        }
    }
}

impl RandomListGenerator for UniqueRandomSamples {
    fn generate_with<R: Rng + ?Sized>(
        &self,
        min: i64,
        max: i64,
        amount: i64,
        rng: &mut R,
    ) -> Result<Box<[i64]>, GenError> {
        self.sample(min, max, amount, rng)
    }
}

fn permutation_prefix<R: Rng + ?Sized>(request: &Request, rng: &mut R) -> Vec<i64> {
    let mut pool: Vec<i64> = (0..i64::from(request.range_size))
        .map(|offset| request.min + offset)
        .collect();
    rng.shuffle(&mut pool);
    pool.truncate(request.amount);
    pool
}

fn rejection_draws<R: Rng + ?Sized>(request: &Request, rng: &mut R) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(request.amount);
    let mut values = Vec::with_capacity(request.amount);
    let mut rejected = 0_u64;
    while values.len() < request.amount {
        let value = request.draw(rng);
        if seen.insert(value) {
            values.push(value);
        } else {
            rejected += 1;
        }
    }
    tracing::trace!(rejected, "rejection sampling finished");
    values
}

/// Draws `amount` independent samples from `[min, max]` with the default configuration.
///
/// # Errors
///
/// See [`RandomSamples::sample`].
pub fn sample_with_duplicates<R: Rng + ?Sized>(
    min: i64,
    max: i64,
    amount: i64,
    rng: &mut R,
) -> Result<Box<[i64]>, GenError> {
    RandomSamples::new().sample(min, max, amount, rng)
}

/// Draws `amount` distinct samples from `[min, max]`, sorted, with density factor 4.
///
/// # Errors
///
/// See [`UniqueRandomSamples::sample`].
pub fn sample_without_duplicates<R: Rng + ?Sized>(
    min: i64,
    max: i64,
    amount: i64,
    rng: &mut R,
) -> Result<Box<[i64]>, GenError> {
    UniqueRandomSamples::new().sample(min, max, amount, rng)
}

/// Like [`sample_without_duplicates`] with an explicit density factor.
///
/// # Errors
///
/// [`GenError::InvalidSpecification`] if `factor < 1`, otherwise see
/// [`UniqueRandomSamples::sample`].
pub fn sample_without_duplicates_with_factor<R: Rng + ?Sized>(
    min: i64,
    max: i64,
    amount: i64,
    rng: &mut R,
    factor: i64,
) -> Result<Box<[i64]>, GenError> {
    UniqueRandomSamples::with_config(SamplingConfig {
        density_factor: factor,
        ..SamplingConfig::default()
    })?
    .sample(min, max, amount, rng)
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
    use crate::generator::IntegerListGenerator;
    use crate::rng::{Pcg32, SeedableRng};

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(0x5eed)
    }

    #[test]
    fn duplicates_are_sorted_and_in_range() {
        let values = sample_with_duplicates(-3, 3, 500, &mut rng()).unwrap();
        assert_eq!(values.len(), 500);
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(values.iter().all(|v| (-3..=3).contains(v)));
        // 500 draws from 7 values must repeat
        assert!(values.windows(2).any(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn duplicates_single_value_range() {
        let values = sample_with_duplicates(42, 42, 3, &mut rng()).unwrap();
        assert_eq!(&*values, &[42, 42, 42]);
    }

    #[test]
    fn duplicates_rejections() {
        let mut rng = rng();
        for (min, max, amount) in [
            (5, 4, 1),
            (0, 10, 0),
            (0, 10, -3),
            (0, 10, i64::from(i32::MAX) + 1),
            (0, i64::from(i32::MAX), 1),
            (i64::MIN, i64::MAX, 1),
        ] {
            assert!(
                sample_with_duplicates(min, max, amount, &mut rng)
                    .unwrap_err()
                    .is_invalid_specification(),
                "({min}, {max}, {amount}) should be rejected"
            );
        }
    }

    #[test]
    fn largest_accepted_range() {
        let max = i64::from(i32::MAX) - 1;
        let values = sample_with_duplicates(0, max, 4, &mut rng()).unwrap();
        assert!(values.iter().all(|v| (0..=max).contains(v)));

        let values = sample_with_duplicates(i64::MAX - 100, i64::MAX, 4, &mut rng()).unwrap();
        assert!(values.iter().all(|&v| v >= i64::MAX - 100));
    }

    #[test]
    fn unique_cannot_exceed_range() {
        assert!(sample_without_duplicates(1, 3, 5, &mut rng())
            .unwrap_err()
            .is_invalid_specification());
    }

    #[test]
    fn unique_exhausts_small_range() {
        let values = sample_without_duplicates(1, 3, 3, &mut rng()).unwrap();
        assert_eq!(&*values, &[1, 2, 3]);
    }

    #[test]
    fn strategy_follows_density() {
        let sampler = UniqueRandomSamples::new();
        // 100 values, 25 requested: 100 <= 4 * 25
        assert_eq!(
            sampler.strategy(1, 100, 25).unwrap(),
            SamplingStrategy::Permutation
        );
        assert_eq!(
            sampler.strategy(1, 100, 24).unwrap(),
            SamplingStrategy::Rejection
        );
        let reject = UniqueRandomSamples::with_config(SamplingConfig::always_reject()).unwrap();
        assert_eq!(
            reject.strategy(1, 100, 99).unwrap(),
            SamplingStrategy::Rejection
        );
        assert_eq!(
            reject.strategy(1, 100, 100).unwrap(),
            SamplingStrategy::Permutation
        );
    }

    #[test]
    fn both_strategies_produce_distinct_sorted_values() {
        for amount in [10, 40] {
            let values = sample_without_duplicates(1000, 1099, amount, &mut rng()).unwrap();
            assert_eq!(values.len(), amount as usize);
            assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
            assert!(values.iter().all(|v| (1000..=1099).contains(v)));
        }
    }

    #[test]
    fn unsorted_permutation_keeps_shuffle_order() {
        let sampler = UniqueRandomSamples::with_config(SamplingConfig::unsorted()).unwrap();
        let mut rng_a = rng();
        let mut rng_b = rng();

        let values = sampler.sample(0, 9, 5, &mut rng_a).unwrap();

        let mut pool: Vec<i64> = (0..10).collect();
        rng_b.shuffle(&mut pool);
        assert_eq!(&*values, &pool[..5]);
    }

    #[test]
    fn unsorted_rejection_keeps_draw_order() {
        let sampler = UniqueRandomSamples::with_config(SamplingConfig::unsorted()).unwrap();
        let mut rng_a = rng();
        let mut rng_b = rng();

        let values = sampler.sample(0, 999_999, 5, &mut rng_a).unwrap();

        let mut expected = Vec::new();
        while expected.len() < 5 {
            let v = i64::from(rng_b.gen_range(0..1_000_000));
            if !expected.contains(&v) {
                expected.push(v);
            }
        }
        assert_eq!(values.into_vec(), expected);
    }

    #[test]
    fn factor_variant_validates_factor() {
        assert!(sample_without_duplicates_with_factor(0, 10, 2, &mut rng(), 0)
            .unwrap_err()
            .is_invalid_specification());
        let values = sample_without_duplicates_with_factor(0, 10, 2, &mut rng(), 100).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn output_cap_reports_too_many_values() {
        let sampler = RandomSamples::with_config(SamplingConfig {
            max_values: 4,
            ..SamplingConfig::default()
        })
        .unwrap();
        assert_eq!(
            sampler.sample(0, 10, 5, &mut rng()).unwrap_err(),
            GenError::TooManyValues {
                requested: 5,
                limit: 4,
            }
        );
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let first = sample_without_duplicates(0, 1 << 30, 50, &mut rng()).unwrap();
        let second = sample_without_duplicates(0, 1 << 30, 50, &mut rng()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn bound_samplers_derive_variants() {
        let mut rng = rng();
        let narrowed = UniqueRandomSamples::new()
            .with_rng(&mut rng)
            .generate_i32(-5, 5, 11)
            .unwrap();
        assert_eq!(&*narrowed, &[-5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5]);

        let list = RandomSamples::new()
            .with_rng(&mut rng)
            .generate_list(0, 1, 8)
            .unwrap();
        assert_eq!(list.len(), 8);
    }
}
