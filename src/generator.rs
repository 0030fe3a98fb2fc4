//! The contract shared by every generator.
//!
//! A generator implements one primitive, [`IntegerListGenerator::generate`], taking three
//! control values whose meaning depends on the generator. The 32-bit and list-shaped
//! variants are derived from it once, here, as provided methods.
//!
//! Generators that need randomness implement [`RandomListGenerator`] instead and take the
//! random source as an explicit argument. [`RandomListGenerator::with_rng`] binds a source
//! for the duration of a borrow, which turns any random generator into an
//! [`IntegerListGenerator`] with the same derived variants.
//!
//! # Example
//!
//! ```
//! use intvec::{IntegerListGenerator, LinearRange};
//!
//! let mut range = LinearRange;
//! assert_eq!(&*range.generate(0, 10, 5)?, &[0, 5, 10]);
//! assert_eq!(range.generate_i32(0, 10, 5)?.len(), 3);
//! assert_eq!(range.generate_list(0, 10, 5)?, vec![0, 5, 10]);
//! # Ok::<(), intvec::GenError>(())
//! ```

use crate::config::MAX_SEQUENCE_LEN;
use crate::range_check::{narrow_to_32, safe_difference_fits_64};
use crate::rng::Rng;
use crate::telemetry::{SpecViolation, TracingObserver, ViolationKind, ViolationSeverity};
use crate::GenError;

/// A family of integer sequences selected by three control values.
pub trait IntegerListGenerator {
    /// Produces the sequence described by `(a, b, c)`.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidSpecification`] for structurally invalid control values and
    /// [`GenError::TooManyValues`] when the output would not fit a 32-bit-addressed sequence
    /// or the generator's configured cap.
    fn generate(&mut self, a: i64, b: i64, c: i64) -> Result<Box<[i64]>, GenError>;

    /// Like [`generate`](Self::generate), with every value narrowed to `i32`.
    ///
    /// # Errors
    ///
    /// Everything [`generate`](Self::generate) returns, plus [`GenError::OutOfRange`] if a
    /// produced value does not fit.
    fn generate_i32(&mut self, a: i64, b: i64, c: i64) -> Result<Box<[i32]>, GenError> {
        narrow_sequence(&self.generate(a, b, c)?)
    }

    /// Like [`generate`](Self::generate), returned as a growable list.
    fn generate_list(&mut self, a: i64, b: i64, c: i64) -> Result<Vec<i64>, GenError> {
        self.generate(a, b, c).map(to_list)
    }
}

/// A generator whose output depends on a caller-supplied random source.
pub trait RandomListGenerator {
    /// Produces the sequence described by `(a, b, c)`, drawing from `rng`.
    ///
    /// # Errors
    ///
    /// As for [`IntegerListGenerator::generate`].
    fn generate_with<R: Rng + ?Sized>(
        &self,
        a: i64,
        b: i64,
        c: i64,
        rng: &mut R,
    ) -> Result<Box<[i64]>, GenError>;

    /// Binds `rng` to this generator, yielding an [`IntegerListGenerator`].
    fn with_rng<'g, 'r, R: Rng + ?Sized>(&'g self, rng: &'r mut R) -> WithRng<'g, 'r, Self, R>
    where
        Self: Sized,
    {
        WithRng {
            generator: self,
            rng,
        }
    }
}

/// A [`RandomListGenerator`] paired with a borrowed random source.
///
/// Created by [`RandomListGenerator::with_rng`].
#[derive(Debug)]
pub struct WithRng<'g, 'r, G, R: ?Sized> {
    generator: &'g G,
    rng: &'r mut R,
}

impl<G: RandomListGenerator, R: Rng + ?Sized> IntegerListGenerator for WithRng<'_, '_, G, R> {
    fn generate(&mut self, a: i64, b: i64, c: i64) -> Result<Box<[i64]>, GenError> {
        self.generator.generate_with(a, b, c, &mut *self.rng)
    }
}

/// Number of values in `start, start + step, ...` that are `<= stop`.
///
/// Used by every generator to size its buffer before filling it.
///
/// # Errors
///
/// - [`GenError::InvalidSpecification`] if `step < 1`, `stop < start`, or the inclusive span
///   `stop - start + 1` overflows `i64`.
/// - [`GenError::TooManyValues`] if the count does not fit in an `i32`.
///
/// # Example
///
/// ```
/// use intvec::count_iterations;
///
/// assert_eq!(count_iterations(0, 10, 3)?, 4);
/// assert!(count_iterations(i64::MIN, -1, 1).is_err());
/// # Ok::<(), intvec::GenError>(())
/// ```
pub fn count_iterations(start: i64, stop: i64, step: i64) -> Result<i64, GenError> {
    if step < 1 {
        return Err(GenError::invalid(format!("step must be >= 1, got {step}")));
    }
    if stop < start {
        return Err(GenError::invalid(format!(
            "stop {stop} is smaller than start {start}"
        )));
    }
    let overflow =
        || GenError::invalid(format!("the span from {start} to {stop} does not fit into 64 bits"));
    if !safe_difference_fits_64(start, stop) {
        return Err(overflow());
    }
    let span = (stop - start).checked_add(1).ok_or_else(overflow)?;
    let count = span / step + i64::from(span % step != 0);
    if count > MAX_SEQUENCE_LEN as i64 {
        return Err(GenError::TooManyValues {
            requested: count as u64,
            limit: MAX_SEQUENCE_LEN,
        });
    }
    Ok(count)
}

/// Narrows every value of `values` to `i32`.
///
/// # Errors
///
/// Returns [`GenError::OutOfRange`] naming the first value that does not fit.
pub fn narrow_sequence(values: &[i64]) -> Result<Box<[i32]>, GenError> {
    values.iter().map(|&value| narrow_to_32(value)).collect()
}

/// Converts a generated sequence into a growable list.
#[must_use]
pub fn to_list(values: Box<[i64]>) -> Vec<i64> {
    values.into_vec()
}

/// Reports a violation when a generator produced a different number of values than it
/// sized its buffer for.
pub(crate) fn check_output_len(kind: ViolationKind, expected: usize, actual: usize) {
    if expected != actual {
        let violation = SpecViolation::new(
            ViolationSeverity::Error,
            kind,
            "generated length differs from the pre-computed size",
            concat!(file!(), ":", line!()),
        )
        .with_context("expected", expected)
        .with_context("actual", actual);
        TracingObserver.on_violation(&violation);
    }
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

    /// Returns its three control values as the sequence.
    struct Echo;

    impl IntegerListGenerator for Echo {
        fn generate(&mut self, a: i64, b: i64, c: i64) -> Result<Box<[i64]>, GenError> {
            Ok(vec![a, b, c].into_boxed_slice())
        }
    }

    /// Adds a random offset in `0..4` to each control value.
    struct Jitter;

    impl RandomListGenerator for Jitter {
        fn generate_with<R: Rng + ?Sized>(
            &self,
            a: i64,
            b: i64,
            c: i64,
            rng: &mut R,
        ) -> Result<Box<[i64]>, GenError> {
            Ok([a, b, c]
                .iter()
                .map(|v| v + i64::from(rng.gen_range(0..4)))
                .collect())
        }
    }

    #[test]
    fn count_iterations_exact_and_partial_steps() {
        assert_eq!(count_iterations(0, 0, 1).unwrap(), 1);
        assert_eq!(count_iterations(0, 9, 1).unwrap(), 10);
        assert_eq!(count_iterations(0, 9, 3).unwrap(), 4);
        assert_eq!(count_iterations(0, 8, 3).unwrap(), 3);
        assert_eq!(count_iterations(-5, 5, 5).unwrap(), 3);
        assert_eq!(count_iterations(i64::MAX - 2, i64::MAX, 1).unwrap(), 3);
    }

    #[test]
    fn count_iterations_rejects_bad_step_and_order() {
        assert!(count_iterations(0, 10, 0)
            .unwrap_err()
            .is_invalid_specification());
        assert!(count_iterations(0, 10, -1)
            .unwrap_err()
            .is_invalid_specification());
        assert!(count_iterations(10, 0, 1)
            .unwrap_err()
            .is_invalid_specification());
    }

    #[test]
    fn count_iterations_rejects_overflowing_span() {
        for step in [1, 2, 1 << 40, i64::MAX] {
            assert!(
                count_iterations(i64::MIN, -1, step)
                    .unwrap_err()
                    .is_invalid_specification(),
                "step {step}"
            );
            assert!(count_iterations(i64::MIN, i64::MAX, step)
                .unwrap_err()
                .is_invalid_specification());
        }
    }

    #[test]
    fn count_iterations_reports_too_many_values() {
        let err = count_iterations(0, i64::from(i32::MAX), 1).unwrap_err();
        assert_eq!(
            err,
            GenError::TooManyValues {
                requested: 1 << 31,
                limit: MAX_SEQUENCE_LEN,
            }
        );
        assert_eq!(
            count_iterations(0, i64::from(i32::MAX) - 1, 1).unwrap(),
            i64::from(i32::MAX)
        );
    }

    #[test]
    fn count_iterations_huge_step_single_value() {
        assert_eq!(count_iterations(0, i64::MAX - 1, i64::MAX).unwrap(), 1);
        assert_eq!(count_iterations(i64::MIN + 1, -1, i64::MAX).unwrap(), 1);
        assert!(count_iterations(-1, i64::MAX - 1, i64::MAX).is_err());
    }

    #[test]
    fn derived_variants() {
        let mut echo = Echo;
        assert_eq!(&*echo.generate_i32(1, -2, 3).unwrap(), &[1, -2, 3]);
        assert_eq!(echo.generate_list(4, 5, 6).unwrap(), vec![4, 5, 6]);
        assert_eq!(
            echo.generate_i32(1, i64::MAX, 3).unwrap_err(),
            GenError::OutOfRange {
                value: i64::MAX,
                target: "i32",
            }
        );
    }

    #[test]
    fn with_rng_binds_source() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut replay = rng.clone();
        let bound = Jitter.with_rng(&mut rng).generate_list(0, 10, 20).unwrap();
        let direct = Jitter.generate_with(0, 10, 20, &mut replay).unwrap();
        assert_eq!(bound, direct.into_vec());
        assert!(bound.iter().zip([0, 10, 20]).all(|(v, b)| (b..b + 4).contains(v)));
    }

    #[test]
    fn narrow_sequence_empty() {
        assert!(narrow_sequence(&[]).unwrap().is_empty());
    }
}
