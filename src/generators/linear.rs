//! Arithmetic sequences `start, start + step, ...` up to an inclusive bound.

use crate::generator::{check_output_len, count_iterations, IntegerListGenerator};
use crate::telemetry::ViolationKind;
use crate::GenError;

/// Generates `start, start + step, ...` while the value is `<= stop`.
///
/// Control values: `(start, stop, step)`.
///
/// # Example
///
/// ```
/// use intvec::{IntegerListGenerator, LinearRange};
///
/// assert_eq!(&*LinearRange.generate(1, 10, 4)?, &[1, 5, 9]);
/// # Ok::<(), intvec::GenError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinearRange;

impl IntegerListGenerator for LinearRange {
    fn generate(&mut self, start: i64, stop: i64, step: i64) -> Result<Box<[i64]>, GenError> {
        range_generate(start, stop, step)
    }
}

/// Returns the `ceil((stop - start + 1) / step)` values `start, start + step, ...`.
///
/// Every value is `<= stop`, and the last one is `> stop - step`.
///
/// # Errors
///
/// As for [`count_iterations`].
pub fn range_generate(start: i64, stop: i64, step: i64) -> Result<Box<[i64]>, GenError> {
    let count = count_iterations(start, stop, step)? as usize;
    tracing::debug!(start, stop, step, count, "generating linear range");

    let mut values = Vec::with_capacity(count);
    let mut value = start;
    values.push(value);
    // each addition lands on an element that exists, so it stays <= stop
    for _ in 1..count {
        value += step;
        values.push(value);
    }

    check_output_len(ViolationKind::Range, count, values.len());
    Ok(values.into_boxed_slice())
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

    #[test]
    fn single_value() {
        assert_eq!(&*range_generate(7, 7, 1).unwrap(), &[7]);
        assert_eq!(&*range_generate(7, 9, 100).unwrap(), &[7]);
    }

    #[test]
    fn stops_at_inclusive_bound() {
        assert_eq!(&*range_generate(0, 10, 5).unwrap(), &[0, 5, 10]);
        assert_eq!(&*range_generate(0, 9, 5).unwrap(), &[0, 5]);
        assert_eq!(&*range_generate(-3, 3, 2).unwrap(), &[-3, -1, 1, 3]);
    }

    #[test]
    fn reaches_i64_max_without_overflow() {
        let values = range_generate(i64::MAX - 4, i64::MAX, 2).unwrap();
        assert_eq!(&*values, &[i64::MAX - 4, i64::MAX - 2, i64::MAX]);

        let values = range_generate(i64::MAX - 5, i64::MAX, 3).unwrap();
        assert_eq!(&*values, &[i64::MAX - 5, i64::MAX - 2]);
    }

    #[test]
    fn large_step_near_extremes() {
        // span of 2^63 - 1, the widest one accepted
        let values = range_generate(-(1 << 62), (1 << 62) - 2, 1 << 62).unwrap();
        assert_eq!(&*values, &[-(1 << 62), 0]);
        let values = range_generate(i64::MIN, i64::MIN + 10, i64::MAX).unwrap();
        assert_eq!(&*values, &[i64::MIN]);
    }

    #[test]
    fn rejects_span_of_two_to_the_63() {
        assert!(range_generate(-(1 << 62), (1 << 62) - 1, 1 << 62)
            .unwrap_err()
            .is_invalid_specification());
        assert!(range_generate(i64::MIN, -1, 1 << 62)
            .unwrap_err()
            .is_invalid_specification());
    }

    #[test]
    fn rejects_invalid_specifications() {
        assert!(range_generate(0, 10, 0)
            .unwrap_err()
            .is_invalid_specification());
        assert!(range_generate(10, 0, 1)
            .unwrap_err()
            .is_invalid_specification());
        for step in [1, 3, 1 << 62] {
            assert!(range_generate(i64::MIN, -1, step)
                .unwrap_err()
                .is_invalid_specification());
        }
    }

    #[test]
    fn rejects_too_many_values() {
        assert!(range_generate(0, 1 << 40, 1)
            .unwrap_err()
            .is_too_many_values());
    }

    #[test]
    fn narrowed_variant() {
        let narrowed = LinearRange.generate_i32(-2, 2, 2).unwrap();
        assert_eq!(&*narrowed, &[-2, 0, 2]);
        assert!(LinearRange
            .generate_i32(i64::from(i32::MAX), i64::from(i32::MAX) + 1, 1)
            .unwrap_err()
            .is_out_of_range());
    }
}
