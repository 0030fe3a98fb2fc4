//! Values adjacent to powers of two.
//!
//! Each selected exponent `e` names a base value, `2^e` for `e >= 0` and `-2^|e|` for
//! negative `e`, and contributes the triple `{base - 1, base, base + 1}`. Neighbouring
//! triples overlap for small exponents (`{0, 1, 2}` and `{1, 2, 3}`), so a candidate equal
//! to either of the two most recently emitted values is skipped. That check only looks two
//! values back, which is exactly enough for adjacent triples.
//!
//! Two entry points share the engine:
//!
//! - [`ExponentialCornerCases`] walks an exponent range directly.
//! - [`BoundedCornerCases`] derives the exponents from explicit `min`/`max` bounds and
//!   clamps every candidate to them.

use crate::generator::{count_iterations, IntegerListGenerator};
use crate::range_check::bit_length;
use crate::telemetry::{ViolationKind, ViolationSeverity};
use crate::{report_violation, GenError};

/// Exponents accepted by [`ExponentialCornerCases`] lie strictly inside `(-63, 63)`.
pub const EXPONENT_LIMIT: i64 = 63;

/// Corner cases for every exponent in `start_exp, start_exp + step_exp, ... <= stop_exp`.
///
/// Control values: `(start_exp, stop_exp, step_exp)`.
///
/// The first exponent contributes only `{base, base + 1}` and the last one only
/// `{base - 1}`; interior exponents contribute the full triple.
///
/// # Example
///
/// ```
/// use intvec::{ExponentialCornerCases, IntegerListGenerator};
///
/// let values = ExponentialCornerCases.generate(2, 4, 1)?;
/// assert_eq!(&*values, &[4, 5, 7, 8, 9, 15]);
/// # Ok::<(), intvec::GenError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialCornerCases;

impl IntegerListGenerator for ExponentialCornerCases {
    fn generate(
        &mut self,
        start_exp: i64,
        stop_exp: i64,
        step_exp: i64,
    ) -> Result<Box<[i64]>, GenError> {
        corner_cases_by_exponent(start_exp, stop_exp, step_exp)
    }
}

/// Corner cases between explicit bounds.
///
/// Control values: `(min, max, step_exp)`.
///
/// `min` is always the first value and `max` the last, whether or not they are corner
/// cases themselves; in between come the corner cases of every selected exponent that
/// fall inside `[min, max]`.
///
/// # Example
///
/// ```
/// use intvec::{BoundedCornerCases, IntegerListGenerator};
///
/// let values = BoundedCornerCases.generate(4, 15, 1)?;
/// assert_eq!(&*values, &[4, 5, 7, 8, 9, 15]);
/// # Ok::<(), intvec::GenError>(())
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BoundedCornerCases;

impl IntegerListGenerator for BoundedCornerCases {
    fn generate(&mut self, min: i64, max: i64, step_exp: i64) -> Result<Box<[i64]>, GenError> {
        corner_cases_by_bounds(min, max, step_exp)
    }
}

/// See [`ExponentialCornerCases`].
///
/// # Errors
///
/// [`GenError::InvalidSpecification`] if `start_exp == stop_exp`, either exponent lies
/// outside `(-63, 63)`, `step_exp < 1`, `stop_exp < start_exp`, or the step selects a
/// single exponent.
pub fn corner_cases_by_exponent(
    start_exp: i64,
    stop_exp: i64,
    step_exp: i64,
) -> Result<Box<[i64]>, GenError> {
    if start_exp == stop_exp {
        return Err(GenError::invalid(format!(
            "start and stop exponent are both {start_exp}"
        )));
    }
    for exp in [start_exp, stop_exp] {
        if exp <= -EXPONENT_LIMIT || exp >= EXPONENT_LIMIT {
            return Err(GenError::invalid(format!(
                "exponent {exp} is outside (-{EXPONENT_LIMIT}, {EXPONENT_LIMIT})"
            )));
        }
    }
    let count = count_iterations(start_exp, stop_exp, step_exp)?;
    if count < 2 {
        return Err(GenError::invalid(format!(
            "step {step_exp} selects only exponent {start_exp} of {start_exp}..={stop_exp}"
        )));
    }
    tracing::debug!(start_exp, stop_exp, step_exp, count, "generating corner cases");

    let mut sink = CornerSink::new(count, None);
    for k in 0..count {
        let base = power_base(start_exp + k * step_exp);
        if k == 0 {
            sink.push_all(&[base, base + 1]);
        } else if k == count - 1 {
            sink.push(base - 1);
        } else {
            sink.push_all(&[base - 1, base, base + 1]);
        }
    }
    Ok(sink.finish())
}

/// See [`BoundedCornerCases`].
///
/// # Errors
///
/// [`GenError::InvalidSpecification`] if `max < min` or `step_exp < 1`.
pub fn corner_cases_by_bounds(min: i64, max: i64, step_exp: i64) -> Result<Box<[i64]>, GenError> {
    if max < min {
        return Err(GenError::invalid(format!(
            "max {max} is smaller than min {min}"
        )));
    }
    let start_exp = lower_exponent(min);
    let stop_exp = upper_exponent(max);
    let count = count_iterations(start_exp, stop_exp, step_exp)?;
    tracing::debug!(
        min,
        max,
        start_exp,
        stop_exp,
        step_exp,
        "generating bounded corner cases"
    );

    let mut sink = CornerSink::new(count, Some((min, max)));
    sink.push(i128::from(min));
    for k in 0..count {
        let base = power_base(start_exp + k * step_exp);
        sink.push_all(&[base - 1, base, base + 1]);
    }
    sink.push(i128::from(max));
    Ok(sink.finish())
}

/// `2^e` for non-negative `e`, `-2^|e|` otherwise. Exact for `|e| <= 63`.
fn power_base(exp: i64) -> i128 {
    let magnitude = 1_i128 << exp.unsigned_abs();
    if exp >= 0 {
        magnitude
    } else {
        -magnitude
    }
}

/// Smallest exponent whose triple can reach down to `min`.
fn lower_exponent(min: i64) -> i64 {
    match min {
        0 => 0,
        m if m > 0 => i64::from(bit_length(m)) - 1,
        m => -i64::from(bit_length(m).max(1)),
    }
}

/// Largest exponent whose triple can reach up to `max`.
fn upper_exponent(max: i64) -> i64 {
    if max >= 0 {
        return i64::from(bit_length(max));
    }
    // need 2^|e| >= !max, i.e. |e| = ceil(log2(!max)), and at least 1 to stay negative
    let magnitude = !max;
    let ceil_log2 = if magnitude <= 1 {
        0
    } else {
        bit_length(magnitude - 1)
    };
    -i64::from(ceil_log2.max(1))
}

/// Collects candidates, applying the clamp and the two-value dedup.
struct CornerSink {
    values: Vec<i64>,
    clamp: Option<(i64, i64)>,
}

impl CornerSink {
    fn new(exponents: i64, clamp: Option<(i64, i64)>) -> Self {
        let capacity = (exponents as usize) * 3 + 2;
        Self {
            values: Vec::with_capacity(capacity),
            clamp,
        }
    }

    fn push(&mut self, candidate: i128) {
        // anything outside i64 is outside every clamp too
        let Ok(value) = i64::try_from(candidate) else {
            return;
        };
        if let Some((min, max)) = self.clamp {
            if value < min || value > max {
                return;
            }
        }
        if self.values.iter().rev().take(2).any(|&recent| recent == value) {
            return;
        }
        tracing::trace!(value, "corner case");
        self.values.push(value);
    }

    fn push_all(&mut self, candidates: &[i128]) {
        for &candidate in candidates {
            self.push(candidate);
        }
    }

    fn finish(self) -> Box<[i64]> {
        if !self.values.windows(2).all(|pair| pair[0] < pair[1]) {
            report_violation!(
                ViolationSeverity::Error,
                ViolationKind::CornerCases,
                "corner cases are not strictly ascending: {:?}",
                self.values
            );
        }
        self.values.into_boxed_slice()
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

    #[test]
    fn exponent_form_trims_first_and_last() {
        let values = corner_cases_by_exponent(2, 4, 1).unwrap();
        assert_eq!(&*values, &[4, 5, 7, 8, 9, 15]);
    }

    #[test]
    fn exponent_form_interior_triples() {
        let values = corner_cases_by_exponent(3, 6, 1).unwrap();
        assert_eq!(&*values, &[8, 9, 15, 16, 17, 31, 32, 33, 63]);
    }

    #[test]
    fn exponent_form_overlapping_small_triples() {
        // {1, 2}, {1, 2, 3}, {3}
        assert_eq!(&*corner_cases_by_exponent(0, 2, 1).unwrap(), &[1, 2, 3]);
        // {1, 2}, {1}
        assert_eq!(&*corner_cases_by_exponent(0, 1, 1).unwrap(), &[1, 2]);
    }

    #[test]
    fn exponent_form_negative_exponents() {
        // bases -4, -2, 1 give {-4, -3}, {-3, -2, -1}, {0}
        let values = corner_cases_by_exponent(-2, 0, 1).unwrap();
        assert_eq!(&*values, &[-4, -3, -2, -1, 0]);
    }

    #[test]
    fn exponent_form_step_skips_exponents() {
        // exponents 2, 4, 6
        let values = corner_cases_by_exponent(2, 6, 2).unwrap();
        assert_eq!(&*values, &[4, 5, 15, 16, 17, 63]);
    }

    #[test]
    fn exponent_form_last_iterated_exponent_is_last() {
        // exponents 2 and 4; 5 is never reached
        let values = corner_cases_by_exponent(2, 5, 2).unwrap();
        assert_eq!(&*values, &[4, 5, 15]);
    }

    #[test]
    fn exponent_form_extreme_exponents() {
        let values = corner_cases_by_exponent(61, 62, 1).unwrap();
        assert_eq!(&*values, &[1 << 61, (1 << 61) + 1, (1 << 62) - 1]);

        let values = corner_cases_by_exponent(-62, -61, 1).unwrap();
        assert_eq!(&*values, &[-(1 << 62), -(1 << 62) + 1, -(1 << 61) - 1]);
    }

    #[test]
    fn exponent_form_rejections() {
        for (start, stop, step) in [
            (4, 4, 1),
            (0, 63, 1),
            (-63, 0, 1),
            (0, i64::MAX, 1),
            (5, 2, 1),
            (2, 5, 0),
            (2, 5, 10),
        ] {
            assert!(
                corner_cases_by_exponent(start, stop, step)
                    .unwrap_err()
                    .is_invalid_specification(),
                "({start}, {stop}, {step}) should be rejected"
            );
        }
    }

    #[test]
    fn bounds_form_example() {
        let values = corner_cases_by_bounds(4, 15, 1).unwrap();
        assert_eq!(&*values, &[4, 5, 7, 8, 9, 15]);
    }

    #[test]
    fn bounds_form_appends_non_corner_max() {
        let values = corner_cases_by_bounds(5, 20, 1).unwrap();
        assert_eq!(&*values, &[5, 7, 8, 9, 15, 16, 17, 20]);
    }

    #[test]
    fn bounds_form_single_value() {
        assert_eq!(&*corner_cases_by_bounds(6, 6, 1).unwrap(), &[6]);
        assert_eq!(&*corner_cases_by_bounds(0, 0, 1).unwrap(), &[0]);
        assert_eq!(&*corner_cases_by_bounds(-1, -1, 1).unwrap(), &[-1]);
    }

    #[test]
    fn bounds_form_across_zero() {
        let values = corner_cases_by_bounds(-5, 5, 1).unwrap();
        assert_eq!(&*values, &[-5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn bounds_form_negative_range() {
        let values = corner_cases_by_bounds(-20, -6, 1).unwrap();
        assert_eq!(&*values, &[-20, -17, -16, -15, -9, -8, -7, -6]);
    }

    #[test]
    fn bounds_form_full_i64_range() {
        let values = corner_cases_by_bounds(i64::MIN, i64::MAX, 1).unwrap();
        assert_eq!(values.first(), Some(&i64::MIN));
        assert_eq!(values.last(), Some(&i64::MAX));
        assert!(values.contains(&(i64::MIN + 1)));
        assert!(values.contains(&(1 << 62)));
        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn bounds_form_rejections() {
        assert!(corner_cases_by_bounds(10, 9, 1)
            .unwrap_err()
            .is_invalid_specification());
        assert!(corner_cases_by_bounds(1, 9, 0)
            .unwrap_err()
            .is_invalid_specification());
    }

    #[test]
    fn exponent_helpers() {
        assert_eq!(lower_exponent(4), 2);
        assert_eq!(lower_exponent(5), 2);
        assert_eq!(lower_exponent(-8), -3);
        assert_eq!(lower_exponent(-9), -4);
        assert_eq!(lower_exponent(-1), -1);
        assert_eq!(lower_exponent(i64::MIN), -63);
        assert_eq!(upper_exponent(15), 4);
        assert_eq!(upper_exponent(16), 5);
        assert_eq!(upper_exponent(-5), -2);
        assert_eq!(upper_exponent(-8), -3);
        assert_eq!(upper_exponent(-1), -1);
        assert_eq!(upper_exponent(i64::MAX), 63);
        assert_eq!(power_base(-63), i128::from(i64::MIN));
    }
}
