//! Overflow-safe narrowing and range checks.
//!
//! Every generator sizes its output buffer from a handful of 64-bit quantities. The helpers
//! here decide whether those quantities fit into a narrower domain *without* computing a
//! value that might itself wrap, so a bad specification is rejected instead of silently
//! producing a mis-sized buffer.
//!
//! # Example
//!
//! ```
//! use intvec::range_check::{fits_in_32, narrow_to_32, safe_difference_fits_64};
//!
//! assert!(fits_in_32(-5));
//! assert!(narrow_to_32(1 << 40).is_err());
//! assert!(!safe_difference_fits_64(i64::MIN, 0));
//! ```

use crate::error::GenError;

/// Returns true if `value` is representable as an `i32`.
#[inline]
#[must_use]
pub const fn fits_in_32(value: i64) -> bool {
    value >= i32::MIN as i64 && value <= i32::MAX as i64
}

/// Narrows `value` to an `i32`.
///
/// # Errors
///
/// Returns [`GenError::OutOfRange`] if `value` does not fit.
#[inline]
pub fn narrow_to_32(value: i64) -> Result<i32, GenError> {
    i32::try_from(value).map_err(|_| GenError::OutOfRange {
        value,
        target: "i32",
    })
}

/// Returns true if `b - a` is representable as an `i64`.
///
/// The check is made on the signs of the operands; the subtraction is never evaluated
/// when it could wrap.
#[must_use]
pub const fn safe_difference_fits_64(a: i64, b: i64) -> bool {
    if (a >= 0) == (b >= 0) {
        // same sign: |b - a| <= max(|a|, |b|) and the result cannot leave the domain
        true
    } else if b >= 0 {
        // b - a >= 0, fits iff b <= i64::MAX + a (a < 0, so the sum cannot overflow)
        b <= i64::MAX + a
    } else {
        // b - a < 0, fits iff b >= i64::MIN + a (a >= 0)
        b >= i64::MIN + a
    }
}

/// Returns true if `b - a` is representable as an `i32`.
#[must_use]
pub const fn safe_difference_fits_32(a: i64, b: i64) -> bool {
    safe_difference_fits_64(a, b) && fits_in_32(b - a)
}

/// Number of bits needed to represent `value` in two's complement, excluding the sign bit.
///
/// Non-negative values count their significant bits; a negative value has the bit length
/// of its complement, so `bit_length(-1) == 0` and `bit_length(-8) == 3`.
#[inline]
#[must_use]
pub const fn bit_length(value: i64) -> u32 {
    let magnitude = if value < 0 { !value } else { value };
    64 - magnitude.leading_zeros()
}

/// Number of bits needed to represent the unsigned bit pattern of `value`.
#[inline]
#[must_use]
pub(crate) const fn unsigned_bit_length(value: i64) -> u32 {
    64 - (value as u64).leading_zeros()
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
    fn fits_in_32_boundaries() {
        assert!(fits_in_32(0));
        assert!(fits_in_32(i64::from(i32::MAX)));
        assert!(fits_in_32(i64::from(i32::MIN)));
        assert!(!fits_in_32(i64::from(i32::MAX) + 1));
        assert!(!fits_in_32(i64::from(i32::MIN) - 1));
        assert!(!fits_in_32(i64::MAX));
        assert!(!fits_in_32(i64::MIN));
    }

    #[test]
    fn narrow_to_32_reports_value() {
        assert_eq!(narrow_to_32(-17).unwrap(), -17);
        assert_eq!(
            narrow_to_32(i64::MAX),
            Err(GenError::OutOfRange {
                value: i64::MAX,
                target: "i32",
            })
        );
    }

    #[test]
    fn difference_64_extremes() {
        assert!(safe_difference_fits_64(0, i64::MAX));
        assert!(safe_difference_fits_64(i64::MIN, -1));
        assert!(safe_difference_fits_64(-1, i64::MAX - 1));
        assert!(!safe_difference_fits_64(-1, i64::MAX));
        assert!(!safe_difference_fits_64(i64::MIN, 0));
        assert!(safe_difference_fits_64(1, i64::MIN + 1));
        assert!(!safe_difference_fits_64(1, i64::MIN));
        assert!(safe_difference_fits_64(0, i64::MIN));
        assert!(!safe_difference_fits_64(i64::MAX, i64::MIN));
    }

    #[test]
    fn difference_32_extremes() {
        assert!(safe_difference_fits_32(0, i64::from(i32::MAX)));
        assert!(!safe_difference_fits_32(-1, i64::from(i32::MAX)));
        assert!(safe_difference_fits_32(0, i64::from(i32::MIN)));
        assert!(!safe_difference_fits_32(1, i64::from(i32::MIN)));
        assert!(!safe_difference_fits_32(i64::MIN, i64::MAX));
        assert!(safe_difference_fits_32(i64::MAX - 10, i64::MAX));
    }

    #[test]
    fn bit_length_matches_twos_complement() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(4), 3);
        assert_eq!(bit_length(15), 4);
        assert_eq!(bit_length(16), 5);
        assert_eq!(bit_length(i64::MAX), 63);
        assert_eq!(bit_length(-1), 0);
        assert_eq!(bit_length(-8), 3);
        assert_eq!(bit_length(-9), 4);
        assert_eq!(bit_length(i64::MIN), 63);
    }

    #[test]
    fn unsigned_bit_length_counts_sign_bit() {
        assert_eq!(unsigned_bit_length(0), 0);
        assert_eq!(unsigned_bit_length(9), 4);
        assert_eq!(unsigned_bit_length(-1), 64);
        assert_eq!(unsigned_bit_length(i64::MIN), 64);
    }
}


/// Kani proofs for the difference checks.
///
/// Run proofs with:
///   cargo kani --tests
#[cfg(kani)]
mod kani_proofs {
    use super::*;

    /// Proof: the check never claims a difference fits when the wide result does not.
    #[kani::proof]
    fn proof_difference_64_sound() {
        let a: i64 = kani::any();
        let b: i64 = kani::any();
        let wide = i128::from(b) - i128::from(a);
        let fits = wide >= i128::from(i64::MIN) && wide <= i128::from(i64::MAX);
        kani::assert(
            safe_difference_fits_64(a, b) == fits,
            "difference check must agree with widened subtraction",
        );
    }
}
