//! All values matching a bit pattern with wildcards.
//!
//! A pattern fixes some bits to `0` or `1` and leaves the others free. In text form it is
//! written most significant bit first, with `X`, `x`, `*` or `?` marking a free bit, so
//! `*10*1` describes base `0b01001` with wildcard mask `0b10010` and matches
//! `9, 11, 25, 27`.
//!
//! # Example
//!
//! ```
//! use intvec::{wildcard_expand, wildcard_format, wildcard_parse};
//!
//! let (base, mask) = wildcard_parse("*10*1")?;
//! assert_eq!((base, mask), (9, 18));
//! assert_eq!(wildcard_format(base, mask), "*10*1");
//! assert_eq!(&*wildcard_expand(base, mask)?, &[9, 11, 25, 27]);
//! # Ok::<(), intvec::GenError>(())
//! ```

use crate::config::WildcardConfig;
use crate::generator::{check_output_len, IntegerListGenerator};
use crate::range_check::unsigned_bit_length;
use crate::telemetry::ViolationKind;
use crate::GenError;

/// Characters accepted as a wildcard bit by [`wildcard_parse`].
pub const WILDCARD_GLYPHS: [char; 4] = ['X', 'x', '*', '?'];

/// Character [`wildcard_format`] writes for a wildcard bit.
pub const FORMAT_GLYPH: char = '*';

/// Longest pattern [`wildcard_parse`] accepts: one character per bit of an `i64`.
pub const MAX_PATTERN_LEN: usize = 64;

/// Expands a base value and a wildcard mask into every matching value.
///
/// Control values: `(base, wildcard_mask, unused)`.
///
/// Bits set in the mask are cleared in the base first, so `(0b111, 0b010)` and
/// `(0b101, 0b010)` describe the same pattern.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WildcardMask {
    config: WildcardConfig,
}

impl WildcardMask {
    /// Creates a generator with the default output cap of 2^24 values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidSpecification`] if the configuration does not validate.
    pub fn with_config(config: WildcardConfig) -> Result<Self, GenError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this generator was built with.
    #[must_use]
    pub const fn config(&self) -> &WildcardConfig {
        &self.config
    }

    /// Every value obtained by independently setting each bit of `wildcard_bits` to
    /// 0 or 1, in ascending numeric order.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::TooManyValues`] if `wildcard_bits` has 63 or more bits set, or
    /// if `2^popcount` exceeds the configured cap.
    pub fn mask_expansion(&self, wildcard_bits: i64) -> Result<Box<[i64]>, GenError> {
        let bits = wildcard_bits as u64;
        let free = bits.count_ones();
        let limit = self.config.max_values;
        if free >= 63 {
            return Err(GenError::TooManyValues {
                requested: 1_u64.checked_shl(free).unwrap_or(u64::MAX),
                limit,
            });
        }
        let total = 1_u64 << free;
        if total > limit {
            return Err(GenError::TooManyValues {
                requested: total,
                limit,
            });
        }
        tracing::debug!(wildcard_bits, free, total, "expanding wildcard mask");

        let sign = bits & (1 << 63);
        let low = bits & !sign;
        let mut values = Vec::with_capacity(total as usize);
        // a wildcard sign bit puts the negative half first
        if sign != 0 {
            push_subsets(&mut values, low, sign);
        }
        push_subsets(&mut values, low, 0);

        check_output_len(ViolationKind::Wildcard, total as usize, values.len());
        Ok(values.into_boxed_slice())
    }

    /// Every value equal to `base` outside the wildcard bits.
    ///
    /// # Errors
    ///
    /// As for [`mask_expansion`](Self::mask_expansion).
    pub fn expand(&self, base: i64, wildcard_mask: i64) -> Result<Box<[i64]>, GenError> {
        let fixed = base & !wildcard_mask;
        let mut values = self.mask_expansion(wildcard_mask)?;
        for value in values.iter_mut() {
            *value |= fixed;
        }
        Ok(values)
    }

    /// Parses `pattern` and expands it.
    ///
    /// # Errors
    ///
    /// As for [`wildcard_parse`] and [`mask_expansion`](Self::mask_expansion).
    pub fn expand_pattern(&self, pattern: &str) -> Result<Box<[i64]>, GenError> {
        let (base, wildcard_mask) = wildcard_parse(pattern)?;
        self.expand(base, wildcard_mask)
    }
}

impl IntegerListGenerator for WildcardMask {
    fn generate(&mut self, base: i64, wildcard_mask: i64, _: i64) -> Result<Box<[i64]>, GenError> {
        self.expand(base, wildcard_mask)
    }
}

/// Pushes `prefix | subset` for every subset of `bits`, smallest first.
fn push_subsets(values: &mut Vec<i64>, bits: u64, prefix: u64) {
    let mut subset = 0_u64;
    loop {
        values.push((prefix | subset) as i64);
        // next larger subset of `bits`
        subset = subset.wrapping_sub(bits) & bits;
        if subset == 0 {
            break;
        }
    }
}

/// Expands `(base, wildcard_mask)` with the default configuration.
///
/// # Errors
///
/// See [`WildcardMask::mask_expansion`].
pub fn wildcard_expand(base: i64, wildcard_mask: i64) -> Result<Box<[i64]>, GenError> {
    WildcardMask::new().expand(base, wildcard_mask)
}

/// Parses a textual pattern into `(base, wildcard_mask)`.
///
/// The pattern is read most significant bit first; `0` and `1` fix a bit, any of
/// [`WILDCARD_GLYPHS`] frees it. Leading and trailing whitespace is ignored.
///
/// # Errors
///
/// Returns [`GenError::InvalidSpecification`] if the pattern is empty after trimming,
/// longer than [`MAX_PATTERN_LEN`] characters, or contains any other character.
pub fn wildcard_parse(pattern: &str) -> Result<(i64, i64), GenError> {
    let trimmed = pattern.trim();
    if trimmed.is_empty() {
        return Err(GenError::invalid("wildcard pattern is empty"));
    }
    let len = trimmed.chars().count();
    if len > MAX_PATTERN_LEN {
        return Err(GenError::invalid(format!(
            "wildcard pattern has {len} characters, at most {MAX_PATTERN_LEN} are allowed"
        )));
    }

    let mut base = 0_u64;
    let mut mask = 0_u64;
    for (position, glyph) in trimmed.chars().enumerate() {
        base <<= 1;
        mask <<= 1;
        match glyph {
            '0' => {},
            '1' => base |= 1,
            g if WILDCARD_GLYPHS.contains(&g) => mask |= 1,
            other => {
                return Err(GenError::invalid(format!(
                    "unexpected character {other:?} at position {position} of wildcard pattern {trimmed:?}"
                )));
            },
        }
    }
    Ok((base as i64, mask as i64))
}

/// Formats `(base, wildcard_mask)` as a pattern [`wildcard_parse`] reads back.
///
/// Uses [`FORMAT_GLYPH`] for wildcard bits and the fewest characters that hold every set
/// bit, at least one. Bits of `base` under the mask are not represented.
#[must_use]
pub fn wildcard_format(base: i64, wildcard_mask: i64) -> String {
    let width = unsigned_bit_length(base & !wildcard_mask)
        .max(unsigned_bit_length(wildcard_mask))
        .max(1);
    let fixed = (base & !wildcard_mask) as u64;
    let mask = wildcard_mask as u64;

    (0..width)
        .rev()
        .map(|bit| {
            if (mask >> bit) & 1 == 1 {
                FORMAT_GLYPH
            } else if (fixed >> bit) & 1 == 1 {
                '1'
            } else {
                '0'
            }
        })
        .collect()
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
    fn expands_documented_pattern() {
        assert_eq!(&*wildcard_expand(9, 18).unwrap(), &[9, 11, 25, 27]);
    }

    #[test]
    fn base_bits_under_mask_are_cleared() {
        assert_eq!(
            wildcard_expand(0b111, 0b010).unwrap(),
            wildcard_expand(0b101, 0b010).unwrap()
        );
        assert_eq!(&*wildcard_expand(0b111, 0b010).unwrap(), &[0b101, 0b111]);
    }

    #[test]
    fn mask_expansion_orders_ascending() {
        let generator = WildcardMask::new();
        assert_eq!(&*generator.mask_expansion(0).unwrap(), &[0]);
        assert_eq!(
            &*generator.mask_expansion(0b1011).unwrap(),
            &[0, 1, 2, 3, 8, 9, 10, 11]
        );
    }

    #[test]
    fn mask_expansion_sign_bit_orders_negatives_first() {
        let generator = WildcardMask::new();
        let values = generator.mask_expansion(i64::MIN | 1).unwrap();
        assert_eq!(&*values, &[i64::MIN, i64::MIN | 1, 0, 1]);
        assert_eq!(&*generator.mask_expansion(i64::MIN).unwrap(), &[i64::MIN, 0]);
        let values = generator.expand(0b100, i64::MIN | 0b11).unwrap();
        assert_eq!(
            &*values,
            &[i64::MIN | 4, i64::MIN | 5, i64::MIN | 6, i64::MIN | 7, 4, 5, 6, 7]
        );
    }

    #[test]
    fn mask_expansion_respects_cap() {
        let generator = WildcardMask::with_config(WildcardConfig { max_values: 8 }).unwrap();
        assert_eq!(generator.mask_expansion(0b111).unwrap().len(), 8);
        assert_eq!(
            generator.mask_expansion(0b1111).unwrap_err(),
            GenError::TooManyValues {
                requested: 16,
                limit: 8,
            }
        );
    }

    #[test]
    fn mask_expansion_rejects_63_wildcards() {
        let generator = WildcardMask::with_config(WildcardConfig::unbounded()).unwrap();
        assert!(generator
            .mask_expansion(i64::MAX)
            .unwrap_err()
            .is_too_many_values());
        assert_eq!(
            generator.mask_expansion(-1).unwrap_err(),
            GenError::TooManyValues {
                requested: u64::MAX,
                limit: WildcardConfig::unbounded().max_values,
            }
        );
    }

    #[test]
    fn default_cap_is_two_to_the_24() {
        assert_eq!(WildcardMask::new().config().max_values, 1 << 24);
        assert_eq!(wildcard_expand(0, (1 << 12) - 1).unwrap().len(), 1 << 12);
        assert!(wildcard_expand(0, (1 << 25) - 1)
            .unwrap_err()
            .is_too_many_values());
    }

    #[test]
    fn parse_accepts_every_glyph_and_whitespace() {
        assert_eq!(wildcard_parse("  X1x0*?  ").unwrap(), (0b010000, 0b101011));
        assert_eq!(wildcard_parse("\t1\n").unwrap(), (1, 0));
        assert_eq!(wildcard_parse("0001").unwrap(), (1, 0));
    }

    #[test]
    fn parse_full_width_pattern() {
        let pattern = format!("1{}", "0".repeat(63));
        assert_eq!(wildcard_parse(&pattern).unwrap(), (i64::MIN, 0));
        let pattern = format!("*{}", "1".repeat(63));
        assert_eq!(wildcard_parse(&pattern).unwrap(), (i64::MAX, i64::MIN));
    }

    #[test]
    fn parse_rejections() {
        for pattern in ["", "   ", "10a1", "1 0", "0b101", "2"] {
            assert!(
                wildcard_parse(pattern)
                    .unwrap_err()
                    .is_invalid_specification(),
                "{pattern:?} should be rejected"
            );
        }
        assert!(wildcard_parse(&"0".repeat(65))
            .unwrap_err()
            .is_invalid_specification());
    }

    #[test]
    fn format_examples() {
        assert_eq!(wildcard_format(9, 18), "*10*1");
        assert_eq!(wildcard_format(0, 0), "0");
        assert_eq!(wildcard_format(1, 0), "1");
        assert_eq!(wildcard_format(0, 4), "*00");
        assert_eq!(wildcard_format(0b111, 0b010), "1*1");
        assert_eq!(wildcard_format(-1, 0).len(), 64);
    }

    #[test]
    fn generate_ignores_third_value() {
        let mut generator = WildcardMask::new();
        assert_eq!(
            generator.generate(9, 18, 0).unwrap(),
            generator.generate(9, 18, -77).unwrap()
        );
        assert_eq!(
            generator.generate_list(9, 18, 0).unwrap(),
            vec![9, 11, 25, 27]
        );
    }

    #[test]
    fn expand_pattern_parses_then_expands() {
        let values = WildcardMask::new().expand_pattern("1?").unwrap();
        assert_eq!(&*values, &[2, 3]);
    }
}
