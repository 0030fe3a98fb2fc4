//! Descriptive generation requests.
//!
//! A [`GenerationRequest`] names a generator together with its three control values, so a
//! sequence can be described by a line of text or a serialized document instead of a
//! function call.
//!
//! # Text form
//!
//! One keyword followed by whitespace-separated decimal integers:
//!
//! | Text | Generator |
//! |------|-----------|
//! | `range START STOP STEP` | [`range_generate`] |
//! | `corners START_EXP STOP_EXP STEP_EXP` | [`corner_cases_by_exponent`] |
//! | `bounds MIN MAX STEP_EXP` | [`corner_cases_by_bounds`] |
//! | `mask PATTERN` or `mask BASE MASK` | [`wildcard_expand`] |
//! | `random MIN MAX AMOUNT` | [`sample_with_duplicates`] |
//! | `unique MIN MAX AMOUNT` | [`sample_without_duplicates`] |
//!
//! Keywords are case-insensitive. [`Display`](std::fmt::Display) writes the canonical form,
//! which parses back to the same request.
//!
//! # Example
//!
//! ```
//! use intvec::rng::{Pcg32, SeedableRng};
//! use intvec::GenerationRequest;
//!
//! let request: GenerationRequest = "mask x10x1".parse()?;
//! assert_eq!(request, GenerationRequest::Mask { base: 9, mask: 18 });
//! assert_eq!(request.to_string(), "mask 9 18");
//!
//! let mut rng = Pcg32::seed_from_u64(1);
//! assert_eq!(&*request.generate(&mut rng)?, &[9, 11, 25, 27]);
//! # Ok::<(), intvec::GenError>(())
//! ```
//!
//! [`range_generate`]: crate::range_generate
//! [`corner_cases_by_exponent`]: crate::corner_cases_by_exponent
//! [`corner_cases_by_bounds`]: crate::corner_cases_by_bounds
//! [`wildcard_expand`]: crate::wildcard_expand
//! [`sample_with_duplicates`]: crate::sample_with_duplicates
//! [`sample_without_duplicates`]: crate::sample_without_duplicates

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::generators::corner_cases::{corner_cases_by_bounds, corner_cases_by_exponent};
use crate::generators::linear::range_generate;
use crate::generators::sampling::{sample_with_duplicates, sample_without_duplicates};
use crate::generators::wildcard::{wildcard_expand, wildcard_parse};
use crate::rng::Rng;
use crate::GenError;

/// A generator selection plus its control values.
///
/// Serialized internally tagged by `kind`:
///
/// ```json
/// { "kind": "range", "start": 0, "stop": 10, "step": 5 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    /// `start, start + step, ...` up to `stop`.
    Range {
        /// First value.
        start: i64,
        /// Inclusive upper bound.
        stop: i64,
        /// Distance between values.
        step: i64,
    },
    /// Corner cases around `2^e` for every `step_exp`-th exponent.
    Corners {
        /// First exponent.
        start_exp: i64,
        /// Inclusive upper bound on the exponent.
        stop_exp: i64,
        /// Distance between exponents.
        step_exp: i64,
    },
    /// Corner cases between two values, plus the values themselves.
    Bounds {
        /// Smallest value.
        min: i64,
        /// Largest value.
        max: i64,
        /// Distance between exponents.
        step_exp: i64,
    },
    /// Every value obtained by setting wildcard bits of `base` freely.
    Mask {
        /// Fixed bits.
        base: i64,
        /// Wildcard bits.
        mask: i64,
    },
    /// Independent uniform samples, sorted.
    Random {
        /// Smallest value.
        min: i64,
        /// Largest value.
        max: i64,
        /// Number of samples.
        amount: i64,
    },
    /// Distinct uniform samples, sorted.
    Unique {
        /// Smallest value.
        min: i64,
        /// Largest value.
        max: i64,
        /// Number of samples.
        amount: i64,
    },
}

impl GenerationRequest {
    /// The keyword that introduces this request in text form.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Range { .. } => "range",
            Self::Corners { .. } => "corners",
            Self::Bounds { .. } => "bounds",
            Self::Mask { .. } => "mask",
            Self::Random { .. } => "random",
            Self::Unique { .. } => "unique",
        }
    }

    /// Whether the output depends on the random source.
    #[must_use]
    pub const fn is_random(&self) -> bool {
        matches!(self, Self::Random { .. } | Self::Unique { .. })
    }

    /// Runs the selected generator with its default configuration.
    ///
    /// `rng` is only drawn from by [`Random`](Self::Random) and [`Unique`](Self::Unique).
    ///
    /// # Errors
    ///
    /// Whatever the selected generator returns.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Box<[i64]>, GenError> {
        tracing::trace!(request = %self, "running generation request");
        match *self {
            Self::Range { start, stop, step } => range_generate(start, stop, step),
            Self::Corners {
                start_exp,
                stop_exp,
                step_exp,
            } => corner_cases_by_exponent(start_exp, stop_exp, step_exp),
            Self::Bounds { min, max, step_exp } => corner_cases_by_bounds(min, max, step_exp),
            Self::Mask { base, mask } => wildcard_expand(base, mask),
            Self::Random { min, max, amount } => sample_with_duplicates(min, max, amount, rng),
            Self::Unique { min, max, amount } => sample_without_duplicates(min, max, amount, rng),
        }
    }
}

impl fmt::Display for GenerationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = self.keyword();
        match *self {
            Self::Range { start, stop, step } => write!(f, "{keyword} {start} {stop} {step}"),
            Self::Corners {
                start_exp,
                stop_exp,
                step_exp,
            } => write!(f, "{keyword} {start_exp} {stop_exp} {step_exp}"),
            Self::Bounds { min, max, step_exp } => write!(f, "{keyword} {min} {max} {step_exp}"),
            Self::Mask { base, mask } => write!(f, "{keyword} {base} {mask}"),
            Self::Random { min, max, amount } | Self::Unique { min, max, amount } => {
                write!(f, "{keyword} {min} {max} {amount}")
            }
        }
    }
}

impl FromStr for GenerationRequest {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or_else(|| GenError::invalid("empty generation request"))?
            .to_ascii_lowercase();
        let args: Vec<&str> = tokens.collect();

        if keyword == "mask" {
            return match args.as_slice() {
                [pattern] => {
                    let (base, mask) = wildcard_parse(pattern)?;
                    Ok(Self::Mask { base, mask })
                }
                [base, mask] => Ok(Self::Mask {
                    base: parse_value(base)?,
                    mask: parse_value(mask)?,
                }),
                _ => Err(GenError::invalid(format!(
                    "mask takes a pattern or two integers, got {} arguments",
                    args.len()
                ))),
            };
        }

        let [a, b, c] = match args.as_slice() {
            [a, b, c] => [parse_value(a)?, parse_value(b)?, parse_value(c)?],
            _ => {
                return Err(GenError::invalid(format!(
                    "{keyword} takes three integers, got {} arguments",
                    args.len()
                )))
            }
        };
        match keyword.as_str() {
            "range" => Ok(Self::Range {
                start: a,
                stop: b,
                step: c,
            }),
            "corners" => Ok(Self::Corners {
                start_exp: a,
                stop_exp: b,
                step_exp: c,
            }),
            "bounds" => Ok(Self::Bounds {
                min: a,
                max: b,
                step_exp: c,
            }),
            "random" => Ok(Self::Random {
                min: a,
                max: b,
                amount: c,
            }),
            "unique" => Ok(Self::Unique {
                min: a,
                max: b,
                amount: c,
            }),
            other => Err(GenError::invalid(format!(
                "unknown generator '{other}'"
            ))),
        }
    }
}

fn parse_value(token: &str) -> Result<i64, GenError> {
    token
        .parse()
        .map_err(|err| GenError::invalid(format!("'{token}' is not a 64-bit integer: {err}")))
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

    fn parse(text: &str) -> GenerationRequest {
        text.parse().unwrap()
    }

    #[test]
    fn parses_every_keyword() {
        assert_eq!(
            parse("range 0 10 5"),
            GenerationRequest::Range {
                start: 0,
                stop: 10,
                step: 5
            }
        );
        assert_eq!(
            parse("corners 2 4 1"),
            GenerationRequest::Corners {
                start_exp: 2,
                stop_exp: 4,
                step_exp: 1
            }
        );
        assert_eq!(
            parse("bounds -20 -6 1"),
            GenerationRequest::Bounds {
                min: -20,
                max: -6,
                step_exp: 1
            }
        );
        assert_eq!(
            parse("mask 9 18"),
            GenerationRequest::Mask { base: 9, mask: 18 }
        );
        assert_eq!(
            parse("random 1 6 20"),
            GenerationRequest::Random {
                min: 1,
                max: 6,
                amount: 20
            }
        );
        assert_eq!(
            parse("unique 1 100 10"),
            GenerationRequest::Unique {
                min: 1,
                max: 100,
                amount: 10
            }
        );
    }

    #[test]
    fn keyword_case_and_whitespace_are_flexible() {
        assert_eq!(parse("  RANGE\t1  2 1 "), parse("range 1 2 1"));
    }

    #[test]
    fn mask_pattern_form() {
        assert_eq!(
            parse("mask x10x1"),
            GenerationRequest::Mask { base: 9, mask: 18 }
        );
    }

    #[test]
    fn display_parses_back() {
        for text in [
            "range -5 5 2",
            "corners 0 10 3",
            "bounds 4 15 1",
            "mask 9 18",
            "random -1 1 4",
            "unique 0 9 10",
        ] {
            let request = parse(text);
            assert_eq!(request.to_string(), text);
            assert_eq!(parse(&request.to_string()), request);
        }
    }

    #[test]
    fn rejects_malformed_text() {
        for text in [
            "",
            "   ",
            "range 1 2",
            "range 1 2 3 4",
            "range a 2 3",
            "range 1 2 99999999999999999999",
            "spiral 1 2 3",
            "mask",
            "mask 1 2 3",
            "mask 10z",
        ] {
            assert!(
                text.parse::<GenerationRequest>()
                    .unwrap_err()
                    .is_invalid_specification(),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn corners_stop_exponent_is_inclusive() {
        let mut rng = Pcg32::seed_from_u64(0);
        // exponents 2 and 4 are both selected; 4 contributes 2^4 - 1
        assert_eq!(
            &*parse("corners 2 4 2").generate(&mut rng).unwrap(),
            &[4, 5, 15]
        );
    }

    #[test]
    fn generate_dispatches() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(
            &*parse("range 1 10 4").generate(&mut rng).unwrap(),
            &[1, 5, 9]
        );
        assert_eq!(
            &*parse("corners 2 4 1").generate(&mut rng).unwrap(),
            &[4, 5, 7, 8, 9, 15]
        );
        assert_eq!(
            &*parse("bounds 4 15 1").generate(&mut rng).unwrap(),
            &[4, 5, 7, 8, 9, 15]
        );
        assert_eq!(
            &*parse("mask 9 18").generate(&mut rng).unwrap(),
            &[9, 11, 25, 27]
        );
        assert_eq!(
            &*parse("unique 1 3 3").generate(&mut rng).unwrap(),
            &[1, 2, 3]
        );
        assert_eq!(parse("random 0 0 2").generate(&mut rng).unwrap().len(), 2);
    }

    #[test]
    fn generate_propagates_errors() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(parse("unique 1 3 5")
            .generate(&mut rng)
            .unwrap_err()
            .is_invalid_specification());
        assert!(parse("range 10 0 1")
            .generate(&mut rng)
            .unwrap_err()
            .is_invalid_specification());
    }

    #[test]
    fn deterministic_requests_leave_rng_untouched() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut reference = Pcg32::seed_from_u64(11);
        let request = parse("range 0 100 7");
        assert!(!request.is_random());
        request.generate(&mut rng).unwrap();
        assert_eq!(rng.next_u32(), reference.next_u32());
    }

    #[test]
    fn serde_internally_tagged() {
        let request = GenerationRequest::Range {
            start: 0,
            stop: 10,
            step: 5,
        };
        let json = serde_json::to_value(request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "range", "start": 0, "stop": 10, "step": 5})
        );
        let back: GenerationRequest =
            serde_json::from_str(r#"{"kind":"unique","min":1,"max":9,"amount":3}"#).unwrap();
        assert_eq!(
            back,
            GenerationRequest::Unique {
                min: 1,
                max: 9,
                amount: 3
            }
        );
        assert!(serde_json::from_str::<GenerationRequest>(r#"{"kind":"spiral"}"#).is_err());
    }
}
