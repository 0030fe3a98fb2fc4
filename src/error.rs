//! The error type shared by every generator.

use std::error::Error;
use std::fmt;
use std::fmt::Display;

/// This enum contains all error messages the generators can return. Every generating
/// function returns a [`Result<Box<[i64]>, GenError>`] or a narrowed/list variant of it.
///
/// None of these errors is recovered internally and none is retryable: generation either
/// fully succeeds or fails before any output is handed back.
///
/// [`Result<Box<[i64]>, GenError>`]: std::result::Result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenError {
    /// The specification is structurally invalid, e.g. `stop < start`, `step < 1`, an empty
    /// wildcard pattern or more unique samples than the range holds.
    InvalidSpecification {
        /// Further specifies why the specification was rejected.
        info: String,
    },
    /// A value did not fit into the target integer width during narrowing.
    OutOfRange {
        /// The value that could not be narrowed.
        value: i64,
        /// Name of the target type, e.g. `"i32"`.
        target: &'static str,
    },
    /// A valid specification would still produce more values than fit into a sequence
    /// addressed by a 32-bit length, or more than a configured output cap.
    TooManyValues {
        /// The number of values the specification asks for. Saturates at `u64::MAX`.
        requested: u64,
        /// The largest number of values that may be produced.
        limit: u64,
    },
}

impl GenError {
    pub(crate) fn invalid(info: impl Into<String>) -> Self {
        Self::InvalidSpecification { info: info.into() }
    }

    /// Returns true if this error reports a structurally invalid specification.
    #[must_use]
    pub const fn is_invalid_specification(&self) -> bool {
        matches!(self, Self::InvalidSpecification { .. })
    }

    /// Returns true if this error reports a failed narrowing conversion.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        matches!(self, Self::OutOfRange { .. })
    }

    /// Returns true if this error reports an oversized output.
    #[must_use]
    pub const fn is_too_many_values(&self) -> bool {
        matches!(self, Self::TooManyValues { .. })
    }
}

impl Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenError::InvalidSpecification { info } => {
                write!(f, "Invalid specification: {}", info)
            }
            GenError::OutOfRange { value, target } => {
                write!(f, "Value {} does not fit into {}", value, target)
            }
            GenError::TooManyValues { requested, limit } => {
                write!(
                    f,
                    "Specification would produce {} values, at most {} are allowed",
                    requested, limit
                )
            }
        }
    }
}

impl Error for GenError {}
