//! Configuration for the generators that carry tunable limits.
//!
//! | Config Type | Used by | Key Presets |
//! |-------------|---------|-------------|
//! | `WildcardConfig` | [`WildcardMask`] | `small()`, `unbounded()` |
//! | `SamplingConfig` | [`RandomSamples`], [`UniqueRandomSamples`] | `unsorted()`, `always_reject()` |
//!
//! # Example
//!
//! ```
//! use intvec::{SamplingConfig, UniqueRandomSamples};
//!
//! let sampler = UniqueRandomSamples::with_config(SamplingConfig {
//!     density_factor: 8,
//!     ..SamplingConfig::default()
//! })
//! .expect("valid config");
//! # let _ = sampler;
//! ```
//!
//! [`WildcardMask`]: crate::generators::wildcard::WildcardMask
//! [`RandomSamples`]: crate::generators::sampling::RandomSamples
//! [`UniqueRandomSamples`]: crate::generators::sampling::UniqueRandomSamples

use serde::{Deserialize, Serialize};

use crate::GenError;

/// Largest number of values any generator may return: sequences are addressed
/// by a 32-bit signed length.
pub const MAX_SEQUENCE_LEN: u64 = i32::MAX as u64;

/// Default cap on the output of a wildcard expansion (2^24 values).
pub const DEFAULT_WILDCARD_LIMIT: u64 = 1 << 24;

/// Default density factor separating the permutation and rejection strategies.
pub const DEFAULT_DENSITY_FACTOR: i64 = 4;

/// Configuration for the wildcard mask generator.
///
/// # Forward Compatibility
///
/// New fields may be added to this struct in future versions. Use the
/// `..WildcardConfig::default()` pattern when constructing instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[must_use = "WildcardConfig has no effect unless passed to WildcardMask::with_config()"]
pub struct WildcardConfig {
    /// Maximum number of values a single expansion may produce.
    ///
    /// Must be between 1 and [`MAX_SEQUENCE_LEN`].
    ///
    /// Default: 2^24
    pub max_values: u64,
}

impl Default for WildcardConfig {
    fn default() -> Self {
        Self {
            max_values: DEFAULT_WILDCARD_LIMIT,
        }
    }
}

impl WildcardConfig {
    /// Creates a new `WildcardConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the 32-bit sequence length limits the expansion.
    pub const fn unbounded() -> Self {
        Self {
            max_values: MAX_SEQUENCE_LEN,
        }
    }

    /// At most 2^16 values, for quick exhaustive checks.
    pub const fn small() -> Self {
        Self { max_values: 1 << 16 }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidSpecification`] if `max_values` is zero or exceeds
    /// [`MAX_SEQUENCE_LEN`].
    pub fn validate(&self) -> Result<(), GenError> {
        if self.max_values == 0 || self.max_values > MAX_SEQUENCE_LEN {
            return Err(GenError::invalid(format!(
                "wildcard max_values must be in 1..={}, got {}",
                MAX_SEQUENCE_LEN, self.max_values
            )));
        }
        Ok(())
    }
}

/// Configuration for the random sampling generators.
///
/// # Forward Compatibility
///
/// New fields may be added to this struct in future versions. Use the
/// `..SamplingConfig::default()` pattern when constructing instances.
///
/// # Example
///
/// ```
/// use intvec::SamplingConfig;
///
/// let config = SamplingConfig {
///     sort_output: false,
///     ..SamplingConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[must_use = "SamplingConfig has no effect unless passed to a sampler's with_config()"]
pub struct SamplingConfig {
    /// Unique sampling materializes and shuffles the whole range when
    /// `range_size <= density_factor * amount`, and draws with rejection otherwise.
    ///
    /// Must be at least 1.
    ///
    /// Default: 4
    pub density_factor: i64,
    /// Sort the returned values ascending. When false, values come back in draw order.
    ///
    /// Sampling with duplicates always sorts.
    ///
    /// Default: true
    pub sort_output: bool,
    /// Maximum number of values a single call may return.
    ///
    /// Must be between 1 and [`MAX_SEQUENCE_LEN`].
    ///
    /// Default: [`MAX_SEQUENCE_LEN`]
    pub max_values: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            density_factor: DEFAULT_DENSITY_FACTOR,
            sort_output: true,
            max_values: MAX_SEQUENCE_LEN,
        }
    }
}

impl SamplingConfig {
    /// Creates a new `SamplingConfig` with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Values are returned in the order they were drawn.
    pub const fn unsorted() -> Self {
        Self {
            density_factor: DEFAULT_DENSITY_FACTOR,
            sort_output: false,
            max_values: MAX_SEQUENCE_LEN,
        }
    }

    /// Unique sampling always uses the rejection strategy, except when the range is
    /// exactly as large as the requested amount.
    pub const fn always_reject() -> Self {
        Self {
            density_factor: 1,
            sort_output: true,
            max_values: MAX_SEQUENCE_LEN,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::InvalidSpecification`] if `density_factor < 1` or `max_values`
    /// is outside `1..=MAX_SEQUENCE_LEN`.
    pub fn validate(&self) -> Result<(), GenError> {
        if self.density_factor < 1 {
            return Err(GenError::invalid(format!(
                "density_factor must be >= 1, got {}",
                self.density_factor
            )));
        }
        if self.max_values == 0 || self.max_values > MAX_SEQUENCE_LEN {
            return Err(GenError::invalid(format!(
                "sampling max_values must be in 1..={}, got {}",
                MAX_SEQUENCE_LEN, self.max_values
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_defaults() {
        let config = WildcardConfig::default();
        assert_eq!(config.max_values, 16_777_216);
        assert_eq!(config, WildcardConfig::new());
        config.validate().unwrap();
    }

    #[test]
    fn wildcard_presets_validate() {
        WildcardConfig::small().validate().unwrap();
        WildcardConfig::unbounded().validate().unwrap();
    }

    #[test]
    fn wildcard_rejects_out_of_bounds_cap() {
        assert!(WildcardConfig { max_values: 0 }
            .validate()
            .unwrap_err()
            .is_invalid_specification());
        assert!(WildcardConfig {
            max_values: MAX_SEQUENCE_LEN + 1
        }
        .validate()
        .is_err());
    }

    #[test]
    fn sampling_defaults() {
        let config = SamplingConfig::default();
        assert_eq!(config.density_factor, 4);
        assert!(config.sort_output);
        assert_eq!(config.max_values, MAX_SEQUENCE_LEN);
        config.validate().unwrap();
    }

    #[test]
    fn sampling_presets() {
        assert!(!SamplingConfig::unsorted().sort_output);
        assert_eq!(SamplingConfig::always_reject().density_factor, 1);
        SamplingConfig::unsorted().validate().unwrap();
        SamplingConfig::always_reject().validate().unwrap();
    }

    #[test]
    fn sampling_rejects_bad_factor() {
        let err = SamplingConfig {
            density_factor: 0,
            ..SamplingConfig::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("density_factor"));
    }

    #[test]
    fn sampling_deserializes_partial_documents() {
        let config: SamplingConfig = serde_json::from_str(r#"{"sort_output": false}"#).unwrap();
        assert_eq!(config, SamplingConfig::unsorted());
    }
}
