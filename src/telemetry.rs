//! Reporting of broken internal invariants.
//!
//! A rejected request is a [`GenError`] and never shows up here. This module is for the
//! cases that no input should be able to cause: a generator filling a different number of
//! values than it sized its buffer for, corner cases coming out of order, or the random
//! source being asked to draw from an empty range. Those are logged as structured
//! `tracing` events and the call carries on.
//!
//! ```
//! use intvec::telemetry::{SpecViolation, ViolationKind, ViolationSeverity};
//!
//! let violation = SpecViolation::new(
//!     ViolationSeverity::Error,
//!     ViolationKind::Wildcard,
//!     "generated 3 values, expected 4",
//!     "wildcard.rs:1",
//! )
//! .with_context("mask", "0b11");
//! assert_eq!(violation.kind.as_str(), "wildcard");
//! ```
//!
//! [`GenError`]: crate::GenError

use std::collections::BTreeMap;
use std::fmt;

/// How far the result of the reporting call can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViolationSeverity {
    /// The call fell back to a well-defined value and continued.
    Warning,
    /// The returned values may not have the documented shape.
    Error,
}

impl ViolationSeverity {
    /// Lowercase name used as the `severity` log field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a violation was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum ViolationKind {
    /// [`LinearRange`](crate::LinearRange).
    Range,
    /// The power-of-two generators.
    CornerCases,
    /// [`WildcardMask`](crate::WildcardMask).
    Wildcard,
    /// The random sampling generators.
    Sampling,
    /// The random source itself.
    Random,
}

impl ViolationKind {
    /// Snake-case name used as the `kind` log field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Range => "range",
            Self::CornerCases => "corner_cases",
            Self::Wildcard => "wildcard",
            Self::Sampling => "sampling",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecViolation {
    /// How far the result can be trusted.
    pub severity: ViolationSeverity,
    /// Which component detected it.
    pub kind: ViolationKind,
    /// What went wrong.
    pub message: String,
    /// `file:line` of the check.
    pub location: &'static str,
    /// Control values and counts relevant to the failure.
    pub context: BTreeMap<String, String>,
}

impl SpecViolation {
    /// A violation without context.
    #[must_use]
    pub fn new(
        severity: ViolationSeverity,
        kind: ViolationKind,
        message: impl Into<String>,
        location: &'static str,
    ) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            location,
            context: BTreeMap::new(),
        }
    }

    /// Adds one `key=value` pair to the context.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    fn context_text(&self) -> String {
        let pairs: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        pairs.join(" ")
    }
}

impl fmt::Display for SpecViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {} (at {})",
            self.severity, self.kind, self.message, self.location
        )?;
        if !self.context.is_empty() {
            write!(f, " {}", self.context_text())?;
        }
        Ok(())
    }
}

/// Emits violations as `tracing` events: `warn!` for warnings and `error!` otherwise.
///
/// `severity`, `kind`, `location` and `context` are structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    /// Logs `violation`.
    pub fn on_violation(&self, violation: &SpecViolation) {
        let severity = violation.severity.as_str();
        let kind = violation.kind.as_str();
        let location = violation.location;
        let context = violation.context_text();
        match violation.severity {
            ViolationSeverity::Warning => tracing::warn!(
                severity,
                kind,
                location,
                context = %context,
                "{}",
                violation.message
            ),
            ViolationSeverity::Error => tracing::error!(
                severity,
                kind,
                location,
                context = %context,
                "{}",
                violation.message
            ),
        }
    }
}

/// Builds a [`SpecViolation`] located at the call site and logs it through
/// [`TracingObserver`].
///
/// ```
/// use intvec::report_violation;
/// use intvec::telemetry::{ViolationKind, ViolationSeverity};
///
/// report_violation!(ViolationSeverity::Warning, ViolationKind::Random, "empty range");
/// report_violation!(
///     ViolationSeverity::Error,
///     ViolationKind::Range,
///     "generated {} values, expected {}",
///     4,
///     5
/// );
/// ```
#[macro_export]
macro_rules! report_violation {
    ($severity:expr, $kind:expr, $msg:literal) => {{
        let violation = $crate::telemetry::SpecViolation::new(
            $severity,
            $kind,
            $msg,
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};

    ($severity:expr, $kind:expr, $fmt:literal, $($arg:tt)+) => {{
        let violation = $crate::telemetry::SpecViolation::new(
            $severity,
            $kind,
            format!($fmt, $($arg)+),
            concat!(file!(), ":", line!()),
        );
        $crate::telemetry::TracingObserver.on_violation(&violation);
    }};
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
    fn severity_ordering() {
        assert!(ViolationSeverity::Warning < ViolationSeverity::Error);
    }

    #[test]
    fn display_includes_context() {
        let violation = SpecViolation::new(
            ViolationSeverity::Error,
            ViolationKind::CornerCases,
            "something broke",
            "test.rs:1",
        )
        .with_context("expected", 6)
        .with_context("actual", 7);
        assert_eq!(
            violation.to_string(),
            "[error/corner_cases] something broke (at test.rs:1) actual=7 expected=6"
        );
    }

    #[test]
    fn display_without_context() {
        let violation = SpecViolation::new(
            ViolationSeverity::Warning,
            ViolationKind::Random,
            "empty range",
            "rng.rs:9",
        );
        assert_eq!(violation.to_string(), "[warning/random] empty range (at rng.rs:9)");
    }

    #[test]
    fn macro_forms_log_without_subscriber() {
        report_violation!(ViolationSeverity::Warning, ViolationKind::Sampling, "plain");
        report_violation!(
            ViolationSeverity::Error,
            ViolationKind::Wildcard,
            "formatted {}",
            1
        );
    }
}
