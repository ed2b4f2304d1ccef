//! Diagnostic signals surfaced by the engine.
//!
//! The engine never writes to a global logger. Recoverable anomalies
//! (a malformed UTC offset, an unknown milestone kind in a supplied
//! catalog) are collected as [`Diagnostic`] values on the operation's
//! result so the surrounding system can forward them to whatever
//! observability pipe it owns.

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational, no data quality impact
    Info,
    /// Input was recovered with a safe default
    Warning,
    /// A unit of work was skipped entirely
    Error,
}

/// A single diagnostic emitted during an engine operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity of the signal
    pub severity: Severity,
    /// Stable machine-readable code (e.g. `offset-fallback`)
    pub code: String,
    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Create an info-level diagnostic
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a warning-level diagnostic
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an error-level diagnostic
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Diagnostic code: a missing or out-of-range UTC offset fell back to UTC.
pub const CODE_OFFSET_FALLBACK: &str = "offset-fallback";
/// Diagnostic code: an event for a different user was ignored.
pub const CODE_FOREIGN_USER_EVENT: &str = "foreign-user-event";
/// Diagnostic code: a catalog entry carried an unknown milestone kind.
pub const CODE_UNKNOWN_MILESTONE_KIND: &str = "unknown-milestone-kind";
/// Diagnostic code: one milestone failed to evaluate and was skipped.
pub const CODE_MILESTONE_EVAL_FAILED: &str = "milestone-eval-failed";
