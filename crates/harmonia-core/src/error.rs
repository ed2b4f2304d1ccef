//! Core error types for harmonia-core.
//!
//! Recoverable input problems never surface here; those become
//! [`crate::diagnostics::Diagnostic`] values on the operation result.
//! This module covers the conditions the engine refuses to paper over,
//! chiefly data-integrity violations in collaborator-supplied records.

use thiserror::Error;

use crate::calendar::LocalDate;
use crate::progress::Category;

/// Core error type for harmonia-core.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A persisted daily record regressed a completion flag from true to
    /// false. Flags are monotonic; a regression means an upstream bug and
    /// is reported rather than silently corrected.
    #[error(
        "integrity violation for user '{user_id}' on {date}: {category} flag regressed true -> false"
    )]
    FlagRegression {
        user_id: String,
        date: LocalDate,
        category: Category,
    },

    /// A supplied daily record belongs to a different user than the ledger.
    #[error("record for user '{record_user}' cannot be merged into ledger for '{ledger_user}'")]
    UserMismatch {
        ledger_user: String,
        record_user: String,
    },

    /// A collaborator-supplied milestone catalog failed to parse.
    #[error("invalid milestone catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

/// Result type alias for EngineError
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
