//! Error types for gridwise.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for fallible core helpers.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while decoding cell notation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The text is not an `A1`-style reference.
    #[error("Invalid cell notation: {0}")]
    InvalidCellNotation(String),

    /// The text is not a run of column letters.
    #[error("Invalid column letters: {0}")]
    InvalidColumn(String),
}

/// Error kinds reported inside an [`OperationResult`](crate::OperationResult).
///
/// Local operations never fail across the engine boundary; they return a
/// result carrying one of these instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum OperationError {
    /// No local intent matched. Not a failure: triggers the remote fallback.
    #[error("No local command matched this instruction")]
    Unhandled,

    /// A cell, range or column could not be resolved.
    #[error("{0}")]
    OperandNotFound(String),

    /// A division with a zero divisor was requested.
    #[error("{0}")]
    DivisionByZero(String),

    /// A formula could not be parsed or evaluated.
    #[error("Formula error: {0}")]
    FormulaSyntax(String),

    /// The remote collaborator failed.
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// The entitlement collaborator denied a remote call.
    #[error("{0}")]
    QuotaExceeded(String),

    /// The instruction exceeded the length cap and was not parsed.
    #[error("Instruction is {len} characters long; the limit is {max}")]
    PromptTooLong { len: usize, max: usize },
}

impl OperationError {
    /// Create an operand-not-found error.
    pub fn operand(message: impl Into<String>) -> Self {
        Self::OperandNotFound(message.into())
    }

    /// Stable snake_case name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unhandled => "unhandled",
            Self::OperandNotFound(_) => "operand_not_found",
            Self::DivisionByZero(_) => "division_by_zero",
            Self::FormulaSyntax(_) => "formula_syntax",
            Self::RemoteService(_) => "remote_service",
            Self::QuotaExceeded(_) => "quota_exceeded",
            Self::PromptTooLong { .. } => "prompt_too_long",
        }
    }
}
