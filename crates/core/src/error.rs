//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the primitives themselves
/// (parsing, validation, checked arithmetic). Ledger rules have their own
/// error type in `rankblock-token`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Arithmetic was attempted between amounts of different symbols.
    #[error("symbol mismatch: {left} vs {right}")]
    SymbolMismatch { left: String, right: String },

    /// Checked arithmetic left the representable amount range.
    #[error("amount overflow")]
    Overflow,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
