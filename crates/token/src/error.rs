//! Ledger error model.

use thiserror::Error;

use rankblock_auth::AuthzError;
use rankblock_core::{AccountName, DomainError, SymbolCode};

use crate::store::StoreError;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Why a ledger operation was rejected.
///
/// Every variant aborts the whole operation; nothing it staged is committed.
/// None of them is transient.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid symbol name: {0}")]
    InvalidSymbol(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount must be positive: {0}")]
    NonPositiveAmount(String),

    #[error("max supply must be positive: {0}")]
    NonPositiveMax(String),

    #[error("token with symbol {0} already exists")]
    AlreadyExists(SymbolCode),

    #[error("token with symbol {0} does not exist")]
    UnknownToken(SymbolCode),

    #[error("quantity {requested} exceeds available supply {available}")]
    SupplyExceeded { available: String, requested: String },

    #[error("symbol precision mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: String, actual: String },

    #[error("memo has {len} bytes, at most {max} allowed")]
    MemoTooLong { len: usize, max: usize },

    #[error("cannot transfer to self")]
    SelfTransfer,

    #[error("account {0} does not exist")]
    UnknownAccount(AccountName),

    #[error("no {symbol} balance object found for {owner}")]
    NoBalance { owner: AccountName, symbol: SymbolCode },

    #[error("overdrawn balance: {owner} holds {balance}, needs {requested}")]
    InsufficientFunds {
        owner: AccountName,
        balance: String,
        requested: String,
    },

    #[error("{0} is already registered")]
    AlreadyRegistered(AccountName),

    #[error("missing authority of {0}")]
    Unauthorized(AccountName),

    #[error("amount overflow")]
    Overflow,

    #[error(transparent)]
    Domain(DomainError),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<AuthzError> for LedgerError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::MissingAuthority(account) => LedgerError::Unauthorized(account),
        }
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::SymbolMismatch { left, right } => LedgerError::SymbolMismatch {
                expected: left,
                actual: right,
            },
            DomainError::Overflow => LedgerError::Overflow,
            other => LedgerError::Domain(other),
        }
    }
}
