//! `rankblock-token`: fungible-token ledger core.
//!
//! Tracks, per token symbol, an issuer, a current supply and an immutable
//! supply cap, plus one balance record per holder. Operations:
//!
//! - [`TokenLedger::create_token`]: register a symbol (contract account only)
//! - [`TokenLedger::issue`]: mint up to the cap (issuer only)
//! - [`TokenLedger::transfer`]: move balance between holders (sender only)
//! - [`TokenLedger::provision_account`]: pre-register a holder (anyone)
//!
//! Pure domain logic: storage, identity verification and notification
//! delivery are injected collaborators.

pub mod action;
pub mod balance;
pub mod config;
pub mod error;
pub mod event;
pub mod ledger;
pub mod registry;
pub mod store;
pub mod transaction;

pub use action::LedgerAction;
pub use balance::{AccountBalance, BalanceLedger};
pub use config::LedgerConfig;
pub use error::{LedgerError, LedgerResult};
pub use event::{
    AccountProvisioned, LedgerEvent, Notification, SupplyIssued, TokenCreated, Transferred,
};
pub use ledger::{Receipt, TokenLedger};
pub use registry::{SupplyRegistry, SupplyStats};
pub use store::{BalanceKey, ChangeSet, InMemoryLedgerStore, LedgerStore, StoreError};
pub use transaction::Transaction;
