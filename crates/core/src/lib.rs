//! `rankblock-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, token symbols and amounts, and the domain error model.

pub mod asset;
pub mod entity;
pub mod error;
pub mod id;

pub use asset::{Amount, MAX_AMOUNT, MAX_PRECISION, Symbol, SymbolCode};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountName, TransactionId};
