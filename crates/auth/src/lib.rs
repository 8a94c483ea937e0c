//! `rankblock-auth`: authorization boundary for ledger operations.
//!
//! The ledger never decides *how* an identity is verified. Hosts pass in an
//! [`Authorizer`] describing which accounts approved the current call, and an
//! [`AccountDirectory`] answering whether an account exists.

pub mod authorize;
pub mod directory;

pub use authorize::{AuthorizeFn, Authorizer, AuthzError, SignerSet};
pub use directory::{AccountDirectory, InMemoryAccountDirectory};
