use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rankblock_core::AccountName;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("missing authority of '{0}'")]
    MissingAuthority(AccountName),
}

/// Caller-identity check invoked by the ledger before it mutates state.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub trait Authorizer {
    /// Whether `account` approved the current call.
    fn has_auth(&self, account: &AccountName) -> bool;

    /// Fail unless `account` approved the current call.
    fn require_auth(&self, account: &AccountName) -> Result<(), AuthzError> {
        if self.has_auth(account) {
            Ok(())
        } else {
            tracing::debug!(account = %account, "authorization denied");
            Err(AuthzError::MissingAuthority(account.clone()))
        }
    }
}

impl<A> Authorizer for &A
where
    A: Authorizer + ?Sized,
{
    fn has_auth(&self, account: &AccountName) -> bool {
        (**self).has_auth(account)
    }
}

/// The set of accounts whose authority accompanies a call.
///
/// This is what a host builds after verifying signatures: every account in
/// the set is treated as having approved the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerSet {
    signers: BTreeSet<AccountName>,
}

impl SignerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Authority of exactly one account.
    pub fn single(account: AccountName) -> Self {
        let mut set = Self::new();
        set.insert(account);
        set
    }

    pub fn insert(&mut self, account: AccountName) {
        self.signers.insert(account);
    }

    pub fn with(mut self, account: AccountName) -> Self {
        self.insert(account);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccountName> {
        self.signers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl FromIterator<AccountName> for SignerSet {
    fn from_iter<I: IntoIterator<Item = AccountName>>(iter: I) -> Self {
        Self {
            signers: iter.into_iter().collect(),
        }
    }
}

impl Authorizer for SignerSet {
    fn has_auth(&self, account: &AccountName) -> bool {
        self.signers.contains(account)
    }
}

/// Adapter turning a verifier function into an [`Authorizer`].
///
/// ```ignore
/// let auth = AuthorizeFn(|account: &AccountName| session.verified(account));
/// ledger.transfer(&auth, from, to, quantity, memo)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AuthorizeFn<F>(pub F);

impl<F> Authorizer for AuthorizeFn<F>
where
    F: Fn(&AccountName) -> bool,
{
    fn has_auth(&self, account: &AccountName) -> bool {
        (self.0)(account)
    }
}
