use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use rankblock_core::AccountName;

/// Existence check for destination accounts.
pub trait AccountDirectory: Send + Sync {
    fn is_account(&self, account: &AccountName) -> bool;
}

impl<D> AccountDirectory for Arc<D>
where
    D: AccountDirectory + ?Sized,
{
    fn is_account(&self, account: &AccountName) -> bool {
        (**self).is_account(account)
    }
}

/// In-memory account directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountDirectory {
    accounts: RwLock<HashSet<AccountName>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accounts(accounts: impl IntoIterator<Item = AccountName>) -> Self {
        Self {
            accounts: RwLock::new(accounts.into_iter().collect()),
        }
    }

    /// Register an account. Returns `false` if it was already known.
    pub fn register(&self, account: AccountName) -> bool {
        match self.accounts.write() {
            Ok(mut accounts) => accounts.insert(account),
            Err(_) => false,
        }
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    fn is_account(&self, account: &AccountName) -> bool {
        self.accounts
            .read()
            .map(|accounts| accounts.contains(account))
            .unwrap_or(false)
    }
}
