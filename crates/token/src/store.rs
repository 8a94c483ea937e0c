//! Storage boundary for ledger records.
//!
//! The ledger reads committed records through [`LedgerStore`] and hands back
//! one [`ChangeSet`] per successful operation. How records are physically
//! kept is the store's business; [`InMemoryLedgerStore`] is the tests/dev
//! implementation.

use std::collections::HashMap;

use thiserror::Error;

use rankblock_core::{AccountName, Entity, SymbolCode};

use crate::balance::AccountBalance;
use crate::registry::SupplyStats;

/// Key of a balance record: one per (holder, symbol code).
pub type BalanceKey = (AccountName, SymbolCode);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("commit rejected: {0}")]
    CommitRejected(String),
}

/// Committed ledger state.
///
/// `commit` must apply a change set entirely or not at all.
pub trait LedgerStore {
    fn load_stats(&self, code: &SymbolCode) -> Result<Option<SupplyStats>, StoreError>;

    fn load_balance(&self, key: &BalanceKey) -> Result<Option<AccountBalance>, StoreError>;

    fn commit(&mut self, changes: ChangeSet) -> Result<(), StoreError>;
}

/// Writes staged by one transaction.
///
/// Stats records are only ever upserted. A balance entry of `None` erases
/// the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub(crate) stats: HashMap<SymbolCode, SupplyStats>,
    pub(crate) balances: HashMap<BalanceKey, Option<AccountBalance>>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.balances.is_empty()
    }

    pub fn stats(&self) -> impl Iterator<Item = &SupplyStats> {
        self.stats.values()
    }

    pub fn balances(&self) -> impl Iterator<Item = (&BalanceKey, Option<&AccountBalance>)> {
        self.balances.iter().map(|(key, row)| (key, row.as_ref()))
    }
}

/// Rows of one record type, keyed by the record's entity id.
#[derive(Debug, Clone)]
struct Table<E: Entity> {
    rows: HashMap<E::Id, E>,
}

impl<E: Entity + Clone> Table<E> {
    fn get(&self, id: &E::Id) -> Option<E> {
        self.rows.get(id).cloned()
    }

    fn upsert(&mut self, row: E) {
        self.rows.insert(row.id(), row);
    }

    fn erase(&mut self, id: &E::Id) {
        self.rows.remove(id);
    }

    fn rows(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

/// In-memory ledger store for tests/dev.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedgerStore {
    stats: Table<SupplyStats>,
    balances: Table<AccountBalance>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stats record, in no particular order.
    pub fn all_stats(&self) -> impl Iterator<Item = &SupplyStats> {
        self.stats.rows()
    }

    /// Every balance record held under `code`, in no particular order.
    pub fn balances_of<'a>(
        &'a self,
        code: &'a SymbolCode,
    ) -> impl Iterator<Item = &'a AccountBalance> {
        self.balances
            .rows()
            .filter(move |row| row.balance().symbol().code() == code)
    }

    pub fn balance_count(&self) -> usize {
        self.balances.rows.len()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn load_stats(&self, code: &SymbolCode) -> Result<Option<SupplyStats>, StoreError> {
        Ok(self.stats.get(code))
    }

    fn load_balance(&self, key: &BalanceKey) -> Result<Option<AccountBalance>, StoreError> {
        Ok(self.balances.get(key))
    }

    fn commit(&mut self, changes: ChangeSet) -> Result<(), StoreError> {
        for (_, stats) in changes.stats {
            self.stats.upsert(stats);
        }
        for (key, row) in changes.balances {
            match row {
                Some(row) => self.balances.upsert(row),
                None => self.balances.erase(&key),
            }
        }
        Ok(())
    }
}
