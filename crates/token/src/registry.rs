//! Supply statistics: one record per token symbol.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rankblock_core::{AccountName, Amount, Entity, Symbol, SymbolCode};

use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

/// Issuer, current supply and supply cap of one token symbol.
///
/// Invariant: `0 <= supply <= max_supply`, both carrying the same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyStats {
    supply: Amount,
    max_supply: Amount,
    issuer: AccountName,
}

impl SupplyStats {
    /// Fresh record with nothing issued yet.
    pub fn new(issuer: AccountName, max_supply: Amount) -> Self {
        Self {
            supply: Amount::zero(max_supply.symbol().clone()),
            max_supply,
            issuer,
        }
    }

    pub fn supply(&self) -> &Amount {
        &self.supply
    }

    pub fn max_supply(&self) -> &Amount {
        &self.max_supply
    }

    pub fn issuer(&self) -> &AccountName {
        &self.issuer
    }

    pub fn symbol(&self) -> &Symbol {
        self.supply.symbol()
    }

    /// How much can still be issued before hitting the cap.
    pub fn available(&self) -> Amount {
        Amount::new(
            self.max_supply.value() - self.supply.value(),
            self.symbol().clone(),
        )
    }
}

impl Entity for SupplyStats {
    type Id = SymbolCode;

    fn id(&self) -> SymbolCode {
        self.symbol().code().clone()
    }
}

/// Stats records as seen from inside a transaction: staged writes first,
/// then the committed store.
pub struct SupplyRegistry<'t, S: ?Sized> {
    store: &'t S,
    staged: &'t mut HashMap<SymbolCode, SupplyStats>,
}

impl<'t, S> SupplyRegistry<'t, S>
where
    S: LedgerStore + ?Sized,
{
    pub(crate) fn new(store: &'t S, staged: &'t mut HashMap<SymbolCode, SupplyStats>) -> Self {
        Self { store, staged }
    }

    pub fn find(&self, code: &SymbolCode) -> LedgerResult<Option<SupplyStats>> {
        if let Some(stats) = self.staged.get(code) {
            return Ok(Some(stats.clone()));
        }
        Ok(self.store.load_stats(code)?)
    }

    /// Register a new symbol. The caller has validated `max_supply`.
    pub fn insert(&mut self, issuer: AccountName, max_supply: Amount) -> LedgerResult<SupplyStats> {
        let code = max_supply.symbol().code().clone();
        if self.find(&code)?.is_some() {
            return Err(LedgerError::AlreadyExists(code));
        }
        let stats = SupplyStats::new(issuer, max_supply);
        self.staged.insert(code, stats.clone());
        Ok(stats)
    }

    /// Add `delta` to the current supply. The caller has checked the cap.
    pub fn increase_supply(
        &mut self,
        code: &SymbolCode,
        delta: &Amount,
    ) -> LedgerResult<SupplyStats> {
        let mut stats = self
            .find(code)?
            .ok_or_else(|| LedgerError::UnknownToken(code.clone()))?;
        stats.supply = stats.supply.checked_add(delta)?;
        self.staged.insert(code.clone(), stats.clone());
        Ok(stats)
    }
}
