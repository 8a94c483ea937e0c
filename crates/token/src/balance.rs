//! Per-holder balances: one record per (account, symbol code).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use rankblock_core::{AccountName, Amount, Entity, Symbol, SymbolCode};

use crate::error::{LedgerError, LedgerResult};
use crate::store::{BalanceKey, LedgerStore};

/// One holder's balance of one symbol.
///
/// `payer` is the identity charged for the record's storage: whoever caused
/// it to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    owner: AccountName,
    balance: Amount,
    payer: AccountName,
}

impl AccountBalance {
    pub fn owner(&self) -> &AccountName {
        &self.owner
    }

    pub fn balance(&self) -> &Amount {
        &self.balance
    }

    pub fn payer(&self) -> &AccountName {
        &self.payer
    }
}

impl Entity for AccountBalance {
    type Id = BalanceKey;

    fn id(&self) -> BalanceKey {
        (self.owner.clone(), self.balance.symbol().code().clone())
    }
}

/// Balance records as seen from inside a transaction.
pub struct BalanceLedger<'t, S: ?Sized> {
    store: &'t S,
    staged: &'t mut HashMap<BalanceKey, Option<AccountBalance>>,
}

impl<'t, S> BalanceLedger<'t, S>
where
    S: LedgerStore + ?Sized,
{
    pub(crate) fn new(
        store: &'t S,
        staged: &'t mut HashMap<BalanceKey, Option<AccountBalance>>,
    ) -> Self {
        Self { store, staged }
    }

    pub fn find(
        &self,
        owner: &AccountName,
        code: &SymbolCode,
    ) -> LedgerResult<Option<AccountBalance>> {
        let key = (owner.clone(), code.clone());
        if let Some(row) = self.staged.get(&key) {
            return Ok(row.clone());
        }
        Ok(self.store.load_balance(&key)?)
    }

    /// Add `amount` to `owner`, creating the record (charged to `payer`) if
    /// it does not exist. The supply cap upstream bounds the result.
    pub fn credit(
        &mut self,
        owner: &AccountName,
        amount: &Amount,
        payer: &AccountName,
    ) -> LedgerResult<AccountBalance> {
        let code = amount.symbol().code();
        let row = match self.find(owner, code)? {
            Some(mut row) => {
                row.balance = row.balance.checked_add(amount)?;
                row
            }
            None => AccountBalance {
                owner: owner.clone(),
                balance: amount.clone(),
                payer: payer.clone(),
            },
        };
        self.stage(row.clone());
        Ok(row)
    }

    /// Take `amount` from `owner`. A record spent down to exactly zero is
    /// erased; `None` is returned in that case.
    pub fn debit(
        &mut self,
        owner: &AccountName,
        amount: &Amount,
    ) -> LedgerResult<Option<AccountBalance>> {
        let code = amount.symbol().code();
        let mut row = self.find(owner, code)?.ok_or_else(|| LedgerError::NoBalance {
            owner: owner.clone(),
            symbol: code.clone(),
        })?;

        if row.balance.value() < amount.value() {
            return Err(LedgerError::InsufficientFunds {
                owner: owner.clone(),
                balance: row.balance.to_string(),
                requested: amount.to_string(),
            });
        }

        row.balance = row.balance.checked_sub(amount)?;
        if row.balance.is_zero() {
            self.staged.insert((owner.clone(), code.clone()), None);
            return Ok(None);
        }
        self.stage(row.clone());
        Ok(Some(row))
    }

    /// Create an empty record for `owner` under `symbol`, charged to `owner`.
    pub fn provision(
        &mut self,
        owner: &AccountName,
        symbol: &Symbol,
    ) -> LedgerResult<AccountBalance> {
        if self.find(owner, symbol.code())?.is_some() {
            return Err(LedgerError::AlreadyRegistered(owner.clone()));
        }
        let row = AccountBalance {
            owner: owner.clone(),
            balance: Amount::zero(symbol.clone()),
            payer: owner.clone(),
        };
        self.stage(row.clone());
        Ok(row)
    }

    fn stage(&mut self, row: AccountBalance) {
        self.staged.insert(row.id(), Some(row));
    }
}
