//! Transaction staging.
//!
//! An operation never writes the store directly. It reads and writes
//! through a [`Transaction`], which layers a [`ChangeSet`] over the
//! committed store. The ledger commits the change set only when the
//! operation returned `Ok`; on error the transaction is dropped and nothing
//! it staged is visible.

use chrono::{DateTime, Utc};

use rankblock_core::TransactionId;

use crate::balance::BalanceLedger;
use crate::event::LedgerEvent;
use crate::registry::SupplyRegistry;
use crate::store::{ChangeSet, LedgerStore};

pub struct Transaction<'s, S: ?Sized> {
    id: TransactionId,
    started_at: DateTime<Utc>,
    store: &'s S,
    changes: ChangeSet,
    events: Vec<LedgerEvent>,
}

impl<'s, S> Transaction<'s, S>
where
    S: LedgerStore + ?Sized,
{
    pub fn begin(store: &'s S) -> Self {
        Self {
            id: TransactionId::new(),
            started_at: Utc::now(),
            store,
            changes: ChangeSet::default(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    /// Business time stamped on every event of this transaction.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn registry(&mut self) -> SupplyRegistry<'_, S> {
        SupplyRegistry::new(self.store, &mut self.changes.stats)
    }

    pub fn balances(&mut self) -> BalanceLedger<'_, S> {
        BalanceLedger::new(self.store, &mut self.changes.balances)
    }

    pub fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn into_parts(self) -> (TransactionId, ChangeSet, Vec<LedgerEvent>) {
        (self.id, self.changes, self.events)
    }
}
