//! Named ledger actions.
//!
//! Hosts that receive operations as data (a queue, an RPC body) decode them
//! into a [`LedgerAction`] and hand it to [`TokenLedger::dispatch`]:
//!
//! ```json
//! {"action": "transfer", "from": "alice", "to": "bob", "quantity": "200.0000 RB", "memo": "rent"}
//! ```

use serde::{Deserialize, Serialize};

use rankblock_auth::{AccountDirectory, Authorizer};
use rankblock_core::{AccountName, Amount};
use rankblock_events::EventBus;

use crate::error::LedgerResult;
use crate::event::Notification;
use crate::ledger::{Receipt, TokenLedger};
use crate::store::LedgerStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LedgerAction {
    Create {
        issuer: AccountName,
        maximum_supply: Amount,
    },
    Issue {
        to: AccountName,
        quantity: Amount,
        #[serde(default)]
        memo: String,
    },
    Transfer {
        from: AccountName,
        to: AccountName,
        quantity: Amount,
        #[serde(default)]
        memo: String,
    },
    #[serde(rename = "regairdrop")]
    ProvisionAccount { receiver: AccountName },
}

impl LedgerAction {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerAction::Create { .. } => "create",
            LedgerAction::Issue { .. } => "issue",
            LedgerAction::Transfer { .. } => "transfer",
            LedgerAction::ProvisionAccount { .. } => "regairdrop",
        }
    }
}

impl<S, D, B> TokenLedger<S, D, B>
where
    S: LedgerStore,
    D: AccountDirectory,
    B: EventBus<Notification>,
{
    /// Route an action to its operation.
    pub fn dispatch(
        &mut self,
        auth: &dyn Authorizer,
        action: LedgerAction,
    ) -> LedgerResult<Receipt> {
        tracing::debug!(action = action.name(), "dispatching ledger action");
        match action {
            LedgerAction::Create {
                issuer,
                maximum_supply,
            } => self.create_token(auth, issuer, maximum_supply),
            LedgerAction::Issue { to, quantity, memo } => self.issue(auth, to, quantity, &memo),
            LedgerAction::Transfer {
                from,
                to,
                quantity,
                memo,
            } => self.transfer(auth, from, to, quantity, &memo),
            LedgerAction::ProvisionAccount { receiver } => self.provision_account(receiver),
        }
    }
}
