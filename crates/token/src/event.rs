use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rankblock_core::{AccountName, Amount};
use rankblock_events::{Event, EventEnvelope};

/// A ledger event addressed to one notified account.
pub type Notification = EventEnvelope<LedgerEvent>;

/// Event: TokenCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCreated {
    pub issuer: AccountName,
    pub maximum_supply: Amount,
    pub occurred_at: DateTime<Utc>,
}

/// Event: SupplyIssued. Always credited to the issuer first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyIssued {
    pub issuer: AccountName,
    pub to: AccountName,
    pub quantity: Amount,
    pub memo: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: Transferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transferred {
    pub from: AccountName,
    pub to: AccountName,
    pub quantity: Amount,
    pub memo: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AccountProvisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProvisioned {
    pub receiver: AccountName,
    pub balance: Amount,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    TokenCreated(TokenCreated),
    SupplyIssued(SupplyIssued),
    Transferred(Transferred),
    AccountProvisioned(AccountProvisioned),
}

impl LedgerEvent {
    /// Accounts that receive a notification for this event.
    pub fn recipients(&self) -> Vec<AccountName> {
        match self {
            LedgerEvent::SupplyIssued(e) => vec![e.issuer.clone()],
            LedgerEvent::Transferred(e) => vec![e.from.clone(), e.to.clone()],
            LedgerEvent::TokenCreated(_) | LedgerEvent::AccountProvisioned(_) => Vec::new(),
        }
    }
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::TokenCreated(_) => "token.created",
            LedgerEvent::SupplyIssued(_) => "token.issued",
            LedgerEvent::Transferred(_) => "token.transferred",
            LedgerEvent::AccountProvisioned(_) => "token.account_provisioned",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::TokenCreated(e) => e.occurred_at,
            LedgerEvent::SupplyIssued(e) => e.occurred_at,
            LedgerEvent::Transferred(e) => e.occurred_at,
            LedgerEvent::AccountProvisioned(e) => e.occurred_at,
        }
    }
}
