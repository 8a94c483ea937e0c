use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rankblock_core::{AccountName, TransactionId};

use crate::event::Event;

/// Envelope for an event addressed to one recipient account.
///
/// One committed transaction produces one envelope per (event, recipient)
/// pair. Notes:
/// - `transaction_id` groups the envelopes of a single ledger operation.
/// - `sequence_number` is the envelope's position within that transaction,
///   starting at 1.
/// - `payload` is the domain-agnostic event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    transaction_id: TransactionId,
    recipient: AccountName,

    /// Monotonically increasing position within the transaction.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        transaction_id: TransactionId,
        recipient: AccountName,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            transaction_id,
            recipient,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.transaction_id
    }

    pub fn recipient(&self) -> &AccountName {
        &self.recipient
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Type name of the wrapped event, for routing without decoding the payload.
    pub fn event_type(&self) -> &'static str {
        self.payload.event_type()
    }
}
