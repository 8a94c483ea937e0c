//! Process-local notification fan-out.
//!
//! Hosts that run the ledger and its notification consumers in one process
//! (and the test suites) deliver envelopes through [`InMemoryEventBus`]
//! instead of an external broker.

use std::sync::{Mutex, PoisonError, mpsc};

use thiserror::Error;

use crate::bus::{EventBus, Subscription};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InMemoryBusError {
    /// A publisher panicked while holding the subscriber list.
    #[error("event bus lock poisoned")]
    Poisoned,
}

/// Broadcasts each published message to every live subscription.
///
/// A subscription only sees messages published after it was created. When a
/// subscription is dropped its channel is pruned on the next publish.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }

    /// Live subscriptions, as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.senders.lock().map_or(0, |senders| senders.len())
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut senders = self
            .senders
            .lock()
            .map_err(|_| InMemoryBusError::Poisoned)?;
        senders.retain(|sender| sender.send(message.clone()).is_ok());
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (sender, receiver) = mpsc::channel();
        // Registering a channel cannot break the list, so a poisoned lock is
        // still usable here.
        self.senders
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        Subscription::new(receiver)
    }
}
