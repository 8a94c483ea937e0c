//! Ledger events and their delivery mechanics.
//!
//! Domain crates describe *what happened* with [`Event`] payloads; this crate
//! wraps them in per-recipient [`EventEnvelope`]s and fans them out over an
//! [`EventBus`].

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
