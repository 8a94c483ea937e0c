//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Ledger records (supply statistics, account balances) are entities: a
/// record keeps its key while its fields change.
pub trait Entity {
    /// Strongly-typed entity identifier (the record's storage key).
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
