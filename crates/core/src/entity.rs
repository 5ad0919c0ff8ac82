//! Entity trait: identity that survives state changes.

/// Anything addressed by a stable identifier (catalog items, orders).
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
