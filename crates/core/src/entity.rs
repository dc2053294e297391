//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Collections look entities up through this trait, so matching by identity
/// stays independent of whatever else an entity carries.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;

    /// True when this entity carries the given identifier.
    fn has_id(&self, id: Self::Id) -> bool {
        self.id() == id
    }
}
