//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Entities keep the same identifier across edits; two entities with the same
/// id are the same entity regardless of field values.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
