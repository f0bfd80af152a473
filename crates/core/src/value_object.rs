//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have no identity of their own — they are defined entirely by
/// their attribute values and are immutable once built. Filter criteria and
/// derived dashboard figures are value objects; a stock item or a requisition
/// record (which keeps its id across edits) is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
