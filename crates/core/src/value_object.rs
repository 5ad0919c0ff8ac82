//! Value object trait: equality by value, not identity.

/// Marker for immutable values compared by their attributes.
///
/// Measurements and money amounts are value objects: two `Meters(250)` are the
/// same length no matter which order they came from.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// struct Meters(u32);
///
/// impl ValueObject for Meters {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
