//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two instances holding the same value are
/// interchangeable. They are immutable once constructed, and construction is
/// where validation happens, so holding one is proof the value is valid.
///
/// ```ignore
/// let a = RecipeText::new("  Pancakes  ")?;
/// let b = RecipeText::new("Pancakes")?;
/// assert_eq!(a, b); // equal by value after normalisation
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
