//! Default-value comparison.

/// Returns true if `value` equals the default value of its type.
///
/// Structural equality is used, so a struct is zero only when every field is.
#[must_use]
pub fn is_zero<T>(value: &T) -> bool
where
    T: Default + PartialEq,
{
    *value == T::default()
}
