//! Comparators accepted by [`RbTree`](crate::RbTree).
//!
//! A comparator is a three-way ordering function over the stored value type.
//! It must be a strict total order that stays consistent for the lifetime of
//! the tree; a comparator that violates this is only detected indirectly,
//! through [`RbTree::is_valid`](crate::RbTree::is_valid) returning `false`.

use alloc::sync::Arc;
use core::cmp::Ordering;

use num_traits::float::FloatCore;
use ordered_float::{OrderedFloat, PrimitiveFloat};

/// Shared three-way comparison function.
///
/// Clones of a tree share the same comparator instance instead of copying it.
/// A tree is `Send`/`Sync` whenever its value type is.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Returns the comparator for types with a natural total order.
///
/// # Returns
///
/// * `Comparator<T>` - A comparator delegating to [`Ord::cmp`]
pub fn ordered<T: Ord + 'static>() -> Comparator<T> {
    Arc::new(|a: &T, b: &T| a.cmp(b))
}

/// Returns a total-order comparator for primitive floats.
///
/// Values are compared as [`OrderedFloat`]: `NaN` sorts above every other
/// value (including `+inf`) and equals itself, `-0.0` equals `0.0`.
///
/// # Returns
///
/// * `Comparator<T>` - A comparator over `f32`/`f64`
pub fn float<T: FloatCore + PrimitiveFloat + 'static>() -> Comparator<T> {
    Arc::new(|a: &T, b: &T| OrderedFloat(*a).cmp(&OrderedFloat(*b)))
}
