//! Capability implemented by the domain entity organized in a nested set.

use std::fmt::Debug;
use std::hash::Hash;

use crate::bound::Bound;

/// An entity that can be placed in a [`NestedSet`](crate::NestedSet).
///
/// Identity is the entity's own contract: `key()` decides membership and lookup,
/// and must not depend on the bound, which the container rewrites on every
/// structural change.
pub trait NestedSetElement {
    type Key: Eq + Hash + Clone + Debug;

    fn key(&self) -> Self::Key;

    fn bound(&self) -> Bound;

    fn set_bound(&mut self, bound: Bound);
}
