//! Nested set model: a rooted tree stored as a flat set of elements.
//!
//! Each element carries a [`Bound`] `[left, right]`, its depth-first entry and
//! exit visitation numbers. Ancestry is interval containment: `a` is an ancestor
//! of `b` iff `a.left < b.left && a.right > b.right`. Parent, children,
//! ancestors and descendants are all answered from bounds alone, with no
//! pointers between elements.
//!
//! [`NestedSet`] owns the elements and keeps their bounds consistent across
//! [`add_root`](NestedSet::add_root), [`add_child`](NestedSet::add_child) and
//! [`remove_child`](NestedSet::remove_child).
//!
//! ```
//! use nestedset::{Bound, NestedSet, NestedSetElement};
//!
//! struct Category {
//!     name: String,
//!     bound: Bound,
//! }
//!
//! impl NestedSetElement for Category {
//!     type Key = String;
//!     fn key(&self) -> String { self.name.clone() }
//!     fn bound(&self) -> Bound { self.bound }
//!     fn set_bound(&mut self, bound: Bound) { self.bound = bound; }
//! }
//!
//! let category = |name: &str| Category { name: name.into(), bound: Bound::default() };
//!
//! let mut set = NestedSet::new();
//! set.add_root(category("books"))?;
//! set.add_child(&"books".to_string(), category("fiction"))?;
//! set.add_child(&"fiction".to_string(), category("crime"))?;
//!
//! let parent = set.parent_of(&"crime".to_string())?.map(|c| c.name.as_str());
//! assert_eq!(parent, Some("fiction"));
//! assert_eq!(set.get(&"books".to_string()).map(|c| c.bound), Some(Bound::new(1, 6)?));
//! # Ok::<(), nestedset::NestedSetError>(())
//! ```

pub mod bound;
pub mod element;
pub mod errors;
pub mod nested_set;
pub mod tree_traits;
pub mod util;

pub use bound::Bound;
pub use element::NestedSetElement;
pub use errors::{NestedSetError, NestedSetResult};
pub use nested_set::NestedSet;
pub use tree_traits::TreeNodeConvert;
