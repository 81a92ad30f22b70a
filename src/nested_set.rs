use std::collections::{HashMap, HashSet};

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::bound::Bound;
use crate::element::NestedSetElement;
use crate::errors::{NestedSetError, NestedSetResult};

/// Tree stored as a flat set of elements whose bounds encode the hierarchy.
///
/// The container owns its elements and is the only writer of their bounds.
/// Membership is keyed on [`NestedSetElement::key`], never on the bound.
/// Queries scan the whole set, so every call is O(n) or O(n log n).
#[derive(Debug)]
pub struct NestedSet<T: NestedSetElement> {
    /// Arena storage for all members
    arena: Arena<T>,
    /// Identity lookup into the arena
    keys: HashMap<T::Key, Index>,
}

impl<T: NestedSetElement> Default for NestedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: NestedSetElement> NestedSet<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            keys: HashMap::new(),
        }
    }

    /// Takes over a collection whose bounds already form a nested set.
    ///
    /// Fails on duplicate keys, or when the bounds do not describe a single
    /// properly nested tree (see [`NestedSet::validate`]).
    #[instrument(level = "debug", skip(elements))]
    pub fn from_elements<I>(elements: I) -> NestedSetResult<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::new();
        for element in elements {
            let key = element.key();
            if set.keys.contains_key(&key) {
                return Err(NestedSetError::duplicate(&key));
            }
            let idx = set.arena.insert(element);
            set.keys.insert(key, idx);
        }
        set.validate()?;
        debug!(len = set.len(), "nested set built from elements");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.keys.contains_key(key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.keys.get(key).and_then(|&idx| self.arena.get(idx))
    }

    /// All members, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        self.arena.iter().map(|(_, element)| element)
    }

    /// All members in pre-order (ascending left bound).
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.sorted().into_iter()
    }

    /// Consumes the set, handing the members back in pre-order.
    pub fn into_elements(self) -> Vec<T> {
        self.arena
            .into_iter()
            .sorted_by_key(|element| element.bound())
            .collect()
    }

    fn lookup(&self, key: &T::Key) -> NestedSetResult<&T> {
        self.get(key).ok_or_else(|| NestedSetError::not_found(key))
    }

    fn index_of(&self, key: &T::Key) -> NestedSetResult<Index> {
        self.keys
            .get(key)
            .copied()
            .ok_or_else(|| NestedSetError::not_found(key))
    }

    fn sorted(&self) -> Vec<&T> {
        self.elements()
            .sorted_by_key(|element| element.bound())
            .collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<&T> {
        self.elements().min_by_key(|element| element.bound().left())
    }

    /// Elements strictly enclosing `key`, root first and nearest ancestor last.
    #[instrument(level = "trace", skip(self))]
    pub fn ancestors_of(&self, key: &T::Key) -> NestedSetResult<Vec<&T>> {
        let bound = self.lookup(key)?.bound();
        Ok(self
            .sorted()
            .into_iter()
            .filter(|element| element.bound().is_ancestor_of(&bound))
            .collect())
    }

    /// Elements strictly inside `key`, in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn descendants_of(&self, key: &T::Key) -> NestedSetResult<Vec<&T>> {
        let bound = self.lookup(key)?.bound();
        Ok(self
            .sorted()
            .into_iter()
            .filter(|element| element.bound().is_descendant_of(&bound))
            .collect())
    }

    /// Nearest ancestor, i.e. the enclosing bound with the smallest distance.
    #[instrument(level = "trace", skip(self))]
    pub fn parent_of(&self, key: &T::Key) -> NestedSetResult<Option<&T>> {
        Ok(self
            .ancestors_of(key)?
            .into_iter()
            .min_by_key(|ancestor| ancestor.bound().distance()))
    }

    /// Direct children of `key` in left-to-right sibling order.
    #[instrument(level = "trace", skip(self))]
    pub fn children_of(&self, key: &T::Key) -> NestedSetResult<Vec<&T>> {
        let descendants = self.descendants_of(key)?;

        // In pre-order a direct child is the first descendant past the previous
        // child's subtree.
        let mut children = Vec::new();
        let mut last_right = 0;
        for descendant in descendants {
            let bound = descendant.bound();
            if bound.left() > last_right {
                last_right = bound.right();
                children.push(descendant);
            }
        }
        Ok(children)
    }

    /// Number of ancestors of `key`; the root is at level 0.
    #[instrument(level = "trace", skip(self))]
    pub fn level_of(&self, key: &T::Key) -> NestedSetResult<usize> {
        Ok(self.ancestors_of(key)?.len())
    }

    /// Number of levels: 0 for an empty set, 1 for a lone root.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut open: Vec<Bound> = Vec::new();
        let mut depth = 0;
        for element in self.sorted() {
            let bound = element.bound();
            while open.last().is_some_and(|top| top.right() < bound.left()) {
                open.pop();
            }
            open.push(bound);
            depth = depth.max(open.len());
        }
        depth
    }

    /// Elements without descendants, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<&T> {
        let mut leaves = Vec::new();
        let mut sorted = self.sorted().into_iter().peekable();
        while let Some(element) = sorted.next() {
            let is_leaf = sorted
                .peek()
                .map_or(true, |next| !element.bound().is_ancestor_of(&next.bound()));
            if is_leaf {
                leaves.push(element);
            }
        }
        leaves
    }

    /// Checks that the bounds describe one properly nested tree: a single root
    /// starting at 1, no partially overlapping bounds and no endpoint used twice.
    #[instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> NestedSetResult<()> {
        self.check_structure().map_err(|e| {
            warn!(error = %e, "nested set failed validation");
            e
        })
    }

    fn check_structure(&self) -> NestedSetResult<()> {
        let sorted = self.sorted();
        let Some(root) = sorted.first() else {
            return Ok(());
        };

        let mut seen = HashSet::new();
        for element in &sorted {
            let bound = element.bound();
            for end in [bound.left(), bound.right()] {
                if !seen.insert(end) {
                    return Err(NestedSetError::inconsistent(format!(
                        "endpoint {} used twice ({:?})",
                        end,
                        element.key()
                    )));
                }
            }
        }

        let root_bound = root.bound();
        if root_bound.left() != 1 {
            return Err(NestedSetError::inconsistent(format!(
                "root {:?} starts at {}, expected 1",
                root.key(),
                root_bound.left()
            )));
        }
        if let Some(outside) = sorted[1..]
            .iter()
            .find(|element| !root_bound.is_ancestor_of(&element.bound()))
        {
            return Err(NestedSetError::inconsistent(format!(
                "{:?} {} lies outside root {}",
                outside.key(),
                outside.bound(),
                root_bound
            )));
        }

        let mut open: Vec<Bound> = Vec::new();
        for element in &sorted {
            let bound = element.bound();
            while open.last().is_some_and(|top| top.right() < bound.left()) {
                open.pop();
            }
            if let Some(top) = open.last() {
                if top.right() < bound.right() {
                    return Err(NestedSetError::inconsistent(format!(
                        "{:?} {} partially overlaps {}",
                        element.key(),
                        bound,
                        top
                    )));
                }
            }
            open.push(bound);
        }
        Ok(())
    }

    /// Whether the endpoints are exactly `1..=2n`.
    ///
    /// Holds after every insertion and after removing leaves; removing an inner
    /// element leaves unused values behind.
    pub fn is_contiguous(&self) -> bool {
        let ends: Vec<u32> = self
            .elements()
            .flat_map(|element| {
                let bound = element.bound();
                [bound.left(), bound.right()]
            })
            .sorted()
            .collect();
        let Ok(count) = u32::try_from(ends.len()) else {
            return false;
        };
        ends.into_iter().eq(1..=count)
    }

    /// Bounds after moving every end beyond `reference.right` by `delta`.
    ///
    /// Only changed bounds are returned. Nothing is written, so callers can
    /// bail out on error with the set untouched.
    fn plan_shift(&self, delta: i64, reference: &Bound) -> NestedSetResult<Vec<(Index, Bound)>> {
        let mut plan = Vec::new();
        for (idx, element) in self.arena.iter() {
            let bound = element.bound();
            let shifted = bound.shift_after(delta, reference)?;
            if shifted != bound {
                plan.push((idx, shifted));
            }
        }
        Ok(plan)
    }

    fn apply(&mut self, plan: Vec<(Index, Bound)>) {
        for (idx, bound) in plan {
            if let Some(element) = self.arena.get_mut(idx) {
                element.set_bound(bound);
            }
        }
    }

    fn insert(&mut self, key: T::Key, element: T) {
        let idx = self.arena.insert(element);
        self.keys.insert(key, idx);
    }

    /// Wraps the current tree under a new root.
    ///
    /// Every existing bound moves one step right and the new root spans all of
    /// them. On an empty set the root gets `[1,2]`. A root whose key is already a
    /// member is rejected, so this never creates a second top-level element.
    #[instrument(level = "debug", skip(self, root))]
    pub fn add_root(&mut self, mut root: T) -> NestedSetResult<()> {
        let key = root.key();
        if self.contains(&key) {
            return Err(NestedSetError::duplicate(&key));
        }

        let shifted = self
            .arena
            .iter()
            .map(|(idx, element)| element.bound().shift(1).map(|bound| (idx, bound)))
            .collect::<NestedSetResult<Vec<_>>>()?;
        let new_len = self.len() as i64 + 1;
        let outermost = shifted
            .iter()
            .map(|(_, bound)| i64::from(bound.right()) + 1)
            .max()
            .unwrap_or(0);
        let root_bound = Bound::checked(1, outermost.max(2 * new_len))?;

        self.apply(shifted);
        root.set_bound(root_bound);
        self.insert(key.clone(), root);
        debug!(root = ?key, bound = %root_bound, "added root");
        Ok(())
    }

    /// Appends `child` as the rightmost direct child of `parent`.
    ///
    /// Every end beyond the parent's right moves two steps right, opening the two
    /// slots the child occupies at the end of the parent's range.
    #[instrument(level = "debug", skip(self, child))]
    pub fn add_child(&mut self, parent: &T::Key, mut child: T) -> NestedSetResult<()> {
        let parent_idx = self.index_of(parent)?;
        let child_key = child.key();
        if self.contains(&child_key) {
            return Err(NestedSetError::duplicate(&child_key));
        }

        let parent_bound = self.lookup(parent)?.bound();
        let plan = self.plan_shift(2, &parent_bound)?;
        let right = i64::from(parent_bound.right());
        let child_bound = Bound::checked(right, right + 1)?;
        let new_parent_bound = Bound::checked(i64::from(parent_bound.left()), right + 2)?;

        self.apply(plan);
        if let Some(parent_element) = self.arena.get_mut(parent_idx) {
            parent_element.set_bound(new_parent_bound);
        }
        child.set_bound(child_bound);
        self.insert(child_key.clone(), child);
        debug!(child = ?child_key, bound = %child_bound, parent_bound = %new_parent_bound, "added child");
        Ok(())
    }

    /// Removes `key` together with its whole subtree, returning the removed
    /// elements in pre-order.
    ///
    /// Ends beyond the removed bound move two steps left. For a leaf this closes
    /// the gap exactly; removing an inner element leaves the remaining values
    /// unique and properly nested but no longer contiguous.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_child(&mut self, key: &T::Key) -> NestedSetResult<Vec<T>> {
        let bound = self.lookup(key)?.bound();
        let subtree: Vec<Index> = self
            .arena
            .iter()
            .filter(|(_, element)| bound.contains(&element.bound()))
            .map(|(idx, _)| idx)
            .collect();
        let plan = self.plan_shift(-2, &bound)?;

        let mut removed = Vec::with_capacity(subtree.len());
        for idx in subtree {
            if let Some(element) = self.arena.remove(idx) {
                self.keys.remove(&element.key());
                removed.push(element);
            }
        }
        self.apply(plan);
        removed.sort_by_key(|element| element.bound());
        debug!(key = ?key, bound = %bound, removed = removed.len(), "removed subtree");
        Ok(removed)
    }
}
