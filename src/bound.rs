use std::fmt;

use tracing::instrument;

use crate::errors::{NestedSetError, NestedSetResult};

const DEFAULT_LEFT: u32 = 1;
const DEFAULT_RIGHT: u32 = 2;

/// Position of one element in the nested set: the depth-first entry (`left`)
/// and exit (`right`) visitation numbers.
///
/// A `Bound` is a value: it is never mutated, every operation returns a new one.
/// Every constructor path validates `1 <= left < right`, so a `Bound` that exists
/// is always valid.
///
/// Ordering is by `left`, then `right`, which is pre-order position in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bound {
    left: u32,
    right: u32,
}

impl Default for Bound {
    /// Bound of a lone root: `[1,2]`.
    fn default() -> Self {
        Self {
            left: DEFAULT_LEFT,
            right: DEFAULT_RIGHT,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.left, self.right)
    }
}

impl Bound {
    pub fn new(left: u32, right: u32) -> NestedSetResult<Self> {
        Self::checked(i64::from(left), i64::from(right))
    }

    pub(crate) fn checked(left: i64, right: i64) -> NestedSetResult<Self> {
        let invalid = || NestedSetError::InvalidBound { left, right };
        if left <= 0 || right <= 0 || left >= right {
            return Err(invalid());
        }
        Ok(Self {
            left: u32::try_from(left).map_err(|_| invalid())?,
            right: u32::try_from(right).map_err(|_| invalid())?,
        })
    }

    pub fn left(&self) -> u32 {
        self.left
    }

    pub fn right(&self) -> u32 {
        self.right
    }

    pub fn distance(&self) -> u32 {
        self.right - self.left
    }

    /// Strict containment: `self` encloses `other` and is not equal to it.
    pub fn is_ancestor_of(&self, other: &Bound) -> bool {
        self.left < other.left && self.right > other.right
    }

    pub fn is_descendant_of(&self, other: &Bound) -> bool {
        other.is_ancestor_of(self)
    }

    /// `other` lies in the subtree rooted at `self` (itself included).
    pub fn contains(&self, other: &Bound) -> bool {
        self == other || self.is_ancestor_of(other)
    }

    pub fn has_parent(&self) -> bool {
        self.left > DEFAULT_LEFT
    }

    pub fn has_children(&self) -> bool {
        self.right > self.left + 1
    }

    pub fn move_left(&self, new_left: u32) -> NestedSetResult<Self> {
        Self::new(new_left, self.right)
    }

    pub fn move_right(&self, new_right: u32) -> NestedSetResult<Self> {
        Self::new(self.left, new_right)
    }

    /// Translates both ends by `delta`.
    #[instrument(level = "trace")]
    pub fn shift(&self, delta: i64) -> NestedSetResult<Self> {
        Self::checked(
            i64::from(self.left).saturating_add(delta),
            i64::from(self.right).saturating_add(delta),
        )
    }

    /// Shifts only the ends lying beyond `reference.right`.
    ///
    /// This is the renumbering step behind every structural change: opening a
    /// gap after a subtree (`delta > 0`) or closing one (`delta < 0`).
    pub(crate) fn shift_after(&self, delta: i64, reference: &Bound) -> NestedSetResult<Self> {
        let pivot = reference.right;
        let left = if self.left > pivot {
            i64::from(self.left) + delta
        } else {
            i64::from(self.left)
        };
        let right = if self.right > pivot {
            i64::from(self.right) + delta
        } else {
            i64::from(self.right)
        };
        Self::checked(left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn b(left: u32, right: u32) -> Bound {
        Bound::new(left, right).unwrap()
    }

    #[rstest]
    #[case(0, 2)]
    #[case(1, 0)]
    #[case(3, 3)]
    #[case(5, 4)]
    fn given_invalid_ends_when_constructing_then_fails(#[case] left: u32, #[case] right: u32) {
        let result = Bound::new(left, right);
        assert_eq!(
            result,
            Err(NestedSetError::InvalidBound {
                left: i64::from(left),
                right: i64::from(right)
            })
        );
    }

    #[test]
    fn given_default_bound_then_is_lone_root() {
        let bound = Bound::default();
        assert_eq!(bound, b(1, 2));
        assert!(!bound.has_parent());
        assert!(!bound.has_children());
        assert_eq!(bound.distance(), 1);
    }

    #[test]
    fn given_nested_bounds_then_containment_is_strict() {
        let outer = b(1, 10);
        let inner = b(2, 5);
        assert!(outer.is_ancestor_of(&inner));
        assert!(inner.is_descendant_of(&outer));
        assert!(!outer.is_ancestor_of(&outer));
        assert!(!inner.is_ancestor_of(&outer));
        assert!(outer.contains(&outer));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn given_shared_end_then_not_ancestor() {
        // shares the right end, so not a proper nesting
        assert!(!b(1, 10).is_ancestor_of(&b(2, 10)));
        assert!(!b(1, 10).is_ancestor_of(&b(1, 9)));
    }

    #[test]
    fn given_disjoint_bounds_then_unrelated() {
        let a = b(2, 5);
        let c = b(6, 17);
        assert!(!a.is_ancestor_of(&c));
        assert!(!a.is_descendant_of(&c));
        assert!(!c.contains(&a));
    }

    #[test]
    fn given_same_left_different_right_then_not_equal() {
        assert_ne!(b(2, 5), b(2, 7));
        assert_ne!(b(2, 5), b(3, 5));
        assert_eq!(b(2, 5), b(2, 5));
    }

    #[test]
    fn given_bound_when_moving_ends_then_revalidates() {
        let bound = b(4, 9);
        assert_eq!(bound.move_left(2).unwrap(), b(2, 9));
        assert_eq!(bound.move_right(12).unwrap(), b(4, 12));
        assert!(bound.move_left(9).is_err());
        assert!(bound.move_right(4).is_err());
    }

    #[test]
    fn given_bound_when_shifting_then_translates_both_ends() {
        assert_eq!(b(4, 9).shift(3).unwrap(), b(7, 12));
        assert_eq!(b(4, 9).shift(-3).unwrap(), b(1, 6));
        assert_eq!(
            b(4, 9).shift(-4),
            Err(NestedSetError::InvalidBound { left: 0, right: 5 })
        );
    }

    #[test]
    fn given_huge_shift_then_fails_instead_of_wrapping() {
        assert!(b(1, 2).shift(i64::from(u32::MAX)).is_err());
    }

    #[test]
    fn given_reference_when_shifting_after_then_only_trailing_ends_move() {
        let reference = b(2, 5);
        // enclosing bound: only the right end lies beyond 5
        assert_eq!(b(1, 18).shift_after(2, &reference).unwrap(), b(1, 20));
        // trailing sibling moves as a whole
        assert_eq!(b(6, 17).shift_after(2, &reference).unwrap(), b(8, 19));
        // the reference and everything inside stays put
        assert_eq!(b(2, 5).shift_after(2, &reference).unwrap(), b(2, 5));
        assert_eq!(b(3, 4).shift_after(2, &reference).unwrap(), b(3, 4));
    }

    #[test]
    fn given_bounds_then_order_follows_left() {
        let mut bounds = vec![b(6, 17), b(1, 18), b(3, 4), b(2, 5)];
        bounds.sort();
        assert_eq!(bounds, vec![b(1, 18), b(2, 5), b(3, 4), b(6, 17)]);
    }

    #[test]
    fn given_bound_then_displays_both_ends() {
        assert_eq!(b(9, 14).to_string(), "[9,14]");
    }
}
