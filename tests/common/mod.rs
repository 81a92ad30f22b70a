//! Shared test element and the reference category tree.
#![allow(dead_code)]

use std::fmt;

use nestedset::{Bound, NestedSet, NestedSetElement};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub bound: Bound,
}

impl Category {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bound: Bound::default(),
        }
    }

    pub fn with_bound(name: &str, left: u32, right: u32) -> Self {
        Self {
            name: name.to_string(),
            bound: Bound::new(left, right).expect("valid test bound"),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.bound)
    }
}

impl NestedSetElement for Category {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn bound(&self) -> Bound {
        self.bound
    }

    fn set_bound(&mut self, bound: Bound) {
        self.bound = bound;
    }
}

pub fn key(name: &str) -> String {
    name.to_string()
}

pub fn names<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Vec<&'a str> {
    categories.into_iter().map(|c| c.name.as_str()).collect()
}

pub fn bound_of(set: &NestedSet<Category>, name: &str) -> (u32, u32) {
    let bound = set.get(&key(name)).expect("member").bound;
    (bound.left(), bound.right())
}

// Root [1,18]
// ├── E1 [2,5]
// │   └── E1_2 [3,4]
// └── E2 [6,17]
//     ├── E2_1 [7,8]
//     ├── E2_2 [9,14]
//     │   ├── E2_2_1 [10,11]
//     │   └── E2_2_2 [12,13]
//     └── E2_3 [15,16]
pub fn reference_tree() -> NestedSet<Category> {
    NestedSet::from_elements(vec![
        Category::with_bound("Root", 1, 18),
        Category::with_bound("E1", 2, 5),
        Category::with_bound("E1_2", 3, 4),
        Category::with_bound("E2", 6, 17),
        Category::with_bound("E2_1", 7, 8),
        Category::with_bound("E2_2", 9, 14),
        Category::with_bound("E2_2_1", 10, 11),
        Category::with_bound("E2_2_2", 12, 13),
        Category::with_bound("E2_3", 15, 16),
    ])
    .expect("reference tree is consistent")
}
