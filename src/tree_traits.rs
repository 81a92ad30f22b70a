use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::element::NestedSetElement;
use crate::nested_set::NestedSet;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<T> TreeNodeConvert for NestedSet<T>
where
    T: NestedSetElement + Display,
{
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree<T>(set: &NestedSet<T>, node: &T) -> Tree<String>
        where
            T: NestedSetElement + Display,
        {
            let mut tree = Tree::new(node.to_string());
            if let Ok(children) = set.children_of(&node.key()) {
                for child in children {
                    tree.push(build_tree(set, child));
                }
            }
            tree
        }

        match self.root() {
            Some(root) => build_tree(self, root),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
