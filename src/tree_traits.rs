/*
Workaround for error: https://doc.rust-lang.org/error_codes/E0116.html
Cannot define inherent `impl` for a type outside of the crate where the type is defined

define a trait with the desired conversion and implement it for the type in question
 */
use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::arena::{ComponentArena, NodeKind};
use crate::component::{ComponentRef, BRANCH_LABEL, LEAF_LABEL};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for ComponentRef {
    #[instrument(level = "debug")]
    fn to_tree_string(&self) -> Tree<String> {
        let node_borrowed = &self.borrow();

        let root = if node_borrowed.is_composite() {
            BRANCH_LABEL
        } else {
            LEAF_LABEL
        };

        // Recursively construct the children
        let leaves: Vec<_> = node_borrowed
            .children()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();

        Tree::new(root.to_string()).with_leaves(leaves)
    }
}

// Implementation of to_tree_string for ComponentArena
impl TreeNodeConvert for ComponentArena {
    fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root() {
            let mut tree = Tree::new(node_label(self, root_idx));

            fn build_tree(arena: &ComponentArena, node_idx: Index, parent_tree: &mut Tree<String>) {
                if let Some(node) = arena.get_node(node_idx) {
                    for &child_idx in &node.children {
                        if arena.get_node(child_idx).is_some() {
                            let mut child_tree = Tree::new(node_label(arena, child_idx));
                            build_tree(arena, child_idx, &mut child_tree);
                            parent_tree.push(child_tree);
                        }
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("Empty tree".to_string())
        }
    }
}

fn node_label(arena: &ComponentArena, idx: Index) -> String {
    match arena.get_node(idx).map(|node| node.kind) {
        Some(NodeKind::Composite) => BRANCH_LABEL.to_string(),
        _ => LEAF_LABEL.to_string(),
    }
}
