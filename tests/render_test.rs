//! Tests for termtree rendering of component trees

use rstree::arena::ComponentArena;
use rstree::component::{ComponentRef, Composite, Leaf};
use rstree::tree_traits::TreeNodeConvert;

fn sample_tree() -> ComponentRef {
    let tree = Composite::new();
    let branch1 = Composite::new();
    branch1.borrow_mut().add(Leaf::new());
    branch1.borrow_mut().add(Leaf::new());
    let branch2 = Composite::new();
    branch2.borrow_mut().add(Leaf::new());
    tree.borrow_mut().add(branch1);
    tree.borrow_mut().add(branch2);
    tree
}

#[test]
fn given_single_leaf_when_rendering_then_single_labelled_line() {
    let leaf = Leaf::new();
    let rendered = leaf.to_tree_string().to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, vec!["Leaf"]);
}

#[test]
fn given_sample_tree_when_rendering_then_one_line_per_node() {
    let rendered = sample_tree().to_tree_string().to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Branch");
    assert_eq!(rendered.matches("Leaf").count(), 3);
    assert_eq!(rendered.matches("Branch").count(), 3);
}

#[test]
fn given_empty_arena_when_rendering_then_placeholder_label() {
    let arena = ComponentArena::new();
    let rendered = arena.to_tree_string().to_string();

    assert_eq!(rendered.lines().next(), Some("Empty tree"));
}

#[test]
fn given_sample_arena_when_rendering_then_one_line_per_node() {
    let mut arena = ComponentArena::new();
    let root = arena.insert_composite(None);
    let branch1 = arena.insert_composite(Some(root));
    arena.insert_leaf(Some(branch1));
    arena.insert_leaf(Some(branch1));
    let branch2 = arena.insert_composite(Some(root));
    arena.insert_leaf(Some(branch2));

    let rendered = arena.to_tree_string().to_string();

    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "Branch");
    assert_eq!(rendered.matches("Leaf").count(), 3);
}
