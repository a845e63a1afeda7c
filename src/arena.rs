use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::component::{BRANCH_LABEL, LEAF_LABEL};
use crate::errors::{TreeError, TreeResult};

/// Concrete variant of an arena node. The set is closed, so every
/// dispatch is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Composite,
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ComponentNode {
    /// Leaf or composite
    pub kind: NodeKind,
    /// Index of the parent node in the arena, None for unparented nodes
    pub parent: Option<Index>,
    /// Indices of child nodes, in insertion order
    pub children: Vec<Index>,
}

impl ComponentNode {
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, NodeKind::Composite)
    }
}

/// Arena-based component tree.
///
/// Uses generational arena for memory-safe node references and O(1)
/// lookups. Composites and callers hold plain `Index` handles; the arena
/// owns every node's lifetime.
#[derive(Debug)]
pub struct ComponentArena {
    /// Arena storage for all tree nodes
    arena: Arena<ComponentNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for ComponentArena {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Inserts a leaf node, attached under `parent` when given.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_leaf(&mut self, parent: Option<Index>) -> Index {
        self.insert_node(NodeKind::Leaf, parent)
    }

    /// Inserts a composite node, attached under `parent` when given.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_composite(&mut self, parent: Option<Index>) -> Index {
        self.insert_node(NodeKind::Composite, parent)
    }

    fn insert_node(&mut self, kind: NodeKind, parent: Option<Index>) -> Index {
        let node_idx = self.arena.insert(ComponentNode {
            kind,
            parent: None,
            children: Vec::new(),
        });

        if let Some(parent_idx) = parent {
            self.attach(parent_idx, node_idx);
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&ComponentNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut ComponentNode> {
        self.arena.get_mut(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Capability probe without node access. Stale handles report `false`.
    #[instrument(level = "trace", skip(self))]
    pub fn is_composite(&self, idx: Index) -> bool {
        self.arena
            .get(idx)
            .map(ComponentNode::is_composite)
            .unwrap_or(false)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    /// Appends `child` to `parent`'s child sequence and rebinds the
    /// child's parent link. Silent no-op when `parent` is stale or a
    /// leaf. Duplicate entries are kept, and an earlier parent's child
    /// list is left untouched.
    #[instrument(level = "trace", skip(self))]
    pub fn attach(&mut self, parent: Index, child: Index) {
        let parent_is_composite = self
            .arena
            .get(parent)
            .map(ComponentNode::is_composite)
            .unwrap_or(false);
        if !parent_is_composite || !self.arena.contains(child) {
            return;
        }

        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    /// Strict variant of [`ComponentArena::attach`]: reports stale
    /// handles, leaf parents, and attachments that would make `child` its
    /// own ancestor.
    #[instrument(level = "debug", skip(self))]
    pub fn attach_checked(&mut self, parent: Index, child: Index) -> TreeResult<()> {
        let parent_node = self
            .arena
            .get(parent)
            .ok_or(TreeError::StaleHandle(parent))?;
        if !self.arena.contains(child) {
            return Err(TreeError::StaleHandle(child));
        }
        if !parent_node.is_composite() {
            return Err(TreeError::NotComposite { parent, child });
        }
        if child == parent || self.is_ancestor(child, parent) {
            return Err(TreeError::CycleDetected(child));
        }

        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.arena.get_mut(child) {
            child_node.parent = Some(parent);
        }
        Ok(())
    }

    /// True when `ancestor` appears on the parent chain above `idx`.
    fn is_ancestor(&self, ancestor: Index, idx: Index) -> bool {
        let mut current = self.arena.get(idx).and_then(|node| node.parent);
        while let Some(i) = current {
            if i == ancestor {
                return true;
            }
            current = self.arena.get(i).and_then(|node| node.parent);
        }
        false
    }

    /// Removes every occurrence of `child` from `parent`'s child sequence
    /// and clears the child's parent link. No-op when nothing matched.
    #[instrument(level = "trace", skip(self))]
    pub fn detach(&mut self, parent: Index, child: Index) {
        let mut removed = false;
        if let Some(parent_node) = self.arena.get_mut(parent) {
            let before = parent_node.children.len();
            parent_node.children.retain(|&c| c != child);
            removed = parent_node.children.len() < before;
        }
        if removed {
            if let Some(child_node) = self.arena.get_mut(child) {
                child_node.parent = None;
            }
        }
    }

    /// Descriptive string for the subtree rooted at `idx`.
    ///
    /// Leaves yield the terminal label. Composites traverse their
    /// children in insertion order, join the results with `+` and wrap
    /// them in the branch label. Recursion depth equals tree height.
    #[instrument(level = "debug", skip(self))]
    pub fn operation(&self, idx: Index) -> TreeResult<String> {
        let node = self.arena.get(idx).ok_or(TreeError::StaleHandle(idx))?;
        match node.kind {
            NodeKind::Leaf => Ok(LEAF_LABEL.to_string()),
            NodeKind::Composite => {
                let parts = node
                    .children
                    .iter()
                    .map(|&child| self.operation(child))
                    .collect::<TreeResult<Vec<_>>>()?;
                Ok(format!("{}({})", BRANCH_LABEL, parts.join("+")))
            }
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    #[instrument(level = "trace", skip(self))]
    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf-variant nodes reachable from the root.
    ///
    /// Empty trees return an empty vector.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<Index> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    #[instrument(level = "trace", skip(self))]
    fn collect_leaves(&self, node_idx: Index, leaves: &mut Vec<Index>) {
        if let Some(node) = self.get_node(node_idx) {
            match node.kind {
                NodeKind::Leaf => leaves.push(node_idx),
                NodeKind::Composite => {
                    for &child in &node.children {
                        self.collect_leaves(child, leaves);
                    }
                }
            }
        }
    }

    /// Releases `idx` and every descendant from the arena, detaching the
    /// subtree from its parent first. Returns the number of nodes
    /// removed. Handles pointing into the removed subtree become stale.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: Index) -> usize {
        if !self.arena.contains(idx) {
            return 0;
        }
        if let Some(parent) = self.parent_of(idx) {
            self.detach(parent, idx);
        }

        let mut doomed = Vec::new();
        self.collect_subtree(idx, &mut doomed);
        // A node reachable twice (duplicate child entry) is only removed once.
        let mut removed = 0;
        for node_idx in doomed {
            if self.arena.remove(node_idx).is_some() {
                removed += 1;
            }
        }

        if self.root == Some(idx) {
            self.root = None;
        }
        removed
    }

    fn collect_subtree(&self, node_idx: Index, out: &mut Vec<Index>) {
        if let Some(node) = self.get_node(node_idx) {
            for &child in &node.children {
                self.collect_subtree(child, out);
            }
            out.push(node_idx);
        }
    }
}

pub struct TreeIterator<'a> {
    arena: &'a ComponentArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a ComponentArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ComponentNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a ComponentArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a ComponentArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a ComponentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
