use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use itertools::Itertools;

/// Terminal label produced by a leaf's `operation`.
pub const LEAF_LABEL: &str = "Leaf";
/// Label wrapping a composite's aggregated child results.
pub const BRANCH_LABEL: &str = "Branch";

pub type ComponentRef = Rc<RefCell<dyn Component>>;
pub type WeakComponentRef = Weak<RefCell<dyn Component>>;

/// Uniform interface shared by leaves and composites.
///
/// Child management is declared here so client code can assemble and
/// manage trees without depending on concrete node types. For leaf-level
/// components the child-management methods are empty.
pub trait Component: fmt::Debug {
    /// Rebinds the parent back-reference. `None` clears it.
    ///
    /// Does not touch any child collection; `add` and `remove` keep both
    /// sides consistent.
    fn set_parent(&mut self, parent: Option<WeakComponentRef>);

    /// Current parent, if any. The back-reference is weak, so a parent
    /// that has been dropped yields `None`.
    fn parent(&self) -> Option<ComponentRef>;

    /// Ordered child sequence. Empty for components without children.
    fn children(&self) -> &[ComponentRef] {
        &[]
    }

    /// Appends a child. No-op for components without children.
    fn add(&mut self, _component: ComponentRef) {}

    /// Removes a child by identity. No-op for components without children.
    fn remove(&mut self, _component: &ComponentRef) {}

    /// Whether this component can bear children.
    fn is_composite(&self) -> bool {
        false
    }

    /// Descriptive string for the subtree rooted at this component.
    fn operation(&self) -> String;
}

/// End object of a composition. A leaf can't have any children.
#[derive(Debug)]
pub struct Leaf {
    parent: Option<WeakComponentRef>,
}

impl Leaf {
    pub fn new() -> ComponentRef {
        Rc::new(RefCell::new(Leaf { parent: None }))
    }
}

impl Component for Leaf {
    fn set_parent(&mut self, parent: Option<WeakComponentRef>) {
        self.parent = parent;
    }

    fn parent(&self) -> Option<ComponentRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn operation(&self) -> String {
        LEAF_LABEL.to_string()
    }
}

/// Component holding an ordered sequence of children, both simple and
/// complex. Delegates the actual work to its children and sums up the
/// result.
#[derive(Debug)]
pub struct Composite {
    parent: Option<WeakComponentRef>,
    children: Vec<ComponentRef>,
    /// Weak self-handle, handed to children as their back-reference.
    me: WeakComponentRef,
}

impl Composite {
    pub fn new() -> ComponentRef {
        let composite = Rc::new_cyclic(|me: &Weak<RefCell<Composite>>| {
            let me: WeakComponentRef = me.clone();
            RefCell::new(Composite {
                parent: None,
                children: Vec::new(),
                me,
            })
        });
        composite
    }
}

impl Component for Composite {
    fn set_parent(&mut self, parent: Option<WeakComponentRef>) {
        self.parent = parent;
    }

    fn parent(&self) -> Option<ComponentRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    fn children(&self) -> &[ComponentRef] {
        &self.children
    }

    /// Appends `component` and points its back-reference at this
    /// composite. Adding the same component twice keeps both entries.
    /// Attaching a component into its own subtree is a caller error and
    /// is not checked here.
    fn add(&mut self, component: ComponentRef) {
        component.borrow_mut().set_parent(Some(self.me.clone()));
        self.children.push(component);
    }

    /// Removes every entry identical to `component` and clears its
    /// back-reference. No-op when the component is not present.
    fn remove(&mut self, component: &ComponentRef) {
        let before = self.children.len();
        self.children.retain(|c| !Rc::ptr_eq(c, component));
        if self.children.len() < before {
            component.borrow_mut().set_parent(None);
        }
    }

    fn is_composite(&self) -> bool {
        true
    }

    /// Traverses the children in insertion order, joining their results
    /// with `+`. A composite without children yields `Branch()`.
    fn operation(&self) -> String {
        let joined = self
            .children
            .iter()
            .map(|c| c.borrow().operation())
            .join("+");
        format!("{}({})", BRANCH_LABEL, joined)
    }
}
