use crate::error::RuntimeError;
use crate::event::Handler;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};

/// Shared handle to a live component. Parents hold children through this.
pub type ComponentRef = Rc<RefCell<dyn Component>>;

/// Non-owning handle, used for parent and self back-links.
pub type ComponentWeak = Weak<RefCell<dyn Component>>;

/// Snapshot of a component's attached children, in declaration order.
pub type Children = std::vec::IntoIter<ComponentRef>;

/// Behaviour shared by every generated component.
///
/// Generated code implements this trait; hosts use it through [`ComponentRef`]
/// without knowing the concrete component type.
pub trait Component: 'static {
    /// Client-side component type identifier.
    fn component_type(&self) -> &'static str;

    fn core(&self) -> &ComponentCore;

    fn core_mut(&mut self) -> &mut ComponentCore;

    /// Serialize the component's state holder.
    fn state_snapshot(&self) -> Result<Value, RuntimeError>;

    /// Currently attached children. Freshly computed on every call.
    fn children(&self) -> Children;

    /// Resolve the handler registered under `event`.
    fn route(&self, event: &str) -> Result<Handler, RuntimeError>;
}

/// Bookkeeping every component carries: its own back-reference, its parent
/// link, the dirty flag for state sync and the set of routed events.
#[derive(Debug, Default)]
pub struct ComponentCore {
    this: Option<ComponentWeak>,
    parent: Option<ComponentWeak>,
    dirty: bool,
    functions: BTreeSet<String>,
}

impl ComponentCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(&mut self, this: ComponentWeak) {
        self.this = Some(this);
    }

    /// Weak handle to the component owning this core, once bound.
    pub fn this(&self) -> Option<&ComponentWeak> {
        self.this.as_ref()
    }

    /// The live parent, if any. A parent that has been dropped reads as `None`.
    pub fn parent(&self) -> Option<ComponentRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_parent(&mut self, parent: Option<ComponentWeak>) {
        self.parent = parent;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn add_function(&mut self, event: impl Into<String>) {
        self.functions.insert(event.into());
    }

    pub fn remove_function(&mut self, event: &str) -> bool {
        self.functions.remove(event)
    }

    pub fn has_function(&self, event: &str) -> bool {
        self.functions.contains(event)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }
}

/// Allocate a component and install its self back-reference.
///
/// Generated constructors go through here; a component that was never bound
/// cannot adopt children.
pub fn bind<C: Component>(component: C) -> Rc<RefCell<C>> {
    let rc = Rc::new(RefCell::new(component));
    let weak: Weak<RefCell<C>> = Rc::downgrade(&rc);
    let this: ComponentWeak = weak;
    rc.borrow_mut().core_mut().bind(this);
    rc
}

/// Identity comparison that ignores vtable metadata.
pub fn same_component(a: &ComponentRef, b: &ComponentRef) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

pub(crate) fn is_weak_of(weak: &ComponentWeak, component: &ComponentRef) -> bool {
    std::ptr::eq(weak.as_ptr() as *const (), Rc::as_ptr(component) as *const ())
}

/// Serialize a state holder into its wire representation.
pub fn snapshot<S: Serialize>(state: &S) -> Result<Value, RuntimeError> {
    Ok(serde_json::to_value(state)?)
}
