//! Ownership tree maintenance.
//!
//! A parent owns each child through a strong [`ComponentRef`] slot; the child
//! points back through a weak parent link. [`adopt`] is the only place both
//! sides change, so they never disagree.

use crate::component::{
    is_weak_of, same_component, Component, ComponentCore, ComponentRef, ComponentWeak,
};
use crate::error::RuntimeError;
use crate::state::StateWrapper;
use std::cell::RefMut;
use tracing::debug;

/// Put `child` into `slot`, moving parent links along with it.
///
/// The previous occupant (if any) loses its parent link, the new child gains
/// one pointing at the owner of `core`. Nothing changes when the move is
/// rejected: every borrow is taken before the first link moves.
pub fn adopt(
    core: &ComponentCore,
    slot: &mut Option<ComponentRef>,
    child: Option<ComponentRef>,
) -> Result<(), RuntimeError> {
    let owner = prepare(core, slot, child.as_ref())?;

    {
        let previous = slot
            .as_ref()
            .filter(|current| !child.as_ref().is_some_and(|c| same_component(current, c)));
        let mut previous = previous
            .map(|p| borrow_mut(p, "detaching a child"))
            .transpose()?;
        let mut next = child
            .as_ref()
            .map(|c| borrow_mut(c, "attaching a child"))
            .transpose()?;

        if let Some(previous) = previous.as_mut() {
            previous.core_mut().set_parent(None);
        }
        if let Some(next) = next.as_mut() {
            debug!(child = next.component_type(), "attaching child");
            next.core_mut().set_parent(owner);
        }
    }

    *slot = child;
    Ok(())
}

/// [`adopt`] for an element slot, returning the child's wrapped snapshot and
/// tag from [`wrap_child`].
///
/// The snapshot is taken after the guards pass and before any link moves, so
/// a failed snapshot leaves the slot and both parent links as they were.
pub fn attach(
    core: &ComponentCore,
    slot: &mut Option<ComponentRef>,
    child: Option<ComponentRef>,
) -> Result<(Option<StateWrapper>, Option<String>), RuntimeError> {
    prepare(core, slot, child.as_ref())?;
    let wrapped = wrap_child(child.as_ref())?;
    adopt(core, slot, child)?;
    Ok(wrapped)
}

/// Run the attach guards and resolve the parent link the child will get.
fn prepare(
    core: &ComponentCore,
    slot: &Option<ComponentRef>,
    child: Option<&ComponentRef>,
) -> Result<Option<ComponentWeak>, RuntimeError> {
    let Some(new_child) = child else {
        return Ok(None);
    };

    let occupant = slot
        .as_ref()
        .is_some_and(|current| same_component(current, new_child));
    if !occupant {
        check_attachable(core, new_child)?;
    }

    core.this()
        .cloned()
        .map(Some)
        .ok_or_else(|| RuntimeError::Unbound {
            component: component_type_of(new_child),
        })
}

fn borrow_mut<'a>(
    component: &'a ComponentRef,
    operation: &'static str,
) -> Result<RefMut<'a, dyn Component>, RuntimeError> {
    component
        .try_borrow_mut()
        .map_err(|_| RuntimeError::Busy { operation })
}

fn check_attachable(core: &ComponentCore, child: &ComponentRef) -> Result<(), RuntimeError> {
    if let Some(this) = core.this() {
        if is_weak_of(this, child) {
            return Err(RuntimeError::ReparentCycle {
                component: component_type_of(child),
            });
        }
    }

    let mut cursor = core.parent();
    while let Some(ancestor) = cursor {
        if same_component(&ancestor, child) {
            return Err(RuntimeError::ReparentCycle {
                component: component_type_of(child),
            });
        }
        let borrowed = ancestor.try_borrow().map_err(|_| RuntimeError::Busy {
            operation: "checking ancestors",
        })?;
        cursor = borrowed.core().parent();
    }

    let borrowed = child.try_borrow().map_err(|_| RuntimeError::Busy {
        operation: "checking the child's parent",
    })?;
    if borrowed.core().parent().is_some() {
        return Err(RuntimeError::AlreadyAttached {
            component: borrowed.component_type(),
        });
    }

    Ok(())
}

fn component_type_of(component: &ComponentRef) -> &'static str {
    component
        .try_borrow()
        .map(|c| c.component_type())
        .unwrap_or("component")
}

/// Wrapped state snapshot and component-type tag for an element slot.
pub fn wrap_child(
    child: Option<&ComponentRef>,
) -> Result<(Option<StateWrapper>, Option<String>), RuntimeError> {
    let Some(child) = child else {
        return Ok((None, None));
    };
    let borrowed = child.try_borrow().map_err(|_| RuntimeError::Busy {
        operation: "snapshotting a child",
    })?;
    let wrapper = StateWrapper::new(borrowed.state_snapshot()?);
    Ok((Some(wrapper), Some(borrowed.component_type().to_string())))
}

/// Depth-first, pre-order walk of the ownership tree rooted at `root`,
/// including `root` itself.
pub fn descendants(root: &ComponentRef) -> Result<Vec<ComponentRef>, RuntimeError> {
    let mut out = Vec::new();
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        let children: Vec<ComponentRef> = node
            .try_borrow()
            .map_err(|_| RuntimeError::Busy {
                operation: "walking the tree",
            })?
            .children()
            .collect();
        out.push(node);
        stack.extend(children.into_iter().rev());
    }
    Ok(out)
}
