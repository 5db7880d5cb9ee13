use propwire_runtime::{
    adopt, attach, bind, descendants, dispatch, flush_state, flush_tree, handler,
    same_component, snapshot, wrap_child, Children, Component, ComponentCore, ComponentRef,
    Handler, RendererRegistry, RuntimeError,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct NodeState {
    label: String,
}

#[derive(Default)]
struct Node {
    core: ComponentCore,
    state: NodeState,
    left: Option<ComponentRef>,
    right: Option<ComponentRef>,
    on_tap: Option<Handler>,
    broken_snapshot: bool,
}

impl Node {
    fn new(label: &str) -> Rc<RefCell<Self>> {
        let node = bind(Node::default());
        node.borrow_mut().state.label = label.to_string();
        node
    }

    fn set_left(&mut self, child: Option<ComponentRef>) -> Result<(), RuntimeError> {
        adopt(&self.core, &mut self.left, child)
    }

    fn attach_left(&mut self, child: Option<ComponentRef>) -> Result<Option<String>, RuntimeError> {
        attach(&self.core, &mut self.left, child).map(|(_, tag)| tag)
    }

    fn set_right(&mut self, child: Option<ComponentRef>) -> Result<(), RuntimeError> {
        adopt(&self.core, &mut self.right, child)
    }

    fn set_on_tap(&mut self, on_tap: Option<Handler>) {
        self.on_tap = on_tap;
        if self.on_tap.is_some() {
            self.core.add_function("onTapHandler");
        } else {
            self.core.remove_function("onTapHandler");
        }
    }

    fn rename(&mut self, label: &str) {
        self.core.mark_dirty();
        self.state.label = label.to_string();
    }
}

impl Component for Node {
    fn component_type(&self) -> &'static str {
        "Node"
    }

    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ComponentCore {
        &mut self.core
    }

    fn state_snapshot(&self) -> Result<Value, RuntimeError> {
        if self.broken_snapshot {
            return Err(serde_json::from_str::<Value>("{").unwrap_err().into());
        }
        snapshot(&self.state)
    }

    fn children(&self) -> Children {
        let mut children = Vec::new();
        if let Some(child) = &self.left {
            children.push(child.clone());
        }
        if let Some(child) = &self.right {
            children.push(child.clone());
        }
        children.into_iter()
    }

    fn route(&self, event: &str) -> Result<Handler, RuntimeError> {
        match event {
            "onTapHandler" => self.on_tap.clone().ok_or(RuntimeError::HandlerAbsent {
                component: "Node",
                event: event.to_string(),
            }),
            _ => Err(RuntimeError::UnknownEvent {
                component: "Node",
                event: event.to_string(),
            }),
        }
    }
}

fn parent_of(component: &ComponentRef) -> Option<ComponentRef> {
    component.borrow().core().parent()
}

#[test]
fn test_adopt_moves_parent_links() {
    let root = Node::new("root");
    let first = Node::new("first");
    let second = Node::new("second");
    let root_ref: ComponentRef = root.clone();
    let first_ref: ComponentRef = first.clone();
    let second_ref: ComponentRef = second.clone();

    root.borrow_mut().set_left(Some(first_ref.clone())).unwrap();
    assert!(same_component(&parent_of(&first_ref).unwrap(), &root_ref));

    root.borrow_mut().set_left(Some(second_ref.clone())).unwrap();
    assert!(parent_of(&first_ref).is_none());
    assert!(same_component(&parent_of(&second_ref).unwrap(), &root_ref));

    let children: Vec<ComponentRef> = root.borrow().children().collect();
    assert_eq!(children.len(), 1);
    assert!(same_component(&children[0], &second_ref));
}

#[test]
fn test_reassigning_same_child_is_allowed() {
    let root = Node::new("root");
    let child: ComponentRef = Node::new("child");

    root.borrow_mut().set_left(Some(child.clone())).unwrap();
    root.borrow_mut().set_left(Some(child.clone())).unwrap();

    let root_ref: ComponentRef = root.clone();
    assert!(same_component(&parent_of(&child).unwrap(), &root_ref));
}

#[test]
fn test_clearing_slot_detaches_child() {
    let root = Node::new("root");
    let child: ComponentRef = Node::new("child");

    root.borrow_mut().set_left(Some(child.clone())).unwrap();
    root.borrow_mut().set_left(None).unwrap();

    assert!(parent_of(&child).is_none());
    assert_eq!(root.borrow().children().count(), 0);
}

#[test]
fn test_rejects_self_adoption() {
    let root = Node::new("root");
    let root_ref: ComponentRef = root.clone();

    let err = root.borrow_mut().set_left(Some(root_ref)).unwrap_err();
    assert!(matches!(err, RuntimeError::ReparentCycle { .. }), "{err}");
    assert!(root.borrow().left.is_none());
}

#[test]
fn test_rejects_ancestor_adoption() {
    let grandparent = Node::new("grandparent");
    let parent = Node::new("parent");
    let grandparent_ref: ComponentRef = grandparent.clone();
    let parent_ref: ComponentRef = parent.clone();

    grandparent.borrow_mut().set_left(Some(parent_ref)).unwrap();
    let err = parent
        .borrow_mut()
        .set_left(Some(grandparent_ref.clone()))
        .unwrap_err();

    assert!(matches!(err, RuntimeError::ReparentCycle { .. }), "{err}");
    assert!(parent_of(&grandparent_ref).is_none());
}

#[test]
fn test_rejects_child_with_another_parent() {
    let first = Node::new("first");
    let second = Node::new("second");
    let child: ComponentRef = Node::new("child");

    first.borrow_mut().set_left(Some(child.clone())).unwrap();
    let err = second.borrow_mut().set_left(Some(child.clone())).unwrap_err();
    assert!(matches!(err, RuntimeError::AlreadyAttached { .. }), "{err}");

    // Same parent, different slot.
    let err = first.borrow_mut().set_right(Some(child.clone())).unwrap_err();
    assert!(matches!(err, RuntimeError::AlreadyAttached { .. }), "{err}");

    let first_ref: ComponentRef = first.clone();
    assert!(same_component(&parent_of(&child).unwrap(), &first_ref));
}

#[test]
fn test_dropped_parent_reads_as_detached() {
    let child: ComponentRef = Node::new("child");
    {
        let parent = Node::new("parent");
        parent.borrow_mut().set_left(Some(child.clone())).unwrap();
    }
    assert!(parent_of(&child).is_none());

    let adopter = Node::new("adopter");
    adopter.borrow_mut().set_left(Some(child.clone())).unwrap();
}

#[test]
fn test_unbound_owner_cannot_adopt() {
    let mut orphan = Node::default();
    let child: ComponentRef = Node::new("child");

    let err = orphan.set_left(Some(child.clone())).unwrap_err();
    assert!(matches!(err, RuntimeError::Unbound { .. }), "{err}");
    assert!(parent_of(&child).is_none());
}

#[test]
fn test_busy_child_leaves_slot_unchanged() {
    let root = Node::new("root");
    let first: ComponentRef = Node::new("first");
    let second: ComponentRef = Node::new("second");
    root.borrow_mut().set_left(Some(first.clone())).unwrap();

    let guard = first.borrow();
    let err = root.borrow_mut().set_left(Some(second.clone())).unwrap_err();
    drop(guard);

    assert!(matches!(err, RuntimeError::Busy { .. }), "{err}");
    let root_ref: ComponentRef = root.clone();
    assert!(same_component(root.borrow().left.as_ref().unwrap(), &first));
    assert!(same_component(&parent_of(&first).unwrap(), &root_ref));
    assert!(parent_of(&second).is_none());
}

#[test]
fn test_attach_returns_child_tag() {
    let root = Node::new("root");
    let child: ComponentRef = Node::new("child");

    let tag = root.borrow_mut().attach_left(Some(child.clone())).unwrap();
    assert_eq!(tag.as_deref(), Some("Node"));

    let root_ref: ComponentRef = root.clone();
    assert!(same_component(&parent_of(&child).unwrap(), &root_ref));
    assert_eq!(root.borrow_mut().attach_left(None).unwrap(), None);
    assert!(parent_of(&child).is_none());
}

#[test]
fn test_failed_attach_snapshot_moves_nothing() {
    let root = Node::new("root");
    let first: ComponentRef = Node::new("first");
    let broken = Node::new("broken");
    broken.borrow_mut().broken_snapshot = true;
    let broken_ref: ComponentRef = broken.clone();
    root.borrow_mut().attach_left(Some(first.clone())).unwrap();

    let err = root
        .borrow_mut()
        .attach_left(Some(broken_ref.clone()))
        .unwrap_err();

    assert!(matches!(err, RuntimeError::Serialization(_)), "{err}");
    let root_ref: ComponentRef = root.clone();
    assert!(same_component(root.borrow().left.as_ref().unwrap(), &first));
    assert!(same_component(&parent_of(&first).unwrap(), &root_ref));
    assert!(parent_of(&broken_ref).is_none());
}

#[test]
fn test_attach_checks_cycles_before_snapshot() {
    let root = Node::new("root");
    let root_ref: ComponentRef = root.clone();

    let err = root.borrow_mut().attach_left(Some(root_ref)).unwrap_err();
    assert!(matches!(err, RuntimeError::ReparentCycle { .. }), "{err}");
}

#[test]
fn test_wrap_child_tags_component_type() {
    let child: ComponentRef = Node::new("leaf");
    let (wrapper, tag) = wrap_child(Some(&child)).unwrap();

    assert_eq!(tag.as_deref(), Some("Node"));
    assert_eq!(wrapper.unwrap().state(), &json!({ "label": "leaf" }));
    assert_eq!(wrap_child(None).unwrap(), (None, None));
}

#[test]
fn test_registry_restores_state_from_tag_and_snapshot() {
    let child: ComponentRef = Node::new("leaf");
    let (wrapper, tag) = wrap_child(Some(&child)).unwrap();

    let mut registry = RendererRegistry::new();
    registry.register::<NodeState>("Node");

    let restored: NodeState = registry
        .restore_as(&tag.unwrap(), &wrapper.clone().unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(restored.label, "leaf");

    let err = registry.restore("Missing", &wrapper.unwrap()).unwrap_err();
    assert!(matches!(err, RuntimeError::UnknownComponentType(_)), "{err}");
}

#[test]
fn test_dispatch_invokes_handler_once_in_order() {
    let node = Node::new("button");
    let calls: Rc<RefCell<Vec<Vec<Value>>>> = Rc::default();
    let sink = calls.clone();
    node.borrow_mut()
        .set_on_tap(Some(handler(move |args| sink.borrow_mut().push(args.to_vec()))));

    let node_ref: ComponentRef = node.clone();
    dispatch(&node_ref, "onTapHandler", &[json!("x"), json!(1)]).unwrap();

    assert_eq!(*calls.borrow(), vec![vec![json!("x"), json!(1)]]);
}

#[test]
fn test_dispatch_after_clearing_handler_fails() {
    let node = Node::new("button");
    node.borrow_mut().set_on_tap(Some(handler(|_| {})));
    node.borrow_mut().set_on_tap(None);

    assert!(!node.borrow().core().has_function("onTapHandler"));
    let node_ref: ComponentRef = node.clone();
    let err = dispatch(&node_ref, "onTapHandler", &[]).unwrap_err();
    assert!(matches!(err, RuntimeError::HandlerAbsent { .. }), "{err}");
}

#[test]
fn test_dispatch_unrouted_event_fails() {
    let node = Node::new("button");
    node.borrow_mut().set_on_tap(Some(handler(|_| {})));

    let node_ref: ComponentRef = node.clone();
    let err = dispatch(&node_ref, "labelHandler", &[]).unwrap_err();
    assert!(
        matches!(&err, RuntimeError::UnknownEvent { component: "Node", event } if event == "labelHandler"),
        "{err}"
    );
}

#[test]
fn test_handler_may_mutate_its_component() {
    let node = Node::new("button");
    let weak = Rc::downgrade(&node);
    node.borrow_mut().set_on_tap(Some(handler(move |_| {
        if let Some(node) = weak.upgrade() {
            node.borrow_mut().rename("pressed");
        }
    })));

    let node_ref: ComponentRef = node.clone();
    dispatch(&node_ref, "onTapHandler", &[]).unwrap();
    assert_eq!(node.borrow().state.label, "pressed");
}

#[test]
fn test_flush_state_only_when_dirty() {
    let node = Node::new("a");
    let node_ref: ComponentRef = node.clone();
    assert_eq!(flush_state(&node_ref).unwrap(), None);

    node.borrow_mut().rename("b");
    assert_eq!(
        flush_state(&node_ref).unwrap(),
        Some(json!({ "label": "b" }))
    );
    assert_eq!(flush_state(&node_ref).unwrap(), None);
}

#[test]
fn test_failed_flush_keeps_component_dirty() {
    let node = Node::new("a");
    let node_ref: ComponentRef = node.clone();
    node.borrow_mut().rename("b");
    node.borrow_mut().broken_snapshot = true;

    let err = flush_state(&node_ref).unwrap_err();
    assert!(matches!(err, RuntimeError::Serialization(_)), "{err}");
    assert!(node.borrow().core().is_dirty());

    node.borrow_mut().broken_snapshot = false;
    assert_eq!(
        flush_state(&node_ref).unwrap(),
        Some(json!({ "label": "b" }))
    );
}

#[test]
fn test_flush_tree_walks_preorder() {
    let root = Node::new("root");
    let left = Node::new("left");
    let right = Node::new("right");
    let left_ref: ComponentRef = left.clone();
    let right_ref: ComponentRef = right.clone();
    root.borrow_mut().set_left(Some(left_ref)).unwrap();
    root.borrow_mut().set_right(Some(right_ref)).unwrap();

    let root_ref: ComponentRef = root.clone();
    assert_eq!(descendants(&root_ref).unwrap().len(), 3);

    left.borrow_mut().rename("l");
    right.borrow_mut().rename("r");
    let deltas = flush_tree(&root_ref).unwrap();
    let labels: Vec<&Value> = deltas.iter().map(|d| &d.state["label"]).collect();
    assert_eq!(labels, vec![&json!("l"), &json!("r")]);
    assert!(deltas.iter().all(|d| d.component_type == "Node"));
}
