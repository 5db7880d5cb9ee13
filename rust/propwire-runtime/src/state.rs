use crate::component::ComponentRef;
use crate::error::RuntimeError;
use crate::tree::descendants;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

/// A child's serialized state as carried inside its parent's state holder.
///
/// Only meaningful together with the child's component-type tag, which the
/// parent stores next to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateWrapper {
    state: Value,
}

impl StateWrapper {
    pub fn new(state: Value) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &Value {
        &self.state
    }

    pub fn into_inner(self) -> Value {
        self.state
    }
}

/// Serialized state of a component, taken only when it changed since the
/// last flush. Clears the dirty flag.
pub fn flush_state(component: &ComponentRef) -> Result<Option<Value>, RuntimeError> {
    let mut borrowed = component.try_borrow_mut().map_err(|_| RuntimeError::Busy {
        operation: "flushing state",
    })?;
    if !borrowed.core().is_dirty() {
        return Ok(None);
    }
    // A failed snapshot keeps the component dirty for the next flush.
    let state = borrowed.state_snapshot()?;
    borrowed.core_mut().take_dirty();
    Ok(Some(state))
}

/// A dirty component's state, as collected by [`flush_tree`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateDelta {
    pub component_type: &'static str,
    pub state: Value,
}

/// Flush every dirty component in the tree rooted at `root`, pre-order.
pub fn flush_tree(root: &ComponentRef) -> Result<Vec<StateDelta>, RuntimeError> {
    let mut deltas = Vec::new();
    for node in descendants(root)? {
        if let Some(state) = flush_state(&node)? {
            let component_type = node
                .try_borrow()
                .map_err(|_| RuntimeError::Busy {
                    operation: "flushing state",
                })?
                .component_type();
            deltas.push(StateDelta {
                component_type,
                state,
            });
        }
    }
    Ok(deltas)
}

type Decoder = Box<dyn Fn(&Value) -> Result<Box<dyn Any>, serde_json::Error>>;

/// Rebuilds component state from a `{snapshot, component type}` pair.
///
/// Stands in for the client side: the tag alone selects the decoder, the
/// wrapped snapshot alone supplies the data.
#[derive(Default)]
pub struct RendererRegistry {
    decoders: HashMap<String, Decoder>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S>(&mut self, component_type: &str)
    where
        S: DeserializeOwned + 'static,
    {
        self.decoders.insert(
            component_type.to_string(),
            Box::new(|value: &Value| {
                serde_json::from_value::<S>(value.clone()).map(|s| Box::new(s) as Box<dyn Any>)
            }),
        );
    }

    pub fn contains(&self, component_type: &str) -> bool {
        self.decoders.contains_key(component_type)
    }

    pub fn restore(
        &self,
        component_type: &str,
        wrapper: &StateWrapper,
    ) -> Result<Box<dyn Any>, RuntimeError> {
        let decoder = self
            .decoders
            .get(component_type)
            .ok_or_else(|| RuntimeError::UnknownComponentType(component_type.to_string()))?;
        Ok(decoder(wrapper.state())?)
    }

    /// Like [`restore`](Self::restore), then downcast to the expected state type.
    pub fn restore_as<S: 'static>(
        &self,
        component_type: &str,
        wrapper: &StateWrapper,
    ) -> Result<Option<S>, RuntimeError> {
        Ok(self
            .restore(component_type, wrapper)?
            .downcast::<S>()
            .ok()
            .map(|s| *s))
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("RendererRegistry")
            .field("component_types", &types)
            .finish()
    }
}
