//! # propwire-runtime
//!
//! Runtime support linked by propwire generated components.
//!
//! Generated components keep server-side state and mirror it to a client:
//!
//! - **Ownership tree** - parents own children through strong slots, children
//!   point back through weak parent links ([`adopt`], [`attach`])
//! - **State sync** - every state mutation marks the component dirty
//!   ([`flush_state`], [`flush_tree`])
//! - **Event routing** - client events named `<property>Handler` reach the
//!   registered handler ([`dispatch`])
//! - **Renderer registry** - a child's state is rebuilt from its wrapped
//!   snapshot and component-type tag ([`RendererRegistry`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use propwire_runtime::{dispatch, handler, ComponentRef};
//!
//! let button = Button::new("Save".to_string(), handler(|args| println!("{args:?}")))?;
//! let button: ComponentRef = button;
//! dispatch(&button, "onPressHandler", &[serde_json::json!("x")])?;
//! ```

mod component;
mod error;
mod event;
mod state;
mod tree;

pub mod prelude;

pub use component::{
    bind, same_component, snapshot, Children, Component, ComponentCore, ComponentRef,
    ComponentWeak,
};
pub use error::RuntimeError;
pub use event::{dispatch, handler, Args, Handler};
pub use state::{flush_state, flush_tree, RendererRegistry, StateDelta, StateWrapper};
pub use tree::{adopt, attach, descendants, wrap_child};

pub use serde_json::{Map, Value};

/// JSON object property value.
pub type JsonObject = Map<String, Value>;
