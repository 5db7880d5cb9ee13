//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use propwire_runtime::prelude::*;
//! ```

pub use crate::{
    dispatch, flush_state, flush_tree, handler, same_component, Component, ComponentRef,
    Handler, RendererRegistry, RuntimeError, StateWrapper,
};
