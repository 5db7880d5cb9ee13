//! # propwire-codegen
//!
//! Generates server-side Rust component types from UI component schemas.
//!
//! Each property of a [`ComponentSchema`] is classified as exactly one of:
//!
//! - **Plain** - accessor pair backed by a field of the serializable state holder
//! - **Element** - owned child component slot, with parent links kept in sync and
//!   the child's state wrapped into ours together with its component type
//! - **Function** - server-side handler, routed from the client event
//!   `<property>Handler`
//!
//! ## Example
//!
//! ```rust,ignore
//! use propwire_codegen::{compile_component, ComponentSchema, PropertyDescriptor, RustConfig};
//!
//! let schema = ComponentSchema::new("Button")
//!     .with_prop(PropertyDescriptor::plain("label", "String"))
//!     .with_required("label");
//! let generated = compile_component(&schema, &RustConfig::default())?;
//! println!("{}", generated.source);
//! ```

pub mod docgen;
pub mod error;
pub mod naming;
pub mod rust;
pub mod schema;
pub mod validate;

pub use docgen::{parse_docgen_file, parse_docgen_str, TypeMapping};
pub use error::CodegenError;
pub use rust::{
    compile_component, compile_module, write_module, write_single_file, GeneratedComponent,
    ModuleOutput, RustConfig, DEFAULT_RUNTIME_PATH,
};
pub use schema::{ComponentSchema, PropertyDescriptor, PropertyKind};
pub use validate::{validate, SchemaError, SchemaViolation};
