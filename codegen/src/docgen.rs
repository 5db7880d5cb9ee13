//! Loader for react-docgen style component descriptions.
//!
//! ```json
//! {
//!   "displayName": "Button",
//!   "props": {
//!     "label": { "type": { "name": "string" }, "required": true },
//!     "onPress": { "type": { "name": "func" } }
//!   }
//! }
//! ```
//!
//! Property order follows the JSON object.

use crate::error::CodegenError;
use crate::rust::DEFAULT_RUNTIME_PATH;
use crate::schema::{ComponentSchema, PropertyDescriptor, PropertyKind};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocgenComponent {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    props: IndexMap<String, DocgenProp>,
}

#[derive(Debug, Deserialize)]
struct DocgenProp {
    #[serde(rename = "type", default)]
    ty: Option<DocgenType>,
    #[serde(default)]
    required: bool,
}

#[derive(Debug, Deserialize)]
struct DocgenType {
    name: String,
}

/// Maps docgen prop types onto declared Rust types.
#[derive(Debug, Clone)]
pub struct TypeMapping {
    runtime_path: String,
}

impl Default for TypeMapping {
    fn default() -> Self {
        Self {
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
        }
    }
}

impl TypeMapping {
    pub fn new(runtime_path: impl Into<String>) -> Self {
        Self {
            runtime_path: runtime_path.into(),
        }
    }

    /// Declared type and kind for a docgen type name, or `None` when the
    /// type has no server-side representation.
    pub fn map(&self, docgen_type: &str) -> Option<(String, PropertyKind)> {
        let rt = &self.runtime_path;
        let mapped = match docgen_type {
            "string" | "symbol" => ("String".to_string(), PropertyKind::Plain),
            "number" => ("f64".to_string(), PropertyKind::Plain),
            "bool" => ("bool".to_string(), PropertyKind::Plain),
            "object" => (format!("{}::JsonObject", rt), PropertyKind::Plain),
            "array" => (format!("Vec<{}::Value>", rt), PropertyKind::Plain),
            "func" => (format!("{}::Handler", rt), PropertyKind::Function),
            "element" => (format!("{}::ComponentRef", rt), PropertyKind::Element),
            // node, instanceOf, enum, union, arrayOf, custom, shape
            _ => return None,
        };
        Some(mapped)
    }
}

/// Parse a docgen description. `fallback_name` is used when the description
/// carries no `displayName`.
pub fn parse_docgen_str(
    source: &str,
    fallback_name: Option<&str>,
    mapping: &TypeMapping,
) -> Result<ComponentSchema, CodegenError> {
    let doc: DocgenComponent = serde_json::from_str(source)?;

    let name = doc
        .display_name
        .filter(|n| !n.is_empty())
        .or_else(|| fallback_name.map(str::to_string))
        .ok_or_else(|| CodegenError::MissingName("docgen description".to_string()))?;

    let mut schema = ComponentSchema::new(name);
    for (prop_name, prop) in doc.props {
        let ty = prop.ty.ok_or_else(|| CodegenError::MissingType {
            component: schema.name.clone(),
            property: prop_name.clone(),
        })?;
        let (declared, kind) =
            mapping
                .map(&ty.name)
                .ok_or_else(|| CodegenError::UnsupportedType {
                    component: schema.name.clone(),
                    property: prop_name.clone(),
                    ty: ty.name.clone(),
                })?;

        if prop.required {
            schema.required.push(prop_name.clone());
        }
        schema.props.push(PropertyDescriptor {
            name: prop_name,
            ty: declared,
            is_function: kind == PropertyKind::Function,
            is_element: kind == PropertyKind::Element,
        });
    }

    debug!(
        component = %schema.name,
        props = schema.props.len(),
        required = schema.required.len(),
        "loaded docgen schema"
    );
    Ok(schema)
}

/// Load a docgen description from disk, falling back to the file stem for
/// the component name.
pub fn parse_docgen_file(path: &Path, mapping: &TypeMapping) -> Result<ComponentSchema, CodegenError> {
    let source = fs::read_to_string(path).map_err(|e| CodegenError::io(path, e))?;
    let stem = path.file_stem().and_then(|s| s.to_str());
    parse_docgen_str(&source, stem, mapping).map_err(|e| match e {
        CodegenError::MissingName(_) => CodegenError::MissingName(path.display().to_string()),
        other => other,
    })
}
