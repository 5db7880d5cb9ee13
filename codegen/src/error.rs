use crate::validate::SchemaError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Unsupported type '{ty}' for property '{property}' of {component}")]
    UnsupportedType {
        component: String,
        property: String,
        ty: String,
    },

    #[error("Property '{property}' of {component} has no type information")]
    MissingType { component: String, property: String },

    #[error("Cannot determine a component name for {0}")]
    MissingName(String),

    #[error("Duplicate component '{0}' in module")]
    DuplicateComponent(String),

    #[error("Failed to parse schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
