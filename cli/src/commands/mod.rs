pub mod config;
pub mod generate;
pub mod schema;

use anyhow::{Context, Result};
use propwire_codegen::{parse_docgen_file, ComponentSchema};
use std::path::PathBuf;

use crate::config::{config_dir, discover_schemas, PropwireConfig};

/// A configured project and the schema files its sources resolve to.
pub struct Project {
    pub config: PropwireConfig,
    pub config_dir: PathBuf,
    pub schema_paths: Vec<PathBuf>,
}

/// A parsed schema and the file it came from.
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: ComponentSchema,
}

impl Project {
    pub fn load(config_path: &str) -> Result<Self> {
        let config = PropwireConfig::load_required(config_path)?;
        let config_dir = config_dir(config_path);
        let schema_paths = discover_schemas(&config.component_sources(&config_dir))?;
        Ok(Self {
            config,
            config_dir,
            schema_paths,
        })
    }

    /// Parse every schema file, failing on the first one that cannot be loaded.
    pub fn load_schemas(&self) -> Result<Vec<LoadedSchema>> {
        let mapping = self.config.type_mapping();
        self.schema_paths
            .iter()
            .map(|path| {
                let schema = parse_docgen_file(path, &mapping)
                    .with_context(|| format!("Failed to load schema: {}", path.display()))?;
                Ok(LoadedSchema {
                    path: path.clone(),
                    schema,
                })
            })
            .collect()
    }

    pub fn ensure_schemas(&self) -> Result<()> {
        if self.schema_paths.is_empty() {
            anyhow::bail!(
                "No component schemas found.\n\nLooked in: {}\nAdd *.json docgen schemas or update [project].components in your config.",
                self.config.project.components.join(", ")
            );
        }
        Ok(())
    }
}
