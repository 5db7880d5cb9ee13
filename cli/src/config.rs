use anyhow::{Context, Result};
use propwire_codegen::naming::is_identifier;
use propwire_codegen::{RustConfig, TypeMapping, DEFAULT_RUNTIME_PATH};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure for propwire.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropwireConfig {
    pub project: ProjectConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,

    /// Directories or files holding `*.json` component schemas, relative to
    /// the config file.
    #[serde(default = "default_components")]
    pub components: Vec<String>,
}

fn default_components() -> Vec<String> {
    vec!["schemas".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// File stem used by the single-file layout.
    #[serde(default = "default_module")]
    pub module: String,

    /// Path generated code uses to reach the runtime crate.
    #[serde(default = "default_runtime_path")]
    pub runtime_path: String,

    #[serde(default)]
    pub single_file: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            module: default_module(),
            runtime_path: default_runtime_path(),
            single_file: false,
        }
    }
}

fn default_output_dir() -> String {
    "src/generated".to_string()
}

fn default_module() -> String {
    "components".to_string()
}

fn default_runtime_path() -> String {
    DEFAULT_RUNTIME_PATH.to_string()
}

impl PropwireConfig {
    pub fn new(name: impl Into<String>, components: Vec<String>) -> Self {
        Self {
            project: ProjectConfig {
                name: name.into(),
                components,
            },
            output: OutputConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: PropwireConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Try to load config, returning None if file doesn't exist
    pub fn load_optional<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Load config, pointing at `pw init` when it is missing
    pub fn load_required<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        Self::load_optional(path)?.ok_or_else(|| {
            anyhow::anyhow!(
                "Configuration file not found: {}\nRun `pw init` to create one.",
                path.display()
            )
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.project.name.trim().is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        if self.project.components.is_empty() {
            anyhow::bail!("At least one component source is required in [project].components");
        }

        let mut seen = BTreeSet::new();
        for source in &self.project.components {
            if source.trim().is_empty() {
                anyhow::bail!("Component sources cannot be empty paths");
            }
            if !seen.insert(source.as_str()) {
                anyhow::bail!("Duplicate component source: {}", source);
            }
        }

        if !is_identifier(&self.output.module) {
            anyhow::bail!(
                "Output module '{}' must be a valid Rust identifier",
                self.output.module
            );
        }

        if self.output.runtime_path.trim().is_empty() {
            anyhow::bail!("Output runtime_path cannot be empty");
        }

        Ok(())
    }

    pub fn rust_config(&self) -> RustConfig {
        RustConfig {
            runtime_path: self.output.runtime_path.clone(),
        }
    }

    pub fn type_mapping(&self) -> TypeMapping {
        TypeMapping::new(self.output.runtime_path.clone())
    }

    /// Component sources resolved against the config file's directory
    pub fn component_sources(&self, config_dir: &Path) -> Vec<PathBuf> {
        self.project
            .components
            .iter()
            .map(|source| resolve(config_dir, source))
            .collect()
    }

    /// Output directory, with `override_dir` taking precedence over config
    pub fn output_dir(&self, config_dir: &Path, override_dir: Option<&str>) -> PathBuf {
        resolve(config_dir, override_dir.unwrap_or(&self.output.dir))
    }

    pub fn single_file_name(&self) -> String {
        format!("{}.rs", self.output.module)
    }
}

/// Directory relative paths in the config are resolved against.
pub fn config_dir(config_path: &str) -> PathBuf {
    Path::new(config_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf()
}

fn resolve(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Max directory depth searched below each component source.
const MAX_DISCOVERY_DEPTH: usize = 3;

/// Find every `*.json` schema under the given sources, sorted and deduplicated.
pub fn discover_schemas(sources: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut found = BTreeSet::new();

    for source in sources {
        if source.is_file() {
            found.insert(source.clone());
        } else if source.is_dir() {
            discover_recursive(source, &mut found, 0)?;
        } else {
            anyhow::bail!("Component source not found: {}", source.display());
        }
    }

    debug!(schemas = found.len(), "discovered schema files");
    Ok(found.into_iter().collect())
}

fn discover_recursive(dir: &Path, found: &mut BTreeSet<PathBuf>, depth: usize) -> Result<()> {
    if depth >= MAX_DISCOVERY_DEPTH {
        return Ok(());
    }

    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping non UTF-8 path");
            continue;
        };

        if path.is_dir() {
            // Skip hidden dirs, node_modules, target, etc.
            if !name.starts_with('.') && name != "node_modules" && name != "target" {
                discover_recursive(&path, found, depth + 1)?;
            }
        } else if name.ends_with(".json") {
            found.insert(path);
        }
    }

    Ok(())
}
