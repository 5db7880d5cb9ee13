use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use crate::config::PropwireConfig;
use crate::ui;

pub fn init(config_path: &str, name: Option<String>, components: &str) -> Result<()> {
    let path = Path::new(config_path);

    if path.exists() {
        anyhow::bail!(
            "Configuration file already exists: {}\nUse a different path or remove the existing file.",
            path.display()
        );
    }

    ui::print_step("Initializing propwire project...");

    let project_name = name.unwrap_or_else(default_project_name);
    let config = PropwireConfig::new(project_name, vec![components.to_string()]);
    config.validate()?;

    let config_toml = toml::to_string_pretty(&config)?;
    fs::write(path, &config_toml)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    ui::print_success(&format!("Created {}", path.display()));
    println!();

    let schema_dir = crate::config::config_dir(config_path).join(components);
    if !schema_dir.exists() {
        ui::print_warning(&format!(
            "Schema directory {} does not exist yet",
            schema_dir.display()
        ));
    }

    println!("{}", "Next steps:".bold());
    println!(
        "  1. Put docgen component schemas (*.json) in {}",
        components.cyan()
    );
    println!("  2. Validate them: {}", "pw check".cyan());
    println!("  3. Generate components: {}", "pw generate".cyan());

    Ok(())
}

fn default_project_name() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "my-project".to_string())
}
