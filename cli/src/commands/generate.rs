use anyhow::{Context, Result};
use colored::Colorize;
use propwire_codegen::{compile_module, write_module, write_single_file};
use serde_json::json;
use std::path::PathBuf;

use super::Project;
use crate::ui::{self, symbols};

pub struct GenerateOptions {
    pub output: Option<String>,
    pub single_file: bool,
    pub dry_run: bool,
    pub json: bool,
}

pub fn generate(config_path: &str, options: GenerateOptions) -> Result<()> {
    let project = Project::load(config_path)?;
    project.ensure_schemas()?;

    if !options.json {
        ui::print_step(&format!(
            "Loading {} schema(s) for {}...",
            project.schema_paths.len(),
            project.config.project.name.bold()
        ));
    }

    let schemas: Vec<_> = project
        .load_schemas()?
        .into_iter()
        .map(|loaded| loaded.schema)
        .collect();

    // Nothing is written unless every schema compiles.
    let output = compile_module(&schemas, &project.config.rust_config())
        .context("Code generation failed")?;

    let out_dir = project
        .config
        .output_dir(&project.config_dir, options.output.as_deref());
    let single_file = options.single_file || project.config.output.single_file;
    let single_path = out_dir.join(project.config.single_file_name());

    let files: Vec<PathBuf> = if options.dry_run {
        if single_file {
            vec![single_path]
        } else {
            output
                .components
                .iter()
                .map(|c| out_dir.join(c.file_name()))
                .chain(std::iter::once(out_dir.join("mod.rs")))
                .collect()
        }
    } else if single_file {
        vec![write_single_file(&output, &single_path)?]
    } else {
        write_module(&output, &out_dir)?
    };

    let names: Vec<&str> = output.components.iter().map(|c| c.name.as_str()).collect();

    if options.json {
        let report = json!({
            "project": project.config.project.name,
            "components": names,
            "files": files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>(),
            "dry_run": options.dry_run,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for file in &files {
        println!("  {} {}", symbols::PLUS.green(), file.display());
    }
    println!();

    if options.dry_run {
        ui::print_warning(&format!(
            "Dry run: {} file(s) for {} component(s) not written",
            files.len(),
            names.len()
        ));
    } else {
        ui::print_success(&format!(
            "Generated {} component(s) in {}",
            names.len(),
            out_dir.display()
        ));
        ui::print_info(
            "Generated code depends on the propwire-runtime and serde (derive) crates.",
        );
    }

    Ok(())
}
