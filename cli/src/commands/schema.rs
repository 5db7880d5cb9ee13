use anyhow::{Context, Result};
use colored::Colorize;
use propwire_codegen::naming::module_name;
use propwire_codegen::{
    compile_component, compile_module, parse_docgen_file, validate, ComponentSchema,
    PropertyKind,
};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

use super::{LoadedSchema, Project};
use crate::ui::{self, symbols};

#[derive(Debug, Serialize)]
struct CheckReport {
    path: String,
    component: Option<String>,
    errors: Vec<String>,
}

pub fn check(config_path: &str, json: bool) -> Result<()> {
    let project = Project::load(config_path)?;
    project.ensure_schemas()?;
    let mapping = project.config.type_mapping();

    if !json {
        ui::print_step(&format!(
            "Checking {} schema(s)...",
            project.schema_paths.len()
        ));
    }

    let mut reports = Vec::with_capacity(project.schema_paths.len());
    let mut valid = Vec::new();

    for path in &project.schema_paths {
        let report = match parse_docgen_file(path, &mapping) {
            Err(e) => CheckReport {
                path: path.display().to_string(),
                component: None,
                errors: vec![e.to_string()],
            },
            Ok(schema) => {
                let errors = match validate(&schema) {
                    Ok(()) => Vec::new(),
                    Err(e) => e.violations.iter().map(ToString::to_string).collect(),
                };
                let report = CheckReport {
                    path: path.display().to_string(),
                    component: Some(schema.name.clone()),
                    errors,
                };
                if report.errors.is_empty() {
                    valid.push(schema);
                }
                report
            }
        };
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| !r.errors.is_empty()).count();

    // Cross-schema clashes only show up once every schema is valid.
    let mut module_errors = Vec::new();
    if failed == 0 {
        if let Err(e) = compile_module(&valid, &project.config.rust_config()) {
            module_errors.push(e.to_string());
        }
    }

    if json {
        let output = serde_json::json!({
            "valid": failed == 0 && module_errors.is_empty(),
            "schemas": reports,
            "module_errors": module_errors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for report in &reports {
            let label = report.component.as_deref().unwrap_or("<unloaded>");
            if report.errors.is_empty() {
                println!(
                    "  {} {} {}",
                    symbols::SUCCESS.green(),
                    label.bold(),
                    report.path.dimmed()
                );
            } else {
                println!(
                    "  {} {} {}",
                    symbols::FAILURE.red(),
                    label.bold(),
                    report.path.dimmed()
                );
                for error in &report.errors {
                    println!("      {} {}", symbols::BULLET.dimmed(), error);
                }
            }
        }
        println!();
        for error in &module_errors {
            ui::print_error(error);
        }
    }

    if failed > 0 {
        anyhow::bail!(
            "{} of {} schema(s) failed validation",
            failed,
            reports.len()
        );
    }
    if !module_errors.is_empty() {
        anyhow::bail!("Schemas cannot be generated into one module");
    }

    if !json {
        ui::print_success(&format!("All {} schema(s) are valid", reports.len()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct PropertySummary<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    ty: &'a str,
    kind: PropertyKind,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    event: Option<String>,
}

#[derive(Debug, Serialize)]
struct ComponentSummary<'a> {
    name: &'a str,
    module: String,
    path: String,
    properties: Vec<PropertySummary<'a>>,
}

fn summarize<'a>(loaded: &'a LoadedSchema) -> ComponentSummary<'a> {
    let schema = &loaded.schema;
    ComponentSummary {
        name: &schema.name,
        module: module_name(&schema.name),
        path: loaded.path.display().to_string(),
        properties: schema
            .props
            .iter()
            .map(|prop| PropertySummary {
                name: &prop.name,
                ty: &prop.ty,
                kind: prop.kind(),
                required: schema.required.contains(&prop.name),
                event: (prop.kind() == PropertyKind::Function).then(|| prop.event_name()),
            })
            .collect(),
    }
}

/// Parse what can be parsed, warning about the rest.
fn load_lenient(project: &Project) -> Vec<LoadedSchema> {
    let mapping = project.config.type_mapping();
    let mut loaded = Vec::new();
    for path in &project.schema_paths {
        match parse_docgen_file(path, &mapping) {
            Ok(schema) => loaded.push(LoadedSchema {
                path: path.clone(),
                schema,
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping schema");
                ui::print_warning(&format!("Skipping {}: {}", path.display(), e));
            }
        }
    }
    loaded
}

pub fn list(config_path: &str, json: bool) -> Result<()> {
    let project = Project::load(config_path)?;
    let loaded = load_lenient(&project);
    let summaries: Vec<ComponentSummary<'_>> = loaded.iter().map(summarize).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("{}", "No components found.".yellow());
        println!();
        println!(
            "Add docgen schemas to {} and run {}",
            project.config.project.components.join(", ").cyan(),
            "pw list".cyan()
        );
        return Ok(());
    }

    ui::print_section(&format!("Components ({})", summaries.len()));
    for summary in &summaries {
        println!();
        println!(
            "  {} {}",
            summary.name.green().bold(),
            format!("({})", summary.path).dimmed()
        );
        if summary.properties.is_empty() {
            ui::print_info("no properties");
        }
        for prop in &summary.properties {
            let mut line = format!(
                "    {} {:<16} {} {}",
                symbols::BULLET.dimmed(),
                prop.name,
                ui::format_kind(prop.kind),
                prop.ty
            );
            if prop.required {
                line.push_str(&format!(" {}", "required".yellow()));
            }
            if let Some(event) = &prop.event {
                line.push_str(&format!(" {}", format!("<- {}", event).dimmed()));
            }
            println!("{}", line);
        }
    }
    println!();
    println!(
        "Use {} to see the generated source",
        "pw inspect <component>".cyan()
    );

    Ok(())
}

fn matches(loaded: &LoadedSchema, query: &str) -> bool {
    let name = &loaded.schema.name;
    name == query || name.eq_ignore_ascii_case(query) || module_name(name) == query
}

fn find_schema(project: &Project, query: &str) -> Result<ComponentSchema> {
    let as_path = Path::new(query);
    if as_path.is_file() {
        return parse_docgen_file(as_path, &project.config.type_mapping())
            .with_context(|| format!("Failed to load schema: {}", as_path.display()));
    }

    let loaded = load_lenient(project);
    if let Some(found) = loaded.iter().find(|l| matches(l, query)) {
        return Ok(found.schema.clone());
    }

    let available: Vec<&str> = loaded.iter().map(|l| l.schema.name.as_str()).collect();
    anyhow::bail!(
        "Component '{}' not found\n\nAvailable components: {}",
        query,
        if available.is_empty() {
            "(none)".to_string()
        } else {
            available.join(", ")
        }
    )
}

pub fn inspect(config_path: &str, component: &str) -> Result<()> {
    let project = Project::load(config_path)?;
    let schema = find_schema(&project, component)?;
    let generated = compile_component(&schema, &project.config.rust_config())?;
    print!("{}", generated.source);
    Ok(())
}
