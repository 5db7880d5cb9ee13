//! # propwire-cli
//!
//! Command-line tool for generating state-synchronised Rust components
//! from UI component schemas.
//!
//! ## Installation
//!
//! ```bash
//! cargo install propwire-cli
//! ```
//!
//! ## Commands
//!
//! - `pw init` - Create a `propwire.toml`
//! - `pw check` - Validate every discovered schema
//! - `pw list` - List discovered components and their properties
//! - `pw inspect <component>` - Print generated source for one component
//! - `pw generate` - Write the generated module
//!
//! See `pw --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::process;

mod commands;
mod config;
mod telemetry;
mod ui;

#[derive(Parser)]
#[command(name = "pw")]
#[command(about = "Propwire CLI - Generate server-side components from UI schemas", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to propwire.toml configuration file
    #[arg(short, long, global = true, default_value = "propwire.toml")]
    config: String,

    /// Output as JSON (machine-readable format)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new propwire project
    Init {
        /// Project name (defaults to the current directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Directory holding component schemas
        #[arg(long, default_value = "schemas")]
        components: String,
    },

    /// Generate Rust components from every discovered schema
    Generate {
        /// Output directory (overrides config)
        #[arg(short, long)]
        output: Option<String>,

        /// Write one file with inline modules instead of a module directory
        #[arg(long)]
        single_file: bool,

        /// Show what would be written without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate every discovered schema
    Check,

    /// List discovered components with their property kinds
    List,

    /// Print the generated source for one component
    Inspect {
        /// Component name, module name or schema path
        component: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "pw", &mut io::stdout());
        return;
    }

    telemetry::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Init { name, components } => {
            commands::config::init(&cli.config, name, &components)
        }
        Commands::Generate {
            output,
            single_file,
            dry_run,
        } => commands::generate::generate(
            &cli.config,
            commands::generate::GenerateOptions {
                output,
                single_file,
                dry_run,
                json: cli.json,
            },
        ),
        Commands::Check => commands::schema::check(&cli.config, cli.json),
        Commands::List => commands::schema::list(&cli.config, cli.json),
        Commands::Inspect { component } => commands::schema::inspect(&cli.config, &component),
    }
}
