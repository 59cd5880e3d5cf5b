//! CLI command definitions.
//!
//! This module defines the command structure for the yaml-docs CLI.
//! Each subcommand maps to one documentation workflow.

use clap::{Parser, Subcommand};

pub mod check_templates;
pub mod fragments;
pub mod generate;

/// yaml-docs - Markdown documentation for charts
#[derive(Parser)]
#[command(name = "yaml-docs")]
#[command(version, about = "yaml-docs - Markdown documentation for charts")]
#[command(long_about = r#"
yaml-docs renders Markdown documentation for charts from their values file
and optional Chart.yaml, using a built-in fragment library and optional
Tera override templates.

WORKFLOWS:
  generate         → Render README.md for each chart (or print with --dry-run)
  fragments        → List the built-in fragments override templates can include
  check-templates  → Resolve override templates without rendering any chart

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Chart metadata error
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        short,
        long,
        global = true,
        default_value = "warn",
        env = "YAML_DOCS_LOG_LEVEL"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate documentation for one or more charts
    Generate(generate::GenerateArgs),

    /// List the built-in template fragments
    Fragments(fragments::FragmentsArgs),

    /// Resolve override templates and report problems
    #[command(name = "check-templates")]
    CheckTemplates(check_templates::CheckTemplatesArgs),
}
