//! yaml-docs CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Chart metadata error
//! - 4: Template error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ydoc_chart::ChartError;
use ydoc_templates::TemplateError;

mod commands;

use commands::generate::GenerateError;
use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CHART_ERROR: u8 = 3;
    pub const TEMPLATE_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::execute(args).await,
        Commands::Fragments(args) => commands::fragments::execute(args).await,
        Commands::CheckTemplates(args) => commands::check_templates::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Logs go to stderr so `--dry-run` output on stdout stays clean.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    });

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if let Some(generate) = e.downcast_ref::<GenerateError>() {
        return match generate {
            GenerateError::NoCharts => ExitCodes::INVALID_ARGS,
            GenerateError::ChartsFailed {
                template_failures, ..
            } if *template_failures > 0 => ExitCodes::TEMPLATE_ERROR,
            GenerateError::ChartsFailed { .. } => ExitCodes::CHART_ERROR,
        };
    }

    if e.downcast_ref::<TemplateError>().is_some() {
        ExitCodes::TEMPLATE_ERROR
    } else if e.downcast_ref::<ChartError>().is_some() {
        ExitCodes::CHART_ERROR
    } else {
        ExitCodes::GENERAL_ERROR
    }
}
