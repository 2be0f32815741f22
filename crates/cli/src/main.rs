// complink CLI - company record linkage across two CSV datasets

mod exit_codes;
mod link;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use complink_linkage::LinkageError;
use exit_codes::{linkage_exit_code, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "complink")]
#[command(about = "Link company records across two CSV datasets by canonical name and address")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Link two datasets from a TOML config file
    #[command(after_help = "\
Examples:
  complink run companies.link.toml
  complink run companies.link.toml --output out/matches.csv
  complink run companies.link.toml --report report.json --threshold 90
  complink run companies.link.toml --json > report.json")]
    Run {
        /// Path to the .link.toml config file
        config: PathBuf,

        /// Write the CSV results here instead of the configured path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the JSON report to stdout
        #[arg(long)]
        json: bool,

        /// Override the address similarity threshold (0-100)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  complink validate companies.link.toml")]
    Validate {
        /// Path to the .link.toml config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let result = match cli.command {
        Commands::Run {
            config,
            output,
            report,
            json,
            threshold,
        } => link::cmd_run(config, output, report, json, threshold),
        Commands::Validate { config } => link::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn linkage(err: LinkageError) -> Self {
        let hint = match innermost(&err) {
            LinkageError::MissingColumn { .. } => Some(
                "check company_column and address_columns in the config against the CSV header"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code: linkage_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn innermost(err: &LinkageError) -> &LinkageError {
    match err {
        LinkageError::Stage { source, .. } => innermost(source),
        other => other,
    }
}
