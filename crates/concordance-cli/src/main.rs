//! # concordance-cli
//!
//! Command-line front end: build a concordance from a schema tree, check
//! its coverage, and query a persisted lookup file.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{CliConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "concordance")]
#[command(about = "Cross-version XSD schema concordance builder")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Show detailed progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a concordance from a directory of schema versions
    Build {
        /// Directory containing one subdirectory per schema version
        #[arg(short, long)]
        schema_dir: PathBuf,

        /// Directory for output files
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Process only one version (version folder name)
        #[arg(long)]
        single_version: Option<String>,

        /// Exports to write (repeatable); defaults to the config file's list
        #[arg(short, long, value_enum)]
        format: Vec<OutputFormat>,

        /// Walk versions one after another
        #[arg(long)]
        sequential: bool,

        /// Description stored in the run metadata
        #[arg(long)]
        description: Option<String>,
    },

    /// Report schema declarations missing from a concordance
    Coverage {
        /// Directory containing the schema versions
        #[arg(short, long)]
        schema_dir: PathBuf,

        /// Persisted concordance (field_lookup.json)
        #[arg(short = 'l', long)]
        concordance: PathBuf,

        /// Check only one version directory
        #[arg(long = "schema-version")]
        version: Option<String>,
    },

    /// Find the canonical field owning a path
    Lookup {
        /// Persisted concordance (field_lookup.json)
        #[arg(short = 'l', long)]
        concordance: PathBuf,

        /// Structural path, e.g. /IRS990/TotalRevenueAmt
        xpath: String,
    },

    /// Path to use for a canonical field in a given schema version
    Resolve {
        /// Persisted concordance (field_lookup.json)
        #[arg(short = 'l', long)]
        concordance: PathBuf,

        /// Canonical field name
        name: String,

        /// Schema version declared by the document, e.g. 2014v5.0
        #[arg(long = "schema-version")]
        version: String,
    },
}

/// Failure classes mapped to process exit codes
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Runtime(#[from] anyhow::Error),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 3,
            Self::Runtime(_) => 1,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    init_tracing(cli.verbose, config.log_filter.as_deref())?;

    match cli.command {
        Commands::Build {
            schema_dir,
            output_dir,
            single_version,
            format,
            sequential,
            description,
        } => {
            let options = commands::BuildOptions {
                schema_dir,
                output_dir: output_dir.unwrap_or_else(|| config.output_dir.clone()),
                single_version,
                formats: if format.is_empty() {
                    config.formats.clone()
                } else {
                    format
                },
                parallel: config.parallel && !sequential,
                description: description.or_else(|| config.description.clone()),
            };
            commands::build(options, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Coverage {
            schema_dir,
            concordance,
            version,
        } => {
            let complete = commands::coverage(&schema_dir, &concordance, version.as_deref())?;
            Ok(if complete {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Commands::Lookup { concordance, xpath } => {
            commands::lookup(&concordance, &xpath)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Resolve {
            concordance,
            name,
            version,
        } => {
            commands::resolve(&concordance, &name, &version)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `--verbose` wins over `RUST_LOG`, which wins over the config file
fn init_tracing(verbose: bool, configured: Option<&str>) -> Result<(), CliError> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if let Ok(filter) = EnvFilter::try_from_default_env() {
        filter
    } else {
        let directive = configured.unwrap_or("info");
        EnvFilter::try_new(directive)
            .map_err(|e| CliError::Config(format!("invalid log_filter '{directive}': {e}")))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
