//! namecheck CLI tool.
//!
//! Usage:
//! ```bash
//! namecheck check [OPTIONS] [PATH]
//! namecheck rules [PATH]
//! namecheck placeholders
//! namecheck init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use namecheck_core::Severity;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Audit folder and file names in a directory tree against per-level rules
#[derive(Parser)]
#[command(name = "namecheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a directory tree against the naming rules
    Check {
        /// Root directory to check (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Lowest severity that makes the command fail (overrides config)
        #[arg(long)]
        fail_on: Option<FailOn>,

        /// Also save the text report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Show the lists and rules that would be used
    Rules {
        /// Directory whose configuration to show (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the predefined placeholders
    Placeholders,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable numbered report.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

/// Failure threshold.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FailOn {
    /// Fail on errors only.
    Error,
    /// Fail on warnings and errors.
    Warning,
    /// Fail on any violation.
    Info,
}

impl From<FailOn> for Severity {
    fn from(value: FailOn) -> Self {
        match value {
            FailOn::Error => Severity::Error,
            FailOn::Warning => Severity::Warning,
            FailOn::Info => Severity::Info,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            fail_on,
            output,
            exclude,
        } => commands::check::run(&commands::check::CheckArgs {
            path: &path,
            format,
            fail_on: fail_on.map(Severity::from),
            output: output.as_deref(),
            exclude,
            config: cli.config.as_deref(),
        }),
        Commands::Rules { path } => commands::rules::run(&path, cli.config.as_deref()),
        Commands::Placeholders => {
            commands::placeholders::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
