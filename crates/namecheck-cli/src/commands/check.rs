//! Check command implementation.

use anyhow::{Context, Result};
use namecheck_core::{Checker, Severity};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Arguments of the check command.
pub struct CheckArgs<'a> {
    pub path: &'a Path,
    pub format: OutputFormat,
    pub fail_on: Option<Severity>,
    pub output: Option<&'a Path>,
    pub exclude: Vec<String>,
    pub config: Option<&'a Path>,
}

/// Runs the check command.
pub fn run(args: &CheckArgs<'_>) -> Result<()> {
    let loaded = super::load(args.path, args.config)?;
    let threshold = args
        .fail_on
        .or(loaded.config.checker.fail_on)
        .unwrap_or(Severity::Error);

    let mut builder = Checker::builder()
        .root(args.path)
        .scheme(loaded.scheme)
        .config(loaded.config)
        .excludes(args.exclude.iter().cloned());

    // A project config sits inside the tree it describes.
    if let ConfigSource::Project(config_path) = &loaded.source {
        if let Some(name) = config_path.file_name() {
            builder = builder.exclude(glob::Pattern::escape(&name.to_string_lossy()));
        }
    }

    let checker = builder.build().context("Failed to set up checker")?;

    tracing::info!(
        "Checking {:?} with {} rules",
        checker.root(),
        checker.rule_count()
    );

    let report = checker.run().context("Check failed")?;

    super::output::print(&report, args.format)?;

    if let Some(file) = args.output {
        std::fs::write(file, report.format_text())
            .with_context(|| format!("Failed to save report: {}", file.display()))?;
        tracing::info!("Saved report to {}", file.display());
    }

    if report.has_violations_at(threshold) {
        std::process::exit(1);
    }

    Ok(())
}
