//! Shared output formatting for check reports.

use anyhow::Result;
use namecheck_core::{CheckReport, Severity};

use crate::OutputFormat;

/// Print a check report in the specified format.
pub fn print(report: &CheckReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &CheckReport) {
    let (errors, warnings, _) = report.count_by_severity();

    if report.is_clean() {
        println!("All folders and files conform to the naming rules.\n");
    } else {
        println!("Found {} problem(s) to fix:\n", report.violations.len());
    }

    for (i, violation) in report.violations.iter().enumerate() {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{}. {} {} [{}] (level {})",
            i + 1,
            violation.code,
            violation.kind,
            severity_indicator,
            violation.depth
        );
        println!("   path: {}", violation.path.display());
        println!("   problem: {}", violation.message);
        if let Some(name) = &violation.actual_name {
            println!("   actual name: {name}");
        }
        if let Some(pattern) = &violation.expected_pattern {
            println!("   expected pattern: {pattern}");
        }
        if !violation.expected_extensions.is_empty() {
            println!(
                "   expected extensions: {}",
                violation.expected_extensions.join(", ")
            );
        }
        println!();
    }

    if report.is_cancelled() {
        println!("\x1b[33mCheck was cancelled; this report is partial.\x1b[0m");
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{}{}\x1b[0m", summary_color, report.format_summary());
}

fn print_json(report: &CheckReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &CheckReport) {
    for violation in &report.violations {
        println!("{violation}");
    }
}
