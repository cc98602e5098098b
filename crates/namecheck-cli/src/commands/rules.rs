//! Rules command implementation.

use anyhow::Result;
use namecheck_core::{NamingRule, NamingScheme, RuleKind};
use std::path::Path;

/// Runs the rules command.
pub fn run(path: &Path, config: Option<&Path>) -> Result<()> {
    let loaded = super::load(path, config)?;
    println!("Configuration: {}\n", loaded.source);
    print_scheme(&loaded.scheme);
    Ok(())
}

fn print_scheme(scheme: &NamingScheme) {
    println!("Lists:");
    if scheme.lists().is_empty() {
        println!("  (none)");
    }
    for (name, items) in scheme.lists().iter() {
        println!("  [{name}] = {}", items.join(", "));
    }

    for kind in [RuleKind::Folder, RuleKind::File] {
        println!("\n{} rules:", capitalize(&kind.to_string()));
        println!("{:<7} {:<30} {:<20} Description", "Level", "Pattern", "Match lists");
        println!("{}", "-".repeat(80));
        let mut any = false;
        for (depth, rule) in scheme.rules().iter(kind) {
            any = true;
            print_rule(depth + 1, rule);
        }
        if !any {
            println!("  (none)");
        }
    }
}

fn print_rule(level: usize, rule: &NamingRule) {
    let pattern = if rule.has_pattern() {
        rule.pattern()
    } else {
        "(any name)"
    };
    let lists: Vec<&str> = rule
        .required_list_matches()
        .iter()
        .map(String::as_str)
        .collect();
    println!(
        "{:<7} {:<30} {:<20} {}",
        level,
        pattern,
        lists.join(","),
        rule.description()
    );
    if !rule.allowed_extensions().is_empty() {
        let exts: Vec<&str> = rule
            .allowed_extensions()
            .iter()
            .map(String::as_str)
            .collect();
        println!("        extensions: {}", exts.join(", "));
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
