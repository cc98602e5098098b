//! Placeholders command implementation.

use namecheck_core::Placeholder;

/// Runs the placeholders command.
pub fn run() {
    println!("Predefined placeholders:\n");
    println!("{:<12} {:<28} Description", "Token", "Expands to");
    println!("{}", "-".repeat(80));

    for placeholder in Placeholder::ALL {
        println!(
            "{:<12} {:<28} {}",
            placeholder.token(),
            placeholder.expansion(),
            placeholder.description()
        );
    }

    println!("\nAny other [name] that matches a list under [lists] expands to the");
    println!("list's items, longest first. Everything else is regular-expression syntax,");
    println!("and the whole name must match, e.g.:");
    println!("  pattern = \"[学科]_[日期8位]\"   matches  数学_20230101");
}
