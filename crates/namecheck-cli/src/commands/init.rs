//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# namecheck configuration
#
# Levels are 1-based. Folder rules at level N check folders N steps below
# the checked directory; file rules at level N check files inside them
# (level 1 = files directly in the checked directory).
#
# Patterns are regular expressions with placeholders:
#   [年份4位] [数字] [日期8位] [任意字符] [字母] [汉字]
# plus [list name] for any list defined under [lists].
# Run `namecheck placeholders` for details.

[checker]
# Glob patterns on paths relative to the checked directory
exclude = [
    "**/.git",
    "**/.DS_Store",
]

# Lowest severity that makes `namecheck check` exit with status 1
fail_on = "error"

# Descend into symlinked directories (cycles are detected)
follow_symlinks = true

[lists]
"年级" = ["1年级", "2年级", "3年级"]
"学科" = ["语文", "数学", "英语"]

[[folder-rules]]
level = 1
pattern = "[年级]"
description = "grade folder"

[[folder-rules]]
level = 2
pattern = "[年级][学科]"
description = "subject folder inside a grade"
# Lists whose values must agree with the enclosing folders.
# Default: every list the pattern uses.
match-lists = ["年级"]

[[file-rules]]
level = 3
pattern = "[学科]_[日期8位]"
description = "dated handout"
extensions = [".pdf", ".docx"]

# Per-kind severity overrides:
#   folder-naming, file-naming, list-mismatch, extension,
#   directory-access, pattern-compile
[severity]
# directory-access = "error"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("namecheck.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created namecheck.toml");
    println!("\nNext steps:");
    println!("  1. Edit namecheck.toml to describe your lists and rules");
    println!("  2. Run: namecheck rules    (to review them)");
    println!("  3. Run: namecheck check");

    Ok(())
}
