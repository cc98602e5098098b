//! DTO → Domain model conversion with validation.

use tracing::warn;

use crate::extract::ListExtractor;
use crate::pattern::PatternCompiler;

use super::config_dto::{FileRuleDto, FolderRuleDto, NamingSchemeDto};
use super::model::{CustomLists, ModelError, NamingRule, NamingScheme, RuleKind, RuleSet};

/// Errors during DTO → Domain conversion.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A field-level validation error.
    #[error("{context}: {source}")]
    Validation {
        /// Where the error occurred (e.g., `lists."年级"`).
        context: String,
        /// The underlying model error.
        source: ModelError,
    },

    /// A rule level below 1.
    #[error("{context}: level must be at least 1, got {level}")]
    InvalidLevel {
        /// Where the error occurred.
        context: String,
        /// The rejected level.
        level: i64,
    },

    /// Two rules of the same kind share a level.
    #[error("{kind}-rules: level {level} is defined more than once")]
    DuplicateLevel {
        /// Folder or file.
        kind: RuleKind,
        /// The repeated user-facing level.
        level: usize,
    },

    /// Cross-reference errors from aggregate root construction.
    #[error("configuration validation errors:\n{}", format_errors(.0))]
    CrossRef(Vec<ModelError>),
}

fn format_errors(errors: &[ModelError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `NamingSchemeDto` to a validated `NamingScheme`.
///
/// # Errors
///
/// Returns the first field-level error encountered, or every dangling
/// `match-lists` reference at once.
pub fn load(dto: NamingSchemeDto) -> Result<NamingScheme, LoadError> {
    let mut lists = CustomLists::new();
    for (name, items) in dto.lists {
        let context = format!("lists.\"{name}\"");
        lists
            .insert(name, items)
            .map_err(|source| LoadError::Validation { context, source })?;
    }

    let mut rules = RuleSet::new();
    for (i, rule) in dto.folder_rules.into_iter().enumerate() {
        let ctx = format!("folder-rules[{i}]");
        let depth = convert_level(rule.level, &ctx)?;
        let converted = convert_folder_rule(rule, &lists, &ctx);
        insert_unique(&mut rules, RuleKind::Folder, depth, converted)?;
    }
    for (i, rule) in dto.file_rules.into_iter().enumerate() {
        let ctx = format!("file-rules[{i}]");
        let depth = convert_level(rule.level, &ctx)?;
        let converted = convert_file_rule(rule, &lists, &ctx);
        insert_unique(&mut rules, RuleKind::File, depth, converted)?;
    }

    NamingScheme::new(lists, rules).map_err(LoadError::CrossRef)
}

/// Maps a 1-based user level to a canonical 0-based depth.
fn convert_level(level: i64, context: &str) -> Result<usize, LoadError> {
    usize::try_from(level)
        .ok()
        .and_then(|l| l.checked_sub(1))
        .ok_or_else(|| LoadError::InvalidLevel {
            context: context.to_string(),
            level,
        })
}

fn insert_unique(
    rules: &mut RuleSet,
    kind: RuleKind,
    depth: usize,
    rule: NamingRule,
) -> Result<(), LoadError> {
    if rules.get(kind, depth).is_some() {
        return Err(LoadError::DuplicateLevel {
            kind,
            level: depth + 1,
        });
    }
    rules.put(kind, depth, rule);
    Ok(())
}

fn convert_folder_rule(dto: FolderRuleDto, lists: &CustomLists, context: &str) -> NamingRule {
    base_rule(dto.pattern, dto.description, dto.match_lists, lists, context)
}

fn convert_file_rule(dto: FileRuleDto, lists: &CustomLists, context: &str) -> NamingRule {
    base_rule(dto.pattern, dto.description, dto.match_lists, lists, context)
        .with_extensions(dto.extensions)
}

fn base_rule(
    pattern: String,
    description: String,
    match_lists: Option<Vec<String>>,
    lists: &CustomLists,
    context: &str,
) -> NamingRule {
    for token in PatternCompiler::new(lists).unknown_tokens(&pattern) {
        warn!("{context}: `[{token}]` is neither a placeholder nor a defined list");
    }

    let required = match_lists.unwrap_or_else(|| {
        ListExtractor::new(lists)
            .referenced_lists(&pattern)
            .into_iter()
            .map(str::to_string)
            .collect()
    });

    NamingRule::new(pattern)
        .with_description(description)
        .with_required_lists(required)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_and_load(toml_str: &str) -> Result<NamingScheme, LoadError> {
        let dto: NamingSchemeDto = toml::from_str(toml_str).unwrap();
        load(dto)
    }

    // -- Happy path --

    #[test]
    fn load_empty_scheme() {
        let scheme = parse_and_load("").unwrap();
        assert!(scheme.rules().is_empty());
        assert!(scheme.lists().is_empty());
    }

    #[test]
    fn load_full_scheme() {
        let scheme = parse_and_load(
            r#"
[lists]
"年级" = ["1年级", "2年级"]
"学科" = ["数学", "语文"]

[[folder-rules]]
level = 1
pattern = "[年级]"

[[file-rules]]
level = 2
pattern = "[学科]_[日期8位]"
extensions = ["PDF"]
match-lists = ["学科"]
"#,
        )
        .unwrap();

        let rules = scheme.rules();
        let folder = rules.get(RuleKind::Folder, 0).unwrap();
        assert_eq!(folder.pattern(), "[年级]");
        let file = rules.get(RuleKind::File, 1).unwrap();
        assert!(file.allowed_extensions().contains(".pdf"));
        assert_eq!(scheme.lists().len(), 2);
    }

    #[test]
    fn match_lists_default_to_pattern_lists() {
        let scheme = parse_and_load(
            r#"
[lists]
"年级" = ["1年级"]
"学科" = ["数学"]
"班级" = ["1班"]

[[folder-rules]]
level = 2
pattern = "[年级][学科]_[数字]"
"#,
        )
        .unwrap();
        let rule = scheme.rules().get(RuleKind::Folder, 1).unwrap();
        let required: Vec<&str> = rule
            .required_list_matches()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(required, vec!["学科", "年级"]);
    }

    #[test]
    fn explicit_empty_match_lists_disables_comparison() {
        let scheme = parse_and_load(
            r#"
[lists]
"年级" = ["1年级"]

[[folder-rules]]
level = 1
pattern = "[年级]"
match-lists = []
"#,
        )
        .unwrap();
        let rule = scheme.rules().get(RuleKind::Folder, 0).unwrap();
        assert!(rule.required_list_matches().is_empty());
    }

    #[test]
    fn empty_pattern_is_legal() {
        let scheme = parse_and_load("[[file-rules]]\nlevel = 1\nextensions = [\"txt\"]\n").unwrap();
        let rule = scheme.rules().get(RuleKind::File, 0).unwrap();
        assert!(!rule.has_pattern());
    }

    // -- Error cases --

    #[test]
    fn load_rejects_level_zero() {
        let result = parse_and_load("[[folder-rules]]\nlevel = 0\npattern = \"x\"\n");
        assert!(matches!(result, Err(LoadError::InvalidLevel { level: 0, .. })));
    }

    #[test]
    fn load_rejects_negative_level() {
        let result = parse_and_load("[[file-rules]]\nlevel = -3\n");
        assert!(matches!(result, Err(LoadError::InvalidLevel { .. })));
    }

    #[test]
    fn load_rejects_duplicate_level() {
        let result = parse_and_load(
            r#"
[[file-rules]]
level = 2
pattern = "a"

[[file-rules]]
level = 2
pattern = "b"
"#,
        );
        assert!(matches!(
            result,
            Err(LoadError::DuplicateLevel {
                kind: RuleKind::File,
                level: 2
            })
        ));
    }

    #[test]
    fn same_level_in_different_kinds_is_fine() {
        let result = parse_and_load(
            "[[folder-rules]]\nlevel = 1\n[[file-rules]]\nlevel = 1\n",
        );
        assert!(result.is_ok());
    }

    #[test]
    fn load_rejects_duplicate_list_item() {
        let result = parse_and_load("[lists]\n\"学科\" = [\"数学\", \"数学\"]\n");
        let err = result.unwrap_err();
        assert!(matches!(err, LoadError::Validation { .. }));
        assert!(err.to_string().contains("lists.\"学科\""));
    }

    #[test]
    fn load_rejects_unknown_match_list() {
        let result = parse_and_load(
            r#"
[[folder-rules]]
level = 1
pattern = "x"
match-lists = ["年级"]

[[file-rules]]
level = 1
pattern = "y"
match-lists = ["学科"]
"#,
        );
        match result {
            Err(LoadError::CrossRef(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected CrossRef, got {other:?}"),
        }
    }
}
