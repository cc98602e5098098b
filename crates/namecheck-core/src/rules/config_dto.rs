//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw TOML representation of a naming scheme.
///
/// Covers the `[lists]`, `[[folder-rules]]` and `[[file-rules]]` sections;
/// other sections of the same file are ignored here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamingSchemeDto {
    /// Custom lists keyed by name, items in declaration order.
    #[serde(default)]
    pub lists: BTreeMap<String, Vec<String>>,

    /// Folder rules.
    #[serde(rename = "folder-rules", default)]
    pub folder_rules: Vec<FolderRuleDto>,

    /// File rules.
    #[serde(rename = "file-rules", default)]
    pub file_rules: Vec<FileRuleDto>,
}

/// TOML representation of a folder rule.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderRuleDto {
    /// 1-based level as shown to users.
    pub level: i64,
    /// Naming pattern (may be empty).
    #[serde(default)]
    pub pattern: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Lists whose values must agree with ancestors.
    ///
    /// Defaults to every list the pattern references.
    #[serde(rename = "match-lists", default)]
    pub match_lists: Option<Vec<String>>,
}

/// TOML representation of a file rule.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRuleDto {
    /// 1-based level as shown to users.
    pub level: i64,
    /// Naming pattern for the file stem (may be empty).
    #[serde(default)]
    pub pattern: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Lists whose values must agree with ancestors.
    #[serde(rename = "match-lists", default)]
    pub match_lists: Option<Vec<String>>,
    /// Allowed extensions; empty means unrestricted.
    #[serde(default)]
    pub extensions: Vec<String>,
}
