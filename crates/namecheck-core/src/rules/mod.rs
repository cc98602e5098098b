//! Naming rules and custom lists driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert
//! NamingScheme (pure domain model: CustomLists + RuleSet)
//!   ↓ CheckerBuilder::scheme()
//! Checker
//! ```

use std::path::Path;

pub mod config_dto;
pub mod loader;
pub mod model;

pub use model::{CustomLists, ModelError, NamingRule, NamingScheme, RuleKind, RuleSet};

/// Errors from reading TOML and loading a naming scheme.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file path.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content into a validated [`NamingScheme`].
///
/// Returns an empty scheme if no list or rule sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_scheme_from_toml(content: &str) -> Result<NamingScheme, LoadRulesError> {
    let dto: config_dto::NamingSchemeDto = toml::from_str(content)?;
    Ok(loader::load(dto)?)
}

/// Reads a TOML file into a validated [`NamingScheme`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to load.
pub fn load_scheme_from_file(path: &Path) -> Result<NamingScheme, LoadRulesError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadRulesError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_scheme_from_toml(&content)
}
