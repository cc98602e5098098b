//! Configuration types for namecheck.
//!
//! The same TOML file also carries the lists and rules; those sections are
//! read by [`crate::rules`] and ignored here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::types::{Severity, ViolationKind};

/// Top-level checker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Walk settings.
    #[serde(default)]
    pub checker: CheckerConfig,

    /// Per-kind severity overrides, keyed by kind name or code.
    #[serde(default)]
    pub severity: BTreeMap<String, Severity>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Resolves `[severity]` keys to violation kinds.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first key that is not a known kind.
    pub fn severity_overrides(&self) -> Result<BTreeMap<ViolationKind, Severity>, ConfigError> {
        self.severity
            .iter()
            .map(|(key, severity)| {
                ViolationKind::from_name(key)
                    .map(|kind| (kind, *severity))
                    .ok_or_else(|| ConfigError::UnknownKind { name: key.clone() })
            })
            .collect()
    }
}

/// Walk-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Glob patterns on root-relative paths; matching entries are skipped.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Lowest severity that makes the CLI exit with failure.
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// Whether symlinked directories are descended into.
    #[serde(default = "default_true")]
    pub follow_symlinks: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            fail_on: None,
            follow_symlinks: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// `[severity]` names a kind that does not exist.
    #[error("unknown violation kind `{name}` in [severity]")]
    UnknownKind {
        /// The unrecognised key.
        name: String,
    },
}
