//! Subcommand implementations.

use anyhow::{Context, Result};
use namecheck_core::rules::load_scheme_from_file;
use namecheck_core::{Config, NamingScheme};
use std::path::Path;

use crate::config_resolver::{self, ConfigSource};

pub mod check;
pub mod init;
pub mod output;
pub mod placeholders;
pub mod rules;

/// Settings, lists and rules read from one configuration file.
pub struct Loaded {
    pub source: ConfigSource,
    pub config: Config,
    pub scheme: NamingScheme,
}

/// Resolves and reads the configuration for `project_dir`.
pub fn load(project_dir: &Path, explicit: Option<&Path>) -> Result<Loaded> {
    let source = config_resolver::resolve(project_dir, explicit);
    let Some(path) = source.path() else {
        tracing::warn!("No configuration found; no naming rules will be applied");
        return Ok(Loaded {
            source,
            config: Config::default(),
            scheme: NamingScheme::empty(),
        });
    };

    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    let config = Config::from_file(path)
        .with_context(|| format!("Failed to load config: {}", path.display()))?;
    let scheme = load_scheme_from_file(path)
        .with_context(|| format!("Failed to load rules: {}", path.display()))?;

    Ok(Loaded {
        source,
        config,
        scheme,
    })
}
