//! Configuration file lookup.
//!
//! The first hit wins:
//!
//! 1. `--config` flag (explicit path, not checked for existence)
//! 2. `namecheck.toml` or `.namecheck.toml` in the checked directory
//! 3. `config.toml` in the global directory (`$NAMECHECK_CONFIG_DIR` or `~/.namecheck/`)
//! 4. Nothing: built-in defaults, no rules

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named on the command line.
    Explicit(PathBuf),
    /// Sits in the checked directory.
    Project(PathBuf),
    /// Shared file in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// File to read, or `None` when running on defaults.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Whether the shared global file was picked.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::Default => write!(f, "built-in defaults"),
        }
    }
}

/// File names looked up in the checked directory; earlier names win.
const PROJECT_CONFIG_NAMES: &[&str] = &["namecheck.toml", ".namecheck.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Overrides `~/.namecheck/` as the global config directory.
const CONFIG_DIR_ENV: &str = "NAMECHECK_CONFIG_DIR";

/// Picks the configuration file for a check of `project_dir`.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    Search {
        project_dir,
        global_dir: global_config_dir(),
    }
    .run(explicit)
}

/// The places a configuration file may live, with the global directory
/// already resolved so tests can point it anywhere.
struct Search<'a> {
    project_dir: &'a Path,
    global_dir: Option<PathBuf>,
}

impl Search<'_> {
    fn run(self, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }
        if let Some(path) = self.project_file() {
            tracing::debug!("Found project config: {}", path.display());
            return ConfigSource::Project(path);
        }
        if let Some(path) = self.global_file() {
            tracing::debug!("Found global config: {}", path.display());
            return ConfigSource::Global(path);
        }
        ConfigSource::Default
    }

    fn project_file(&self) -> Option<PathBuf> {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| self.project_dir.join(name))
            .find(|path| path.is_file())
    }

    fn global_file(&self) -> Option<PathBuf> {
        self.global_dir
            .as_deref()
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|path| path.is_file())
    }
}

/// `$NAMECHECK_CONFIG_DIR` when set and non-empty, else `~/.namecheck/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    global_dir_from(std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from), home::home_dir())
}

fn global_dir_from(env_dir: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    env_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|h| h.join(".namecheck")))
}
