//! # namecheck-core
//!
//! Hierarchical naming-convention checker for directory trees.
//!
//! Rules are keyed by depth. Each rule's pattern mixes raw regular-expression
//! syntax with predefined placeholders (`[日期8位]`) and custom-list
//! placeholders (`[年级]`). Values a folder's name takes from custom lists
//! are inherited by everything beneath it and must stay consistent.
//!
//! - [`PatternCompiler`] turns patterns into anchored matchers
//! - [`ListExtractor`] resolves list values present in a name
//! - [`RuleSet`] and [`CustomLists`] hold the rules and lists
//! - [`Checker`] walks a tree and produces a [`CheckReport`]
//!
//! ## Example
//!
//! ```no_run
//! use namecheck_core::{Checker, rules::load_scheme_from_toml};
//!
//! let scheme = load_scheme_from_toml(r#"
//! [lists]
//! "年级" = ["1年级", "2年级"]
//!
//! [[folder-rules]]
//! level = 1
//! pattern = "[年级]"
//! "#)?;
//!
//! let report = Checker::builder()
//!     .root("./handouts")
//!     .scheme(scheme)
//!     .build()?
//!     .run()?;
//! print!("{}", report.format_text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod checker;
mod config;
mod context;
mod extract;
mod pattern;
mod types;

/// Rule and list model, loaded from TOML.
pub mod rules;

pub use checker::{Checker, CheckerBuilder, CheckerError};
pub use config::{CheckerConfig, Config, ConfigError};
pub use context::{ListValueContext, ResolvedValues};
pub use extract::ListExtractor;
pub use pattern::{CompiledPattern, PatternCompiler, PatternError, Placeholder};
pub use rules::{CustomLists, ModelError, NamingRule, NamingScheme, RuleKind, RuleSet};
pub use types::{CheckReport, ListValueMismatch, RunStatus, Severity, Violation, ViolationKind};
