//! Depth-first walk that applies naming rules to a directory tree.
//!
//! Canonical depth is 0 at the root. A folder visited at depth `d` is checked
//! against the folder rule stored at `d - 1`; the files it contains are
//! checked against the file rule stored at `d`. The root's own name is never
//! checked.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError};
use crate::context::ListValueContext;
use crate::extract::ListExtractor;
use crate::pattern::{CompiledPattern, PatternCompiler, PatternError};
use crate::rules::{CustomLists, NamingRule, NamingScheme, RuleKind, RuleSet};
use crate::types::{CheckReport, RunStatus, Severity, Violation, ViolationKind};

/// Errors that prevent a check from running at all.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// The root directory does not exist.
    #[error("root directory not found: {}", .path.display())]
    RootNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The root path exists but is not a directory.
    #[error("root is not a directory: {}", .path.display())]
    RootNotDirectory {
        /// The offending path.
        path: PathBuf,
    },

    /// IO error resolving the root.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Builder for configuring a [`Checker`].
#[derive(Default)]
pub struct CheckerBuilder {
    root: Option<PathBuf>,
    lists: CustomLists,
    rules: RuleSet,
    exclude_patterns: Vec<String>,
    follow_symlinks: Option<bool>,
    config: Option<Config>,
}

impl CheckerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to check.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the custom lists referenced by rule patterns.
    #[must_use]
    pub fn lists(mut self, lists: CustomLists) -> Self {
        self.lists = lists;
        self
    }

    /// Sets the folder and file rules.
    #[must_use]
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Sets lists and rules from a validated scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: NamingScheme) -> Self {
        let (lists, rules) = scheme.into_parts();
        self.lists = lists;
        self.rules = rules;
        self
    }

    /// Adds an exclude glob pattern, matched against root-relative paths.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether symlinked directories are followed (default: true).
    #[must_use]
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = Some(follow);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the checker, compiling every rule pattern once.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is missing or not a directory, if an
    /// exclude pattern is invalid, or if `[severity]` names an unknown kind.
    pub fn build(self) -> Result<Checker, CheckerError> {
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };
        verify_root(&root)?;

        let config = self.config.unwrap_or_default();

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.checker.exclude.iter().cloned());
        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let severity_overrides = config.severity_overrides()?;
        let follow_symlinks = self
            .follow_symlinks
            .unwrap_or(config.checker.follow_symlinks);

        let compiler = PatternCompiler::new(&self.lists);
        let folder_rules = compile_rules(&compiler, &self.rules, RuleKind::Folder);
        let file_rules = compile_rules(&compiler, &self.rules, RuleKind::File);

        Ok(Checker {
            root,
            lists: self.lists,
            folder_rules,
            file_rules,
            exclude,
            follow_symlinks,
            severity_overrides,
        })
    }
}

fn verify_root(root: &Path) -> Result<(), CheckerError> {
    if !root.exists() {
        return Err(CheckerError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(CheckerError::RootNotDirectory {
            path: root.to_path_buf(),
        });
    }
    Ok(())
}

fn compile_rules(
    compiler: &PatternCompiler<'_>,
    rules: &RuleSet,
    kind: RuleKind,
) -> BTreeMap<usize, CompiledRule> {
    rules
        .iter(kind)
        .map(|(depth, rule)| {
            let matcher = if rule.has_pattern() {
                match compiler.compile(rule.pattern()) {
                    Ok(pattern) => RuleMatcher::Compiled(pattern),
                    Err(e) => {
                        warn!("{kind} rule at level {}: {e}", depth + 1);
                        RuleMatcher::Broken(e)
                    }
                }
            } else {
                RuleMatcher::Skip
            };
            (
                depth,
                CompiledRule {
                    rule: rule.clone(),
                    matcher,
                },
            )
        })
        .collect()
}

/// How a rule decides whether a name conforms.
#[derive(Debug)]
enum RuleMatcher {
    /// Empty pattern: names are not checked.
    Skip,
    Compiled(CompiledPattern),
    /// The pattern failed to compile and rejects every name.
    Broken(PatternError),
}

#[derive(Debug)]
struct CompiledRule {
    rule: NamingRule,
    matcher: RuleMatcher,
}

impl CompiledRule {
    /// `None` when the rule does not check names.
    fn matches(&self, name: &str) -> Option<bool> {
        match &self.matcher {
            RuleMatcher::Skip => None,
            RuleMatcher::Compiled(pattern) => Some(pattern.is_match(name)),
            RuleMatcher::Broken(_) => Some(false),
        }
    }

    fn describe(&self) -> String {
        let description = self.rule.description();
        if description.is_empty() {
            String::new()
        } else {
            format!(" ({description})")
        }
    }
}

/// Applies naming rules to a directory tree.
///
/// Use [`Checker::builder()`] to construct an instance. A checker is
/// immutable; every run starts from an empty report.
#[derive(Debug)]
pub struct Checker {
    root: PathBuf,
    lists: CustomLists,
    folder_rules: BTreeMap<usize, CompiledRule>,
    file_rules: BTreeMap<usize, CompiledRule>,
    exclude: Vec<glob::Pattern>,
    follow_symlinks: bool,
    severity_overrides: BTreeMap<ViolationKind, Severity>,
}

impl Checker {
    /// Creates a new builder for configuring a checker.
    #[must_use]
    pub fn builder() -> CheckerBuilder {
        CheckerBuilder::new()
    }

    /// Returns the root directory being checked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the custom lists.
    #[must_use]
    pub fn lists(&self) -> &CustomLists {
        &self.lists
    }

    /// Returns the number of rules of both kinds.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.folder_rules.len() + self.file_rules.len()
    }

    /// Walks the whole tree and returns every violation found.
    ///
    /// # Errors
    ///
    /// Returns an error only if the root no longer exists; problems inside
    /// the tree are reported as violations.
    pub fn run(&self) -> Result<CheckReport, CheckerError> {
        self.run_with_cancel(&AtomicBool::new(false))
    }

    /// Like [`Checker::run`], but stops early once `cancel` is set.
    ///
    /// The flag is checked before each directory is visited. A cancelled run
    /// returns the violations found so far with [`RunStatus::Cancelled`].
    ///
    /// # Errors
    ///
    /// Returns an error only if the root no longer exists.
    pub fn run_with_cancel(&self, cancel: &AtomicBool) -> Result<CheckReport, CheckerError> {
        verify_root(&self.root)?;
        info!("Starting check at {:?}", self.root);

        let mut walk = Walk {
            checker: self,
            cancel,
            report: CheckReport::new(),
            ancestors: Vec::new(),
        };
        walk.report_broken_rules();

        if let Ok(canonical) = fs::canonicalize(&self.root) {
            walk.ancestors.push(canonical);
        }
        if walk
            .visit(&self.root, 0, &ListValueContext::new())
            .is_break()
        {
            walk.report.status = RunStatus::Cancelled;
        }

        let report = walk.report;
        info!(
            "Check {}: {} violations in {} folders and {} files",
            if report.is_cancelled() { "cancelled" } else { "complete" },
            report.violations.len(),
            report.dirs_checked,
            report.files_checked
        );
        Ok(report)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

/// Entries of one directory, sorted by name.
#[derive(Default)]
struct Children {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

/// State of one run.
struct Walk<'a> {
    checker: &'a Checker,
    cancel: &'a AtomicBool,
    report: CheckReport,
    /// Canonical paths of the directories currently being visited.
    ancestors: Vec<PathBuf>,
}

impl Walk<'_> {
    fn push(&mut self, violation: Violation) {
        let violation = match self.checker.severity_overrides.get(&violation.kind) {
            Some(severity) => violation.with_severity(*severity),
            None => violation,
        };
        self.report.violations.push(violation);
    }

    fn report_broken_rules(&mut self) {
        let checker = self.checker;
        for (kind, rules) in [
            (RuleKind::Folder, &checker.folder_rules),
            (RuleKind::File, &checker.file_rules),
        ] {
            for (depth, rule) in rules {
                if let RuleMatcher::Broken(e) = &rule.matcher {
                    self.push(
                        Violation::new(
                            ViolationKind::PatternCompile,
                            &checker.root,
                            depth + 1,
                            format!("{kind} rule pattern cannot be compiled: {}", e.reason),
                        )
                        .with_expected_pattern(rule.rule.pattern()),
                    );
                }
            }
        }
    }

    fn visit(&mut self, dir: &Path, depth: usize, inherited: &ListValueContext) -> ControlFlow<()> {
        if self.cancel.load(Ordering::Relaxed) {
            return ControlFlow::Break(());
        }
        debug!("Visiting (depth {depth}): {}", dir.display());

        let children = match self.read_children(dir) {
            Ok(children) => children,
            Err(e) => {
                self.push(Violation::new(
                    ViolationKind::DirectoryAccess,
                    dir,
                    depth + 1,
                    format!("cannot read directory: {e}"),
                ));
                return ControlFlow::Continue(());
            }
        };
        self.report.dirs_checked += 1;

        let context = if depth == 0 {
            inherited.clone()
        } else {
            self.check_folder(dir, depth, inherited)
        };

        let checker = self.checker;
        let file_rule = checker.file_rules.get(&depth);
        for file in &children.files {
            self.report.files_checked += 1;
            if let Some(rule) = file_rule {
                self.check_file(file, depth, rule, &context);
            }
        }

        for sub in &children.dirs {
            if !self.checker.follow_symlinks {
                if self.visit(sub, depth + 1, &context).is_break() {
                    return ControlFlow::Break(());
                }
                continue;
            }
            let Ok(canonical) = fs::canonicalize(sub) else {
                // Let enumeration report the failure.
                if self.visit(sub, depth + 1, &context).is_break() {
                    return ControlFlow::Break(());
                }
                continue;
            };
            if self.ancestors.contains(&canonical) {
                self.push(Violation::new(
                    ViolationKind::DirectoryAccess,
                    sub,
                    depth + 2,
                    format!(
                        "symlink cycle: {} is already being checked",
                        canonical.display()
                    ),
                ));
                continue;
            }
            self.ancestors.push(canonical);
            let flow = self.visit(sub, depth + 1, &context);
            self.ancestors.pop();
            if flow.is_break() {
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    fn read_children(&self, dir: &Path) -> io::Result<Children> {
        let mut entries = fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by_key(fs::DirEntry::file_name);

        let mut children = Children::default();
        for entry in entries {
            let path = entry.path();
            if self.checker.is_excluded(&path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            let (is_dir, is_file) = if self.checker.follow_symlinks {
                match fs::metadata(&path) {
                    Ok(meta) => (meta.is_dir(), meta.is_file()),
                    Err(e) => {
                        debug!("Skipping {}: {e}", path.display());
                        continue;
                    }
                }
            } else {
                let file_type = entry.file_type()?;
                (file_type.is_dir(), file_type.is_file())
            };

            if is_dir {
                children.dirs.push(path);
            } else if is_file {
                children.files.push(path);
            } else {
                debug!("Skipping special entry: {}", path.display());
            }
        }
        Ok(children)
    }

    /// Checks a folder's own name and returns the context for its contents.
    fn check_folder(
        &mut self,
        dir: &Path,
        depth: usize,
        inherited: &ListValueContext,
    ) -> ListValueContext {
        let checker = self.checker;
        let Some(rule) = checker.folder_rules.get(&(depth - 1)) else {
            return inherited.clone();
        };
        let name = file_name(dir);

        match rule.matches(&name) {
            None => inherited.clone(),
            Some(false) => {
                self.push(
                    Violation::new(
                        ViolationKind::FolderNaming,
                        dir,
                        depth,
                        format!(
                            "folder name does not match the level {depth} folder rule{}",
                            rule.describe()
                        ),
                    )
                    .with_actual_name(name)
                    .with_expected_pattern(rule.rule.pattern()),
                );
                inherited.clone()
            }
            Some(true) => {
                let resolved = ListExtractor::new(&checker.lists).resolve(rule.rule.pattern(), &name);
                for mismatch in inherited.mismatches(&resolved, rule.rule.required_list_matches()) {
                    self.push(
                        Violation::new(
                            ViolationKind::ListMismatch,
                            dir,
                            depth,
                            format!(
                                "list `{}` value `{}` differs from `{}` set by a parent folder",
                                mismatch.list, mismatch.actual, mismatch.expected
                            ),
                        )
                        .with_actual_name(name.clone())
                        .with_expected_pattern(rule.rule.pattern())
                        .with_list_value(mismatch),
                    );
                }
                inherited.descend(&resolved)
            }
        }
    }

    fn check_file(
        &mut self,
        file: &Path,
        depth: usize,
        rule: &CompiledRule,
        context: &ListValueContext,
    ) {
        let level = depth + 1;
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match rule.matches(&stem) {
            None => {}
            Some(false) => {
                self.push(
                    Violation::new(
                        ViolationKind::FileNaming,
                        file,
                        level,
                        format!(
                            "file name does not match the level {level} file rule{}",
                            rule.describe()
                        ),
                    )
                    .with_actual_name(stem.clone())
                    .with_expected_pattern(rule.rule.pattern()),
                );
            }
            Some(true) => {
                let resolved =
                    ListExtractor::new(&self.checker.lists).resolve(rule.rule.pattern(), &stem);
                for mismatch in context.mismatches(&resolved, rule.rule.required_list_matches()) {
                    self.push(
                        Violation::new(
                            ViolationKind::ListMismatch,
                            file,
                            level,
                            format!(
                                "list `{}` value `{}` differs from `{}` set by the enclosing folders",
                                mismatch.list, mismatch.actual, mismatch.expected
                            ),
                        )
                        .with_actual_name(stem.clone())
                        .with_expected_pattern(rule.rule.pattern())
                        .with_list_value(mismatch),
                    );
                }
            }
        }

        let extension = file.extension().map(|e| e.to_string_lossy());
        if !rule.rule.allows_extension(extension.as_deref()) {
            let shown = extension.map_or_else(|| "none".to_string(), |e| format!(".{e}"));
            self.push(
                Violation::new(
                    ViolationKind::Extension,
                    file,
                    level,
                    format!("extension {shown} is not allowed"),
                )
                .with_actual_name(file_name(file))
                .with_expected_extensions(rule.rule.allowed_extensions().iter().cloned()),
            );
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
