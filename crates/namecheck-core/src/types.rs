//! Core types for naming violations and check reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Severity level for naming violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// Parses a lowercase severity name (`error`, `warning`, `info`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The kind of non-conformance a [`Violation`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// A folder name does not match the folder rule for its level.
    FolderNaming,
    /// A file stem does not match the file rule for its level.
    FileNaming,
    /// A list value resolved from a name differs from the inherited one.
    ListMismatch,
    /// A file extension is not in the rule's allowed set.
    Extension,
    /// A directory could not be enumerated; its subtree was skipped.
    DirectoryAccess,
    /// A rule pattern could not be compiled.
    PatternCompile,
}

impl ViolationKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 6] = [
        Self::FolderNaming,
        Self::FileNaming,
        Self::ListMismatch,
        Self::Extension,
        Self::DirectoryAccess,
        Self::PatternCompile,
    ];

    /// Returns the stable code (e.g., "NC001").
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::FolderNaming => "NC001",
            Self::FileNaming => "NC002",
            Self::ListMismatch => "NC003",
            Self::Extension => "NC004",
            Self::DirectoryAccess => "NC005",
            Self::PatternCompile => "NC006",
        }
    }

    /// Returns the kebab-case name (e.g., "folder-naming").
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FolderNaming => "folder-naming",
            Self::FileNaming => "file-naming",
            Self::ListMismatch => "list-mismatch",
            Self::Extension => "extension",
            Self::DirectoryAccess => "directory-access",
            Self::PatternCompile => "pattern-compile",
        }
    }

    /// Looks a kind up by its kebab-case name or its code.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name || k.code() == name)
    }

    /// Returns the severity used when no override is configured.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::DirectoryAccess => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The inherited and resolved values behind a list-mismatch violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListValueMismatch {
    /// Name of the custom list.
    pub list: String,
    /// Value inherited from the enclosing folders.
    pub expected: String,
    /// Value resolved from this node's own name.
    pub actual: String,
}

/// A naming violation found during a check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// What went wrong.
    pub kind: ViolationKind,
    /// Stable code of the kind (e.g., "NC001").
    pub code: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Path of the offending folder or file.
    pub path: PathBuf,
    /// User-facing level (1-based).
    pub depth: usize,
    /// Human-readable message.
    pub message: String,
    /// Pattern the name was expected to match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_pattern: Option<String>,
    /// The name that was tested (a file's stem for file rules).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_name: Option<String>,
    /// Extensions the rule allows.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_extensions: Vec<String>,
    /// List values that disagreed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_value: Option<ListValueMismatch>,
}

impl Violation {
    /// Creates a new violation with the kind's default severity.
    #[must_use]
    pub fn new(
        kind: ViolationKind,
        path: impl Into<PathBuf>,
        depth: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: kind.code().to_string(),
            severity: kind.default_severity(),
            path: path.into(),
            depth,
            message: message.into(),
            expected_pattern: None,
            actual_name: None,
            expected_extensions: Vec::new(),
            list_value: None,
        }
    }

    /// Sets the pattern the name was expected to match.
    #[must_use]
    pub fn with_expected_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.expected_pattern = Some(pattern.into());
        self
    }

    /// Sets the name that was tested.
    #[must_use]
    pub fn with_actual_name(mut self, name: impl Into<String>) -> Self {
        self.actual_name = Some(name.into());
        self
    }

    /// Sets the allowed extensions.
    #[must_use]
    pub fn with_expected_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the disagreeing list values.
    #[must_use]
    pub fn with_list_value(mut self, mismatch: ListValueMismatch) -> Self {
        self.list_value = Some(mismatch);
        self
    }

    /// Overrides the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Formats the violation as a multi-line report entry.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "[{}] {} {} (level {})\n",
            self.kind, self.code, self.severity, self.depth
        );
        let _ = writeln!(output, "   path: {}", self.path.display());
        let _ = writeln!(output, "   problem: {}", self.message);
        if let Some(name) = &self.actual_name {
            let _ = writeln!(output, "   actual name: {name}");
        }
        if let Some(pattern) = &self.expected_pattern {
            let _ = writeln!(output, "   expected pattern: {pattern}");
        }
        if !self.expected_extensions.is_empty() {
            let _ = writeln!(
                output,
                "   expected extensions: {}",
                self.expected_extensions.join(", ")
            );
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.path.display(),
            self.severity,
            self.code,
            self.message
        )
    }
}

/// How a check run ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// The whole tree was walked.
    #[default]
    Completed,
    /// The walk was stopped early; the report is partial.
    Cancelled,
}

/// Result of one check run, in the order violations were found.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckReport {
    /// Whether the walk ran to completion.
    pub status: RunStatus,
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of directories enumerated.
    pub dirs_checked: usize,
    /// Number of files checked.
    pub files_checked: usize,
}

impl CheckReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing was reported.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if the walk was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == RunStatus::Cancelled
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Returns violations of one kind.
    #[must_use]
    pub fn by_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }

    /// Counts violations per kind.
    #[must_use]
    pub fn count_by_kind(&self) -> BTreeMap<ViolationKind, usize> {
        let mut counts = BTreeMap::new();
        for v in &self.violations {
            *counts.entry(v.kind).or_insert(0) += 1;
        }
        counts
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations.iter().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats the one-line summary.
    #[must_use]
    pub fn format_summary(&self) -> String {
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "Found {} error(s), {} warning(s), {} info(s) in {} folder(s) and {} file(s)",
            errors, warnings, infos, self.dirs_checked, self.files_checked
        )
    }

    /// Formats the whole report as numbered, human-readable text.
    #[must_use]
    pub fn format_text(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        if self.violations.is_empty() {
            report.push_str("All folders and files conform to the naming rules.\n");
        } else {
            let _ = writeln!(
                report,
                "Found {} problem(s) to fix:\n",
                self.violations.len()
            );
            for (i, v) in self.violations.iter().enumerate() {
                let _ = writeln!(report, "{}. {}", i + 1, v.format());
            }
        }
        if self.is_cancelled() {
            report.push_str("Check was cancelled; this report is partial.\n");
        }
        let _ = writeln!(report, "{}", self.format_summary());
        report
    }
}
