//! Pure domain model for naming rules and custom lists.
//!
//! This module contains no serde and no I/O dependencies.
//! Invariants are enforced at construction time.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ────────────────────────────────────────────
// Custom lists
// ────────────────────────────────────────────

/// Named lists of allowed values, referenced from patterns as `[name]`.
///
/// Items keep their insertion order; matching uses
/// [`CustomLists::items_longest_first`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomLists {
    lists: BTreeMap<String, Vec<String>>,
}

impl CustomLists {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a list, returning the previous items.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains brackets, or if an
    /// item is empty or repeated.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        items: Vec<String>,
    ) -> Result<Option<Vec<String>>, ModelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ModelError::EmptyListName);
        }
        if name.contains('[') || name.contains(']') {
            return Err(ModelError::InvalidListName { name });
        }
        let mut seen = BTreeSet::new();
        for item in &items {
            if item.is_empty() {
                return Err(ModelError::EmptyListItem { list: name });
            }
            if !seen.insert(item.as_str()) {
                return Err(ModelError::DuplicateListItem {
                    list: name,
                    item: item.clone(),
                });
            }
        }
        Ok(self.lists.insert(name, items))
    }

    /// Removes a list.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.lists.remove(name)
    }

    /// Returns a list's items in insertion order.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    /// Returns true if a list with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    /// Returns a list's items ordered by descending length (in characters).
    ///
    /// Items of equal length keep their insertion order.
    #[must_use]
    pub fn items_longest_first(&self, name: &str) -> Option<Vec<&str>> {
        let mut items: Vec<&str> = self.lists.get(name)?.iter().map(String::as_str).collect();
        items.sort_by_key(|item| Reverse(item.chars().count()));
        Some(items)
    }

    /// Iterates over list names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    /// Iterates over `(name, items)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.lists.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the number of lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns true if no lists are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

// ────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────

/// Whether a rule governs folder names or file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    /// Folder rule: depth key is the folder's own depth minus one.
    Folder,
    /// File rule: depth key is the containing directory's depth.
    File,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::File => write!(f, "file"),
        }
    }
}

/// Normalises an extension to lowercase with a leading dot.
///
/// Returns `None` for blank input.
#[must_use]
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    if ext.is_empty() || ext == "." {
        return None;
    }
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        Some(lower)
    } else {
        Some(format!(".{lower}"))
    }
}

/// A naming rule for one level of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingRule {
    pattern: String,
    description: String,
    required_list_matches: BTreeSet<String>,
    allowed_extensions: BTreeSet<String>,
}

impl NamingRule {
    /// Creates a rule with the given pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the lists whose values must agree with the inherited ones.
    #[must_use]
    pub fn with_required_lists<I, S>(mut self, lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_list_matches = lists.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the allowed extensions (file rules only); blank entries are dropped.
    #[must_use]
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = extensions
            .into_iter()
            .filter_map(|e| normalize_extension(e.as_ref()))
            .collect();
        self
    }

    /// Returns the pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns true if the pattern is non-empty.
    #[must_use]
    pub fn has_pattern(&self) -> bool {
        !self.pattern.is_empty()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lists that must agree with inherited values.
    #[must_use]
    pub fn required_list_matches(&self) -> &BTreeSet<String> {
        &self.required_list_matches
    }

    /// Returns the allowed extensions, lowercase with a leading dot.
    #[must_use]
    pub fn allowed_extensions(&self) -> &BTreeSet<String> {
        &self.allowed_extensions
    }

    /// Tests a file extension (without the dot) against the allowed set.
    ///
    /// An empty allowed set accepts everything.
    #[must_use]
    pub fn allows_extension(&self, extension: Option<&str>) -> bool {
        if self.allowed_extensions.is_empty() {
            return true;
        }
        extension
            .and_then(normalize_extension)
            .is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }
}

/// Folder and file rules keyed by canonical depth.
///
/// At most one rule per depth per kind. Gaps are allowed: a depth without a
/// rule is simply not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    folder: BTreeMap<usize, NamingRule>,
    file: BTreeMap<usize, NamingRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: RuleKind) -> &BTreeMap<usize, NamingRule> {
        match kind {
            RuleKind::Folder => &self.folder,
            RuleKind::File => &self.file,
        }
    }

    fn map_mut(&mut self, kind: RuleKind) -> &mut BTreeMap<usize, NamingRule> {
        match kind {
            RuleKind::Folder => &mut self.folder,
            RuleKind::File => &mut self.file,
        }
    }

    /// Stores a rule, replacing any rule already at that depth.
    pub fn put(&mut self, kind: RuleKind, depth: usize, rule: NamingRule) -> Option<NamingRule> {
        self.map_mut(kind).insert(depth, rule)
    }

    /// Builder form of [`RuleSet::put`].
    #[must_use]
    pub fn with(mut self, kind: RuleKind, depth: usize, rule: NamingRule) -> Self {
        self.put(kind, depth, rule);
        self
    }

    /// Removes the rule at a depth.
    pub fn remove(&mut self, kind: RuleKind, depth: usize) -> Option<NamingRule> {
        self.map_mut(kind).remove(&depth)
    }

    /// Returns the rule at a depth.
    #[must_use]
    pub fn get(&self, kind: RuleKind, depth: usize) -> Option<&NamingRule> {
        self.map(kind).get(&depth)
    }

    /// Iterates over `(depth, rule)` pairs of one kind in depth order.
    pub fn iter(&self, kind: RuleKind) -> impl Iterator<Item = (usize, &NamingRule)> {
        self.map(kind).iter().map(|(d, r)| (*d, r))
    }

    /// Returns the total number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.folder.len() + self.file.len()
    }

    /// Returns true if no rules are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folder.is_empty() && self.file.is_empty()
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated lists and rules, ready for a check run.
///
/// Every list a rule requires to match is verified to exist.
#[derive(Debug, Clone, Default)]
pub struct NamingScheme {
    lists: CustomLists,
    rules: RuleSet,
}

impl NamingScheme {
    /// Creates a scheme with full cross-reference validation.
    ///
    /// # Errors
    ///
    /// Returns every rule that requires a list which is not defined.
    pub fn new(lists: CustomLists, rules: RuleSet) -> Result<Self, Vec<ModelError>> {
        let mut errors = Vec::new();
        for kind in [RuleKind::Folder, RuleKind::File] {
            for (depth, rule) in rules.iter(kind) {
                for list in rule.required_list_matches() {
                    if !lists.contains(list) {
                        errors.push(ModelError::UnknownList {
                            context: format!("{kind} rule at level {}", depth + 1),
                            name: list.clone(),
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(Self { lists, rules })
        } else {
            Err(errors)
        }
    }

    /// Creates a scheme with no lists and no rules.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the custom lists.
    #[must_use]
    pub fn lists(&self) -> &CustomLists {
        &self.lists
    }

    /// Returns the rules.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Splits the scheme into its lists and rules.
    #[must_use]
    pub fn into_parts(self) -> (CustomLists, RuleSet) {
        (self.lists, self.rules)
    }
}

// ────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────

/// Errors in domain model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// List name is empty.
    #[error("list name must not be empty")]
    EmptyListName,

    /// List name would not be usable as a `[name]` token.
    #[error("invalid list name `{name}`: must not contain `[` or `]`")]
    InvalidListName {
        /// The invalid name.
        name: String,
    },

    /// A list item is empty.
    #[error("list `{list}` contains an empty item")]
    EmptyListItem {
        /// The list holding the item.
        list: String,
    },

    /// A list item appears twice.
    #[error("list `{list}` contains `{item}` more than once")]
    DuplicateListItem {
        /// The list holding the item.
        list: String,
        /// The repeated item.
        item: String,
    },

    /// A rule requires a list that is not defined.
    #[error("{context}: unknown list `{name}`")]
    UnknownList {
        /// Where the reference was found.
        context: String,
        /// The undefined list name.
        name: String,
    },
}

// ────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────
