//! List values inherited down the directory tree.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::ListValueMismatch;

/// List values resolved from a single name: list name to item.
pub type ResolvedValues = BTreeMap<String, String>;

/// The list values a node inherits from its ancestors.
///
/// Each directory hands its children a fresh copy built by
/// [`ListValueContext::descend`], so values resolved in one subtree are
/// never visible to siblings or ancestors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListValueContext {
    values: BTreeMap<String, String>,
}

impl ListValueContext {
    /// Creates an empty context (the root's).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the inherited value for a list.
    #[must_use]
    pub fn get(&self, list: &str) -> Option<&str> {
        self.values.get(list).map(String::as_str)
    }

    /// Returns true if no values are inherited.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of inherited values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over `(list, value)` pairs in list-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a copy overlaid with `resolved`; resolved values win.
    #[must_use]
    pub fn descend(&self, resolved: &ResolvedValues) -> Self {
        let mut values = self.values.clone();
        values.extend(resolved.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { values }
    }

    /// Compares `resolved` against this context for every list in `required`.
    ///
    /// A list is only compared when it is present on both sides.
    #[must_use]
    pub fn mismatches(
        &self,
        resolved: &ResolvedValues,
        required: &BTreeSet<String>,
    ) -> Vec<ListValueMismatch> {
        required
            .iter()
            .filter_map(|list| {
                let expected = self.values.get(list)?;
                let actual = resolved.get(list)?;
                (expected != actual).then(|| ListValueMismatch {
                    list: list.clone(),
                    expected: expected.clone(),
                    actual: actual.clone(),
                })
            })
            .collect()
    }
}

impl FromIterator<(String, String)> for ListValueContext {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
