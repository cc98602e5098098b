//! Resolution of custom-list values present in a name.
//!
//! This is a plain substring scan over the whole name, independent of the
//! anchored pattern match: for every list the pattern references, the
//! longest item that occurs anywhere in the name is taken as that list's
//! value. It can therefore pick a different item than the span the compiled
//! matcher consumed when a name contains several items.

use crate::context::ResolvedValues;
use crate::pattern::token_regex;
use crate::rules::model::CustomLists;

/// Resolves list values from names.
#[derive(Debug, Clone, Copy)]
pub struct ListExtractor<'a> {
    lists: &'a CustomLists,
}

impl<'a> ListExtractor<'a> {
    /// Creates an extractor over `lists`.
    #[must_use]
    pub fn new(lists: &'a CustomLists) -> Self {
        Self { lists }
    }

    /// Returns the names of known lists referenced by `pattern`, in order of
    /// first appearance.
    #[must_use]
    pub fn referenced_lists<'p>(&self, pattern: &'p str) -> Vec<&'p str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in token_regex().captures_iter(pattern) {
            if let Some(m) = caps.get(1) {
                let name = m.as_str();
                if self.lists.contains(name) && !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Resolves, for every list `pattern` references, which item occurs in
    /// `name`.
    ///
    /// Lists with no item in the name are absent from the result.
    #[must_use]
    pub fn resolve(&self, pattern: &str, name: &str) -> ResolvedValues {
        let mut values = ResolvedValues::new();
        for list in self.referenced_lists(pattern) {
            let Some(items) = self.lists.items_longest_first(list) else {
                continue;
            };
            if let Some(item) = items.into_iter().find(|item| name.contains(item)) {
                values.insert(list.to_string(), item.to_string());
            }
        }
        values
    }
}
