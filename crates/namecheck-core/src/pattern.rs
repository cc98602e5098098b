//! Compilation of human-authored naming patterns into anchored matchers.
//!
//! A pattern mixes raw regular-expression syntax with bracketed tokens:
//!
//! - predefined placeholders such as `[日期8位]` (see [`Placeholder`]),
//! - custom-list placeholders `[list name]`, expanded to an alternation of
//!   the list's items, longest first,
//! - anything else in brackets (e.g. `[0-9]`) is left verbatim.
//!
//! The compiled matcher accepts a name only if the whole name matches.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::rules::model::CustomLists;

/// Matches one bracketed token and captures its content.
pub(crate) fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]").expect("valid regex"))
}

/// A fixed placeholder recognised in every pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `[年份4位]`: a 4-digit year.
    Year4,
    /// `[数字]`: one or more digits.
    Digits,
    /// `[日期8位]`: an 8-digit date such as `20230101`.
    Date8,
    /// `[任意字符]`: any characters, possibly none.
    AnyChars,
    /// `[字母]`: one or more ASCII letters.
    Letters,
    /// `[汉字]`: one or more CJK unified ideographs.
    Hanzi,
}

impl Placeholder {
    /// Every placeholder, in display order.
    pub const ALL: [Self; 6] = [
        Self::Year4,
        Self::Digits,
        Self::Date8,
        Self::AnyChars,
        Self::Letters,
        Self::Hanzi,
    ];

    /// Returns the token content between the brackets.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Year4 => "年份4位",
            Self::Digits => "数字",
            Self::Date8 => "日期8位",
            Self::AnyChars => "任意字符",
            Self::Letters => "字母",
            Self::Hanzi => "汉字",
        }
    }

    /// Returns the regular sub-expression the token expands to.
    #[must_use]
    pub fn expansion(self) -> &'static str {
        match self {
            Self::Year4 => r"(?:\d{4})",
            Self::Digits => r"(?:\d+)",
            Self::Date8 => r"(?:\d{8})",
            Self::AnyChars => r"(?:.*)",
            Self::Letters => r"(?:[a-zA-Z]+)",
            Self::Hanzi => r"(?:[\x{4e00}-\x{9fff}]+)",
        }
    }

    /// Returns the bracketed token as written in patterns.
    #[must_use]
    pub fn token(self) -> String {
        format!("[{}]", self.name())
    }

    /// Returns a short English description.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Year4 => "4-digit year",
            Self::Digits => "one or more digits",
            Self::Date8 => "8-digit date",
            Self::AnyChars => "any characters (possibly none)",
            Self::Letters => "one or more ASCII letters",
            Self::Hanzi => "one or more Chinese characters",
        }
    }

    /// Looks a placeholder up by its token content.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Error compiling a naming pattern.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid pattern `{pattern}`: {reason}")]
pub struct PatternError {
    /// The pattern as written in the rule.
    pub pattern: String,
    /// Why the expanded expression was rejected.
    pub reason: String,
}

/// A pattern compiled into an anchored matcher.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    /// Returns true if the whole `name` matches.
    #[must_use]
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Returns the pattern as written in the rule.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the anchored regular expression actually used.
    #[must_use]
    pub fn expanded(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compiles patterns against a fixed set of custom lists.
#[derive(Debug, Clone, Copy)]
pub struct PatternCompiler<'a> {
    lists: &'a CustomLists,
}

impl<'a> PatternCompiler<'a> {
    /// Creates a compiler that resolves list placeholders in `lists`.
    #[must_use]
    pub fn new(lists: &'a CustomLists) -> Self {
        Self { lists }
    }

    /// Substitutes placeholders without compiling.
    ///
    /// Predefined placeholders are replaced textually first, so they are
    /// expanded even right after an escaped bracket (`\[[数字]\]`) and take
    /// precedence over a list of the same name. List tokens are expanded in
    /// what remains.
    #[must_use]
    pub fn expand(&self, pattern: &str) -> String {
        let substituted = Placeholder::ALL
            .into_iter()
            .fold(pattern.to_string(), |acc, p| acc.replace(&p.token(), p.expansion()));
        token_regex()
            .replace_all(&substituted, |caps: &Captures<'_>| {
                match self.lists.items_longest_first(&caps[1]) {
                    Some(items) => alternation(&items),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Compiles `pattern` into a matcher anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the expanded expression is not a valid regex.
    pub fn compile(&self, pattern: &str) -> Result<CompiledPattern, PatternError> {
        let anchored = format!("^(?:{})$", self.expand(pattern));
        let regex = Regex::new(&anchored).map_err(|e| PatternError {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(CompiledPattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// Returns the bracketed tokens of `pattern` that are neither
    /// placeholders nor known lists.
    #[must_use]
    pub fn unknown_tokens(&self, pattern: &str) -> Vec<String> {
        let stripped = Placeholder::ALL
            .into_iter()
            .fold(pattern.to_string(), |acc, p| acc.replace(&p.token(), ""));
        token_regex()
            .captures_iter(&stripped)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|name| !self.lists.contains(name))
            .map(str::to_string)
            .collect()
    }
}

/// Builds a non-capturing alternation of literally-escaped items.
fn alternation(items: &[&str]) -> String {
    let escaped: Vec<String> = items.iter().map(|item| regex::escape(item)).collect();
    format!("(?:{})", escaped.join("|"))
}
