//! Text-matching rules for error patterns.
//!
//! A [`MatchRule`] is written as a compact, regex-like string:
//!
//! - `|` separates alternatives; the rule matches if any alternative does.
//! - `.*` inside an alternative separates literal fragments that must
//!   appear in the text in the given order, with anything in between.
//! - Matching ignores ASCII case and collapses runs of whitespace.
//!
//! ```
//! # use siglint_core::match_rule::MatchRule;
//! let rule = MatchRule::new("sequential composition.*number of outputs|A:B");
//! assert!(rule.is_match("ERROR : sequential composition A:B\nThe number of outputs (2) of A"));
//! assert!(!rule.is_match("undefined symbol : foo"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A compiled match rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MatchRule {
    source: String,
    alternatives: Vec<Vec<String>>,
}

impl MatchRule {
    /// Compile a rule from its textual form.
    pub fn new(pattern: impl Into<String>) -> Self {
        let source = pattern.into();
        let alternatives = source
            .split('|')
            .map(|alternative| {
                alternative
                    .split(".*")
                    .map(normalize)
                    .filter(|fragment| !fragment.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|fragments| !fragments.is_empty())
            .collect();
        Self {
            source,
            alternatives,
        }
    }

    /// The rule as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `text` satisfies any alternative of this rule.
    ///
    /// A rule with no fragments never matches.
    pub fn is_match(&self, text: &str) -> bool {
        let text = normalize(text);
        self.alternatives
            .iter()
            .any(|fragments| matches_in_order(&text, fragments))
    }
}

fn matches_in_order(text: &str, fragments: &[String]) -> bool {
    let mut rest = text;
    for fragment in fragments {
        match rest.find(fragment.as_str()) {
            Some(index) => rest = &rest[index + fragment.len()..],
            None => return false,
        }
    }
    true
}

/// Lowercase and collapse whitespace runs to a single space.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<String> for MatchRule {
    fn from(pattern: String) -> Self {
        Self::new(pattern)
    }
}

impl From<&str> for MatchRule {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<MatchRule> for String {
    fn from(rule: MatchRule) -> Self {
        rule.source
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
