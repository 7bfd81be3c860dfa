//! Curated compiler error patterns.
//!
//! An [`ErrorCatalog`] is an **ordered** list of [`ErrorPattern`]s keyed by
//! id. Patterns are expected to overlap (an arity error in a sequential
//! composition also mentions "outputs" and "inputs"), so the contract is
//! that [`ErrorCatalog::first_match`] tests entries in declaration order and
//! the first matching entry wins. Specific patterns must therefore be
//! declared before general ones.

use indexmap::IndexMap;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::{CoreError, match_rule::MatchRule};

/// Version written to and expected from error catalog artifacts.
pub const ERROR_CATALOG_VERSION: &str = "1.0";

/// One known class of compiler failure with actionable guidance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPattern {
    /// Stored as the map key in artifacts.
    #[serde(skip)]
    id: String,
    pattern: MatchRule,
    message: String,
    cause: String,
    fix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    example_bad: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    example_good: Option<String>,
}

impl ErrorPattern {
    pub fn new(
        id: impl Into<String>,
        pattern: impl Into<MatchRule>,
        message: impl Into<String>,
        cause: impl Into<String>,
        fix: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            message: message.into(),
            cause: cause.into(),
            fix: fix.into(),
            example_bad: None,
            example_good: None,
        }
    }

    /// Attach a minimal before/after code pair.
    pub fn with_examples(mut self, bad: impl Into<String>, good: impl Into<String>) -> Self {
        self.example_bad = Some(bad.into());
        self.example_good = Some(good.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &MatchRule {
        &self.pattern
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }

    pub fn fix(&self) -> &str {
        &self.fix
    }

    pub fn example_bad(&self) -> Option<&str> {
        self.example_bad.as_deref()
    }

    pub fn example_good(&self) -> Option<&str> {
        self.example_good.as_deref()
    }

    /// Whether this pattern's rule matches `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// A literal error string found in compiler sources, without guidance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawError {
    raw: String,
    source: String,
}

impl RawError {
    pub fn new(raw: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            source: source.into(),
        }
    }

    /// The literal error text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Where it was found, as `file:line`.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Ordered catalog of error patterns plus advisory raw errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorCatalog {
    version: String,
    source: String,
    errors: IndexMap<String, ErrorPattern>,
    #[serde(default)]
    raw_errors: Vec<RawError>,
}

impl ErrorCatalog {
    /// Build a catalog from patterns in their matching order.
    ///
    /// A later pattern with an id already present replaces the earlier one
    /// in place, keeping the earlier position.
    pub fn new(source: impl Into<String>, patterns: impl IntoIterator<Item = ErrorPattern>) -> Self {
        let errors = patterns
            .into_iter()
            .map(|pattern| (pattern.id.clone(), pattern))
            .collect();
        Self {
            version: ERROR_CATALOG_VERSION.to_string(),
            source: source.into(),
            errors,
            raw_errors: Vec::new(),
        }
    }

    /// Attach raw errors extracted from compiler sources.
    pub fn with_raw_errors(mut self, raw_errors: Vec<RawError>) -> Self {
        self.raw_errors = raw_errors;
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Patterns in matching order.
    pub fn patterns(&self) -> impl Iterator<Item = &ErrorPattern> {
        self.errors.values()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ErrorPattern> {
        self.errors.get(id)
    }

    pub fn raw_errors(&self) -> &[RawError] {
        &self.raw_errors
    }

    /// The first pattern, in declaration order, whose rule matches `text`.
    pub fn first_match(&self, text: &str) -> Option<&ErrorPattern> {
        let found = self.errors.values().find(|pattern| pattern.matches(text));
        trace!(matched:? = found.map(ErrorPattern::id); "Error pattern lookup");
        found
    }

    /// Serialize to the pretty-printed JSON artifact.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load an error catalog artifact, checking its version.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let mut catalog: Self = serde_json::from_str(json)?;
        if catalog.version != ERROR_CATALOG_VERSION {
            return Err(CoreError::UnsupportedVersion {
                artifact: "error catalog",
                found: catalog.version,
                expected: ERROR_CATALOG_VERSION,
            });
        }
        for (id, pattern) in catalog.errors.iter_mut() {
            pattern.id.clone_from(id);
        }
        Ok(catalog)
    }
}
