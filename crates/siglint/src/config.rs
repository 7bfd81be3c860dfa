//! Configuration types for siglint validation.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial TOML file only overrides what it names.
//!
//! # Example
//!
//! ```
//! # use siglint::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.rules().entry_point(), "process");
//! assert_eq!(config.rules().max_suggestions(), 5);
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::SiglintError;

/// Top-level configuration: artifact locations and rule settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    catalog: CatalogConfig,

    #[serde(default)]
    rules: RulesConfig,
}

impl AppConfig {
    pub fn new(catalog: CatalogConfig, rules: RulesConfig) -> Self {
        Self { catalog, rules }
    }

    /// Returns the catalog locations.
    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    /// Returns the rule settings.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }
}

/// Where persisted catalog artifacts live.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// Function-signature catalog artifact.
    #[serde(default)]
    path: Option<PathBuf>,

    /// Error-pattern catalog artifact; the curated table is used when unset.
    #[serde(default)]
    error_path: Option<PathBuf>,
}

impl CatalogConfig {
    pub fn new(path: Option<PathBuf>, error_path: Option<PathBuf>) -> Self {
        Self { path, error_path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn error_path(&self) -> Option<&Path> {
        self.error_path.as_deref()
    }
}

/// Settings for the checker and heuristic rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Name of the mandatory top-level output binding.
    entry_point: String,
    /// Inline delay lengths above this many samples are reported.
    max_delay: u64,
    /// Maximum alternatives offered for an unknown function.
    max_suggestions: usize,
    /// Unknown prefixes up to this length are reported as likely typos.
    unknown_prefix_max_len: usize,
    /// Calls that count as guarding a division on the same line.
    guard_functions: Vec<String>,
    /// Words that mark a library import.
    import_directives: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            entry_point: "process".to_string(),
            max_delay: 192_000,
            max_suggestions: 5,
            unknown_prefix_max_len: 3,
            guard_functions: ["max", "min", "clamp", "ma.EPSILON", "ba.if", "select2"]
                .map(String::from)
                .to_vec(),
            import_directives: ["import", "library"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl RulesConfig {
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn max_delay(&self) -> u64 {
        self.max_delay
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    pub fn unknown_prefix_max_len(&self) -> usize {
        self.unknown_prefix_max_len
    }

    pub fn guard_functions(&self) -> &[String] {
        &self.guard_functions
    }

    pub fn import_directives(&self) -> &[String] {
        &self.import_directives
    }

    /// Set the entry-point binding name.
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    /// Set the oversized-delay threshold, in samples.
    pub fn with_max_delay(mut self, max_delay: u64) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    /// Check that the settings can drive a validator.
    ///
    /// # Errors
    ///
    /// Returns [`SiglintError::InvalidRule`] if the entry point is not an
    /// identifier or an import directive is empty.
    pub fn validate(&self) -> Result<(), SiglintError> {
        let entry = self.entry_point.as_str();
        if crate::source::identifier_len(entry) != entry.len() || entry.is_empty() {
            return Err(SiglintError::InvalidRule {
                field: "entry_point",
                reason: format!("`{entry}` is not an identifier"),
            });
        }
        if self.import_directives.iter().any(|directive| directive.trim().is_empty()) {
            return Err(SiglintError::InvalidRule {
                field: "import_directives",
                reason: "directives must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
