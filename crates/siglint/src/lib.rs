//! Siglint - static validation for signal-processing DSL source.
//!
//! The engine checks source against a catalog of library function
//! signatures (unknown functions, wrong argument counts, self-referential
//! bindings, misused strings), runs a few heuristics (unguarded divisions,
//! oversized delays, missing imports) and requires the entry-point binding.
//! Separately it translates raw compiler errors into actionable guidance.
//!
//! Catalogs are built offline by `siglint-catalog` and injected here as
//! immutable, shared values; validation performs no I/O.

pub mod config;

mod checker;
mod error;
mod heuristics;
mod report;
mod source;
mod translator;

#[cfg(test)]
mod fixtures;

pub use checker::SyntaxChecker;
pub use error::SiglintError;
pub use report::ValidationResult;
pub use translator::{ERROR_MARKER, ErrorTranslator, TranslatedError};

pub use siglint_core::{
    error::{Diagnostic, ErrorCode, Severity},
    error_catalog::ErrorCatalog,
    signature::{FunctionSignature, LibraryCatalog},
    span::Span,
};

use std::{path::Path, sync::Arc};

use log::{debug, info};

use siglint_catalog::{artifact, curated_catalog};

use config::RulesConfig;
use source::Source;

/// Validator façade combining the checker, heuristics and translator.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use siglint::{LibraryCatalog, Validator, config::RulesConfig};
/// use siglint_catalog::curated_catalog;
///
/// let validator = Validator::new(
///     Arc::new(LibraryCatalog::empty()),
///     Arc::new(curated_catalog()),
///     RulesConfig::default(),
/// );
///
/// let result = validator.validate("process = _;");
/// assert!(result.is_valid());
///
/// let result = validator.validate("gain = 0.5;");
/// assert!(!result.is_valid());
/// println!("{}", validator.format_for_llm(&result));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    checker: SyntaxChecker,
    translator: ErrorTranslator,
}

impl Validator {
    /// Create a validator over already-loaded catalogs.
    pub fn new(library: Arc<LibraryCatalog>, errors: Arc<ErrorCatalog>, rules: RulesConfig) -> Self {
        Self {
            checker: SyntaxChecker::new(library, rules),
            translator: ErrorTranslator::new(errors),
        }
    }

    /// Load catalog artifacts and create a validator. Without an error
    /// catalog path the curated table is used.
    ///
    /// # Errors
    ///
    /// Returns [`SiglintError::Catalog`] if an artifact cannot be read or has
    /// an unsupported version, and [`SiglintError::InvalidRule`] if `rules`
    /// are unusable.
    pub fn from_artifacts(
        library: impl AsRef<Path>,
        errors: Option<&Path>,
        rules: RulesConfig,
    ) -> Result<Self, SiglintError> {
        rules.validate()?;
        let library_path = library.as_ref();
        let library = artifact::read_catalog(library_path)?;
        let errors = match errors {
            Some(path) => artifact::read_error_catalog(path)?,
            None => curated_catalog(),
        };
        info!(
            catalog = library_path.display().to_string(),
            functions = library.functions().len(),
            patterns = errors.len();
            "Validator loaded"
        );
        Ok(Self::new(Arc::new(library), Arc::new(errors), rules))
    }

    pub fn checker(&self) -> &SyntaxChecker {
        &self.checker
    }

    pub fn translator(&self) -> &ErrorTranslator {
        &self.translator
    }

    /// Validate `source`.
    ///
    /// Heuristic findings follow the checker's diagnostics before everything
    /// is bucketed by severity. The result is valid exactly when no errors
    /// were found.
    pub fn validate(&self, source: &str) -> ValidationResult {
        let rules = self.checker.rules();
        let parsed = Source::parse(source);

        let mut collector = self.checker.check_source(&parsed);
        collector.extend(heuristics::oversized_delays(&parsed, rules));
        collector.extend(heuristics::missing_import(&parsed, self.checker.catalog(), rules));
        collector.extend(heuristics::missing_entry_point(&parsed, rules));
        let (errors, warnings) = collector.partition();

        let suggestions = heuristics::unsafe_divisions(&parsed, rules);

        let result = ValidationResult::new(errors, warnings, suggestions);
        debug!(
            valid = result.is_valid(),
            errors = result.errors().len(),
            warnings = result.warnings().len(),
            suggestions = result.suggestions().len();
            "Source validated"
        );
        result
    }

    /// Translate one compiler error.
    pub fn translate(&self, raw: &str) -> TranslatedError {
        self.translator.translate(raw)
    }

    /// Translate every error report in compiler output.
    pub fn translate_all(&self, text: &str) -> Vec<TranslatedError> {
        self.translator.translate_all(text)
    }

    /// Render `result` as deterministic plain text for an automated caller,
    /// including corrected examples from the error catalog.
    pub fn format_for_llm(&self, result: &ValidationResult) -> String {
        report::format_for_llm(result, self.translator.catalog())
    }
}
