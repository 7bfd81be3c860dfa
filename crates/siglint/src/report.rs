//! Validation results and their plain-text rendering.

use std::fmt::Write as _;

use serde::Serialize;

use siglint_core::{error::Diagnostic, error_catalog::ErrorCatalog};

use crate::SiglintError;

/// Outcome of validating one source text.
///
/// `valid` is derived from `errors` at construction and cannot disagree
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    valid: bool,
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
    suggestions: Vec<String>,
}

impl ValidationResult {
    pub fn new(errors: Vec<Diagnostic>, warnings: Vec<Diagnostic>, suggestions: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            suggestions,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Advisory notes, such as unguarded divisions. Never affect validity.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SiglintError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Render `result` as a deterministic report for an automated caller.
///
/// Errors come first, each with its line, message, suggestion and, when the
/// error catalog has one for its code, a corrected example. Warnings and
/// suggestions follow.
pub(crate) fn format_for_llm(result: &ValidationResult, catalog: &ErrorCatalog) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report(&mut out, result, catalog);
    out
}

fn write_report(out: &mut String, result: &ValidationResult, catalog: &ErrorCatalog) -> std::fmt::Result {
    writeln!(
        out,
        "VALIDATION {}: {} error(s), {} warning(s)",
        if result.valid { "PASSED" } else { "FAILED" },
        result.errors.len(),
        result.warnings.len()
    )?;

    for (index, error) in result.errors.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "ERROR {} ({}): {}", index + 1, location(error), error.message())?;
        if let Some(suggestion) = error.suggestion() {
            writeln!(out, "  Suggestion: {suggestion}")?;
        }
        let example = error
            .code()
            .and_then(|code| code.catalog_entry())
            .and_then(|id| catalog.get(id))
            .and_then(|pattern| pattern.example_good());
        if let Some(example) = example {
            writeln!(out, "  Corrected example:")?;
            for line in example.lines() {
                writeln!(out, "    {line}")?;
            }
        }
    }

    if !result.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "WARNINGS:")?;
        for warning in &result.warnings {
            write!(out, "- {}: {}", location(warning), warning.message())?;
            match warning.suggestion() {
                Some(suggestion) => writeln!(out, " ({suggestion})")?,
                None => writeln!(out)?,
            }
        }
    }

    if !result.suggestions.is_empty() {
        writeln!(out)?;
        writeln!(out, "SUGGESTIONS:")?;
        for suggestion in &result.suggestions {
            writeln!(out, "- {suggestion}")?;
        }
    }
    Ok(())
}

fn location(diagnostic: &Diagnostic) -> String {
    let code = diagnostic.code().map(|code| format!(", {code}")).unwrap_or_default();
    if diagnostic.line() == 0 {
        format!("whole program{code}")
    } else {
        format!("line {}{code}", diagnostic.line())
    }
}
