//! Compiler error translation.
//!
//! The DSL compiler is never invoked here: [`ErrorTranslator`] only
//! post-processes error text a caller already has, matching it against the
//! ordered [`ErrorCatalog`] and returning structured, actionable guidance.

use std::sync::Arc;

use log::debug;
use serde::Serialize;

use siglint_core::error_catalog::{ErrorCatalog, ErrorPattern};

/// Text that starts a compiler error report.
pub const ERROR_MARKER: &str = "ERROR";

const GENERIC_MESSAGE: &str = "Unrecognized compiler error";
const GENERIC_FIX: &str = "Check the spelling of identifiers and library functions, make sure the \
     libraries you use are imported, and verify that signal counts match across composition \
     operators.";

/// A compiler error with guidance attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedError {
    original: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern_id: Option<String>,
    message: String,
    cause: String,
    fix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    example_bad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    example_good: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
}

impl TranslatedError {
    fn matched(original: &str, pattern: &ErrorPattern) -> Self {
        Self {
            original: original.to_string(),
            pattern_id: Some(pattern.id().to_string()),
            message: pattern.message().to_string(),
            cause: pattern.cause().to_string(),
            fix: pattern.fix().to_string(),
            example_bad: pattern.example_bad().map(str::to_string),
            example_good: pattern.example_good().map(str::to_string),
            line: compiler_line(original),
        }
    }

    fn generic(original: &str) -> Self {
        Self {
            original: original.to_string(),
            pattern_id: None,
            message: GENERIC_MESSAGE.to_string(),
            cause: original.to_string(),
            fix: GENERIC_FIX.to_string(),
            example_bad: None,
            example_good: None,
            line: compiler_line(original),
        }
    }

    /// The compiler text this was translated from.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Id of the matched catalog pattern; `None` for the generic fallback.
    pub fn pattern_id(&self) -> Option<&str> {
        self.pattern_id.as_deref()
    }

    pub fn is_recognized(&self) -> bool {
        self.pattern_id.is_some()
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

    /// Source line reported by the compiler (`file.dsp : 12 : ERROR ...`).
    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

/// Maps raw compiler error text to [`TranslatedError`]s.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use siglint::ErrorTranslator;
/// use siglint_catalog::curated_catalog;
///
/// let translator = ErrorTranslator::new(Arc::new(curated_catalog()));
/// let translated = translator.translate("ERROR : endless evaluation cycle of 4 steps");
/// assert_eq!(translated.message(), "Endless evaluation cycle detected");
/// ```
#[derive(Debug, Clone)]
pub struct ErrorTranslator {
    catalog: Arc<ErrorCatalog>,
}

impl ErrorTranslator {
    pub fn new(catalog: Arc<ErrorCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// Translate one error. Unrecognized text yields a generic entry whose
    /// cause is the text itself.
    pub fn translate(&self, raw: &str) -> TranslatedError {
        match self.catalog.first_match(raw) {
            Some(pattern) => TranslatedError::matched(raw, pattern),
            None => TranslatedError::generic(raw),
        }
    }

    /// Split compiler output into one segment per error report and translate
    /// each. Always returns at least one entry.
    pub fn translate_all(&self, text: &str) -> Vec<TranslatedError> {
        let translated: Vec<_> = segments(text)
            .into_iter()
            .map(|segment| self.translate(segment))
            .collect();
        debug!(
            segments = translated.len(),
            recognized = translated.iter().filter(|t| t.is_recognized()).count();
            "Compiler output translated"
        );
        translated
    }
}

/// Segments of `text`, each starting at a line containing [`ERROR_MARKER`].
/// Text before the first marker belongs to the first segment.
fn segments(text: &str) -> Vec<&str> {
    let mut starts = Vec::new();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        if line.contains(ERROR_MARKER) {
            starts.push(offset);
        }
        offset += line.len();
    }
    if starts.len() <= 1 {
        return vec![text.trim_end()];
    }

    starts[0] = 0;
    starts
        .iter()
        .enumerate()
        .map(|(index, &start)| {
            let end = starts.get(index + 1).copied().unwrap_or(text.len());
            text[start..end].trim_end()
        })
        .collect()
}

/// The line number in a `file.dsp : 12 : ERROR : ...` location prefix.
fn compiler_line(text: &str) -> Option<u32> {
    let line = text.lines().find(|line| line.contains(ERROR_MARKER))?;
    let location = &line[..line.find(ERROR_MARKER)?];
    location
        .split(':')
        .map(str::trim)
        .rfind(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|part| part.parse().ok())
}

#[cfg(test)]
mod tests {
    use siglint_catalog::curated_catalog;

    use super::*;

    fn translator() -> ErrorTranslator {
        ErrorTranslator::new(Arc::new(curated_catalog()))
    }

    #[test]
    fn test_endless_evaluation_is_recognized() {
        let translated = translator().translate("ERROR : endless evaluation cycle of 4 steps");
        assert_eq!(translated.pattern_id(), Some("endless_evaluation"));
        assert_eq!(translated.message(), "Endless evaluation cycle detected");
        assert!(translated.example_good().is_some());
        assert_eq!(translated.line(), None);
    }

    #[test]
    fn test_unrecognized_text_falls_back() {
        let raw = "the moon is made of cheese";
        let translated = translator().translate(raw);
        assert!(!translated.is_recognized());
        assert_eq!(translated.cause(), raw);
        assert_eq!(translated.original(), raw);
        assert!(!translated.fix().is_empty());
    }

    #[test]
    fn test_compiler_line() {
        assert_eq!(compiler_line("synth.dsp : 12 : ERROR : undefined symbol : foo"), Some(12));
        assert_eq!(compiler_line("/tmp/a b.dsp:3: ERROR : x"), Some(3));
        assert_eq!(compiler_line("ERROR : no location"), None);
        assert_eq!(compiler_line("line 4 without marker"), None);
    }

    #[test]
    fn test_translate_all_splits_at_markers() {
        let output = "compiling synth.dsp\n\
                      synth.dsp : 3 : ERROR : undefined symbol : oscc\n\
                      synth.dsp : 7 : ERROR : sequential composition A:B\n\
                      The number of outputs (1) of A must be equal to the number of inputs (2) of B\n";
        let translated = translator().translate_all(output);
        assert_eq!(translated.len(), 2);

        assert_eq!(translated[0].pattern_id(), Some("undefined_symbol"));
        assert!(translated[0].original().starts_with("compiling synth.dsp"));
        assert_eq!(translated[0].line(), Some(3));

        assert_eq!(translated[1].pattern_id(), Some("sequential_composition"));
        assert!(translated[1].original().ends_with("of B"));
        assert_eq!(translated[1].line(), Some(7));
    }

    #[test]
    fn test_translate_all_never_empty() {
        let translated = translator().translate_all("");
        assert_eq!(translated.len(), 1);
        assert_eq!(translated[0].cause(), "");

        let translated = translator().translate_all("segfault (core dumped)");
        assert_eq!(translated.len(), 1);
        assert_eq!(translated[0].cause(), "segfault (core dumped)");
    }
}
