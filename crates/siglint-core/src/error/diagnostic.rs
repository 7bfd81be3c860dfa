//! The core diagnostic type for the siglint error system.
//!
//! A [`Diagnostic`] represents a single error or warning found in checked
//! source, with an optional code, a 1-based line/column position, an
//! optional byte span and an optional suggested fix.

use std::fmt;

use serde::Serialize;

use crate::{
    error::{ErrorCode, Severity},
    span::Span,
};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E101] line 4:11: `fi.lowpass` expects 2 argument(s) but got 1
///   = suggestion: fi.lowpass(N, fc)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<ErrorCode>,
    message: String,
    line: usize,
    column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use siglint_core::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::error("missing entry point")
    ///     .with_code(ErrorCode::E104)
    ///     .with_suggestion("add `process = ...;`");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Create a diagnostic whose severity is taken from `code`.
    pub fn from_code(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code.severity(), message).with_code(code)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 1-based line number; 0 when the diagnostic applies to the whole source.
    pub fn line(&self) -> usize {
        self.line
    }

    /// 1-based column number; 0 when unknown.
    pub fn column(&self) -> usize {
        self.column
    }

    /// Byte span into the checked source, if known.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Get the suggested fix, if any.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the 1-based line and column.
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Set the byte span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Set the suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            line: 0,
            column: 0,
            span: None,
            suggestion: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E100] line 3:5: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        if self.line > 0 {
            write!(f, " line {}:{}", self.line, self.column)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
