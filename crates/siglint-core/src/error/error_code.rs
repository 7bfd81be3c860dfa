//! Error codes for the siglint diagnostic system.
//!
//! Codes are organized by severity:
//! - `E1xx` - Errors (the source is invalid)
//! - `W2xx` - Warnings (advisory)

use std::fmt;

use serde::Serialize;

use super::Severity;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    // =========================================================================
    // Errors (E1xx)
    // =========================================================================
    /// Unknown function.
    ///
    /// The prefix names a known library but the function is not in it.
    E100,

    /// Argument count mismatch.
    ///
    /// A catalogued function was called with a different number of
    /// arguments than it declares.
    E101,

    /// Recursive definition.
    ///
    /// A binding re-invokes itself as a namespace (`env = env.adsr(...)`),
    /// which the compiler evaluates endlessly.
    E102,

    /// String assigned as a value.
    ///
    /// Strings are only valid as metadata or UI labels.
    E103,

    /// Missing entry point.
    ///
    /// The program never defines its output binding.
    E104,

    // =========================================================================
    // Warnings (W2xx)
    // =========================================================================
    /// Unknown library prefix.
    ///
    /// A short prefix that matches no known library, most likely a typo.
    W200,

    /// Missing import.
    ///
    /// Library functions are used but no library is imported.
    W201,

    /// Oversized delay.
    ///
    /// An inline delay constant exceeds the configured maximum.
    W202,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E100").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::W200 => "W200",
            ErrorCode::W201 => "W201",
            ErrorCode::W202 => "W202",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unknown function",
            ErrorCode::E101 => "argument count mismatch",
            ErrorCode::E102 => "recursive definition",
            ErrorCode::E103 => "invalid string assignment",
            ErrorCode::E104 => "missing entry point",
            ErrorCode::W200 => "unknown library prefix",
            ErrorCode::W201 => "missing import",
            ErrorCode::W202 => "oversized delay",
        }
    }

    /// The severity diagnostics with this code are reported with.
    pub fn severity(&self) -> Severity {
        match self {
            ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104 => Severity::Error,
            ErrorCode::W200 | ErrorCode::W201 | ErrorCode::W202 => Severity::Warning,
        }
    }

    /// Id of the error catalog entry documenting this problem, if any.
    ///
    /// Used to attach before/after examples to source diagnostics.
    pub fn catalog_entry(&self) -> Option<&'static str> {
        match self {
            ErrorCode::E100 => Some("unknown_function"),
            ErrorCode::E101 => Some("wrong_arg_count"),
            ErrorCode::E102 => Some("endless_evaluation"),
            ErrorCode::E103 => Some("string_assignment"),
            ErrorCode::W202 => Some("invalid_delay"),
            ErrorCode::E104 | ErrorCode::W200 | ErrorCode::W201 => None,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::W202.to_string(), "W202");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E101.description(), "argument count mismatch");
        assert_eq!(ErrorCode::W201.description(), "missing import");
    }

    #[test]
    fn test_error_code_severity_follows_prefix() {
        for code in [
            ErrorCode::E100,
            ErrorCode::E101,
            ErrorCode::E102,
            ErrorCode::E103,
            ErrorCode::E104,
        ] {
            assert!(code.severity().is_error(), "{code} should be an error");
        }
        for code in [ErrorCode::W200, ErrorCode::W201, ErrorCode::W202] {
            assert!(code.severity().is_warning(), "{code} should be a warning");
        }
    }

    #[test]
    fn test_catalog_entry() {
        assert_eq!(ErrorCode::E102.catalog_entry(), Some("endless_evaluation"));
        assert_eq!(ErrorCode::E104.catalog_entry(), None);
    }
}
