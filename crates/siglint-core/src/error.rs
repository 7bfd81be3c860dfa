//! Diagnostic system for siglint.
//!
//! This module provides the types every checker reports through:
//! - Error codes for documentation and searchability
//! - Severity levels
//! - A builder-style [`Diagnostic`] carrying line, column, span and a
//!   suggested fix
//! - A collector for accumulating diagnostics during a pass
//!
//! # Example
//!
//! ```
//! # use siglint_core::error::{Diagnostic, ErrorCode};
//! # use siglint_core::span::Span;
//!
//! let diag = Diagnostic::error("unknown function `fi.lowpas`")
//!     .with_code(ErrorCode::E100)
//!     .at(3, 9)
//!     .with_span(Span::new(42..52))
//!     .with_suggestion("did you mean: fi.lowpass?");
//! assert_eq!(diag.line(), 3);
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use severity::Severity;
