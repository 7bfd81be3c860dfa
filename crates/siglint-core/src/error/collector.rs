//! Collector for accumulating diagnostics during a checking pass.
//!
//! The [`DiagnosticCollector`] lets a pass report every problem it finds
//! instead of stopping at the first one.

use crate::error::Diagnostic;

/// A collector for accumulating diagnostics during a checking pass.
///
/// # Example
///
/// ```
/// # use siglint_core::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(Diagnostic::from_code(ErrorCode::E100, "unknown function `fi.foo`").at(1, 1));
/// collector.emit(Diagnostic::from_code(ErrorCode::W200, "unknown library prefix `xx`").at(2, 1));
///
/// assert!(collector.has_errors());
/// let (errors, warnings) = collector.partition();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// The diagnostic is added to the collection and if it's an error,
    /// the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Whether any emitted diagnostic is an error.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Number of diagnostics collected so far.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Finish collection, returning every diagnostic in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Finish collection, splitting diagnostics into `(errors, warnings)`.
    pub fn partition(self) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
        self.diagnostics
            .into_iter()
            .partition(|diag| diag.severity().is_error())
    }
}

impl Extend<Diagnostic> for DiagnosticCollector {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diagnostic in iter {
            self.emit(diagnostic);
        }
    }
}
