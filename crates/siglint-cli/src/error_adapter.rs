//! Adapters for rendering siglint diagnostics and errors with miette.
//!
//! Validation diagnostics and the library's error type are plain data; this
//! module wraps them in [`MietteDiagnostic`] implementations so the CLI can
//! print them with source snippets.

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, Severity as MietteSeverity,
    SourceSpan,
};

use siglint::{Diagnostic, Severity, SiglintError};

/// Adapter for a single validation diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter over the checked source.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .suggestion()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.diag.span()?;
        let label = self.diag.code().map(|code| code.description().to_string());
        Some(Box::new(std::iter::once(LabeledSpan::new_primary_with_span(
            label,
            SourceSpan::new(span.start().into(), span.len()),
        ))))
    }
}

/// Adapter for [`SiglintError`], which carries no source location.
pub struct ErrorAdapter<'a>(pub &'a SiglintError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SiglintError::Io(_) => "siglint::io",
            SiglintError::Catalog(_) => "siglint::catalog",
            SiglintError::Config(_) => "siglint::config",
            SiglintError::InvalidRule { .. } => "siglint::rules",
            SiglintError::Json(_) => "siglint::json",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            SiglintError::Catalog(_) => Some(Box::new(
                "rebuild the artifact with `siglint build-catalog` or `siglint build-error-catalog`",
            )),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A validation diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Wrap each diagnostic of a validation run, errors first.
pub fn diagnostics_to_reportables<'a>(
    diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    src: &'a str,
) -> Vec<Reportable<'a>> {
    diagnostics
        .into_iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
        .collect()
}

/// Convert a [`SiglintError`] into a list of reportable errors.
pub fn to_reportables(err: &SiglintError) -> Vec<Reportable<'_>> {
    vec![Reportable::Error(ErrorAdapter(err))]
}

/// Render a reportable with miette's graphical handler.
pub fn render(reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut writer, reportable)
        .expect("Writing to String buffer is infallible");
    writer
}

#[cfg(test)]
mod tests {
    use siglint::{ErrorCode, Span};

    use super::*;

    #[test]
    fn test_diagnostic_adapter() {
        let diag = Diagnostic::from_code(ErrorCode::E100, "unknown function `fi.lowpas`")
            .at(1, 11)
            .with_span(Span::new(10..19))
            .with_suggestion("did you mean `fi.lowpass`?");
        let adapter = DiagnosticAdapter::new(&diag, "process = fi.lowpas(2, 1000);");

        assert_eq!(adapter.to_string(), "unknown function `fi.lowpas`");
        assert_eq!(adapter.code().map(|c| c.to_string()).as_deref(), Some("E100"));
        assert_eq!(adapter.help().map(|h| h.to_string()).as_deref(), Some("did you mean `fi.lowpass`?"));
        assert_eq!(adapter.severity(), Some(MietteSeverity::Error));

        let labels: Vec<_> = adapter.labels().expect("labels").collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 10);
        assert_eq!(labels[0].len(), 9);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_warning_severity_and_no_span() {
        let diag = Diagnostic::from_code(ErrorCode::W201, "no import");
        let adapter = DiagnosticAdapter::new(&diag, "");
        assert_eq!(adapter.severity(), Some(MietteSeverity::Warning));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_error_reportable() {
        let err = SiglintError::Config("bad".to_string());
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "Configuration error: bad");
        assert_eq!(
            reportables[0].code().map(|c| c.to_string()).as_deref(),
            Some("siglint::config")
        );
    }

    #[test]
    fn test_render_includes_message_and_help() {
        let diag = Diagnostic::from_code(ErrorCode::E104, "missing entry point")
            .with_suggestion("define the program output");
        let reportables = diagnostics_to_reportables([&diag], "gain = 0.5;");
        let rendered = render(&reportables[0]);
        assert!(rendered.contains("missing entry point"));
        assert!(rendered.contains("define the program output"));
    }
}
