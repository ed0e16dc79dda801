//! Error adapter for converting CtxmapError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`ctxmap_parser::ParseError`] contains multiple diagnostics, each
//! diagnostic is rendered independently. A failed validation renders one
//! report per finding.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use ctxmap::{CtxmapError, validate::Finding};
use ctxmap_parser::{Diagnostic, Severity};

fn to_miette_severity(severity: Severity) -> MietteSeverity {
    match severity {
        Severity::Error => MietteSeverity::Error,
        Severity::Warning => MietteSeverity::Warning,
    }
}

/// Adapter for a single parser diagnostic.
///
/// This adapter wraps a single [`Diagnostic`] and implements
/// [`MietteDiagnostic`] to enable rich error formatting in the CLI.
#[derive(Debug)]
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
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
        Some(to_miette_severity(self.diag.severity()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for a single validation [`Finding`].
///
/// Findings refer to model elements rather than source positions, so the
/// location path becomes part of the message.
#[derive(Debug)]
pub struct FindingAdapter<'a>(pub &'a Finding);

impl fmt::Display for FindingAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.0.message(), self.0.location())
    }
}

impl std::error::Error for FindingAdapter<'_> {}

impl MietteDiagnostic for FindingAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.0.code()))
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(to_miette_severity(self.0.severity()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.0
            .suggestion()
            .map(|s| Box::new(s) as Box<dyn fmt::Display>)
    }
}

/// Adapter for [`CtxmapError`] variants without rich diagnostic information,
/// such as I/O, configuration and editing errors.
#[derive(Debug)]
pub struct ErrorAdapter<'a>(pub &'a CtxmapError);

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
            CtxmapError::Io(_) => "ctxmap::io",
            CtxmapError::Parse { .. } => return None,
            CtxmapError::Validation(_) => "ctxmap::validation",
            CtxmapError::Edit(_) => "ctxmap::edit",
            CtxmapError::Config(_) => "ctxmap::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            CtxmapError::Edit(err) => err
                .suggestion()
                .map(|s| Box::new(format!("try `{s}`")) as Box<dyn fmt::Display>),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps a parser diagnostic, a validation finding, or a plain
/// error, providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A validation finding located by its model path.
    Finding(FindingAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Finding(finding) => fmt::Display::fmt(finding, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) | Reportable::Finding(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Finding(finding) => finding.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Finding(finding) => finding.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Finding(finding) => finding.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Finding(_) | Reportable::Error(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Finding(_) | Reportable::Error(_) => None,
        }
    }
}

/// Convert a ctxmap [`Span`](ctxmap_parser::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: ctxmap_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`CtxmapError`] into a list of reportable errors.
///
/// For [`CtxmapError::Parse`], this returns one [`Reportable`] for each
/// diagnostic in the error, and for [`CtxmapError::Validation`] one for each
/// finding. For other error variants, this returns a single [`Reportable`].
pub fn to_reportables(err: &CtxmapError) -> Vec<Reportable<'_>> {
    match err {
        CtxmapError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        CtxmapError::Validation(report) => report
            .findings()
            .iter()
            .map(|finding| Reportable::Finding(FindingAdapter(finding)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use ctxmap::session::EditError;
    use ctxmap_parser::{ErrorCode, ParseError, Span};

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("test error")
            .with_code(ErrorCode::E100)
            .with_label(Span::new(0..5), "here")
            .with_help("try this");
        let parse_err = ParseError::from(diag);
        let err = CtxmapError::new_parse_error(parse_err, "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "test error");
                assert_eq!(d.code().unwrap().to_string(), "E100");
            }
            other => panic!("Expected Diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E100)
                .with_label(Span::new(10..15), "second")
                .with_help("help for second"),
            Diagnostic::error("third error").with_label(Span::new(20..25), "third"),
        ];
        let parse_err = ParseError::from(diags);
        let err = CtxmapError::new_parse_error(parse_err, "source code here...");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].to_string(), "third error");
    }

    #[test]
    fn test_validation_findings() {
        let model = ctxmap::parse(
            "BoundedContext A { Aggregate Orders { Entity Order } } BoundedContext A { }",
        )
        .unwrap();
        let report = ctxmap::validate(&model);
        let err = CtxmapError::Validation(report);

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 2);

        assert_eq!(reportables[0].code().unwrap().to_string(), "E200");
        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Error));
        assert_eq!(
            reportables[1].to_string(),
            "aggregate `Orders` has entities but no aggregate root \
             (at BoundedContext 'A' > Aggregate 'Orders')"
        );
        assert_eq!(reportables[1].severity(), Some(MietteSeverity::Warning));
        assert!(reportables[1].help().is_some());
    }

    #[test]
    fn test_non_diagnostic_error() {
        let err = CtxmapError::Config("bad config".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad config");
                assert_eq!(e.code().unwrap().to_string(), "ctxmap::config");
            }
            other => panic!("Expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_edit_error_help() {
        let err = CtxmapError::Edit(EditError::ReservedName {
            name: "Resource".to_string(),
            suggestions: vec!["ResourceItem".to_string()],
        });

        let reportables = to_reportables(&err);
        assert_eq!(
            reportables[0].help().unwrap().to_string(),
            "try `ResourceItem`"
        );
    }

    #[test]
    fn test_all_labels_returned() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary label")
            .with_secondary_label(Span::new(10..15), "secondary label");

        let adapter = DiagnosticAdapter::new(&diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("primary label"));
        assert_eq!(labels[1].label(), Some("secondary label"));
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
    }
}
