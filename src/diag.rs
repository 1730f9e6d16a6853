//! Internal diagnostic model for structural signature failures.
//!
//! The lexer and parser report errors through [`Diag`], which captures the
//! message together with labeled spans into the signature string. The public
//! error type renders its own stable message; `Diag` is what backs the rich
//! [`miette`] reports.

use crate::ast::Span;
use miette::{Diagnostic, LabeledSpan, Report, Severity};
use std::fmt;

/// A structured diagnostic for one failure in a signature string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    /// The main diagnostic message.
    pub message: String,
    /// Labeled spans showing relevant signature locations.
    pub labels: Vec<DiagLabel>,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Optional diagnostic code (e.g. "L001").
    pub code: Option<String>,
}

/// A labeled span within a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagLabel {
    /// The span this label refers to.
    pub span: Span,
    /// The label text explaining this span's relevance.
    pub message: String,
}

impl Diag {
    /// Creates a new error diagnostic with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            labels: Vec::new(),
            help: None,
            code: None,
        }
    }

    /// Adds a labeled span to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(DiagLabel {
            span,
            message: message.into(),
        });
        self
    }

    /// Sets the help text for this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Sets the diagnostic code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// A wrapper around the signature text for diagnostic rendering.
///
/// Spans recorded during parsing are validated against the actual signature
/// bounds before being handed to miette.
#[derive(Debug, Clone)]
pub struct SourceFile {
    content: String,
}

impl SourceFile {
    /// Creates a new source wrapper from the signature text.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Returns the signature text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Clamps a span to valid bounds within this signature.
    pub fn clamp_span(&self, span: &Span) -> Span {
        let len = self.content.len();
        let start = span.start.min(len);
        let end = span.end.min(len).max(start);
        start..end
    }
}

/// Converts a diagnostic to a miette [`Report`] with the signature attached
/// as source context.
pub fn convert_diag_to_report(diag: &Diag, source: &SourceFile) -> Report {
    let labels = diag
        .labels
        .iter()
        .map(|label| {
            let clamped = source.clamp_span(&label.span);
            LabeledSpan::new_primary_with_span(
                Some(label.message.clone()),
                (clamped.start, clamped.end - clamped.start),
            )
        })
        .collect();

    let diagnostic = BuiltDiagnostic {
        message: diag.message.clone(),
        code: diag.code.clone(),
        help: diag.help.clone(),
        labels,
    };

    Report::new(diagnostic).with_source_code(source.content().to_string())
}

/// The final diagnostic type that implements miette's `Diagnostic` trait.
#[derive(Debug)]
struct BuiltDiagnostic {
    message: String,
    code: Option<String>,
    help: Option<String>,
    labels: Vec<LabeledSpan>,
}

impl fmt::Display for BuiltDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BuiltDiagnostic {}

impl Diagnostic for BuiltDiagnostic {
    fn severity(&self) -> Option<Severity> {
        Some(Severity::Error)
    }

    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.code
            .as_ref()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.labels.is_empty() {
            None
        } else {
            Some(Box::new(self.labels.clone().into_iter()))
        }
    }
}
