//! Error aggregation for a single decode call.
//!
//! The lexer, parser and unmarshaller all report into one [`Diagnostics`]
//! sink instead of returning on the first problem. When the call finishes
//! the sink is drained into a [`DecodeError`] (or found empty).

use std::fmt;

use super::lexer::Span;

/// Category of a decode problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Bad character, bad escape, unterminated string.
    Lex,
    /// Malformed structure, unbalanced brackets, missing required key.
    Syntax,
    /// `::name` that is not a known type suffix.
    UnknownSuffix,
    /// A field is present but has the wrong kind (`id` not an integer, ...).
    TypeCoercion,
    /// Input left over after one complete value.
    TrailingInput,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::Lex => "lex error",
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::UnknownSuffix => "unknown suffix",
            DiagnosticKind::TypeCoercion => "type error",
            DiagnosticKind::TrailingInput => "trailing input",
        })
    }
}

/// One problem found while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Option<Span>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.span {
            Some(span) => write!(f, "{} at {}..{}: {}", self.kind, span.start, span.end, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Composite failure of one decode call: the input text plus every problem found.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("failed to decode agtype literal ({} problem(s)): {}", .diagnostics.len(), summarize(.diagnostics))]
pub struct DecodeError {
    pub input: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl DecodeError {
    pub fn has_kind(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().map(|d| d.message.as_str())
    }
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Ordered collection of problems for the decode call in progress.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, kind: DiagnosticKind, span: Option<Span>, message: impl Into<String>) {
        self.items.push(Diagnostic { kind, span, message: message.into() });
    }

    pub fn lex(&mut self, span: Span, message: impl Into<String>) {
        self.report(DiagnosticKind::Lex, Some(span), message);
    }

    pub fn syntax(&mut self, span: Span, message: impl Into<String>) {
        self.report(DiagnosticKind::Syntax, Some(span), message);
    }

    pub fn coercion(&mut self, span: Span, message: impl Into<String>) {
        self.report(DiagnosticKind::TypeCoercion, Some(span), message);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Drain into a composite error. Leaves the sink empty either way.
    pub fn finish(&mut self, input: &str) -> Option<DecodeError> {
        if self.items.is_empty() {
            return None;
        }
        Some(DecodeError {
            input: input.to_owned(),
            diagnostics: std::mem::take(&mut self.items),
        })
    }
}
