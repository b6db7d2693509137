//! Diagnostic collection and rendering, grounded on this lineage's
//! `DiagnosticBuilder` pattern: a pass accumulates messages by calling
//! `.error(...)`/`.warning(...)` and chaining `.related_to(...)` before
//! `.emit()`, rather than constructing a struct literal per call site.

mod message;
mod printer;

pub use message::{DiagnosticKind, Severity};
pub use printer::DiagnosticsPrinter;

use crate::span::Span;
use message::{DiagnosticMessage, RelatedInfo};

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { messages: Vec::new() }
    }

    pub fn error(
        &mut self,
        kind: DiagnosticKind,
        msg: impl Into<String>,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage {
                severity: Severity::Error,
                kind,
                span,
                message: msg.into(),
                related: Vec::new(),
            },
        }
    }

    pub fn warning(
        &mut self,
        kind: DiagnosticKind,
        msg: impl Into<String>,
        span: Span,
    ) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage {
                severity: Severity::Warning,
                kind,
                span,
                message: msg.into(),
                related: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|m| m.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.severity == Severity::Error).count()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }

    pub fn printer<'a>(&'a self, source: &'a str) -> DiagnosticsPrinter<'a> {
        DiagnosticsPrinter::new(self, source)
    }
}

#[must_use = "diagnostic not recorded until .emit() is called"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn related_to(mut self, msg: impl Into<String>, span: Span) -> Self {
        self.message.related.push(RelatedInfo { span, message: msg.into() });
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

impl std::fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, m) in self.messages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;

    #[test]
    fn builder_requires_emit_to_record() {
        let mut diags = Diagnostics::new();
        diags
            .error(DiagnosticKind::UndefinedIdent, "undefined rule `foo`", Span::new(0, 3))
            .emit();
        assert_eq!(diags.len(), 1);
        assert!(diags.has_errors());
    }

    #[test]
    fn related_info_is_attached() {
        let mut diags = Diagnostics::new();
        diags
            .error(DiagnosticKind::LeftRecursion, "a -> b -> a", Span::new(0, 1))
            .related_to("first reference to `a`", Span::new(4, 5))
            .emit();
        assert_eq!(diags.len(), 1);
    }
}
