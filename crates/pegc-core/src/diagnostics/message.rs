use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The kind of defect a diagnostic reports, per the external interface
/// contract: undefined references, nullable greedy repetition, left
/// recursion, and bootstrap parse failures each get their own tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    UndefinedIdent,
    Unnullable,
    LeftRecursion,
    ParseError,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DiagnosticKind::UndefinedIdent => "undefined_ident",
            DiagnosticKind::Unnullable => "unnullable",
            DiagnosticKind::LeftRecursion => "left_recursion",
            DiagnosticKind::ParseError => "parse_error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone)]
pub(crate) struct RelatedInfo {
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone)]
pub(crate) struct DiagnosticMessage {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub span: Span,
    pub message: String,
    pub related: Vec<RelatedInfo>,
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.kind, self.message)?;
        for rel in &self.related {
            write!(f, "\n  related: {}", rel.message)?;
        }
        Ok(())
    }
}
