//! Builder-pattern printer for rendering diagnostics with source context.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use super::Diagnostics;
use super::message::Severity;

pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: &'s str,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub(crate) fn new(diagnostics: &'d Diagnostics, source: &'s str) -> Self {
        DiagnosticsPrinter { diagnostics, source, path: None, colored: false }
    }

    pub fn path(mut self, path: &'s str) -> Self {
        self.path = Some(path);
        self
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored { Renderer::styled() } else { Renderer::plain() };

        for (i, diag) in self.diagnostics.messages.iter().enumerate() {
            let range = adjust_range(diag.span.into(), self.source.len());

            let mut snippet = Snippet::source(self.source)
                .line_start(1)
                .annotation(AnnotationKind::Primary.span(range).label(&diag.message));

            if let Some(p) = self.path {
                snippet = snippet.path(p);
            }

            for related in &diag.related {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span.into(), self.source.len()))
                        .label(&related.message),
                );
            }

            let level = severity_to_level(diag.severity);
            let title = format!("[{}] {}", diag.kind, diag.message);
            let report: Vec<Group> = vec![level.primary_title(&title).element(snippet)];

            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&report))?;
        }

        Ok(())
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(range: std::ops::Range<usize>, limit: usize) -> std::ops::Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range
}
