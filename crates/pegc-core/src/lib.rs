//! `pegc-core`: a parsing-expression-grammar compiler.
//!
//! The pipeline is three passes over one arena-backed grammar AST:
//!
//! - [`parser`] — a bootstrap recursive-descent parser for the grammar
//!   description language, itself built from [`runtime`]'s combinators.
//! - [`check`] — nullability, left-recursion, and undefined-reference
//!   analysis.
//! - [`emit`] — translation of a checked grammar into standalone Rust
//!   source implementing the described language.
//!
//! [`compile`] drives all three and is the crate's one public entry point
//! for turning grammar source into generated parser source (or a
//! [`Diagnostics`] report explaining why it could not).

pub mod arena;
pub mod ast;
pub mod check;
pub mod diagnostics;
pub mod emit;
pub mod parser;
pub mod runtime;
pub mod span;

pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};

/// Result type for a single pass that can both produce a value and
/// accumulate diagnostics — mirrored on this lineage's `PassResult`
/// alias, though here only the checker actually populates the
/// `Diagnostics` half on the `Ok` path (the parser either succeeds cleanly
/// or fails outright).
pub type PassResult<T> = Result<(T, Diagnostics), Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] parser::ParseError),
    #[error("grammar failed checks")]
    CheckFailed(Diagnostics),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parses, checks, and emits Rust source for `source`, a grammar
/// description in the dialect documented on [`parser::grammar`].
///
/// Returns the generated source text on success. On a checker failure, the
/// diagnostics are returned via [`Error::CheckFailed`] rather than an
/// empty string, so the caller can render them against `source`.
pub fn compile(source: &str) -> Result<String, Error> {
    let (tree, root) = parser::parse_source(source)?;

    let mut diagnostics = Diagnostics::new();
    let checked = check::check(&tree, root, source, &mut diagnostics);
    if diagnostics.has_errors() {
        return Err(Error::CheckFailed(diagnostics));
    }

    Ok(emit::emit(&tree, &checked, source))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_trivial_grammar() {
        let src = "PEG g(greeting)\ngreeting <- 'hi';\nEND;\n";
        let out = compile(src).expect("compile should succeed");
        assert!(out.contains("pub fn parse"));
    }

    #[test]
    fn reports_left_recursion_as_check_failure() {
        let src = "PEG g(r)\nr <- r 'a';\nEND;\n";
        match compile(src) {
            Err(Error::CheckFailed(diags)) => assert!(diags.has_errors()),
            other => panic!("expected CheckFailed, got {other:?}"),
        }
    }

    #[test]
    fn reports_bootstrap_parse_errors() {
        let src = "not a grammar at all";
        assert!(matches!(compile(src), Err(Error::Parse(_))));
    }
}
