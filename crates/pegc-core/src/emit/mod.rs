//! The code emitter: walks a checked grammar and writes out a standalone
//! Rust source file containing the combinator runtime prologue, the
//! generated AST sum type, and one parser function per rule plus a
//! top-level `parse` entry point whose body is the header's start
//! expression translated inline.

pub mod ast_types;
pub mod expr;
pub mod layout;
pub mod naming;
pub mod nullability_table;
pub mod prologue;
pub mod rules;

use crate::ast::Tree;
use crate::check::CheckedGrammar;

use expr::ExprEmitter;
use layout::Writer;

/// Emits the full generated source text for a checked grammar.
///
/// The header's `startExpr` is anonymous: it gets no `NodeKind` variant and
/// no named parser function of its own. Its expression is translated the
/// same way any rule body is (see [`ExprEmitter::expression`]) and inlined
/// directly into `parse`, matched against once to unwrap whatever node the
/// expression contributed.
pub fn emit(tree: &Tree, checked: &CheckedGrammar<'_>, source: &str) -> String {
    let mut w = Writer::new();

    w.line("// Generated by pegc. Do not edit by hand.");
    w.blank();
    w.line(prologue::render().trim());
    w.blank();

    ast_types::emit_node_kind(&mut w, &checked.rules);
    nullability_table::emit_nullability_table(&mut w, &checked.nullable);

    let emitter = ExprEmitter { tree, source, rules: &checked.rules };
    rules::emit_rules(&mut w, &emitter, &checked.rules);

    let body = emitter.expression(checked.rules.start_expression());
    w.line("pub fn parse(source: &str) -> Result<Node, Failure> {");
    w.indented(|w| {
        w.line("let mut state = ParseState::new(source);");
        w.line(format!("match ({body})(&mut state)? {{"));
        w.indented(|w| {
            w.line("MatchValue::One(node) => Ok(node),");
            w.line("MatchValue::Many(mut nodes) => Ok(nodes.remove(0)),");
            w.line(
                "MatchValue::Void => Err(Failure { kind: FailureKind::NoMatches, pos: state.pos(), rule_stack: Vec::new() }),",
            );
        });
        w.line("}");
    });
    w.line("}");

    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::check;
    use crate::diagnostics::Diagnostics;
    use crate::parser::parse_source;

    #[test]
    fn emits_prologue_ast_and_rules() {
        let src = "PEG greet(greeting)\ngreeting <- 'hello' ' ' name;\nleaf: name <- [a-zA-Z]+;\nEND;\n";
        let (tree, root) = parse_source(src).unwrap();
        let mut diags = Diagnostics::new();
        let checked = check(&tree, root, src, &mut diags);
        assert!(diags.is_empty());

        let out = emit(&tree, &checked, src);
        assert!(out.contains("pub enum NodeKind"));
        assert!(out.contains("fn parse_greeting"));
        assert!(out.contains("fn parse_name"));
        assert!(!out.contains("fn parse_greet("));
        assert!(!out.contains("Greet"));
        assert!(out.contains("pub fn parse(source: &str)"));
        assert!(out.contains("parse_greeting(state)"));
    }
}
