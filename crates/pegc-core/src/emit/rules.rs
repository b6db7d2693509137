//! Per-rule parser-function emission, dispatched by the rule's attribute.

use crate::ast::NodeKind as GrammarNodeKind;
use crate::check::RuleTable;

use super::expr::ExprEmitter;
use super::layout::Writer;
use super::naming::{rule_fn_name, variant_name};

pub fn emit_rules(w: &mut Writer, emitter: &ExprEmitter<'_, '_>, rules: &RuleTable<'_>) {
    for (name, entry) in rules.iter() {
        let fn_name = rule_fn_name(name);
        let variant = variant_name(name);
        let body = emitter.expression(entry.expression);

        match entry.attribute {
            Some(GrammarNodeKind::Void) => {
                w.line(format!("fn {fn_name}(state: &mut ParseState) -> Result<(), Failure> {{"));
                w.indented(|w| {
                    w.line(format!(
                        "state.run_rule({name:?}, RuleShape::Void, |state| ({body})(state)).map(|_| ())"
                    ));
                });
                w.line("}");
            }
            Some(GrammarNodeKind::Leaf) => {
                w.line(format!("fn {fn_name}(state: &mut ParseState) -> Result<Node, Failure> {{"));
                w.indented(|w| {
                    w.line(format!(
                        "state.run_rule({name:?}, RuleShape::Leaf(NodeKind::{variant}), |state| ({body})(state)).map(|out| out.node())"
                    ));
                });
                w.line("}");
            }
            _ => {
                w.line(format!("fn {fn_name}(state: &mut ParseState) -> Result<Node, Failure> {{"));
                w.indented(|w| {
                    w.line(format!(
                        "state.run_rule({name:?}, RuleShape::Value(NodeKind::{variant}), |state| ({body})(state)).map(|out| out.node())"
                    ));
                });
                w.line("}");
            }
        }
        w.blank();
    }
}
