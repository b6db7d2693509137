//! Emission of the generated sum-type AST: one `NodeKind` variant per
//! non-`void` rule, plus the intrinsic leaf kinds the bootstrap-style
//! decoding of literals and classes never needs at the generated level (the
//! emitted parser resolves `char`/class decoding to scalar values at
//! codegen time, so no `CharUnescaped`-style leaf kinds need to survive
//! into the generated `NodeKind`).

use crate::ast::NodeKind as GrammarNodeKind;
use crate::check::RuleTable;

use super::layout::Writer;
use super::naming::variant_name;

pub fn emit_node_kind(w: &mut Writer, rules: &RuleTable<'_>) {
    w.line("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
    w.line("pub enum NodeKind {");
    w.indented(|w| {
        for (name, entry) in rules.iter() {
            if matches!(entry.attribute, Some(GrammarNodeKind::Void)) {
                continue;
            }
            w.line(format!("{},", variant_name(name)));
        }
    });
    w.line("}");
    w.blank();
}
