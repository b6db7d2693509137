//! Static analysis of a parsed grammar: reference resolution, nullability,
//! left-recursion detection, and the greedy-empty rejection.

pub mod recursion;
pub mod symbol_table;

pub use recursion::NullabilityResult;
pub use symbol_table::{RuleEntry, RuleTable};

use indexmap::IndexSet;

use crate::ast::{NodeId, Tree};
use crate::diagnostics::Diagnostics;

/// The result of a successful check pass: the rule table and the set of
/// nullable rule names, both of which the emitter consumes directly.
pub struct CheckedGrammar<'s> {
    pub rules: RuleTable<'s>,
    pub nullable: IndexSet<String>,
}

/// Builds the rule table and runs the nullability/left-recursion/undefined-
/// identifier analysis. Diagnostics accumulate in `diagnostics`; the caller
/// decides whether `diagnostics.has_errors()` should abort the pipeline
/// before reaching the emitter.
pub fn check<'s>(tree: &Tree, root: NodeId, source: &'s str, diagnostics: &mut Diagnostics) -> CheckedGrammar<'s> {
    let rules = RuleTable::build(tree, root, source);
    let result = recursion::check(tree, &rules, source, diagnostics);
    CheckedGrammar { rules, nullable: result.nullable }
}
