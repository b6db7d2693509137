//! Nullability computation and left-recursion detection.
//!
//! A single DFS over the expression tree, starting at the grammar's start
//! rule, computes whether each visited rule can match the empty string
//! while simultaneously watching for cycles through `identifier`
//! references. This is the exact single-pass algorithm the design calls
//! for — not the teacher's independent strongly-connected-components pass
//! — because the design is explicit about threading one contextual
//! `checkLeftRecursion` flag through the traversal rather than
//! precomputing a call graph.

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::ast::{NodeId, NodeKind, Tree};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::runtime::charclass::CharProperty;
use crate::span::Span;

use super::symbol_table::RuleTable;

pub struct NullabilityResult {
    pub nullable: IndexSet<String>,
}

struct Checker<'a, 's> {
    tree: &'a Tree,
    source: &'s str,
    rules: &'a RuleTable<'s>,
    accessing: Vec<&'s str>,
    accessed: HashMap<&'s str, bool>,
    nullable: IndexSet<String>,
    diagnostics: &'a mut Diagnostics,
    failed: bool,
}

/// Runs the checker starting from the grammar's declared start rule.
/// Returns the nullable-rule set; all diagnostics (undefined identifiers,
/// nullable greedy repetition, left recursion) are pushed onto `diagnostics`
/// as they are found.
///
/// The DFS is seeded only from the header's start expression — a rule
/// never reached by any path from there is never visited, and so can never
/// be flagged. This matters because the generated `parse` function can
/// never exercise such a rule either: checking it would reject grammars
/// the emitted parser is in fact safe to run.
pub fn check(tree: &Tree, rules: &RuleTable<'_>, source: &str, diagnostics: &mut Diagnostics) -> NullabilityResult {
    let mut checker = Checker {
        tree,
        source,
        rules,
        accessing: Vec::new(),
        accessed: HashMap::new(),
        nullable: IndexSet::new(),
        diagnostics,
        failed: false,
    };

    checker.visit_expression(rules.start_expression(), true);

    NullabilityResult { nullable: checker.nullable }
}

impl<'a, 's> Checker<'a, 's> {
    /// Visits a named rule, returning its nullability. `check_left_recursion`
    /// is the contextual flag described in the design: true unless a prior
    /// sibling in the current sequence already guaranteed progress, or the
    /// call is inside a zero-width predicate or a repeated-after-first-pass
    /// position.
    fn visit_rule(&mut self, name: &'s str, expression: NodeId, check_left_recursion: bool) -> bool {
        if let Some(&nullable) = self.accessed.get(name) {
            return nullable;
        }

        if let Some(pos) = self.accessing.iter().position(|r| *r == name) {
            if check_left_recursion {
                let cycle: Vec<&str> = self.accessing[pos..].to_vec();
                self.report_left_recursion(&cycle, name);
            }
            // A cycle resolves as non-nullable regardless of whether it was
            // reported: the DFS cannot look further down this path.
            return false;
        }

        self.accessing.push(name);
        let nullable = self.visit_expression(expression, check_left_recursion);
        self.accessing.pop();

        self.accessed.insert(name, nullable);
        if nullable {
            self.nullable.insert(name.to_string());
        }
        nullable
    }

    fn report_left_recursion(&mut self, cycle: &[&str], closing: &str) {
        let mut chain: Vec<String> = cycle.iter().map(|s| s.to_string()).collect();
        chain.push(closing.to_string());
        let message = format!("left recursion: {}", chain.join(" -> "));
        let span = self.rules.get(cycle[0]).map(|e| self.tree.node(e.definition).span()).unwrap_or(Span::at(0));

        let mut builder = self.diagnostics.error(DiagnosticKind::LeftRecursion, message, span);
        for &name in cycle {
            if let Some(entry) = self.rules.get(name) {
                let rule_span = self.tree.node(entry.definition).span();
                builder = builder.related_to(format!("`{name}` recurses here"), rule_span);
            }
        }
        builder.emit();
        self.failed = true;
    }

    /// `expression` node: nullable iff any alternative (`sequence` child) is.
    fn visit_expression(&mut self, expr: NodeId, check_left_recursion: bool) -> bool {
        let mut any_nullable = false;
        for &seq in self.tree.children(expr) {
            if self.visit_sequence(seq, check_left_recursion) {
                any_nullable = true;
            }
        }
        any_nullable
    }

    /// `sequence` node: nullable iff every `prefix` child is. The
    /// left-recursion flag clears for every sibling after the first child
    /// that is found to be non-nullable, since that child guarantees the
    /// cursor advances before any later reference could recurse.
    fn visit_sequence(&mut self, seq: NodeId, check_left_recursion: bool) -> bool {
        let mut flag = check_left_recursion;
        let mut all_nullable = true;
        for &prefix in self.tree.children(seq) {
            let nullable = self.visit_prefix(prefix, flag);
            if !nullable {
                all_nullable = false;
                flag = false;
            }
        }
        all_nullable
    }

    /// `prefix` node: `&`/`!` are always nullable and zero-width, so the
    /// flag is cleared before descending into their operand.
    fn visit_prefix(&mut self, prefix: NodeId, check_left_recursion: bool) -> bool {
        let children = self.tree.children(prefix);
        match children.len() {
            2 => {
                self.visit_suffix(children[1], false);
                true
            }
            1 => self.visit_suffix(children[0], check_left_recursion),
            _ => unreachable!("prefix always has a suffix child"),
        }
    }

    /// `suffix` node: `?`/`*` are always nullable; `+` takes the operand's
    /// nullability. The flag clears after the first iteration of a
    /// repetition, modeled here by clearing it for the nullability probe of
    /// the operand itself, since a second iteration can only be reached
    /// after the first already made progress or is itself zero-width.
    fn visit_suffix(&mut self, suffix: NodeId, check_left_recursion: bool) -> bool {
        let children = self.tree.children(suffix);
        let primary = children[0];
        if children.len() == 2 {
            let marker_kind = self.tree.kind(children[1]);
            let operand_nullable = self.visit_primary(primary, check_left_recursion);
            match marker_kind {
                NodeKind::Question | NodeKind::Star => {
                    if operand_nullable {
                        self.report_unnullable(suffix, marker_kind);
                    }
                    true
                }
                NodeKind::Plus => {
                    if operand_nullable {
                        self.report_unnullable(suffix, marker_kind);
                    }
                    operand_nullable
                }
                other => unreachable!("{other:?} is not a suffix marker"),
            }
        } else {
            self.visit_primary(primary, check_left_recursion)
        }
    }

    fn report_unnullable(&mut self, suffix: NodeId, marker: NodeKind) {
        if matches!(marker, NodeKind::Question) {
            // `?` matching empty is the entire point of the operator.
            return;
        }
        let span = self.tree.node(suffix).span();
        self.diagnostics
            .error(DiagnosticKind::Unnullable, "greedy repetition is not allowed to be empty", span)
            .emit();
        self.failed = true;
    }

    fn visit_primary(&mut self, primary: NodeId, check_left_recursion: bool) -> bool {
        let children = self.tree.children(primary);
        let child = children[0];
        match self.tree.kind(child) {
            NodeKind::Identifier => {
                let ident_leaf = self.tree.children(child)[0];
                let name = self.tree.text(ident_leaf, self.source);
                if CharProperty::from_ident(name).is_some() {
                    // A character-property predicate always consumes exactly
                    // one codepoint: never nullable, and not a reference that
                    // can participate in left recursion.
                    return false;
                }
                match self.rules.get(name) {
                    Some(entry) => self.visit_rule(name, entry.expression, check_left_recursion),
                    None => {
                        let span = self.tree.node(child).span();
                        self.diagnostics
                            .error(DiagnosticKind::UndefinedIdent, format!("undefined rule `{name}`"), span)
                            .emit();
                        self.failed = true;
                        false
                    }
                }
            }
            NodeKind::Expression => self.visit_expression(child, check_left_recursion),
            NodeKind::Literal => self.tree.children(child).is_empty(),
            NodeKind::Class | NodeKind::Dot => false,
            other => unreachable!("{other:?} is not a primary shape"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn run(src: &str) -> (NullabilityResult, Diagnostics) {
        let (tree, root) = parse_source(src).unwrap();
        let rules = RuleTable::build(&tree, root, src);
        let mut diags = Diagnostics::new();
        let result = check(&tree, &rules, src, &mut diags);
        (result, diags)
    }

    #[test]
    fn literal_rule_is_not_nullable() {
        let (result, diags) = run("PEG g(r)\nr <- 'a';\nEND;\n");
        assert!(diags.is_empty());
        assert!(!result.nullable.contains("r"));
    }

    #[test]
    fn optional_rule_is_nullable() {
        let (result, diags) = run("PEG g(r)\nr <- 'a'?;\nEND;\n");
        assert!(diags.is_empty());
        assert!(result.nullable.contains("r"));
    }

    #[test]
    fn direct_left_recursion_is_reported() {
        let (_, diags) = run("PEG g(r)\nr <- r 'a';\nEND;\n");
        assert!(diags.has_errors());
    }

    #[test]
    fn left_recursion_under_not_predicate_is_not_reported() {
        let (_, diags) = run("PEG g(r)\nr <- !r 'a' / 'b';\nEND;\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn undefined_identifier_is_reported() {
        let (_, diags) = run("PEG g(r)\nr <- missing;\nEND;\n");
        assert!(diags.has_errors());
    }

    #[test]
    fn nullable_star_operand_is_rejected() {
        let (_, diags) = run("PEG g(r)\nr <- ('a'?)*;\nEND;\n");
        assert!(diags.has_errors());
    }

    #[test]
    fn rule_unreachable_from_start_is_not_checked() {
        let (_, diags) = run("PEG g(r)\nr <- 'a';\ndead <- dead;\nEND;\n");
        assert!(diags.is_empty());
    }

    #[test]
    fn character_property_identifier_is_accepted_and_not_nullable() {
        let (result, diags) = run("PEG g(word)\nword <- alpha+;\nEND;\n");
        assert!(diags.is_empty());
        assert!(!result.nullable.contains("word"));
    }

    #[test]
    fn left_recursion_report_carries_one_related_span_per_cycle_rule() {
        let mut diags = Diagnostics::new();
        let src = "PEG g(a)\na <- b 'x';\nb <- a 'y' / 'z';\nEND;\n";
        let (tree, root) = parse_source(src).unwrap();
        let rules = RuleTable::build(&tree, root, src);
        check(&tree, &rules, src, &mut diags);
        assert!(diags.has_errors());
        assert_eq!(diags.len(), 1);
    }
}
