//! Expression-to-combinator-call translation: walks an `expression`
//! subtree and produces the Rust source text of the matcher it describes,
//! per the translation table in the expanded specification.

use crate::ast::{NodeId, NodeKind, Tree};
use crate::check::RuleTable;
use crate::parser::grammar::decode_char;
use crate::runtime::charclass::CharProperty;

use super::naming::rule_fn_name;

pub struct ExprEmitter<'a, 's> {
    pub tree: &'a Tree,
    pub source: &'s str,
    pub rules: &'a RuleTable<'s>,
}

impl<'a, 's> ExprEmitter<'a, 's> {
    /// Translates an `expression` node into a matcher closure expression,
    /// e.g. `&|state| pegc_choice(state, &[...])`.
    pub fn expression(&self, node: NodeId) -> String {
        let children = self.tree.children(node);
        if children.len() == 1 {
            return self.sequence(children[0]);
        }
        let alts: Vec<String> = children.iter().map(|&c| self.sequence(c)).collect();
        format!("&|state| choice(state, &[{}])", alts.join(", "))
    }

    fn sequence(&self, node: NodeId) -> String {
        let children = self.tree.children(node);
        if children.len() == 1 {
            return self.prefix(children[0]);
        }
        let parts: Vec<String> = children.iter().map(|&c| self.prefix(c)).collect();
        format!("&|state| sequence(state, &[{}])", parts.join(", "))
    }

    fn prefix(&self, node: NodeId) -> String {
        let children = self.tree.children(node);
        if children.len() == 2 {
            let marker = self.tree.kind(children[0]);
            let operand = self.suffix(children[1]);
            return match marker {
                NodeKind::And => format!("&|state| and_p(state, {operand})"),
                NodeKind::Not => format!("&|state| not_p(state, {operand})"),
                other => unreachable!("{other:?} is not a prefix marker"),
            };
        }
        self.suffix(children[0])
    }

    fn suffix(&self, node: NodeId) -> String {
        let children = self.tree.children(node);
        let primary = self.primary(children[0]);
        if children.len() == 2 {
            return match self.tree.kind(children[1]) {
                NodeKind::Question => format!("&|state| optional(state, {primary})"),
                NodeKind::Star => format!("&|state| repeat(state, {primary})"),
                NodeKind::Plus => format!("&|state| repeat_plus(state, {primary})"),
                other => unreachable!("{other:?} is not a suffix marker"),
            };
        }
        primary
    }

    fn primary(&self, node: NodeId) -> String {
        let child = self.tree.children(node)[0];
        match self.tree.kind(child) {
            NodeKind::Identifier => {
                let ident = self.tree.children(child)[0];
                let name = self.tree.text(ident, self.source);
                if let Some(prop) = CharProperty::from_ident(name) {
                    return format!("&{}", prop.runtime_name());
                }
                let fn_name = rule_fn_name(name);
                let is_void = matches!(
                    self.rules.get(name).and_then(|e| e.attribute),
                    Some(NodeKind::Void)
                );
                if is_void {
                    format!("&|state| {fn_name}(state).map(|_| MatchValue::Void)")
                } else {
                    format!("&|state| {fn_name}(state).map(MatchValue::One)")
                }
            }
            NodeKind::Expression => self.expression(child),
            NodeKind::Literal => self.literal(child),
            NodeKind::Class => self.class(child),
            NodeKind::Dot => "&any".to_string(),
            other => unreachable!("{other:?} is not a primary shape"),
        }
    }

    fn literal(&self, node: NodeId) -> String {
        let mut text = String::new();
        for &char_node in self.tree.children(node) {
            let leaf = self.tree.children(char_node)[0];
            let scalar = decode_char(self.tree.kind(leaf), self.tree.text(leaf, self.source));
            text.push(char::from_u32(scalar).unwrap_or('\u{FFFD}'));
        }
        format!("&literal({:?})", text)
    }

    fn class(&self, node: NodeId) -> String {
        let mut ranges = Vec::new();
        for &range_node in self.tree.children(node) {
            let chars = self.tree.children(range_node);
            let lo_leaf = self.tree.children(chars[0])[0];
            let lo = decode_char(self.tree.kind(lo_leaf), self.tree.text(lo_leaf, self.source));
            let hi = if chars.len() == 2 {
                let hi_leaf = self.tree.children(chars[1])[0];
                decode_char(self.tree.kind(hi_leaf), self.tree.text(hi_leaf, self.source))
            } else {
                lo
            };
            ranges.push(format!("({lo}, {hi})"));
        }
        format!("&char_class(&[{}])", ranges.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    #[test]
    fn translates_literal_and_choice() {
        let src = "PEG g(r)\nr <- 'a' / 'b';\nEND;\n";
        let (tree, root) = parse_source(src).unwrap();
        let rules = RuleTable::build(&tree, root, src);
        let entry = rules.get("r").unwrap();
        let emitter = ExprEmitter { tree: &tree, source: src, rules: &rules };
        let out = emitter.expression(entry.expression);
        assert!(out.contains("choice"));
        assert!(out.contains("\"a\""));
        assert!(out.contains("\"b\""));
    }

    #[test]
    fn translates_class_ranges() {
        let src = "PEG g(r)\nr <- [a-z0-9];\nEND;\n";
        let (tree, root) = parse_source(src).unwrap();
        let rules = RuleTable::build(&tree, root, src);
        let entry = rules.get("r").unwrap();
        let emitter = ExprEmitter { tree: &tree, source: src, rules: &rules };
        let out = emitter.expression(entry.expression);
        assert!(out.contains("char_class"));
    }

    #[test]
    fn translates_character_property_to_runtime_predicate() {
        let src = "PEG g(word)\nword <- alpha+;\nEND;\n";
        let (tree, root) = parse_source(src).unwrap();
        let rules = RuleTable::build(&tree, root, src);
        let entry = rules.get("word").unwrap();
        let emitter = ExprEmitter { tree: &tree, source: src, rules: &rules };
        let out = emitter.expression(entry.expression);
        assert!(out.contains("is_alpha"));
    }
}
