//! The rule table: resolves a grammar's `identifier` references to the
//! `expression` each names.

use indexmap::IndexMap;

use crate::ast::{NodeId, NodeKind, Tree};

/// Maps rule name to the `expression` child of its defining `definition`.
/// Built with an [`IndexMap`] so iteration order matches definition order,
/// which the emitter's AST-type declaration relies on for a stable variant
/// ordering; lookups otherwise behave like an ordinary hash map.
///
/// The header's declared name is deliberately *not* entered into this
/// table as a rule: the start expression it introduces is anonymous (no
/// `NodeKind` variant, no generated function of its own — see
/// [`crate::emit::emit`], which inlines [`Self::start_expression`]
/// directly into the body of the generated `parse` function).
pub struct RuleTable<'s> {
    rules: IndexMap<&'s str, RuleEntry>,
    start_name: &'s str,
    start_expression: NodeId,
}

#[derive(Debug, Clone, Copy)]
pub struct RuleEntry {
    pub definition: NodeId,
    pub expression: NodeId,
    pub attribute: Option<NodeKind>,
}

impl<'s> RuleTable<'s> {
    /// Walks the `grammar` node's `header` and `definition` children,
    /// building the name table. Duplicate definitions overwrite earlier
    /// ones — last definition wins, per the accepted reading of the
    /// specification's duplicate-rule open question (see DESIGN.md).
    pub fn build(tree: &Tree, grammar: NodeId, source: &'s str) -> Self {
        let mut rules = IndexMap::new();
        let children = tree.children(grammar);
        let header = children[0];
        let header_children = tree.children(header);
        let start_name_node = header_children[0];
        let start_ident = tree.children(start_name_node)[0];
        let start_name = tree.text(start_ident, source);
        let start_expr_wrapper = header_children[1];
        let start_expression = tree.children(start_expr_wrapper)[0];

        for &def in &children[1..] {
            let def_children = tree.children(def);
            let (attribute, rest) = match tree.kind(def_children[0]) {
                NodeKind::Attribute => {
                    let attr_leaf = tree.children(def_children[0]);
                    let kind = if attr_leaf.is_empty() {
                        tree.kind(def_children[0])
                    } else {
                        tree.kind(attr_leaf[0])
                    };
                    (Some(kind), &def_children[1..])
                }
                _ => (None, &def_children[..]),
            };
            let name_node = tree.children(rest[0])[0];
            let name = tree.text(name_node, source);
            let expression = rest[1];
            rules.insert(name, RuleEntry { definition: def, expression, attribute });
        }

        RuleTable { rules, start_name, start_expression }
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry> {
        self.rules.get(name)
    }

    /// The name the header declares for this grammar. Not a key into this
    /// table — see the type-level doc comment.
    pub fn start_name(&self) -> &'s str {
        self.start_name
    }

    /// The `expression` the header's `startExpr` wrapper names. The
    /// emitter translates this directly into the body of `parse`.
    pub fn start_expression(&self) -> NodeId {
        self.start_expression
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.rules.iter().map(|(name, entry)| (*name, entry))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
