//! The grammar AST produced by the bootstrap parser ([`crate::parser`]) and
//! consumed by the checker and emitter.
//!
//! Every node is one of two shapes: a [`Node::Leaf`] carrying only a span,
//! or a [`Node::Value`] additionally carrying an ordered list of children.
//! This mirrors a sum type rather than a class hierarchy — dispatch on
//! [`NodeKind`] replaces virtual calls.

use crate::arena::{Arena, Id};
use crate::span::Span;

pub type NodeId = Id<Node>;

/// The tag distinguishing every grammar AST shape.
///
/// `Char` here is the composite wrapper described by the tree-shape table:
/// it always has exactly one child, drawn from the five `Char*` leaf kinds
/// below. There is no separate bare-leaf `Char` kind — see DESIGN.md for why
/// the overlap between the leaf list and the composite table in the source
/// specification is read this way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Leaf kinds
    Ident,
    CharUnescaped,
    CharSpecial,
    CharOctalFull,
    CharOctalPart,
    CharUnicode,
    Void,
    Leaf,
    And,
    Not,
    Question,
    Star,
    Plus,
    Dot,
    // Composite kinds
    Grammar,
    Header,
    StartExpr,
    Definition,
    Attribute,
    Expression,
    Sequence,
    Prefix,
    Suffix,
    Primary,
    Literal,
    Class,
    Range,
    Identifier,
    Char,
}

impl NodeKind {
    /// Whether this kind is always represented as a [`Node::Leaf`].
    pub fn is_leaf_kind(self) -> bool {
        matches!(
            self,
            NodeKind::Ident
                | NodeKind::CharUnescaped
                | NodeKind::CharSpecial
                | NodeKind::CharOctalFull
                | NodeKind::CharOctalPart
                | NodeKind::CharUnicode
                | NodeKind::Void
                | NodeKind::Leaf
                | NodeKind::And
                | NodeKind::Not
                | NodeKind::Question
                | NodeKind::Star
                | NodeKind::Plus
                | NodeKind::Dot
        )
    }
}

/// One node of the grammar AST.
#[derive(Debug, Clone)]
pub enum Node {
    Leaf { kind: NodeKind, span: Span },
    Value { kind: NodeKind, span: Span, children: Vec<NodeId> },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf { kind, .. } => *kind,
            Node::Value { kind, .. } => *kind,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::Leaf { span, .. } => *span,
            Node::Value { span, .. } => *span,
        }
    }

    pub fn start(&self) -> u32 {
        self.span().start
    }

    pub fn end(&self) -> u32 {
        self.span().end
    }

    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Leaf { .. } => &[],
            Node::Value { children, .. } => children,
        }
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span().text(source)
    }
}

/// The arena-backed grammar tree: every node is addressed by [`NodeId`], and
/// the tree owns no borrows into the source text it describes.
#[derive(Debug)]
pub struct Tree {
    arena: Arena<Node>,
    root: Option<NodeId>,
}

impl Tree {
    pub fn new() -> Self {
        Tree { arena: Arena::new(), root: None }
    }

    pub fn alloc_leaf(&mut self, kind: NodeKind, span: Span) -> NodeId {
        debug_assert!(kind.is_leaf_kind());
        self.arena.alloc(Node::Leaf { kind, span })
    }

    pub fn alloc_value(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        debug_assert!(!kind.is_leaf_kind());
        self.arena.alloc(Node::Value { kind, span, children })
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> NodeId {
        self.root.expect("tree root set after a successful parse")
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }

    pub fn text<'s>(&self, id: NodeId, source: &'s str) -> &'s str {
        self.node(id).text(source)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_and_value_round_trip() {
        let mut tree = Tree::new();
        let leaf = tree.alloc_leaf(NodeKind::Ident, Span::new(0, 4));
        let value = tree.alloc_value(NodeKind::Identifier, Span::new(0, 4), vec![leaf]);
        tree.set_root(value);
        assert_eq!(tree.kind(tree.root()), NodeKind::Identifier);
        assert_eq!(tree.children(tree.root()), &[leaf]);
        assert_eq!(tree.text(leaf, "rule"), "rule");
    }
}
