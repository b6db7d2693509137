//! The combinator runtime: primitive matchers and combinators operating on a
//! mutable cursor over the grammar source. Both the bootstrap grammar parser
//! ([`crate::parser`]) and every parser function the emitter writes out are
//! built from exactly these primitives — the bootstrap parser is itself the
//! combinator library's first real user.
//!
//! Backtracking is total: every combinator that can fail restores the
//! cursor to its position at entry before returning `Err`.

pub mod charclass;

use crate::ast::{NodeId, NodeKind, Tree};
use crate::span::Span;

pub use charclass::{CharClass, CharProperty};

/// A single parse failure, tagged with the cursor position it occurred at.
/// Positions let the furthest-error heuristic in [`ParseState::failures`]
/// pick the most informative failure out of a backtracked search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    UnexpectedEof,
    UnexpectedChar,
    NoMatches,
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: FailureKind,
    pub pos: usize,
    /// Rule names on the call stack at the point of failure, innermost last.
    pub rule_stack: Vec<&'static str>,
}

pub type MatchResult = Result<MatchValue, Failure>;

/// What a matcher contributed to its caller: nothing, one node, or several
/// (from a `*`/`+` that matched more than once). Combinators concatenate
/// contributions by normalizing each into an append onto a `Vec<NodeId>`.
#[derive(Debug, Clone)]
pub enum MatchValue {
    Void,
    One(NodeId),
    Many(Vec<NodeId>),
}

impl MatchValue {
    pub fn append_into(self, out: &mut Vec<NodeId>) {
        match self {
            MatchValue::Void => {}
            MatchValue::One(id) => out.push(id),
            MatchValue::Many(ids) => out.extend(ids),
        }
    }
}

/// A matcher: given mutable parse state, either advances the cursor and
/// returns its contribution, or fails leaving the cursor where combinators
/// will restore it.
pub type Matcher<'s, 'm> = dyn Fn(&mut ParseState<'s>) -> MatchResult + 'm;

/// Recursion depth at which the bootstrap parser reports
/// [`crate::Error::RecursionLimitExceeded`] instead of overflowing the
/// native call stack. A defensive backstop only: a grammar that passes the
/// checker cannot legitimately recurse this deep.
pub const MAX_RECURSION_DEPTH: u32 = 4096;

/// Mutable state threaded through every matcher invocation: the cursor, the
/// arena nodes are allocated into, the rule-name call stack used for error
/// reporting, and the furthest-failure tracker.
pub struct ParseState<'s> {
    pub source: &'s str,
    pos: usize,
    tree: Tree,
    rule_stack: Vec<&'static str>,
    furthest_pos: usize,
    furthest: Vec<Failure>,
    depth: u32,
}

impl<'s> ParseState<'s> {
    pub fn new(source: &'s str) -> Self {
        ParseState {
            source,
            pos: 0,
            tree: Tree::new(),
            rule_stack: Vec::new(),
            furthest_pos: 0,
            furthest: Vec::new(),
            depth: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    /// Moves the cursor directly to a byte offset already known to be a
    /// char boundary. Used by the bootstrap parser's hand-rolled escape
    /// decoder, which determines the end of a multi-character token (an
    /// octal or `\u` escape) by inspecting the source ahead of the cursor
    /// rather than matching one combinator per digit.
    pub fn restore_to(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    pub fn alloc_leaf(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.tree.alloc_leaf(kind, span)
    }

    pub fn alloc_value(&mut self, kind: NodeKind, span: Span, children: Vec<NodeId>) -> NodeId {
        self.tree.alloc_value(kind, span, children)
    }

    fn fail(&mut self, kind: FailureKind) -> Failure {
        let failure = Failure { kind, pos: self.pos, rule_stack: self.rule_stack.clone() };
        self.record_failure(&failure);
        failure
    }

    fn record_failure(&mut self, failure: &Failure) {
        match failure.pos.cmp(&self.furthest_pos) {
            std::cmp::Ordering::Greater => {
                self.furthest_pos = failure.pos;
                self.furthest.clear();
                self.furthest.push(failure.clone());
            }
            std::cmp::Ordering::Equal => self.furthest.push(failure.clone()),
            std::cmp::Ordering::Less => {}
        }
    }

    /// The furthest-reaching failures accumulated so far, per the standard
    /// PEG "furthest error" heuristic: only the failures at the maximum
    /// position reached are worth reporting.
    pub fn furthest_failures(&self) -> &[Failure] {
        &self.furthest
    }

    /// Pushes `name` onto the rule stack, runs `body`, and on success wraps
    /// the matched span into a node according to `shape`. On failure the
    /// cursor is restored to the position recorded at entry. Every rule
    /// function the bootstrap parser (or emitted code) defines is expected
    /// to be a thin wrapper around this.
    pub fn run_rule(
        &mut self,
        name: &'static str,
        shape: RuleShape,
        body: impl FnOnce(&mut ParseState<'s>) -> MatchResult,
    ) -> Result<RuleOutput, Failure> {
        self.depth += 1;
        if self.depth > MAX_RECURSION_DEPTH {
            self.depth -= 1;
            return Err(Failure { kind: FailureKind::NoMatches, pos: self.pos, rule_stack: self.rule_stack.clone() });
        }
        self.rule_stack.push(name);
        let start = self.pos;
        let result = body(self);
        self.rule_stack.pop();
        self.depth -= 1;

        match result {
            Ok(value) => {
                let end = self.pos;
                let span = Span::new(start as u32, end as u32);
                Ok(match shape {
                    RuleShape::Void => {
                        RuleOutput::Void
                    }
                    RuleShape::Leaf(kind) => RuleOutput::Node(self.alloc_leaf(kind, span)),
                    RuleShape::Value(kind) => {
                        let mut children = Vec::new();
                        value.append_into(&mut children);
                        RuleOutput::Node(self.alloc_value(kind, span, children))
                    }
                })
            }
            Err(failure) => {
                self.pos = start;
                Err(failure)
            }
        }
    }
}

/// How a rule's matched span should be materialized into the AST, mirroring
/// the three attribute shapes a grammar rule can declare.
pub enum RuleShape {
    Void,
    Leaf(NodeKind),
    Value(NodeKind),
}

pub enum RuleOutput {
    Void,
    Node(NodeId),
}

impl RuleOutput {
    pub fn node(self) -> NodeId {
        match self {
            RuleOutput::Node(id) => id,
            RuleOutput::Void => panic!("void rule has no AST node"),
        }
    }
}

// --- Primitive matchers -----------------------------------------------------

pub fn literal<'s>(bytes: &str) -> impl Fn(&mut ParseState<'s>) -> MatchResult + '_ {
    move |state| {
        if state.rest().starts_with(bytes) {
            state.pos += bytes.len();
            Ok(MatchValue::Void)
        } else if state.eof() {
            Err(state.fail(FailureKind::UnexpectedEof))
        } else {
            Err(state.fail(FailureKind::UnexpectedChar))
        }
    }
}

pub fn char_class<'s>(class: &CharClass) -> impl Fn(&mut ParseState<'s>) -> MatchResult + '_ {
    move |state| match state.rest().chars().next() {
        Some(c) if class.contains(c) => {
            state.pos += c.len_utf8();
            Ok(MatchValue::Void)
        }
        Some(_) => Err(state.fail(FailureKind::UnexpectedChar)),
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

pub fn any<'s>(state: &mut ParseState<'s>) -> MatchResult {
    match state.rest().chars().next() {
        Some(c) => {
            state.pos += c.len_utf8();
            Ok(MatchValue::Void)
        }
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

pub fn property<'s>(prop: CharProperty) -> impl Fn(&mut ParseState<'s>) -> MatchResult {
    move |state| match state.rest().chars().next() {
        Some(c) if prop.matches(c) => {
            state.pos += c.len_utf8();
            Ok(MatchValue::Void)
        }
        Some(_) => Err(state.fail(FailureKind::UnexpectedChar)),
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

/// A single-codepoint matcher for an arbitrary predicate, used by the
/// bootstrap parser's own fixed lexical classes (identifier characters,
/// hex/octal digits) where going through a grammar-authored [`CharClass`]
/// would be a detour.
pub fn satisfying<'s>(f: impl Fn(char) -> bool + 's) -> impl Fn(&mut ParseState<'s>) -> MatchResult + 's {
    move |state| match state.rest().chars().next() {
        Some(c) if f(c) => {
            state.pos += c.len_utf8();
            Ok(MatchValue::Void)
        }
        Some(_) => Err(state.fail(FailureKind::UnexpectedChar)),
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

// --- Combinators -------------------------------------------------------------

pub fn sequence<'s>(state: &mut ParseState<'s>, matchers: &[&Matcher<'s, '_>]) -> MatchResult {
    let start = state.pos;
    let mut out = Vec::new();
    for m in matchers {
        match m(state) {
            Ok(value) => value.append_into(&mut out),
            Err(failure) => {
                state.pos = start;
                return Err(failure);
            }
        }
    }
    Ok(normalize(out))
}

pub fn choice<'s>(state: &mut ParseState<'s>, matchers: &[&Matcher<'s, '_>]) -> MatchResult {
    let start = state.pos;
    let mut last_failure = None;
    for m in matchers {
        state.pos = start;
        match m(state) {
            Ok(value) => return Ok(value),
            Err(failure) => last_failure = Some(failure),
        }
    }
    state.pos = start;
    Err(last_failure.unwrap_or_else(|| state.fail(FailureKind::NoMatches)))
}

pub fn optional<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let start = state.pos;
    match m(state) {
        Ok(value) => Ok(value),
        Err(_) => {
            state.pos = start;
            Ok(MatchValue::Void)
        }
    }
}

pub fn repeat<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let mut out = Vec::new();
    loop {
        let before = state.pos;
        match m(state) {
            Ok(value) => {
                if state.pos == before {
                    // A zero-width success would loop forever; treat it as
                    // the end of the repetition rather than spin.
                    value.append_into(&mut out);
                    break;
                }
                value.append_into(&mut out);
            }
            Err(_) => {
                state.pos = before;
                break;
            }
        }
    }
    Ok(normalize(out))
}

pub fn repeat_plus<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let start = state.pos;
    match m(state) {
        Ok(first) => {
            let mut out = Vec::new();
            first.append_into(&mut out);
            match repeat(state, m)? {
                MatchValue::Void => {}
                rest => rest.append_into(&mut out),
            }
            Ok(normalize(out))
        }
        Err(failure) => {
            state.pos = start;
            Err(failure)
        }
    }
}

pub fn and_p<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let start = state.pos;
    let result = m(state);
    state.pos = start;
    match result {
        Ok(_) => Ok(MatchValue::Void),
        Err(failure) => Err(failure),
    }
}

pub fn not_p<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let start = state.pos;
    let result = m(state);
    state.pos = start;
    match result {
        Ok(_) => Err(Failure { kind: FailureKind::NoMatches, pos: start, rule_stack: state.rule_stack.clone() }),
        Err(_) => Ok(MatchValue::Void),
    }
}

fn normalize(mut out: Vec<NodeId>) -> MatchValue {
    match out.len() {
        0 => MatchValue::Void,
        1 => MatchValue::One(out.pop().unwrap()),
        _ => MatchValue::Many(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_advances_on_match() {
        let mut state = ParseState::new("hello world");
        let m = literal("hello");
        assert!(m(&mut state).is_ok());
        assert_eq!(state.pos(), 5);
    }

    #[test]
    fn literal_restores_nothing_on_its_own_failure() {
        let mut state = ParseState::new("goodbye");
        let m = literal("hello");
        assert!(m(&mut state).is_err());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn sequence_backtracks_fully_on_partial_match() {
        let mut state = ParseState::new("ab");
        let a = literal("a");
        let z = literal("z");
        let matchers: [&Matcher<'_, '_>; 2] = [&a, &z];
        assert!(sequence(&mut state, &matchers).is_err());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn choice_tries_alternatives_in_order() {
        let mut state = ParseState::new("bcd");
        let a = literal("a");
        let b = literal("b");
        let matchers: [&Matcher<'_, '_>; 2] = [&a, &b];
        assert!(choice(&mut state, &matchers).is_ok());
        assert_eq!(state.pos(), 1);
    }

    #[test]
    fn optional_never_fails() {
        let mut state = ParseState::new("xyz");
        let a = literal("a");
        assert!(optional(&mut state, &a).is_ok());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn repeat_stops_without_failing() {
        let mut state = ParseState::new("aaab");
        let a = literal("a");
        assert!(repeat(&mut state, &a).is_ok());
        assert_eq!(state.pos(), 3);
    }

    #[test]
    fn repeat_plus_requires_one_match() {
        let mut state = ParseState::new("bbb");
        let a = literal("a");
        assert!(repeat_plus(&mut state, &a).is_err());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn and_predicate_is_zero_width() {
        let mut state = ParseState::new("abc");
        let a = literal("a");
        assert!(and_p(&mut state, &a).is_ok());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn not_predicate_is_zero_width_and_inverts() {
        let mut state = ParseState::new("abc");
        let a = literal("a");
        assert!(not_p(&mut state, &a).is_err());
        let b = literal("b");
        assert!(not_p(&mut state, &b).is_ok());
        assert_eq!(state.pos(), 0);
    }

    #[test]
    fn furthest_failure_survives_backtracking() {
        let mut state = ParseState::new("ab!");
        let abc = sequence(&mut state, &[&literal("a"), &literal("b"), &literal("c")]);
        assert!(abc.is_err());
        let failures = state.furthest_failures();
        assert!(!failures.is_empty());
        assert_eq!(failures[0].pos, 2);
    }
}
