//! The combinator runtime prologue: a self-contained copy of the runtime,
//! written as plain Rust source and emitted verbatim ahead of the
//! generated AST and rule functions. The emitted artifact must compile
//! against nothing but `std`, so this cannot simply be
//! `include_str!`-ed from [`crate::runtime`] — that module depends on this
//! crate's own [`crate::ast::Tree`] arena, which the standalone output has
//! no use for (a freshly parsed value tree owns its children directly, no
//! arena indirection is needed once there is no compiler-internal borrow
//! to juggle).

/// Returns the prologue source text, parameterized only by the `NodeKind`
/// enum name the emitter writes immediately below it (see
/// [`crate::emit::ast_types`]).
pub fn render() -> &'static str {
    r#"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind { UnexpectedEof, UnexpectedChar, NoMatches }

#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: FailureKind,
    pub pos: usize,
    pub rule_stack: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub enum Node {
    Leaf { kind: NodeKind, start: usize, end: usize },
    Value { kind: NodeKind, start: usize, end: usize, children: Vec<Node> },
}

impl Node {
    pub fn start(&self) -> usize {
        match self { Node::Leaf { start, .. } | Node::Value { start, .. } => *start }
    }
    pub fn end(&self) -> usize {
        match self { Node::Leaf { end, .. } | Node::Value { end, .. } => *end }
    }
    pub fn kind(&self) -> NodeKind {
        match self { Node::Leaf { kind, .. } | Node::Value { kind, .. } => *kind }
    }
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start()..self.end()]
    }
    pub fn children(&self) -> &[Node] {
        match self { Node::Leaf { .. } => &[], Node::Value { children, .. } => children }
    }
}

pub enum MatchValue { Void, One(Node), Many(Vec<Node>) }

impl MatchValue {
    fn append_into(self, out: &mut Vec<Node>) {
        match self {
            MatchValue::Void => {}
            MatchValue::One(n) => out.push(n),
            MatchValue::Many(ns) => out.extend(ns),
        }
    }
}

fn normalize(mut out: Vec<Node>) -> MatchValue {
    match out.len() {
        0 => MatchValue::Void,
        1 => MatchValue::One(out.pop().unwrap()),
        _ => MatchValue::Many(out),
    }
}

pub type MatchResult = Result<MatchValue, Failure>;

const MAX_RECURSION_DEPTH: u32 = 4096;

pub struct ParseState<'s> {
    pub source: &'s str,
    pos: usize,
    rule_stack: Vec<&'static str>,
    furthest_pos: usize,
    furthest: Vec<Failure>,
    depth: u32,
}

impl<'s> ParseState<'s> {
    pub fn new(source: &'s str) -> Self {
        ParseState { source, pos: 0, rule_stack: Vec::new(), furthest_pos: 0, furthest: Vec::new(), depth: 0 }
    }
    pub fn pos(&self) -> usize { self.pos }
    pub fn eof(&self) -> bool { self.pos >= self.source.len() }
    pub fn rest(&self) -> &'s str { &self.source[self.pos..] }
    pub fn furthest_failures(&self) -> &[Failure] { &self.furthest }

    fn fail(&mut self, kind: FailureKind) -> Failure {
        let failure = Failure { kind, pos: self.pos, rule_stack: self.rule_stack.clone() };
        match failure.pos.cmp(&self.furthest_pos) {
            std::cmp::Ordering::Greater => {
                self.furthest_pos = failure.pos;
                self.furthest.clear();
                self.furthest.push(failure.clone());
            }
            std::cmp::Ordering::Equal => self.furthest.push(failure.clone()),
            std::cmp::Ordering::Less => {}
        }
        failure
    }

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
                Ok(match shape {
                    RuleShape::Void => RuleOutput::Void,
                    RuleShape::Leaf(kind) => RuleOutput::Node(Node::Leaf { kind, start, end }),
                    RuleShape::Value(kind) => {
                        let mut children = Vec::new();
                        value.append_into(&mut children);
                        RuleOutput::Node(Node::Value { kind, start, end, children })
                    }
                })
            }
            Err(failure) => { self.pos = start; Err(failure) }
        }
    }
}

pub enum RuleShape { Void, Leaf(NodeKind), Value(NodeKind) }
pub enum RuleOutput { Void, Node(Node) }
impl RuleOutput {
    pub fn node(self) -> Node {
        match self { RuleOutput::Node(n) => n, RuleOutput::Void => panic!("void rule has no AST node") }
    }
}

pub fn literal<'s>(bytes: &'static str) -> impl Fn(&mut ParseState<'s>) -> MatchResult {
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

pub fn any<'s>(state: &mut ParseState<'s>) -> MatchResult {
    match state.rest().chars().next() {
        Some(c) => { state.pos += c.len_utf8(); Ok(MatchValue::Void) }
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

pub fn satisfying<'s>(f: impl Fn(char) -> bool + 'static) -> impl Fn(&mut ParseState<'s>) -> MatchResult {
    move |state| match state.rest().chars().next() {
        Some(c) if f(c) => { state.pos += c.len_utf8(); Ok(MatchValue::Void) }
        Some(_) => Err(state.fail(FailureKind::UnexpectedChar)),
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

pub fn char_class<'s>(ranges: &'static [(u32, u32)]) -> impl Fn(&mut ParseState<'s>) -> MatchResult {
    move |state| match state.rest().chars().next() {
        Some(c) if ranges.iter().any(|&(lo, hi)| (c as u32) >= lo && (c as u32) <= hi) => {
            state.pos += c.len_utf8();
            Ok(MatchValue::Void)
        }
        Some(_) => Err(state.fail(FailureKind::UnexpectedChar)),
        None => Err(state.fail(FailureKind::UnexpectedEof)),
    }
}

macro_rules! property_predicate {
    ($name:ident, $test:expr) => {
        pub fn $name<'s>(state: &mut ParseState<'s>) -> MatchResult {
            match state.rest().chars().next() {
                Some(c) if ($test)(c) => { state.pos += c.len_utf8(); Ok(MatchValue::Void) }
                Some(_) => Err(state.fail(FailureKind::UnexpectedChar)),
                None => Err(state.fail(FailureKind::UnexpectedEof)),
            }
        }
    };
}

property_predicate!(is_alnum, |c: char| c.is_alphanumeric());
property_predicate!(is_alpha, |c: char| c.is_alphabetic());
property_predicate!(is_ascii, |c: char| c.is_ascii());
property_predicate!(is_control, |c: char| c.is_control());
property_predicate!(is_ddigit, |c: char| c.is_ascii_digit());
property_predicate!(is_digit, |c: char| c.is_numeric());
property_predicate!(is_graph, |c: char| c.is_ascii_graphic());
property_predicate!(is_lower, |c: char| c.is_lowercase());
property_predicate!(is_print, |c: char| !c.is_control());
property_predicate!(is_punct, |c: char| c.is_ascii_punctuation());
property_predicate!(is_space, |c: char| c.is_whitespace());
property_predicate!(is_upper, |c: char| c.is_uppercase());
property_predicate!(is_wordchar, |c: char| c.is_alphanumeric() || c == '_');
property_predicate!(is_xdigit, |c: char| c.is_ascii_hexdigit());

pub type Matcher<'s, 'm> = dyn Fn(&mut ParseState<'s>) -> MatchResult + 'm;

pub fn sequence<'s>(state: &mut ParseState<'s>, matchers: &[&Matcher<'s, '_>]) -> MatchResult {
    let start = state.pos;
    let mut out = Vec::new();
    for m in matchers {
        match m(state) {
            Ok(value) => value.append_into(&mut out),
            Err(failure) => { state.pos = start; return Err(failure); }
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
        Err(_) => { state.pos = start; Ok(MatchValue::Void) }
    }
}

pub fn repeat<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let mut out = Vec::new();
    loop {
        let before = state.pos;
        match m(state) {
            Ok(value) => {
                value.append_into(&mut out);
                if state.pos == before { break; }
            }
            Err(_) => { state.pos = before; break; }
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
        Err(failure) => { state.pos = start; Err(failure) }
    }
}

pub fn and_p<'s>(state: &mut ParseState<'s>, m: &Matcher<'s, '_>) -> MatchResult {
    let start = state.pos;
    let result = m(state);
    state.pos = start;
    result.map(|_| MatchValue::Void)
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
"#
}
