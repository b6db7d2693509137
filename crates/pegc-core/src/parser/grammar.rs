//! One function per grammar production in the tree-shape table. Every
//! function is a thin combinator expression wrapped in
//! [`ParseState::run_rule`]; none of them inspect characters directly except
//! through `literal`/`satisfying`/`any`.

use crate::ast::{NodeId, NodeKind};
use crate::runtime::{
    Failure, MatchValue, ParseState, RuleShape, and_p, choice, literal, not_p, optional, repeat,
    repeat_plus, satisfying, sequence,
};
use crate::span::Span;

use super::error::{self, ParseError};

fn is_ident_start(c: char) -> bool {
    c == '_' || c == ':' || c.is_ascii_alphabetic()
}

fn is_ident_cont(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn is_octal_digit(c: char) -> bool {
    ('0'..='7').contains(&c)
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Consumes whitespace and `#`-line-comments. Not a production of its own;
/// called after every token-producing rule to implement trailing-trivia
/// consumption.
fn skip_ws(state: &mut ParseState<'_>) {
    loop {
        let before = state.pos();
        let ws = satisfying(|c: char| c == ' ' || c == '\t' || c == '\n' || c == '\r');
        while ws(state).is_ok() {}
        if state.rest().starts_with('#') {
            let not_nl = satisfying(|c: char| c != '\n');
            while not_nl(state).is_ok() {}
        }
        if state.pos() == before {
            break;
        }
    }
}

/// Matches a fixed punctuation/keyword token, then consumes trailing
/// whitespace. Contributes no AST node.
fn tok<'s>(state: &mut ParseState<'s>, text: &str) -> Result<(), Failure> {
    literal(text)(state)?;
    skip_ws(state);
    Ok(())
}

/// Top-level entry point: consumes leading whitespace once, parses a
/// `grammar`, and requires the whole input be consumed.
pub fn parse_source(source: &str) -> Result<(crate::ast::Tree, NodeId), ParseError> {
    let mut state = ParseState::new(source);
    skip_ws(&mut state);
    match parse_grammar(&mut state) {
        Ok(root) if state.eof() => Ok((state.into_tree(), root)),
        Ok(_) => Err(error::furthest_error(state.furthest_failures())),
        Err(_) => Err(error::furthest_error(state.furthest_failures())),
    }
}

pub fn parse_grammar(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("grammar", RuleShape::Value(NodeKind::Grammar), |state| {
            let mut children = Vec::new();
            children.push(parse_header(state)?);
            loop {
                // `parse_definition` restores its own cursor via `run_rule`
                // on failure, so a failed attempt here leaves the cursor
                // exactly where the loop should stop.
                match parse_definition(state) {
                    Ok(def) => children.push(def),
                    Err(_) => break,
                }
            }
            tok(state, "END")?;
            tok(state, ";")?;
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_header(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("header", RuleShape::Value(NodeKind::Header), |state| {
            tok(state, "PEG")?;
            not_p(state, &literal_ident_cont())?;
            let name = parse_identifier(state)?;
            tok(state, "(")?;
            let start_expr = parse_start_expr(state)?;
            tok(state, ")")?;
            Ok(MatchValue::Many(vec![name, start_expr]))
        })
        .map(|out| out.node())
}

fn literal_ident_cont<'s>() -> impl Fn(&mut ParseState<'s>) -> crate::runtime::MatchResult {
    satisfying(is_ident_cont)
}

pub fn parse_start_expr(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("start_expr", RuleShape::Value(NodeKind::StartExpr), |state| {
            let expr = parse_expression(state)?;
            Ok(MatchValue::One(expr))
        })
        .map(|out| out.node())
}

pub fn parse_definition(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("definition", RuleShape::Value(NodeKind::Definition), |state| {
            let mut children = Vec::new();
            if let Ok(attr) = parse_attribute(state) {
                children.push(attr);
            }
            children.push(parse_identifier(state)?);
            tok(state, "<-")?;
            children.push(parse_expression(state)?);
            tok(state, ";")?;
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_attribute(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("attribute", RuleShape::Value(NodeKind::Attribute), |state| {
            let start = state.pos();
            let marker = choice(state, &[&literal("void"), &literal("leaf")]);
            let kind = match marker {
                Ok(_) => {
                    let text = &state.source[start..state.pos()];
                    if text == "void" { NodeKind::Void } else { NodeKind::Leaf }
                }
                Err(failure) => return Err(failure),
            };
            not_p(state, &literal_ident_cont())?;
            skip_ws(state);
            let span = Span::new(start as u32, state.pos() as u32);
            let leaf = state.alloc_leaf(kind, span);
            tok(state, ":")?;
            Ok(MatchValue::One(leaf))
        })
        .map(|out| out.node())
}

pub fn parse_expression(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("expression", RuleShape::Value(NodeKind::Expression), |state| {
            let mut children = vec![parse_sequence(state)?];
            loop {
                let before = state.pos();
                if tok(state, "/").is_err() {
                    state.restore_to(before);
                    break;
                }
                match parse_sequence(state) {
                    Ok(seq) => children.push(seq),
                    Err(failure) => {
                        state.restore_to(before);
                        return Err(failure);
                    }
                }
            }
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_sequence(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("sequence", RuleShape::Value(NodeKind::Sequence), |state| {
            let mut children = vec![parse_prefix(state)?];
            loop {
                let before = state.pos();
                match parse_prefix(state) {
                    Ok(prefix) => children.push(prefix),
                    Err(_) => {
                        state.restore_to(before);
                        break;
                    }
                }
            }
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_prefix(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("prefix", RuleShape::Value(NodeKind::Prefix), |state| {
            let mut children = Vec::new();
            let start = state.pos();
            if tok(state, "&").is_ok() {
                children.push(state.alloc_leaf(NodeKind::And, Span::new(start as u32, start as u32 + 1)));
            } else if tok(state, "!").is_ok() {
                children.push(state.alloc_leaf(NodeKind::Not, Span::new(start as u32, start as u32 + 1)));
            }
            children.push(parse_suffix(state)?);
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_suffix(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("suffix", RuleShape::Value(NodeKind::Suffix), |state| {
            let mut children = vec![parse_primary(state)?];
            let start = state.pos();
            if tok(state, "?").is_ok() {
                children.push(state.alloc_leaf(NodeKind::Question, Span::new(start as u32, start as u32 + 1)));
            } else if tok(state, "*").is_ok() {
                children.push(state.alloc_leaf(NodeKind::Star, Span::new(start as u32, start as u32 + 1)));
            } else if tok(state, "+").is_ok() {
                children.push(state.alloc_leaf(NodeKind::Plus, Span::new(start as u32, start as u32 + 1)));
            }
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_primary(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("primary", RuleShape::Value(NodeKind::Primary), |state| {
            if let Ok(id) = parse_identifier(state) {
                return Ok(MatchValue::One(id));
            }
            let before = state.pos();
            if tok(state, "(").is_ok() {
                match parse_expression(state) {
                    Ok(expr) => {
                        tok(state, ")")?;
                        return Ok(MatchValue::One(expr));
                    }
                    Err(failure) => {
                        state.restore_to(before);
                        return Err(failure);
                    }
                }
            }
            if let Ok(lit) = parse_literal(state) {
                return Ok(MatchValue::One(lit));
            }
            if let Ok(class) = parse_class(state) {
                return Ok(MatchValue::One(class));
            }
            let dot_start = state.pos();
            tok(state, ".")?;
            Ok(MatchValue::One(state.alloc_leaf(NodeKind::Dot, Span::new(dot_start as u32, dot_start as u32 + 1))))
        })
        .map(|out| out.node())
}

pub fn parse_literal(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("literal", RuleShape::Value(NodeKind::Literal), |state| {
            let quote = if state.rest().starts_with('\'') {
                '\''
            } else if state.rest().starts_with('"') {
                '"'
            } else {
                return Err(literal("'")(state).unwrap_err());
            };
            literal(&quote.to_string())(state)?;
            let mut children = Vec::new();
            loop {
                if state.rest().starts_with(quote) {
                    break;
                }
                match parse_char(state) {
                    Ok(c) => children.push(c),
                    Err(failure) => return Err(failure),
                }
            }
            literal(&quote.to_string())(state)?;
            skip_ws(state);
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_class(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("class", RuleShape::Value(NodeKind::Class), |state| {
            tok(state, "[")?;
            let mut children = Vec::new();
            while !state.rest().starts_with(']') {
                children.push(parse_range(state)?);
            }
            tok(state, "]")?;
            Ok(MatchValue::Many(children))
        })
        .map(|out| out.node())
}

pub fn parse_range(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("range", RuleShape::Value(NodeKind::Range), |state| {
            let lo = parse_char(state)?;
            let before = state.pos();
            if literal("-")(state).is_ok() && !state.rest().starts_with(']') {
                match parse_char(state) {
                    Ok(hi) => return Ok(MatchValue::Many(vec![lo, hi])),
                    Err(_) => state.restore_to(before),
                }
            } else {
                state.restore_to(before);
            }
            Ok(MatchValue::One(lo))
        })
        .map(|out| out.node())
}

pub fn parse_identifier(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("identifier", RuleShape::Value(NodeKind::Identifier), |state| {
            let ident_start = state.pos();
            satisfying(is_ident_start)(state)?;
            while satisfying(is_ident_cont)(state).is_ok() {}
            let ident_end = state.pos();
            let leaf = state.alloc_leaf(NodeKind::Ident, Span::new(ident_start as u32, ident_end as u32));
            skip_ws(state);
            Ok(MatchValue::One(leaf))
        })
        .map(|out| out.node())
}

/// The composite `char` node: exactly one child drawn from the five
/// `Char*` leaf kinds. See [`crate::ast::NodeKind`] for why there is no
/// separate bare-leaf `Char` variant.
pub fn parse_char(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    state
        .run_rule("char", RuleShape::Value(NodeKind::Char), |state| {
            let leaf = parse_char_leaf(state)?;
            Ok(MatchValue::One(leaf))
        })
        .map(|out| out.node())
}

fn parse_char_leaf(state: &mut ParseState<'_>) -> Result<NodeId, Failure> {
    let start = state.pos();

    if state.rest().starts_with('\\') {
        let rest = &state.rest()[1..];
        if rest.starts_with('u') {
            let hex_start = start + 2;
            let mut end = hex_start;
            let digits = &state.source[hex_start..];
            for (i, c) in digits.char_indices().take(5) {
                if !is_hex_digit(c) {
                    break;
                }
                end = hex_start + i + c.len_utf8();
            }
            if end > hex_start {
                state.restore_to(end);
                return Ok(state.alloc_leaf(NodeKind::CharUnicode, Span::new(start as u32, end as u32)));
            }
        }

        if let Some(c) = rest.chars().next() {
            if matches!(c, 'n' | 'r' | 't' | '\'' | '"' | '[' | ']' | '\\' | '-') {
                let end = start + 1 + c.len_utf8();
                state.restore_to(end);
                return Ok(state.alloc_leaf(NodeKind::CharSpecial, Span::new(start as u32, end as u32)));
            }
        }

        let octal_start = start + 1;
        let digits = &state.source[octal_start..];
        let mut octal_chars = digits.chars().take(3);
        if let Some(d0) = octal_chars.next() {
            if ('0'..='2').contains(&d0) {
                let d1 = octal_chars.next();
                let d2 = octal_chars.next();
                if let (Some(d1), Some(d2)) = (d1, d2) {
                    if is_octal_digit(d1) && is_octal_digit(d2) {
                        let end = octal_start + 3;
                        state.restore_to(end);
                        return Ok(
                            state.alloc_leaf(NodeKind::CharOctalFull, Span::new(start as u32, end as u32))
                        );
                    }
                }
            }
        }

        let mut part_chars = digits.chars().take(2);
        if let Some(d0) = part_chars.next() {
            if is_octal_digit(d0) {
                let mut end = octal_start + 1;
                if let Some(d1) = part_chars.next() {
                    if is_octal_digit(d1) {
                        end = octal_start + 2;
                    }
                }
                state.restore_to(end);
                return Ok(
                    state.alloc_leaf(NodeKind::CharOctalPart, Span::new(start as u32, end as u32))
                );
            }
        }

        return Err(crate::runtime::Failure {
            kind: crate::runtime::FailureKind::UnexpectedChar,
            pos: start,
            rule_stack: Vec::new(),
        });
    }

    match state.rest().chars().next() {
        Some(c) => {
            let end = start + c.len_utf8();
            state.restore_to(end);
            Ok(state.alloc_leaf(NodeKind::CharUnescaped, Span::new(start as u32, end as u32)))
        }
        None => Err(crate::runtime::Failure {
            kind: crate::runtime::FailureKind::UnexpectedEof,
            pos: start,
            rule_stack: Vec::new(),
        }),
    }
}

/// Decodes a `Char*` leaf's source text into the Unicode scalar value it
/// denotes. Shared with the emitter, which needs the same decoding to
/// expand literal and class-range endpoints into runtime values.
pub fn decode_char(kind: NodeKind, text: &str) -> u32 {
    match kind {
        NodeKind::CharUnescaped => text.chars().next().expect("non-empty char text") as u32,
        NodeKind::CharSpecial => {
            let c = text.chars().nth(1).expect("escape marker");
            match c {
                'n' => '\n' as u32,
                'r' => '\r' as u32,
                't' => '\t' as u32,
                other => other as u32,
            }
        }
        NodeKind::CharOctalFull | NodeKind::CharOctalPart => {
            u32::from_str_radix(&text[1..], 8).expect("validated octal digits")
        }
        NodeKind::CharUnicode => u32::from_str_radix(&text[2..], 16).expect("validated hex digits"),
        other => panic!("{other:?} is not a char leaf kind"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn parse_ok(src: &str) -> (crate::ast::Tree, NodeId) {
        parse_source(src).unwrap_or_else(|e| panic!("parse failed: {e:?}"))
    }

    #[test]
    fn parses_trivial_grammar() {
        let (tree, root) = parse_ok(indoc! {"
            PEG trivial(greeting)
            greeting <- 'hello';
            END;
        "});
        assert_eq!(tree.kind(root), NodeKind::Grammar);
    }

    #[test]
    fn parses_attributes_and_classes() {
        let (tree, root) = parse_ok(indoc! {"
            PEG digits(num)
            leaf: num <- [0-9]+;
            END;
        "});
        let children = tree.children(root);
        assert_eq!(children.len(), 2);
        let def = tree.node(children[1]);
        assert_eq!(def.kind(), NodeKind::Definition);
    }

    #[test]
    fn rejects_unterminated_input() {
        assert!(parse_source("PEG x(a) a <- 'a';").is_err());
    }

    #[test]
    fn decodes_char_escapes() {
        assert_eq!(decode_char(NodeKind::CharSpecial, "\\n"), '\n' as u32);
        assert_eq!(decode_char(NodeKind::CharOctalFull, "\\101"), 0o101);
        assert_eq!(decode_char(NodeKind::CharUnicode, "\\u41"), 0x41);
    }
}
