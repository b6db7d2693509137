//! The bootstrap grammar parser: a hand-written recursive-descent parser for
//! the grammar-description language, built entirely from
//! [`crate::runtime`]'s combinators. This is the combinator library's first
//! real user — every production below is a thin wrapper that snapshots the
//! cursor, calls into `sequence`/`choice`/`repeat`/etc., and lets
//! [`crate::runtime::ParseState::run_rule`] materialize the matched span
//! into an AST node.

pub mod error;
pub mod grammar;

pub use error::ParseError;
pub use grammar::parse_source;
