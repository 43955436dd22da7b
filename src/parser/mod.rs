//! Deck text parser.
//!
//! A line-oriented, warn-recovering reader for the keyword/record/item deck
//! format. The rest of the crate depends only on the [`parse`] entry point
//! and the [`DeckTree`](crate::syntax::DeckTree) it produces, so a different
//! grammar backend can be substituted behind the same interface.

pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;

pub use parser::parse;
