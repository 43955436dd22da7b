//! Structural tree types and parse results.
//!
//! The [`DeckTree`] is the parser's output: a flat, ordered sequence of
//! keywords, each holding ordered records of typed items. It carries no file
//! metadata and no line information — the model layer derives sections,
//! positions, and includes from it.

mod error;
mod tree;

pub use error::{ParseError, ParseResult};
pub use tree::{DeckItem, DeckKeyword, DeckRecord, DeckTree, ItemValue};
