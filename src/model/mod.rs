//! The structural deck model.
//!
//! A [`Deck`] owns the parsed contents of one file: sections partitioning the
//! keyword sequence, per-keyword line ranges into the serialized text, and
//! the resolved include files (each holding a nested `Deck` of its own).
//!
//! Three coupled representations are kept synchronized here:
//! 1. the structural tree (sections → keywords → records → items)
//! 2. the plain-text serialization of that tree
//! 3. the keyword → line-range mapping between the two

mod deck;
mod error;
mod include;
mod positions;
mod serialize;

pub use deck::{Deck, Keyword, KeywordAddress, KeywordKind, Section, SectionKind};
pub use error::DeckError;
pub use include::IncludeFile;
