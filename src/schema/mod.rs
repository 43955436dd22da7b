//! Keyword schema catalog.
//!
//! Schema metadata is not required for parsing — decks full of unrecognized
//! keywords still load — but when available it supplies:
//! - the set of sections a keyword is valid in
//! - item (parameter) names for records
//! - prefix completions filtered by section context
//!
//! The catalog is constructed once and passed by reference wherever it is
//! needed; there is no process-wide instance, so tests can substitute a
//! fixture catalog.

mod catalog;

pub use catalog::{KeywordInfo, SchemaCatalog, SECTION_NAMES};
