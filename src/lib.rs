//! # deck-base
//!
//! Core library for simulation input-deck editing: parsing, the structural
//! deck model, text/position mapping, include resolution, and the
//! text-vs-model synchronization protocol.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! sync      → selection/text synchronization controller
//!   ↓
//! project   → deck loading from disk
//!   ↓
//! model     → Deck/Section/Keyword model, serialization, line mapping,
//!             include resolution
//!   ↓
//! parser    → Logos lexer, line-oriented recovering deck reader
//!   ↓
//! syntax    → DeckTree value types, ParseError/ParseResult
//!   ↓
//! schema    → keyword schema catalog (section validity, item names)
//!   ↓
//! base      → primitives (LineRange)
//! ```

// ============================================================================
// MODULES (dependency order: base → schema → syntax → parser → model → ...)
// ============================================================================

/// Foundation types: LineRange
pub mod base;

/// Keyword schema catalog: section validity, item names, completions
pub mod schema;

/// Syntax: structural tree value types, ParseError/ParseResult
pub mod syntax;

/// Parser: Logos lexer, line-oriented recovering deck reader
pub mod parser;

/// Structural model: Deck, sections, keywords, positions, includes
pub mod model;

/// Project management: loading decks from disk
pub mod project;

/// Synchronization between structural selection and deck text
pub mod sync;

// Re-export foundation and model types
pub use base::LineRange;
pub use model::{
    Deck, DeckError, IncludeFile, Keyword, KeywordAddress, KeywordKind, Section, SectionKind,
};
pub use schema::{KeywordInfo, SchemaCatalog};
pub use sync::{DeckId, SyncController, SyncError};
pub use syntax::{DeckItem, DeckKeyword, DeckRecord, DeckTree, ItemValue, ParseError, ParseResult};
