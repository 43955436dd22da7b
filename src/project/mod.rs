//! Loading decks from disk.

mod loader;

pub use loader::{load_deck, load_deck_with_schema_dir};
