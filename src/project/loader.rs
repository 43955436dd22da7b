//! Deck file loading.
//!
//! Reads a deck file, parses it, and builds the structural model. Parse
//! problems are logged and tolerated as long as a tree could be produced;
//! only unreadable or completely unparsable files fail.

use std::path::{Path, PathBuf};

use crate::model::{Deck, DeckError};
use crate::parser;
use crate::schema::SchemaCatalog;

/// Load and build a deck from a file on disk.
pub fn load_deck(path: impl Into<PathBuf>, schema: &SchemaCatalog) -> Result<Deck, DeckError> {
    let path = path.into();
    let text = std::fs::read_to_string(&path).map_err(|err| DeckError::io(&path, err))?;

    let result = parser::parse(&text);
    for error in &result.errors {
        tracing::warn!(path = %path.display(), %error, "problem while reading deck");
    }
    let Some(tree) = result.content else {
        return Err(DeckError::Unparsable {
            path,
            errors: result.errors,
        });
    };

    Ok(Deck::build(&tree, path, schema))
}

/// Load a deck with keyword definitions taken from a schema directory.
///
/// Convenience wrapper for callers that keep per-keyword definition files
/// next to their decks; falls back to the builtin catalog when the
/// directory yields nothing.
pub fn load_deck_with_schema_dir(
    path: impl Into<PathBuf>,
    schema_dir: impl AsRef<Path>,
) -> Result<Deck, DeckError> {
    let schema_dir = schema_dir.as_ref();
    let schema = SchemaCatalog::load_from_dir(schema_dir)
        .map_err(|err| DeckError::io(schema_dir, err))?;
    load_deck(path, &schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_load_deck_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CASE.DATA");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "RUNSPEC\nDIMENS\n10 10 5 /").unwrap();

        let deck = load_deck(&path, &SchemaCatalog::builtin()).unwrap();
        assert_eq!(deck.keyword_count(), 2);
        assert_eq!(deck.base_dir(), dir.path());
        // Raw source was captured for round-trip serialization
        assert!(deck.raw_source().is_some());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_deck("/nonexistent/CASE.DATA", &SchemaCatalog::builtin()).unwrap_err();
        assert!(matches!(err, DeckError::Io { .. }));
    }

    #[test]
    fn test_load_tolerates_recoverable_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CASE.DATA");
        std::fs::write(&path, "RUNSPEC\nDIMENS\n10 10 ??? /\n").unwrap();

        let deck = load_deck(&path, &SchemaCatalog::builtin()).unwrap();
        assert_eq!(deck.keyword_count(), 2);
    }
}
