//! Error types for deck model operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::syntax::ParseError;

/// Errors that can occur while loading or rebuilding a deck.
#[derive(Debug, Error)]
pub enum DeckError {
    /// IO error reading a deck file.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The deck text could not be parsed at all.
    #[error("{}: deck text did not parse", path.display())]
    Unparsable {
        path: PathBuf,
        errors: Vec<ParseError>,
    },
}

impl DeckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
