//! Bidirectional synchronization between deck models and text buffers.
//!
//! A [`SyncController`] owns one editing session per open deck: the deck
//! model, a text buffer, and a modified flag. Selection flows both ways:
//! picking a keyword in the model highlights its lines in the text, and
//! moving the cursor in the text selects the covering keyword in the model.
//! A reentrancy guard keeps each direction from echoing back as the other.
//!
//! Text edits only touch the buffer; the model is rebuilt atomically on
//! [`apply_text`](SyncController::apply_text) and left untouched when the
//! edited text does not parse.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::base::LineRange;
use crate::model::{Deck, DeckError, Keyword, KeywordAddress};
use crate::parser;
use crate::project;
use crate::schema::SchemaCatalog;
use crate::syntax::ParseError;

/// Stable handle for one open deck session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeckId(u32);

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no open deck with id {0:?}")]
    UnknownDeck(DeckId),

    #[error("buffer has no pending edits")]
    CleanBuffer,

    #[error("edited text does not parse: {}", fmt_errors(errors))]
    ParseFailed { errors: Vec<ParseError> },

    #[error(transparent)]
    Deck(#[from] DeckError),
}

fn fmt_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ParseError::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

struct Session {
    id: DeckId,
    deck: Deck,
    buffer: String,
    modified: bool,
    cursor_line: u32,
    selection: Option<KeywordAddress>,
}

/// Coordinates open decks and keeps their two representations in step.
pub struct SyncController {
    schema: SchemaCatalog,
    sessions: Vec<Session>,
    active: Option<DeckId>,
    next_id: u32,
    /// Set while a model-side selection is being pushed into the text, so
    /// the resulting cursor move does not echo back as a text-side event.
    updating_from_model: bool,
}

impl SyncController {
    pub fn new(schema: SchemaCatalog) -> Self {
        Self {
            schema,
            sessions: Vec::new(),
            active: None,
            next_id: 0,
            updating_from_model: false,
        }
    }

    /// Open a session for an already-built deck and make it active.
    pub fn open(&mut self, deck: Deck) -> DeckId {
        let id = DeckId(self.next_id);
        self.next_id += 1;

        let buffer = deck.serialize();
        self.sessions.push(Session {
            id,
            deck,
            buffer,
            modified: false,
            cursor_line: 1,
            selection: None,
        });
        self.active = Some(id);
        debug!(?id, "opened deck session");
        id
    }

    /// Load a deck from disk and open a session for it.
    pub fn open_path(&mut self, path: impl Into<PathBuf>) -> Result<DeckId, SyncError> {
        let deck = project::load_deck(path, &self.schema)?;
        Ok(self.open(deck))
    }

    /// Make an open session the active one.
    pub fn activate(&mut self, id: DeckId) -> Result<(), SyncError> {
        self.session(id)?;
        self.active = Some(id);
        Ok(())
    }

    pub fn active_deck(&self) -> Option<DeckId> {
        self.active
    }

    pub fn deck(&self, id: DeckId) -> Result<&Deck, SyncError> {
        Ok(&self.session(id)?.deck)
    }

    /// Current buffer text of a session.
    pub fn text(&self, id: DeckId) -> Result<&str, SyncError> {
        Ok(&self.session(id)?.buffer)
    }

    pub fn is_modified(&self, id: DeckId) -> Result<bool, SyncError> {
        Ok(self.session(id)?.modified)
    }

    pub fn selection(&self, id: DeckId) -> Result<Option<KeywordAddress>, SyncError> {
        Ok(self.session(id)?.selection)
    }

    pub fn cursor_line(&self, id: DeckId) -> Result<u32, SyncError> {
        Ok(self.session(id)?.cursor_line)
    }

    /// Model-side selection: a keyword was picked in the structure view.
    ///
    /// Returns the keyword's line range so the text view can highlight and
    /// scroll to it. A keyword without a mapped range returns `None` and
    /// leaves the cursor where it was.
    pub fn keyword_selected(
        &mut self,
        id: DeckId,
        addr: KeywordAddress,
    ) -> Result<Option<LineRange>, SyncError> {
        let session = self.session_mut(id)?;
        let Some(range) = session.deck.keyword_at(addr).and_then(Keyword::text_range) else {
            session.selection = Some(addr);
            return Ok(None);
        };

        session.selection = Some(addr);
        self.updating_from_model = true;
        let moved = self.cursor_moved(id, range.start);
        self.updating_from_model = false;
        moved?;
        Ok(Some(range))
    }

    /// Text-side selection: the cursor moved to a line in the text view.
    ///
    /// Returns the address of the keyword covering that line so the
    /// structure view can select it, or `None` for lines outside any
    /// keyword (selection is left unchanged). Suppressed while a model-side
    /// selection is being applied.
    pub fn cursor_moved(
        &mut self,
        id: DeckId,
        line: u32,
    ) -> Result<Option<KeywordAddress>, SyncError> {
        let from_model = self.updating_from_model;
        let session = self.session_mut(id)?;
        session.cursor_line = line;
        if from_model {
            return Ok(None);
        }

        let Some(addr) = session.deck.find_address_at_line(line) else {
            return Ok(None);
        };
        session.selection = Some(addr);
        Ok(Some(addr))
    }

    /// Record a text edit: replace the buffer and mark the session dirty.
    ///
    /// The model is deliberately not rebuilt here; it keeps serving
    /// (possibly stale) structure until [`apply_text`](Self::apply_text).
    pub fn edit_text(&mut self, id: DeckId, text: impl Into<String>) -> Result<(), SyncError> {
        let session = self.session_mut(id)?;
        session.buffer = text.into();
        session.modified = true;
        Ok(())
    }

    /// Rebuild the model from the edited buffer.
    ///
    /// All-or-nothing: if the buffer does not parse cleanly the model and
    /// the modified flag are left exactly as they were and the parse errors
    /// are returned. On success the buffer becomes the deck's raw source,
    /// positions are remapped, includes re-resolved, and the flag cleared.
    pub fn apply_text(&mut self, id: DeckId) -> Result<(), SyncError> {
        let idx = self.session_index(id)?;
        let session = &mut self.sessions[idx];
        if !session.modified {
            return Err(SyncError::CleanBuffer);
        }

        let result = parser::parse(&session.buffer);
        if result.has_errors() {
            return Err(SyncError::ParseFailed {
                errors: result.errors,
            });
        }
        let Some(tree) = result.content else {
            return Err(SyncError::ParseFailed {
                errors: result.errors,
            });
        };

        let buffer = session.buffer.clone();
        let schema = &self.schema;
        let session = &mut self.sessions[idx];
        session.deck.update_from_tree(&tree, Some(&buffer), schema);
        session.modified = false;
        session.selection = None;
        debug!(?id, keywords = session.deck.keyword_count(), "applied text edits");
        Ok(())
    }

    /// Regenerate the buffer from the model, discarding pending edits.
    pub fn refresh_text(&mut self, id: DeckId) -> Result<(), SyncError> {
        let session = self.session_mut(id)?;
        session.buffer = session.deck.serialize();
        session.modified = false;
        Ok(())
    }

    fn session_index(&self, id: DeckId) -> Result<usize, SyncError> {
        self.sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or(SyncError::UnknownDeck(id))
    }

    fn session(&self, id: DeckId) -> Result<&Session, SyncError> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .ok_or(SyncError::UnknownDeck(id))
    }

    fn session_mut(&mut self, id: DeckId) -> Result<&mut Session, SyncError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SyncError::UnknownDeck(id))
    }
}
