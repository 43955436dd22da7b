//! Text/model synchronization.

mod controller;

pub use controller::{DeckId, SyncController, SyncError};
