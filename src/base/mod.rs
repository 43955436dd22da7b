//! Foundation types for the deck toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`LineRange`] - One-based inclusive line spans in deck text
//!
//! This module has NO dependencies on other deckbase modules.

mod line_range;

pub use line_range::LineRange;
