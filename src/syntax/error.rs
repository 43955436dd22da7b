//! Parse error and result types.
//!
//! The parser recovers from malformed input rather than aborting: errors are
//! collected alongside whatever tree could be produced. Decks frequently
//! contain user-defined or unrecognized keywords, so hard failure is reserved
//! for input the reader cannot make any sense of.

/// A recoverable error found while reading deck text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    /// One-based line where the problem was found.
    pub line: u32,
}

impl ParseError {
    pub fn new(message: impl Into<String>, line: u32) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Parse result containing content and any recovered errors.
#[derive(Debug)]
pub struct ParseResult<T> {
    /// The parsed content; `None` only when nothing could be recovered.
    pub content: Option<T>,
    pub errors: Vec<ParseError>,
}

impl<T> ParseResult<T> {
    pub fn ok(content: T) -> Self {
        Self {
            content: Some(content),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(errors: Vec<ParseError>) -> Self {
        Self {
            content: None,
            errors,
        }
    }

    pub fn with_content_and_errors(content: T, errors: Vec<ParseError>) -> Self {
        Self {
            content: Some(content),
            errors,
        }
    }

    /// Check if parsing succeeded without errors.
    pub fn is_ok(&self) -> bool {
        self.content.is_some() && self.errors.is_empty()
    }

    /// Check if there are any recovered errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
