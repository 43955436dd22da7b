//! Logos-based lexer for deck text
//!
//! Fast tokenization using the logos crate. The deck format is line
//! oriented, so newlines are emitted as tokens and the lexer tracks the
//! one-based line of every token.

use logos::Logos;

/// Token kinds as seen by the deck reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Newline,
    /// Record / keyword-body terminator.
    Slash,
    /// Quoted string, quotes included in the token text.
    Quoted,
    /// `N*` or `N*value` repeat shorthand.
    Repeat,
    /// Bare `*`: one defaulted item.
    Star,
    Integer,
    Decimal,
    /// Bare word: keyword names, mnemonics, unquoted strings.
    Word,
    Error,
}

/// A token with its kind, text, and one-based source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: u32,
}

impl Token<'_> {
    /// Whitespace and comments carry no structure.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            line: 1,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let line = self.line;

        let kind = match logos_token {
            Ok(t) => {
                if t == LogosToken::Newline {
                    self.line += 1;
                }
                t.into()
            }
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, line })
    }
}

/// Tokenize an entire string into a Vec.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r"--[^\n]*")]
    Comment,

    #[token("\n")]
    Newline,

    // =========================================================================
    // STRUCTURE
    // =========================================================================
    #[token("/")]
    Slash,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"'[^'\n]*'")]
    SingleQuoted,

    #[regex(r#""[^"\n]*""#)]
    DoubleQuoted,

    // Repeat shorthand must come before Integer/Star so `3*` lexes whole
    #[regex(r#"[0-9]+\*[^'" \t\r\n/]*"#)]
    Repeat,

    #[token("*")]
    Star,

    #[regex(r"[+-]?[0-9]+")]
    Integer,

    // Fortran-style D exponents appear in real decks alongside E
    #[regex(r"[+-]?[0-9]+\.[0-9]*([eEdD][+-]?[0-9]+)?")]
    #[regex(r"[+-]?\.[0-9]+([eEdD][+-]?[0-9]+)?")]
    #[regex(r"[+-]?[0-9]+[eEdD][+-]?[0-9]+")]
    Decimal,

    #[regex(r"[A-Za-z][A-Za-z0-9_.\-]*")]
    Word,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Whitespace => TokenKind::Whitespace,
            LogosToken::Comment => TokenKind::Comment,
            LogosToken::Newline => TokenKind::Newline,
            LogosToken::Slash => TokenKind::Slash,
            LogosToken::SingleQuoted | LogosToken::DoubleQuoted => TokenKind::Quoted,
            LogosToken::Repeat => TokenKind::Repeat,
            LogosToken::Star => TokenKind::Star,
            LogosToken::Integer => TokenKind::Integer,
            LogosToken::Decimal => TokenKind::Decimal,
            LogosToken::Word => TokenKind::Word,
        }
    }
}
