//! Line-oriented deck reader.
//!
//! Builds a [`DeckTree`] from token lines. The reader recovers from
//! malformed input instead of aborting: problems are reported as
//! [`ParseError`]s next to whatever tree could be produced.
//!
//! Shape rules:
//! - a line holding exactly one bare word starts a new keyword, provided no
//!   record items are pending
//! - items accumulate across lines until a `/` closes the record
//! - a `/` with no pending items closes the keyword body
//! - anything after a `/` on the same line is ignored (trailing commentary)
//! - keywords without a body (section headers, flag keywords) are closed
//!   implicitly by the next keyword line

use crate::syntax::{DeckItem, DeckKeyword, DeckRecord, DeckTree, ItemValue, ParseError, ParseResult};

use super::lexer::{Lexer, Token, TokenKind};

/// Parse deck text into a structural tree.
///
/// Always produces a tree; recovered problems are reported in
/// `ParseResult::errors`. Callers that need an all-or-nothing outcome check
/// `is_ok()`.
pub fn parse(text: &str) -> ParseResult<DeckTree> {
    let mut keywords: Vec<DeckKeyword> = Vec::new();
    let mut errors: Vec<ParseError> = Vec::new();
    let mut current: Option<DeckKeyword> = None;
    // Items of the record being accumulated, possibly across lines.
    let mut pending: Vec<DeckItem> = Vec::new();

    for (line_no, tokens) in token_lines(text) {
        if tokens.is_empty() {
            continue;
        }

        if pending.is_empty() && is_keyword_line(&tokens) {
            if let Some(done) = current.take() {
                keywords.push(done);
            }
            current = Some(DeckKeyword::new(tokens[0].text.to_ascii_uppercase()));
            continue;
        }

        if current.is_none() {
            errors.push(ParseError::new(
                format!("content outside of any keyword: '{}'", tokens[0].text),
                line_no,
            ));
            continue;
        }

        for token in &tokens {
            match token.kind {
                TokenKind::Slash => {
                    if pending.is_empty() {
                        if let Some(done) = current.take() {
                            keywords.push(done);
                        }
                    } else if let Some(kw) = current.as_mut() {
                        kw.records.push(DeckRecord::new(std::mem::take(&mut pending)));
                    }
                    // Text after the terminating slash is ignored
                    break;
                }
                TokenKind::Integer => match token.text.parse::<i64>() {
                    Ok(v) => pending.push(DeckItem::new(ItemValue::Int(v))),
                    Err(_) => push_double(&mut pending, &mut errors, token),
                },
                TokenKind::Decimal => push_double(&mut pending, &mut errors, token),
                TokenKind::Quoted => {
                    let inner = &token.text[1..token.text.len() - 1];
                    pending.push(DeckItem::new(ItemValue::Str(inner.to_string())));
                }
                TokenKind::Word => {
                    pending.push(DeckItem::new(ItemValue::Str(token.text.to_string())));
                }
                TokenKind::Star => pending.push(DeckItem::new(ItemValue::Defaulted)),
                TokenKind::Repeat => expand_repeat(&mut pending, &mut errors, token),
                TokenKind::Error => {
                    errors.push(ParseError::new(
                        format!("unrecognized token '{}'", token.text),
                        token.line,
                    ));
                }
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::Newline => {}
            }
        }
    }

    if !pending.is_empty() {
        // EOF inside a record; keep what was read
        if let Some(kw) = current.as_mut() {
            errors.push(ParseError::new(
                format!("unterminated record in keyword '{}'", kw.name),
                last_line(text),
            ));
            kw.records.push(DeckRecord::new(pending));
        }
    }
    if let Some(done) = current.take() {
        keywords.push(done);
    }

    let tree = DeckTree::new(keywords);
    if errors.is_empty() {
        ParseResult::ok(tree)
    } else {
        ParseResult::with_content_and_errors(tree, errors)
    }
}

/// Group significant tokens by source line.
fn token_lines(text: &str) -> Vec<(u32, Vec<Token<'_>>)> {
    let mut lines: Vec<(u32, Vec<Token<'_>>)> = Vec::new();
    let mut line_no = 1u32;
    let mut line: Vec<Token<'_>> = Vec::new();

    for token in Lexer::new(text) {
        if token.kind == TokenKind::Newline {
            lines.push((line_no, std::mem::take(&mut line)));
            line_no += 1;
        } else if !token.is_trivia() {
            line.push(token);
        }
    }
    if !line.is_empty() {
        lines.push((line_no, line));
    }
    lines
}

/// A keyword starts at a line holding exactly one bare word.
fn is_keyword_line(tokens: &[Token<'_>]) -> bool {
    tokens.len() == 1 && tokens[0].kind == TokenKind::Word
}

fn push_double(pending: &mut Vec<DeckItem>, errors: &mut Vec<ParseError>, token: &Token<'_>) {
    // Normalize Fortran D exponents before parsing
    let normalized = token.text.replace(['d', 'D'], "e");
    match normalized.parse::<f64>() {
        Ok(v) => pending.push(DeckItem::new(ItemValue::Double(v))),
        Err(_) => {
            errors.push(ParseError::new(
                format!("invalid number '{}'", token.text),
                token.line,
            ));
        }
    }
}

/// Expand `N*` / `N*value` repeat shorthand into N items.
fn expand_repeat(pending: &mut Vec<DeckItem>, errors: &mut Vec<ParseError>, token: &Token<'_>) {
    let Some((count_text, value_text)) = token.text.split_once('*') else {
        errors.push(ParseError::new(
            format!("malformed repeat '{}'", token.text),
            token.line,
        ));
        return;
    };
    let count = match count_text.parse::<u32>() {
        Ok(c) => c,
        Err(_) => {
            errors.push(ParseError::new(
                format!("invalid repeat count in '{}'", token.text),
                token.line,
            ));
            return;
        }
    };

    let value = if value_text.is_empty() {
        ItemValue::Defaulted
    } else if let Ok(v) = value_text.parse::<i64>() {
        ItemValue::Int(v)
    } else if let Ok(v) = value_text.replace(['d', 'D'], "e").parse::<f64>() {
        ItemValue::Double(v)
    } else {
        ItemValue::Str(value_text.to_string())
    };

    for _ in 0..count {
        pending.push(DeckItem::new(value.clone()));
    }
}

fn last_line(text: &str) -> u32 {
    text.lines().count().max(1) as u32
}
