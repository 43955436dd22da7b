//! Canonical text generation for decks without usable raw source.
//!
//! Reconstruction loses comments and the author's exact spacing, so it is
//! only used as a fallback; decks that still have their original text
//! serialize that verbatim.

use crate::syntax::ItemValue;

use super::deck::Deck;

/// Render the deck's structural contents in canonical layout:
/// - section header line followed by a blank line
/// - keyword name on its own line
/// - one line per record, items separated by two spaces, closed with `/`
/// - keywords with records get a lone `/` terminator line
/// - a blank line after every keyword block
pub(crate) fn canonical_text(deck: &Deck) -> String {
    let mut out = String::new();

    for section in &deck.sections {
        for keyword in &section.keywords {
            if keyword.is_section_header() {
                out.push_str(&keyword.name);
                out.push_str("\n\n");
                continue;
            }

            out.push_str(&keyword.name);
            out.push('\n');
            for record in &keyword.records {
                out.push_str("  ");
                for item in &record.items {
                    out.push_str(&fmt_item(&item.value));
                    out.push_str("  ");
                }
                out.push_str("/\n");
            }
            if !keyword.records.is_empty() {
                out.push_str("/\n");
            }
            out.push('\n');
        }
    }
    out
}

fn fmt_item(value: &ItemValue) -> String {
    match value {
        ItemValue::Int(v) => v.to_string(),
        ItemValue::Double(v) => fmt_double(*v),
        ItemValue::Str(s) => {
            if needs_quoting(s) {
                format!("'{s}'")
            } else {
                s.clone()
            }
        }
        ItemValue::Defaulted => "*".to_string(),
    }
}

/// Integral doubles keep one decimal place so they read back as doubles.
fn fmt_double(v: f64) -> String {
    if v == v.trunc() && v.abs() < 1e15 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Strings with whitespace or path separators must be quoted to survive a
/// round trip through the reader.
fn needs_quoting(s: &str) -> bool {
    s.is_empty() || s.contains(char::is_whitespace) || s.contains('/')
}
