//! Keyword-to-line-range mapping.
//!
//! Maps each keyword of a deck onto the span of its serialized text using a
//! first-unconsumed-match scan: keyword name lines are claimed in model
//! order, so repeated keywords map to successive occurrences. Ranges are
//! disjoint; a keyword that cannot be matched gets no range rather than a
//! guessed one.

use smol_str::SmolStr;

use crate::base::LineRange;

use super::deck::Deck;

/// Recompute every keyword's text range against the deck's serialization.
pub(crate) fn annotate(deck: &mut Deck) {
    let text = deck.serialize();
    let keys: Vec<(SmolStr, bool)> = deck
        .sections
        .iter()
        .flat_map(|s| {
            s.keywords
                .iter()
                .map(|k| (k.name.clone(), k.is_section_header()))
        })
        .collect();

    let ranges = compute_ranges(&keys, &text);
    let mut it = ranges.into_iter();
    for section in &mut deck.sections {
        for keyword in &mut section.keywords {
            keyword.set_text_range(it.next().flatten());
        }
    }
}

/// Compute line ranges for a keyword sequence against its text.
///
/// `keys` holds `(name, is_header)` pairs in model order. Header keywords
/// span their name line only; other keywords extend to their terminating
/// lone `/` line, or end before the next keyword's own name line (flag
/// keywords have no terminator), or at the last non-blank line when neither
/// is found. Every matched line is consumed so no two ranges overlap.
pub(crate) fn compute_ranges(keys: &[(SmolStr, bool)], text: &str) -> Vec<Option<LineRange>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut used = vec![false; lines.len()];
    let mut ranges = Vec::with_capacity(keys.len());

    for (idx, (name, is_header)) in keys.iter().enumerate() {
        let found = lines
            .iter()
            .enumerate()
            .position(|(i, line)| !used[i] && line.trim() == name.as_str());
        let Some(m) = found else {
            ranges.push(None);
            continue;
        };
        used[m] = true;
        let start = (m + 1) as u32;

        if *is_header {
            ranges.push(Some(LineRange::single(start)));
            continue;
        }

        let remaining = &keys[idx + 1..];
        let mut end = None;
        let mut last_nonempty = start;
        for (j, line) in lines.iter().enumerate().skip(m + 1) {
            if used[j] {
                // Already claimed; the block ended
                break;
            }
            let trimmed = line.trim();
            // A later keyword's name line closes this block implicitly and
            // stays unconsumed so that keyword can claim it
            if remaining.iter().any(|(n, _)| trimmed == n.as_str()) {
                break;
            }
            if trimmed == "/" {
                used[j] = true;
                end = Some((j + 1) as u32);
                break;
            }
            used[j] = true;
            if !trimmed.is_empty() {
                last_nonempty = (j + 1) as u32;
            }
        }
        let end = end.unwrap_or_else(|| last_nonempty.max(start));
        ranges.push(Some(LineRange::new(start, end)));
    }
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Deck;
    use crate::parser::parse;
    use crate::schema::SchemaCatalog;

    fn ranges_of(text: &str) -> Vec<(String, Option<LineRange>)> {
        let tree = parse(text).content.unwrap();
        let deck = Deck::build(&tree, "/nonexistent/TEST.DATA", &SchemaCatalog::builtin());
        deck.keywords()
            .map(|(_, kw)| (kw.name.to_string(), kw.text_range()))
            .collect()
    }

    #[test]
    fn test_canonical_layout_ranges() {
        // Canonical text: RUNSPEC on line 1, blank, DIMENS block on 3-5,
        // blank, OIL on line 7
        let ranges = ranges_of("RUNSPEC\nDIMENS\n10 10 5 /\nOIL\n");
        assert_eq!(ranges[0], ("RUNSPEC".into(), Some(LineRange::single(1))));
        assert_eq!(ranges[1], ("DIMENS".into(), Some(LineRange::new(3, 5))));
        assert_eq!(ranges[2], ("OIL".into(), Some(LineRange::single(7))));
    }

    #[test]
    fn test_header_spans_single_line() {
        let ranges = ranges_of("RUNSPEC\nGRID\n");
        assert_eq!(ranges[0].1, Some(LineRange::single(1)));
        assert_eq!(ranges[1].1, Some(LineRange::single(3)));
    }

    #[test]
    fn test_repeated_keywords_claim_successive_occurrences() {
        let keys = [
            (SmolStr::new("TSTEP"), false),
            (SmolStr::new("TSTEP"), false),
        ];
        let text = "TSTEP\n  1  /\n/\n\nTSTEP\n  2  /\n/\n";
        let ranges = compute_ranges(&keys, text);
        assert_eq!(ranges[0], Some(LineRange::new(1, 3)));
        assert_eq!(ranges[1], Some(LineRange::new(5, 7)));
    }

    #[test]
    fn test_flag_keywords_get_disjoint_single_line_ranges() {
        let ranges = ranges_of("RUNSPEC\nOIL\nWATER\nGAS\n");
        assert_eq!(ranges[0], ("RUNSPEC".into(), Some(LineRange::single(1))));
        assert_eq!(ranges[1], ("OIL".into(), Some(LineRange::single(3))));
        assert_eq!(ranges[2], ("WATER".into(), Some(LineRange::single(5))));
        assert_eq!(ranges[3], ("GAS".into(), Some(LineRange::single(7))));
    }

    #[test]
    fn test_flag_block_does_not_swallow_following_keyword() {
        // No blank lines and no terminators between the flags, so only the
        // next keyword's name line can end each block
        let keys = [
            (SmolStr::new("OIL"), false),
            (SmolStr::new("GAS"), false),
            (SmolStr::new("PORO"), false),
        ];
        let ranges = compute_ranges(&keys, "OIL\nGAS\nPORO\n 0.3 /\n");
        assert_eq!(ranges[0], Some(LineRange::single(1)));
        assert_eq!(ranges[1], Some(LineRange::single(2)));
        assert_eq!(ranges[2], Some(LineRange::new(3, 4)));
    }

    #[test]
    fn test_unmatched_keyword_gets_no_range() {
        let keys = [(SmolStr::new("DIMENS"), false)];
        let ranges = compute_ranges(&keys, "PORO\n  0.25  /\n");
        assert_eq!(ranges, vec![None]);
    }

    #[test]
    fn test_flag_keyword_spans_name_line_only() {
        let keys = [(SmolStr::new("OIL"), false), (SmolStr::new("WATER"), false)];
        let ranges = compute_ranges(&keys, "OIL\n\nWATER\n\n");
        assert_eq!(ranges[0], Some(LineRange::single(1)));
        assert_eq!(ranges[1], Some(LineRange::single(3)));
    }

    #[test]
    fn test_unterminated_block_ends_at_last_nonempty_line() {
        let keys = [(SmolStr::new("DIMENS"), false)];
        let ranges = compute_ranges(&keys, "DIMENS\n  10  10  5\n\n");
        assert_eq!(ranges[0], Some(LineRange::new(1, 2)));
    }

    #[test]
    fn test_ranges_are_disjoint() {
        let ranges = ranges_of("RUNSPEC\nDIMENS\n10 10 5 /\nGRID\nPORO\n3*0.25 /\n");
        let spans: Vec<LineRange> = ranges.iter().filter_map(|(_, r)| *r).collect();
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn test_find_keyword_at_line() {
        let tree = parse("RUNSPEC\nDIMENS\n10 10 5 /\n").content.unwrap();
        let deck = Deck::build(&tree, "/nonexistent/TEST.DATA", &SchemaCatalog::builtin());

        assert_eq!(deck.find_keyword_at_line(1).map(|k| k.name.as_str()), Some("RUNSPEC"));
        assert_eq!(deck.find_keyword_at_line(4).map(|k| k.name.as_str()), Some("DIMENS"));
        // Blank separator line belongs to no keyword
        assert_eq!(deck.find_keyword_at_line(2).map(|k| k.name.as_str()), None);
    }
}
