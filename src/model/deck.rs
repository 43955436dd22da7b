//! Deck, section, and keyword model types.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::LineRange;
use crate::schema::SchemaCatalog;
use crate::syntax::{DeckKeyword, DeckRecord, DeckTree};

use super::include::{self, IncludeFile};
use super::{positions, serialize};

/// Keywords with more items than this are reported as large arrays and
/// summarized instead of enumerated.
pub const LARGE_ARRAY_THRESHOLD: usize = 100;

/// The fixed set of recognized section types, plus `Other` for the synthetic
/// pre-header section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SectionKind {
    Runspec,
    Grid,
    Edit,
    Props,
    Regions,
    Solution,
    Summary,
    Schedule,
    #[default]
    Other,
}

impl SectionKind {
    /// Map a keyword name onto a section type; non-header names yield `Other`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "RUNSPEC" => Self::Runspec,
            "GRID" => Self::Grid,
            "EDIT" => Self::Edit,
            "PROPS" => Self::Props,
            "REGIONS" => Self::Regions,
            "SOLUTION" => Self::Solution,
            "SUMMARY" => Self::Summary,
            "SCHEDULE" => Self::Schedule,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Runspec => "RUNSPEC",
            Self::Grid => "GRID",
            Self::Edit => "EDIT",
            Self::Props => "PROPS",
            Self::Regions => "REGIONS",
            Self::Solution => "SOLUTION",
            Self::Summary => "SUMMARY",
            Self::Schedule => "SCHEDULE",
            Self::Other => "OTHER",
        }
    }

    pub fn is_header(&self) -> bool {
        *self != Self::Other
    }
}

/// Which flavor of keyword this is, decided once at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordKind {
    Plain,
    /// An include directive referencing another deck file.
    Include {
        /// Referenced path as literally written (quotes stripped).
        as_written: String,
        /// Index into the owning deck's `include_files`, once resolved.
        target: Option<usize>,
    },
}

/// One named directive occupying a contiguous text span.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: SmolStr,
    pub records: Vec<DeckRecord>,
    pub kind: KeywordKind,
    pub(crate) text_range: Option<LineRange>,
}

impl Keyword {
    fn from_tree(kw: &DeckKeyword, schema: &SchemaCatalog) -> Self {
        let info = schema.info(&kw.name);
        let records: Vec<DeckRecord> = kw
            .records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                if let Some(info) = info {
                    for (idx, item) in record.items.iter_mut().enumerate() {
                        if item.name.is_none() {
                            item.name = info.item_name(idx).cloned();
                        }
                    }
                }
                record
            })
            .collect();

        let kind = if kw.name == "INCLUDE" {
            KeywordKind::Include {
                as_written: extract_include_path(&records),
                target: None,
            }
        } else {
            KeywordKind::Plain
        };

        Self {
            name: kw.name.clone(),
            records,
            kind,
            text_range: None,
        }
    }

    /// Line span in the deck's serialized text, once position mapping ran.
    pub fn text_range(&self) -> Option<LineRange> {
        self.text_range
    }

    pub(crate) fn set_text_range(&mut self, range: Option<LineRange>) {
        self.text_range = range;
    }

    /// Whether this keyword opens one of the fixed sections.
    pub fn is_section_header(&self) -> bool {
        SectionKind::from_name(&self.name).is_header()
    }

    pub fn is_include(&self) -> bool {
        matches!(self.kind, KeywordKind::Include { .. })
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Total item count across all records.
    pub fn total_items(&self) -> usize {
        self.records.iter().map(|r| r.items.len()).sum()
    }

    /// Bulk data arrays are summarized rather than browsed item by item.
    pub fn is_large_array(&self) -> bool {
        self.total_items() > LARGE_ARRAY_THRESHOLD
    }

    /// One-line summary for large arrays: item count, record count, and the
    /// dominant value type.
    pub fn summary(&self) -> String {
        let data_type = self
            .records
            .first()
            .and_then(|r| r.items.first())
            .map(|item| item.value.type_name())
            .unwrap_or("MIXED");
        format!(
            "Large array: {} items, {} records, Type: {}",
            self.total_items(),
            self.record_count(),
            data_type
        )
    }
}

/// Extract the referenced path from an INCLUDE keyword's first record.
fn extract_include_path(records: &[DeckRecord]) -> String {
    records
        .first()
        .and_then(|r| r.items.first())
        .and_then(|item| match &item.value {
            crate::syntax::ItemValue::Str(s) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

/// A contiguous span of keywords beginning at a section header (or the
/// synthetic pre-header section for keywords before any header).
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub name: SmolStr,
    pub keywords: Vec<Keyword>,
}

impl Section {
    fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            name: SmolStr::new_static(kind.as_str()),
            keywords: Vec::new(),
        }
    }

    /// The synthetic section holding keywords that precede the first header.
    fn pre_header() -> Self {
        Self {
            kind: SectionKind::Other,
            name: SmolStr::new_static("Pre-RUNSPEC"),
            keywords: Vec::new(),
        }
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }
}

/// Identifies one keyword inside a deck by section and keyword index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeywordAddress {
    pub section: usize,
    pub keyword: usize,
}

/// One parsed deck file and its structural contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Deck {
    pub(crate) file_path: PathBuf,
    pub(crate) base_dir: PathBuf,
    /// Original file text, preferred for serialization round-trip.
    pub(crate) raw_source: Option<String>,
    pub(crate) sections: Vec<Section>,
    pub(crate) include_files: Vec<IncludeFile>,
}

impl Deck {
    /// Build a deck from a structural tree and the file it was parsed from.
    ///
    /// Walks the keyword sequence once, opening a new section at every header
    /// keyword, then annotates line ranges and resolves include directives.
    /// Deterministic and idempotent: building twice from the same input
    /// replaces rather than accumulates.
    pub fn build(tree: &DeckTree, file_path: impl AsRef<Path>, schema: &SchemaCatalog) -> Deck {
        let mut visited = FxHashSet::default();
        Self::build_inner(tree, file_path.as_ref(), schema, &mut visited)
    }

    pub(crate) fn build_inner(
        tree: &DeckTree,
        file_path: &Path,
        schema: &SchemaCatalog,
        visited: &mut FxHashSet<PathBuf>,
    ) -> Deck {
        let base_dir = base_dir_of(file_path);
        let raw_source = std::fs::read_to_string(file_path).ok();
        visited.insert(include::normalize_path(file_path));

        let mut deck = Deck {
            file_path: file_path.to_path_buf(),
            base_dir,
            raw_source,
            sections: build_sections(tree, schema),
            include_files: Vec::new(),
        };
        positions::annotate(&mut deck);
        include::resolve(&mut deck, schema, visited);
        deck
    }

    /// Replace the structural contents in place from a fresh parse.
    ///
    /// `file_path` and `base_dir` are untouched. When `source` is given it
    /// becomes the deck's raw text (the text the new tree was parsed from),
    /// keeping serialization and include resolution in step with it.
    pub fn update_from_tree(
        &mut self,
        tree: &DeckTree,
        source: Option<&str>,
        schema: &SchemaCatalog,
    ) {
        self.sections = build_sections(tree, schema);
        if let Some(text) = source {
            self.raw_source = Some(text.to_string());
        }
        positions::annotate(self);

        let mut visited = FxHashSet::default();
        visited.insert(include::normalize_path(&self.file_path));
        include::resolve(self, schema, &mut visited);
    }

    /// Serialize the deck to text.
    ///
    /// Prefers the original raw source (preserving the author's formatting
    /// and comments) when it is available and the file still exists; only
    /// regenerates canonical text as a fallback, since reconstruction loses
    /// comments and exact spacing.
    pub fn serialize(&self) -> String {
        if let Some(raw) = &self.raw_source {
            if self.file_path.is_file() {
                return raw.clone();
            }
        }
        serialize::canonical_text(self)
    }

    /// Find the first keyword whose text range contains the given line.
    ///
    /// Returns `None` if position mapping has not run or no keyword covers
    /// the line.
    pub fn find_keyword_at_line(&self, line: u32) -> Option<&Keyword> {
        let addr = self.find_address_at_line(line)?;
        self.keyword_at(addr)
    }

    /// Address variant of [`find_keyword_at_line`](Self::find_keyword_at_line).
    pub fn find_address_at_line(&self, line: u32) -> Option<KeywordAddress> {
        for (s, section) in self.sections.iter().enumerate() {
            for (k, keyword) in section.keywords.iter().enumerate() {
                if let Some(range) = keyword.text_range {
                    if range.contains(line) {
                        return Some(KeywordAddress {
                            section: s,
                            keyword: k,
                        });
                    }
                }
            }
        }
        None
    }

    pub fn keyword_at(&self, addr: KeywordAddress) -> Option<&Keyword> {
        self.sections.get(addr.section)?.keywords.get(addr.keyword)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn raw_source(&self) -> Option<&str> {
        self.raw_source.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn include_files(&self) -> &[IncludeFile] {
        &self.include_files
    }

    /// Total keyword count across all sections (headers included).
    pub fn keyword_count(&self) -> usize {
        self.sections.iter().map(Section::keyword_count).sum()
    }

    /// Keyword names in file order, across sections.
    pub fn keyword_names(&self) -> Vec<SmolStr> {
        self.sections
            .iter()
            .flat_map(|s| s.keywords.iter().map(|k| k.name.clone()))
            .collect()
    }

    /// Iterate keywords in file order with their addresses.
    pub fn keywords(&self) -> impl Iterator<Item = (KeywordAddress, &Keyword)> {
        self.sections.iter().enumerate().flat_map(|(s, section)| {
            section
                .keywords
                .iter()
                .enumerate()
                .map(move |(k, keyword)| {
                    (
                        KeywordAddress {
                            section: s,
                            keyword: k,
                        },
                        keyword,
                    )
                })
        })
    }
}

fn base_dir_of(file_path: &Path) -> PathBuf {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Partition the tree's keyword sequence into sections.
///
/// Sections partition the sequence with no gaps or overlaps; a header
/// keyword opens its section and is kept inside it as a single-line keyword.
fn build_sections(tree: &DeckTree, schema: &SchemaCatalog) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for kw in &tree.keywords {
        let kind = SectionKind::from_name(&kw.name);
        if kind.is_header() {
            sections.push(Section::new(kind));
        } else if sections.is_empty() {
            sections.push(Section::pre_header());
        }
        if let Some(section) = sections.last_mut() {
            section.keywords.push(Keyword::from_tree(kw, schema));
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build_from(text: &str) -> Deck {
        let tree = parse(text).content.unwrap();
        Deck::build(&tree, "/nonexistent/TEST.DATA", &SchemaCatalog::builtin())
    }

    #[test]
    fn test_sections_partition_keywords() {
        let deck = build_from("RUNSPEC\nDIMENS\n10 10 5 /\nGRID\nPORO\n0.25 /\n");

        assert_eq!(deck.sections.len(), 2);
        assert_eq!(deck.sections[0].kind, SectionKind::Runspec);
        assert_eq!(deck.sections[1].kind, SectionKind::Grid);

        // Header keywords stay inside their own sections
        let names: Vec<_> = deck.keyword_names();
        assert_eq!(names, vec!["RUNSPEC", "DIMENS", "GRID", "PORO"]);
        assert_eq!(deck.keyword_count(), 4);
    }

    #[test]
    fn test_pre_header_section() {
        let deck = build_from("ECHO\nRUNSPEC\nOIL\n");

        assert_eq!(deck.sections.len(), 2);
        assert_eq!(deck.sections[0].kind, SectionKind::Other);
        assert_eq!(deck.sections[0].name, "Pre-RUNSPEC");
        assert_eq!(deck.sections[0].keywords[0].name, "ECHO");
        assert_eq!(deck.sections[1].kind, SectionKind::Runspec);
    }

    #[test]
    fn test_no_pre_header_when_file_starts_with_header() {
        let deck = build_from("RUNSPEC\nOIL\n");
        assert_eq!(deck.sections.len(), 1);
        assert_eq!(deck.sections[0].kind, SectionKind::Runspec);
    }

    #[test]
    fn test_item_names_attached_from_schema() {
        let deck = build_from("RUNSPEC\nDIMENS\n10 20 5 /\n");
        let dimens = &deck.sections[0].keywords[1];
        let items = &dimens.records[0].items;
        assert_eq!(items[0].name.as_deref(), Some("NX"));
        assert_eq!(items[1].name.as_deref(), Some("NY"));
        assert_eq!(items[2].name.as_deref(), Some("NZ"));
    }

    #[test]
    fn test_include_keyword_variant() {
        let deck = build_from("RUNSPEC\nINCLUDE\n'sub/PROPS.DATA' /\n");
        let include = &deck.sections[0].keywords[1];
        assert!(include.is_include());
        match &include.kind {
            KeywordKind::Include { as_written, .. } => {
                assert_eq!(as_written, "sub/PROPS.DATA");
            }
            KeywordKind::Plain => panic!("expected include keyword"),
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let text = "RUNSPEC\nDIMENS\n10 10 5 /\nGRID\n";
        let tree = parse(text).content.unwrap();
        let schema = SchemaCatalog::builtin();

        let first = Deck::build(&tree, "/nonexistent/TEST.DATA", &schema);
        let second = Deck::build(&tree, "/nonexistent/TEST.DATA", &schema);
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_from_tree_replaces_contents() {
        let schema = SchemaCatalog::builtin();
        let mut deck = build_from("RUNSPEC\nOIL\n");
        assert_eq!(deck.keyword_count(), 2);

        let new_text = "RUNSPEC\nOIL\nWATER\nGRID\nPORO\n0.25 /\n";
        let tree = parse(new_text).content.unwrap();
        deck.update_from_tree(&tree, Some(new_text), &schema);

        assert_eq!(
            deck.keyword_names(),
            vec!["RUNSPEC", "OIL", "WATER", "GRID", "PORO"]
        );
        assert_eq!(deck.file_name(), "TEST.DATA");
        assert_eq!(deck.raw_source(), Some(new_text));
    }

    #[test]
    fn test_large_array_summary() {
        let values = vec!["0.25"; 150].join(" ");
        let deck = build_from(&format!("GRID\nPORO\n{values} /\n"));
        let poro = &deck.sections[0].keywords[1];

        assert!(poro.is_large_array());
        assert_eq!(poro.summary(), "Large array: 150 items, 1 records, Type: DOUBLE");

        let deck = build_from("RUNSPEC\nDIMENS\n10 10 5 /\n");
        assert!(!deck.sections[0].keywords[1].is_large_array());
    }

    #[test]
    fn test_section_kind_round_trip() {
        for name in crate::schema::SECTION_NAMES {
            let kind = SectionKind::from_name(name);
            assert!(kind.is_header());
            assert_eq!(kind.as_str(), name);
        }
        assert_eq!(SectionKind::from_name("DIMENS"), SectionKind::Other);
    }
}
