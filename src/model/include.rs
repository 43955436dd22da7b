//! Include directive resolution.
//!
//! Scans the deck text for INCLUDE directives, resolves each referenced
//! path against the deck's base directory, and recursively builds nested
//! decks for files that exist. Resolution degrades gracefully: missing
//! files, unreadable files, and include cycles are recorded or logged but
//! never fail the owning deck.

use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use tracing::warn;

use crate::parser;
use crate::schema::SchemaCatalog;

use super::deck::{Deck, KeywordKind};

/// One file referenced by an INCLUDE directive.
#[derive(Debug, Clone, PartialEq)]
pub struct IncludeFile {
    /// Path as written in the directive, quotes stripped.
    pub as_written: String,
    /// Directory the path was resolved against.
    pub base_path: PathBuf,
    /// Absolute or base-relative path after resolution.
    pub resolved_path: PathBuf,
    /// Whether the resolved path names an existing regular file.
    pub exists: bool,
    /// Parsed contents, when the file exists and could be read and parsed.
    pub nested: Option<Deck>,
}

impl IncludeFile {
    pub fn file_name(&self) -> String {
        self.resolved_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.as_written.clone())
    }
}

/// Resolve all include directives of `deck`, replacing its include list.
///
/// `visited` holds the normalized paths of every deck on the current
/// resolution chain; a referenced path already in the set is a cycle and is
/// recorded without recursing.
pub(crate) fn resolve(deck: &mut Deck, schema: &SchemaCatalog, visited: &mut FxHashSet<PathBuf>) {
    let source = match deck.raw_source.clone() {
        Some(text) => text,
        None => match std::fs::read_to_string(&deck.file_path) {
            Ok(text) => text,
            Err(_) => {
                deck.include_files = Vec::new();
                link_include_keywords(deck);
                return;
            }
        },
    };

    // Keyed by normalized resolved path so different spellings of the same
    // file yield one entry
    let mut resolved: IndexMap<PathBuf, IncludeFile> = IndexMap::new();
    let base_dir = deck.base_dir.clone();

    for as_written in scan_include_paths(&source) {
        let path = resolve_path(&base_dir, &as_written);
        let norm = normalize_path(&path);
        if resolved.contains_key(&norm) {
            continue;
        }

        let exists = path.is_file();
        let nested = if !exists {
            None
        } else if visited.contains(&norm) {
            warn!(path = %path.display(), "include cycle detected, not descending");
            None
        } else {
            build_nested(&path, schema, visited)
        };

        resolved.insert(
            norm,
            IncludeFile {
                as_written,
                base_path: base_dir.clone(),
                resolved_path: path,
                exists,
                nested,
            },
        );
    }

    deck.include_files = resolved.into_values().collect();
    link_include_keywords(deck);
}

fn build_nested(
    path: &Path,
    schema: &SchemaCatalog,
    visited: &mut FxHashSet<PathBuf>,
) -> Option<Deck> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), %err, "could not read include file");
            return None;
        }
    };

    let result = parser::parse(&text);
    for error in &result.errors {
        warn!(path = %path.display(), %error, "problem in include file");
    }
    let tree = result.content?;
    Some(Deck::build_inner(&tree, path, schema, visited))
}

/// Point each INCLUDE keyword at its entry in the deck's include list.
fn link_include_keywords(deck: &mut Deck) {
    let targets: Vec<PathBuf> = deck
        .include_files
        .iter()
        .map(|f| normalize_path(&f.resolved_path))
        .collect();
    let base_dir = deck.base_dir.clone();

    for section in &mut deck.sections {
        for keyword in &mut section.keywords {
            if let KeywordKind::Include { as_written, target } = &mut keyword.kind {
                let norm = normalize_path(&resolve_path(&base_dir, as_written));
                *target = targets.iter().position(|t| *t == norm);
            }
        }
    }
}

/// Extract referenced paths from deck text, in order of first appearance.
///
/// An INCLUDE line is a line whose comment-stripped, trimmed text equals
/// `INCLUDE` case-insensitively; the path is the first quoted string on the
/// following non-blank content. Duplicate literals are dropped.
pub(crate) fn scan_include_paths(text: &str) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        if !strip_comment(line).trim().eq_ignore_ascii_case("INCLUDE") {
            continue;
        }
        for next in lines.by_ref() {
            let content = strip_comment(next).trim().to_string();
            if content.is_empty() {
                continue;
            }
            if let Some(path) = first_quoted(&content) {
                if !paths.iter().any(|p| p == path) {
                    paths.push(path.to_string());
                }
            }
            break;
        }
    }
    paths
}

fn strip_comment(line: &str) -> &str {
    match line.find("--") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// First single- or double-quoted substring of a line, if any.
fn first_quoted(line: &str) -> Option<&str> {
    let (open, rest) = line
        .char_indices()
        .find(|(_, c)| *c == '\'' || *c == '"')
        .map(|(i, c)| (c, &line[i + 1..]))?;
    let close = rest.find(open)?;
    Some(&rest[..close])
}

/// Absolute paths pass through; relative paths are joined onto the base.
pub(crate) fn resolve_path(base_dir: &Path, as_written: &str) -> PathBuf {
    let path = Path::new(as_written);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` onto the
/// preceding component. Purely textual, no filesystem access.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component.as_os_str());
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
