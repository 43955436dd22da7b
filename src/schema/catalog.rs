//! Catalog of keyword schema metadata.
//!
//! Keyword definitions can be loaded from a directory of per-keyword JSON
//! documents (one file per keyword, `sections` plus optional `data` block).
//! When no directory is available a built-in table of common keywords is used
//! so that completions and item naming still work out of the box.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use smol_str::SmolStr;

/// The fixed set of recognized section header keywords, in file order.
pub const SECTION_NAMES: [&str; 8] = [
    "RUNSPEC", "GRID", "EDIT", "PROPS", "REGIONS", "SOLUTION", "SUMMARY", "SCHEDULE",
];

/// Schema metadata for a single keyword.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordInfo {
    pub name: SmolStr,
    /// Sections this keyword may legally appear in.
    pub valid_sections: Vec<SmolStr>,
    /// Coarse value type ("INT", "DOUBLE", "STRING", "DATE", "NONE", "MIXED").
    pub value_type: SmolStr,
    /// Item names for one record, in item order.
    pub item_names: Vec<SmolStr>,
}

impl KeywordInfo {
    pub fn is_valid_in_section(&self, section: &str) -> bool {
        self.valid_sections
            .iter()
            .any(|s| s.eq_ignore_ascii_case(section))
    }

    /// Name for the item at `index`, when the schema defines one.
    pub fn item_name(&self, index: usize) -> Option<&SmolStr> {
        self.item_names.get(index)
    }
}

/// On-disk JSON shape for one keyword definition.
#[derive(Debug, Deserialize)]
struct KeywordJson {
    #[serde(default)]
    sections: Vec<String>,
    #[serde(default)]
    data: Option<KeywordDataJson>,
}

#[derive(Debug, Deserialize)]
struct KeywordDataJson {
    #[serde(default)]
    value_type: Option<String>,
    #[serde(default)]
    items: Option<Vec<KeywordItemJson>>,
}

#[derive(Debug, Deserialize)]
struct KeywordItemJson {
    #[serde(default)]
    name: Option<String>,
}

/// Read-only keyword schema lookup service.
pub struct SchemaCatalog {
    keywords: HashMap<SmolStr, KeywordInfo>,
}

impl Default for SchemaCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SchemaCatalog {
    /// Create an empty catalog (useful as a test fixture base).
    pub fn empty() -> Self {
        Self {
            keywords: HashMap::new(),
        }
    }

    /// Catalog populated with the built-in table of common keywords.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.load_builtin_keywords();
        tracing::debug!(count = catalog.keywords.len(), "loaded built-in keywords");
        catalog
    }

    /// Load keyword definitions from a directory tree of JSON documents.
    ///
    /// Each regular file is treated as one keyword definition named after the
    /// file stem. Files that fail to read or parse are skipped. Falls back to
    /// the built-in table if the directory yields no keywords.
    pub fn load_from_dir(dir: &Path) -> Result<Self, std::io::Error> {
        let mut catalog = Self::empty();
        catalog.load_directory_recursive(dir)?;

        if catalog.keywords.is_empty() {
            tracing::warn!(dir = %dir.display(), "no keyword definitions found, using built-in table");
            catalog.load_builtin_keywords();
        } else {
            tracing::debug!(
                count = catalog.keywords.len(),
                dir = %dir.display(),
                "loaded keyword definitions"
            );
        }
        Ok(catalog)
    }

    /// Register or replace a keyword definition.
    pub fn insert(&mut self, info: KeywordInfo) {
        self.keywords.insert(info.name.clone(), info);
    }

    pub fn has_keyword(&self, name: &str) -> bool {
        self.keywords.contains_key(name.to_ascii_uppercase().as_str())
    }

    /// Look up schema metadata for a keyword (case-insensitive).
    pub fn info(&self, name: &str) -> Option<&KeywordInfo> {
        self.keywords.get(name.to_ascii_uppercase().as_str())
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// All known keyword names, sorted.
    pub fn all_keywords(&self) -> Vec<SmolStr> {
        let mut names: Vec<SmolStr> = self.keywords.keys().cloned().collect();
        names.sort();
        names
    }

    /// Keywords valid in the given section, sorted.
    pub fn keywords_for_section(&self, section: &str) -> Vec<SmolStr> {
        let mut names: Vec<SmolStr> = self
            .keywords
            .values()
            .filter(|info| info.is_valid_in_section(section))
            .map(|info| info.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Check if a name is one of the fixed section header keywords.
    pub fn is_section(&self, name: &str) -> bool {
        SECTION_NAMES.iter().any(|s| name.eq_ignore_ascii_case(s))
    }

    /// Prefix completions, optionally filtered by the current section.
    ///
    /// Section header keywords are offered only when no section context is
    /// known (i.e. before the first header).
    pub fn completions(&self, prefix: &str, current_section: Option<&str>) -> Vec<SmolStr> {
        let prefix = prefix.to_ascii_uppercase();
        let mut result: Vec<SmolStr> = Vec::new();

        if current_section.is_none() {
            for section in SECTION_NAMES {
                if section.starts_with(prefix.as_str()) {
                    result.push(SmolStr::new_static(section));
                }
            }
        }

        for info in self.keywords.values() {
            if !info.name.starts_with(prefix.as_str()) {
                continue;
            }
            match current_section {
                Some(section) if !info.is_valid_in_section(section) => continue,
                _ => result.push(info.name.clone()),
            }
        }

        result.sort();
        result.dedup();
        result
    }

    /// Section context for a one-based line in deck text: the last section
    /// header appearing at or before `line`, or `None` before the first one.
    pub fn section_context(&self, text: &str, line: u32) -> Option<SmolStr> {
        let mut current = None;
        for (idx, raw) in text.lines().enumerate() {
            if idx as u32 >= line {
                break;
            }
            let trimmed = raw.trim();
            for section in SECTION_NAMES {
                if trimmed.len() >= section.len()
                    && trimmed.as_bytes()[..section.len()].eq_ignore_ascii_case(section.as_bytes())
                {
                    current = Some(SmolStr::new_static(section));
                    break;
                }
            }
        }
        current
    }

    fn load_directory_recursive(&mut self, dir: &Path) -> Result<(), std::io::Error> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                self.load_directory_recursive(&path)?;
            } else if path.is_file() {
                self.load_keyword_file(&path);
            }
        }
        Ok(())
    }

    fn load_keyword_file(&mut self, path: &PathBuf) {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            return;
        };
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "skipping unreadable keyword file");
                return;
            }
        };
        match serde_json::from_str::<KeywordJson>(&data) {
            Ok(json) => {
                let info = keyword_info_from_json(name, json);
                self.keywords.insert(info.name.clone(), info);
            }
            Err(e) => {
                tracing::debug!(keyword = name, error = %e, "failed to parse keyword definition");
            }
        }
    }

    fn load_builtin_keywords(&mut self) {
        // Common keywords per section; INCLUDE is valid everywhere.
        let table: &[(&str, &[&str], &str, &[&str])] = &[
            // RUNSPEC
            (
                "DIMENS",
                &["RUNSPEC"],
                "INT",
                &["NX", "NY", "NZ"],
            ),
            ("TABDIMS", &["RUNSPEC"], "INT", &[]),
            ("EQLDIMS", &["RUNSPEC"], "INT", &[]),
            (
                "WELLDIMS",
                &["RUNSPEC"],
                "INT",
                &["MAXWELLS", "MAXCONN", "MAXGROUPS", "MAXWELLSGROUP"],
            ),
            ("START", &["RUNSPEC"], "DATE", &["DAY", "MONTH", "YEAR"]),
            ("OIL", &["RUNSPEC"], "NONE", &[]),
            ("WATER", &["RUNSPEC"], "NONE", &[]),
            ("GAS", &["RUNSPEC"], "NONE", &[]),
            ("METRIC", &["RUNSPEC"], "NONE", &[]),
            ("FIELD", &["RUNSPEC"], "NONE", &[]),
            // GRID
            ("DX", &["GRID"], "DOUBLE", &[]),
            ("DY", &["GRID"], "DOUBLE", &[]),
            ("DZ", &["GRID"], "DOUBLE", &[]),
            ("TOPS", &["GRID"], "DOUBLE", &[]),
            ("PORO", &["GRID"], "DOUBLE", &[]),
            ("PERMX", &["GRID"], "DOUBLE", &[]),
            ("PERMY", &["GRID"], "DOUBLE", &[]),
            ("PERMZ", &["GRID"], "DOUBLE", &[]),
            ("COORD", &["GRID"], "DOUBLE", &[]),
            ("ZCORN", &["GRID"], "DOUBLE", &[]),
            ("ACTNUM", &["GRID"], "INT", &[]),
            // PROPS
            ("SWOF", &["PROPS"], "DOUBLE", &[]),
            ("SGOF", &["PROPS"], "DOUBLE", &[]),
            ("PVTO", &["PROPS"], "DOUBLE", &[]),
            ("PVTW", &["PROPS"], "DOUBLE", &[]),
            ("PVDG", &["PROPS"], "DOUBLE", &[]),
            ("ROCK", &["PROPS"], "DOUBLE", &[]),
            (
                "DENSITY",
                &["PROPS"],
                "DOUBLE",
                &["OIL", "WATER", "GAS"],
            ),
            // SOLUTION
            ("EQUIL", &["SOLUTION"], "DOUBLE", &[]),
            ("PRESSURE", &["SOLUTION"], "DOUBLE", &[]),
            ("SWAT", &["SOLUTION"], "DOUBLE", &[]),
            ("SGAS", &["SOLUTION"], "DOUBLE", &[]),
            // SCHEDULE
            ("DATES", &["SCHEDULE"], "DATE", &["DAY", "MONTH", "YEAR"]),
            (
                "WELSPECS",
                &["SCHEDULE"],
                "STRING",
                &["WELL", "GROUP", "I", "J", "REFDEPTH", "PHASE"],
            ),
            ("COMPDAT", &["SCHEDULE"], "MIXED", &[]),
            ("WCONPROD", &["SCHEDULE"], "MIXED", &[]),
            ("WCONINJE", &["SCHEDULE"], "MIXED", &[]),
            ("TSTEP", &["SCHEDULE"], "DOUBLE", &[]),
            // Valid in every section
            (
                "INCLUDE",
                &SECTION_NAMES,
                "STRING",
                &["FILENAME"],
            ),
        ];

        for (name, sections, value_type, items) in table {
            self.insert(KeywordInfo {
                name: SmolStr::new_static(name),
                valid_sections: sections.iter().map(|s| SmolStr::new(s)).collect(),
                value_type: SmolStr::new_static(value_type),
                item_names: items.iter().map(|s| SmolStr::new(s)).collect(),
            });
        }
    }
}

fn keyword_info_from_json(name: &str, json: KeywordJson) -> KeywordInfo {
    let (value_type, item_names) = match json.data {
        Some(data) => (
            data.value_type.map(SmolStr::new).unwrap_or_default(),
            data.items
                .unwrap_or_default()
                .into_iter()
                .filter_map(|item| item.name.map(SmolStr::new))
                .collect(),
        ),
        None => (SmolStr::default(), Vec::new()),
    };

    KeywordInfo {
        name: SmolStr::new(name.to_ascii_uppercase()),
        valid_sections: json.sections.into_iter().map(SmolStr::new).collect(),
        value_type,
        item_names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = SchemaCatalog::builtin();

        assert!(catalog.has_keyword("DIMENS"));
        assert!(catalog.has_keyword("dimens")); // Case-insensitive
        assert!(!catalog.has_keyword("NOSUCH"));

        let info = catalog.info("DIMENS").unwrap();
        assert!(info.is_valid_in_section("RUNSPEC"));
        assert!(!info.is_valid_in_section("GRID"));
        assert_eq!(info.item_name(0).unwrap(), "NX");
        assert_eq!(info.item_name(3), None);
    }

    #[test]
    fn test_include_valid_everywhere() {
        let catalog = SchemaCatalog::builtin();
        let info = catalog.info("INCLUDE").unwrap();
        for section in SECTION_NAMES {
            assert!(info.is_valid_in_section(section));
        }
    }

    #[test]
    fn test_is_section() {
        let catalog = SchemaCatalog::empty();
        assert!(catalog.is_section("RUNSPEC"));
        assert!(catalog.is_section("schedule"));
        assert!(!catalog.is_section("DIMENS"));
    }

    #[test]
    fn test_completions_respect_section() {
        let catalog = SchemaCatalog::builtin();

        // Section headers are only offered without a section context
        let pre = catalog.completions("R", None);
        assert!(pre.contains(&SmolStr::new("RUNSPEC")));
        assert!(pre.contains(&SmolStr::new("REGIONS")));

        let grid = catalog.completions("P", Some("GRID"));
        assert!(grid.contains(&SmolStr::new("PERMX")));
        assert!(grid.contains(&SmolStr::new("PORO")));
        assert!(!grid.contains(&SmolStr::new("PVTO"))); // PROPS only
    }

    #[test]
    fn test_section_context_scans_preceding_lines() {
        let catalog = SchemaCatalog::empty();
        let text = "RUNSPEC\nDIMENS\n  10  10  5  /\n/\nGRID\nPORO\n";

        assert_eq!(catalog.section_context(text, 2).unwrap(), "RUNSPEC");
        assert_eq!(catalog.section_context(text, 4).unwrap(), "RUNSPEC");
        assert_eq!(catalog.section_context(text, 6).unwrap(), "GRID");
        assert_eq!(catalog.section_context("-- header\nDIMENS\n", 1), None);
    }

    #[test]
    fn test_json_keyword_definition() {
        let json: KeywordJson = serde_json::from_str(
            r#"{
                "sections": ["GRID"],
                "data": {
                    "value_type": "DOUBLE",
                    "items": [{"name": "MULTX", "value_type": "DOUBLE"}]
                }
            }"#,
        )
        .unwrap();

        let info = keyword_info_from_json("multx", json);
        assert_eq!(info.name, "MULTX");
        assert!(info.is_valid_in_section("GRID"));
        assert_eq!(info.value_type, "DOUBLE");
        assert_eq!(info.item_name(0).unwrap(), "MULTX");
    }

    #[test]
    fn test_load_from_dir_falls_back_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = SchemaCatalog::load_from_dir(dir.path()).unwrap();
        // Empty directory falls back to the built-in table
        assert!(catalog.has_keyword("DIMENS"));
    }

    #[test]
    fn test_load_from_dir_reads_definitions() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("M");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(
            sub.join("MULTZ"),
            r#"{"sections": ["GRID"], "data": {"value_type": "DOUBLE"}}"#,
        )
        .unwrap();
        std::fs::write(sub.join("BROKEN"), "not json").unwrap();

        let catalog = SchemaCatalog::load_from_dir(dir.path()).unwrap();
        assert!(catalog.has_keyword("MULTZ"));
        assert!(!catalog.has_keyword("BROKEN"));
    }
}
