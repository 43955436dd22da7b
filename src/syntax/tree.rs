//! Structural tree value types.

use smol_str::SmolStr;

/// One typed value inside a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemValue {
    Int(i64),
    Double(f64),
    Str(String),
    /// Explicitly defaulted (`*` in deck text) or otherwise unset.
    Defaulted,
}

impl ItemValue {
    /// Coarse type tag, matching the schema catalog's value types.
    pub fn type_name(&self) -> &'static str {
        match self {
            ItemValue::Int(_) => "INT",
            ItemValue::Double(_) => "DOUBLE",
            ItemValue::Str(_) => "STRING",
            ItemValue::Defaulted => "DEFAULTED",
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, ItemValue::Defaulted)
    }
}

/// One item: a value plus an optional schema-supplied name.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckItem {
    /// Item name when schema metadata is available, e.g. "NX" for DIMENS.
    pub name: Option<SmolStr>,
    pub value: ItemValue,
}

impl DeckItem {
    pub fn new(value: ItemValue) -> Self {
        Self { name: None, value }
    }

    pub fn named(name: impl Into<SmolStr>, value: ItemValue) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// One record: an ordered row of items, terminated by `/` in deck text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeckRecord {
    pub items: Vec<DeckItem>,
}

impl DeckRecord {
    pub fn new(items: Vec<DeckItem>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One named directive with zero or more records.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckKeyword {
    /// Uppercase keyword token.
    pub name: SmolStr,
    pub records: Vec<DeckRecord>,
}

impl DeckKeyword {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Total item count across all records.
    pub fn total_items(&self) -> usize {
        self.records.iter().map(DeckRecord::len).sum()
    }
}

/// The parsed representation of one file: an ordered keyword sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeckTree {
    pub keywords: Vec<DeckKeyword>,
}

impl DeckTree {
    pub fn new(keywords: Vec<DeckKeyword>) -> Self {
        Self { keywords }
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Keyword names in file order.
    pub fn keyword_names(&self) -> Vec<SmolStr> {
        self.keywords.iter().map(|kw| kw.name.clone()).collect()
    }
}
