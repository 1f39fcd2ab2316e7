/// In-memory localization table
///
/// Languages are an ordered list (the first entry is the source language) and
/// rows are kept in insertion order, each carrying exactly one value per
/// language. Keys and language codes compare case-insensitively.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One translatable entry: a key and its per-language values, positionally
/// aligned with [`LocalizationTable::languages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Row {
    fn new(key: &str, width: usize) -> Self {
        Self {
            key: key.to_string(),
            values: vec![String::new(); width],
        }
    }

    fn pad_to(&mut self, width: usize) {
        if self.values.len() < width {
            self.values.resize(width, String::new());
        }
    }
}

/// Persisted shape of a table. Loading goes through [`LocalizationTable::from`]
/// so that invariants hold no matter what was on disk.
#[derive(Debug, Clone, Default, Deserialize)]
struct TableSnapshot {
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "TableSnapshot")]
pub struct LocalizationTable {
    languages: Vec<String>,
    rows: Vec<Row>,
    /// Lowercased key -> position in `rows`.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl From<TableSnapshot> for LocalizationTable {
    fn from(snapshot: TableSnapshot) -> Self {
        let mut table = Self::new();
        let mut columns = Vec::with_capacity(snapshot.languages.len());
        for lang in &snapshot.languages {
            columns.push(table.ensure_language(lang));
        }
        let width = table.languages.len();

        for row in snapshot.rows {
            if row.key.trim().is_empty() {
                continue;
            }
            let duplicate = table.contains_key(&row.key);
            let target = table.row_index_or_insert(&row.key);
            let mut written = vec![false; width];
            for (&column, value) in columns.iter().zip(row.values) {
                // Duplicate keys and duplicate language columns collapse into
                // their first occurrence, only filling cells still empty.
                let cell = &mut table.rows[target].values[column];
                if !written[column] && (!duplicate || cell.is_empty()) {
                    *cell = value;
                    written[column] = true;
                }
            }
        }
        table
    }
}

impl LocalizationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table whose only language is `source_language`.
    pub fn with_source_language(source_language: &str) -> Self {
        let mut table = Self::new();
        table.ensure_language(source_language);
        table
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn source_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(&key.to_lowercase())
    }

    pub fn row(&self, key: &str) -> Option<&Row> {
        self.index
            .get(&key.to_lowercase())
            .map(|&position| &self.rows[position])
    }

    /// Position of `lang` in the language list (case-insensitive).
    pub fn index_of_language(&self, lang: &str) -> Option<usize> {
        self.languages
            .iter()
            .position(|existing| existing.to_lowercase() == lang.to_lowercase())
    }

    /// Append `lang` if missing and widen every row by one empty cell.
    /// Returns the language's column either way.
    pub fn ensure_language(&mut self, lang: &str) -> usize {
        if let Some(column) = self.index_of_language(lang) {
            return column;
        }
        self.languages.push(lang.to_string());
        for row in &mut self.rows {
            row.values.push(String::new());
        }
        self.languages.len() - 1
    }

    /// Stored value for `key` in `lang`, or `None` when either is unknown.
    pub fn get(&self, key: &str, lang: &str) -> Option<&str> {
        let column = self.index_of_language(lang)?;
        let row = self.row(key)?;
        row.values.get(column).map(String::as_str)
    }

    /// Fill the `lang` cell of `key` with `text` unless it already holds
    /// non-empty text. Creates the language and the row as needed.
    pub fn upsert(&mut self, key: &str, text: &str, lang: &str) {
        let column = self.ensure_language(lang);
        let position = self.row_index_or_insert(key);
        let cell = &mut self.rows[position].values[column];
        if cell.is_empty() {
            *cell = text.to_string();
        }
    }

    /// Set the `lang` cell of `key`. With `overwrite` the value replaces
    /// whatever is stored, including with an empty string; without it the
    /// cell is only written while empty. Returns `true` if the row was created.
    pub fn set_cell(&mut self, key: &str, lang: &str, value: &str, overwrite: bool) -> bool {
        let column = self.ensure_language(lang);
        let created = !self.contains_key(key);
        let position = self.row_index_or_insert(key);
        self.write_column(position, column, value, overwrite);
        created
    }

    /// Find the row for `key`, creating an all-empty one if needed, and pad it
    /// to the current language count.
    pub(crate) fn row_index_or_insert(&mut self, key: &str) -> usize {
        let width = self.languages.len();
        let lookup = key.to_lowercase();
        let position = match self.index.get(&lookup) {
            Some(&position) => position,
            None => {
                self.rows.push(Row::new(key, width));
                let position = self.rows.len() - 1;
                self.index.insert(lookup, position);
                position
            }
        };
        self.rows[position].pad_to(width);
        position
    }

    pub(crate) fn write_column(
        &mut self,
        position: usize,
        column: usize,
        value: &str,
        overwrite: bool,
    ) {
        let width = self.languages.len();
        let row = &mut self.rows[position];
        row.pad_to(width);
        let cell = &mut row.values[column];
        if overwrite || cell.is_empty() {
            *cell = value.to_string();
        }
    }
}

impl PartialEq for LocalizationTable {
    fn eq(&self, other: &Self) -> bool {
        self.languages == other.languages && self.rows == other.rows
    }
}

impl Eq for LocalizationTable {}
