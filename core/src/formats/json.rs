/// Per-language JSON documents for runtime lookup
/// Shape: `{"items": [{"key": "...", "value": "..."}]}`, one item per table row
use super::FormatError;
use crate::table::LocalizationTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDocument {
    #[serde(default)]
    pub items: Vec<LanguageEntry>,
}

impl LanguageDocument {
    /// Values of `lang` for every row, in table row order. Cells missing from
    /// a short row come out as empty strings. `None` if the table does not
    /// know the language.
    pub fn from_table(table: &LocalizationTable, lang: &str) -> Option<Self> {
        let column = table.index_of_language(lang)?;
        let items = table
            .rows()
            .iter()
            .map(|row| LanguageEntry {
                key: row.key.clone(),
                value: row.values.get(column).cloned().unwrap_or_default(),
            })
            .collect();
        Some(Self { items })
    }

    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, FormatError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Case-insensitive lookup map; later duplicates win.
    pub fn into_lookup(self) -> HashMap<String, String> {
        self.items
            .into_iter()
            .map(|entry| (entry.key.to_lowercase(), entry.value))
            .collect()
    }
}

/// One document per table language, in table language order.
pub fn export_languages(table: &LocalizationTable) -> Vec<(String, LanguageDocument)> {
    table
        .languages()
        .iter()
        .filter_map(|lang| {
            LanguageDocument::from_table(table, lang).map(|doc| (lang.clone(), doc))
        })
        .collect()
}
