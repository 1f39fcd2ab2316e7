/// JSON manifest of content items
///
/// Stands in for the scene/prefab walker: a content exporter writes the items
/// it found, the scan writes the assigned key and fallback text back onto each
/// entry, and the exporter applies them to its assets.
use crate::formats::FormatError;
use crate::scan::{ContentItem, ContentMutator};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(flatten)]
    pub item: ContentItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    /// Read-only assets cannot take a key.
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl From<ContentItem> for ManifestEntry {
    fn from(item: ContentItem) -> Self {
        Self {
            item,
            key: None,
            fallback: None,
            locked: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("item {0} is not in the manifest")]
    UnknownItem(usize),
    #[error("item {0} is locked")]
    Locked(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentManifest {
    #[serde(default)]
    pub items: Vec<ManifestEntry>,
}

impl ContentManifest {
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, FormatError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Snapshot of the items to scan.
    pub fn content_items(&self) -> Vec<ContentItem> {
        self.items.iter().map(|entry| entry.item.clone()).collect()
    }
}

impl ContentMutator for ContentManifest {
    type Error = ManifestError;

    fn attach_key(
        &mut self,
        position: usize,
        item: &ContentItem,
        key: &str,
    ) -> Result<(), ManifestError> {
        let entry = self
            .items
            .get_mut(position)
            .ok_or(ManifestError::UnknownItem(position))?;
        if entry.locked {
            return Err(ManifestError::Locked(position));
        }
        entry.key = Some(key.to_string());
        entry.fallback = Some(item.raw_text.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{scan_and_assign, ContentKind, ScanFilter};
    use crate::table::LocalizationTable;

    const MANIFEST: &str = r#"{
        "items": [
            {"kind": "scene", "context": "MainMenu", "hierarchyPath": ["Label", "Play", "Canvas"], "rawText": "Play", "key": "stale.key"},
            {"kind": "prefab", "context": "PREFAB", "hierarchyPath": ["Title", "Popup"], "rawText": "Warning", "locked": true},
            {"kind": "scene", "context": "MainMenu", "hierarchyPath": ["Icon"], "rawText": ""}
        ]
    }"#;

    #[test]
    fn parses_camel_case_entries() {
        let manifest = ContentManifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.items.len(), 3);
        assert_eq!(manifest.items[0].item.kind, ContentKind::Scene);
        assert_eq!(manifest.items[0].item.hierarchy_path, vec!["Label", "Play", "Canvas"]);
        assert!(manifest.items[1].locked);
    }

    #[test]
    fn scan_overwrites_stale_keys_and_reports_locked_items() {
        let mut manifest = ContentManifest::from_json(MANIFEST).unwrap();
        let mut table = LocalizationTable::new();
        let items = manifest.content_items();

        let report = scan_and_assign(
            &mut table,
            &items,
            &mut manifest,
            "en",
            &ScanFilter::default(),
        );

        assert_eq!(report.processed, 1);
        assert_eq!(report.failures[0].message, "item 1 is locked");
        assert_eq!(manifest.items[0].key.as_deref(), Some("mainmenu.canvas_play_label"));
        assert_eq!(manifest.items[0].fallback.as_deref(), Some("Play"));
        assert_eq!(manifest.items[2].key, None);
    }

    #[test]
    fn unknown_position_is_an_error() {
        let mut manifest = ContentManifest::default();
        let item = ContentItem {
            kind: ContentKind::Scene,
            context: "S".into(),
            hierarchy_path: vec![],
            raw_text: "x".into(),
        };
        assert_eq!(
            manifest.attach_key(4, &item, "s"),
            Err(ManifestError::UnknownItem(4))
        );
    }

    #[test]
    fn serializes_without_empty_optionals() {
        let entry = ManifestEntry::from(ContentItem {
            kind: ContentKind::Prefab,
            context: "PREFAB".into(),
            hierarchy_path: vec!["Title".into()],
            raw_text: "Hi".into(),
        });
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "prefab",
                "context": "PREFAB",
                "hierarchyPath": ["Title"],
                "rawText": "Hi"
            })
        );
    }
}
