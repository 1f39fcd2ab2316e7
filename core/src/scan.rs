/// Scan content items and assign keys
///
/// Every item with visible text gets a key derived from its context and
/// hierarchy. The key is written back through a [`ContentMutator`] and the
/// text is captured as the source-language value of that key.
use crate::keygen::make_key;
use crate::table::LocalizationTable;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Context label used for every prefab item.
pub const PREFAB_CONTEXT: &str = "PREFAB";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Scene,
    Prefab,
}

impl ContentKind {
    /// Scenes are keyed by their asset name, prefabs share one label.
    pub fn default_context(self, asset_name: &str) -> String {
        match self {
            Self::Scene => asset_name.to_string(),
            Self::Prefab => PREFAB_CONTEXT.to_string(),
        }
    }
}

/// A displayed text element discovered by a content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub kind: ContentKind,
    pub context: String,
    /// Name segments from the item up to its topmost ancestor.
    #[serde(default)]
    pub hierarchy_path: Vec<String>,
    #[serde(default)]
    pub raw_text: String,
}

impl ContentItem {
    pub fn key(&self) -> String {
        make_key(&self.context, self.hierarchy_path.as_slice())
    }
}

/// Receives the key assigned to each scanned item, together with the text to
/// keep as its fallback display value.
pub trait ContentMutator {
    type Error: Display;

    /// `position` is the item's index in the scanned sequence.
    fn attach_key(
        &mut self,
        position: usize,
        item: &ContentItem,
        key: &str,
    ) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFilter {
    #[serde(default = "default_true")]
    pub include_scenes: bool,
    #[serde(default = "default_true")]
    pub include_prefabs: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            include_scenes: true,
            include_prefabs: true,
        }
    }
}

impl ScanFilter {
    pub fn includes(&self, kind: ContentKind) -> bool {
        match kind {
            ContentKind::Scene => self.include_scenes,
            ContentKind::Prefab => self.include_prefabs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFailure {
    pub position: usize,
    pub key: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub processed: usize,
    pub skipped_blank: usize,
    pub skipped_filtered: usize,
    /// Items whose context and path produced an empty key.
    pub skipped_unkeyed: usize,
    pub failures: Vec<ItemFailure>,
}

/// Walk `items` once, assigning keys and upserting the text under
/// `source_language`. A mutator failure only fails that item; the table is
/// left untouched for it and the pass continues.
pub fn scan_and_assign<'a, I, M>(
    table: &mut LocalizationTable,
    items: I,
    mutator: &mut M,
    source_language: &str,
    filter: &ScanFilter,
) -> ScanReport
where
    I: IntoIterator<Item = &'a ContentItem>,
    M: ContentMutator + ?Sized,
{
    let mut report = ScanReport::default();
    table.ensure_language(source_language);

    for (position, item) in items.into_iter().enumerate() {
        if !filter.includes(item.kind) {
            report.skipped_filtered += 1;
            continue;
        }
        if item.raw_text.trim().is_empty() {
            report.skipped_blank += 1;
            continue;
        }

        let key = item.key();
        if key.trim().is_empty() {
            log::warn!(
                "Skipping item {}: context '{}' and its path yield no key",
                position,
                item.context
            );
            report.skipped_unkeyed += 1;
            continue;
        }
        if let Err(err) = mutator.attach_key(position, item, &key) {
            log::warn!("Failed to attach key '{}' to item {}: {}", key, position, err);
            report.failures.push(ItemFailure {
                position,
                key,
                message: err.to_string(),
            });
            continue;
        }

        table.upsert(&key, &item.raw_text, source_language);
        report.processed += 1;
    }

    log::info!(
        "Scan complete: assigned {} keys, {} failed",
        report.processed,
        report.failures.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        assigned: Vec<(usize, String)>,
        fail_at: Option<usize>,
    }

    impl ContentMutator for Recorder {
        type Error = String;

        fn attach_key(
            &mut self,
            position: usize,
            _item: &ContentItem,
            key: &str,
        ) -> Result<(), String> {
            if self.fail_at == Some(position) {
                return Err("asset is read-only".into());
            }
            self.assigned.push((position, key.to_string()));
            Ok(())
        }
    }

    fn item(kind: ContentKind, context: &str, path: &[&str], text: &str) -> ContentItem {
        ContentItem {
            kind,
            context: context.to_string(),
            hierarchy_path: path.iter().map(|s| s.to_string()).collect(),
            raw_text: text.to_string(),
        }
    }

    fn sample_items() -> Vec<ContentItem> {
        vec![
            item(ContentKind::Scene, "MainMenu", &["Label", "PlayButton", "Canvas"], "Play"),
            item(ContentKind::Scene, "MainMenu", &["Label", "QuitButton", "Canvas"], "Quit"),
            item(ContentKind::Scene, "MainMenu", &["Spacer", "Canvas"], "   "),
            item(ContentKind::Prefab, PREFAB_CONTEXT, &["Title", "Dialog"], "Are you sure?"),
        ]
    }

    #[test]
    fn assigns_keys_and_upserts_source_text() {
        let mut table = LocalizationTable::new();
        let mut recorder = Recorder::default();
        let report = scan_and_assign(
            &mut table,
            &sample_items(),
            &mut recorder,
            "en",
            &ScanFilter::default(),
        );

        assert_eq!(report.processed, 3);
        assert_eq!(report.skipped_blank, 1);
        assert_eq!(recorder.assigned[0], (0, "mainmenu.canvas_playbutton_label".to_string()));
        assert_eq!(recorder.assigned[2], (3, "prefab.dialog_title".to_string()));
        assert_eq!(table.get("mainmenu.canvas_quitbutton_label", "en"), Some("Quit"));
    }

    #[test]
    fn rescanning_keeps_keys_and_source_text() {
        let mut table = LocalizationTable::new();
        let items = sample_items();
        scan_and_assign(&mut table, &items, &mut Recorder::default(), "en", &ScanFilter::default());
        let first = table.clone();

        let mut edited = items.clone();
        edited[0].raw_text = "Start".into();
        let mut recorder = Recorder::default();
        scan_and_assign(&mut table, &edited, &mut recorder, "en", &ScanFilter::default());

        assert_eq!(table, first);
        assert_eq!(table.get("mainmenu.canvas_playbutton_label", "en"), Some("Play"));
        assert_eq!(recorder.assigned.len(), 3);
    }

    #[test]
    fn mutator_failure_is_isolated_to_the_item() {
        let mut table = LocalizationTable::new();
        let mut recorder = Recorder {
            fail_at: Some(1),
            ..Recorder::default()
        };
        let report = scan_and_assign(
            &mut table,
            &sample_items(),
            &mut recorder,
            "en",
            &ScanFilter::default(),
        );

        assert_eq!(report.processed, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].position, 1);
        assert_eq!(report.failures[0].message, "asset is read-only");
        assert!(!table.contains_key("mainmenu.canvas_quitbutton_label"));
        assert!(table.contains_key("prefab.dialog_title"));
    }

    #[test]
    fn filter_skips_disabled_kinds() {
        let mut table = LocalizationTable::new();
        let filter = ScanFilter {
            include_scenes: false,
            include_prefabs: true,
        };
        let report = scan_and_assign(
            &mut table,
            &sample_items(),
            &mut Recorder::default(),
            "en",
            &filter,
        );
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_filtered, 3);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn source_language_is_ensured_even_without_items() {
        let mut table = LocalizationTable::new();
        let empty: Vec<ContentItem> = Vec::new();
        scan_and_assign(&mut table, &empty, &mut Recorder::default(), "en", &ScanFilter::default());
        assert_eq!(table.source_language(), Some("en"));
    }

    #[test]
    fn items_without_a_key_are_skipped() {
        let mut table = LocalizationTable::new();
        let items = vec![
            item(ContentKind::Scene, "..", &[], "Hello"),
            item(ContentKind::Scene, "Hud", &["Score"], "Score"),
        ];
        let mut recorder = Recorder::default();
        let report = scan_and_assign(
            &mut table,
            &items,
            &mut recorder,
            "en",
            &ScanFilter::default(),
        );

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped_unkeyed, 1);
        assert_eq!(recorder.assigned, vec![(1, "hud.score".to_string())]);
        assert!(table.rows().iter().all(|row| !row.key.is_empty()));

        let json = serde_json::to_string(&table).unwrap();
        let reloaded: LocalizationTable = serde_json::from_str(&json).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn prefab_context_is_shared() {
        assert_eq!(ContentKind::Prefab.default_context("Dialog"), "PREFAB");
        assert_eq!(ContentKind::Scene.default_context("MainMenu"), "MainMenu");
    }
}
