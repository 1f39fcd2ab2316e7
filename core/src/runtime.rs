/// Runtime string lookup for the active language.
///
/// A [`LocalizationContext`] owns the lookup for one language at a time and is
/// handed to whatever resolves display text. Switching language replaces the
/// lookup wholesale and publishes a [`LanguageChanged`] event on a
/// `tokio::broadcast` channel; subscribers hold a [`LanguageSubscription`] and
/// stop receiving events when they drop it.
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::formats::json::LanguageDocument;
use crate::formats::FormatError;
use crate::table::LocalizationTable;

const EVENT_CAPACITY: usize = 16;

/// Published after every language load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageChanged {
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub previous: String,
    pub current: String,
    /// Number of entries in the new lookup.
    pub entries: usize,
}

/// Where runtime documents come from.
pub trait LanguageSource {
    /// Document for `lang`, or `None` if there is none.
    fn load(&self, lang: &str) -> Result<Option<LanguageDocument>, FormatError>;
}

/// Reads `<dir>/<lang>.json`, as written by the JSON export.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl LanguageSource for DirectorySource {
    fn load(&self, lang: &str) -> Result<Option<LanguageDocument>, FormatError> {
        let path = self.dir.join(format!("{lang}.json"));
        match fs::read_to_string(&path) {
            Ok(json) => LanguageDocument::from_json(&json).map(Some),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("No runtime document at {}", path.display());
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Serves documents straight from an in-memory table (editor preview).
impl LanguageSource for LocalizationTable {
    fn load(&self, lang: &str) -> Result<Option<LanguageDocument>, FormatError> {
        Ok(LanguageDocument::from_table(self, lang))
    }
}

/// Receiving end of the language-change channel.
pub struct LanguageSubscription {
    receiver: broadcast::Receiver<LanguageChanged>,
}

impl LanguageSubscription {
    /// Next pending event without blocking. A subscriber that fell behind
    /// skips ahead to the oldest event still buffered.
    pub fn try_next(&mut self) -> Option<LanguageChanged> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    log::debug!("Language subscriber lagged by {} events", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain pending events and return only the latest one.
    pub fn latest(&mut self) -> Option<LanguageChanged> {
        let mut latest = None;
        while let Some(event) = self.try_next() {
            latest = Some(event);
        }
        latest
    }

    pub fn unsubscribe(self) {}
}

pub struct LocalizationContext {
    language: String,
    lookup: HashMap<String, String>,
    sender: broadcast::Sender<LanguageChanged>,
    sequence: u64,
}

impl LocalizationContext {
    /// Context for `language` with an empty lookup.
    pub fn new(language: &str) -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            language: language.to_string(),
            lookup: HashMap::new(),
            sender,
            sequence: 0,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    pub fn subscribe(&self) -> LanguageSubscription {
        LanguageSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Load `lang` from `source`. A missing document leaves an empty lookup,
    /// so every label falls back to its cached text. The change is published
    /// either way.
    pub fn load_language<S: LanguageSource + ?Sized>(
        &mut self,
        source: &S,
        lang: &str,
    ) -> Result<(), FormatError> {
        let document = source.load(lang)?.unwrap_or_default();
        self.apply_document(lang, document);
        Ok(())
    }

    /// Replace the lookup with `document` and publish the change.
    pub fn apply_document(&mut self, lang: &str, document: LanguageDocument) {
        self.lookup = document.into_lookup();
        let previous = std::mem::replace(&mut self.language, lang.to_string());
        self.sequence += 1;

        let event = LanguageChanged {
            sequence: self.sequence,
            timestamp: Utc::now(),
            previous,
            current: self.language.clone(),
            entries: self.lookup.len(),
        };
        log::info!(
            "Language set to '{}' ({} entries)",
            event.current,
            event.entries
        );
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }

    pub fn try_get(&self, key: &str) -> Option<&str> {
        self.lookup.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Value for `key`, or `fallback` when the key is blank, unknown or maps
    /// to an empty string.
    pub fn resolve<'a>(&'a self, key: &str, fallback: &'a str) -> &'a str {
        if key.is_empty() {
            return fallback;
        }
        match self.try_get(key) {
            Some(value) if !value.is_empty() => value,
            _ => fallback,
        }
    }
}

/// A displayed text element at runtime: its key plus the text captured when
/// the key was assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedLabel {
    pub key: String,
    pub fallback: String,
}

impl LocalizedLabel {
    pub fn new(key: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            fallback: fallback.into(),
        }
    }

    pub fn text<'a>(&'a self, context: &'a LocalizationContext) -> &'a str {
        context.resolve(&self.key, &self.fallback)
    }
}
