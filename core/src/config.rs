/// Configuration for the localization workflow
use crate::formats::csv::LineEnding;
use crate::formats::FileFormat;
use crate::scan::ScanFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_source_language() -> String {
    "en".to_string()
}

fn default_languages() -> String {
    "en,ro".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathOptions {
    /// Persisted table
    #[serde(default = "default_table_path")]
    pub table: PathBuf,
    /// Translator spreadsheet
    #[serde(default = "default_csv_path")]
    pub csv: PathBuf,
    /// Directory receiving `<lang>.json`
    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,
}

fn default_table_path() -> PathBuf {
    PathBuf::from("Localization/LocalizationTable.json")
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("Localization/localization.csv")
}

fn default_json_dir() -> PathBuf {
    PathBuf::from("Resources/Localization")
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            table: default_table_path(),
            csv: default_csv_path(),
            json_dir: default_json_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    #[serde(default)]
    pub line_ending: LineEnding,
    #[serde(default = "default_true")]
    pub pretty_json: bool,
    /// Keep a timestamped copy of every file before it is replaced
    #[serde(default)]
    pub keep_backups: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::default(),
            pretty_json: true,
            keep_backups: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationConfig {
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Target languages as typed by the user, e.g. `en, ro; fr`
    #[serde(default = "default_languages")]
    pub languages: String,
    #[serde(default)]
    pub scan: ScanFilter,
    #[serde(default)]
    pub output: OutputOptions,
    #[serde(default)]
    pub paths: PathOptions,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            languages: default_languages(),
            scan: ScanFilter::default(),
            output: OutputOptions::default(),
            paths: PathOptions::default(),
        }
    }
}

/// Split a language list on commas, semicolons and spaces. Empty entries are
/// dropped and duplicates removed ignoring case, keeping the first spelling.
pub fn parse_language_list(list: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for lang in list.split([',', ';', ' ']).map(str::trim) {
        if lang.is_empty() {
            continue;
        }
        if !languages.iter().any(|seen| seen.to_lowercase() == lang.to_lowercase()) {
            languages.push(lang.to_string());
        }
    }
    languages
}

impl LocalizationConfig {
    /// Source language first, then the configured list in order.
    pub fn resolved_languages(&self) -> Vec<String> {
        parse_language_list(&format!("{},{}", self.source_language, self.languages))
    }

    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        match FileFormat::from_path(path) {
            FileFormat::Yaml => serde_yaml::from_str(&content)
                .map_err(|e| format!("Failed to parse YAML config {}: {}", path.display(), e)),
            FileFormat::Json => serde_json::from_str(&content)
                .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e)),
        }
    }

    /// Save configuration, as YAML for `.yaml`/`.yml` paths and JSON otherwise
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = match FileFormat::from_path(path) {
            FileFormat::Yaml => serde_yaml::to_string(self)
                .map_err(|e| format!("Failed to serialize config: {}", e))?,
            FileFormat::Json => self.to_json()?,
        };

        fs::write(path, content).map_err(|e| format!("Failed to write config file: {}", e))
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse JSON config: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to JSON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = LocalizationConfig::default();
        assert_eq!(config.source_language, "en");
        assert!(config.scan.include_scenes);
        assert!(config.scan.include_prefabs);
        assert_eq!(config.paths.csv, PathBuf::from("Localization/localization.csv"));
        assert_eq!(config.resolved_languages(), vec!["en", "ro"]);
    }

    #[test]
    fn test_parse_language_list() {
        assert_eq!(parse_language_list("en, ro;fr  DE,,Ro"), vec!["en", "ro", "fr", "DE"]);
        assert!(parse_language_list(" ;, ").is_empty());
    }

    #[test]
    fn test_source_language_comes_first() {
        let config = LocalizationConfig {
            source_language: "RO".into(),
            languages: "en,ro,fr".into(),
            ..LocalizationConfig::default()
        };
        assert_eq!(config.resolved_languages(), vec!["RO", "en", "fr"]);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LocalizationConfig::from_json(
            r#"{"languages": "en;de", "scan": {"includePrefabs": false}, "output": {"lineEnding": "crlf"}}"#,
        )
        .unwrap();
        assert_eq!(config.source_language, "en");
        assert!(config.scan.include_scenes);
        assert!(!config.scan.include_prefabs);
        assert_eq!(config.output.line_ending, LineEnding::Crlf);
        assert!(config.output.pretty_json);
        assert_eq!(config.paths.json_dir, PathBuf::from("Resources/Localization"));
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("localization.yaml");
        let config = LocalizationConfig {
            languages: "en,ja".into(),
            ..LocalizationConfig::default()
        };
        config.to_file(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("sourceLanguage: en"));
        let loaded = LocalizationConfig::from_file(&path).unwrap();
        assert_eq!(loaded.resolved_languages(), vec!["en", "ja"]);
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{").unwrap();
        let err = LocalizationConfig::from_file(&path).unwrap_err();
        assert!(err.contains("broken.json"));
    }
}
