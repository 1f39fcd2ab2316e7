/// Exchange formats for the localization table
/// CSV for translators, one JSON document per language for runtime lookup
pub mod csv;
pub mod json;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("CSV document is empty")]
    EmptyDocument,

    #[error("Malformed CSV header at line {line}: {reason}")]
    MalformedHeader { line: usize, reason: String },

    #[error("CSV header has no column for required language '{0}'")]
    MissingLanguage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Serialization used for configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// Detect format from file extension; anything but YAML is read as JSON
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Detect format from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("loc.YAML")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("conf/loc.yml")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("loctable.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("loctable")), FileFormat::Json);
    }

    #[test]
    fn header_error_names_the_line() {
        let err = FormatError::MalformedHeader {
            line: 1,
            reason: "first column must be 'key'".into(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed CSV header at line 1: first column must be 'key'"
        );
    }
}
