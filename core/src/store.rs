/// Table persistence as a JSON file
use crate::backup::{write_atomic, BackupError, WriteOutcome};
use crate::table::LocalizationTable;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read table {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to parse table {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize table: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Write(#[from] BackupError),
}

pub fn load(path: &Path) -> Result<LocalizationTable, StoreError> {
    let json = fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the table at `path`, or start an empty one with `source_language` if
/// the file does not exist yet. The flag is `true` when the table is new.
pub fn load_or_create(
    path: &Path,
    source_language: &str,
) -> Result<(LocalizationTable, bool), StoreError> {
    match load(path) {
        Ok(table) => Ok((table, false)),
        Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            log::info!("Creating new localization table at {}", path.display());
            Ok((LocalizationTable::with_source_language(source_language), true))
        }
        Err(err) => Err(err),
    }
}

pub fn save(
    path: &Path,
    table: &LocalizationTable,
    keep_backup: bool,
) -> Result<WriteOutcome, StoreError> {
    let json = serde_json::to_string_pretty(table)?;
    Ok(write_atomic(path, json.as_bytes(), keep_backup)?)
}
