use chrono::Local;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WriteOutcome {
    pub final_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub bytes_written: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Failed to back up {}: {source}", .path.display())]
    BackupCreate { path: PathBuf, source: io::Error },
    #[error("{} has no parent directory", .0.display())]
    NoParent(PathBuf),
}

/// Write `contents` to `target` through a temp file in the same directory and
/// a rename, so readers never see a half-written file. With `keep_backup`
/// the previous file is first copied to `<name>.bak.<timestamp>`.
pub fn write_atomic(
    target: &Path,
    contents: &[u8],
    keep_backup: bool,
) -> Result<WriteOutcome, BackupError> {
    let parent = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => return Err(BackupError::NoParent(target.to_path_buf())),
    };
    let io_err = |source| BackupError::Io {
        path: target.to_path_buf(),
        source,
    };
    fs::create_dir_all(parent).map_err(io_err)?;

    let backup_path = if keep_backup && target.exists() {
        let candidate = backup_path_for(target);
        fs::copy(target, &candidate).map_err(|source| BackupError::BackupCreate {
            path: target.to_path_buf(),
            source,
        })?;
        Some(candidate)
    } else {
        None
    };

    let temp_path = temp_path_for(target);
    stage_temp(&temp_path, |file| {
        file.write_all(contents)?;
        file.sync_all()
    })
    .map_err(io_err)?;

    if let Err(err) = replace(&temp_path, target) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_err(err));
    }

    Ok(WriteOutcome {
        final_path: target.to_path_buf(),
        backup_path,
        bytes_written: contents.len(),
    })
}

/// Create `temp_path` and hand it to `fill`. The file is removed again if
/// `fill` fails.
fn stage_temp<F>(temp_path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(temp_path)?;
    let result = fill(&mut file);
    drop(file);
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result
}

#[cfg(target_os = "windows")]
fn replace(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            fs::remove_file(to)?;
            fs::rename(from, to)
        }
        other => other,
    }
}

#[cfg(not(target_os = "windows"))]
fn replace(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

fn backup_path_for(target: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d%H%M%S");
    with_suffix(target, &format!(".bak.{timestamp}"))
}

fn temp_path_for(target: &Path) -> PathBuf {
    with_suffix(target, &format!(".tmp.{}", std::process::id()))
}

fn with_suffix(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "output".into());
    name.push(suffix);
    target.with_file_name(name)
}
