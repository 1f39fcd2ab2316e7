/// File-backed localization workflow
///
/// Binds the table to the configured paths and exposes the four editor
/// actions: scan and assign keys, export the translator CSV, import it back,
/// and export one runtime JSON per language.
use crate::backup::{write_atomic, BackupError};
use crate::config::LocalizationConfig;
use crate::formats::csv::{export_csv_with, CsvDocument};
use crate::formats::json::export_languages;
use crate::formats::FormatError;
use crate::manifest::ContentManifest;
use crate::merge::{import_csv_with_policy, ImportPolicy, ImportReport};
use crate::scan::{scan_and_assign, ContentItem, ContentMutator, ScanReport};
use crate::store::{self, StoreError};
use crate::table::LocalizationTable;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Write(#[from] BackupError),
    #[error("{}: {source}", .path.display())]
    Format { path: PathBuf, source: FormatError },
}

pub struct Pipeline {
    config: LocalizationConfig,
    root: PathBuf,
    table: LocalizationTable,
}

impl Pipeline {
    /// Load (or start) the table under `root` and make sure every configured
    /// language is present, source language first.
    pub fn open(
        config: LocalizationConfig,
        root: impl Into<PathBuf>,
    ) -> Result<Self, PipelineError> {
        let root = root.into();
        let table_path = root.join(&config.paths.table);
        let (table, _created) = store::load_or_create(&table_path, &config.source_language)?;
        let mut pipeline = Self { config, root, table };
        pipeline.sync_languages();
        Ok(pipeline)
    }

    /// Work on an in-memory table; nothing is read until an action runs.
    pub fn with_table(
        config: LocalizationConfig,
        root: impl Into<PathBuf>,
        table: LocalizationTable,
    ) -> Self {
        let mut pipeline = Self {
            config,
            root: root.into(),
            table,
        };
        pipeline.sync_languages();
        pipeline
    }

    fn sync_languages(&mut self) {
        for lang in self.config.resolved_languages() {
            self.table.ensure_language(&lang);
        }
    }

    pub fn config(&self) -> &LocalizationConfig {
        &self.config
    }

    pub fn table(&self) -> &LocalizationTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut LocalizationTable {
        &mut self.table
    }

    pub fn into_table(self) -> LocalizationTable {
        self.table
    }

    /// `relative` resolved against the pipeline root.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn scan<M: ContentMutator + ?Sized>(
        &mut self,
        items: &[ContentItem],
        mutator: &mut M,
    ) -> ScanReport {
        self.sync_languages();
        scan_and_assign(
            &mut self.table,
            items,
            mutator,
            &self.config.source_language,
            &self.config.scan,
        )
    }

    /// Scan the manifest at `path` and write the assigned keys back into it.
    pub fn scan_manifest(&mut self, path: &Path) -> Result<ScanReport, PipelineError> {
        let format_err = |source| PipelineError::Format {
            path: path.to_path_buf(),
            source,
        };
        let mut manifest = ContentManifest::load(path).map_err(format_err)?;
        let items = manifest.content_items();
        let report = self.scan(&items, &mut manifest);

        let json = manifest.to_json().map_err(format_err)?;
        write_atomic(path, json.as_bytes(), self.config.output.keep_backups)?;
        Ok(report)
    }

    pub fn save(&self) -> Result<PathBuf, PipelineError> {
        let path = self.resolve(&self.config.paths.table);
        store::save(&path, &self.table, self.config.output.keep_backups)?;
        Ok(path)
    }

    pub fn export_csv(&self) -> Result<PathBuf, PipelineError> {
        self.export_csv_to(&self.resolve(&self.config.paths.csv))
    }

    pub fn export_csv_to(&self, path: &Path) -> Result<PathBuf, PipelineError> {
        let csv = export_csv_with(&self.table, self.config.output.line_ending);
        write_atomic(path, csv.as_bytes(), self.config.output.keep_backups)?;
        log::info!("CSV exported to {}", path.display());
        Ok(path.to_path_buf())
    }

    pub fn import_csv(&mut self, policy: &ImportPolicy) -> Result<ImportReport, PipelineError> {
        let path = self.resolve(&self.config.paths.csv);
        self.import_csv_from(&path, policy)
    }

    /// Parse and merge the CSV at `path`. The table is untouched when the file
    /// is missing or its header is malformed.
    pub fn import_csv_from(
        &mut self,
        path: &Path,
        policy: &ImportPolicy,
    ) -> Result<ImportReport, PipelineError> {
        let format_err = |source| PipelineError::Format {
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read_to_string(path)
            .map_err(FormatError::from)
            .map_err(format_err)?;
        let document = CsvDocument::parse(&text).map_err(format_err)?;
        import_csv_with_policy(&mut self.table, &document, policy).map_err(format_err)
    }

    pub fn export_json(&self) -> Result<Vec<PathBuf>, PipelineError> {
        self.export_json_to(&self.resolve(&self.config.paths.json_dir))
    }

    /// Write `<dir>/<lang>.json` for every table language.
    pub fn export_json_to(&self, dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let mut written = Vec::new();
        for (lang, document) in export_languages(&self.table) {
            let path = dir.join(format!("{lang}.json"));
            let json = document
                .to_json(self.config.output.pretty_json)
                .map_err(|source| PipelineError::Format {
                    path: path.clone(),
                    source,
                })?;
            write_atomic(&path, json.as_bytes(), self.config.output.keep_backups)?;
            written.push(path);
        }
        log::info!("Exported {} language files to {}", written.len(), dir.display());
        Ok(written)
    }
}
