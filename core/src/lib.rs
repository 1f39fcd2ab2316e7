pub mod backup;
pub mod config;
pub mod formats;
pub mod keygen;
pub mod manifest;
pub mod merge;
pub mod pipeline;
pub mod runtime;
pub mod scan;
pub mod store;
pub mod table;


pub use backup::{write_atomic, BackupError, WriteOutcome};
pub use config::{parse_language_list, LocalizationConfig, OutputOptions, PathOptions};
pub use formats::csv::{export_csv, export_csv_with, CsvDocument, CsvRecord, LineEnding};
pub use formats::json::{export_languages, LanguageDocument, LanguageEntry};
pub use formats::{FileFormat, FormatError};
pub use keygen::make_key;
pub use manifest::{ContentManifest, ManifestEntry, ManifestError};
pub use merge::{import_csv, import_csv_text, import_csv_with_policy, ImportPolicy, ImportReport};
pub use pipeline::{Pipeline, PipelineError};
pub use runtime::{
    DirectorySource, LanguageChanged, LanguageSource, LanguageSubscription, LocalizationContext,
    LocalizedLabel,
};
pub use scan::{
    scan_and_assign, ContentItem, ContentKind, ContentMutator, ItemFailure, ScanFilter, ScanReport,
};
pub use store::StoreError;
pub use table::{LocalizationTable, Row};
