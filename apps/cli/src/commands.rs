use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Subcommand;
use loctable_core::{ImportPolicy, LineEnding, LocalizationConfig, Pipeline, ScanReport};

#[derive(Subcommand)]
pub enum Commands {
    /// Assign keys to the items of a content manifest and capture their text
    Scan {
        /// Manifest written by the content exporter
        #[arg(short, long)]
        manifest: PathBuf,

        /// Skip scene items
        #[arg(long)]
        no_scenes: bool,

        /// Skip prefab items
        #[arg(long)]
        no_prefabs: bool,
    },

    /// Export the translator CSV
    ExportCsv {
        /// Output file (defaults to the configured CSV path)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Use CRLF line endings
        #[arg(long)]
        crlf: bool,
    },

    /// Merge a translator CSV into the table
    ImportCsv {
        /// Input file (defaults to the configured CSV path)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Reject files without a source-language column
        #[arg(long)]
        require_source: bool,
    },

    /// Write one runtime JSON file per language
    ExportJson {
        /// Output directory (defaults to the configured JSON directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// List the table languages in column order
    Languages,

    /// Print one cell
    Get {
        key: String,
        lang: String,
    },
}

impl Commands {
    pub fn execute(self, mut config: LocalizationConfig, root: &Path) -> anyhow::Result<()> {
        match self {
            Commands::Scan {
                manifest,
                no_scenes,
                no_prefabs,
            } => {
                config.scan.include_scenes &= !no_scenes;
                config.scan.include_prefabs &= !no_prefabs;
                let mut pipeline = open(config, root)?;
                let report = pipeline
                    .scan_manifest(&manifest)
                    .with_context(|| format!("Failed to scan {}", manifest.display()))?;
                let table_path = pipeline.save()?;
                print_scan_report(&report);
                println!("Table saved to {}", table_path.display());
                Ok(())
            }
            Commands::ExportCsv { out, crlf } => {
                if crlf {
                    config.output.line_ending = LineEnding::Crlf;
                }
                let pipeline = open(config, root)?;
                let path = match out {
                    Some(out) => pipeline.export_csv_to(&out)?,
                    None => pipeline.export_csv()?,
                };
                println!(
                    "Exported {} keys x {} languages to {}",
                    pipeline.table().len(),
                    pipeline.table().languages().len(),
                    path.display()
                );
                Ok(())
            }
            Commands::ImportCsv {
                input,
                require_source,
            } => {
                let policy = ImportPolicy {
                    require_language: require_source.then(|| config.source_language.clone()),
                };
                let mut pipeline = open(config, root)?;
                let report = match input {
                    Some(input) => pipeline.import_csv_from(&input, &policy)?,
                    None => pipeline.import_csv(&policy)?,
                };
                pipeline.save()?;
                println!(
                    "Updated {} keys ({} new, {} rows skipped)",
                    report.touched,
                    report.created,
                    report.skipped_lines.len()
                );
                if !report.languages_added.is_empty() {
                    println!("Added languages: {}", report.languages_added.join(", "));
                }
                Ok(())
            }
            Commands::ExportJson { out_dir } => {
                let pipeline = open(config, root)?;
                let written = match out_dir {
                    Some(dir) => pipeline.export_json_to(&dir)?,
                    None => pipeline.export_json()?,
                };
                for path in &written {
                    println!("{}", path.display());
                }
                Ok(())
            }
            Commands::Languages => {
                let pipeline = open(config, root)?;
                for (column, lang) in pipeline.table().languages().iter().enumerate() {
                    let marker = if column == 0 { " (source)" } else { "" };
                    println!("{lang}{marker}");
                }
                Ok(())
            }
            Commands::Get { key, lang } => {
                let pipeline = open(config, root)?;
                match pipeline.table().get(&key, &lang) {
                    Some(value) => {
                        println!("{value}");
                        Ok(())
                    }
                    None => bail!("No value for key '{}' in language '{}'", key, lang),
                }
            }
        }
    }
}

fn open(config: LocalizationConfig, root: &Path) -> anyhow::Result<Pipeline> {
    Pipeline::open(config, root)
        .with_context(|| format!("Failed to open localization table under {}", root.display()))
}

fn print_scan_report(report: &ScanReport) {
    println!("Assigned {} keys", report.processed);
    if report.skipped_blank > 0 {
        println!("Skipped {} items without text", report.skipped_blank);
    }
    if report.skipped_unkeyed > 0 {
        println!(
            "Skipped {} items whose context and path yield no key",
            report.skipped_unkeyed
        );
    }
    if report.skipped_filtered > 0 {
        println!("Skipped {} items of disabled kinds", report.skipped_filtered);
    }
    if !report.failures.is_empty() {
        eprintln!("{} items failed:", report.failures.len());
        for failure in &report.failures {
            eprintln!("  #{} {}: {}", failure.position, failure.key, failure.message);
        }
    }
}
