//! loctable - command-line host for the localization table

mod commands;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use commands::Commands;
use loctable_core::LocalizationConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loctable")]
#[command(about = "Scan, export and import localization tables", long_about = None)]
struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project root that configured paths are relative to
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Log more detail (repeat for debug output)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => LocalizationConfig::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => LocalizationConfig::default(),
    };
    log::debug!("Resolved languages: {:?}", config.resolved_languages());

    cli.command.execute(config, &cli.root)
}
