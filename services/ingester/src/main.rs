//! Raster catalog ingester.
//!
//! Matches raster files on the local filesystem against a placeholder
//! path pattern and ingests the resulting key→path catalog into a
//! (new or existing) SQLite dataset store.

mod notify;
mod params;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::ProgressBar;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ingestion::{IngestOptions, Ingester};
use storage::SqliteStore;

#[derive(Parser, Debug)]
#[command(name = "ingester")]
#[command(about = "Ingest a collection of raster files into a SQLite dataset store")]
struct Args {
    /// Format pattern defining paths and keys of the raster files,
    /// e.g. '/data/rasters/{name}/{date}_{band}{}.tif'. The empty
    /// group {} matches anything without becoming part of the key.
    /// Existing datasets are silently overwritten unless
    /// --skip-existing is set.
    raster_pattern: String,

    /// Path to the output store file
    #[arg(short, long)]
    output_file: PathBuf,

    /// Speed up ingestion by skipping computation of metadata
    /// (will be computed on first request instead)
    #[arg(long)]
    skip_metadata: bool,

    /// Key to use for RGB compositing, moved to the last key position
    /// [default: last key in pattern]
    #[arg(long)]
    rgb_key: Option<String>,

    /// Skip existing datasets by key
    #[arg(long)]
    skip_existing: bool,

    /// Ignore files older than the specified threshold (e.g., 30m, 2h)
    #[arg(long, value_name = "DURATION", value_parser = params::parse_duration)]
    ignore_older_than: Option<chrono::Duration>,

    /// Cache-invalidation endpoint notified after ingestion
    #[arg(long, default_value = "localhost:5000")]
    cache_endpoint: String,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Suppress all output to stdout
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    run(args).await
}

async fn run(args: Args) -> Result<()> {
    // Parsed before any filesystem or store access, so configuration
    // errors surface first.
    let endpoint = params::parse_hostname(&args.cache_endpoint, "http")
        .map_err(|e| anyhow::anyhow!(e))
        .context("Invalid --cache-endpoint")?;

    let template = std::path::absolute(&args.raster_pattern)
        .context("Failed to resolve pattern against the working directory")?;
    let pattern = ingestion::compile(&template.to_string_lossy())?;
    info!(glob = pattern.glob(), keys = ?pattern.key_names(), "Compiled raster pattern");

    let mut catalog = ingestion::match_files(&pattern)?;
    if let Some(rgb_key) = &args.rgb_key {
        catalog = catalog.promote_key(rgb_key)?;
    }
    info!(datasets = catalog.len(), "Matched raster files");

    let store = SqliteStore::open(&args.output_file)
        .await
        .with_context(|| format!("Failed to open store {}", args.output_file.display()))?;
    let ingester = Ingester::new(store);

    let options = IngestOptions {
        skip_metadata: args.skip_metadata,
        skip_existing: args.skip_existing,
        ignore_older_than: args.ignore_older_than.map(|d| chrono::Utc::now() - d),
    };

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(catalog.len() as u64).with_message("Ingesting raster files")
    };

    let result = ingester
        .ingest(catalog, &options, |done, total, _key| {
            progress.set_length(total as u64);
            progress.set_position(done as u64);
        })
        .await?;
    progress.finish_and_clear();

    if !args.quiet {
        println!(
            "Ingested {} dataset(s) into {} ({} skipped as existing, {} as stale)",
            result.inserted,
            args.output_file.display(),
            result.skipped_existing,
            result.skipped_stale,
        );
    }

    // Best effort: a failed notification never fails the ingestion.
    notify::clear_cache(&endpoint, ingester.store().path()).await;

    Ok(())
}
