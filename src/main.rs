//! # Podcast Catalog
//!
//! Crawls a radio archive website year by year, extracts per-episode metadata
//! (title, air date, tags, canonical URL) and keeps it in a JSON catalog.
//!
//! ## Usage
//!
//! ```sh
//! podcast_catalog ./episodes.json all   # full crawl, replaces the catalog
//! podcast_catalog ./episodes.json new   # fetch only unseen episodes, append
//! ```
//!
//! ## Architecture
//!
//! 1. **Indexing**: fetch each year's archive page and collect episode URLs
//! 2. **Deduplication**: union the URLs, minus those already in the catalog
//! 3. **Fetching**: download and scrape each remaining episode page, one at a time
//! 4. **Output**: write the catalog JSON, replacing the previous file
//!
//! An episode page that fails to parse is skipped and reported in the final
//! summary; it never aborts the run.

use clap::Parser;
use clap::error::ErrorKind;
use std::error::Error;
use std::process::ExitCode;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod crawl;
mod dates;
mod error;
mod fetch;
mod models;
mod scrapers;
mod store;
mod utils;

use cli::{Cli, Mode, USAGE, USAGE_EXIT_CODE};
use config::CrawlerConfig;
use fetch::HttpFetcher;
use models::Catalog;
use utils::{current_year, ensure_writable_parent};

#[tokio::main]
async fn main() -> ExitCode {
    // Argument errors are answered before any I/O, logging included.
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            println!("{USAGE}");
            return ExitCode::from(USAGE_EXIT_CODE as u8);
        }
    };

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("podcast_catalog starting up");
    debug!(?args, "Parsed CLI arguments");

    let result = run(args).await;

    let elapsed = start_time.elapsed();
    match result {
        Ok(()) => {
            info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, ?elapsed, "Run failed");
            ExitCode::FAILURE
        }
    }
}

#[instrument(level = "info", skip_all, fields(path = %args.catalog_path.display(), mode = ?args.mode))]
async fn run(args: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => CrawlerConfig::load(path)?,
        None => CrawlerConfig::default(),
    };
    if let Some(start_year) = args.start_year {
        config.start_year = start_year;
    }
    config.validate()?;
    let end_year = args.end_year.unwrap_or_else(current_year);

    let fetcher = HttpFetcher::new(&config.user_agent)?;

    match args.mode {
        Mode::All => {
            // Fail before the crawl, not after it.
            ensure_writable_parent(&args.catalog_path).await?;

            let report = crawl::build_all(&fetcher, &config, end_year).await?;
            report.log_summary();
            store::save_catalog(&Catalog::new(report.episodes), &args.catalog_path).await?;
        }
        Mode::New => {
            let mut catalog = store::load_catalog(&args.catalog_path).await?;
            let report = crawl::update(&fetcher, &config, end_year, &mut catalog).await?;
            report.log_summary();
            store::save_catalog(&catalog, &args.catalog_path).await?;
        }
    }
    Ok(())
}
