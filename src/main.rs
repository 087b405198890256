//! # Investment Sentinel
//!
//! An ingestion pipeline that reads a cookie-gated course site and its public
//! index pages, extracts article-like fields from the markup, merges the
//! discovered and configured URL lists into one digest, and assembles a
//! machine-readable brief plus a plain-text report with rule-based advice.
//!
//! ## Usage
//!
//! ```sh
//! FM_COOKIE="session=..." investment_sentinel brief
//! investment_sentinel --config sentinel.yaml brief --format json -o ./out
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: Scan the index page for article links
//! 2. **Fetching**: Download each page with the site cookie, classify the outcome
//! 3. **Extraction**: Derive title, body and summary from the markup
//! 4. **Aggregation**: Merge, deduplicate and collect records in order
//! 5. **Output**: Recommendations, JSON brief and plain-text brief

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod aggregator;
mod cli;
mod config;
mod discovery;
mod extractor;
mod feeds;
mod fetcher;
mod models;
mod outputs;
mod recommend;
mod signals;
mod utils;

use aggregator::{aggregate, collect, fetch_record, inspect_page};
use cli::{Cli, Command, Format};
use config::{SentinelConfig, absolutize};
use discovery::{DiscoveryConfig, discover};
use feeds::{OfflineBroker, StaticNews};
use fetcher::{HttpFetcher, RetryFetch};
use outputs::{brief::run_brief, json, text};
use utils::ensure_writable_dir;

/// Exit code used when a mandatory input is missing.
const EXIT_USAGE: i32 = 2;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init (stderr, so stdout carries only the payload) ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(command = ?args.command, config = ?args.config, "Parsed CLI arguments");

    let mut config = SentinelConfig::load(args.config.as_deref())?;
    config.apply_overrides(&args);

    let code = run(&args.command, &config).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        exit_code = code,
        "Execution complete"
    );
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Dispatch one subcommand and return the process exit code.
#[instrument(level = "info", skip_all)]
async fn run(command: &Command, config: &SentinelConfig) -> Result<i32, Box<dyn Error>> {
    let http = HttpFetcher::from_config(config)?;
    let fetcher = RetryFetch::new(http, config.max_retries, config.retry_base_delay());

    match command {
        Command::Page { url, path } => {
            let target = config.content_url(url.as_deref(), path.as_deref());
            let report = inspect_page(&fetcher, &target).await;
            println!("{}", json::render_json(&report)?);
            Ok(if report.ok { 0 } else { 1 })
        }
        Command::Article { url } => {
            let Some(url) = url.as_deref().filter(|u| !u.trim().is_empty()) else {
                return usage_error("missing url");
            };
            let target = absolutize(&config.base_url, url.trim());
            let record = fetch_record(&fetcher, &target).await;
            println!("{}", json::render_json(&record)?);
            Ok(if record.ok { 0 } else { 1 })
        }
        Command::Batch { urls } => {
            let targets: Vec<String> = urls
                .iter()
                .map(|u| u.trim())
                .filter(|u| !u.is_empty())
                .map(|u| absolutize(&config.base_url, u))
                .collect();
            if targets.is_empty() {
                return usage_error("missing url params");
            }
            let digest = collect(
                &fetcher,
                aggregator::resolve_urls(&[], &targets),
                config.max_concurrent_fetches,
            )
            .await;
            println!("{}", json::render_json(&digest)?);
            Ok(0)
        }
        Command::Discover => {
            let discovery = DiscoveryConfig::from_config(config)?;
            let links = discover(&fetcher, &discovery).await;
            println!("{}", json::render_json(&links)?);
            Ok(0)
        }
        Command::Digest => {
            let discovery = DiscoveryConfig::from_config(config)?;
            let digest = aggregate(
                &fetcher,
                &config.fixed_targets(),
                Some(&discovery),
                config.max_concurrent_fetches,
            )
            .await;
            println!("{}", json::render_json(&digest)?);
            Ok(0)
        }
        Command::Brief { format, output_dir } => {
            let discovery = DiscoveryConfig::from_config(config)?;
            let now = Utc::now();
            let brief = run_brief(
                &fetcher,
                config,
                Some(&discovery),
                &StaticNews,
                &OfflineBroker::default(),
                now,
            )
            .await;

            match format {
                Format::Json => println!("{}", json::render_json(&brief)?),
                Format::Text => println!("{}", text::render_text(&brief)),
            }

            if let Some(dir) = output_dir {
                if let Err(e) = ensure_writable_dir(dir).await {
                    error!(path = %dir, error = %e, "Output directory is not writable");
                    return Err(e);
                }
                if let Err(e) = json::write_brief_json(&brief, dir, now).await {
                    error!(error = %e, "Failed to write brief JSON");
                }
                if let Err(e) = text::write_brief_text(&brief, dir, now).await {
                    error!(error = %e, "Failed to write brief text");
                }
            }
            Ok(0)
        }
    }
}

fn usage_error(message: &str) -> Result<i32, Box<dyn Error>> {
    warn!(message, "Missing mandatory input");
    println!("{}", json::render_json(&serde_json::json!({ "ok": false, "error": message }))?);
    Ok(EXIT_USAGE)
}
