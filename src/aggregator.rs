//! Merge URL sources into one fetched-and-extracted digest.
//!
//! The candidate list is discovered URLs first, then the fixed list, with
//! exact-string duplicates removed (first occurrence wins). Each URL is then
//! fetched and extracted independently: a failing item becomes an `ok=false`
//! record and never aborts the rest.
//!
//! # Concurrency
//!
//! Fetches run through `futures::stream::buffered`, which keeps at most
//! `max_in_flight` requests open and yields results in input order regardless
//! of completion order. `max_in_flight = 1` is strictly sequential.

use crate::discovery::{DiscoveryConfig, discover};
use crate::extractor::{extract, page_title};
use crate::fetcher::PageFetcher;
use crate::models::{ArticleRecord, DigestResult, LinkCandidate, PageReport};
use crate::signals::annotate;
use crate::utils::truncate_for_log;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

/// Discovered URLs followed by fixed URLs, deduplicated in first-seen order.
pub fn resolve_urls(discovered: &[LinkCandidate], fixed: &[String]) -> Vec<String> {
    discovered
        .iter()
        .map(|c| c.url.as_str())
        .chain(fixed.iter().map(String::as_str))
        .unique()
        .map(str::to_string)
        .collect()
}

/// Fetch and extract one URL into a record.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn fetch_record<F: PageFetcher>(fetcher: &F, url: &str) -> ArticleRecord {
    let outcome = fetcher.fetch(url).await;
    match outcome.body.as_deref() {
        Some(html) if outcome.is_success() => {
            let fields = extract(html);
            let mut record = ArticleRecord::extracted(url, &outcome.final_url, &fields);
            annotate(&mut record);
            debug!(
                title = %record.title,
                chars = record.chars,
                preview = %truncate_for_log(&fields.body, 120),
                "Extracted article"
            );
            record
        }
        _ => {
            warn!(
                requested = %outcome.requested_url,
                final_url = %outcome.final_url,
                status = ?outcome.status,
                "Article unavailable"
            );
            ArticleRecord::failed(url, &outcome)
        }
    }
}

/// Fetch and extract every URL, keeping input order.
///
/// Failed fetches become `ok=false` records in place; the batch always
/// completes.
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for every article
/// * `urls` - Article URLs, already deduplicated
/// * `max_in_flight` - Maximum concurrent fetches (values below 1 mean 1)
///
/// # Returns
///
/// A [`DigestResult`] with one record per input URL, in input order.
#[instrument(level = "info", skip_all, fields(count = urls.len(), max_in_flight = max_in_flight))]
pub async fn collect<F: PageFetcher>(fetcher: &F, urls: Vec<String>, max_in_flight: usize) -> DigestResult {
    let records: Vec<ArticleRecord> = stream::iter(urls)
        .map(|url| async move { fetch_record(fetcher, &url).await })
        .buffered(max_in_flight.max(1))
        .collect()
        .await;

    let failed = records.iter().filter(|r| !r.ok).count();
    info!(
        total = records.len(),
        successful = records.len() - failed,
        failed,
        "Digest collected"
    );
    DigestResult::new(records)
}

/// Discover (when configured), merge with `fixed`, then fetch and extract.
///
/// Discovered URLs come first; a fixed URL already discovered is fetched
/// only once. A failed discovery leaves just the fixed list.
///
/// # Arguments
///
/// * `fetcher` - Fetcher carrying the site cookie
/// * `fixed` - Configured article URLs
/// * `discovery` - Index page to scan, or `None` to skip discovery
/// * `max_in_flight` - Maximum concurrent article fetches
///
/// # Returns
///
/// The merged [`DigestResult`]; `ok` is always `true`.
#[instrument(level = "info", skip_all, fields(fixed = fixed.len()))]
pub async fn aggregate<F: PageFetcher>(
    fetcher: &F,
    fixed: &[String],
    discovery: Option<&DiscoveryConfig>,
    max_in_flight: usize,
) -> DigestResult {
    let discovered = match discovery {
        Some(d) => discover(fetcher, d).await,
        None => Vec::new(),
    };
    let urls = resolve_urls(&discovered, fixed);
    info!(
        discovered = discovered.len(),
        fixed = fixed.len(),
        resolved = urls.len(),
        "Resolved digest URLs"
    );
    collect(fetcher, urls, max_in_flight).await
}

/// Fetch a single gated page and report whether the credential opened it.
#[instrument(level = "info", skip_all, fields(%url))]
pub async fn inspect_page<F: PageFetcher>(fetcher: &F, url: &str) -> PageReport {
    let outcome = fetcher.fetch(url).await;
    match outcome.body.as_deref() {
        Some(html) if outcome.is_success() => PageReport {
            ok: true,
            fetched_url: url.to_string(),
            final_url: Some(outcome.final_url.clone()),
            length: Some(html.chars().count()),
            title: Some(page_title(html)),
            error: None,
        },
        _ => PageReport {
            ok: false,
            fetched_url: url.to_string(),
            final_url: outcome.http_status.map(|_| outcome.final_url.clone()),
            length: None,
            title: None,
            error: outcome.status.error_code(),
        },
    }
}
