//! Brief assembly.
//!
//! The brief is built from already-collected inputs; rendering never fetches.

use crate::aggregator::aggregate;
use crate::config::SentinelConfig;
use crate::discovery::DiscoveryConfig;
use crate::feeds::{BrokerProbe, NewsSource};
use crate::fetcher::PageFetcher;
use crate::models::{BriefPayload, BrokerStatus, DigestResult, NewsSnapshot};
use crate::recommend::recommend;
use crate::utils::utc_stamp;
use chrono::{DateTime, Utc};
use tracing::{info, instrument};

/// Combine the inputs and stamp the generation time.
pub fn build_brief(
    digest: DigestResult,
    news: NewsSnapshot,
    broker: BrokerStatus,
    now: DateTime<Utc>,
) -> BriefPayload {
    let recommendations = recommend(&digest, &news);
    BriefPayload {
        ok: true,
        generated_at: utc_stamp(now),
        digest,
        news,
        broker,
        recommendations,
    }
}

/// Run the whole pipeline: digest, news scan, broker probe, recommendations.
///
/// # Arguments
///
/// * `fetcher` - Fetcher carrying the site cookie
/// * `config` - Fixed URLs, concurrency and news scan parameters
/// * `discovery` - Index page to scan, or `None` to use only fixed URLs
/// * `news_source` - Headline source for the news scan
/// * `broker_probe` - Broker connectivity check
/// * `now` - Instant stamped on the brief
///
/// # Returns
///
/// The assembled [`BriefPayload`], ready for JSON or text rendering.
#[instrument(level = "info", skip_all)]
pub async fn run_brief<F, N, B>(
    fetcher: &F,
    config: &SentinelConfig,
    discovery: Option<&DiscoveryConfig>,
    news_source: &N,
    broker_probe: &B,
    now: DateTime<Utc>,
) -> BriefPayload
where
    F: PageFetcher,
    N: NewsSource,
    B: BrokerProbe,
{
    let digest = aggregate(
        fetcher,
        &config.fixed_targets(),
        discovery,
        config.max_concurrent_fetches,
    )
    .await;
    let news = news_source.scan(&config.news_region, &config.news_window);
    let broker = broker_probe.status();
    let brief = build_brief(digest, news, broker, now);
    info!(
        items = brief.digest.count,
        news = brief.news.items.len(),
        recommendations = brief.recommendations.len(),
        "Brief assembled"
    );
    brief
}
