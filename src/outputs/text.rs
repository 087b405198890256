//! Plain-text brief.
//!
//! Fixed layout, deterministic for a given payload:
//!
//! ```text
//! [Investment Sentinel] Brief - 2025-05-06 07:15 UTC
//!
//! - Digest:
//!   * <title> - <summary, at most 220 chars>
//!
//! - News scan (us, 6h):
//!   * <headline> [impact: medium]
//!
//! - Broker: alpaca connected=false
//!
//! - Recommendations:
//!   * <advisory>
//! ```

use crate::models::{ArticleRecord, BriefPayload};
use crate::outputs::brief_path;
use crate::utils::clip;
use chrono::{DateTime, Utc};
use std::error::Error;
use tokio::fs;
use tracing::{info, instrument};

pub const SUMMARY_MAX_CHARS: usize = 220;

fn digest_line(item: &ArticleRecord) -> String {
    if item.ok {
        format!("  * {} - {}", item.title, clip(&item.summary, SUMMARY_MAX_CHARS))
    } else {
        format!(
            "  * {} - unavailable ({})",
            item.url,
            item.error.as_deref().unwrap_or("unknown")
        )
    }
}

pub fn render_text(brief: &BriefPayload) -> String {
    let mut lines = vec![
        format!("[Investment Sentinel] Brief - {}", brief.generated_at),
        String::new(),
        "- Digest:".to_string(),
    ];
    if brief.digest.items.is_empty() {
        lines.push("  * (no items)".to_string());
    } else {
        lines.extend(brief.digest.items.iter().map(digest_line));
    }
    lines.push(String::new());

    lines.push(format!(
        "- News scan ({}, {}):",
        brief.news.region, brief.news.window
    ));
    if brief.news.items.is_empty() {
        lines.push("  * (no news)".to_string());
    } else {
        lines.extend(
            brief
                .news
                .items
                .iter()
                .map(|n| format!("  * {} [impact: {}]", n.headline, n.impact)),
        );
    }
    lines.push(String::new());

    lines.push(format!(
        "- Broker: {} connected={}",
        brief.broker.broker, brief.broker.connected
    ));
    lines.push(String::new());

    lines.push("- Recommendations:".to_string());
    lines.extend(brief.recommendations.iter().map(|r| format!("  * {r}")));

    lines.join("\n")
}

/// Write the text brief next to its JSON twin.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_brief_text(
    brief: &BriefPayload,
    output_dir: &str,
    now: DateTime<Utc>,
) -> Result<String, Box<dyn Error>> {
    let (dir, path) = brief_path(output_dir, now, "txt");
    fs::create_dir_all(&dir).await?;
    fs::write(&path, render_text(brief)).await?;
    info!(path = %path, "Wrote brief text");
    Ok(path)
}
