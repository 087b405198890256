//! Data models for fetched pages, extracted articles, and the assembled brief.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FetchOutcome`]: Classified result of a single authenticated GET
//! - [`LinkCandidate`]: Article link discovered on an index page
//! - [`ArticleRecord`]: One digest entry, successful or failed
//! - [`DigestResult`]: Ordered, deduplicated collection of records
//! - [`BriefPayload`]: Digest + news + broker status + recommendations
//!
//! Field names are snake_case on the wire to match the digest endpoint shape
//! consumed downstream (`{ok, count, items:[{ok, url, title, summary, ...}]}`).

use serde::{Deserialize, Serialize};

/// Classification of one fetch attempt.
///
/// Authentication failure is detected only from the HTTP status (401/403) or
/// from a final URL whose path contains `login`; the body is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    /// HTTP 200 on a non-login page.
    Success,
    /// Credential missing, invalid, or expired.
    Unauthorized,
    /// Any other non-200 response.
    HttpError(u16),
    /// DNS, connect, timeout, or body read failure.
    TransportError(String),
}

impl FetchStatus {
    /// Machine-readable failure code, `None` on success.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// assert_eq!(FetchStatus::HttpError(500).error_code().as_deref(), Some("http_500"));
    /// ```
    pub fn error_code(&self) -> Option<String> {
        match self {
            FetchStatus::Success => None,
            FetchStatus::Unauthorized => Some("unauthorized".to_string()),
            FetchStatus::HttpError(code) => Some(format!("http_{code}")),
            FetchStatus::TransportError(msg) => Some(format!("request_error: {msg}")),
        }
    }
}

/// Result of fetching one URL. Produced once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub status: FetchStatus,
    /// The URL that was requested.
    pub requested_url: String,
    /// The URL after redirects (equal to `requested_url` on transport errors).
    pub final_url: String,
    /// HTTP status code when a response was received.
    pub http_status: Option<u16>,
    /// Raw markup, retained only on [`FetchStatus::Success`].
    pub body: Option<String>,
}

impl FetchOutcome {
    pub fn transport(url: &str, message: impl Into<String>) -> Self {
        Self {
            status: FetchStatus::TransportError(message.into()),
            requested_url: url.to_string(),
            final_url: url.to_string(),
            http_status: None,
            body: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == FetchStatus::Success
    }
}

/// An article link found on an index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCandidate {
    /// Absolute address.
    pub url: String,
    pub anchor_text: String,
}

/// Fields extracted from raw markup. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFields {
    pub title: String,
    pub body: String,
    pub summary: String,
}

/// Coarse tone of an article, derived from a keyword lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// One digest entry.
///
/// Failed records keep the URL and the failure detail but never the raw body,
/// a title, or a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub ok: bool,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Body length in characters.
    #[serde(default)]
    pub chars: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl ArticleRecord {
    /// Build a successful record from extracted fields.
    pub fn extracted(url: &str, final_url: &str, fields: &ArticleFields) -> Self {
        Self {
            ok: true,
            url: url.to_string(),
            final_url: Some(final_url.to_string()),
            title: fields.title.clone(),
            summary: fields.summary.clone(),
            chars: fields.body.chars().count(),
            status: None,
            error: None,
            sentiment: None,
            topics: Vec::new(),
        }
    }

    /// Build a failed record from a non-success outcome.
    pub fn failed(url: &str, outcome: &FetchOutcome) -> Self {
        let final_url = match outcome.status {
            FetchStatus::TransportError(_) => None,
            _ => Some(outcome.final_url.clone()),
        };
        Self {
            ok: false,
            url: url.to_string(),
            final_url,
            title: String::new(),
            summary: String::new(),
            chars: 0,
            status: outcome.http_status,
            error: outcome.status.error_code(),
            sentiment: None,
            topics: Vec::new(),
        }
    }
}

/// The digest for one pipeline run.
///
/// URLs are unique; order is discovery order then fixed-list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestResult {
    /// Always `true`: item failures are reported per item.
    pub ok: bool,
    pub count: usize,
    pub items: Vec<ArticleRecord>,
}

impl DigestResult {
    pub fn new(items: Vec<ArticleRecord>) -> Self {
        Self {
            ok: true,
            count: items.len(),
            items,
        }
    }
}

/// A single headline in the news snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,
    pub tags: Vec<String>,
    pub impact: String,
}

/// Macro news for a region and time window. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSnapshot {
    pub region: String,
    pub window: String,
    pub items: Vec<NewsItem>,
}

/// Broker connectivity as reported by the broker probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerStatus {
    pub broker: String,
    pub connected: bool,
}

/// Everything one brief invocation produces. Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BriefPayload {
    pub ok: bool,
    /// UTC, minute precision: `YYYY-MM-DD HH:MM UTC`.
    pub generated_at: String,
    pub digest: DigestResult,
    pub news: NewsSnapshot,
    pub broker: BrokerStatus,
    pub recommendations: Vec<String>,
}

/// Report for a single gated page, used to validate the credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageReport {
    pub ok: bool,
    pub fetched_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(status: FetchStatus, http_status: Option<u16>) -> FetchOutcome {
        FetchOutcome {
            status,
            requested_url: "https://example.com/post/a".to_string(),
            final_url: "https://example.com/account/login".to_string(),
            http_status,
            body: None,
        }
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(FetchStatus::Success.error_code(), None);
        assert_eq!(
            FetchStatus::Unauthorized.error_code().as_deref(),
            Some("unauthorized")
        );
        assert_eq!(
            FetchStatus::HttpError(404).error_code().as_deref(),
            Some("http_404")
        );
        assert_eq!(
            FetchStatus::TransportError("timed out".into())
                .error_code()
                .as_deref(),
            Some("request_error: timed out")
        );
    }

    #[test]
    fn test_failed_record_keeps_url_and_reason() {
        let rec = ArticleRecord::failed(
            "https://example.com/post/a",
            &outcome(FetchStatus::Unauthorized, Some(200)),
        );
        assert!(!rec.ok);
        assert_eq!(rec.url, "https://example.com/post/a");
        assert_eq!(rec.error.as_deref(), Some("unauthorized"));
        assert_eq!(rec.status, Some(200));
        assert!(rec.title.is_empty());
        assert!(rec.summary.is_empty());
    }

    #[test]
    fn test_transport_failure_has_no_final_url() {
        let rec = ArticleRecord::failed(
            "https://example.com/post/a",
            &FetchOutcome::transport("https://example.com/post/a", "dns error"),
        );
        assert_eq!(rec.final_url, None);
        assert_eq!(rec.status, None);
    }

    #[test]
    fn test_extracted_record_counts_chars() {
        let fields = ArticleFields {
            title: "Titolo".into(),
            body: "Perché sì.".into(),
            summary: "Perché sì.".into(),
        };
        let rec = ArticleRecord::extracted("u", "u", &fields);
        assert!(rec.ok);
        assert_eq!(rec.chars, 10);
    }

    #[test]
    fn test_digest_serialization_shape() {
        let digest = DigestResult::new(vec![
            ArticleRecord::extracted("a", "a", &ArticleFields::default()),
            ArticleRecord::failed("b", &outcome(FetchStatus::HttpError(500), Some(500))),
        ]);
        let json = serde_json::to_value(&digest).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["count"], 2);
        assert_eq!(json["items"][0]["ok"], true);
        assert!(json["items"][0].get("status").is_none());
        assert!(json["items"][0].get("error").is_none());
        assert_eq!(json["items"][1]["status"], 500);
        assert_eq!(json["items"][1]["error"], "http_500");
    }

    #[test]
    fn test_sentiment_lowercase() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
    }
}
