//! Article link discovery from index pages.
//!
//! The index page is fetched through the same [`PageFetcher`] as articles, so
//! it carries the site cookie. Any non-success outcome yields an empty list:
//! discovery failure never stops the digest.
//!
//! # Link resolution
//!
//! - absolute (`http://`, `https://`) addresses are kept verbatim
//! - everything else goes through [`Url::join`] against the index page's
//!   final URL, so `..` and `.` segments are resolved and a relative path
//!   lands in the index page's directory
//! - fragment-only links and anything that resolves to a non-HTTP scheme
//!   (`mailto:`, `javascript:`, ...) are ignored
//!
//! Resolved addresses are kept only when their path matches the configured
//! article pattern, deduplicated by exact string, and truncated to the limit.

use crate::config::SentinelConfig;
use crate::extractor::element_text;
use crate::fetcher::PageFetcher;
use crate::models::LinkCandidate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Where and how to look for article links.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub index_url: String,
    pub pattern: Regex,
    /// Values below 1 are treated as 1.
    pub limit: i64,
}

impl DiscoveryConfig {
    /// # Errors
    ///
    /// Returns an error if the configured article pattern is not a valid regex.
    pub fn from_config(config: &SentinelConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            index_url: config.index_url(),
            pattern: Regex::new(&config.article_pattern)?,
            limit: config.discovery_limit,
        })
    }

    pub fn effective_limit(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(0).max(1)
    }
}

/// Fetch the index page and return up to `limit` matching article links.
///
/// Links are resolved against the final URL of the index fetch, so an index
/// that redirects still yields addresses on the page actually served.
///
/// # Arguments
///
/// * `fetcher` - Fetcher used for the index page (carries the site cookie)
/// * `discovery` - Index URL, article path pattern and limit
///
/// # Returns
///
/// Matching [`LinkCandidate`]s in page order, at most
/// [`DiscoveryConfig::effective_limit`] of them. Empty when the index page
/// could not be fetched.
#[instrument(level = "info", skip_all, fields(index_url = %discovery.index_url))]
pub async fn discover<F: PageFetcher>(fetcher: &F, discovery: &DiscoveryConfig) -> Vec<LinkCandidate> {
    let outcome = fetcher.fetch(&discovery.index_url).await;
    let Some(html) = outcome.body.as_deref().filter(|_| outcome.is_success()) else {
        warn!(status = ?outcome.status, "Index page unavailable; discovery skipped");
        return Vec::new();
    };

    let links = extract_links(
        html,
        &outcome.final_url,
        &discovery.pattern,
        discovery.effective_limit(),
    );
    info!(count = links.len(), "Discovered article links");
    debug!(urls = ?links.iter().map(|l| l.url.as_str()).collect::<Vec<_>>(), "Discovered URLs");
    links
}

/// Scan markup for matching anchors. Page order is preserved, first
/// occurrence of each address wins.
pub fn extract_links(html: &str, page_url: &str, pattern: &Regex, limit: usize) -> Vec<LinkCandidate> {
    let Ok(base) = Url::parse(page_url) else {
        warn!(%page_url, "Index URL is not absolute; cannot resolve links");
        return Vec::new();
    };
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let url = resolve_href(&base, href)?;
            let path_matches = Url::parse(&url)
                .map(|u| pattern.is_match(u.path()))
                .unwrap_or(false);
            path_matches.then(|| LinkCandidate {
                url,
                anchor_text: element_text(a),
            })
        })
        .unique_by(|c| c.url.clone())
        .take(limit.max(1))
        .collect()
}

/// Resolve one `href` against the page it was found on.
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return Some(href.to_string());
    }

    match base.join(href) {
        Ok(resolved) if matches!(resolved.scheme(), "http" | "https") => Some(resolved.to_string()),
        Ok(_) => None,
        Err(e) => {
            debug!(%href, error = %e, "Skipping unresolvable link");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::HttpFetcher;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post_pattern() -> Regex {
        Regex::new("^/post/[^/]+/?$").unwrap()
    }

    const INDEX: &str = r##"
        <html><body>
          <nav><a href="/">Home</a><a href="#top">Top</a><a href="mailto:x@y.z">Mail</a></nav>
          <a href="/post/primo">Primo</a>
          <a href="https://www.site.test/post/secondo">Secondo</a>
          <a href="/post/primo">Primo again</a>
          <a href="post/terzo"><span>Terzo</span> articolo</a>
          <a href="/post/quarto/commenti">Comments</a>
          <a href="//www.site.test/post/quinto">Quinto</a>
          <a href="/post/sesto">Sesto</a>
        </body></html>"##;

    #[test]
    fn test_extract_links_resolves_filters_and_dedups() {
        let links = extract_links(INDEX, "https://www.site.test/blog", &post_pattern(), 10);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://www.site.test/post/primo",
                "https://www.site.test/post/secondo",
                "https://www.site.test/post/terzo",
                "https://www.site.test/post/quinto",
                "https://www.site.test/post/sesto",
            ]
        );
        assert_eq!(links[0].anchor_text, "Primo");
        assert_eq!(links[2].anchor_text, "Terzo articolo");
    }

    #[test]
    fn test_extract_links_limit_keeps_first() {
        let links = extract_links(INDEX, "https://www.site.test/blog", &post_pattern(), 2);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://www.site.test/post/primo");
        assert_eq!(links[1].url, "https://www.site.test/post/secondo");
    }

    #[test]
    fn test_non_positive_limit_is_one() {
        let mut cfg = DiscoveryConfig {
            index_url: "https://www.site.test/blog".into(),
            pattern: post_pattern(),
            limit: 0,
        };
        assert_eq!(cfg.effective_limit(), 1);
        cfg.limit = -7;
        assert_eq!(cfg.effective_limit(), 1);
        cfg.limit = 3;
        assert_eq!(cfg.effective_limit(), 3);
    }

    #[test]
    fn test_absolute_links_kept_verbatim() {
        let base = Url::parse("https://www.site.test/blog").unwrap();
        assert_eq!(
            resolve_href(&base, "https://other.test/post/a?x=1#frag").as_deref(),
            Some("https://other.test/post/a?x=1#frag")
        );
        assert_eq!(resolve_href(&base, "javascript:void(0)"), None);
        assert_eq!(resolve_href(&base, "mailto:x@y.z"), None);
        assert_eq!(resolve_href(&base, "  "), None);
        assert_eq!(resolve_href(&base, "#top"), None);
    }

    #[test]
    fn test_relative_links_resolved_against_index_directory() {
        let base = Url::parse("https://www.site.test/blog/").unwrap();
        assert_eq!(
            resolve_href(&base, "post/b").as_deref(),
            Some("https://www.site.test/blog/post/b")
        );
        assert_eq!(
            resolve_href(&base, "./post/c").as_deref(),
            Some("https://www.site.test/blog/post/c")
        );
        assert_eq!(
            resolve_href(&base, "//cdn.site.test/post/d").as_deref(),
            Some("https://cdn.site.test/post/d")
        );
    }

    #[test]
    fn test_dot_segments_collapse_before_dedup() {
        let html = r#"<a href="/post/a">A</a><a href="../post/a">A again</a><a href="post/b">B</a>"#;
        let links = extract_links(html, "https://www.site.test/blog/", &post_pattern(), 10);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        // `post/b` lands under /blog/ and no longer matches the article pattern.
        assert_eq!(urls, vec!["https://www.site.test/post/a"]);
        assert_eq!(links[0].anchor_text, "A");
    }

    #[test]
    fn test_dot_segments_do_not_consume_limit() {
        let html = r#"<a href="/post/a">A</a><a href="../post/a">A</a><a href="/post/b">B</a>"#;
        let links = extract_links(html, "https://www.site.test/blog/", &post_pattern(), 2);
        let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://www.site.test/post/a", "https://www.site.test/post/b"]);
    }

    #[tokio::test]
    async fn test_discover_limit_two_of_five() {
        let server = MockServer::start().await;
        let body = (1..=5)
            .map(|i| format!("<a href=\"/post/p{i}\">P{i}</a>"))
            .collect::<String>();
        Mock::given(method("GET"))
            .and(path("/blog"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("", Duration::from_secs(5), "sentinel-test").unwrap();
        let discovery = DiscoveryConfig {
            index_url: format!("{}/blog", server.uri()),
            pattern: post_pattern(),
            limit: 2,
        };
        let links = discover(&fetcher, &discovery).await;
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, format!("{}/post/p1", server.uri()));
        assert_eq!(links[1].url, format!("{}/post/p2", server.uri()));
    }

    #[tokio::test]
    async fn test_discover_failure_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new("", Duration::from_secs(5), "sentinel-test").unwrap();
        let discovery = DiscoveryConfig {
            index_url: format!("{}/blog", server.uri()),
            pattern: post_pattern(),
            limit: 5,
        };
        assert!(discover(&fetcher, &discovery).await.is_empty());
    }
}
