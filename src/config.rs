//! Runtime configuration.
//!
//! [`SentinelConfig`] is a plain value object: it is loaded once from an
//! optional YAML file, patched with command-line/environment overrides, and
//! then passed by reference into every component that needs it.
//!
//! # File format
//!
//! ```yaml
//! base_url: https://www.finanzamille.com
//! content_path: /corso-1-1
//! cookie: "session=..."
//! fixed_urls:
//!   - /post/first-lesson
//!   - https://www.finanzamille.com/post/second-lesson
//! index_path: /blog
//! article_pattern: "^/post/[^/]+/?$"
//! discovery_limit: 10
//! max_concurrent_fetches: 1
//! max_retries: 0
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const DEFAULT_BASE_URL: &str = "https://www.finanzamille.com";
pub const DEFAULT_CONTENT_PATH: &str = "/corso-1-1";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X) AppleWebKit/537.36 (KHTML, like Gecko) Chrome Safari/537.36";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Site root, without trailing slash.
    pub base_url: String,
    pub content_path: String,
    /// Raw `Cookie` header value for the gated site. May be empty.
    pub cookie: String,
    pub fixed_urls: Vec<String>,
    pub index_path: String,
    /// Regex matched against the path of each resolved link.
    pub article_pattern: String,
    pub discovery_limit: i64,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_concurrent_fetches: usize,
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub news_region: String,
    pub news_window: String,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            content_path: DEFAULT_CONTENT_PATH.to_string(),
            cookie: String::new(),
            fixed_urls: Vec::new(),
            index_path: "/blog".to_string(),
            article_pattern: "^/post/[^/]+/?$".to_string(),
            discovery_limit: 10,
            timeout_secs: 25,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrent_fetches: 1,
            max_retries: 0,
            retry_base_delay_ms: 500,
            news_region: "us".to_string(),
            news_window: "6h".to_string(),
        }
    }
}

impl SentinelConfig {
    /// Load from a YAML file, or return defaults when no path is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn Error>> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)?;
                let parsed: SentinelConfig = serde_yaml::from_str(&raw)?;
                info!(path = %p.display(), "Loaded configuration file");
                parsed
            }
            None => SentinelConfig::default(),
        };
        config.normalize();
        Ok(config)
    }

    /// Apply command-line (or environment) values on top of the file values.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(v) = &cli.base_url {
            self.base_url = v.clone();
        }
        if let Some(v) = &cli.content_path {
            self.content_path = v.clone();
        }
        if let Some(v) = &cli.cookie {
            self.cookie = v.clone();
        }
        if let Some(v) = &cli.fixed_urls {
            self.fixed_urls = parse_url_list(v);
        }
        if let Some(v) = &cli.index_path {
            self.index_path = v.clone();
        }
        if let Some(v) = &cli.article_pattern {
            self.article_pattern = v.clone();
        }
        if let Some(v) = cli.discovery_limit {
            self.discovery_limit = v;
        }
        if let Some(v) = cli.concurrency {
            self.max_concurrent_fetches = v;
        }
        if let Some(v) = cli.retries {
            self.max_retries = v;
        }
        self.normalize();
        debug!(
            base_url = %self.base_url,
            index_path = %self.index_path,
            fixed = self.fixed_urls.len(),
            has_cookie = !self.cookie.is_empty(),
            "Configuration resolved"
        );
    }

    fn normalize(&mut self) {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.base_url.is_empty() {
            self.base_url = DEFAULT_BASE_URL.to_string();
        }
        self.fixed_urls = self
            .fixed_urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    /// The gated content page, honoring an explicit URL or path override.
    pub fn content_url(&self, url: Option<&str>, path: Option<&str>) -> String {
        resolve_target(&self.base_url, url, path, &self.content_path)
    }

    pub fn index_url(&self) -> String {
        resolve_target(&self.base_url, None, Some(&self.index_path), "/")
    }

    /// Fixed URL list with root-relative entries joined to the base.
    pub fn fixed_targets(&self) -> Vec<String> {
        self.fixed_urls
            .iter()
            .map(|u| absolutize(&self.base_url, u))
            .collect()
    }
}

/// Pick the fetch target: an explicit URL wins, otherwise `base + path`.
///
/// A path without a leading `/` gets one. An empty path falls back to
/// `default_path`.
pub fn resolve_target(
    base: &str,
    url: Option<&str>,
    path: Option<&str>,
    default_path: &str,
) -> String {
    if let Some(u) = url.filter(|u| !u.trim().is_empty()) {
        return u.trim().to_string();
    }
    let path = path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(default_path);
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Join root-relative addresses (`/x`) to the base; keep everything else.
pub fn absolutize(base: &str, url: &str) -> String {
    if url.starts_with('/') && !url.starts_with("//") {
        format!("{base}{url}")
    } else {
        url.to_string()
    }
}

/// Split a comma-separated URL list, dropping blanks.
pub fn parse_url_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
