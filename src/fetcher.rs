//! Authenticated page retrieval with outcome classification.
//!
//! Every fetch returns a [`FetchOutcome`]; nothing in this module returns an
//! error to the caller. Transport problems, HTTP errors, and expired
//! credentials are all data.
//!
//! # Architecture
//!
//! - [`PageFetcher`]: Core trait, one GET per call, no retries
//! - [`HttpFetcher`]: `reqwest` implementation carrying the site cookie
//! - [`RetryFetch`]: Decorator that retries transient failures with backoff
//!
//! # Authentication signal
//!
//! A response is [`FetchStatus::Unauthorized`] when the status is 401/403 or
//! when the final URL after redirects has a path containing `login`
//! (case-insensitive). The body is never inspected.

use crate::config::SentinelConfig;
use crate::models::{FetchOutcome, FetchStatus};
use rand::{Rng, rng};
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const MAX_REDIRECTS: usize = 10;

/// Trait for fetching one page.
///
/// Implementors perform exactly one attempt per call and classify the result.
pub trait PageFetcher {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

impl<T: PageFetcher> PageFetcher for &T {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        (**self).fetch(url).await
    }
}

/// Classify a received response from its status code and final URL.
pub fn classify(status: u16, final_url: &str) -> FetchStatus {
    if status == StatusCode::UNAUTHORIZED.as_u16()
        || status == StatusCode::FORBIDDEN.as_u16()
        || is_login_url(final_url)
    {
        FetchStatus::Unauthorized
    } else if status != StatusCode::OK.as_u16() {
        FetchStatus::HttpError(status)
    } else {
        FetchStatus::Success
    }
}

/// `true` if the URL path contains `login`, ignoring case.
pub fn is_login_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase().contains("login"),
        Err(_) => url.to_ascii_lowercase().contains("login"),
    }
}

/// `reqwest`-backed fetcher for the gated site.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    cookie: String,
}

impl HttpFetcher {
    /// Build a fetcher with a fixed timeout and User-Agent. Redirects are
    /// followed up to 10 hops.
    pub fn new(
        cookie: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self {
            client,
            cookie: cookie.into(),
        })
    }

    pub fn from_config(config: &SentinelConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.cookie.clone(), config.timeout(), &config.user_agent)
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let t0 = Instant::now();
        let mut request = self.client.get(url).header(ACCEPT, ACCEPT_HTML);
        if !self.cookie.is_empty() {
            request = request.header(COOKIE, &self.cookie);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Request failed");
                return FetchOutcome::transport(url, e.to_string());
            }
        };

        let http_status = response.status().as_u16();
        let final_url = response.url().to_string();
        let status = classify(http_status, &final_url);

        let body = if status == FetchStatus::Success {
            match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(error = %e, "Failed reading response body");
                    return FetchOutcome::transport(url, e.to_string());
                }
            }
        } else {
            None
        };

        match &status {
            FetchStatus::Success => info!(
                %final_url,
                bytes = body.as_ref().map_or(0, String::len),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Fetched page"
            ),
            FetchStatus::Unauthorized => {
                warn!(http_status, %final_url, "Credential rejected or redirected to login")
            }
            other => warn!(http_status, %final_url, status = ?other, "Non-success response"),
        }

        FetchOutcome {
            status,
            requested_url: url.to_string(),
            final_url,
            http_status: Some(http_status),
            body,
        }
    }
}

/// Wrapper that retries transient failures of any [`PageFetcher`].
///
/// Only transport errors and 5xx responses are retried; an unauthorized or
/// 4xx outcome is returned immediately. The delay between attempts is
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
///
/// With `max_retries = 0` this is a pass-through.
pub struct RetryFetch<F> {
    inner: F,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<F> RetryFetch<F>
where
    F: PageFetcher,
{
    pub fn new(inner: F, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> Duration {
        let exp = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        let delay = self.base_delay.saturating_mul(1u32 << exp).min(self.max_delay);
        if delay.is_zero() {
            return delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + Duration::from_millis(jitter_ms)
    }
}

impl<F> fmt::Debug for RetryFetch<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

fn is_transient(status: &FetchStatus) -> bool {
    match status {
        FetchStatus::TransportError(_) => true,
        FetchStatus::HttpError(code) => *code >= 500,
        FetchStatus::Success | FetchStatus::Unauthorized => false,
    }
}

impl<F> PageFetcher for RetryFetch<F>
where
    F: PageFetcher,
{
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let outcome = self.inner.fetch(url).await;
            if !is_transient(&outcome.status) {
                if attempt > 0 {
                    debug!(attempt, status = ?outcome.status, "Fetch settled after retry");
                }
                return outcome;
            }

            attempt += 1;
            if attempt > self.max_retries {
                if self.max_retries > 0 {
                    error!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_total = total_t0.elapsed().as_millis() as u64,
                        status = ?outcome.status,
                        "fetch() exhausted retries"
                    );
                }
                return outcome;
            }

            let delay = self.backoff(attempt);
            warn!(
                attempt,
                max = self.max_retries,
                ?delay,
                status = ?outcome.status,
                "fetch() attempt failed; backing off"
            );
            sleep(delay).await;
        }
    }
}
