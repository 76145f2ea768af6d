//! HTTP client for product page retrieval
//!
//! Browser-like headers reduce bot blocking; a process-wide rate limiter keeps
//! page fetches polite. Every request is bounded by the configured timeout.

use anyhow::{Context, Result};
use async_trait::async_trait;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{
    Client,
    header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT},
};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::domain::services::PageFetcher;
use crate::infrastructure::config::PageFetchConfig;

/// HTTP client configuration for page fetching
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    /// Create HttpClientConfig from PageFetchConfig
    #[must_use]
    pub fn from_page_fetch_config(config: &PageFetchConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
            timeout_seconds: config.timeout_seconds,
            max_requests_per_second: config.max_requests_per_second,
            follow_redirects: true,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_page_fetch_config(&PageFetchConfig::default())
    }
}

/// Rate-limited HTTP client
pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("Invalid accept header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid accept-language header")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .cookie_store(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("Rate limit must be greater than 0")?,
        );
        let rate_limiter = RateLimiter::direct(quota);

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch URL and return text content; non-success statuses are errors
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;

        tracing::info!("Fetching product page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP request failed with status {}: {}", status, url);
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        tracing::debug!("Fetched {} ({} chars)", url, text.len());
        Ok(text)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.get_text(url).await
    }
}
