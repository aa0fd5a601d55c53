//! News API client with optional exponential backoff retry logic.
//!
//! This module is the only place that talks to the backend. It exposes:
//! - [`NewsApi`]: Core trait describing the three read-only endpoints
//! - [`HttpNewsApi`]: `reqwest` implementation of [`NewsApi`]
//! - [`RetryNewsApi`]: Decorator that adds retry logic to any `NewsApi` implementation
//! - [`NewsApiError`]: Why a request failed
//!
//! # Endpoints
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/` | `{ "message": ... }` |
//! | `GET` | `/api/categories` | `{ "categories": [...] }` |
//! | `GET` | `/api/news?category=..&query=..` | `[ { "article": .., "summary": .., "sentiment": .. } ]` |
//!
//! Both query parameters are always sent, in that order, and percent-encoded.
//!
//! # Retry Strategy
//!
//! Retries are off unless configured. When enabled:
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to prevent thundering herd

use crate::models::{ArticleResult, CategoriesResponse, SearchParams, Welcome};
use crate::utils::truncate_for_log;
use rand::{Rng, rng};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};
use url::Url;

/// Why a request to the News API failed.
///
/// The view treats every variant the same way (log and keep stale state); the
/// variants exist so the log line says what actually went wrong.
#[derive(Debug, Error)]
pub enum NewsApiError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The read-only surface of the News API.
pub trait NewsApi {
    /// Fetch the backend banner from `GET /`.
    async fn welcome(&self) -> Result<Welcome, NewsApiError>;

    /// Fetch the list of valid categories.
    async fn categories(&self) -> Result<Vec<String>, NewsApiError>;

    /// Fetch enriched articles for a category and free-text query.
    async fn search(&self, params: &SearchParams) -> Result<Vec<ArticleResult>, NewsApiError>;
}

/// [`NewsApi`] over HTTP.
///
/// The base URL may carry a path prefix (`http://host/news`); endpoint paths
/// are resolved relative to it.
#[derive(Debug, Clone)]
pub struct HttpNewsApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpNewsApi {
    /// Create a client for the backend rooted at `base_url`.
    ///
    /// `timeout` applies to each whole request; `None` waits indefinitely.
    pub fn new(base_url: &str, timeout: Option<StdDuration>) -> Result<Self, NewsApiError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn welcome_url(&self) -> Result<Url, NewsApiError> {
        Ok(self.base.clone())
    }

    pub fn categories_url(&self) -> Result<Url, NewsApiError> {
        Ok(self.base.join("api/categories")?)
    }

    /// `api/news` with `category` and `query` percent-encoded, in that order.
    pub fn news_url(&self, params: &SearchParams) -> Result<Url, NewsApiError> {
        let mut url = self.base.join("api/news")?;
        let query = format!(
            "category={}&query={}",
            urlencoding::encode(&params.category),
            urlencoding::encode(&params.query)
        );
        url.set_query(Some(&query));
        Ok(url)
    }

    #[instrument(level = "debug", skip_all, fields(url = %url))]
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, NewsApiError> {
        let t0 = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsApiError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Received response"
        );

        serde_json::from_str(&body).map_err(|source| {
            warn!(
                error = %source,
                body_preview = %truncate_for_log(&body, 300),
                "Response did not match the expected shape"
            );
            NewsApiError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}

impl NewsApi for HttpNewsApi {
    async fn welcome(&self) -> Result<Welcome, NewsApiError> {
        let url = self.welcome_url()?;
        self.get_json(url).await
    }

    async fn categories(&self) -> Result<Vec<String>, NewsApiError> {
        let url = self.categories_url()?;
        let body: CategoriesResponse = self.get_json(url).await?;
        Ok(body.categories)
    }

    async fn search(&self, params: &SearchParams) -> Result<Vec<ArticleResult>, NewsApiError> {
        let url = self.news_url(params)?;
        self.get_json(url).await
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`NewsApi`] implementation.
///
/// With `max_retries == 0` every call is forwarded exactly once.
///
/// # Backoff Strategy
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetryNewsApi<T> {
    /// The underlying client to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap to prevent excessive waiting.
    max_delay: StdDuration,
}

impl<T> RetryNewsApi<T>
where
    T: NewsApi,
{
    /// Create a new retry wrapper around an existing [`NewsApi`] implementation.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let http = HttpNewsApi::new("http://localhost:8000", None)?;
    /// let api = RetryNewsApi::new(http, 3, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = u32::try_from(attempt.saturating_sub(1)).unwrap_or(u32::MAX).min(16);
        let mut delay = self.base_delay.saturating_mul(1 << shift);
        if delay > self.max_delay {
            delay = self.max_delay;
        }
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }

    async fn with_retries<R, F, Fut>(&self, op: &'static str, mut call: F) -> Result<R, NewsApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, NewsApiError>>,
    {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match call().await {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                op,
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_dt.as_millis() as u64,
                                error = %e,
                                "request exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        op,
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u64,
                        elapsed_ms_total = total_dt.as_millis() as u64,
                        ?delay,
                        error = %e,
                        "request failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

impl<T> fmt::Debug for RetryNewsApi<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryNewsApi")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> NewsApi for RetryNewsApi<T>
where
    T: NewsApi,
{
    async fn welcome(&self) -> Result<Welcome, NewsApiError> {
        self.with_retries("welcome", || self.inner.welcome()).await
    }

    #[instrument(level = "info", skip_all)]
    async fn categories(&self) -> Result<Vec<String>, NewsApiError> {
        self.with_retries("categories", || self.inner.categories()).await
    }

    #[instrument(level = "info", skip_all, fields(category = %params.category, query = %params.query))]
    async fn search(&self, params: &SearchParams) -> Result<Vec<ArticleResult>, NewsApiError> {
        self.with_retries("search", || self.inner.search(params)).await
    }
}
