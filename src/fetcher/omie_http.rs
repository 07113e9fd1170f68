//! HTTP page client with rate limiting and bounded retry
//!
//! One client serves a whole scraping session. Requests go through the
//! shared [`RateLimiter`], carry a fixed timeout, and are retried a bounded
//! number of times with a fixed backoff on timeout or connection failure.
//! A non-200 status is logged and the body returned as-is; callers validate
//! the content when they parse it.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::fetcher::config::{REQUEST_TIMEOUT, RETRY_BACKOFF};
use crate::fetcher::rate_limit::RateLimiter;
use crate::fetcher::{FetcherError, FetcherResult, PageFetcher};

/// HTTP client for the OMIE public site
pub struct OmieHttpClient {
    client: Client,
    rate_limiter: Arc<RateLimiter>,
    max_retries: u32,
}

impl OmieHttpClient {
    /// Create a client around a shared rate limiter
    ///
    /// # Arguments
    /// * `rate_limiter` - Shared limiter enforcing session-wide spacing
    /// * `max_retries` - Retries after the initial attempt before giving up
    pub fn new(rate_limiter: Arc<RateLimiter>, max_retries: u32) -> FetcherResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetcherError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            rate_limiter,
            max_retries,
        })
    }

    async fn attempt(&self, url: &str) -> Result<String, reqwest::Error> {
        self.rate_limiter.wait_before_request().await;
        let response = self.client.get(url).send().await?;
        // The request went through; later failures are not spacing concerns.
        self.rate_limiter.mark_request();

        let status = response.status();
        if status != StatusCode::OK {
            warn!("STATUS CODE {} on {}. Check it out.", status.as_u16(), url);
        } else {
            debug!("fetched {}", url);
        }
        response.text().await
    }
}

#[async_trait]
impl PageFetcher for OmieHttpClient {
    async fn fetch_text(&self, url: &str) -> FetcherResult<String> {
        let mut last_error = String::new();

        for attempt in 0..=self.max_retries {
            match self.attempt(url).await {
                Ok(body) => return Ok(body),
                Err(e) if e.is_timeout() => {
                    warn!(
                        "TIMEOUT on {} (attempt {}/{})",
                        url,
                        attempt + 1,
                        self.max_retries + 1
                    );
                    last_error = e.to_string();
                }
                Err(e) => {
                    warn!(
                        "Connection failed on {} (attempt {}/{}): {}",
                        url,
                        attempt + 1,
                        self.max_retries + 1,
                        e
                    );
                    last_error = e.to_string();
                }
            }
            if attempt < self.max_retries {
                debug!("retrying after {:?}", RETRY_BACKOFF);
                tokio::time::sleep(RETRY_BACKOFF).await;
            }
        }

        Err(FetcherError::RetriesExhausted {
            url: url.to_string(),
            attempts: self.max_retries + 1,
            last_error,
        })
    }
}
