//! Page fetching for the OMIE public site
//!
//! The site serves two kinds of pages: per-variable listings (anchors with
//! dated filenames) and day pages whose body holds the raw table text in a
//! single paragraph element. Everything is fetched through [`PageFetcher`],
//! which the HTTP client implements with rate limiting and bounded retry;
//! tests substitute an in-memory implementation.

use async_trait::async_trait;

pub mod config;
pub mod listing;
pub mod omie_http;
pub mod page;
pub mod rate_limit;

pub use listing::{extract_date, listing_url, parse_listing, resolve_links, LinkEntry, ListingError};
pub use omie_http::OmieHttpClient;
pub use page::{extract_table_payload, PageError};
pub use rate_limit::RateLimiter;

/// Fetcher errors
#[derive(Debug, thiserror::Error)]
pub enum FetcherError {
    /// Failed to construct the HTTP client
    #[error("HTTP client error: {0}")]
    ClientError(String),

    /// Network-level failure (connection refused, DNS, broken body read)
    #[error("network error: {0}")]
    NetworkError(String),

    /// All retry attempts failed
    #[error("fetch failed after {attempts} attempts for {url}: {last_error}")]
    RetriesExhausted {
        /// URL that could not be fetched
        url: String,
        /// Total attempts made (initial try + retries)
        attempts: u32,
        /// Message of the last underlying failure
        last_error: String,
    },
}

/// Result type for fetcher operations
pub type FetcherResult<T> = Result<T, FetcherError>;

/// A source of page bodies
///
/// One call is one HTTP GET. Implementations are expected to serialize
/// requests and enforce inter-request spacing; callers simply await.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch a page and return its body as text
    async fn fetch_text(&self, url: &str) -> FetcherResult<String>;
}
