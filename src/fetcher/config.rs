//! Fetch timing constants

use std::time::Duration;

/// Base URL of the per-variable listing pages; the variable name plus a
/// trailing slash completes the path.
pub const LISTING_URL_BASE: &str = "http://www.omie.es/aplicaciones/datosftp/datosftp.jsp?path=/";

/// Minimum spacing between any two requests of a session.
/// The site publishes one small file per day per variable; there is no reason
/// to hit it faster than this.
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(10);

/// Per-request HTTP timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Fixed wait before retrying a timed-out or failed connection.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(10);

/// Default number of retries after the initial attempt. Persistent failures
/// surface as [`crate::fetcher::FetcherError::RetriesExhausted`] instead of
/// looping forever.
pub const DEFAULT_MAX_RETRIES: u32 = 2;
