//! Minimum-spacing rate limiter
//!
//! One limiter is shared (via [`Arc`]) by every request of a scraping
//! session, so the spacing holds globally regardless of which variable is
//! being fetched. The time of the last request lives inside the limiter,
//! not in process-wide state.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Enforces a minimum interval between consecutive requests
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum spacing
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Create a new shared limiter wrapped in [`Arc`]
    pub fn shared(min_interval: Duration) -> Arc<Self> {
        Arc::new(Self::new(min_interval))
    }

    /// The configured minimum spacing
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Sleep until the minimum interval since the last recorded request has
    /// elapsed. Returns immediately on the first request of a session.
    pub async fn wait_before_request(&self) {
        // Compute the remaining wait under the lock, sleep outside it.
        let remaining = {
            let last = self
                .last_request
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            last.and_then(|t| self.min_interval.checked_sub(t.elapsed()))
        };
        if let Some(wait) = remaining {
            if !wait.is_zero() {
                sleep(wait).await;
            }
        }
    }

    /// Record now as the time of the last request
    pub fn mark_request(&self) {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *last = Some(Instant::now());
    }
}
