//! Integration tests for request spacing

use omie_data_downloader::fetcher::RateLimiter;
use std::time::{Duration, Instant};

/// Across a simulated sequence of fetches, no two consecutive fetch start
/// times differ by less than the configured delay.
#[tokio::test]
async fn test_simulated_fetch_sequence_respects_minimum_spacing() {
    let interval = Duration::from_millis(25);
    let limiter = RateLimiter::shared(interval);

    let mut starts = Vec::new();
    for _ in 0..4 {
        limiter.wait_before_request().await;
        starts.push(Instant::now());
        // The "request" completes immediately in this simulation
        limiter.mark_request();
    }

    assert_eq!(starts.len(), 4);
    for pair in starts.windows(2) {
        let gap = pair[1] - pair[0];
        assert!(
            gap >= interval,
            "consecutive fetch starts only {gap:?} apart, configured delay {interval:?}"
        );
    }
}

/// A shared limiter spaces requests made through different handles, the way
/// one session's fetches for different variables share a single limiter.
#[tokio::test]
async fn test_spacing_holds_across_shared_handles() {
    let interval = Duration::from_millis(20);
    let limiter = RateLimiter::shared(interval);
    let other = limiter.clone();

    limiter.wait_before_request().await;
    let first = Instant::now();
    limiter.mark_request();

    other.wait_before_request().await;
    let second = Instant::now();
    other.mark_request();

    assert!(second - first >= interval);
}
