//! # OMIE Data Downloader Library
//!
//! A library for downloading day-ahead electricity market data published by
//! OMIE (the Iberian market operator) as dated flat-text files behind a
//! public listing page. Designed for building merged hourly price/program
//! datasets for research and backtesting.
//!
//! ## Features
//!
//! - **Dated-link resolution**: turns a calendar date range into the exact
//!   set of daily file links on a variable's listing page, with gap detection
//! - **Two source layouts**: parses both flat-text table formats the site
//!   publishes (price tables and matched-program tables) into one typed,
//!   hourly-indexed record
//! - **Rate limiting**: a shared minimum-spacing limiter keeps all requests
//!   of a session at least a fixed interval apart
//! - **Bounded retry**: timeouts and connection failures are retried a fixed
//!   number of times with a fixed backoff, then surfaced as typed errors
//! - **Merged CSV output**: per-variable records are joined on the hourly
//!   timestamp index and written as a single CSV per date range
//!
//! ## Quick Start
//!
//! ```no_run
//! use omie_data_downloader::downloader::{DownloadExecutor, DownloadJob};
//! use omie_data_downloader::DateRange;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let range = DateRange::parse("2018-10-01", "2018-10-02")?;
//! let job = DownloadJob::with_default_variables(range, "./data".into());
//!
//! let executor = DownloadExecutor::with_http_defaults(2)?;
//! let summary = executor.execute(&job).await?;
//! println!("wrote {} rows to {}", summary.rows, summary.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`registry`] - Fixed catalog of supported variables and their layouts
//! - [`fetcher`] - Rate-limited page fetching, listing resolution
//! - [`parser`] - The two flat-text table parsers
//! - [`table`] - In-memory time-indexed tables (concat, join, column drops)
//! - [`downloader`] - Download orchestration
//! - [`output`] - CSV writing and output-path generation
//! - [`cli`] - CLI command implementations

#![warn(missing_docs)]
#![warn(clippy::all)]

use chrono::NaiveDate;
use serde::Serialize;

/// CLI command implementations
pub mod cli;

/// Download orchestration
pub mod downloader;

/// Page fetching and link resolution
pub mod fetcher;

/// Data output writers
pub mod output;

/// Flat-text table parsers
pub mod parser;

/// Catalog of supported variables
pub mod registry;

/// Graceful shutdown coordination shared across modules
pub mod shutdown;

/// Time-indexed tables
pub mod table;

// Re-export commonly used types
pub use registry::{SourceFormat, TargetTable, VariableDescriptor};
pub use table::{Column, Table};

/// Errors constructing a [`DateRange`]
#[derive(Debug, thiserror::Error)]
pub enum DateRangeError {
    /// Input string did not parse as a calendar date
    #[error("invalid date {value:?}: expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// Range was given backwards
    #[error("start date {start} is after end date {end}")]
    StartAfterEnd {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },
}

/// Inclusive calendar date range, start ≤ end
///
/// The invariant is enforced at construction; accessors expose the bounds
/// read-only so it cannot be broken afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range from already-parsed dates
    ///
    /// # Errors
    /// Returns [`DateRangeError::StartAfterEnd`] if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    /// First day of the range
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive)
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, inclusive (a single day is 1)
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| DateRangeError::InvalidDate {
        value: value.to_string(),
    })
}
