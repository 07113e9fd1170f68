//! Download orchestration
//!
//! The downloader turns a [`job::DownloadJob`] (variables + date range) into
//! a merged CSV:
//!
//! 1. **Resolve**: each variable's listing page is fetched and the dated
//!    links covering the range are selected
//! 2. **Fetch + parse**: each day page is fetched sequentially through the
//!    rate limiter and parsed per the variable's source layout
//! 3. **Merge**: day records concatenate into a variable record; variable
//!    records join column-wise on the first variable's timestamp index
//! 4. **Trim + write**: descriptor-excluded columns are dropped by name and
//!    the result is written as `OMIE_<start>_<end>.csv`

pub mod executor;
pub mod job;

pub use executor::{run, DownloadExecutor, DownloadSummary};
pub use job::DownloadJob;

use crate::fetcher::{FetcherError, ListingError, PageError};
use crate::output::OutputError;
use crate::parser::ParserError;
use crate::registry::RegistryError;
use crate::table::TableError;

/// Download errors
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// Fetch error
    #[error("fetch error: {0}")]
    Fetcher(#[from] FetcherError),

    /// Listing resolution error
    #[error("listing error: {0}")]
    Listing(#[from] ListingError),

    /// Day-page structure error
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// Table parse error
    #[error("parse error: {0}")]
    Parser(#[from] ParserError),

    /// Table merge error
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Unknown variable
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Output write error
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Job requested no variables that target the hourly table
    #[error("job selected no hourly-table variables")]
    NoHourlyVariables,

    /// A shutdown request arrived between fetches
    #[error("download interrupted by shutdown request")]
    Interrupted,
}
