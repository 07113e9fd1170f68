//! Download executor: resolve, fetch, parse, merge, write

use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::downloader::{DownloadError, DownloadJob};
use crate::fetcher::config::{DEFAULT_MAX_RETRIES, MIN_REQUEST_INTERVAL};
use crate::fetcher::{
    extract_table_payload, listing_url, parse_listing, resolve_links, OmieHttpClient, PageFetcher,
    RateLimiter,
};
use crate::output::{output_path, CsvTableWriter};
use crate::parser::{parse_format1, parse_format2};
use crate::registry::{self, SourceFormat, TargetTable, VariableDescriptor};
use crate::shutdown::SharedShutdown;
use crate::table::Table;
use crate::DateRange;

/// Result of a completed download run
#[derive(Debug, Clone, Serialize)]
pub struct DownloadSummary {
    /// Path of the written CSV
    pub path: PathBuf,
    /// Data rows written (header excluded)
    pub rows: usize,
    /// Value columns written (timestamp column excluded)
    pub columns: usize,
}

/// Orchestrates the complete download workflow
pub struct DownloadExecutor {
    fetcher: Box<dyn PageFetcher>,
    shutdown: Option<SharedShutdown>,
}

impl DownloadExecutor {
    /// Create an executor around an explicit fetcher (tests inject an
    /// in-memory one here)
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            shutdown: None,
        }
    }

    /// Create an executor backed by the HTTP client with default spacing
    ///
    /// # Arguments
    /// * `max_retries` - Retries after the initial attempt per fetch
    pub fn with_http_defaults(max_retries: u32) -> Result<Self, DownloadError> {
        let limiter = RateLimiter::shared(MIN_REQUEST_INTERVAL);
        let client = OmieHttpClient::new(limiter, max_retries)?;
        Ok(Self::new(Box::new(client)))
    }

    /// Create an executor with the library default retry count
    pub fn with_defaults() -> Result<Self, DownloadError> {
        Self::with_http_defaults(DEFAULT_MAX_RETRIES)
    }

    /// Attach a shutdown coordinator, checked between fetches
    pub fn with_shutdown(mut self, shutdown: SharedShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Execute a job and write the merged CSV
    ///
    /// # Errors
    /// Resolution, fetch, parse and merge failures abort the run before the
    /// output file is created.
    pub async fn execute(&self, job: &DownloadJob) -> Result<DownloadSummary, DownloadError> {
        job.validate()?;
        info!(
            "downloading {} variables for {}..{}",
            job.variables.len(),
            job.range.start(),
            job.range.end()
        );

        let mut merged: Option<Table> = None;
        let mut excluded: Vec<&'static str> = Vec::new();

        for name in &job.variables {
            let descriptor = registry::lookup(name)?;
            if descriptor.target_table != TargetTable::Hourly {
                debug!("skipping {}: not an hourly-table variable", name);
                continue;
            }

            let record = self.download_variable(descriptor, &job.range).await?;
            excluded.extend_from_slice(descriptor.excluded_columns);
            merged = Some(match merged {
                None => record,
                Some(table) => table.left_join(&record)?,
            });
        }

        let merged = merged.ok_or(DownloadError::NoHourlyVariables)?;
        let trimmed = merged.drop_columns(&excluded)?;

        let path = output_path(&job.output_dir, &job.range)?;
        let mut writer = CsvTableWriter::new(&path)?;
        writer.write_table(&trimmed)?;
        let rows = writer.rows_written();
        writer.close()?;

        info!(
            "wrote {} rows x {} columns to {}",
            rows,
            trimmed.columns().len(),
            path.display()
        );
        Ok(DownloadSummary {
            path,
            rows,
            columns: trimmed.columns().len(),
        })
    }

    /// Fetch and parse every day of the range for one variable
    async fn download_variable(
        &self,
        descriptor: &VariableDescriptor,
        range: &DateRange,
    ) -> Result<Table, DownloadError> {
        let url = listing_url(descriptor.name);
        debug!("resolving links for {} at {}", descriptor.name, url);

        self.check_shutdown()?;
        let listing_html = self.fetcher.fetch_text(&url).await?;
        let entries = parse_listing(&listing_html)?;
        let links = resolve_links(&entries, range)?;
        info!("{}: {} day files to fetch", descriptor.name, links.len());

        let mut days = Vec::with_capacity(links.len());
        for href in &links {
            self.check_shutdown()?;
            let page = self.fetcher.fetch_text(href).await?;
            let payload = extract_table_payload(&page)?;
            let record = match descriptor.source_format {
                SourceFormat::Format1 => parse_format1(&payload)?,
                SourceFormat::Format2 => parse_format2(&payload)?,
            };
            debug!("{}: parsed {} rows from {}", descriptor.name, record.len(), href);
            days.push(record);
        }

        Ok(Table::concat(days)?)
    }

    fn check_shutdown(&self) -> Result<(), DownloadError> {
        if let Some(shutdown) = &self.shutdown {
            if shutdown.is_shutdown_requested() {
                return Err(DownloadError::Interrupted);
            }
        }
        Ok(())
    }
}

/// One-call aggregation: download `variables` over `range` and write the
/// merged CSV under `output_dir`, using the default HTTP client.
pub async fn run(
    variables: Vec<String>,
    range: DateRange,
    output_dir: PathBuf,
) -> Result<DownloadSummary, DownloadError> {
    let job = DownloadJob::new(variables, range, output_dir);
    let executor = DownloadExecutor::with_defaults()?;
    executor.execute(&job).await
}
