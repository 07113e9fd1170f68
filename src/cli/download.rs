//! Download command implementation

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use super::{CliError, VariablesCommand};
use crate::downloader::{DownloadExecutor, DownloadJob};
use crate::fetcher::config::DEFAULT_MAX_RETRIES;
use crate::registry;
use crate::shutdown::SharedShutdown;
use crate::DateRange;

/// Top-level CLI definition
#[derive(Debug, Parser)]
#[command(
    name = "omie-data-downloader",
    about = "Download OMIE day-ahead market data into a merged CSV",
    version
)]
pub struct Cli {
    /// Maximum retry attempts for failed fetches
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Download a date range of market data into a merged CSV
    Download(DownloadArgs),
    /// List the known variables and their layouts
    Variables(VariablesCommand),
}

/// Arguments of the download command
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: String,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: String,

    /// Directory the merged CSV is written into
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Variables to download (defaults to the full registry set)
    #[arg(long, value_delimiter = ',')]
    pub variables: Vec<String>,
}

impl DownloadArgs {
    /// Execute the download command
    pub async fn execute(&self, cli: &Cli, shutdown: SharedShutdown) -> Result<(), CliError> {
        let range = DateRange::parse(&self.start_date, &self.end_date)?;
        let variables = if self.variables.is_empty() {
            registry::default_variables()
        } else {
            self.variables.clone()
        };

        let job = DownloadJob::new(variables, range, self.output_dir.clone());
        job.validate()?;

        let executor =
            DownloadExecutor::with_http_defaults(cli.max_retries)?.with_shutdown(shutdown);
        let summary = executor.execute(&job).await?;

        info!(
            "Done: {} ({} rows, {} columns)",
            summary.path.display(),
            summary.rows,
            summary.columns
        );
        Ok(())
    }
}
