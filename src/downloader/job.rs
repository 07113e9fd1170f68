//! Download job specification

use serde::Serialize;
use std::path::PathBuf;

use crate::downloader::DownloadError;
use crate::registry;
use crate::DateRange;

/// Specification of one download run
#[derive(Debug, Clone, Serialize)]
pub struct DownloadJob {
    /// Variable names to aggregate, in output column order
    pub variables: Vec<String>,
    /// Calendar range to cover, inclusive
    pub range: DateRange,
    /// Directory the merged CSV is written into
    pub output_dir: PathBuf,
}

impl DownloadJob {
    /// Create a job for an explicit variable list
    pub fn new(variables: Vec<String>, range: DateRange, output_dir: PathBuf) -> Self {
        Self {
            variables,
            range,
            output_dir,
        }
    }

    /// Create a job covering the full registry set
    pub fn with_default_variables(range: DateRange, output_dir: PathBuf) -> Self {
        Self::new(registry::default_variables(), range, output_dir)
    }

    /// Validate job parameters against the registry
    pub fn validate(&self) -> Result<(), DownloadError> {
        if self.variables.is_empty() {
            return Err(DownloadError::NoHourlyVariables);
        }
        for name in &self.variables {
            registry::lookup(name)?;
        }
        Ok(())
    }
}
