//! Output path generation
//!
//! The merged CSV is named after the normalized range bounds:
//! `OMIE_<YYYYMMDD-start>_<YYYYMMDD-end>.csv`.

use std::path::{Path, PathBuf};

use super::{OutputError, OutputResult};
use crate::DateRange;

/// File name for a range's merged CSV
pub fn output_filename(range: &DateRange) -> String {
    format!(
        "OMIE_{}_{}.csv",
        range.start().format("%Y%m%d"),
        range.end().format("%Y%m%d")
    )
}

/// Full output path under `dir`, creating the directory if needed
pub fn output_path(dir: &Path, range: &DateRange) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        OutputError::IoError(format!(
            "Failed to create directory {}: {e}",
            dir.display()
        ))
    })?;
    Ok(dir.join(output_filename(range)))
}
