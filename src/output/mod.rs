//! Data output writers

pub mod csv;
pub mod path;

pub use csv::CsvTableWriter;
pub use path::{output_filename, output_path};

/// Output errors
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    IoError(String),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Failed to flush buffered data
    #[error("flush error: {0}")]
    FlushError(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
