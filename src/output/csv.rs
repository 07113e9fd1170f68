//! CSV output writer for merged tables

use csv::Writer;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult};
use crate::table::Table;

const DEFAULT_BUFFER_SIZE: usize = 8192; // 8KB buffer

/// Timestamp format of the index column
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV writer for time-indexed tables
///
/// Columns are dynamic (they depend on the variable set), so records are
/// written field-by-field rather than through serde. Missing values become
/// empty fields.
pub struct CsvTableWriter {
    writer: Writer<BufWriter<File>>,
    rows_written: usize,
}

impl CsvTableWriter {
    /// Create a writer for the given path
    pub fn new<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        Self::new_with_buffer_size(path, DEFAULT_BUFFER_SIZE)
    }

    /// Create a writer with a custom buffer size
    pub fn new_with_buffer_size<P: AsRef<Path>>(path: P, buffer_size: usize) -> OutputResult<Self> {
        let path = path.as_ref();
        debug!("Creating CSV writer: path={}", path.display());

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::IoError(format!("Failed to create directory: {e}")))?;
        }

        let file = File::create(path)
            .map_err(|e| OutputError::IoError(format!("Failed to create file: {e}")))?;
        let buf_writer = BufWriter::with_capacity(buffer_size, file);
        let writer = Writer::from_writer(buf_writer);

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Write a table: header row, then one record per index row
    pub fn write_table(&mut self, table: &Table) -> OutputResult<()> {
        let mut header = vec!["timestamp".to_string()];
        header.extend(table.column_names().iter().map(|n| n.to_string()));
        self.writer
            .write_record(&header)
            .map_err(|e| OutputError::CsvError(format!("Failed to write header: {e}")))?;

        for (i, ts) in table.index().iter().enumerate() {
            let mut record = Vec::with_capacity(table.columns().len() + 1);
            record.push(ts.format(TIMESTAMP_FORMAT).to_string());
            for column in table.columns() {
                record.push(
                    column.values[i]
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                );
            }
            self.writer
                .write_record(&record)
                .map_err(|e| OutputError::CsvError(format!("Failed to write row: {e}")))?;
            self.rows_written += 1;
        }
        Ok(())
    }

    /// Data rows written so far (header excluded)
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush buffered data to disk
    pub fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::FlushError(format!("Failed to flush: {e}")))
    }

    /// Close the writer and finalize output
    pub fn close(mut self) -> OutputResult<()> {
        self.flush()?;

        let buf_writer = self
            .writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get inner writer: {e}")))?;
        let file = buf_writer
            .into_inner()
            .map_err(|e| OutputError::IoError(format!("Failed to get file handle: {e}")))?;
        file.sync_all()
            .map_err(|e| OutputError::IoError(format!("Failed to sync file: {e}")))?;

        info!("CSV writer closed: {} rows written", self.rows_written);
        Ok(())
    }
}
