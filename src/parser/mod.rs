//! Flat-text table parsers
//!
//! The site publishes two layouts. Format 1 (price files) has one row per
//! hour with two value columns; format 2 (matched-program files) has one row
//! per series with 24 hourly value cells. Both parse into a [`crate::Table`]
//! indexed by hour-beginning timestamps, with every value coerced to
//! `Decimal` and unparseable cells kept as `None` so a single bad cell does
//! not lose a day.

pub mod format1;
pub mod format2;

pub use format1::parse_format1;
pub use format2::parse_format2;

/// Parser errors
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// The payload has no data rows
    #[error("table has no data rows")]
    EmptyTable,

    /// A data row has too few fields
    #[error("malformed row {row}: expected at least {expected} fields, got {got}")]
    MalformedRow {
        /// 1-based data row number
        row: usize,
        /// Minimum field count for the layout
        expected: usize,
        /// Fields actually present
        got: usize,
    },

    /// A date component (year/month/day/hour) did not parse or form a date
    #[error("invalid date component in row {row}: {value:?}")]
    InvalidDate {
        /// 1-based data row number
        row: usize,
        /// The rejected field
        value: String,
    },

    /// The session date in the header did not parse
    #[error("invalid session date {value:?}: expected DD/MM/YYYY")]
    InvalidSessionDate {
        /// The rejected field
        value: String,
    },

    /// A row carries a different number of hourly values than the first row
    #[error("row {row} carries {got} values, expected {expected}")]
    ColumnCountMismatch {
        /// 1-based data row number
        row: usize,
        /// Value count of the first data row
        expected: usize,
        /// Value count found
        got: usize,
    },
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;
