//! Format 1: hourly price tables
//!
//! Layout, one semicolon-terminated line per row:
//!
//! ```text
//! MARGINALPDBC;
//! 2018;10;01;1;58.95;58.95;
//! 2018;10;01;2;57.30;57.30;
//! *
//! ```
//!
//! The first row's first field names the two value columns (`{base}_1`,
//! `{base}_2`); the final row is a marker. The hour field is hour-ending
//! (1..=24, 23 or 25 on clock-change days); the output index is
//! hour-beginning, so each timestamp is midnight plus `hour - 1`.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::parser::{ParserError, ParserResult};
use crate::table::{Column, Table};

/// Minimum fields per data row: year, month, day, hour, two values.
const MIN_FIELDS: usize = 6;

/// Parse a format-1 payload into a day record
pub fn parse_format1(raw: &str) -> ParserResult<Table> {
    // The HTML layer may have normalized the file's CRLF terminators.
    let normalized = raw.replace("\r\n", "\n");
    let rows: Vec<&str> = normalized.split(";\n").collect();
    if rows.len() < 3 {
        return Err(ParserError::EmptyTable);
    }

    let base = rows[0].trim();
    let names = [format!("{base}_1"), format!("{base}_2")];

    let mut index = Vec::new();
    let mut values = [Vec::new(), Vec::new()];

    // Skip the name row and the trailing marker row.
    for (i, row) in rows[1..rows.len() - 1].iter().enumerate() {
        let fields: Vec<&str> = row.split(';').collect();
        if fields.len() < MIN_FIELDS {
            return Err(ParserError::MalformedRow {
                row: i + 1,
                expected: MIN_FIELDS,
                got: fields.len(),
            });
        }

        let year = parse_date_field::<i32>(fields[0], i)?;
        let month = parse_date_field::<u32>(fields[1], i)?;
        let day = parse_date_field::<u32>(fields[2], i)?;
        let hour = parse_date_field::<i64>(fields[3], i)?;

        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ParserError::InvalidDate {
                row: i + 1,
                value: format!("{year}-{month}-{day}"),
            }
        })?;
        // SAFETY: midnight is always valid.
        let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
        index.push(midnight + Duration::hours(hour - 1));

        values[0].push(parse_value(fields[4]));
        values[1].push(parse_value(fields[5]));
    }

    if index.is_empty() {
        return Err(ParserError::EmptyTable);
    }

    let [v1, v2] = values;
    let [n1, n2] = names;
    let columns = vec![Column::new(n1, v1), Column::new(n2, v2)];
    // Columns were filled one value per index row.
    Ok(Table::new(index, columns).expect("columns match index length"))
}

fn parse_date_field<T: FromStr>(field: &str, row: usize) -> ParserResult<T> {
    field.trim().parse().map_err(|_| ParserError::InvalidDate {
        row: row + 1,
        value: field.to_string(),
    })
}

/// Coerce a value cell; anything non-numeric becomes a missing value.
fn parse_value(field: &str) -> Option<Decimal> {
    Decimal::from_str(field.trim()).ok()
}
