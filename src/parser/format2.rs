//! Format 2: matched-program tables
//!
//! Layout, one series per row after three header rows, two trailer rows at
//! the end:
//!
//! ```text
//! PDBC_TOT;;Fecha Sesion;01/10/2018;;
//! ;;;;
//! Concepto;Unidades;H1;...;H24;;
//! Energia compra sistema espanol;MWh;1.234,56;...;987,65;;
//! ...
//! *
//! ```
//!
//! The session date sits at field 3 of the first row (`DD/MM/YYYY`). Each
//! data row contributes one output column named `{field0}_{field1}`; its
//! value cells are the fields between the two name fields and the two
//! trailing markers. Values use the regional convention (`.` thousands,
//! `,` decimal) and are normalized before numeric coercion.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::parser::{ParserError, ParserResult};
use crate::table::{Column, Table};

/// Header rows before the data block
const HEADER_ROWS: usize = 3;
/// Trailer rows after the data block
const TRAILER_ROWS: usize = 2;
/// Field position of the session date in the first header row
const DATE_FIELD: usize = 3;
/// Minimum fields per data row: two name fields, one value, two markers.
const MIN_FIELDS: usize = 5;

/// Parse a format-2 payload into a day record
pub fn parse_format2(raw: &str) -> ParserResult<Table> {
    // The HTML layer may have normalized the file's CRLF terminators.
    let normalized = raw.replace("\r\n", "\n");
    let rows: Vec<&str> = normalized.split('\n').collect();
    if rows.len() < HEADER_ROWS + TRAILER_ROWS + 1 {
        return Err(ParserError::EmptyTable);
    }

    let date = parse_session_date(rows[0])?;

    let mut columns: Vec<Column> = Vec::new();
    let mut hours: Option<usize> = None;

    for (i, row) in rows[HEADER_ROWS..rows.len() - TRAILER_ROWS].iter().enumerate() {
        let fields: Vec<&str> = row.split(';').collect();
        if fields.len() < MIN_FIELDS {
            return Err(ParserError::MalformedRow {
                row: i + 1,
                expected: MIN_FIELDS,
                got: fields.len(),
            });
        }

        let name = format!("{}_{}", fields[0].trim(), fields[1].trim());
        let values: Vec<Option<Decimal>> = fields[2..fields.len() - 2]
            .iter()
            .map(|cell| parse_value(cell))
            .collect();

        match hours {
            None => hours = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(ParserError::ColumnCountMismatch {
                    row: i + 1,
                    expected,
                    got: values.len(),
                });
            }
            Some(_) => {}
        }
        columns.push(Column::new(name, values));
    }

    let hours = hours.ok_or(ParserError::EmptyTable)?;
    // SAFETY: midnight is always valid.
    let midnight = date.and_hms_opt(0, 0, 0).expect("midnight is always valid");
    let index = (0..hours as i64)
        .map(|h| midnight + Duration::hours(h))
        .collect();

    // Every column was checked against the first row's value count.
    Ok(Table::new(index, columns).expect("columns match index length"))
}

fn parse_session_date(header: &str) -> ParserResult<NaiveDate> {
    let field = header
        .split(';')
        .nth(DATE_FIELD)
        .ok_or_else(|| ParserError::InvalidSessionDate {
            value: header.to_string(),
        })?;
    NaiveDate::parse_from_str(field.trim(), "%d/%m/%Y").map_err(|_| {
        ParserError::InvalidSessionDate {
            value: field.to_string(),
        }
    })
}

/// Strip thousands separators, turn the decimal comma into a period, then
/// coerce; anything still non-numeric becomes a missing value.
fn parse_value(cell: &str) -> Option<Decimal> {
    let cleaned = cell.trim().replace('.', "").replace(',', ".");
    Decimal::from_str(&cleaned).ok()
}
