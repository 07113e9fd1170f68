//! Time-indexed in-memory tables
//!
//! A [`Table`] is the unit the parsers produce (one day, one variable) and
//! the aggregator merges (row-wise [`Table::concat`] across days, column-wise
//! [`Table::left_join`] across variables). All values are `Option<Decimal>`;
//! cells that failed numeric coercion or had no join partner are `None` and
//! serialize as empty CSV fields.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Table errors
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Column length does not match the index length
    #[error("column {name:?} has {values} values but the index has {rows} rows")]
    LengthMismatch {
        /// Offending column name
        name: String,
        /// Number of values in the column
        values: usize,
        /// Number of index rows
        rows: usize,
    },

    /// Tables being concatenated do not share the same column layout
    #[error("cannot concatenate tables with different columns: {left:?} vs {right:?}")]
    ColumnMismatch {
        /// Column names of the accumulating table
        left: Vec<String>,
        /// Column names of the table being appended
        right: Vec<String>,
    },

    /// A join would introduce a column name that already exists
    #[error("duplicate column {name:?} in join")]
    DuplicateColumn {
        /// The colliding name
        name: String,
    },

    /// A named column expected to be present is missing
    #[error("schema mismatch: column {name:?} not present (columns: {available:?})")]
    SchemaMismatch {
        /// The missing column name
        name: String,
        /// Columns actually present
        available: Vec<String>,
    },

    /// Nothing to concatenate
    #[error("no tables to concatenate")]
    EmptyConcat,
}

/// One named column of optional decimal values
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name as it appears in the CSV header
    pub name: String,
    /// One value per index row; `None` for missing/unparseable cells
    pub values: Vec<Option<Decimal>>,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, values: Vec<Option<Decimal>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// A timestamp-indexed table
///
/// The index is ordered by construction (parsers emit hours in file order,
/// concat appends oldest-first) and may contain duplicate timestamps: on
/// clock-change days overlapping day files are preserved as-is rather than
/// deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, validating that every column matches the index length
    pub fn new(index: Vec<NaiveDateTime>, columns: Vec<Column>) -> Result<Self, TableError> {
        for column in &columns {
            if column.values.len() != index.len() {
                return Err(TableError::LengthMismatch {
                    name: column.name.clone(),
                    values: column.values.len(),
                    rows: index.len(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The timestamp index
    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    /// The columns, in output order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names, in output order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Concatenate day records row-wise, preserving order and duplicates
    ///
    /// All tables must carry the same columns in the same order.
    pub fn concat(tables: Vec<Table>) -> Result<Table, TableError> {
        let mut iter = tables.into_iter();
        let mut merged = iter.next().ok_or(TableError::EmptyConcat)?;

        for table in iter {
            if merged.column_names() != table.column_names() {
                return Err(TableError::ColumnMismatch {
                    left: merged.column_names().iter().map(|s| s.to_string()).collect(),
                    right: table.column_names().iter().map(|s| s.to_string()).collect(),
                });
            }
            merged.index.extend(table.index);
            for (dst, src) in merged.columns.iter_mut().zip(table.columns) {
                dst.values.extend(src.values);
            }
        }
        Ok(merged)
    }

    /// Join another table's columns onto this table's index
    ///
    /// The left index defines the output rows. Each row takes the values of
    /// the first right-side row with the same timestamp; rows without a
    /// partner get `None` in every joined column.
    pub fn left_join(&self, other: &Table) -> Result<Table, TableError> {
        for column in &other.columns {
            if self.columns.iter().any(|c| c.name == column.name) {
                return Err(TableError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }

        let mut first_at: HashMap<NaiveDateTime, usize> = HashMap::new();
        for (i, ts) in other.index.iter().enumerate() {
            first_at.entry(*ts).or_insert(i);
        }

        let mut columns = self.columns.clone();
        for column in &other.columns {
            let values = self
                .index
                .iter()
                .map(|ts| first_at.get(ts).and_then(|&i| column.values[i]))
                .collect();
            columns.push(Column::new(column.name.clone(), values));
        }
        Table::new(self.index.clone(), columns)
    }

    /// Remove the named columns, returning a new table
    ///
    /// Pure transformation; the receiver is untouched. Every requested name
    /// must be present, otherwise the configured exclusions no longer match
    /// the source schema and the run must not silently continue.
    pub fn drop_columns(&self, names: &[&str]) -> Result<Table, TableError> {
        for name in names {
            if !self.columns.iter().any(|c| c.name == *name) {
                return Err(TableError::SchemaMismatch {
                    name: name.to_string(),
                    available: self.columns.iter().map(|c| c.name.clone()).collect(),
                });
            }
        }
        let kept = self
            .columns
            .iter()
            .filter(|c| !names.contains(&c.name.as_str()))
            .cloned()
            .collect();
        Table::new(self.index.clone(), kept)
    }
}
