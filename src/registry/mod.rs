//! Catalog of supported OMIE variables
//!
//! Each variable the site publishes has its own listing page and one of two
//! flat-text layouts. The registry maps variable names to their
//! [`VariableDescriptor`], which carries the source layout, the target table
//! the aggregator merges the variable into, and the output columns the
//! variable contributes that are excluded from the merged CSV.

use std::fmt;

/// Layout of a variable's daily flat-text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Semicolon table with one row per hour: year;month;day;hour;v1;v2
    Format1,
    /// Labeled-row table with one column per row and 24 hourly value cells
    Format2,
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFormat::Format1 => write!(f, "format 1"),
            SourceFormat::Format2 => write!(f, "format 2"),
        }
    }
}

/// Table a variable is merged into by the aggregator
///
/// Only the hourly table exists today; the tag is kept explicit so variables
/// targeting a future table shape are skipped rather than mis-merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTable {
    /// Hourly-indexed merged table
    Hourly,
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetTable::Hourly => write!(f, "hourly"),
        }
    }
}

/// Metadata for one supported variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDescriptor {
    /// Variable name as it appears in the listing URL path
    pub name: &'static str,
    /// Layout of the variable's daily files
    pub source_format: SourceFormat,
    /// Table the variable is merged into
    pub target_table: TargetTable,
    /// Output columns contributed by this variable that are dropped from the
    /// merged table (auxiliary totals duplicated by other columns)
    pub excluded_columns: &'static [&'static str],
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Variable name is not in the registry
    #[error("unknown variable {name:?}; known variables: {known}")]
    UnknownVariable {
        /// The rejected name
        name: String,
        /// Comma-separated list of registered names
        known: String,
    },
}

/// Auxiliary per-system totals of the matched-program table. Each is the sum
/// of other columns that stay in the merged output.
const PDBC_TOT_EXCLUDED: &[&str] = &[
    "Energia total del mercado iberico_MWh",
    "Energia total sistema espanol_MWh",
    "Energia bilateral sistema espanol_MWh",
    "Energia total sistema portugues_MWh",
    "Energia bilateral sistema portugues_MWh",
    "Energia total con bilaterales_MWh",
];

/// The fixed variable set. Every name maps to exactly one descriptor.
static VARIABLES: &[VariableDescriptor] = &[
    VariableDescriptor {
        name: "marginalpdbc",
        source_format: SourceFormat::Format1,
        target_table: TargetTable::Hourly,
        excluded_columns: &[],
    },
    VariableDescriptor {
        name: "marginalpdbcpt",
        source_format: SourceFormat::Format1,
        target_table: TargetTable::Hourly,
        excluded_columns: &[],
    },
    VariableDescriptor {
        name: "pdbc_tot",
        source_format: SourceFormat::Format2,
        target_table: TargetTable::Hourly,
        excluded_columns: PDBC_TOT_EXCLUDED,
    },
];

/// All registered descriptors
pub fn all() -> &'static [VariableDescriptor] {
    VARIABLES
}

/// Names of all registered variables, in registry order
pub fn default_variables() -> Vec<String> {
    VARIABLES.iter().map(|d| d.name.to_string()).collect()
}

/// Look up a variable by name
///
/// # Errors
/// Returns [`RegistryError::UnknownVariable`] for names outside the fixed set.
pub fn lookup(name: &str) -> Result<&'static VariableDescriptor, RegistryError> {
    VARIABLES
        .iter()
        .find(|d| d.name == name)
        .ok_or_else(|| RegistryError::UnknownVariable {
            name: name.to_string(),
            known: VARIABLES
                .iter()
                .map(|d| d.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}
