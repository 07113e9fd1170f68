//! CLI command for listing the known variables

use clap::Args;
use serde_json::json;

use super::CliError;
use crate::registry;

/// Variables subcommand
#[derive(Debug, Args)]
pub struct VariablesCommand {
    /// Output format
    #[arg(long, default_value = "human")]
    format: OutputFormat,
}

/// Output format for the variables command
#[derive(Debug, Clone, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

impl VariablesCommand {
    /// Execute the variables command
    pub fn execute(&self) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Human => {
                for descriptor in registry::all() {
                    println!(
                        "{:<16} {:<10} target: {:<8} excluded columns: {}",
                        descriptor.name,
                        descriptor.source_format.to_string(),
                        descriptor.target_table.to_string(),
                        descriptor.excluded_columns.len()
                    );
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = registry::all()
                    .iter()
                    .map(|d| {
                        json!({
                            "name": d.name,
                            "source_format": d.source_format.to_string(),
                            "target_table": d.target_table.to_string(),
                            "excluded_columns": d.excluded_columns,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        Ok(())
    }
}
