//! @acp:module "Matrix Command"
//! @acp:summary "Render the objective × outcome evidence matrix and its cells"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::Config;
use crate::service::EvidenceMapService;
use crate::taxonomy::{IMPLEMENTATION_OBJECTIVES, OUTCOMES};

use super::output::emit_json;

/// Options for the matrix command
#[derive(Debug, Clone, Default)]
pub struct MatrixOptions {
    /// List one cell's records instead of the full grid
    pub objective: Option<String>,
    /// Outcome for cell listing (requires --objective)
    pub outcome: Option<String>,
    /// Write JSON to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Human-readable grid instead of JSON
    pub table: bool,
}

/// Execute the matrix command
pub fn execute_matrix(options: MatrixOptions, config: Config) -> Result<()> {
    let service = EvidenceMapService::from_config(config)?;

    match (&options.objective, &options.outcome) {
        (Some(objective), Some(outcome)) => {
            let records = service.cell_records(objective, outcome)?;
            if options.table {
                println!(
                    "{} ({} findings)",
                    style(format!("{objective} × {outcome}")).bold(),
                    records.len()
                );
                for record in &records {
                    let year = record
                        .year
                        .map(|y| y.to_string())
                        .unwrap_or_else(|| "----".to_string());
                    println!("  [{year}] {}", record.title);
                }
                Ok(())
            } else {
                emit_json(&records, options.output.as_deref())
            }
        }
        (None, None) => {
            let cells = service.matrix()?;
            if options.table {
                print_grid(&cells);
                Ok(())
            } else {
                emit_json(&cells, options.output.as_deref())
            }
        }
        _ => bail!("--objective and --outcome must be given together"),
    }
}

fn print_grid(cells: &[crate::service::MatrixCell]) {
    println!("{}", style("Evidence Matrix (papers per cell)").bold());
    println!("{}", "=".repeat(60));
    for objective in IMPLEMENTATION_OBJECTIVES {
        println!("{}", style(objective).cyan());
        for outcome in OUTCOMES {
            let count = cells
                .iter()
                .find(|c| {
                    c.implementation_objective == *objective && c.outcome == *outcome
                })
                .map(|c| c.count)
                .unwrap_or(0);
            println!("  {:<45} {:>4}", outcome, count);
        }
    }
}
