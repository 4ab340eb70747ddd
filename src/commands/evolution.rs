//! @acp:module "Evolution Command"
//! @acp:summary "Render the temporal evolution series for a broadened objective"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::service::{EvidenceMapService, EvolutionSeries};

use super::output::emit_json;

/// Options for the evolution command
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptions {
    /// Broadened objective to chart
    pub objective: String,
    /// One series per intervention instead of the objective aggregate
    pub by_intervention: bool,
    /// Write JSON to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Human-readable table instead of JSON
    pub table: bool,
}

/// Execute the evolution command
pub fn execute_evolution(options: EvolutionOptions, config: Config) -> Result<()> {
    let service = EvidenceMapService::from_config(config)?;

    if options.by_intervention {
        let all = service.evolution_by_intervention(&options.objective)?;
        if options.table {
            for series in &all {
                print_series(series);
                println!();
            }
            Ok(())
        } else {
            emit_json(&all, options.output.as_deref())
        }
    } else {
        let series = service.evolution(&options.objective)?;
        if options.table {
            print_series(&series);
            Ok(())
        } else {
            emit_json(&series, options.output.as_deref())
        }
    }
}

fn print_series(series: &EvolutionSeries) {
    println!("{}", style(&series.label).bold());
    println!("{}", "=".repeat(60));
    for point in &series.series {
        println!(
            "{:<12} gen={:>5.1}  students={:>8}  new={:>7}  effect={:>5.2}  studies={:>3}",
            point.period,
            point.generalizability_score,
            point.cumulative_students,
            point.new_students_this_period,
            point.avg_effect_size,
            point.num_studies,
        );
    }
}
