//! @acp:module "Rigor Command"
//! @acp:summary "Render the rigor-filtered map and its intervention drill-down"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::service::EvidenceMapService;

use super::burden::print_bubble_table;
use super::output::emit_json;

/// Options for the rigor command
#[derive(Debug, Clone, Default)]
pub struct RigorOptions {
    /// Drill down into one broadened objective's interventions
    pub objective: Option<String>,
    /// Write JSON to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Human-readable table instead of JSON
    pub table: bool,
}

/// Execute the rigor command
pub fn execute_rigor(options: RigorOptions, config: Config) -> Result<()> {
    let service = EvidenceMapService::from_config(config)?;
    let map = match &options.objective {
        Some(objective) => service.intervention_drilldown(objective)?,
        None => service.rigor_map()?,
    };

    if options.table {
        let title = match &options.objective {
            Some(objective) => format!("Interventions: {objective}"),
            None => "Rigor-Filtered Evidence Map".to_string(),
        };
        print_bubble_table(&title, &map.bubbles);
        Ok(())
    } else {
        emit_json(&map, options.output.as_deref())
    }
}
