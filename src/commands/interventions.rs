//! @acp:module "Interventions Command"
//! @acp:summary "Render the objective-centric intervention evidence map"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;

use crate::config::Config;
use crate::service::EvidenceMapService;

use super::burden::print_bubble_table;
use super::output::emit_json;

/// Options for the interventions command
#[derive(Debug, Clone, Default)]
pub struct InterventionsOptions {
    /// Write JSON to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Human-readable table instead of JSON
    pub table: bool,
}

/// Execute the interventions command
pub fn execute_interventions(options: InterventionsOptions, config: Config) -> Result<()> {
    let service = EvidenceMapService::from_config(config)?;
    let map = service.intervention_map()?;

    if options.table {
        print_bubble_table("Intervention Evidence Map", &map.bubbles);
        Ok(())
    } else {
        emit_json(&map, options.output.as_deref())
    }
}
