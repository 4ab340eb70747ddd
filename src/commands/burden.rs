//! @acp:module "Burden Command"
//! @acp:summary "Render the outcome-centric problem burden map"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;
use console::style;

use crate::config::Config;
use crate::service::EvidenceMapService;

use super::output::emit_json;

/// Options for the burden command
#[derive(Debug, Clone, Default)]
pub struct BurdenOptions {
    /// Write JSON to this file instead of stdout
    pub output: Option<PathBuf>,
    /// Human-readable table instead of JSON
    pub table: bool,
}

/// Execute the burden command
pub fn execute_burden(options: BurdenOptions, config: Config) -> Result<()> {
    let service = EvidenceMapService::from_config(config)?;
    let map = service.problem_burden_map()?;

    if options.table {
        print_bubble_table("Problem Burden Map", &map.bubbles);
        Ok(())
    } else {
        emit_json(&map, options.output.as_deref())
    }
}

pub(super) fn print_bubble_table(title: &str, bubbles: &[crate::bubble::Bubble]) {
    println!("{}", style(title).bold());
    println!("{}", "=".repeat(60));
    for bubble in bubbles {
        println!(
            "{:<45} x={:>6.1}  y={:>6.2}  papers={:>4}  {}",
            bubble.label,
            bubble.x,
            bubble.y,
            bubble.paper_count,
            style(bubble.priority.as_str()).cyan()
        );
    }
}
