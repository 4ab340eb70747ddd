//! @acp:module "Synthesis Command"
//! @acp:summary "Generate or refresh AI syntheses for matrix cells"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::service::EvidenceMapService;
use crate::taxonomy::{IMPLEMENTATION_OBJECTIVES, OUTCOMES};

use super::output::emit_json;

/// Options for the synthesis command
#[derive(Debug, Clone, Default)]
pub struct SynthesisOptions {
    /// Implementation objective of the cell
    pub objective: Option<String>,
    /// Outcome of the cell
    pub outcome: Option<String>,
    /// Regenerate even when a cached entry exists
    pub force: bool,
    /// Walk every objective × outcome cell
    pub all: bool,
    /// Write JSON to this file instead of stdout
    pub output: Option<PathBuf>,
}

/// Execute the synthesis command
pub fn execute_synthesis(options: SynthesisOptions, config: Config) -> Result<()> {
    let service = EvidenceMapService::from_config(config)?;

    if options.all {
        return synthesize_all(&service, options.force);
    }

    let (objective, outcome) = match (&options.objective, &options.outcome) {
        (Some(objective), Some(outcome)) => (objective, outcome),
        _ => bail!("--objective and --outcome are required unless --all is given"),
    };

    let entry = service.cell_synthesis(objective, outcome, options.force)?;
    emit_json(&entry, options.output.as_deref())
}

fn synthesize_all(service: &EvidenceMapService, force: bool) -> Result<()> {
    let total = (IMPLEMENTATION_OBJECTIVES.len() * OUTCOMES.len()) as u64;
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut failures = 0usize;
    for objective in IMPLEMENTATION_OBJECTIVES {
        for outcome in OUTCOMES {
            bar.set_message(format!("{objective} × {outcome}"));
            if let Err(e) = service.cell_synthesis(objective, outcome, force) {
                failures += 1;
                bar.println(format!(
                    "{} {objective} × {outcome}: {e}",
                    style("✗").red()
                ));
            }
            bar.inc(1);
        }
    }
    bar.finish_with_message("done");

    if failures > 0 {
        println!(
            "{} {} cells failed; re-run with --force to retry",
            style("⚠").yellow(),
            failures
        );
    } else {
        println!("{} Synthesized {} cells", style("✓").green(), total);
    }
    Ok(())
}
