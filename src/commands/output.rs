//! @acp:module "Command Output"
//! @acp:summary "Shared JSON/file output helpers for command handlers"
//! @acp:domain cli
//! @acp:layer handler

use std::fs;
use std::path::Path;

use anyhow::Result;
use console::style;
use serde::Serialize;

/// Print a payload as pretty JSON, or write it to `output` when given.
pub fn emit_json<T: Serialize>(payload: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(payload)?;
    match output {
        Some(path) => {
            fs::write(path, &json)?;
            println!("{} Wrote {}", style("✓").green(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
