//! @acp:module "Validate Command"
//! @acp:summary "Sanity-check a snapshot before building views"
//! @acp:domain cli
//! @acp:layer handler

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::record::RawRecord;
use crate::store::json::Snapshot;
use crate::taxonomy::{BROADENED_OBJECTIVES, IMPLEMENTATION_OBJECTIVES, OUTCOMES};

/// Options for the validate command
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Snapshot file to validate
    pub file: PathBuf,
}

/// Execute the validate command
pub fn execute_validate(options: ValidateOptions) -> Result<()> {
    if !options.file.exists() {
        bail!("snapshot not found: {}", options.file.display());
    }

    let reader = BufReader::new(File::open(&options.file)?);
    let snapshot: Snapshot = serde_json::from_reader(reader)?;

    println!("{}", style("Snapshot Validation").bold());
    println!("{}", "=".repeat(60));
    println!("Records:       {}", snapshot.records.len());
    println!("Interventions: {}", snapshot.interventions.len());

    let mut unknown: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    let mut undated = 0usize;
    let mut untitled = 0usize;

    for record in &snapshot.records {
        if record.title.trim().is_empty() {
            untitled += 1;
        }
        if record.year.is_none() {
            undated += 1;
        }
        check_membership(&mut unknown, "outcome", &record.outcome, OUTCOMES);
        check_membership(
            &mut unknown,
            "implementation objective",
            &record.implementation_objective,
            IMPLEMENTATION_OBJECTIVES,
        );
        check_membership(
            &mut unknown,
            "broadened objective",
            &record.broadened_objective,
            BROADENED_OBJECTIVES,
        );
    }

    report_count(
        "untitled records (dropped from dedup and matrix)",
        untitled,
    );
    report_count("undated records (excluded from evolution)", undated);

    let orphans: Vec<&RawRecord> = snapshot
        .records
        .iter()
        .filter(|r| {
            r.outcome.is_none()
                && r.implementation_objective.is_none()
                && r.broadened_objective.is_none()
        })
        .collect();
    report_count("records with no association (never selected)", orphans.len());

    for (kind, values) in &unknown {
        println!(
            "{} unknown {} values: {}",
            style("⚠").yellow(),
            kind,
            values.join(", ")
        );
    }

    if unknown.is_empty() {
        println!("{} All taxonomy values recognized", style("✓").green());
    }
    Ok(())
}

fn check_membership(
    unknown: &mut BTreeMap<&'static str, Vec<String>>,
    kind: &'static str,
    value: &Option<String>,
    members: &[&str],
) {
    if let Some(value) = value {
        if !members.contains(&value.as_str()) {
            let seen = unknown.entry(kind).or_default();
            if !seen.contains(value) {
                seen.push(value.clone());
            }
        }
    }
}

fn report_count(label: &str, count: usize) {
    if count > 0 {
        println!("{} {} {}", style("⚠").yellow(), count, label);
    }
}
