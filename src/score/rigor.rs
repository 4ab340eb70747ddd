//! @acp:module "Rigor-Filtered Quality"
//! @acp:summary "0-100 evidence-quality composite for the rigor-filtered corpus"
//! @acp:domain scoring
//! @acp:layer logic
//!
//! The rigor-filtered corpus contains only studies meeting the highest WWC
//! rating with randomized designs, so this variant scores replication,
//! reach, and effect stability rather than design hierarchy.

use std::collections::{HashMap, HashSet};

use crate::record::FindingRecord;
use crate::taxonomy::wwc_rating_points;

use super::{population_stdev, safe_mean};

/// Per-caller tunables for the rigor composite.
#[derive(Debug, Clone, Copy)]
pub struct RigorParams {
    /// Normalizer for the effect-size spread. The broadened-objective view
    /// and the per-intervention drill-down use different values.
    pub effect_spread_k: f64,
}

/// The four 0-25 sub-scores of the rigor-filtered quality composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigorScore {
    /// WWC rating points averaged over the record set
    pub design_quality: f64,
    /// Step function on the count of distinct studies
    pub replication: f64,
    /// Deduplicated student reach, full credit at 1,000 students
    pub sample_adequacy: f64,
    /// Inverse spread of reported effect sizes
    pub effect_consistency: f64,
    /// Total students after per-study deduplication (exposed for breakdowns)
    pub total_students: u64,
    /// Distinct study count (exposed for breakdowns)
    pub num_studies: usize,
}

impl RigorScore {
    /// Composite total in [0, 100], rounded to two decimals.
    pub fn total(&self) -> f64 {
        let total = self.design_quality
            + self.replication
            + self.sample_adequacy
            + self.effect_consistency;
        (total * 100.0).round() / 100.0
    }
}

/// Compute the rigor-filtered quality composite.
pub fn rigor_score(records: &[FindingRecord], params: &RigorParams) -> RigorScore {
    let num_studies = distinct_titles(records);
    let total_students = deduplicated_students(records);

    let score = RigorScore {
        design_quality: design_quality(records),
        replication: replication(num_studies),
        sample_adequacy: sample_adequacy(total_students),
        effect_consistency: effect_consistency(records, params.effect_spread_k),
        total_students,
        num_studies,
    };
    tracing::debug!(
        design = score.design_quality,
        replication = score.replication,
        sample = score.sample_adequacy,
        effects = score.effect_consistency,
        "rigor composite"
    );
    score
}

/// Study design quality (0-25): mean of the WWC rating point map. Records
/// without a rating take the unrated default rather than being excluded;
/// the rigor filter has already vetted their membership.
fn design_quality(records: &[FindingRecord]) -> f64 {
    let points: Vec<f64> = records
        .iter()
        .map(|r| wwc_rating_points(r.wwc_study_rating.as_deref()))
        .collect();
    safe_mean(&points)
}

/// Replication strength (0-25): step function on distinct study titles.
fn replication(num_studies: usize) -> f64 {
    match num_studies {
        n if n >= 10 => 25.0,
        n if n >= 7 => 22.0,
        n if n >= 5 => 20.0,
        n if n >= 3 => 15.0,
        n if n >= 2 => 10.0,
        _ => 5.0,
    }
}

/// Sample adequacy (0-25): deduplicated students, scaled to full credit at
/// 1,000.
fn sample_adequacy(total_students: u64) -> f64 {
    (total_students as f64 / 1000.0 * 25.0).min(25.0)
}

/// Effect consistency (0-25): penalize spread in reported effect sizes.
/// A single effect size earns a fixed partial credit; none earns nothing.
fn effect_consistency(records: &[FindingRecord], k: f64) -> f64 {
    let effects: Vec<f64> = records.iter().filter_map(|r| r.effect_size).collect();
    match effects.len() {
        0 => 0.0,
        1 => 15.0,
        _ => 25.0 * (1.0 - population_stdev(&effects) / k).max(0.0),
    }
}

fn distinct_titles(records: &[FindingRecord]) -> usize {
    records
        .iter()
        .map(|r| r.title.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Sum of per-study maximum sample sizes. A study contributing several
/// findings is counted once, at its largest reported size.
pub fn deduplicated_students(records: &[FindingRecord]) -> u64 {
    let mut by_title: HashMap<&str, u64> = HashMap::new();
    for record in records {
        if let Some(size) = record.study_size {
            let entry = by_title.entry(record.title.as_str()).or_insert(0);
            *entry = (*entry).max(size);
        }
    }
    by_title.values().sum()
}
