//! @acp:module "Evidence Maturity"
//! @acp:summary "General 0-100 evidence-maturity composite over a record set"
//! @acp:domain scoring
//! @acp:layer logic

use std::collections::HashMap;
use std::collections::HashSet;

use crate::record::FindingRecord;
use crate::taxonomy::design_points;

use super::safe_mean;

/// The four 0-25 sub-scores of the general maturity composite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaturityScore {
    /// Study design hierarchy (RCT strongest)
    pub design_strength: f64,
    /// Directional stability of findings
    pub consistency: f64,
    /// Diversity of regions, school types, populations
    pub external_validity: f64,
    /// Inverted evidence-type strength (0 = best)
    pub quality: f64,
}

impl MaturityScore {
    /// Composite total in [0, 100], rounded to two decimals.
    pub fn total(&self) -> f64 {
        let total =
            self.design_strength + self.consistency + self.external_validity + self.quality;
        (total * 100.0).round() / 100.0
    }
}

/// Compute the evidence-maturity composite for a non-empty record set.
/// Callers short-circuit the empty case to a zero bubble before reaching
/// this function; an empty slice still yields all-zero sub-scores.
pub fn maturity_score(records: &[FindingRecord]) -> MaturityScore {
    let score = MaturityScore {
        design_strength: design_strength(records),
        consistency: consistency(records),
        external_validity: external_validity(records),
        quality: quality(records),
    };
    tracing::debug!(
        design = score.design_strength,
        consistency = score.consistency,
        validity = score.external_validity,
        quality = score.quality,
        "maturity composite"
    );
    score
}

/// Design strength (0-25): mean of hierarchy points over records with a
/// recognized study design.
fn design_strength(records: &[FindingRecord]) -> f64 {
    let points: Vec<f64> = records
        .iter()
        .filter_map(|r| r.study_design.as_deref().and_then(design_points))
        .collect();
    safe_mean(&points)
}

/// Consistency (0-25): fraction of reported directions belonging to the
/// single most frequent direction, scaled to 25.
fn consistency(records: &[FindingRecord]) -> f64 {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for record in records {
        if let Some(direction) = record.direction {
            *counts.entry(direction.as_str()).or_insert(0) += 1;
        }
    }
    let total: usize = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let modal = counts.values().copied().max().unwrap_or(0);
    modal as f64 / total as f64 * 25.0
}

/// External validity (0-25): diversity bonus over non-empty context values,
/// capped at five unique values per dimension.
fn external_validity(records: &[FindingRecord]) -> f64 {
    let regions = unique_count(records, |r| r.region.as_deref());
    let school_types = unique_count(records, |r| r.school_type.as_deref());
    let populations = unique_count(records, |r| r.population.as_deref());

    regions.min(5) as f64 / 5.0 * 10.0
        + school_types.min(5) as f64 / 5.0 * 7.5
        + populations.min(5) as f64 / 5.0 * 7.5
}

/// Quality (0-25): inverted mean evidence-type strength, where 0 is the
/// strongest evidence and 4 the weakest.
fn quality(records: &[FindingRecord]) -> f64 {
    let strengths: Vec<f64> = records
        .iter()
        .filter_map(|r| r.evidence_type_strength)
        .map(f64::from)
        .collect();
    if strengths.is_empty() {
        return 0.0;
    }
    (4.0 - safe_mean(&strengths)) / 4.0 * 25.0
}

fn unique_count<'a, F>(records: &'a [FindingRecord], field: F) -> usize
where
    F: Fn(&'a FindingRecord) -> Option<&'a str>,
{
    records
        .iter()
        .filter_map(field)
        .collect::<HashSet<_>>()
        .len()
}
