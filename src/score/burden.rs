//! @acp:module "Burden and Impact"
//! @acp:summary "Burden/impact axes and effort/investment bubble sizes"
//! @acp:domain scoring
//! @acp:layer logic

use std::collections::{HashMap, HashSet};

use crate::record::FindingRecord;
use crate::taxonomy::user_type_ordinal;

use super::safe_mean;

/// Problem scale (1-4), the burden axis of the outcome-centric view: mean
/// of user-type ordinals, 1 = localized, 4 = systemic. Unmapped user types
/// are excluded; with nothing mapped the scale defaults to localized.
pub fn problem_scale(records: &[FindingRecord]) -> f64 {
    let ordinals: Vec<f64> = records
        .iter()
        .filter_map(|r| r.user_type.as_deref().and_then(user_type_ordinal))
        .map(f64::from)
        .collect();
    if ordinals.is_empty() {
        return 1.0;
    }
    safe_mean(&ordinals)
}

/// Effort bubble size (outcome view): mean system impact plus mean decision
/// complexity, each over in-range values only.
pub fn effort_size(records: &[FindingRecord]) -> f64 {
    mean_scale(records, |r| r.system_impact_levels)
        + mean_scale(records, |r| r.decision_making_complexity)
}

/// Potential impact (objective view): sum of the problem-scale values of
/// every distinct outcome the record set targets, looked up in a
/// pre-computed outcome → scale map. The map is built once per request and
/// injected; this function never re-queries the store.
pub fn potential_impact(records: &[FindingRecord], outcome_scales: &HashMap<String, f64>) -> f64 {
    let targeted: HashSet<&str> = records
        .iter()
        .filter_map(|r| r.outcome.as_deref())
        .collect();
    targeted
        .iter()
        .filter_map(|outcome| outcome_scales.get(*outcome))
        .sum()
}

/// R&D-required bubble size (objective view): mean evidence-maturity gap
/// (4 minus evidence strength) plus mean evaluation burden cost.
pub fn rnd_size(records: &[FindingRecord]) -> f64 {
    let gaps: Vec<f64> = records
        .iter()
        .filter_map(|r| r.evidence_type_strength)
        .map(|s| 4.0 - f64::from(s))
        .collect();
    safe_mean(&gaps) + mean_scale(records, |r| r.evaluation_burden_cost)
}

/// Mean of one 0-4 scale attribute over records that report it in range.
pub(crate) fn mean_scale<F>(records: &[FindingRecord], field: F) -> f64
where
    F: Fn(&FindingRecord) -> Option<u8>,
{
    let values: Vec<f64> = records.iter().filter_map(&field).map(f64::from).collect();
    safe_mean(&values)
}
