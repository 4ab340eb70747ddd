//! @acp:module "Finding Records"
//! @acp:summary "Typed finding records and boundary normalization of raw store rows"
//! @acp:domain scoring
//! @acp:layer model
//!
//! One `FindingRecord` is one empirical result linked to one paper. Raw
//! store rows are normalized here, once: categorical fields with missing or
//! empty values become `None` (the "unreported" sentinel), 0-4 scale fields
//! outside range become `None`, and directions are parsed into an enum.
//! Downstream calculators never branch on missing-key checks.

use serde::{Deserialize, Serialize};

/// Directional finding reported by a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Positive,
    Negative,
    Mixed,
    #[serde(rename = "No Effect")]
    NoEffect,
}

impl Direction {
    /// Parse a raw direction string; unrecognized values are unreported.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "Positive" => Some(Direction::Positive),
            "Negative" => Some(Direction::Negative),
            "Mixed" => Some(Direction::Mixed),
            "No Effect" => Some(Direction::NoEffect),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Positive => "Positive",
            Direction::Negative => "Negative",
            Direction::Mixed => "Mixed",
            Direction::NoEffect => "No Effect",
        }
    }
}

/// One empirical finding with its paper-level attributes, normalized.
///
/// `title` doubles as the study-deduplication key: any "total students"
/// figure counts a title's maximum reported `study_size` exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingRecord {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_design: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect_size: Option<f64>,
    /// 0 = strongest evidence, 4 = weakest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_type_strength: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_impact_levels: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_making_complexity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_burden_cost: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wwc_study_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wwc_is_significant: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    // Association fields populated by the store so filters can join
    // without re-querying the graph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadened_objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intervention_id: Option<String>,
}

/// Raw snapshot row as exported from the graph store. Fields are loose on
/// purpose; `normalize` is the only path into a `FindingRecord`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub study_design: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub population: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub school_type: Option<String>,
    #[serde(default)]
    pub study_size: Option<i64>,
    #[serde(default)]
    pub effect_size: Option<f64>,
    #[serde(default)]
    pub evidence_type_strength: Option<i64>,
    #[serde(default)]
    pub system_impact_levels: Option<i64>,
    #[serde(default)]
    pub decision_making_complexity: Option<i64>,
    #[serde(default)]
    pub evaluation_burden_cost: Option<i64>,
    #[serde(default)]
    pub wwc_study_rating: Option<String>,
    #[serde(default)]
    pub wwc_is_significant: Option<bool>,
    #[serde(default)]
    pub results_summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub implementation_objective: Option<String>,
    #[serde(default)]
    pub broadened_objective: Option<String>,
    #[serde(default)]
    pub intervention_id: Option<String>,
}

impl RawRecord {
    /// Normalize a raw row into a typed record. Out-of-range numerics and
    /// empty strings become `None` rather than zero or a default category.
    pub fn normalize(self) -> FindingRecord {
        FindingRecord {
            title: self.title.trim().to_string(),
            year: self.year,
            study_design: clean(self.study_design),
            direction: self.direction.as_deref().and_then(Direction::parse),
            population: clean(self.population),
            user_type: clean(self.user_type),
            region: clean(self.region),
            school_type: clean(self.school_type),
            study_size: self.study_size.and_then(|n| u64::try_from(n).ok()),
            effect_size: self.effect_size.filter(|e| e.is_finite()),
            evidence_type_strength: scale_0_4(self.evidence_type_strength),
            system_impact_levels: scale_0_4(self.system_impact_levels),
            decision_making_complexity: scale_0_4(self.decision_making_complexity),
            evaluation_burden_cost: scale_0_4(self.evaluation_burden_cost),
            wwc_study_rating: clean(self.wwc_study_rating),
            wwc_is_significant: self.wwc_is_significant,
            results_summary: clean(self.results_summary),
            url: clean(self.url),
            outcome: clean(self.outcome),
            implementation_objective: clean(self.implementation_objective),
            broadened_objective: clean(self.broadened_objective),
            intervention_id: clean(self.intervention_id),
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn scale_0_4(value: Option<i64>) -> Option<u8> {
    value.and_then(|n| if (0..=4).contains(&n) { Some(n as u8) } else { None })
}
