//! @acp:module "Record Store"
//! @acp:summary "RecordFetcher boundary and the snapshot-backed default store"
//! @acp:domain scoring
//! @acp:layer store
//!
//! The property graph itself is an external collaborator; the engine only
//! sees flat, normalized records through the `RecordFetcher` trait. A
//! store handle is constructed once and injected into the service, never
//! reached through global state.

use serde::Deserialize;

use crate::error::Result;
use crate::record::FindingRecord;

pub mod json;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use json::JsonStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Query filter for one view's record set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// All findings for papers targeting one outcome.
    Outcome(String),
    /// All findings for papers under one implementation objective.
    Objective(String),
    /// Findings under one broadened objective, optionally restricted to the
    /// rigor-filtered corpus (highest WWC rating, randomized designs).
    Broadened { objective: String, rigor_only: bool },
    /// Rigor-filtered findings for one intervention within a broadened
    /// objective, joined through the intervention's study-title mapping.
    Intervention {
        objective: String,
        intervention_id: String,
    },
}

/// One catalogued intervention and the study titles mapped to it.
#[derive(Debug, Clone, Deserialize)]
pub struct Intervention {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub implementation_objective: Option<String>,
    pub broadened_objective: String,
    #[serde(default)]
    pub studies: Vec<String>,
}

/// Collaborator boundary: returns normalized records for a filter. No
/// ordering guarantee. Implementations are expected to hand the engine a
/// read-consistent snapshot per request; the engine does not enforce
/// isolation itself.
pub trait RecordFetcher: Send + Sync {
    fn query(&self, filter: &RecordFilter) -> Result<Vec<FindingRecord>>;

    /// Interventions catalogued under one broadened objective.
    fn interventions(&self, broadened_objective: &str) -> Result<Vec<Intervention>>;
}

/// Whether a record belongs to the rigor-filtered corpus: highest WWC
/// rating and a randomized design.
pub(crate) fn is_rigor(record: &FindingRecord) -> bool {
    let rated = record.wwc_study_rating.as_deref() == Some(crate::taxonomy::WWC_HIGHEST_RATING);
    let randomized = record
        .study_design
        .as_deref()
        .and_then(crate::taxonomy::design_points)
        .map(|points| points == 25.0)
        .unwrap_or(false);
    rated && randomized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::WWC_HIGHEST_RATING;

    #[test]
    fn rigor_membership_requires_both() {
        let mut record = FindingRecord {
            title: "t".into(),
            study_design: Some("Randomized Control Trial".into()),
            wwc_study_rating: Some(WWC_HIGHEST_RATING.into()),
            ..Default::default()
        };
        assert!(is_rigor(&record));

        record.study_design = Some("Quasi-Experimental Design".into());
        assert!(!is_rigor(&record));

        record.study_design = Some("Randomized Control Trial".into());
        record.wwc_study_rating = Some("Meets WWC standards with reservations".into());
        assert!(!is_rigor(&record));
    }
}
