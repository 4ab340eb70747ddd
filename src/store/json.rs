//! @acp:module "JSON Snapshot Store"
//! @acp:summary "Default RecordFetcher over a JSON export of the graph store"
//! @acp:domain scoring
//! @acp:layer store

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{EvmapError, Result};
use crate::record::{FindingRecord, RawRecord};

use super::{is_rigor, Intervention, RecordFetcher, RecordFilter};

/// On-disk snapshot shape. `records` rows are raw and get normalized once
/// at load; downstream code only ever sees `FindingRecord`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub records: Vec<RawRecord>,
    #[serde(default)]
    pub interventions: Vec<Intervention>,
}

/// In-memory store over a loaded snapshot. Queries filter the normalized
/// record list; every request recomputes from here, nothing is cached.
pub struct JsonStore {
    records: Vec<FindingRecord>,
    interventions: Vec<Intervention>,
}

impl JsonStore {
    /// Load and normalize a snapshot file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(EvmapError::SnapshotNotFound(path.to_path_buf()));
        }
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        tracing::info!(
            records = snapshot.records.len(),
            interventions = snapshot.interventions.len(),
            path = %path.display(),
            "loaded snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Build a store from an already-parsed snapshot (used by tests and
    /// embedders).
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let records = snapshot
            .records
            .into_iter()
            .map(RawRecord::normalize)
            .collect();
        Self {
            records,
            interventions: snapshot.interventions,
        }
    }

    fn intervention(&self, objective: &str, id: &str) -> Option<&Intervention> {
        self.interventions
            .iter()
            .find(|i| i.broadened_objective == objective && i.id == id)
    }
}

impl RecordFetcher for JsonStore {
    fn query(&self, filter: &RecordFilter) -> Result<Vec<FindingRecord>> {
        let matched: Vec<FindingRecord> = match filter {
            RecordFilter::Outcome(outcome) => self
                .records
                .iter()
                .filter(|r| r.outcome.as_deref() == Some(outcome.as_str()))
                .cloned()
                .collect(),
            RecordFilter::Objective(objective) => self
                .records
                .iter()
                .filter(|r| {
                    r.implementation_objective.as_deref() == Some(objective.as_str())
                })
                .cloned()
                .collect(),
            RecordFilter::Broadened {
                objective,
                rigor_only,
            } => self
                .records
                .iter()
                .filter(|r| r.broadened_objective.as_deref() == Some(objective.as_str()))
                .filter(|r| !rigor_only || is_rigor(r))
                .cloned()
                .collect(),
            RecordFilter::Intervention {
                objective,
                intervention_id,
            } => {
                let mapped_titles: Vec<&str> = self
                    .intervention(objective, intervention_id)
                    .map(|i| i.studies.iter().map(String::as_str).collect())
                    .unwrap_or_default();
                self.records
                    .iter()
                    .filter(|r| r.broadened_objective.as_deref() == Some(objective.as_str()))
                    .filter(|r| is_rigor(r))
                    .filter(|r| {
                        r.intervention_id.as_deref() == Some(intervention_id.as_str())
                            || mapped_titles.contains(&r.title.as_str())
                    })
                    .cloned()
                    .collect()
            }
        };
        tracing::debug!(?filter, count = matched.len(), "store query");
        Ok(matched)
    }

    fn interventions(&self, broadened_objective: &str) -> Result<Vec<Intervention>> {
        Ok(self
            .interventions
            .iter()
            .filter(|i| i.broadened_objective == broadened_objective)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str) -> RawRecord {
        RawRecord {
            title: title.into(),
            ..Default::default()
        }
    }

    fn store() -> JsonStore {
        let mut a = raw("A");
        a.outcome = Some("Affective - motivation".into());
        a.implementation_objective = Some("Intelligent Tutoring and Instruction".into());

        let mut b = raw("B");
        b.broadened_objective = Some("Tutoring and Instructional Technology".into());
        b.study_design = Some("Randomized Control Trial".into());
        b.wwc_study_rating = Some(crate::taxonomy::WWC_HIGHEST_RATING.into());

        let mut c = raw("C");
        c.broadened_objective = Some("Tutoring and Instructional Technology".into());
        c.study_design = Some("Case Study".into());

        JsonStore::from_snapshot(Snapshot {
            records: vec![a, b, c],
            interventions: vec![Intervention {
                id: "ivn-1".into(),
                name: "Adaptive Tutor".into(),
                implementation_objective: None,
                broadened_objective: "Tutoring and Instructional Technology".into(),
                studies: vec!["B".into()],
            }],
        })
    }

    #[test]
    fn outcome_and_objective_filters() {
        let store = store();
        let by_outcome = store
            .query(&RecordFilter::Outcome("Affective - motivation".into()))
            .unwrap();
        assert_eq!(by_outcome.len(), 1);
        assert_eq!(by_outcome[0].title, "A");

        let by_objective = store
            .query(&RecordFilter::Objective(
                "Intelligent Tutoring and Instruction".into(),
            ))
            .unwrap();
        assert_eq!(by_objective.len(), 1);
    }

    #[test]
    fn rigor_flag_narrows_broadened_filter() {
        let store = store();
        let all = store
            .query(&RecordFilter::Broadened {
                objective: "Tutoring and Instructional Technology".into(),
                rigor_only: false,
            })
            .unwrap();
        assert_eq!(all.len(), 2);

        let rigor = store
            .query(&RecordFilter::Broadened {
                objective: "Tutoring and Instructional Technology".into(),
                rigor_only: true,
            })
            .unwrap();
        assert_eq!(rigor.len(), 1);
        assert_eq!(rigor[0].title, "B");
    }

    #[test]
    fn intervention_filter_joins_study_titles() {
        let store = store();
        let records = store
            .query(&RecordFilter::Intervention {
                objective: "Tutoring and Instructional Technology".into(),
                intervention_id: "ivn-1".into(),
            })
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "B");

        let none = store
            .query(&RecordFilter::Intervention {
                objective: "Tutoring and Instructional Technology".into(),
                intervention_id: "missing".into(),
            })
            .unwrap();
        assert!(none.is_empty());
    }
}
