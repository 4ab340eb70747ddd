//! @acp:module "SQLite Store"
//! @acp:summary "Optional RecordFetcher over a SQLite export, for large corpora"
//! @acp:domain scoring
//! @acp:layer store
//!
//! Enabled with the `sqlite` cargo feature. Rows come back through the
//! same `RawRecord::normalize` boundary as the JSON snapshot, so both
//! backends feed the calculators identical shapes.

use std::path::Path;

use rusqlite::{Connection, OpenFlags, Row};

use crate::error::Result;
use crate::record::{FindingRecord, RawRecord};

use super::{is_rigor, Intervention, RecordFetcher, RecordFilter};

/// Read-only SQLite-backed record store.
pub struct SqliteStore {
    conn: Connection,
}

const FINDING_COLUMNS: &str = "title, year, study_design, direction, population, user_type, \
     region, school_type, study_size, effect_size, evidence_type_strength, \
     system_impact_levels, decision_making_complexity, evaluation_burden_cost, \
     wwc_study_rating, wwc_is_significant, results_summary, url, outcome, \
     implementation_objective, broadened_objective, intervention_id";

impl SqliteStore {
    /// Open an existing database read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self { conn })
    }

    fn select(&self, where_clause: &str, param: &str) -> Result<Vec<FindingRecord>> {
        let sql = format!("SELECT {FINDING_COLUMNS} FROM findings WHERE {where_clause}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([param], row_to_raw)?;
        let mut records = Vec::new();
        for raw in rows {
            records.push(raw?.normalize());
        }
        Ok(records)
    }

    fn mapped_titles(&self, objective: &str, intervention_id: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.title FROM intervention_studies s \
             JOIN interventions i ON i.id = s.intervention_id \
             WHERE i.broadened_objective = ?1 AND i.id = ?2",
        )?;
        let rows = stmt.query_map([objective, intervention_id], |row| row.get::<_, String>(0))?;
        let mut titles = Vec::new();
        for title in rows {
            titles.push(title?);
        }
        Ok(titles)
    }
}

impl RecordFetcher for SqliteStore {
    fn query(&self, filter: &RecordFilter) -> Result<Vec<FindingRecord>> {
        match filter {
            RecordFilter::Outcome(outcome) => self.select("outcome = ?1", outcome),
            RecordFilter::Objective(objective) => {
                self.select("implementation_objective = ?1", objective)
            }
            RecordFilter::Broadened {
                objective,
                rigor_only,
            } => {
                let mut records = self.select("broadened_objective = ?1", objective)?;
                if *rigor_only {
                    records.retain(is_rigor);
                }
                Ok(records)
            }
            RecordFilter::Intervention {
                objective,
                intervention_id,
            } => {
                let titles = self.mapped_titles(objective, intervention_id)?;
                let mut records = self.select("broadened_objective = ?1", objective)?;
                records.retain(|r| {
                    is_rigor(r)
                        && (r.intervention_id.as_deref() == Some(intervention_id.as_str())
                            || titles.iter().any(|t| t == &r.title))
                });
                Ok(records)
            }
        }
    }

    fn interventions(&self, broadened_objective: &str) -> Result<Vec<Intervention>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, implementation_objective, broadened_objective \
             FROM interventions WHERE broadened_objective = ?1",
        )?;
        let rows = stmt.query_map([broadened_objective], |row| {
            Ok(Intervention {
                id: row.get(0)?,
                name: row.get(1)?,
                implementation_objective: row.get(2)?,
                broadened_objective: row.get(3)?,
                studies: Vec::new(),
            })
        })?;
        let mut interventions = Vec::new();
        for intervention in rows {
            let mut intervention = intervention?;
            intervention.studies =
                self.mapped_titles(broadened_objective, &intervention.id)?;
            interventions.push(intervention);
        }
        Ok(interventions)
    }
}

fn row_to_raw(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        title: row.get(0)?,
        year: row.get(1)?,
        study_design: row.get(2)?,
        direction: row.get(3)?,
        population: row.get(4)?,
        user_type: row.get(5)?,
        region: row.get(6)?,
        school_type: row.get(7)?,
        study_size: row.get(8)?,
        effect_size: row.get(9)?,
        evidence_type_strength: row.get(10)?,
        system_impact_levels: row.get(11)?,
        decision_making_complexity: row.get(12)?,
        evaluation_burden_cost: row.get(13)?,
        wwc_study_rating: row.get(14)?,
        wwc_is_significant: row.get(15)?,
        results_summary: row.get(16)?,
        url: row.get(17)?,
        outcome: row.get(18)?,
        implementation_objective: row.get(19)?,
        broadened_objective: row.get(20)?,
        intervention_id: row.get(21)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE findings (
                title TEXT NOT NULL, year INTEGER, study_design TEXT, direction TEXT,
                population TEXT, user_type TEXT, region TEXT, school_type TEXT,
                study_size INTEGER, effect_size REAL, evidence_type_strength INTEGER,
                system_impact_levels INTEGER, decision_making_complexity INTEGER,
                evaluation_burden_cost INTEGER, wwc_study_rating TEXT,
                wwc_is_significant INTEGER, results_summary TEXT, url TEXT,
                outcome TEXT, implementation_objective TEXT, broadened_objective TEXT,
                intervention_id TEXT
            );
            CREATE TABLE interventions (
                id TEXT PRIMARY KEY, name TEXT NOT NULL,
                implementation_objective TEXT, broadened_objective TEXT NOT NULL
            );
            CREATE TABLE intervention_studies (
                intervention_id TEXT NOT NULL, title TEXT NOT NULL
            );
            INSERT INTO findings (title, outcome, user_type) VALUES
                ('A', 'Affective - motivation', 'Student');
            INSERT INTO findings (title, broadened_objective, study_design, wwc_study_rating)
                VALUES ('B', 'Tutoring and Instructional Technology',
                        'Randomized Control Trial',
                        'Meets WWC standards without reservations');
            INSERT INTO interventions VALUES
                ('ivn-1', 'Adaptive Tutor', NULL, 'Tutoring and Instructional Technology');
            INSERT INTO intervention_studies VALUES ('ivn-1', 'B');",
        )
        .unwrap();
        SqliteStore { conn }
    }

    #[test]
    fn queries_mirror_json_backend() {
        let store = seeded();
        let by_outcome = store
            .query(&RecordFilter::Outcome("Affective - motivation".into()))
            .unwrap();
        assert_eq!(by_outcome.len(), 1);

        let rigor = store
            .query(&RecordFilter::Broadened {
                objective: "Tutoring and Instructional Technology".into(),
                rigor_only: true,
            })
            .unwrap();
        assert_eq!(rigor.len(), 1);

        let mapped = store
            .query(&RecordFilter::Intervention {
                objective: "Tutoring and Instructional Technology".into(),
                intervention_id: "ivn-1".into(),
            })
            .unwrap();
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].title, "B");
    }

    #[test]
    fn intervention_catalog_includes_titles() {
        let store = seeded();
        let catalog = store
            .interventions("Tutoring and Instructional Technology")
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].studies, vec!["B".to_string()]);
    }
}
