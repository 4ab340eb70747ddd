//! @acp:module "Temporal Evolution"
//! @acp:summary "Cumulative-evidence time series over fixed 3-year buckets"
//! @acp:domain scoring
//! @acp:layer logic
//!
//! Buckets the filtered record set into fixed time windows and produces
//! cumulative generalizability and student-reach series. Student counts are
//! deduplicated by study title within an aggregation window: a study's
//! contribution is its maximum reported sample size, never a sum over its
//! findings.
//!
//! Known inflation source, preserved on purpose: `new_students_this_period`
//! deduplicates within the current bucket only, so a study whose findings
//! span several buckets is counted once per bucket it appears in. It is not
//! the delta of consecutive cumulative totals. Every call site computes it
//! this way; changing one silently would desynchronize the views.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::EvolutionConfig;
use crate::record::FindingRecord;

/// One point per bucket of the evolution series. Field names are the JSON
/// contract parsed by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// "<startYear>-<endYear>", inclusive bounds
    pub period: String,
    pub year_midpoint: f64,
    /// 0-100, computed on the cumulative context sets
    pub generalizability_score: f64,
    /// Sum of per-study max sample sizes over all buckets so far
    pub cumulative_students: u64,
    /// Bucket-local deduplicated students (see module docs)
    pub new_students_this_period: u64,
    /// Mean absolute effect size of this bucket's records only
    pub avg_effect_size: f64,
    /// Distinct study titles appearing in this bucket
    pub num_studies: usize,
    /// Cumulative contexts seen so far; monotone across buckets
    pub contexts: Contexts,
}

/// Cumulative context sets. Serialized sorted for deterministic output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contexts {
    pub regions: Vec<String>,
    pub school_types: Vec<String>,
    pub populations: Vec<String>,
}

/// Produce the chronological evolution series for a record set. A
/// misconfigured bucket width below one year is treated as one.
pub fn evolution_series(records: &[FindingRecord], params: &EvolutionConfig) -> Vec<TimeSeriesPoint> {
    let bucket_years = params.bucket_years.max(1);
    let mut points = Vec::new();

    // Running state across buckets.
    let mut max_size_by_title: BTreeMap<String, u64> = BTreeMap::new();
    let mut regions: BTreeSet<String> = BTreeSet::new();
    let mut school_types: BTreeSet<String> = BTreeSet::new();
    let mut populations: BTreeSet<String> = BTreeSet::new();

    let mut start = params.start_year;
    while start <= params.end_year {
        let end = (start + bucket_years - 1).min(params.end_year);

        let in_bucket: Vec<&FindingRecord> = records
            .iter()
            .filter(|r| r.year.map(|y| y >= start && y <= end).unwrap_or(false))
            .collect();

        // Running per-study maximum sample sizes, up to and including this
        // bucket.
        for record in &in_bucket {
            if let Some(size) = record.study_size {
                let entry = max_size_by_title.entry(record.title.clone()).or_insert(0);
                *entry = (*entry).max(size);
            }
        }
        let cumulative_students: u64 = max_size_by_title.values().sum();

        // Period-local dedup, independent of the running map.
        let mut period_sizes: BTreeMap<&str, u64> = BTreeMap::new();
        for record in &in_bucket {
            if let Some(size) = record.study_size {
                let entry = period_sizes.entry(record.title.as_str()).or_insert(0);
                *entry = (*entry).max(size);
            }
        }
        let new_students_this_period: u64 = period_sizes.values().sum();

        // Contexts only grow.
        for record in &in_bucket {
            if let Some(region) = &record.region {
                regions.insert(region.clone());
            }
            if let Some(school_type) = &record.school_type {
                school_types.insert(school_type.clone());
            }
            if let Some(population) = &record.population {
                populations.insert(population.clone());
            }
        }

        let effects: Vec<f64> = in_bucket.iter().filter_map(|r| r.effect_size).collect();
        let avg_effect_size = if effects.is_empty() {
            0.0
        } else {
            effects.iter().map(|e| e.abs()).sum::<f64>() / effects.len() as f64
        };

        let num_studies = in_bucket
            .iter()
            .map(|r| r.title.as_str())
            .collect::<BTreeSet<_>>()
            .len();

        points.push(TimeSeriesPoint {
            period: format!("{start}-{end}"),
            year_midpoint: (start + end) as f64 / 2.0,
            generalizability_score: generalizability(
                regions.len(),
                school_types.len(),
                populations.len(),
            ),
            cumulative_students,
            new_students_this_period,
            avg_effect_size,
            num_studies,
            contexts: Contexts {
                regions: regions.iter().cloned().collect(),
                school_types: school_types.iter().cloned().collect(),
                populations: populations.iter().cloned().collect(),
            },
        });

        start += bucket_years;
    }

    points
}

/// Generalizability score (0-100) over cumulative context counts: regions
/// contribute up to 40 points, school types and populations up to 30 each.
pub fn generalizability(regions: usize, school_types: usize, populations: usize) -> f64 {
    (regions as f64 * 2.0).min(40.0)
        + (school_types as f64 * 10.0).min(30.0)
        + (populations as f64 * 5.0).min(30.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, year: i32, size: u64) -> FindingRecord {
        FindingRecord {
            title: title.into(),
            year: Some(year),
            study_size: Some(size),
            ..Default::default()
        }
    }

    fn default_params() -> EvolutionConfig {
        EvolutionConfig {
            start_year: 1984,
            end_year: 2025,
            bucket_years: 3,
        }
    }

    #[test]
    fn bucket_layout() {
        let points = evolution_series(&[], &default_params());
        assert_eq!(points.len(), 14);
        assert_eq!(points[0].period, "1984-1986");
        assert_eq!(points[0].year_midpoint, 1985.0);
        assert_eq!(points[13].period, "2023-2025");
        assert_eq!(points[13].year_midpoint, 2024.0);
    }

    #[test]
    fn short_final_bucket() {
        let params = EvolutionConfig {
            start_year: 2020,
            end_year: 2024,
            bucket_years: 3,
        };
        let points = evolution_series(&[], &params);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].period, "2023-2024");
        assert_eq!(points[1].year_midpoint, 2023.5);
    }

    #[test]
    fn zero_bucket_width_clamps_to_yearly() {
        let params = EvolutionConfig {
            start_year: 2020,
            end_year: 2022,
            bucket_years: 0,
        };
        let points = evolution_series(&[], &params);
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].period, "2020-2020");
        assert_eq!(points[2].period, "2022-2022");

        let negative = EvolutionConfig {
            start_year: 2020,
            end_year: 2022,
            bucket_years: -3,
        };
        assert_eq!(evolution_series(&[], &negative).len(), 3);
    }

    #[test]
    fn same_study_deduplicates_within_bucket() {
        let records = vec![record("A", 2020, 100), record("A", 2021, 250)];
        let points = evolution_series(&records, &default_params());
        let bucket = points.iter().find(|p| p.period == "2020-2022").unwrap();
        assert_eq!(bucket.cumulative_students, 250);
        assert_eq!(bucket.new_students_this_period, 250);
        assert_eq!(bucket.num_studies, 1);
    }

    #[test]
    fn study_spanning_buckets_double_counts_new_students() {
        let records = vec![record("A", 2019, 300), record("A", 2021, 300)];
        let points = evolution_series(&records, &default_params());
        let first = points.iter().find(|p| p.period == "2017-2019").unwrap();
        let second = points.iter().find(|p| p.period == "2020-2022").unwrap();
        // Cumulative stays deduplicated across buckets...
        assert_eq!(first.cumulative_students, 300);
        assert_eq!(second.cumulative_students, 300);
        // ...while the per-period figure counts the study again.
        assert_eq!(first.new_students_this_period, 300);
        assert_eq!(second.new_students_this_period, 300);
    }

    #[test]
    fn contexts_accumulate_monotonically() {
        let mut early = record("A", 1990, 10);
        early.region = Some("US".into());
        early.population = Some("Undergraduate".into());
        let mut late = record("B", 2010, 20);
        late.region = Some("EU".into());
        late.school_type = Some("Public".into());

        let points = evolution_series(&[early, late], &default_params());
        let mut last_len = 0;
        for point in &points {
            let total = point.contexts.regions.len()
                + point.contexts.school_types.len()
                + point.contexts.populations.len();
            assert!(total >= last_len);
            last_len = total;
        }
        let final_point = points.last().unwrap();
        assert_eq!(final_point.contexts.regions, vec!["EU", "US"]);
        assert_eq!(final_point.contexts.school_types, vec!["Public"]);
    }

    #[test]
    fn generalizability_caps() {
        assert_eq!(generalizability(0, 0, 0), 0.0);
        assert_eq!(generalizability(3, 1, 2), 6.0 + 10.0 + 10.0);
        assert_eq!(generalizability(25, 4, 7), 40.0 + 30.0 + 30.0);
    }

    #[test]
    fn effect_sizes_are_bucket_local_absolute_means() {
        let mut a = record("A", 2020, 10);
        a.effect_size = Some(-0.4);
        let mut b = record("B", 2020, 10);
        b.effect_size = Some(0.2);
        let mut c = record("C", 2023, 10);
        c.effect_size = Some(0.9);

        let points = evolution_series(&[a, b, c], &default_params());
        let first = points.iter().find(|p| p.period == "2020-2022").unwrap();
        let second = points.iter().find(|p| p.period == "2023-2025").unwrap();
        assert!((first.avg_effect_size - 0.3).abs() < 1e-12);
        assert!((second.avg_effect_size - 0.9).abs() < 1e-12);
        // Buckets with no effects report zero.
        assert_eq!(points[0].avg_effect_size, 0.0);
    }

    #[test]
    fn undated_records_are_excluded() {
        let undated = FindingRecord {
            title: "A".into(),
            study_size: Some(500),
            ..Default::default()
        };
        let points = evolution_series(&[undated], &default_params());
        assert!(points.iter().all(|p| p.cumulative_students == 0));
        assert!(points.iter().all(|p| p.num_studies == 0));
    }
}
