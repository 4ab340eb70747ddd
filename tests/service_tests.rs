//! Integration tests for the service layer over an in-memory snapshot
//! store, a file synthesis cache, and a stubbed generator.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use evmap::store::json::Snapshot;
use evmap::store::Intervention;
use evmap::synthesis::{Synthesis, SynthesisGenerator};
use evmap::taxonomy::{
    BROADENED_OBJECTIVES, IMPLEMENTATION_OBJECTIVES, OUTCOMES, WWC_HIGHEST_RATING,
};
use evmap::{
    Config, EvidenceMapService, EvmapError, FileSynthesisCache, FindingRecord, JsonStore, Priority,
    RawRecord,
};

struct StubGenerator {
    calls: Arc<AtomicUsize>,
}

impl SynthesisGenerator for StubGenerator {
    fn generate(&self, objective: &str, outcome: &str, records: &[FindingRecord]) -> Synthesis {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if records.is_empty() {
            Synthesis {
                overview: "No papers available for this cell.".to_string(),
                gaps: "Unable to identify gaps without research papers.".to_string(),
            }
        } else {
            Synthesis {
                overview: format!("gen-{n}: {} findings for {objective} × {outcome}", records.len()),
                gaps: "- none".to_string(),
            }
        }
    }
}

fn raw(title: &str) -> RawRecord {
    RawRecord {
        title: title.into(),
        ..Default::default()
    }
}

fn snapshot() -> Snapshot {
    let outcome = OUTCOMES[0];
    let objective = IMPLEMENTATION_OBJECTIVES[0];
    let broadened = BROADENED_OBJECTIVES[0];

    // Two findings of one paper under the first objective × outcome cell.
    let mut a1 = raw("Paper A");
    a1.outcome = Some(outcome.into());
    a1.implementation_objective = Some(objective.into());
    a1.user_type = Some("School".into());
    let mut a2 = raw("Paper A");
    a2.outcome = Some(outcome.into());
    a2.implementation_objective = Some(objective.into());
    a2.user_type = Some("School".into());

    // One rigor-qualified study and one non-rigor study under the first
    // broadened objective.
    let mut b = raw("Paper B");
    b.broadened_objective = Some(broadened.into());
    b.study_design = Some("Randomized Control Trial".into());
    b.wwc_study_rating = Some(WWC_HIGHEST_RATING.into());
    b.year = Some(2018);
    b.study_size = Some(1200);
    b.effect_size = Some(0.4);

    let mut c = raw("Paper C");
    c.broadened_objective = Some(broadened.into());
    c.study_design = Some("Case Study".into());
    c.year = Some(2019);

    Snapshot {
        records: vec![a1, a2, b, c],
        interventions: vec![Intervention {
            id: "ivn-1".into(),
            name: "Adaptive Tutor".into(),
            implementation_objective: None,
            broadened_objective: broadened.into(),
            studies: vec!["Paper B".into()],
        }],
    }
}

fn service(dir: &tempfile::TempDir, calls: Arc<AtomicUsize>) -> EvidenceMapService {
    EvidenceMapService::new(
        Config::default(),
        Box::new(JsonStore::from_snapshot(snapshot())),
        Box::new(FileSynthesisCache::new(dir.path().join("synthesis.json"))),
        Box::new(StubGenerator { calls }),
    )
}

fn fixture() -> (tempfile::TempDir, Arc<AtomicUsize>, EvidenceMapService) {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let service = service(&dir, calls.clone());
    (dir, calls, service)
}

#[test]
fn burden_map_covers_every_outcome() {
    let (_dir, _calls, service) = fixture();
    let map = service.problem_burden_map().unwrap();
    assert_eq!(map.bubbles.len(), OUTCOMES.len());

    let populated = map
        .bubbles
        .iter()
        .find(|b| b.id == OUTCOMES[0])
        .unwrap();
    assert_eq!(populated.paper_count, 2);
    assert_eq!(populated.y, 2.0); // School ordinal

    // Untouched outcomes are neutral zero bubbles.
    let empty = map.bubbles.iter().find(|b| b.id == OUTCOMES[1]).unwrap();
    assert_eq!(empty.priority, Priority::Neutral);
    assert_eq!(empty.paper_count, 0);
}

#[test]
fn intervention_map_injects_outcome_burden_scales() {
    let (_dir, _calls, service) = fixture();
    let map = service.intervention_map().unwrap();
    assert_eq!(map.bubbles.len(), IMPLEMENTATION_OBJECTIVES.len());

    // The objective's one targeted outcome carries burden scale 2.0
    // (School), computed from the outcome-centric dataset.
    let bubble = map
        .bubbles
        .iter()
        .find(|b| b.id == IMPLEMENTATION_OBJECTIVES[0])
        .unwrap();
    assert_eq!(bubble.y, 2.0);
    assert!(bubble.breakdown["investment"]["amount"].as_u64().unwrap() > 0);
}

#[test]
fn rigor_map_keeps_only_qualified_studies() {
    let (_dir, _calls, service) = fixture();
    let map = service.rigor_map().unwrap();
    assert_eq!(map.bubbles.len(), BROADENED_OBJECTIVES.len());

    let bubble = map
        .bubbles
        .iter()
        .find(|b| b.id == BROADENED_OBJECTIVES[0])
        .unwrap();
    // Paper C lacks the WWC rating and randomized design.
    assert_eq!(bubble.paper_count, 1);
    assert_eq!(bubble.size, 1.2); // 1200 students / 1000
}

#[test]
fn drilldown_requires_known_objective() {
    let (_dir, _calls, service) = fixture();
    let err = service.intervention_drilldown("nonsense").unwrap_err();
    assert!(matches!(err, EvmapError::UnknownTaxonomy { .. }));

    let map = service
        .intervention_drilldown(BROADENED_OBJECTIVES[0])
        .unwrap();
    assert_eq!(map.bubbles.len(), 1);
    assert_eq!(map.bubbles[0].label, "Adaptive Tutor");
    assert_eq!(map.bubbles[0].paper_count, 1);
}

#[test]
fn evolution_series_cover_the_default_window() {
    let (_dir, _calls, service) = fixture();
    let series = service.evolution(BROADENED_OBJECTIVES[0]).unwrap();
    assert_eq!(series.series.len(), 14);
    let bucket = series
        .series
        .iter()
        .find(|p| p.period == "2017-2019")
        .unwrap();
    // Only the rigor-qualified study feeds the series.
    assert_eq!(bucket.cumulative_students, 1200);
    assert_eq!(bucket.num_studies, 1);

    let per_intervention = service
        .evolution_by_intervention(BROADENED_OBJECTIVES[0])
        .unwrap();
    assert_eq!(per_intervention.len(), 1);
    assert_eq!(per_intervention[0].id, "ivn-1");
    assert_eq!(per_intervention[0].series.len(), 14);
}

#[test]
fn matrix_is_zero_filled_and_counts_papers_once() {
    let (_dir, _calls, service) = fixture();
    let cells = service.matrix().unwrap();
    assert_eq!(
        cells.len(),
        IMPLEMENTATION_OBJECTIVES.len() * OUTCOMES.len()
    );

    let populated = cells
        .iter()
        .find(|c| {
            c.implementation_objective == IMPLEMENTATION_OBJECTIVES[0] && c.outcome == OUTCOMES[0]
        })
        .unwrap();
    // Two findings of the same paper count as one.
    assert_eq!(populated.count, 1);

    let empty = cells
        .iter()
        .filter(|c| c.count == 0)
        .count();
    assert_eq!(empty, cells.len() - 1);
}

#[test]
fn cell_records_filter_and_validate() {
    let (_dir, _calls, service) = fixture();
    let records = service
        .cell_records(IMPLEMENTATION_OBJECTIVES[0], OUTCOMES[0])
        .unwrap();
    assert_eq!(records.len(), 2);

    let none = service
        .cell_records(IMPLEMENTATION_OBJECTIVES[1], OUTCOMES[0])
        .unwrap();
    assert!(none.is_empty());

    let err = service
        .cell_records(IMPLEMENTATION_OBJECTIVES[0], "not an outcome")
        .unwrap_err();
    assert!(matches!(err, EvmapError::UnknownTaxonomy { .. }));
}

#[test]
fn synthesis_is_cached_until_forced() {
    let (_dir, calls, service) = fixture();
    let objective = IMPLEMENTATION_OBJECTIVES[0];
    let outcome = OUTCOMES[0];

    let first = service.cell_synthesis(objective, outcome, false).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(first.overview.starts_with("gen-1"));

    // Second request hits the cache.
    let second = service.cell_synthesis(objective, outcome, false).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.overview, first.overview);

    // Forcing regenerates and overwrites the cached entry.
    let third = service.cell_synthesis(objective, outcome, true).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(third.overview.starts_with("gen-2"));

    let cached = service.cell_synthesis(objective, outcome, false).unwrap();
    assert_eq!(cached.overview, third.overview);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_cells_get_an_explanatory_synthesis() {
    let (_dir, _calls, service) = fixture();
    let entry = service
        .cell_synthesis(IMPLEMENTATION_OBJECTIVES[1], OUTCOMES[3], false)
        .unwrap();
    assert_eq!(entry.overview, "No papers available for this cell.");
}
