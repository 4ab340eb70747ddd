//! Integration tests for the composite scores and bubble assembly
//! pipeline, exercised through the public API.

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use serde_json::json;

use evmap::bubble::{assemble_outcome_bubbles, assemble_rigor_bubbles};
use evmap::record::Direction;
use evmap::score::{problem_scale, rigor::RigorParams, PriorityRule};
use evmap::taxonomy::WWC_HIGHEST_RATING;
use evmap::{maturity_score, median, rigor_score, FindingRecord, Priority, ScoringConfig};

fn rct(title: &str, direction: Direction) -> FindingRecord {
    FindingRecord {
        title: title.into(),
        study_design: Some("Randomized Control Trial".into()),
        direction: Some(direction),
        ..Default::default()
    }
}

#[test]
fn two_concordant_rcts_reach_fifty() {
    let records = vec![rct("A", Direction::Positive), rct("B", Direction::Positive)];
    let score = maturity_score(&records);
    assert_eq!(score.total(), 50.0);
}

#[test]
fn discordant_directions_lower_the_composite() {
    let concordant = vec![rct("A", Direction::Positive), rct("B", Direction::Positive)];
    let discordant = vec![rct("A", Direction::Positive), rct("B", Direction::Negative)];
    assert!(maturity_score(&discordant).total() < maturity_score(&concordant).total());
}

#[test]
fn problem_scale_averages_user_type_ordinals() {
    let records = vec![
        FindingRecord {
            title: "A".into(),
            user_type: Some("Student".into()),
            ..Default::default()
        },
        FindingRecord {
            title: "B".into(),
            user_type: Some("School".into()),
            ..Default::default()
        },
    ];
    assert_eq!(problem_scale(&records), 1.5);
}

#[test]
fn median_handles_empty_and_even_sets() {
    assert_eq!(median(&[]), 0.0);
    assert_eq!(median(&[3.0]), 3.0);
    assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
}

#[test]
fn scores_at_the_threshold_are_never_high_priority() {
    let rule = PriorityRule::OutcomeBurden { threshold: 65.0 };
    // x exactly at the threshold, y above the median: both comparisons are
    // strict, so this stays out of the high-priority quadrant.
    assert_ne!(rule.classify(65.0, 3.0, 2.0), Priority::HighPriority);
    assert_eq!(rule.classify(65.01, 3.0, 2.0), Priority::HighPriority);
    // y exactly at the median is likewise not "above".
    assert_ne!(rule.classify(80.0, 2.0, 2.0), Priority::HighPriority);
}

#[test]
fn rigor_composite_deduplicates_study_sizes() {
    let record = |title: &str, size: u64| FindingRecord {
        title: title.into(),
        study_size: Some(size),
        effect_size: Some(0.3),
        wwc_study_rating: Some(WWC_HIGHEST_RATING.into()),
        ..Default::default()
    };
    let records = vec![record("A", 400), record("A", 900), record("B", 100)];
    let score = rigor_score(&records, &RigorParams { effect_spread_k: 0.6 });
    assert_eq!(score.total_students, 1000);
    assert_eq!(score.num_studies, 2);
    assert_eq!(score.sample_adequacy, 25.0);
}

#[test]
fn bubble_json_contract_keys() {
    let records = vec![FindingRecord {
        title: "A".into(),
        user_type: Some("Student".into()),
        outcome: Some("Affective - motivation".into()),
        ..Default::default()
    }];
    let data = assemble_outcome_bubbles(
        &[("Affective - motivation".to_string(), records)],
        &ScoringConfig::default(),
    );
    let value = serde_json::to_value(&data.bubbles[0]).unwrap();
    for key in [
        "id",
        "label",
        "x",
        "y",
        "size",
        "paper_count",
        "priority",
        "breakdown",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    // Weak evidence at the sibling median classifies as a research gap.
    assert_eq!(value["priority"], json!("research_gap"));
}

#[test]
fn rigor_level_uses_quality_threshold_not_maturity() {
    // A corpus scoring between the two thresholds (65 < x <= 70) is a
    // research gap on the rigor level even though the maturity rule would
    // pass it.
    let records: Vec<FindingRecord> = [0.1, 0.3, 0.5]
        .iter()
        .enumerate()
        .map(|(i, effect)| FindingRecord {
            title: format!("S{i}"),
            study_size: if i == 0 { Some(400) } else { None },
            effect_size: Some(*effect),
            wwc_study_rating: Some(WWC_HIGHEST_RATING.into()),
            region: Some("US".into()),
            ..Default::default()
        })
        .collect();
    // design 25 + replication 15 + sample 10 + effect ~18.2 = ~68.2.
    let score = rigor_score(&records, &RigorParams { effect_spread_k: 0.6 });
    assert!(score.total() > 65.0 && score.total() <= 70.0);

    let data = assemble_rigor_bubbles(
        &[("Tutoring and Instructional Technology".to_string(), records)],
        &ScoringConfig::default(),
    );
    let bubble = &data.bubbles[0];
    assert_eq!(bubble.x, score.total());
    assert_eq!(bubble.priority, Priority::ResearchGap);
}

#[test]
fn zero_record_outcomes_stay_neutral_and_out_of_the_median() {
    let populated = vec![FindingRecord {
        title: "A".into(),
        user_type: Some("Systemic".into()),
        ..Default::default()
    }];
    let data = assemble_outcome_bubbles(
        &[
            ("empty".to_string(), Vec::new()),
            ("full".to_string(), populated),
        ],
        &ScoringConfig::default(),
    );
    let by_id: HashMap<&str, _> = data
        .bubbles
        .iter()
        .map(|b| (b.id.as_str(), b))
        .collect();
    assert_eq!(by_id["empty"].priority, Priority::Neutral);
    // Median over positive y values only: the single populated bubble.
    assert_eq!(data.median_y, 4.0);
}
