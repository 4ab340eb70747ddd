//! @acp:module "Bubble Assembler"
//! @acp:summary "Merges composite scores into per-level bubble sets with priority tags"
//! @acp:domain scoring
//! @acp:layer logic
//!
//! Assembly is a two-phase pass, because the priority tag depends on the
//! full sibling set: first every bubble's x/y/size/breakdown is computed
//! (independently, fanned out with rayon where the entity count warrants
//! it), then the median of the positive y values is taken and each
//! non-empty bubble is classified against it.

use std::collections::HashMap;

use rayon::prelude::*;
use serde_json::{json, Value};

use crate::config::ScoringConfig;
use crate::evolution::generalizability;
use crate::record::FindingRecord;
use crate::score::{
    burden, maturity_score, median, rigor_score, MaturityScore, Priority, PriorityRule,
    RigorParams, RigorScore,
};

use super::{round2, Bubble};

/// One assembled view level: the bubbles plus the median the priority pass
/// used (surfaced in the level metadata).
#[derive(Debug, Clone)]
pub struct LevelData {
    pub bubbles: Vec<Bubble>,
    pub median_y: f64,
}

/// The fixed shape for an entity with no records: all-zero axes, empty
/// breakdown, no sub-score computation, `neutral` priority.
pub fn zero_bubble(id: &str) -> Bubble {
    Bubble {
        id: id.to_string(),
        label: id.to_string(),
        x: 0.0,
        y: 0.0,
        size: 0.0,
        paper_count: 0,
        priority: Priority::Neutral,
        breakdown: json!({}),
    }
}

/// Problem-burden view: one bubble per outcome. x = evidence maturity,
/// y = problem scale, size = effort required.
pub fn assemble_outcome_bubbles(
    datasets: &[(String, Vec<FindingRecord>)],
    scoring: &ScoringConfig,
) -> LevelData {
    let mut bubbles: Vec<Bubble> = datasets
        .par_iter()
        .map(|(outcome, records)| outcome_bubble(outcome, records))
        .collect();

    let rule = PriorityRule::OutcomeBurden {
        threshold: scoring.maturity_threshold,
    };
    let median_y = classify(&mut bubbles, rule);
    LevelData { bubbles, median_y }
}

fn outcome_bubble(outcome: &str, records: &[FindingRecord]) -> Bubble {
    if records.is_empty() {
        return zero_bubble(outcome);
    }

    let maturity = maturity_score(records);
    let scale = burden::problem_scale(records);
    let effort = burden::effort_size(records);

    let avg_system = burden::mean_scale(records, |r| r.system_impact_levels);
    let avg_decision = burden::mean_scale(records, |r| r.decision_making_complexity);

    let breakdown = json!({
        "evidence_maturity": {
            "score": maturity.total(),
            "max": 100,
            "description": "How well-understood this problem is",
            "components": maturity_breakdown(&maturity),
        },
        "problem_scale": {
            "score": round2(scale),
            "min": 1,
            "max": 4,
            "description": "Scope of impact: 1 = localized (student/teacher), 4 = systemic (policy-level)",
            "distribution": user_type_distribution(records),
        },
        "effort_required": {
            "score": round2(effort),
            "description": "Effort to meaningfully shift this problem",
            "components": {
                "system_impact": {
                    "score": round2(avg_system),
                    "description": "Levels of system affected (0 = classroom to 4 = cross-sector)",
                },
                "decision_complexity": {
                    "score": round2(avg_decision),
                    "description": "Number of decision-makers involved (0 = one actor to 4 = >10 actors)",
                },
            },
        },
    });

    Bubble {
        id: outcome.to_string(),
        label: outcome.to_string(),
        x: maturity.total(),
        y: scale,
        size: effort,
        paper_count: records.len(),
        priority: Priority::ResearchGap, // provisional until the median pass
        breakdown,
    }
}

/// Intervention-evidence view: one bubble per implementation objective.
/// x = evidence maturity, y = potential impact over the injected
/// outcome-scale map, size = R&D required.
pub fn assemble_objective_bubbles(
    datasets: &[(String, Vec<FindingRecord>)],
    outcome_scales: &HashMap<String, f64>,
    investments: &HashMap<String, u64>,
    scoring: &ScoringConfig,
) -> LevelData {
    let mut bubbles: Vec<Bubble> = datasets
        .iter()
        .map(|(objective, records)| {
            let investment = investments.get(objective).copied().unwrap_or(0);
            objective_bubble(objective, records, outcome_scales, investment)
        })
        .collect();

    let rule = PriorityRule::ObjectiveImpact {
        threshold: scoring.maturity_threshold,
    };
    let median_y = classify(&mut bubbles, rule);
    LevelData { bubbles, median_y }
}

fn objective_bubble(
    objective: &str,
    records: &[FindingRecord],
    outcome_scales: &HashMap<String, f64>,
    investment: u64,
) -> Bubble {
    if records.is_empty() {
        let mut bubble = zero_bubble(objective);
        bubble.breakdown = json!({ "investment": investment });
        return bubble;
    }

    let maturity = maturity_score(records);
    let impact = burden::potential_impact(records, outcome_scales);
    let rnd = burden::rnd_size(records);

    let maturity_gaps: Vec<f64> = records
        .iter()
        .filter_map(|r| r.evidence_type_strength)
        .map(|s| 4.0 - f64::from(s))
        .collect();
    let avg_gap = if maturity_gaps.is_empty() {
        0.0
    } else {
        maturity_gaps.iter().sum::<f64>() / maturity_gaps.len() as f64
    };
    let avg_eval = burden::mean_scale(records, |r| r.evaluation_burden_cost);

    let mut outcomes_targeted: Vec<&str> =
        records.iter().filter_map(|r| r.outcome.as_deref()).collect();
    outcomes_targeted.sort_unstable();
    outcomes_targeted.dedup();

    let breakdown = json!({
        "investment": {
            "amount": investment,
            "description": "USP investment in AI across this implementation objective",
        },
        "evidence_maturity": {
            "score": maturity.total(),
            "max": 100,
            "description": "Quality and reliability of intervention evidence",
            "components": maturity_breakdown(&maturity),
        },
        "potential_impact": {
            "score": round2(impact),
            "description": "Alignment to high-burden problems (sum of burden-scale values of targeted outcomes)",
            "outcomes_targeted": outcomes_targeted,
        },
        "r_and_d_required": {
            "score": round2(rnd),
            "description": "Additional R&D investment needed to reach field readiness",
            "components": {
                "evidence_maturity_gap": {
                    "score": round2(avg_gap),
                    "description": "Gap in evidence quality (4 = early prototype, 0 = mature evidence)",
                },
                "evaluation_burden": {
                    "score": round2(avg_eval),
                    "description": "Cost to rigorously evaluate (0 = short-term/simple, 4 = long-term/complex)",
                },
            },
        },
    });

    Bubble {
        id: objective.to_string(),
        label: objective.to_string(),
        x: maturity.total(),
        y: impact,
        size: rnd,
        paper_count: records.len(),
        priority: Priority::ResearchGap,
        breakdown,
    }
}

/// Rigor-filtered view: one bubble per broadened objective over the
/// highest-rated randomized corpus. x = evidence quality, y =
/// generalizability of the corpus contexts, size = deduplicated students
/// per thousand.
pub fn assemble_rigor_bubbles(
    datasets: &[(String, Vec<FindingRecord>)],
    scoring: &ScoringConfig,
) -> LevelData {
    let params = RigorParams {
        effect_spread_k: scoring.effect_spread_k,
    };
    let mut bubbles: Vec<Bubble> = datasets
        .iter()
        .map(|(objective, records)| rigor_bubble(objective, objective, records, &params))
        .collect();

    let rule = PriorityRule::RigorFiltered {
        threshold: scoring.rigor_threshold,
    };
    let median_y = classify(&mut bubbles, rule);
    LevelData { bubbles, median_y }
}

/// Individual-interventions view within one broadened objective: same
/// shape as the rigor view but with the per-intervention spread
/// normalizer.
pub fn assemble_intervention_bubbles(
    datasets: &[(String, String, Vec<FindingRecord>)],
    scoring: &ScoringConfig,
) -> LevelData {
    let params = RigorParams {
        effect_spread_k: scoring.intervention_effect_spread_k,
    };
    let mut bubbles: Vec<Bubble> = datasets
        .iter()
        .map(|(id, label, records)| rigor_bubble(id, label, records, &params))
        .collect();

    let rule = PriorityRule::RigorFiltered {
        threshold: scoring.rigor_threshold,
    };
    let median_y = classify(&mut bubbles, rule);
    LevelData { bubbles, median_y }
}

fn rigor_bubble(id: &str, label: &str, records: &[FindingRecord], params: &RigorParams) -> Bubble {
    if records.is_empty() {
        let mut bubble = zero_bubble(id);
        bubble.label = label.to_string();
        return bubble;
    }

    let quality = rigor_score(records, params);
    let reach = context_generalizability(records);
    let size = quality.total_students as f64 / 1000.0;

    let breakdown = json!({
        "evidence_quality": {
            "score": quality.total(),
            "max": 100,
            "description": "Quality of rigorously evaluated evidence",
            "components": rigor_breakdown(&quality),
        },
        "generalizability": {
            "score": round2(reach),
            "max": 100,
            "description": "Diversity of regions, school types, and populations studied",
        },
        "reach": {
            "students": quality.total_students,
            "num_studies": quality.num_studies,
            "description": "Deduplicated students across distinct studies",
        },
        "study_designs": design_distribution(records),
    });

    Bubble {
        id: id.to_string(),
        label: label.to_string(),
        x: quality.total(),
        y: reach,
        size,
        paper_count: records.len(),
        priority: Priority::ResearchGap,
        breakdown,
    }
}

/// Median-then-classify pass shared by every level. Returns the median the
/// rule was evaluated against. Zero-record bubbles stay `neutral` and are
/// excluded from the median by the y > 0 rule.
fn classify(bubbles: &mut [Bubble], rule: PriorityRule) -> f64 {
    let positive: Vec<f64> = bubbles
        .iter()
        .filter(|b| b.y > 0.0)
        .map(|b| b.y)
        .collect();
    let median_y = median(&positive);

    for bubble in bubbles.iter_mut() {
        if bubble.paper_count == 0 {
            continue;
        }
        bubble.priority = rule.classify(bubble.x, bubble.y, median_y);
    }
    median_y
}

fn maturity_breakdown(score: &MaturityScore) -> Value {
    json!({
        "design_strength": {
            "score": round2(score.design_strength),
            "max": 25,
            "description": "Study design quality (RCT highest, then meta-analysis, quasi-experimental, correlational, case study)",
        },
        "consistency": {
            "score": round2(score.consistency),
            "max": 25,
            "description": "Directional stability of findings across studies",
        },
        "external_validity": {
            "score": round2(score.external_validity),
            "max": 25,
            "description": "Diversity of settings, regions, and populations studied",
        },
        "quality": {
            "score": round2(score.quality),
            "max": 25,
            "description": "Risk of bias and methodological rigor",
        },
    })
}

fn rigor_breakdown(score: &RigorScore) -> Value {
    json!({
        "design_quality": {
            "score": round2(score.design_quality),
            "max": 25,
            "description": "WWC study rating quality",
        },
        "replication": {
            "score": round2(score.replication),
            "max": 25,
            "description": "Number of distinct studies replicating the finding",
        },
        "sample_adequacy": {
            "score": round2(score.sample_adequacy),
            "max": 25,
            "description": "Deduplicated student reach",
        },
        "effect_consistency": {
            "score": round2(score.effect_consistency),
            "max": 25,
            "description": "Stability of reported effect sizes",
        },
    })
}

/// Generalizability of a record set's context coverage, using the same
/// formula as the temporal series.
fn context_generalizability(records: &[FindingRecord]) -> f64 {
    let regions = unique(records, |r| r.region.as_deref());
    let school_types = unique(records, |r| r.school_type.as_deref());
    let populations = unique(records, |r| r.population.as_deref());
    generalizability(regions, school_types, populations)
}

fn unique<'a, F>(records: &'a [FindingRecord], field: F) -> usize
where
    F: Fn(&'a FindingRecord) -> Option<&'a str>,
{
    let mut values: Vec<&str> = records.iter().filter_map(field).collect();
    values.sort_unstable();
    values.dedup();
    values.len()
}

fn user_type_distribution(records: &[FindingRecord]) -> Value {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let key = record.user_type.as_deref().unwrap_or("not_reported");
        *counts.entry(key).or_insert(0) += 1;
    }
    json!(counts)
}

fn design_distribution(records: &[FindingRecord]) -> Value {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        let key = record.study_design.as_deref().unwrap_or("not_reported");
        *counts.entry(key).or_insert(0) += 1;
    }
    json!(counts)
}
