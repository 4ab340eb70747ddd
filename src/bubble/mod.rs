//! @acp:module "Bubbles"
//! @acp:summary "Bubble record shapes consumed by the presentation layer"
//! @acp:domain scoring
//! @acp:layer model
//!
//! Field names are part of the JSON contract; the presentation layer
//! parses them literally. Bubbles are ephemeral and recomputed on every
//! request, never persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::score::Priority;

pub mod assembler;

pub use assembler::{
    assemble_intervention_bubbles, assemble_objective_bubbles, assemble_outcome_bubbles,
    assemble_rigor_bubbles, zero_bubble, LevelData,
};

/// One bubble of a view level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub paper_count: usize,
    pub priority: Priority,
    /// Drill-down payload: sub-scores with maxima, descriptions, and
    /// supporting distributions. Internally consistent with x/y/size but
    /// otherwise unconstrained.
    pub breakdown: Value,
}

/// Round to two decimals for breakdown display values.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_serializes_contract_fields() {
        let bubble = Bubble {
            id: "Affective - motivation".into(),
            label: "Affective - motivation".into(),
            x: 50.0,
            y: 1.5,
            size: 3.2,
            paper_count: 7,
            priority: Priority::OnWatch,
            breakdown: serde_json::json!({}),
        };
        let value = serde_json::to_value(&bubble).unwrap();
        let object = value.as_object().unwrap();
        for key in ["id", "label", "x", "y", "size", "paper_count", "priority", "breakdown"] {
            assert!(object.contains_key(key), "missing {key}");
        }
        assert_eq!(object["priority"], "on_watch");
    }

    #[test]
    fn round2_behavior() {
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(1.235), 1.24);
    }
}
