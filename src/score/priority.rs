//! @acp:module "Priority Classification"
//! @acp:summary "Median-based three-way priority tags, one rule set per view"
//! @acp:domain scoring
//! @acp:layer logic

use serde::{Deserialize, Serialize};

/// Priority tag attached to each bubble. `Neutral` is reserved for
/// zero-record bubbles that skip classification entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    HighPriority,
    OnWatch,
    ResearchGap,
    Neutral,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::HighPriority => "high_priority",
            Priority::OnWatch => "on_watch",
            Priority::ResearchGap => "research_gap",
            Priority::Neutral => "neutral",
        }
    }
}

/// Which view's rule table to apply. Each view splits the x axis at its
/// own evidence threshold and the y axis at the sibling median.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriorityRule {
    /// Outcome-centric: either axis high alone earns on-watch.
    OutcomeBurden { threshold: f64 },
    /// Objective-centric: low impact is a research gap regardless of x.
    ObjectiveImpact { threshold: f64 },
    /// Rigor-filtered: low quality is a research gap regardless of y.
    RigorFiltered { threshold: f64 },
}

impl PriorityRule {
    /// Classify one bubble. Threshold and median equality always fall to
    /// the non-high-priority branch: the comparisons are strict.
    pub fn classify(&self, x: f64, y: f64, median_y: f64) -> Priority {
        match *self {
            PriorityRule::OutcomeBurden { threshold } => {
                let high_x = x > threshold;
                let high_y = y > median_y;
                match (high_x, high_y) {
                    (true, true) => Priority::HighPriority,
                    (false, true) | (true, false) => Priority::OnWatch,
                    (false, false) => Priority::ResearchGap,
                }
            }
            PriorityRule::ObjectiveImpact { threshold } => {
                if y <= median_y {
                    Priority::ResearchGap
                } else if x > threshold {
                    Priority::HighPriority
                } else {
                    Priority::OnWatch
                }
            }
            PriorityRule::RigorFiltered { threshold } => {
                if x <= threshold {
                    Priority::ResearchGap
                } else if y > median_y {
                    Priority::HighPriority
                } else {
                    Priority::OnWatch
                }
            }
        }
    }
}

/// Standard median: empty list yields 0, even lengths average the two
/// middle sorted elements.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}
