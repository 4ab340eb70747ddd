//! @acp:module "Scoring"
//! @acp:summary "Composite evidence scores, burden/impact axes, and priority classification"
//! @acp:domain scoring
//! @acp:layer logic
//!
//! All aggregates here share the same guard rails: a record missing an
//! attribute is excluded from that attribute's aggregate (never treated as
//! zero), and every mean/ratio over an empty set returns 0 instead of
//! raising.

pub mod burden;
pub mod maturity;
pub mod priority;
pub mod rigor;

pub use burden::{effort_size, potential_impact, problem_scale, rnd_size};
pub use maturity::{maturity_score, MaturityScore};
pub use priority::{median, Priority, PriorityRule};
pub use rigor::{rigor_score, RigorParams, RigorScore};

/// Mean over a value set; 0 when empty.
pub(crate) fn safe_mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for fewer than two values.
pub(crate) fn population_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = safe_mean(values);
    let variance =
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_mean_empty_is_zero() {
        assert_eq!(safe_mean(&[]), 0.0);
        assert_eq!(safe_mean(&[2.0, 4.0]), 3.0);
    }

    #[test]
    fn pstdev_basics() {
        assert_eq!(population_stdev(&[]), 0.0);
        assert_eq!(population_stdev(&[1.5]), 0.0);
        // Two symmetric points: stdev equals half the spread.
        assert!((population_stdev(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }
}
