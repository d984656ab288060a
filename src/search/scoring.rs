//! Plan scoring.
//!
//! # Score Convention
//! Higher scores are better. Plans are ranked in descending score order.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Realized figures of a candidate plan, handed to a [`PlanScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Realized average quality.
    pub quality: f64,
    /// Total cost.
    pub cost: f64,
    /// Realized time (hours).
    pub time: f64,
    /// Job pages.
    pub total_pages: f64,
    /// Job's cost indifference delta.
    pub delta_cost: f64,
    /// Job's quality indifference delta.
    pub delta_quality: f64,
}

/// Scores a plan.
///
/// Implementations must be deterministic.
pub trait PlanScorer: Send + Sync + Debug {
    /// Score of an outcome (higher is better).
    fn score(&self, outcome: &PlanOutcome) -> f64;

    /// Scorer name.
    fn name(&self) -> &'static str {
        "custom"
    }
}

/// The job's linear utility:
/// `delta_cost · quality · total_pages − delta_quality · cost`.
///
/// Equals the work distribution's objective evaluated on the realized
/// plan, so ranking agrees with what each solve optimized.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearUtility;

impl PlanScorer for LinearUtility {
    fn score(&self, o: &PlanOutcome) -> f64 {
        o.delta_cost * o.quality * o.total_pages - o.delta_quality * o.cost
    }

    fn name(&self) -> &'static str {
        "linear-utility"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(quality: f64, cost: f64) -> PlanOutcome {
        PlanOutcome {
            quality,
            cost,
            time: 10.0,
            total_pages: 100.0,
            delta_cost: 0.1,
            delta_quality: 0.01,
        }
    }

    #[test]
    fn test_linear_utility() {
        // 0.1 · 0.5 · 100 − 0.01 · 50
        assert!((LinearUtility.score(&outcome(0.5, 50.0)) - 4.5).abs() < 1e-12);
        assert_eq!(LinearUtility.name(), "linear-utility");
    }

    #[test]
    fn test_indifference_keeps_score() {
        // +0.01 quality adds 0.1, +10 cost removes 0.1.
        let base = LinearUtility.score(&outcome(0.5, 50.0));
        let traded = LinearUtility.score(&outcome(0.51, 60.0));
        assert!((base - traded).abs() < 1e-9);
    }
}
