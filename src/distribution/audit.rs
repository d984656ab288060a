//! Post-solve audit.
//!
//! The solver's verdict is not trusted on its own: the realized stage
//! totals, average quality, cost, and per-worker loads are recomputed from
//! the page vector and compared with the job's targets within a tolerance.

use serde::{Deserialize, Serialize};

use super::problem::DistributionProblem;

/// Recomputed figures for one page vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Audit {
    /// Realized pages per stage position.
    pub stage_totals: Vec<f64>,
    /// Stages whose total is off the job's pages by more than the tolerance.
    pub infeasible_stages: Vec<usize>,
    /// `Σ quality·pages / total_work`.
    pub average_quality: f64,
    /// How far the average quality falls below the floor, if it does.
    pub quality_shortfall: Option<f64>,
    /// `Σ rate·pages`.
    pub total_cost: f64,
    /// How far the cost exceeds the budget, if it does.
    pub budget_overrun: Option<f64>,
    /// Workers (by index) loaded beyond their capacity.
    pub capacity_overruns: Vec<usize>,
}

impl Audit {
    /// Audits `pages` (one entry per worker, in problem order).
    pub fn of(problem: &DistributionProblem, pages: &[f64]) -> Self {
        let tol = problem.tolerance;
        let total = problem.total_work;

        let mut stage_totals = vec![0.0; problem.stage_count()];
        let mut weighted_quality = 0.0;
        let mut total_cost = 0.0;
        let mut capacity_overruns = Vec::new();

        for (i, (w, &x)) in problem.workers.iter().zip(pages).enumerate() {
            stage_totals[w.stage] += x;
            weighted_quality += w.quality * x;
            total_cost += w.rate * x;
            if x > w.capacity() + tol {
                capacity_overruns.push(i);
            }
        }

        let infeasible_stages = stage_totals
            .iter()
            .enumerate()
            .filter(|(_, t)| (**t - total).abs() > tol)
            .map(|(s, _)| s)
            .collect();

        let average_quality = weighted_quality / total;
        let quality_shortfall = (average_quality < problem.min_quality - tol)
            .then(|| problem.min_quality - average_quality);
        let budget_overrun =
            (total_cost > problem.max_cost + tol).then(|| total_cost - problem.max_cost);

        Self {
            stage_totals,
            infeasible_stages,
            average_quality,
            quality_shortfall,
            total_cost,
            budget_overrun,
            capacity_overruns,
        }
    }

    /// True when nothing is flagged.
    pub fn is_feasible(&self) -> bool {
        self.infeasible_stages.is_empty()
            && self.quality_shortfall.is_none()
            && self.budget_overrun.is_none()
            && self.capacity_overruns.is_empty()
    }
}

/// Why a distribution was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfeasibilityReport {
    /// The solver itself found no feasible point.
    ///
    /// The audit then describes the empty allocation, so every stage is
    /// flagged.
    pub solver_infeasible: bool,
    /// Audit of the rejected page vector.
    pub audit: Audit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkerCandidate;

    fn problem() -> DistributionProblem {
        let workers = vec![
            WorkerCandidate::new("a", 0)
                .with_rate(1.0)
                .with_quality(0.4)
                .with_available_time(60.0),
            WorkerCandidate::new("b", 0)
                .with_rate(2.0)
                .with_quality(0.8)
                .with_available_time(100.0),
            WorkerCandidate::new("c", 1)
                .with_rate(1.0)
                .with_quality(0.0)
                .with_available_time(100.0),
        ];
        DistributionProblem::new(100.0, workers)
            .with_min_quality(0.5)
            .with_max_cost(400.0)
    }

    #[test]
    fn test_clean_audit() {
        // Stage 0: 50·0.4 + 50·0.8 = 60; stage 1 contributes no quality.
        let audit = Audit::of(&problem(), &[50.0, 50.0, 100.0]);
        assert!(audit.is_feasible());
        assert_eq!(audit.stage_totals, vec![100.0, 100.0]);
        assert!((audit.average_quality - 0.6).abs() < 1e-12);
        assert!((audit.total_cost - 250.0).abs() < 1e-12);
    }

    #[test]
    fn test_each_check_flags() {
        // a over capacity, stage 1 short, quality 0.4 < 0.5
        let audit = Audit::of(&problem(), &[100.0, 0.0, 90.0]);
        assert!(!audit.is_feasible());
        assert_eq!(audit.infeasible_stages, vec![1]);
        assert_eq!(audit.capacity_overruns, vec![0]);
        assert!((audit.quality_shortfall.unwrap() - 0.1).abs() < 1e-12);
        assert!(audit.budget_overrun.is_none());

        let audit = Audit::of(&problem(), &[0.0, 100.0, 300.0]);
        assert_eq!(audit.infeasible_stages, vec![1]);
        assert!((audit.budget_overrun.unwrap() - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_within_tolerance_is_not_flagged() {
        let audit = Audit::of(&problem(), &[50.0, 50.0 + 5e-6, 100.0 - 5e-6]);
        assert!(audit.is_feasible());
    }

    #[test]
    fn test_tighter_tolerance_flags_small_deviation() {
        let strict = problem().with_tolerance(1e-6);
        let audit = Audit::of(&strict, &[50.0, 50.0 + 5e-6, 100.0 - 5e-6]);
        assert!(!audit.is_feasible());
        assert_eq!(audit.infeasible_stages, vec![0, 1]);
        assert!(audit.capacity_overruns.is_empty());
    }

    #[test]
    fn test_empty_allocation_flags_every_stage() {
        let audit = Audit::of(&problem(), &[0.0, 0.0, 0.0]);
        assert_eq!(audit.infeasible_stages, vec![0, 1]);
        assert!(audit.quality_shortfall.is_some());
    }
}
