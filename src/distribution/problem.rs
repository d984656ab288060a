//! Work distribution LP formulation.

use tracing::{debug, trace};

use super::audit::{Audit, InfeasibilityReport};
use crate::error::Result;
use crate::lp::{LpBuilder, LpInstance, LpOutcome, LpRow, RowLayout, SimplexSolver};
use crate::models::{Job, WorkerCandidate};
use crate::validation::validate_problem;

/// Constraint groups of the distribution LP, in row order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowGroup {
    /// One row per worker: `pages_i ≤ available_time_i · speed_i`.
    Capacity,
    /// `Σ rate_i · pages_i ≤ max_cost`.
    Budget,
    /// `-Σ quality_i · pages_i ≤ -total_work · min_quality`.
    QualityFloor,
    /// `Σ pages over stage s ≤ total_work`.
    StageUpper(usize),
    /// `-Σ pages over stage s ≤ -total_work`.
    StageLower(usize),
}

/// A work distribution problem: split `total_work` pages of every stage
/// among that stage's workers.
///
/// # Objective
///
/// Each page given to worker `i` is worth
/// `quality_i · delta_cost − rate_i · delta_quality`: the job's linear
/// utility `delta_cost · Σ quality_i·pages_i − delta_quality · Σ rate_i·pages_i`
/// split per variable. Raising quality by `delta_quality` is worth exactly
/// `delta_cost` of extra spend.
///
/// # Constraints
/// - capacity per worker
/// - total cost within budget
/// - average quality at or above the floor
/// - every stage sums to `total_work` (upper and lower row)
#[derive(Debug, Clone)]
pub struct DistributionProblem {
    /// Pages every stage must process.
    pub total_work: f64,
    /// Quality floor for the average quality.
    pub min_quality: f64,
    /// Budget.
    pub max_cost: f64,
    /// Cost the job accepts for one `delta_quality` of quality.
    pub delta_cost: f64,
    /// Quality step paired with `delta_cost`.
    pub delta_quality: f64,
    /// Workers with 0-based contiguous stage positions.
    pub workers: Vec<WorkerCandidate>,
    /// Audit tolerance (default 1e-5).
    pub tolerance: f64,
    /// Solver settings.
    pub solver: SimplexSolver,
}

/// Feasible, audited allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Pages per worker, in problem order.
    pub pages: Vec<f64>,
    /// `Σ rate·pages`.
    pub total_cost: f64,
    /// `Σ quality·pages / total_work`.
    pub average_quality: f64,
    /// Optimal LP objective.
    pub objective_value: f64,
    /// Unused budget (slack of the budget row).
    pub remaining_budget: f64,
    /// Simplex pivots spent.
    pub pivots: usize,
}

/// Verdict of [`DistributionProblem::solve`].
#[derive(Debug, Clone, PartialEq)]
pub enum DistributionOutcome {
    /// Solved and audited.
    Feasible(Distribution),
    /// No acceptable allocation.
    Infeasible(InfeasibilityReport),
    /// The LP was unbounded. Carries the instance for postmortem.
    ///
    /// Capacity rows bound every variable, so this indicates a defect.
    Unbounded(LpInstance),
}

impl DistributionProblem {
    /// Creates a problem with a zero quality floor, zero budget and zero
    /// deltas.
    pub fn new(total_work: f64, workers: Vec<WorkerCandidate>) -> Self {
        Self {
            total_work,
            min_quality: 0.0,
            max_cost: 0.0,
            delta_cost: 0.0,
            delta_quality: 0.0,
            workers,
            tolerance: 1e-5,
            solver: SimplexSolver::default(),
        }
    }

    /// Creates a problem from a job's targets.
    pub fn from_job(job: &Job, workers: Vec<WorkerCandidate>) -> Self {
        Self::new(job.total_pages, workers)
            .with_min_quality(job.min_quality)
            .with_max_cost(job.max_cost)
            .with_deltas(job.delta_cost, job.delta_quality)
    }

    /// Sets the quality floor.
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality;
        self
    }

    /// Sets the budget.
    pub fn with_max_cost(mut self, max_cost: f64) -> Self {
        self.max_cost = max_cost;
        self
    }

    /// Sets the indifference deltas.
    pub fn with_deltas(mut self, delta_cost: f64, delta_quality: f64) -> Self {
        self.delta_cost = delta_cost;
        self.delta_quality = delta_quality;
        self
    }

    /// Sets the audit tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the solver.
    pub fn with_solver(mut self, solver: SimplexSolver) -> Self {
        self.solver = solver;
        self
    }

    /// Number of stages (highest stage position + 1).
    pub fn stage_count(&self) -> usize {
        self.workers.iter().map(|w| w.stage + 1).max().unwrap_or(0)
    }

    /// Builds the LP.
    ///
    /// Rows: capacity (one per worker), budget, quality floor, then an
    /// upper and a lower row per stage.
    pub fn formulate(&self) -> Result<(LpInstance, RowLayout<RowGroup>)> {
        validate_problem(self)?;

        let n = self.workers.len();
        let objective = self
            .workers
            .iter()
            .map(|w| w.quality * self.delta_cost - w.rate * self.delta_quality)
            .collect();

        let mut builder = LpBuilder::new(n).with_objective(objective);

        builder.add_group(
            RowGroup::Capacity,
            self.workers
                .iter()
                .enumerate()
                .map(|(i, w)| LpRow::sparse(n, [(i, 1.0)], w.capacity())),
        );
        builder.add_group(
            RowGroup::Budget,
            [LpRow::new(
                self.workers.iter().map(|w| w.rate).collect(),
                self.max_cost,
            )],
        );
        builder.add_group(
            RowGroup::QualityFloor,
            [LpRow::new(
                self.workers.iter().map(|w| -w.quality).collect(),
                -self.total_work * self.min_quality,
            )],
        );

        for stage in 0..self.stage_count() {
            let members = self
                .workers
                .iter()
                .enumerate()
                .filter(|(_, w)| w.stage == stage)
                .map(|(i, _)| (i, 1.0));
            let upper = LpRow::sparse(n, members, self.total_work);
            let lower = upper.negated();
            builder.add_group(RowGroup::StageUpper(stage), [upper]);
            builder.add_group(RowGroup::StageLower(stage), [lower]);
        }

        builder.build()
    }

    /// Formulates, solves, and audits.
    ///
    /// # Errors
    /// Invalid input, or a pivot limit reached by the configured solver.
    pub fn solve(&self) -> Result<DistributionOutcome> {
        let (instance, layout) = self.formulate()?;
        trace!(
            workers = self.workers.len(),
            rows = instance.n_rows(),
            "solving work distribution"
        );

        let solution = match self.solver.solve(&instance)? {
            LpOutcome::Optimal(solution) => solution,
            LpOutcome::Unbounded => return Ok(DistributionOutcome::Unbounded(instance)),
            LpOutcome::Infeasible => {
                let audit = Audit::of(self, &vec![0.0; self.workers.len()]);
                return Ok(DistributionOutcome::Infeasible(InfeasibilityReport {
                    solver_infeasible: true,
                    audit,
                }));
            }
        };

        let pages = solution.decisions().to_vec();
        let audit = Audit::of(self, &pages);
        if !audit.is_feasible() {
            debug!(
                stages = ?audit.infeasible_stages,
                shortfall = ?audit.quality_shortfall,
                "optimal point rejected by audit"
            );
            return Ok(DistributionOutcome::Infeasible(InfeasibilityReport {
                solver_infeasible: false,
                audit,
            }));
        }

        let remaining_budget = solution
            .slacks(&layout, &RowGroup::Budget)
            .and_then(|s| s.first().copied())
            .unwrap_or(0.0);

        Ok(DistributionOutcome::Feasible(Distribution {
            pages,
            total_cost: audit.total_cost,
            average_quality: audit.average_quality,
            objective_value: solution.value,
            remaining_budget,
            pivots: solution.pivots,
        }))
    }
}
