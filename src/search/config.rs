//! Plan search configuration.

use crate::lp::SimplexSolver;

/// Plan search settings.
///
/// # Defaults
/// - tolerance: 1e-5
/// - one plan per time budget: off
/// - parallel: off
/// - solver: [`SimplexSolver::default`]
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Audit tolerance handed to every work distribution.
    pub tolerance: f64,
    /// Keep only the best plan of each time budget; the rest go to the
    /// rejected list.
    pub one_plan_per_time_budget: bool,
    /// Evaluate candidates on the rayon thread pool.
    pub parallel: bool,
    /// Solver used for every candidate.
    pub solver: SimplexSolver,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            one_plan_per_time_budget: false,
            parallel: false,
            solver: SimplexSolver::default(),
        }
    }
}

impl SearchConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the audit tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Keeps one plan per time budget.
    pub fn with_one_plan_per_time_budget(mut self, enabled: bool) -> Self {
        self.one_plan_per_time_budget = enabled;
        self
    }

    /// Enables parallel candidate evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the solver.
    pub fn with_solver(mut self, solver: SimplexSolver) -> Self {
        self.solver = solver;
        self
    }
}
