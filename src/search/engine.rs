//! Plan search engine.
//!
//! # Algorithm
//!
//! 1. Derive time budgets (the deadline, or lower/mid/upper).
//! 2. For each budget, for each catalog shape: lay out the stage windows,
//!    keep the pool workers with free time in their stage's window, and
//!    solve the work distribution.
//! 3. Turn every feasible distribution into a scored plan.
//! 4. Optionally keep only the best plan per budget, then rank.
//!
//! # Complexity
//! O(b · s) work distribution solves for b budgets and s shapes.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::budget::{budget_stages, derived_time_budgets, expected_throughput};
use super::{LinearUtility, PipelineShape, PlanOutcome, PlanScorer, SearchConfig, ShapeCatalog};
use crate::distribution::{DistributionOutcome, DistributionProblem};
use crate::error::{PlanError, Result};
use crate::models::{Assignment, Job, Plan, ScheduleQuery, StageSubtotal, WorkerProfile};
use crate::validation::{validate_catalog, validate_job, validate_pools, ValidationError, ValidationErrorKind};

/// Ranked search output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanSuggestions {
    /// Kept plans, best first.
    pub plans: Vec<Plan>,
    /// Feasible plans dropped by the one-plan-per-budget collapse, best first.
    pub rejected: Vec<Plan>,
}

/// One (budget, shape) pair to evaluate.
#[derive(Debug, Clone, Copy)]
struct Candidate<'c> {
    budget_index: usize,
    budget: f64,
    shape: &'c PipelineShape,
}

/// Searches shapes and time budgets for a job.
///
/// # Example
///
/// ```
/// use u_allocate::models::{AlwaysAvailable, Job, WorkerProfile};
/// use u_allocate::search::PlanSearch;
///
/// let job = Job::new("J1", 10.0)
///     .with_deadline(24.0)
///     .with_max_cost(100.0)
///     .with_min_quality(0.5)
///     .with_deltas(0.3, 0.01);
/// let pools = vec![
///     vec![WorkerProfile::new("A0", 0, 1.0).with_quality(0.6).with_speed(2.0)],
///     vec![WorkerProfile::new("T0", 1, 0.5).with_quality(0.5).with_speed(2.0)],
///     vec![WorkerProfile::new("E0", 2, 0.3).with_quality(0.9).with_speed(4.0)],
///     vec![WorkerProfile::new("P0", 3, 0.2).with_quality(0.95).with_speed(6.0)],
/// ];
///
/// let suggestions = PlanSearch::new(&job, &pools, &AlwaysAvailable)
///     .suggest_plans()
///     .unwrap();
/// assert_eq!(suggestions.plans.len(), 4);
/// assert!(suggestions.plans[0].score >= suggestions.plans[3].score);
/// ```
pub struct PlanSearch<'a> {
    job: &'a Job,
    pools: &'a [Vec<WorkerProfile>],
    schedule: &'a dyn ScheduleQuery,
    now: f64,
    expected_pages_per_hour: Option<Vec<f64>>,
    catalog: ShapeCatalog,
    scorer: Box<dyn PlanScorer>,
    config: SearchConfig,
}

impl<'a> PlanSearch<'a> {
    /// Creates a search over per-stage pools (`pools[s]` holds stage `s`)
    /// with the standard catalog, [`LinearUtility`] scoring, and `now = 0`.
    pub fn new(job: &'a Job, pools: &'a [Vec<WorkerProfile>], schedule: &'a dyn ScheduleQuery) -> Self {
        Self {
            job,
            pools,
            schedule,
            now: 0.0,
            expected_pages_per_hour: None,
            catalog: ShapeCatalog::standard(),
            scorer: Box::new(LinearUtility),
            config: SearchConfig::default(),
        }
    }

    /// Sets the current time (hours).
    pub fn with_now(mut self, now: f64) -> Self {
        self.now = now;
        self
    }

    /// Sets the expected pages per hour of each stage, used for budget
    /// derivation. Defaults to each pool's mean speed.
    pub fn with_expected_pages_per_hour(mut self, pages_per_hour: Vec<f64>) -> Self {
        self.expected_pages_per_hour = Some(pages_per_hour);
        self
    }

    /// Sets the shape catalog.
    pub fn with_catalog(mut self, catalog: ShapeCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the scorer.
    pub fn with_scorer(mut self, scorer: impl PlanScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Time budgets to evaluate, in order.
    pub fn time_budgets(&self) -> Result<Vec<f64>> {
        if let Some(deadline) = self.job.max_time {
            return Ok(vec![deadline]);
        }
        let throughput = expected_throughput(
            self.pools,
            self.expected_pages_per_hour.as_deref(),
            &budget_stages(&self.catalog),
        )?;
        Ok(derived_time_budgets(
            self.job.total_pages,
            &self.catalog,
            &throughput,
        ))
    }

    /// Evaluates every (budget, shape) candidate and ranks the feasible
    /// plans.
    ///
    /// # Errors
    /// - [`PlanError::Invalid`] for malformed job, pools, or catalog
    /// - [`PlanError::Unbounded`] if any candidate's LP is unbounded
    /// - [`PlanError::PivotLimitExceeded`] from a configured pivot cap
    pub fn suggest_plans(&self) -> Result<PlanSuggestions> {
        let started = Instant::now();
        self.validate()?;

        let budgets = self.time_budgets()?;
        let candidates: Vec<Candidate<'_>> = budgets
            .iter()
            .enumerate()
            .flat_map(|(budget_index, &budget)| {
                self.catalog.shapes.iter().map(move |shape| Candidate {
                    budget_index,
                    budget,
                    shape,
                })
            })
            .collect();

        let evaluated: Vec<Option<(usize, Plan)>> = if self.config.parallel {
            candidates
                .par_iter()
                .map(|c| self.evaluate(c).map(|plan| plan.map(|p| (c.budget_index, p))))
                .collect::<Result<_>>()?
        } else {
            candidates
                .iter()
                .map(|c| self.evaluate(c).map(|plan| plan.map(|p| (c.budget_index, p))))
                .collect::<Result<_>>()?
        };
        let feasible: Vec<(usize, Plan)> = evaluated.into_iter().flatten().collect();

        let suggestions = self.aggregate(feasible, budgets.len());
        info!(
            job = %self.job.id,
            candidates = candidates.len(),
            plans = suggestions.plans.len(),
            rejected = suggestions.rejected.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "plan search finished"
        );
        Ok(suggestions)
    }

    fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        for result in [
            validate_job(self.job),
            validate_pools(self.pools),
            validate_catalog(&self.catalog),
        ] {
            if let Err(e) = result {
                errors.extend(e);
            }
        }
        for stage in self.catalog.stages() {
            if stage >= self.pools.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::LengthMismatch,
                    format!(
                        "catalog uses stage {stage} but only {} pools were given",
                        self.pools.len()
                    ),
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlanError::Invalid(errors))
        }
    }

    /// Solves one candidate. `Ok(None)` when it yields no plan.
    fn evaluate(&self, candidate: &Candidate<'_>) -> Result<Option<Plan>> {
        let shape = candidate.shape;
        let windows = shape.stage_windows(self.now, candidate.budget);
        let last = shape.len() - 1;

        // LP variable i ↔ (profile, catalog stage)
        let mut members: Vec<(&WorkerProfile, usize)> = Vec::new();
        let mut workers = Vec::new();
        for (position, (&stage, window)) in shape.stages.iter().zip(&windows).enumerate() {
            let before = workers.len();
            for profile in &self.pools[stage] {
                let available = self.schedule.available_time(&profile.id, window);
                if available <= 0.0 {
                    continue;
                }
                let mut worker = profile.candidate(position, available);
                // Only the final stage's quality reaches the customer.
                if position != last {
                    worker.quality = 0.0;
                }
                workers.push(worker);
                members.push((profile, stage));
            }
            if workers.len() == before {
                debug!(
                    shape = %shape.name,
                    budget = candidate.budget,
                    stage,
                    "no worker available in stage window"
                );
                return Ok(None);
            }
        }

        let problem = DistributionProblem::from_job(self.job, workers)
            .with_tolerance(self.config.tolerance)
            .with_solver(self.config.solver.clone());

        let started = Instant::now();
        let outcome = problem.solve()?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1e3;

        let distribution = match outcome {
            DistributionOutcome::Feasible(d) => d,
            DistributionOutcome::Infeasible(report) => {
                debug!(
                    shape = %shape.name,
                    budget = candidate.budget,
                    stages = shape.len(),
                    elapsed_ms,
                    solver_infeasible = report.solver_infeasible,
                    "candidate infeasible"
                );
                return Ok(None);
            }
            DistributionOutcome::Unbounded(instance) => {
                let instance = serde_json::to_string_pretty(&instance)
                    .unwrap_or_else(|e| format!("<instance not serializable: {e}>"));
                warn!(
                    shape = %shape.name,
                    budget = candidate.budget,
                    "unbounded work distribution captured"
                );
                return Err(PlanError::Unbounded { instance });
            }
        };
        debug!(
            shape = %shape.name,
            budget = candidate.budget,
            stages = shape.len(),
            elapsed_ms,
            pivots = distribution.pivots,
            "candidate solved"
        );

        let assignments: Vec<Assignment> = members
            .iter()
            .zip(&problem.workers)
            .zip(&distribution.pages)
            .filter(|(_, pages)| **pages > 0.0)
            .map(|(((profile, stage), worker), &pages)| Assignment {
                worker_id: profile.id.clone(),
                stage: *stage,
                pages,
                rate: worker.rate,
                quality: profile.quality,
                speed: worker.speed,
            })
            .collect();

        let stage_subtotals: Vec<StageSubtotal> = shape
            .stages
            .iter()
            .map(|&stage| {
                StageSubtotal::from_assignments(
                    stage,
                    assignments.iter().filter(|a| a.stage == stage),
                    self.job.total_pages,
                )
            })
            .collect();

        let time: f64 = stage_subtotals.iter().map(|s| s.time).sum();
        let outcome = PlanOutcome {
            quality: distribution.average_quality,
            cost: distribution.total_cost,
            time,
            total_pages: self.job.total_pages,
            delta_cost: self.job.delta_cost,
            delta_quality: self.job.delta_quality,
        };

        Ok(Some(Plan {
            shape: shape.name.clone(),
            time_budget: candidate.budget,
            time,
            cost: distribution.total_cost,
            quality: distribution.average_quality,
            score: self.scorer.score(&outcome),
            stage_subtotals,
            assignments,
        }))
    }

    /// Applies the optional per-budget collapse and sorts both lists.
    fn aggregate(&self, feasible: Vec<(usize, Plan)>, budget_count: usize) -> PlanSuggestions {
        let mut plans = Vec::new();
        let mut rejected = Vec::new();

        if self.config.one_plan_per_time_budget {
            let mut best: Vec<Option<Plan>> = vec![None; budget_count];
            for (budget_index, plan) in feasible {
                match &best[budget_index] {
                    Some(kept) if kept.score >= plan.score => rejected.push(plan),
                    _ => {
                        if let Some(previous) = best[budget_index].replace(plan) {
                            rejected.push(previous);
                        }
                    }
                }
            }
            plans.extend(best.into_iter().flatten());
        } else {
            plans.extend(feasible.into_iter().map(|(_, plan)| plan));
        }

        // Stable: ties keep evaluation order.
        plans.sort_by(|a, b| b.score.total_cmp(&a.score));
        rejected.sort_by(|a, b| b.score.total_cmp(&a.score));

        PlanSuggestions { plans, rejected }
    }
}
