//! Plan (solution) model.
//!
//! A plan is a realized, feasible allocation of a job's pages to workers
//! for one pipeline shape and time budget. Plans are built once by the
//! plan search and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Pages assigned to one worker.
///
/// Refers to the worker by ID; the caller resolves it against its own
/// worker registry (for example to book busy time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned worker ID.
    pub worker_id: String,
    /// Catalog stage the work belongs to.
    pub stage: usize,
    /// Pages assigned (> 0).
    pub pages: f64,
    /// Rate at solve time (currency per page).
    pub rate: f64,
    /// Worker quality at solve time.
    pub quality: f64,
    /// Worker speed at solve time (pages per hour).
    pub speed: f64,
}

/// Per-stage summary of a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSubtotal {
    /// Catalog stage.
    pub stage: usize,
    /// Number of workers with pages in this stage.
    pub worker_count: usize,
    /// Longest completion time among the stage's assignments (hours).
    pub time: f64,
    /// Stage cost divided by the job's total pages.
    pub cost_per_page: f64,
}

/// A scored allocation for one (shape, time budget) candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Name of the pipeline shape.
    pub shape: String,
    /// Time budget the plan was evaluated under (hours).
    pub time_budget: f64,
    /// Realized time: sum of stage times (hours).
    pub time: f64,
    /// Total cost.
    pub cost: f64,
    /// Realized average quality.
    pub quality: f64,
    /// Composite score (higher is better).
    pub score: f64,
    /// Stage summaries, in pipeline order.
    pub stage_subtotals: Vec<StageSubtotal>,
    /// Assignments, in pipeline order.
    pub assignments: Vec<Assignment>,
}

impl Assignment {
    /// Completion time: pages / speed (hours).
    #[inline]
    pub fn time(&self) -> f64 {
        self.pages / self.speed
    }

    /// Cost of this assignment.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.pages * self.rate
    }
}

impl StageSubtotal {
    /// Summarizes the given assignments of one stage.
    pub fn from_assignments<'a>(
        stage: usize,
        assignments: impl IntoIterator<Item = &'a Assignment>,
        total_pages: f64,
    ) -> Self {
        let mut worker_count = 0;
        let mut time: f64 = 0.0;
        let mut cost = 0.0;
        for a in assignments {
            worker_count += 1;
            time = time.max(a.time());
            cost += a.cost();
        }
        Self {
            stage,
            worker_count,
            time,
            cost_per_page: cost / total_pages,
        }
    }
}

impl Plan {
    /// Number of stages in the plan.
    pub fn stage_count(&self) -> usize {
        self.stage_subtotals.len()
    }

    /// Assignments of one stage.
    pub fn assignments_for_stage(&self, stage: usize) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.stage == stage)
            .collect()
    }

    /// Total pages assigned within one stage.
    pub fn pages_for_stage(&self, stage: usize) -> f64 {
        self.assignments
            .iter()
            .filter(|a| a.stage == stage)
            .map(|a| a.pages)
            .sum()
    }

    /// Finds the assignment of a worker.
    pub fn assignment_for_worker(&self, worker_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.worker_id == worker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(worker_id: &str, stage: usize, pages: f64, rate: f64, speed: f64) -> Assignment {
        Assignment {
            worker_id: worker_id.into(),
            stage,
            pages,
            rate,
            quality: 0.9,
            speed,
        }
    }

    fn sample_plan() -> Plan {
        let assignments = vec![
            assignment("T1", 1, 60.0, 1.0, 2.0),
            assignment("T2", 1, 40.0, 2.0, 1.0),
            assignment("E1", 2, 100.0, 0.5, 10.0),
        ];
        let stage_subtotals = vec![
            StageSubtotal::from_assignments(1, assignments.iter().filter(|a| a.stage == 1), 100.0),
            StageSubtotal::from_assignments(2, assignments.iter().filter(|a| a.stage == 2), 100.0),
        ];
        Plan {
            shape: "C".into(),
            time_budget: 60.0,
            time: stage_subtotals.iter().map(|s| s.time).sum(),
            cost: assignments.iter().map(Assignment::cost).sum(),
            quality: 0.9,
            score: 1.0,
            stage_subtotals,
            assignments,
        }
    }

    #[test]
    fn test_assignment_time_and_cost() {
        let a = assignment("T1", 1, 30.0, 1.5, 2.0);
        assert!((a.time() - 15.0).abs() < 1e-12);
        assert!((a.cost() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn test_stage_subtotal() {
        let plan = sample_plan();
        let s1 = &plan.stage_subtotals[0];
        assert_eq!(s1.stage, 1);
        assert_eq!(s1.worker_count, 2);
        // T1: 60/2 = 30h, T2: 40/1 = 40h → stage time 40h
        assert!((s1.time - 40.0).abs() < 1e-12);
        // (60*1 + 40*2) / 100 = 1.4
        assert!((s1.cost_per_page - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_plan_queries() {
        let plan = sample_plan();
        assert_eq!(plan.stage_count(), 2);
        assert!((plan.time - 50.0).abs() < 1e-12); // 40 + 10
        assert!((plan.pages_for_stage(1) - 100.0).abs() < 1e-12);
        assert_eq!(plan.assignments_for_stage(2).len(), 1);
        assert_eq!(plan.assignment_for_worker("E1").unwrap().stage, 2);
        assert!(plan.assignment_for_worker("X").is_none());
    }

    #[test]
    fn test_plan_serde_roundtrip() {
        let plan = sample_plan();
        let json = serde_json::to_string(&plan).unwrap();
        let back: Plan = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shape, plan.shape);
        assert_eq!(back.assignments.len(), 3);
        assert_eq!(back.assignments[2].worker_id, "E1");
        assert!((back.cost - plan.cost).abs() < 1e-9);
        assert!((back.stage_subtotals[0].cost_per_page - 1.4).abs() < 1e-9);
    }
}
