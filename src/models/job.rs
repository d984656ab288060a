//! Job model.
//!
//! A job is a fixed amount of work (pages) with economic constraints:
//! a budget ceiling, a quality floor, an optional deadline, and the
//! decision-maker's cost/quality exchange rate.

use serde::{Deserialize, Serialize};

/// A job to be planned.
///
/// # Trade-off
/// `delta_cost` and `delta_quality` are indifference deltas: raising the
/// job's cost by `delta_cost` while raising its quality by `delta_quality`
/// leaves the decision-maker's linear utility unchanged. A zero
/// `delta_cost` means quality has no value beyond the floor; a zero
/// `delta_quality` means cost is irrelevant below the budget.
///
/// # Time Representation
/// `max_time` is in hours, relative to the moment planning starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job identifier.
    pub id: String,
    /// Total work (pages). Every stage of a plan processes all of it.
    pub total_pages: f64,
    /// Deadline in hours from now. `None` = planner proposes budgets.
    pub max_time: Option<f64>,
    /// Minimum average quality (0.0 to 1.0).
    pub min_quality: f64,
    /// Budget ceiling (currency).
    pub max_cost: f64,
    /// Cost increase offsetting a `delta_quality` quality increase.
    pub delta_cost: f64,
    /// Quality increase offsetting a `delta_cost` cost increase.
    pub delta_quality: f64,
}

impl Job {
    /// Creates a job with no deadline, no budget, and no quality floor.
    pub fn new(id: impl Into<String>, total_pages: f64) -> Self {
        Self {
            id: id.into(),
            total_pages,
            max_time: None,
            min_quality: 0.0,
            max_cost: 0.0,
            delta_cost: 0.0,
            delta_quality: 0.0,
        }
    }

    /// Sets the deadline (hours from now).
    pub fn with_deadline(mut self, hours: f64) -> Self {
        self.max_time = Some(hours);
        self
    }

    /// Sets the quality floor.
    pub fn with_min_quality(mut self, min_quality: f64) -> Self {
        self.min_quality = min_quality;
        self
    }

    /// Sets the budget ceiling.
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

    /// Linear utility of a realized outcome:
    /// `delta_cost * quality * total_pages - delta_quality * cost`.
    ///
    /// This is the quantity the work distribution maximizes, expressed on
    /// the realized average quality and total cost.
    pub fn utility(&self, quality: f64, cost: f64) -> f64 {
        self.delta_cost * quality * self.total_pages - self.delta_quality * cost
    }
}
