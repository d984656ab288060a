//! Work distribution.
//!
//! Splits a job's pages among eligible workers of one or more stages by
//! linear programming, then audits the answer against the job's targets.
//!
//! # Formulation
//!
//! One decision variable per worker (pages assigned). The objective is the
//! job's linear utility: quality is worth `delta_cost / delta_quality` per
//! unit of cost. Rows bound each worker's load by capacity, the total cost
//! by the budget, the average quality from below, and force every stage to
//! process exactly the job's pages (as an upper and a lower row).
//!
//! # Verdicts
//!
//! - [`DistributionOutcome::Feasible`]: solved and passed the audit
//! - [`DistributionOutcome::Infeasible`]: no allocation, or an optimum the
//!   audit flagged; the [`InfeasibilityReport`] says which
//! - [`DistributionOutcome::Unbounded`]: a modeling defect, with the
//!   offending instance attached
//!
//! # Reference
//! Dantzig (1963), "Linear Programming and Extensions", Ch. 3 (blending
//! and allocation models)

mod audit;
mod problem;

pub use audit::{Audit, InfeasibilityReport};
pub use problem::{Distribution, DistributionOutcome, DistributionProblem, RowGroup};
