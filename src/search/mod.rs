//! Plan search and ranking.
//!
//! Enumerates (time budget, pipeline shape) candidates for a job, asks a
//! [`ScheduleQuery`](crate::models::ScheduleQuery) which workers are free
//! in each stage window, solves a work distribution per candidate, and
//! ranks the feasible results.
//!
//! # Components
//!
//! - [`PipelineShape`] / [`ShapeCatalog`]: stage sequences and time splits
//! - [`PlanScorer`]: ranking function; [`LinearUtility`] by default
//! - [`SearchConfig`]: tolerance, per-budget collapse, parallelism
//! - [`PlanSearch`]: the engine
//!
//! # Determinism
//! Given the same inputs the output is identical, with or without
//! parallel evaluation. Ties in score keep evaluation order: budgets in
//! ascending order, then catalog order.

mod budget;
mod config;
mod engine;
mod scoring;
mod shape;

pub use budget::{budget_stages, derived_time_budgets, expected_throughput};
pub use config::SearchConfig;
pub use engine::{PlanSearch, PlanSuggestions};
pub use scoring::{LinearUtility, PlanOutcome, PlanScorer};
pub use shape::{PipelineShape, ShapeCatalog};
