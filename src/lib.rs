//! Piecework allocation across staged worker pools.
//!
//! Splits a job of fixed size (pages) across workers arranged in
//! production stages, trading cost against quality under a budget, a
//! quality floor, and worker availability, and proposes ranked
//! alternative plans across pipeline shapes and time budgets.
//!
//! # Modules
//!
//! - **`lp`**: Dense tableau simplex, `LpInstance`, named row groups
//! - **`distribution`**: Work distribution LP formulation, solve, audit
//! - **`search`**: Pipeline shapes, time budgets, plan ranking
//! - **`models`**: Domain types: `Job`, `WorkerProfile`, `WorkerCandidate`,
//!   `TimeWindow`, `Plan`, `Assignment`, `StageSubtotal`
//! - **`validation`**: Input integrity checks (ranges, stage contiguity,
//!   duplicate IDs, shape catalogs)
//!
//! # Architecture
//!
//! Leaves first: the solver knows nothing of workers; the formulator knows
//! nothing of shapes or schedules; the search owns no worker state and
//! reads availability through [`models::ScheduleQuery`]. Booking a chosen
//! plan is the caller's job.
//!
//! # References
//!
//! - Dantzig (1963), "Linear Programming and Extensions"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 29
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod distribution;
pub mod error;
pub mod lp;
pub mod models;
pub mod search;
pub mod validation;

pub use error::{PlanError, Result};
