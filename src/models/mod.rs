//! Allocation domain models.
//!
//! Provides the data types shared by the solver, the formulator, and the
//! plan search: the job being planned, the workers it may be split across,
//! the time windows stages run in, and the resulting plans.
//!
//! # Domain Mappings
//!
//! | u-allocate | Translation bureau | Manufacturing | Data labeling |
//! |------------|--------------------|---------------|---------------|
//! | Job | Order (pages) | Batch (units) | Dataset (items) |
//! | Stage | Translate / Edit / Proofread | Machine step | Label / Review |
//! | WorkerProfile | Freelancer | Work cell | Annotator |
//! | Plan | Staffing proposal | Routing plan | Labeling plan |

mod availability;
mod job;
mod plan;
mod window;
mod worker;

pub use availability::{AlwaysAvailable, FreeFrom, ScheduleQuery};
pub use job::Job;
pub use plan::{Assignment, Plan, StageSubtotal};
pub use window::TimeWindow;
pub use worker::{RateHistory, RateSnapshot, WorkerCandidate, WorkerProfile};
