//! Worker availability queries.
//!
//! The planner never owns worker schedules. It asks a [`ScheduleQuery`]
//! how many hours a worker has free inside a stage window and treats
//! the answer as read-only. Booking the chosen plan happens outside.

use std::collections::HashMap;

use super::TimeWindow;

/// Read-only view of worker schedules.
///
/// Implementations must be pure: the same arguments return the same value
/// for the duration of a plan search. Values of zero or less mean the
/// worker cannot take work in the window.
pub trait ScheduleQuery: Send + Sync {
    /// Hours the worker can spend on new work inside `window`.
    fn available_time(&self, worker_id: &str, window: &TimeWindow) -> f64;
}

impl<F> ScheduleQuery for F
where
    F: Fn(&str, &TimeWindow) -> f64 + Send + Sync,
{
    fn available_time(&self, worker_id: &str, window: &TimeWindow) -> f64 {
        self(worker_id, window)
    }
}

/// Every worker is free for the whole window.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAvailable;

impl ScheduleQuery for AlwaysAvailable {
    fn available_time(&self, _worker_id: &str, window: &TimeWindow) -> f64 {
        window.duration()
    }
}

/// Each worker is booked back to back until a given hour, then free.
///
/// Available time is `window.end - max(free_from, window.start)`, which is
/// negative when the worker is busy past the end of the window. Unknown
/// workers are free for the whole window.
#[derive(Debug, Clone, Default)]
pub struct FreeFrom {
    free_from: HashMap<String, f64>,
}

impl FreeFrom {
    /// Creates an empty ledger view (everyone free).
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a worker as busy until `hour`.
    pub fn with_worker(mut self, worker_id: impl Into<String>, hour: f64) -> Self {
        self.free_from.insert(worker_id.into(), hour);
        self
    }

    /// Hour from which the worker is free, if recorded.
    pub fn free_from(&self, worker_id: &str) -> Option<f64> {
        self.free_from.get(worker_id).copied()
    }
}

impl ScheduleQuery for FreeFrom {
    fn available_time(&self, worker_id: &str, window: &TimeWindow) -> f64 {
        let free = self
            .free_from(worker_id)
            .map_or(window.start, |h| h.max(window.start));
        window.end - free
    }
}
