//! Worker models.
//!
//! A [`WorkerProfile`] is the long-lived description of a worker kept by
//! the surrounding market: stage, quality, speed, and a pay-rate history
//! that an external policy appends to over time. A [`WorkerCandidate`] is
//! the per-solve snapshot the formulator consumes, with the rate frozen
//! and the free time inside one stage window attached.

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationError, ValidationErrorKind};

/// One entry of a worker's pay-rate history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Hour from which the rate applies.
    pub hour: f64,
    /// Rate (currency per page).
    pub rate: f64,
}

/// Append-only, time-keyed pay-rate history.
///
/// Snapshots are kept in non-decreasing hour order. The planner reads only
/// [`latest`](Self::latest). Deserialization rejects an empty or unordered
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateHistory")]
pub struct RateHistory {
    snapshots: Vec<RateSnapshot>,
}

#[derive(Deserialize)]
struct RawRateHistory {
    snapshots: Vec<RateSnapshot>,
}

impl TryFrom<RawRateHistory> for RateHistory {
    type Error = ValidationError;

    fn try_from(raw: RawRateHistory) -> Result<Self, Self::Error> {
        let mut snapshots = raw.snapshots.into_iter();
        let first = snapshots.next().ok_or_else(|| {
            ValidationError::new(ValidationErrorKind::Empty, "rate history has no snapshots")
        })?;
        if !first.hour.is_finite() {
            return Err(ValidationError::new(
                ValidationErrorKind::NonFinite,
                format!("rate snapshot hour is not finite ({})", first.hour),
            ));
        }

        let mut history = Self {
            snapshots: vec![first],
        };
        for s in snapshots {
            history.push(s.hour, s.rate)?;
        }
        Ok(history)
    }
}

impl RateHistory {
    /// Creates a history with `rate` applying from hour 0.
    pub fn new(rate: f64) -> Self {
        Self {
            snapshots: vec![RateSnapshot { hour: 0.0, rate }],
        }
    }

    /// Appends a snapshot.
    ///
    /// Fails when `hour` precedes the latest snapshot; history is never
    /// rewritten.
    pub fn push(&mut self, hour: f64, rate: f64) -> Result<(), ValidationError> {
        let last = self.latest();
        if !hour.is_finite() || hour < last.hour {
            return Err(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!(
                    "rate snapshot at hour {hour} precedes latest snapshot at hour {}",
                    last.hour
                ),
            ));
        }
        self.snapshots.push(RateSnapshot { hour, rate });
        Ok(())
    }

    /// Most recent snapshot.
    pub fn latest(&self) -> RateSnapshot {
        // Constructed non-empty and append-only.
        self.snapshots[self.snapshots.len() - 1]
    }

    /// Rate in force at `hour` (the last snapshot at or before it).
    ///
    /// Returns the earliest rate for hours before the first snapshot.
    pub fn rate_at(&self, hour: f64) -> f64 {
        self.snapshots
            .iter()
            .rev()
            .find(|s| s.hour <= hour)
            .unwrap_or(&self.snapshots[0])
            .rate
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> &[RateSnapshot] {
        &self.snapshots
    }
}

/// A worker known to the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerProfile {
    /// Unique worker identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Production stage this worker serves.
    pub stage: usize,
    /// Work quality (0.0 to 1.0).
    pub quality: f64,
    /// Throughput (pages per hour).
    pub pages_per_hour: f64,
    /// Pay-rate history, appended by an external policy.
    pub rate_history: RateHistory,
}

impl WorkerProfile {
    /// Creates a worker with quality 0 and a speed of one page per hour.
    pub fn new(id: impl Into<String>, stage: usize, rate: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            stage,
            quality: 0.0,
            pages_per_hour: 1.0,
            rate_history: RateHistory::new(rate),
        }
    }

    /// Sets the worker name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the work quality.
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the throughput (pages per hour).
    pub fn with_speed(mut self, pages_per_hour: f64) -> Self {
        self.pages_per_hour = pages_per_hour;
        self
    }

    /// Current pay rate (latest snapshot).
    #[inline]
    pub fn current_rate(&self) -> f64 {
        self.rate_history.latest().rate
    }

    /// Snapshot for a solve, with `available_time` hours free in the window.
    pub fn candidate(&self, stage: usize, available_time: f64) -> WorkerCandidate {
        WorkerCandidate {
            worker_id: self.id.clone(),
            stage,
            rate: self.current_rate(),
            quality: self.quality,
            speed: self.pages_per_hour,
            available_time,
        }
    }
}

/// A worker as seen by one work distribution solve.
///
/// `stage` is the position inside the solved pipeline (0-based and
/// contiguous), not necessarily the worker's catalog stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerCandidate {
    /// Source worker ID.
    pub worker_id: String,
    /// Stage position within the solve.
    pub stage: usize,
    /// Rate (currency per page).
    pub rate: f64,
    /// Quality contributed per page (0.0 to 1.0).
    pub quality: f64,
    /// Throughput (pages per hour).
    pub speed: f64,
    /// Free hours inside the evaluated window.
    pub available_time: f64,
}

impl WorkerCandidate {
    /// Creates a candidate with zero rate, zero quality, unit speed, and no
    /// available time.
    pub fn new(worker_id: impl Into<String>, stage: usize) -> Self {
        Self {
            worker_id: worker_id.into(),
            stage,
            rate: 0.0,
            quality: 0.0,
            speed: 1.0,
            available_time: 0.0,
        }
    }

    /// Sets the rate.
    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    /// Sets the quality.
    pub fn with_quality(mut self, quality: f64) -> Self {
        self.quality = quality;
        self
    }

    /// Sets the speed.
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Sets the available time.
    pub fn with_available_time(mut self, hours: f64) -> Self {
        self.available_time = hours;
        self
    }

    /// Pages this worker can finish in the window.
    #[inline]
    pub fn capacity(&self) -> f64 {
        self.available_time * self.speed
    }
}
