//! Time window model.
//!
//! # Time Model
//! All times are in hours relative to a planning epoch (t=0). The
//! consumer defines what t=0 means (market open, project intake).
//! Windows are half-open: `[start, end)`.

use serde::{Deserialize, Serialize};

/// A time interval `[start, end)` in hours.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeWindow {
    /// Interval start (hours, inclusive).
    pub start: f64,
    /// Interval end (hours, exclusive).
    pub end: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Creates a window of `duration` hours beginning at `start`.
    pub fn starting_at(start: f64, duration: f64) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Duration of this window (hours).
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(1.0, 3.0);
        assert!((w.duration() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_starting_at() {
        let w = TimeWindow::starting_at(8.0, 4.0);
        assert_eq!(w, TimeWindow::new(8.0, 12.0));
    }
}
