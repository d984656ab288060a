//! Crate error type.
//!
//! Infeasibility is not an error: it is an expected outcome reported
//! through [`DistributionOutcome`](crate::distribution::DistributionOutcome).
//! Errors here are the failures a caller must not silently skip.

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised by the solver, the formulator, and the plan search.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Input rejected before any solve. Carries every detected issue.
    #[error("invalid input ({} issue(s)): {}", .0.len(), join_messages(.0))]
    Invalid(Vec<ValidationError>),

    /// The linear program was unbounded.
    ///
    /// Every decision variable is capped by a finite capacity row, so this
    /// is a modeling defect. `instance` holds the offending LP as JSON.
    #[error("unbounded work distribution (contract violation), instance: {instance}")]
    Unbounded { instance: String },

    /// The simplex loop hit the configured pivot limit.
    #[error("simplex exceeded the pivot limit of {limit}")]
    PivotLimitExceeded { limit: usize },
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, PlanError>;

impl From<Vec<ValidationError>> for PlanError {
    fn from(errors: Vec<ValidationError>) -> Self {
        PlanError::Invalid(errors)
    }
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
