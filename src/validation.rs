//! Input validation for allocation problems.
//!
//! Checks structural integrity of jobs, worker candidates, worker pools,
//! and shape catalogs before any solve. Detects:
//! - Non-finite or negative economics (rate, speed, available time)
//! - Qualities outside [0, 1]
//! - Stage indices that do not form a contiguous 0-based run
//! - Pool members tagged with a stage other than their pool's
//! - Duplicate worker IDs
//! - Malformed pipeline shapes
//!
//! Nothing is clamped or coerced: every issue is collected and the whole
//! list is returned, so a caller sees all problems at once.

use std::collections::HashSet;

use thiserror::Error;

use crate::distribution::DistributionProblem;
use crate::models::{Job, WorkerCandidate, WorkerProfile};
use crate::search::ShapeCatalog;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind:?}: {message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two arrays that must align have different lengths.
    LengthMismatch,
    /// A value that must be non-negative (or positive) is not.
    NegativeValue,
    /// A value lies outside its permitted range.
    OutOfRange,
    /// NaN or infinite value.
    NonFinite,
    /// Stage indices are not `0..k` without gaps.
    NonContiguousStages,
    /// A worker sits in a pool for a different stage.
    StageMismatch,
    /// Two workers share the same ID.
    DuplicateId,
    /// A required collection is empty.
    Empty,
    /// A pipeline shape is malformed.
    InvalidShape,
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_finite(errors: &mut Vec<ValidationError>, what: &str, value: f64) -> bool {
    if value.is_finite() {
        true
    } else {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonFinite,
            format!("{what} is not finite ({value})"),
        ));
        false
    }
}

fn check_non_negative(errors: &mut Vec<ValidationError>, what: &str, value: f64) {
    if check_finite(errors, what, value) && value < 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("{what} must be non-negative, got {value}"),
        ));
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, what: &str, value: f64) {
    if check_finite(errors, what, value) && value <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NegativeValue,
            format!("{what} must be positive, got {value}"),
        ));
    }
}

fn check_unit(errors: &mut Vec<ValidationError>, what: &str, value: f64) {
    if check_finite(errors, what, value) && !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::new(
            ValidationErrorKind::OutOfRange,
            format!("{what} must lie in [0, 1], got {value}"),
        ));
    }
}

/// Validates job parameters.
///
/// Checks:
/// 1. `total_pages > 0`
/// 2. `max_time`, when set, is positive
/// 3. `min_quality` in [0, 1]
/// 4. `max_cost`, `delta_cost`, `delta_quality` non-negative
pub fn validate_job(job: &Job) -> ValidationResult {
    let mut errors = Vec::new();
    let id = &job.id;

    check_positive(&mut errors, &format!("job '{id}' total pages"), job.total_pages);
    if let Some(max_time) = job.max_time {
        check_positive(&mut errors, &format!("job '{id}' max time"), max_time);
    }
    check_unit(&mut errors, &format!("job '{id}' min quality"), job.min_quality);
    check_non_negative(&mut errors, &format!("job '{id}' max cost"), job.max_cost);
    check_non_negative(&mut errors, &format!("job '{id}' delta cost"), job.delta_cost);
    check_non_negative(
        &mut errors,
        &format!("job '{id}' delta quality"),
        job.delta_quality,
    );

    finish(errors)
}

/// Validates the flat candidate list handed to the formulator.
///
/// Checks:
/// 1. At least one candidate
/// 2. Rate and available time non-negative, speed positive
/// 3. Quality in [0, 1]
/// 4. Stage indices form the contiguous run `0..=max_stage`
pub fn validate_candidates(candidates: &[WorkerCandidate]) -> ValidationResult {
    let mut errors = Vec::new();

    if candidates.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::Empty,
            "no worker candidates",
        ));
        return finish(errors);
    }

    for (i, c) in candidates.iter().enumerate() {
        let label = format!("candidate #{i} ('{}')", c.worker_id);
        check_non_negative(&mut errors, &format!("{label} rate"), c.rate);
        check_unit(&mut errors, &format!("{label} quality"), c.quality);
        check_positive(&mut errors, &format!("{label} speed"), c.speed);
        check_non_negative(
            &mut errors,
            &format!("{label} available time"),
            c.available_time,
        );
    }

    let present: HashSet<usize> = candidates.iter().map(|c| c.stage).collect();
    let max_stage = candidates.iter().map(|c| c.stage).max().unwrap_or(0);
    let missing: Vec<usize> = (0..=max_stage).filter(|s| !present.contains(s)).collect();
    if !missing.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NonContiguousStages,
            format!("stage indices must run 0..={max_stage} without gaps; missing {missing:?}"),
        ));
    }

    finish(errors)
}

/// Validates a work distribution problem.
///
/// Checks the targets the way [`validate_job`] does, a positive
/// tolerance, and then every candidate via [`validate_candidates`].
pub fn validate_problem(problem: &DistributionProblem) -> ValidationResult {
    let mut errors = Vec::new();

    check_positive(&mut errors, "total work", problem.total_work);
    check_unit(&mut errors, "min quality", problem.min_quality);
    check_non_negative(&mut errors, "max cost", problem.max_cost);
    check_non_negative(&mut errors, "delta cost", problem.delta_cost);
    check_non_negative(&mut errors, "delta quality", problem.delta_quality);
    check_positive(&mut errors, "tolerance", problem.tolerance);

    if let Err(candidate_errors) = validate_candidates(&problem.workers) {
        errors.extend(candidate_errors);
    }

    finish(errors)
}

/// Validates per-stage worker pools.
///
/// Checks:
/// 1. Every profile's stage equals the index of its pool
/// 2. No duplicate worker IDs across pools
/// 3. Current rate non-negative, quality in [0, 1], speed positive
pub fn validate_pools(pools: &[Vec<WorkerProfile>]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (stage, pool) in pools.iter().enumerate() {
        for w in pool {
            if w.stage != stage {
                errors.push(ValidationError::new(
                    ValidationErrorKind::StageMismatch,
                    format!(
                        "worker '{}' is tagged stage {} but listed in pool {stage}",
                        w.id, w.stage
                    ),
                ));
            }
            if !ids.insert(w.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate worker ID: {}", w.id),
                ));
            }
            let label = format!("worker '{}'", w.id);
            check_non_negative(&mut errors, &format!("{label} rate"), w.current_rate());
            check_unit(&mut errors, &format!("{label} quality"), w.quality);
            check_positive(&mut errors, &format!("{label} speed"), w.pages_per_hour);
        }
    }

    finish(errors)
}

/// Validates a pipeline shape catalog.
///
/// Checks:
/// 1. At least one shape, and non-empty fastest/slowest sequences
/// 2. Each shape has stages, one positive proportion per stage,
///    and proportions summing to 1
pub fn validate_catalog(catalog: &ShapeCatalog) -> ValidationResult {
    let mut errors = Vec::new();

    if catalog.shapes.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::Empty,
            "shape catalog has no shapes",
        ));
    }
    if catalog.fastest.is_empty() || catalog.slowest.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::Empty,
            "shape catalog needs non-empty fastest and slowest sequences",
        ));
    }

    for shape in &catalog.shapes {
        if shape.stages.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShape,
                format!("shape '{}' has no stages", shape.name),
            ));
            continue;
        }
        if shape.stages.len() != shape.proportions.len() {
            errors.push(ValidationError::new(
                ValidationErrorKind::LengthMismatch,
                format!(
                    "shape '{}' has {} stages but {} proportions",
                    shape.name,
                    shape.stages.len(),
                    shape.proportions.len()
                ),
            ));
            continue;
        }
        for &p in &shape.proportions {
            check_positive(&mut errors, &format!("shape '{}' proportion", shape.name), p);
        }
        let sum: f64 = shape.proportions.iter().sum();
        if (sum - 1.0).abs() > 1e-9 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidShape,
                format!("shape '{}' proportions sum to {sum}, expected 1", shape.name),
            ));
        }
    }

    finish(errors)
}
