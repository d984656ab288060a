//! Time-budget candidates.
//!
//! With a deadline, the deadline is the only budget. Without one, three
//! budgets bracket plausible turnaround times:
//!
//! - **upper**: every page passes through the slowest sequence one stage
//!   at a time, `P · Σ_{s ∈ slowest} 1 / pph_s`
//! - **lower**: the fastest sequence with work spread over roughly
//!   `2 · ln P` parallel workers, `0.5 · P / max(ln P, 1) · Σ_{s ∈ fastest} 1 / pph_s`
//! - **mid**: their average
//!
//! Budgets are evaluated in the order lower, mid, upper.

use crate::models::WorkerProfile;
use crate::validation::{ValidationError, ValidationErrorKind};

use super::ShapeCatalog;

/// Expected pages per hour of every stage, indexed by catalog stage.
///
/// Uses `supplied` when given, otherwise the mean speed of each stage's
/// pool (0 for an empty pool). Every stage in `needed` must end up with a
/// positive, finite throughput.
pub fn expected_throughput(
    pools: &[Vec<WorkerProfile>],
    supplied: Option<&[f64]>,
    needed: &[usize],
) -> Result<Vec<f64>, Vec<ValidationError>> {
    let throughput: Vec<f64> = match supplied {
        Some(values) => values.to_vec(),
        None => pools
            .iter()
            .map(|pool| {
                if pool.is_empty() {
                    0.0
                } else {
                    pool.iter().map(|w| w.pages_per_hour).sum::<f64>() / pool.len() as f64
                }
            })
            .collect(),
    };

    let errors: Vec<ValidationError> = needed
        .iter()
        .filter_map(|&stage| match throughput.get(stage) {
            Some(&v) if v.is_finite() && v > 0.0 => None,
            Some(&v) => Some(ValidationError::new(
                ValidationErrorKind::OutOfRange,
                format!("expected pages per hour of stage {stage} must be positive, got {v}"),
            )),
            None => Some(ValidationError::new(
                ValidationErrorKind::LengthMismatch,
                format!("no expected pages per hour for stage {stage}"),
            )),
        })
        .collect();

    if errors.is_empty() {
        Ok(throughput)
    } else {
        Err(errors)
    }
}

/// Stages whose throughput the derived budgets read.
pub fn budget_stages(catalog: &ShapeCatalog) -> Vec<usize> {
    let mut stages: Vec<usize> = catalog
        .fastest
        .iter()
        .chain(&catalog.slowest)
        .copied()
        .collect();
    stages.sort_unstable();
    stages.dedup();
    stages
}

/// Budgets without a deadline: `[lower, mid, upper]`.
///
/// `throughput` must cover the catalog's fastest and slowest sequences
/// (see [`expected_throughput`]).
///
/// # Panics
///
/// Panics if a stage in `catalog.fastest` or `catalog.slowest` is out of
/// bounds for `throughput`. Vectors returned by [`expected_throughput`]
/// for the same catalog always cover them.
pub fn derived_time_budgets(total_pages: f64, catalog: &ShapeCatalog, throughput: &[f64]) -> Vec<f64> {
    let hours_per_page = |stages: &[usize]| -> f64 {
        stages.iter().map(|&s| 1.0 / throughput[s]).sum()
    };

    let upper = total_pages * hours_per_page(&catalog.slowest);
    let lower = 0.5 * total_pages / total_pages.ln().max(1.0) * hours_per_page(&catalog.fastest);
    let mid = (lower + upper) / 2.0;

    vec![lower, mid, upper]
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Words per working day for single-pass, translate, edit, proofread at
    /// 250 words per page over an 8-hour day.
    const MARKET_PAGES_PER_HOUR: [f64; 4] = [2.0, 1.0, 2.0, 6.0];

    #[test]
    fn test_derived_budgets() {
        let catalog = ShapeCatalog::standard();
        let budgets = derived_time_budgets(100.0, &catalog, &MARKET_PAGES_PER_HOUR);

        let upper = 100.0 * (1.0 + 0.5 + 1.0 / 6.0);
        let lower = 50.0 / 100f64.ln();
        assert_eq!(budgets.len(), 3);
        assert!((budgets[0] - lower).abs() < 1e-10);
        assert!((budgets[0] - 10.857).abs() < 1e-3);
        assert!((budgets[1] - (lower + upper) / 2.0).abs() < 1e-10);
        assert!((budgets[2] - 166.666_666).abs() < 1e-5);
    }

    #[test]
    fn test_small_jobs_do_not_blow_up_lower_budget() {
        // ln 2 < 1: the divisor is clamped to 1.
        let budgets = derived_time_budgets(2.0, &ShapeCatalog::standard(), &MARKET_PAGES_PER_HOUR);
        assert!((budgets[0] - 1.0).abs() < 1e-12);
        assert!(budgets[0] <= budgets[1] && budgets[1] <= budgets[2]);
    }

    #[test]
    #[should_panic]
    fn test_short_throughput_panics() {
        // The standard slowest sequence reads stage 3.
        derived_time_budgets(100.0, &ShapeCatalog::standard(), &[2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_throughput_from_pool_means() {
        let pools = vec![
            vec![],
            vec![
                WorkerProfile::new("T0", 1, 1.0).with_speed(1.0),
                WorkerProfile::new("T1", 1, 1.0).with_speed(3.0),
            ],
        ];
        let throughput = expected_throughput(&pools, None, &[1]).unwrap();
        assert_eq!(throughput, vec![0.0, 2.0]);
    }

    #[test]
    fn test_missing_throughput_rejected() {
        let pools = vec![vec![], vec![WorkerProfile::new("T0", 1, 1.0)]];
        let errors = expected_throughput(&pools, None, &[0, 1, 2]).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ValidationErrorKind::OutOfRange);
        assert_eq!(errors[1].kind, ValidationErrorKind::LengthMismatch);

        let supplied = [1.0, -2.0];
        let errors = expected_throughput(&pools, Some(&supplied), &[1]).unwrap_err();
        assert!(errors[0].message.contains("stage 1"));
    }

    #[test]
    fn test_budget_stages() {
        assert_eq!(budget_stages(&ShapeCatalog::standard()), vec![1, 2, 3]);
    }
}
