//! LP instance and named-block builder.
//!
//! The solver's variable space is two blocks: the decision block
//! `0..n_vars` and the slack block `n_vars..n_vars + n_rows`, with one
//! slack per row in row order. [`RowLayout`] remembers which rows belong
//! to which constraint group so slack lookups never hand-compute offsets.

use std::fmt::Debug;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validation::{ValidationError, ValidationErrorKind};

/// One constraint row: `coefficients · x ≤ bound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpRow {
    /// Coefficient per decision variable.
    pub coefficients: Vec<f64>,
    /// Right-hand side.
    pub bound: f64,
}

impl LpRow {
    /// Creates a dense row.
    pub fn new(coefficients: Vec<f64>, bound: f64) -> Self {
        Self {
            coefficients,
            bound,
        }
    }

    /// Creates a row of `n_vars` zeros with the listed `(index, value)`
    /// entries filled in.
    ///
    /// # Panics
    ///
    /// Panics if an entry index is not below `n_vars`.
    pub fn sparse(n_vars: usize, entries: impl IntoIterator<Item = (usize, f64)>, bound: f64) -> Self {
        let mut coefficients = vec![0.0; n_vars];
        for (i, v) in entries {
            coefficients[i] = v;
        }
        Self {
            coefficients,
            bound,
        }
    }

    /// The same constraint with both sides negated (`≥` expressed as `≤`).
    pub fn negated(&self) -> Self {
        Self {
            coefficients: self.coefficients.iter().map(|c| -c).collect(),
            bound: -self.bound,
        }
    }

    /// Left-hand side evaluated at `x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.coefficients.iter().zip(x).map(|(a, v)| a * v).sum()
    }
}

/// A linear program in canonical form:
/// maximize `objective · x` subject to every row and `x ≥ 0`.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LpInstance {
    objective: Vec<f64>,
    rows: Vec<LpRow>,
}

impl LpInstance {
    /// Creates an instance, rejecting mismatched lengths and non-finite
    /// values.
    pub fn new(objective: Vec<f64>, rows: Vec<LpRow>) -> Result<Self> {
        let mut errors = Vec::new();

        if objective.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::Empty,
                "objective has no variables",
            ));
        }
        if objective.iter().any(|c| !c.is_finite()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonFinite,
                "objective contains a non-finite coefficient",
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.coefficients.len() != objective.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::LengthMismatch,
                    format!(
                        "row {i} has {} coefficients, objective has {}",
                        row.coefficients.len(),
                        objective.len()
                    ),
                ));
            }
            if !row.bound.is_finite() || row.coefficients.iter().any(|c| !c.is_finite()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonFinite,
                    format!("row {i} contains a non-finite value"),
                ));
            }
        }

        if errors.is_empty() {
            Ok(Self { objective, rows })
        } else {
            Err(errors.into())
        }
    }

    /// Objective coefficients.
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Constraint rows.
    pub fn rows(&self) -> &[LpRow] {
        &self.rows
    }

    /// Number of decision variables.
    #[inline]
    pub fn n_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraint rows (and slack variables).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Objective value at `x`.
    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, v)| c * v).sum()
    }
}

/// Row ranges of each constraint group, in insertion order.
#[derive(Debug, Clone)]
pub struct RowLayout<K> {
    groups: Vec<(K, Range<usize>)>,
}

impl<K: PartialEq> RowLayout<K> {
    /// Rows belonging to `group`.
    pub fn rows(&self, group: &K) -> Option<Range<usize>> {
        self.groups
            .iter()
            .find(|(k, _)| k == group)
            .map(|(_, r)| r.clone())
    }
}

/// Assembles an [`LpInstance`] from named constraint groups.
///
/// Groups are appended in call order; each group's rows are contiguous.
/// Adding rows to a key that already exists opens a second range with the
/// same key; [`RowLayout::rows`] returns the first.
#[derive(Debug, Clone)]
pub struct LpBuilder<K> {
    objective: Vec<f64>,
    rows: Vec<LpRow>,
    groups: Vec<(K, Range<usize>)>,
}

impl<K: PartialEq + Debug> LpBuilder<K> {
    /// Creates a builder over `n_vars` decision variables with a zero
    /// objective.
    pub fn new(n_vars: usize) -> Self {
        Self {
            objective: vec![0.0; n_vars],
            rows: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Sets the objective coefficients.
    pub fn with_objective(mut self, objective: Vec<f64>) -> Self {
        self.objective = objective;
        self
    }

    /// Appends a group of rows.
    pub fn with_group(mut self, key: K, rows: impl IntoIterator<Item = LpRow>) -> Self {
        self.add_group(key, rows);
        self
    }

    /// Appends a group of rows in place.
    pub fn add_group(&mut self, key: K, rows: impl IntoIterator<Item = LpRow>) {
        let start = self.rows.len();
        self.rows.extend(rows);
        self.groups.push((key, start..self.rows.len()));
    }

    /// Builds the instance and its layout.
    pub fn build(self) -> Result<(LpInstance, RowLayout<K>)> {
        let instance = LpInstance::new(self.objective, self.rows)?;
        let layout = RowLayout {
            groups: self.groups,
        };
        Ok((instance, layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Group {
        Caps,
        Budget,
        Missing,
    }

    #[test]
    fn test_sparse_and_negated_rows() {
        let row = LpRow::sparse(4, [(1, 2.0), (3, -1.0)], 5.0);
        assert_eq!(row.coefficients, vec![0.0, 2.0, 0.0, -1.0]);

        let neg = row.negated();
        assert_eq!(neg.coefficients, vec![-0.0, -2.0, -0.0, 1.0]);
        assert_eq!(neg.bound, -5.0);
        assert!((row.evaluate(&[9.0, 1.0, 9.0, 1.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_sparse_index_out_of_range_panics() {
        LpRow::sparse(2, [(2, 1.0)], 1.0);
    }

    #[test]
    fn test_builder_layout() {
        let (instance, layout) = LpBuilder::new(2)
            .with_objective(vec![1.0, 1.0])
            .with_group(
                Group::Caps,
                vec![LpRow::sparse(2, [(0, 1.0)], 3.0), LpRow::sparse(2, [(1, 1.0)], 4.0)],
            )
            .with_group(Group::Budget, vec![LpRow::new(vec![2.0, 1.0], 9.0)])
            .build()
            .unwrap();

        assert_eq!(instance.n_vars(), 2);
        assert_eq!(instance.n_rows(), 3);
        assert_eq!(layout.rows(&Group::Caps), Some(0..2));
        assert_eq!(layout.rows(&Group::Budget), Some(2..3));
        assert_eq!(layout.rows(&Group::Missing), None);
    }

    #[test]
    fn test_empty_group_has_empty_range() {
        let (_, layout) = LpBuilder::new(1)
            .with_objective(vec![1.0])
            .with_group(Group::Caps, Vec::new())
            .build()
            .unwrap();
        assert_eq!(layout.rows(&Group::Caps), Some(0..0));
    }

    #[test]
    fn test_instance_rejects_length_mismatch() {
        let err = LpInstance::new(vec![1.0, 2.0], vec![LpRow::new(vec![1.0], 1.0)]).unwrap_err();
        match err {
            PlanError::Invalid(errors) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::LengthMismatch));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_instance_rejects_non_finite_and_empty() {
        assert!(LpInstance::new(vec![], vec![]).is_err());
        assert!(LpInstance::new(vec![f64::NAN], vec![]).is_err());
        assert!(LpInstance::new(vec![1.0], vec![LpRow::new(vec![1.0], f64::INFINITY)]).is_err());
    }

    #[test]
    fn test_instance_serializes() {
        let instance = LpInstance::new(vec![1.0], vec![LpRow::new(vec![2.0], 3.0)]).unwrap();
        let json = serde_json::to_string(&instance).unwrap();
        assert!(json.contains("\"objective\":[1.0]"));
        assert!(json.contains("\"bound\":3.0"));
    }
}
