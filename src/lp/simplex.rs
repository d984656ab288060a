//! Dense tableau simplex.
//!
//! # Algorithm
//!
//! Each row `a_i·x ≤ b_i` gains a slack `s_i`, giving the tableau
//! `[A | I] [x; s] = b` over `n + m` variables with the slacks as the
//! starting basis. Each iteration:
//!
//! 1. **Entering**: the non-basic variable with the strictly largest
//!    positive reduced cost (lowest index wins ties). None positive:
//!    optimal.
//! 2. **Leaving**: among rows whose entering-column coefficient is strictly
//!    positive, the one minimizing `rhs_i / coefficient_i` (first row wins
//!    ties). No such row: unbounded.
//! 3. **Pivot**: Gauss-Jordan elimination of the entering column from every
//!    other row, the objective row, and the right-hand side.
//!
//! There is no anti-cycling rule. Degenerate instances can in principle
//! cycle; [`SimplexSolver::with_max_pivots`] turns a runaway solve into an
//! error instead of a hang.
//!
//! # Negative right-hand sides
//!
//! With every `b_i ≥ 0` the origin is a feasible basis and the loop above
//! runs directly. Otherwise an auxiliary phase adds one artificial
//! variable `x₀` to every row, maximizes `-x₀`, and reports
//! [`LpOutcome::Infeasible`] unless `x₀` reaches zero; the artificial
//! variable is then retired and the real objective restored.
//!
//! # Complexity
//! O(m · (n + m)) per pivot.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 29.3-29.5

use tracing::trace;

use super::instance::{LpInstance, RowLayout};
use crate::error::{PlanError, Result};

/// Result of a solve.
#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    /// An optimal basic solution.
    Optimal(LpSolution),
    /// The objective grows without limit; no solution vector.
    Unbounded,
    /// No point satisfies every row.
    Infeasible,
}

/// An optimal basic solution.
#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    /// Optimal objective value.
    pub value: f64,
    /// Decision values followed by slack values (`n + m` entries).
    pub vector: Vec<f64>,
    /// Number of decision variables.
    pub n_vars: usize,
    /// Pivots performed, both phases included.
    pub pivots: usize,
}

impl LpSolution {
    /// Value of decision variable `i`.
    #[inline]
    pub fn decision(&self, i: usize) -> f64 {
        self.vector[i]
    }

    /// Decision block.
    pub fn decisions(&self) -> &[f64] {
        &self.vector[..self.n_vars]
    }

    /// Slack of row `row`.
    #[inline]
    pub fn slack(&self, row: usize) -> f64 {
        self.vector[self.n_vars + row]
    }

    /// Slack values of a constraint group.
    pub fn slacks<K: PartialEq>(&self, layout: &RowLayout<K>, group: &K) -> Option<&[f64]> {
        let rows = layout.rows(group)?;
        Some(&self.vector[self.n_vars + rows.start..self.n_vars + rows.end])
    }
}

/// Dense simplex solver.
///
/// # Configuration
/// - `pivot_tolerance`: threshold for "strictly positive" reduced costs and
///   column coefficients (default 1e-9).
/// - `feasibility_tolerance`: largest artificial value still accepted as
///   feasible after the auxiliary phase (default 1e-7).
/// - `max_pivots`: optional cap on pivots (default: none).
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexSolver {
    pivot_tolerance: f64,
    feasibility_tolerance: f64,
    max_pivots: Option<usize>,
}

impl Default for SimplexSolver {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-9,
            feasibility_tolerance: 1e-7,
            max_pivots: None,
        }
    }
}

impl SimplexSolver {
    /// Creates a solver with default tolerances and no pivot limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pivot tolerance.
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Sets the feasibility tolerance of the auxiliary phase.
    pub fn with_feasibility_tolerance(mut self, tolerance: f64) -> Self {
        self.feasibility_tolerance = tolerance;
        self
    }

    /// Caps the number of pivots.
    pub fn with_max_pivots(mut self, limit: usize) -> Self {
        self.max_pivots = Some(limit);
        self
    }

    /// Maximizes the instance's objective.
    ///
    /// # Errors
    /// [`PlanError::PivotLimitExceeded`] when a pivot cap is set and reached.
    pub fn solve(&self, instance: &LpInstance) -> Result<LpOutcome> {
        let n = instance.n_vars();
        let m = instance.n_rows();
        let needs_phase_one = instance.rows().iter().any(|r| r.bound < 0.0);
        let mut tableau = Tableau::new(instance, needs_phase_one);

        if needs_phase_one && !self.find_feasible_basis(&mut tableau)? {
            trace!(pivots = tableau.pivots, "auxiliary phase found no feasible basis");
            return Ok(LpOutcome::Infeasible);
        }

        if !self.optimize(&mut tableau)? {
            trace!(pivots = tableau.pivots, "unbounded");
            return Ok(LpOutcome::Unbounded);
        }

        let mut vector = vec![0.0; n + m];
        for (r, &var) in tableau.basis.iter().enumerate() {
            if var < n + m {
                vector[var] = tableau.rhs[r];
            }
        }
        trace!(pivots = tableau.pivots, value = tableau.value, "optimal");

        Ok(LpOutcome::Optimal(LpSolution {
            value: tableau.value,
            vector,
            n_vars: n,
            pivots: tableau.pivots,
        }))
    }

    /// Runs the pivot loop on the tableau's current objective.
    ///
    /// Returns `false` when unbounded.
    fn optimize(&self, t: &mut Tableau) -> Result<bool> {
        loop {
            let Some(entering) = t.entering(self.pivot_tolerance) else {
                return Ok(true);
            };
            let Some(leaving) = t.leaving(entering, self.pivot_tolerance) else {
                return Ok(false);
            };
            self.pivot(t, entering, leaving)?;
        }
    }

    fn pivot(&self, t: &mut Tableau, entering: usize, row: usize) -> Result<()> {
        if let Some(limit) = self.max_pivots {
            if t.pivots >= limit {
                return Err(PlanError::PivotLimitExceeded { limit });
            }
        }
        t.pivot(entering, row);
        Ok(())
    }

    /// Auxiliary phase. Returns `false` when the rows admit no `x ≥ 0`.
    fn find_feasible_basis(&self, t: &mut Tableau) -> Result<bool> {
        let artificial = t.width - 1;

        // Most negative right-hand side; first row wins ties.
        let mut start_row = 0;
        for r in 1..t.rhs.len() {
            if t.rhs[r] < t.rhs[start_row] {
                start_row = r;
            }
        }
        self.pivot(t, artificial, start_row)?;

        // The auxiliary objective is bounded above by 0.
        self.optimize(t)?;
        if t.value < -self.feasibility_tolerance {
            return Ok(false);
        }

        // A degenerate basis may still hold the artificial variable at 0.
        if let Some(row) = t.basis.iter().position(|&v| v == artificial) {
            let replacement = (0..artificial)
                .find(|&j| !t.is_basic(j) && t.rows[row][j].abs() > self.pivot_tolerance);
            if let Some(j) = replacement {
                self.pivot(t, j, row)?;
            }
        }

        t.retire_artificial();
        Ok(true)
    }
}

/// Tableau state: constraint rows, right-hand side, reduced costs, basis.
struct Tableau {
    /// Number of columns (`n + m`, plus one artificial column when needed).
    width: usize,
    rows: Vec<Vec<f64>>,
    rhs: Vec<f64>,
    /// Reduced costs; positive entries improve the objective.
    costs: Vec<f64>,
    /// Current objective value.
    value: f64,
    /// Basic variable of each row.
    basis: Vec<usize>,
    /// Real objective, padded to `width`.
    objective: Vec<f64>,
    /// Column that may never enter (the retired artificial variable).
    blocked: Option<usize>,
    pivots: usize,
}

impl Tableau {
    fn new(instance: &LpInstance, with_artificial: bool) -> Self {
        let n = instance.n_vars();
        let m = instance.n_rows();
        let width = n + m + usize::from(with_artificial);

        let mut rows = Vec::with_capacity(m);
        let mut rhs = Vec::with_capacity(m);
        for (i, row) in instance.rows().iter().enumerate() {
            let mut dense = vec![0.0; width];
            dense[..n].copy_from_slice(&row.coefficients);
            dense[n + i] = 1.0;
            if with_artificial {
                dense[width - 1] = -1.0;
            }
            rows.push(dense);
            rhs.push(row.bound);
        }

        let mut objective = vec![0.0; width];
        objective[..n].copy_from_slice(instance.objective());

        let costs = if with_artificial {
            // Auxiliary objective: maximize -x₀.
            let mut c = vec![0.0; width];
            c[width - 1] = -1.0;
            c
        } else {
            objective.clone()
        };

        Self {
            width,
            rows,
            rhs,
            costs,
            value: 0.0,
            basis: (n..n + m).collect(),
            objective,
            blocked: None,
            pivots: 0,
        }
    }

    fn is_basic(&self, var: usize) -> bool {
        self.basis.contains(&var)
    }

    fn entering(&self, tolerance: f64) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_cost = tolerance;
        for j in 0..self.width {
            if self.blocked == Some(j) || self.is_basic(j) {
                continue;
            }
            if self.costs[j] > best_cost {
                best_cost = self.costs[j];
                best = Some(j);
            }
        }
        best
    }

    fn leaving(&self, entering: usize, tolerance: f64) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut min_ratio = f64::INFINITY;
        for (r, row) in self.rows.iter().enumerate() {
            let coefficient = row[entering];
            if coefficient > tolerance {
                let ratio = self.rhs[r] / coefficient;
                if ratio < min_ratio {
                    min_ratio = ratio;
                    best = Some(r);
                }
            }
        }
        best
    }

    /// Gauss-Jordan pivot on `(row, entering)`.
    fn pivot(&mut self, entering: usize, row: usize) {
        let p = self.rows[row][entering];
        for v in self.rows[row].iter_mut() {
            *v /= p;
        }
        self.rhs[row] /= p;
        self.rows[row][entering] = 1.0;

        let pivot_row = self.rows[row].clone();
        let pivot_rhs = self.rhs[row];

        for r in 0..self.rows.len() {
            if r == row {
                continue;
            }
            let factor = self.rows[r][entering];
            if factor == 0.0 {
                continue;
            }
            for (v, &p) in self.rows[r].iter_mut().zip(&pivot_row) {
                *v -= factor * p;
            }
            self.rows[r][entering] = 0.0;
            self.rhs[r] -= factor * pivot_rhs;
        }

        let factor = self.costs[entering];
        if factor != 0.0 {
            for (c, &p) in self.costs.iter_mut().zip(&pivot_row) {
                *c -= factor * p;
            }
            self.costs[entering] = 0.0;
            self.value += factor * pivot_rhs;
        }

        self.basis[row] = entering;
        self.pivots += 1;
    }

    /// Drops the artificial column and restores the real objective
    /// expressed in the current basis.
    fn retire_artificial(&mut self) {
        let artificial = self.width - 1;
        for row in &mut self.rows {
            row[artificial] = 0.0;
        }
        self.blocked = Some(artificial);

        self.costs = self.objective.clone();
        self.value = 0.0;
        for r in 0..self.rows.len() {
            let var = self.basis[r];
            let factor = self.costs[var];
            if factor == 0.0 {
                continue;
            }
            for (c, &a) in self.costs.iter_mut().zip(&self.rows[r]) {
                *c -= factor * a;
            }
            self.costs[var] = 0.0;
            self.value += factor * self.rhs[r];
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::lp::LpRow;

    fn instance(objective: Vec<f64>, rows: Vec<(Vec<f64>, f64)>) -> LpInstance {
        LpInstance::new(
            objective,
            rows.into_iter().map(|(a, b)| LpRow::new(a, b)).collect(),
        )
        .unwrap()
    }

    fn optimal(outcome: LpOutcome) -> LpSolution {
        match outcome {
            LpOutcome::Optimal(s) => s,
            other => panic!("expected optimum, got {other:?}"),
        }
    }

    /// Cormen et al. (2009), Ch. 29.3 worked example.
    fn textbook() -> LpInstance {
        instance(
            vec![3.0, 1.0, 2.0],
            vec![
                (vec![1.0, 1.0, 3.0], 30.0),
                (vec![2.0, 2.0, 5.0], 24.0),
                (vec![4.0, 1.0, 2.0], 36.0),
            ],
        )
    }

    #[test]
    fn test_textbook_optimum() {
        let s = optimal(SimplexSolver::new().solve(&textbook()).unwrap());
        assert!((s.value - 28.0).abs() < 1e-9);
        let expected = [8.0, 4.0, 0.0, 18.0, 0.0, 0.0];
        assert_eq!(s.vector.len(), 6);
        for (got, want) in s.vector.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{:?}", s.vector);
        }
        assert_eq!(s.decisions(), &s.vector[..3]);
        assert!((s.slack(0) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_unbounded() {
        // max x1 s.t. -x1 + x2 ≤ 1
        let lp = instance(vec![1.0, 0.0], vec![(vec![-1.0, 1.0], 1.0)]);
        assert_eq!(SimplexSolver::new().solve(&lp).unwrap(), LpOutcome::Unbounded);
    }

    #[test]
    fn test_unbounded_without_rows() {
        let lp = instance(vec![1.0], vec![]);
        assert_eq!(SimplexSolver::new().solve(&lp).unwrap(), LpOutcome::Unbounded);
    }

    #[test]
    fn test_non_positive_objective_stays_at_origin() {
        let lp = instance(vec![-1.0, 0.0], vec![(vec![1.0, 1.0], 5.0)]);
        let s = optimal(SimplexSolver::new().solve(&lp).unwrap());
        assert_eq!(s.value, 0.0);
        assert_eq!(s.vector, vec![0.0, 0.0, 5.0]);
        assert_eq!(s.pivots, 0);
    }

    #[test]
    fn test_greater_equal_row() {
        // max -x1 - x2 s.t. x1 + x2 ≥ 2, x1 ≤ 5
        let lp = instance(
            vec![-1.0, -1.0],
            vec![(vec![-1.0, -1.0], -2.0), (vec![1.0, 0.0], 5.0)],
        );
        let s = optimal(SimplexSolver::new().solve(&lp).unwrap());
        assert!((s.value + 2.0).abs() < 1e-9);
        assert!((s.decision(0) + s.decision(1) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_equality_row_pair() {
        // max x1 + 2x2 s.t. x1 + x2 = 10
        let lp = instance(
            vec![1.0, 2.0],
            vec![(vec![1.0, 1.0], 10.0), (vec![-1.0, -1.0], -10.0)],
        );
        let s = optimal(SimplexSolver::new().solve(&lp).unwrap());
        assert!((s.value - 20.0).abs() < 1e-9);
        assert!(s.decision(0).abs() < 1e-9);
        assert!((s.decision(1) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_infeasible() {
        // x1 ≤ 1 and x1 ≥ 2
        let lp = instance(vec![1.0], vec![(vec![1.0], 1.0), (vec![-1.0], -2.0)]);
        assert_eq!(SimplexSolver::new().solve(&lp).unwrap(), LpOutcome::Infeasible);
    }

    #[test]
    fn test_pivot_tolerance_gates_entering_costs() {
        // max 1e-10·x s.t. x ≤ 1
        let lp = instance(vec![1e-10], vec![(vec![1.0], 1.0)]);

        let s = optimal(SimplexSolver::new().solve(&lp).unwrap());
        assert_eq!(s.pivots, 0);
        assert_eq!(s.decision(0), 0.0);

        let s = optimal(
            SimplexSolver::new()
                .with_pivot_tolerance(1e-12)
                .solve(&lp)
                .unwrap(),
        );
        assert_eq!(s.pivots, 1);
        assert!((s.decision(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_feasibility_tolerance_accepts_near_miss() {
        // x ≤ 1 and x ≥ 1 + 1e-8: the auxiliary phase ends at -5e-9.
        let lp = instance(
            vec![1.0],
            vec![(vec![1.0], 1.0), (vec![-1.0], -(1.0 + 1e-8))],
        );

        let s = optimal(SimplexSolver::new().solve(&lp).unwrap());
        assert!((s.decision(0) - 1.0).abs() < 1e-6);

        let strict = SimplexSolver::new().with_feasibility_tolerance(1e-10);
        assert_eq!(strict.solve(&lp).unwrap(), LpOutcome::Infeasible);
    }

    #[test]
    fn test_pivot_limit() {
        let err = SimplexSolver::new()
            .with_max_pivots(1)
            .solve(&textbook())
            .unwrap_err();
        assert!(matches!(err, PlanError::PivotLimitExceeded { limit: 1 }));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let solver = SimplexSolver::new();
        let lp = textbook();
        let a = optimal(solver.solve(&lp).unwrap());
        let b = optimal(solver.solve(&lp).unwrap());
        assert_eq!(a.value, b.value);
    }

    /// Random bounded instances with small integer data (ties are common).
    /// Each optimum must be feasible, agree with `c·x`, and terminate well
    /// within the pivot cap.
    #[test]
    fn test_random_instances() {
        let mut rng = SmallRng::seed_from_u64(7);
        let solver = SimplexSolver::new().with_max_pivots(10_000);

        for _ in 0..200 {
            let n = rng.random_range(1..6);
            let m = rng.random_range(1..6);
            let objective: Vec<f64> = (0..n).map(|_| rng.random_range(-3..6) as f64).collect();
            let mut rows: Vec<LpRow> = (0..m)
                .map(|_| {
                    let coefficients = (0..n).map(|_| rng.random_range(0..4) as f64).collect();
                    LpRow::new(coefficients, rng.random_range(1..4) as f64)
                })
                .collect();
            // Keep every variable bounded.
            rows.push(LpRow::new(vec![1.0; n], 10.0));
            let lp = LpInstance::new(objective, rows).unwrap();

            let s = optimal(solver.solve(&lp).unwrap());
            let x = s.decisions();
            assert!(x.iter().all(|&v| v >= -1e-9));
            for row in lp.rows() {
                assert!(row.evaluate(x) <= row.bound + 1e-9);
            }
            assert!((lp.objective_value(x) - s.value).abs() < 1e-9);
        }
    }
}
