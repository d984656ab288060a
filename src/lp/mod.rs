//! Dense linear programming.
//!
//! Maximizes `c·x` subject to `A·x ≤ b` and `x ≥ 0` with a dense
//! tableau simplex. Intended for the small instances the work
//! distribution produces (one variable per worker, a handful of rows per
//! worker); there is no sparse storage.
//!
//! # Building instances
//!
//! [`LpBuilder`] assembles rows in named groups and returns a
//! [`RowLayout`] alongside the [`LpInstance`], so callers address rows and
//! slack values by group instead of by raw offset.
//!
//! ```
//! use u_allocate::lp::{LpBuilder, LpOutcome, LpRow, SimplexSolver};
//!
//! // max 3x + 2y  s.t.  x + y ≤ 4,  x + 3y ≤ 6
//! let (instance, layout) = LpBuilder::new(2)
//!     .with_objective(vec![3.0, 2.0])
//!     .with_group("limits", vec![
//!         LpRow::new(vec![1.0, 1.0], 4.0),
//!         LpRow::new(vec![1.0, 3.0], 6.0),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let LpOutcome::Optimal(solution) = SimplexSolver::new().solve(&instance).unwrap() else {
//!     panic!("expected an optimum");
//! };
//! assert!((solution.value - 12.0).abs() < 1e-9);
//! assert!((solution.decision(0) - 4.0).abs() < 1e-9);
//! assert!((solution.slacks(&layout, &"limits").unwrap()[1] - 2.0).abs() < 1e-9);
//! ```
//!
//! # References
//!
//! - Dantzig (1963), "Linear Programming and Extensions"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 29
//! - Chvátal (1983), "Linear Programming", Ch. 2-3

mod instance;
mod simplex;

pub use instance::{LpBuilder, LpInstance, LpRow, RowLayout};
pub use simplex::{LpOutcome, LpSolution, SimplexSolver};
