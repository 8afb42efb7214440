//! Parallel batch evaluation using Rayon
//!
//! Expressions are immutable, so a single tree can be evaluated at many sample
//! points from worker threads without any locking.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! diffable_fn = { version = "0.1", features = ["parallel"] }
//! ```

use crate::{Diff, DiffError, Expr};
use rayon::prelude::*;

/// Evaluate `expr` at every point, in parallel
///
/// Each point gets its own result; one failing point (e.g. a pole of a quotient)
/// does not affect the others. Results keep the order of `points`.
///
/// # Example
/// ```ignore
/// use diffable_fn::parallel::evaluate_parallel;
///
/// let f = Expr::polynomial([1.0, 0.0, 0.0])?;
/// let ys = evaluate_parallel(&f, &[0.0, 1.0, 2.0]);
/// ```
pub fn evaluate_parallel(expr: &Expr, points: &[f64]) -> Vec<Result<f64, DiffError>> {
    points.par_iter().map(|&x| expr.evaluate(x)).collect()
}

/// Differentiate once with `diff`, then evaluate the derivative at every point in parallel
pub fn derivative_parallel(
    diff: &Diff,
    expr: &Expr,
    points: &[f64],
) -> Result<Vec<Result<f64, DiffError>>, DiffError> {
    let derivative = diff.differentiate(expr)?;
    Ok(evaluate_parallel(&derivative, points))
}
