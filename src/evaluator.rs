//! Numeric evaluation of expression trees
//!
//! Evaluation always uses true function composition: a composed node evaluates
//! its inner expression first and feeds the result to the outer one. Rendering
//! uses textual substitution instead (see `display.rs`); the two paths are kept
//! independent.

use crate::ast::{Argument, Expr, ExprKind, Operation, descend};
use crate::functions::definitions;
use crate::{DEFAULT_MAX_DEPTH, DiffError};

impl Expr {
    /// Evaluate the expression at `x`
    ///
    /// # Errors
    /// - `DivisionByZero` when a quotient's denominator is exactly zero
    /// - `Domain` when a leaf is evaluated outside its real domain
    /// - `RecursionLimitExceeded` for trees deeper than `DEFAULT_MAX_DEPTH`
    ///
    /// # Example
    /// ```ignore
    /// let f = add(Expr::polynomial([1.0, 0.0, 0.0])?, Expr::sine(1.0)?)?;
    /// let y = f.evaluate(0.0)?; // 0
    /// ```
    pub fn evaluate(&self, x: f64) -> Result<f64, DiffError> {
        self.evaluate_within(x, DEFAULT_MAX_DEPTH)
    }

    /// Evaluate with an explicit nesting limit
    pub(crate) fn evaluate_within(&self, x: f64, limit: usize) -> Result<f64, DiffError> {
        self.eval_at(x, 0, limit)
    }

    fn eval_at(&self, x: f64, depth: usize, limit: usize) -> Result<f64, DiffError> {
        let depth = descend(depth, limit)?;
        match &self.kind {
            ExprKind::Leaf { leaf, argument } => {
                let t = match argument {
                    Argument::Var(_) => x,
                    Argument::Expr(inner) => inner.eval_at(x, depth, limit)?,
                };
                definitions::eval(leaf, t)
            }
            ExprKind::Composite {
                op: Operation::Compose,
                left,
                right,
            } => {
                let t = right.eval_at(x, depth, limit)?;
                left.eval_at(t, depth, limit)
            }
            ExprKind::Composite { op, left, right } => {
                let l = left.eval_at(x, depth, limit)?;
                let r = right.eval_at(x, depth, limit)?;
                match op {
                    Operation::Add => Ok(l + r),
                    Operation::Sub => Ok(l - r),
                    Operation::Mul => Ok(l * r),
                    Operation::Div => {
                        if r == 0.0 {
                            Err(DiffError::DivisionByZero { at: x })
                        } else {
                            Ok(l / r)
                        }
                    }
                    Operation::Compose => unreachable!("compose handled above"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{add, compose, div, mul, sub};

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn test_leaf_evaluation() {
        let p = Expr::polynomial([2.0, 0.0, 3.0, -1.0]).unwrap();
        assert_eq!(p.evaluate(2.0), Ok(21.0));

        let e = Expr::exponential(3.0, 2.0).unwrap();
        assert_eq!(e.evaluate(3.0), Ok(24.0));

        let s = Expr::sine(2.0).unwrap();
        assert!(approx_eq(
            s.evaluate(std::f64::consts::FRAC_PI_2).unwrap(),
            2.0
        ));

        let r = Expr::real_power(3.0, 2.0).unwrap();
        assert_eq!(r.evaluate(2.0), Ok(12.0));

        let ln = Expr::logarithm(std::f64::consts::E).unwrap();
        assert!(approx_eq(ln.evaluate(std::f64::consts::E).unwrap(), 1.0));
    }

    #[test]
    fn test_arithmetic_evaluation() {
        let x = Expr::polynomial([1.0, 0.0]).unwrap();
        let sq = Expr::polynomial([1.0, 0.0, 0.0]).unwrap();

        assert_eq!(add(x.clone(), sq.clone()).unwrap().evaluate(3.0), Ok(12.0));
        assert_eq!(sub(x.clone(), sq.clone()).unwrap().evaluate(3.0), Ok(-6.0));
        assert_eq!(mul(x.clone(), sq.clone()).unwrap().evaluate(3.0), Ok(27.0));
        assert_eq!(div(sq, x).unwrap().evaluate(3.0), Ok(3.0));
    }

    #[test]
    fn test_division_by_zero_propagates() {
        let one = Expr::polynomial([1.0]).unwrap();
        let x = Expr::polynomial([1.0, 0.0]).unwrap();
        let q = div(one, x).unwrap();
        assert_eq!(q.evaluate(0.0), Err(DiffError::DivisionByZero { at: 0.0 }));

        // inside a larger tree the error is returned unchanged
        let wrapped = add(q, Expr::sine(1.0).unwrap()).unwrap();
        assert_eq!(
            wrapped.evaluate(0.0),
            Err(DiffError::DivisionByZero { at: 0.0 })
        );
    }

    #[test]
    fn test_composition_evaluates_inner_first() {
        let exp = Expr::exponential(1.0, 2.0).unwrap();
        let shift = Expr::polynomial([1.0, 1.0]).unwrap();

        // 2^(x + 1) at x = 2
        assert_eq!(compose(exp.clone(), shift.clone()).unwrap().evaluate(2.0), Ok(8.0));
        assert_eq!(exp.compose(&shift).evaluate(2.0), Ok(8.0));
        // (2^x) + 1 at x = 2
        assert_eq!(compose(shift, exp).unwrap().evaluate(2.0), Ok(5.0));
    }

    #[test]
    fn test_domain_error_under_composition() {
        let ln = Expr::logarithm(std::f64::consts::E).unwrap();
        let neg = Expr::polynomial([-1.0, 0.0]).unwrap();
        let res = ln.compose(&neg).evaluate(2.0);
        assert!(matches!(res, Err(DiffError::Domain { at, .. }) if at == -2.0));
    }

    #[test]
    fn test_depth_limit() {
        let x = Expr::polynomial([1.0, 0.0]).unwrap();
        let mut nested = x.clone();
        for _ in 0..10 {
            nested = add(nested, x.clone()).unwrap();
        }
        assert_eq!(nested.evaluate_within(1.0, 64), Ok(11.0));
        assert_eq!(
            nested.evaluate_within(1.0, 5),
            Err(DiffError::RecursionLimitExceeded { limit: 5 })
        );
    }
}
