// Differentiation engine - applies calculus rules by structural recursion
//
// Leaves contribute their closed-form derivative; composites recombine the
// derivatives of their children with the sum, difference, product, quotient and
// chain rules. Every call builds fresh nodes, so the input tree can be reused or
// differentiated again. Results are not simplified.

use crate::ast::{Argument, Expr, ExprKind, Operation, descend};
use crate::functions::definitions;
use crate::{DEFAULT_MAX_DEPTH, DiffError, add, div, mul, sub};
use log::trace;

impl Expr {
    /// Differentiate this expression with respect to its variable
    ///
    /// # Example
    /// ```ignore
    /// let f = mul(Expr::polynomial([1.0, 0.0])?, Expr::polynomial([1.0, 0.0, 0.0])?)?;
    /// let df = f.differentiate()?;
    /// assert_eq!(df.evaluate(2.0)?, 12.0);
    /// ```
    pub fn differentiate(&self) -> Result<Expr, DiffError> {
        self.derive(0, DEFAULT_MAX_DEPTH)
    }

    pub(crate) fn derive(&self, depth: usize, limit: usize) -> Result<Expr, DiffError> {
        let depth = descend(depth, limit)?;
        match &self.kind {
            ExprKind::Leaf { leaf, argument } => {
                trace!("closed-form derivative of {} leaf", leaf.kind_name());
                let outer = definitions::derivative(leaf, argument)?;
                match argument {
                    Argument::Var(_) => Ok(outer),
                    // Chain rule for a composed leaf: f'(g) * g'
                    Argument::Expr(inner) => {
                        let inner_prime = inner.derive(depth, limit)?;
                        mul(outer, inner_prime)
                    }
                }
            }

            ExprKind::Composite { op, left, right } => {
                trace!("applying {} rule", rule_name(*op));
                let u_prime = left.derive(depth, limit)?;
                let v_prime = right.derive(depth, limit)?;
                let u = left.as_ref();
                let v = right.as_ref();

                match op {
                    // Sum rule: (u + v)' = u' + v'
                    Operation::Add => add(u_prime, v_prime),

                    // Difference rule: (u - v)' = u' - v'
                    Operation::Sub => sub(u_prime, v_prime),

                    // Product rule: (u * v)' = u' * v + u * v'
                    Operation::Mul => {
                        let term1 = mul(u_prime, v.clone())?;
                        let term2 = mul(u.clone(), v_prime)?;
                        add(term1, term2)
                    }

                    // Quotient rule: (u / v)' = (u' * v - u * v') / (v * v)
                    Operation::Div => {
                        let term1 = mul(u_prime, v.clone())?;
                        let term2 = mul(u.clone(), v_prime)?;
                        let numerator = sub(term1, term2)?;
                        let denominator = mul(v.clone(), v.clone())?;
                        div(numerator, denominator)
                    }

                    // Chain rule: (u ∘ v)' = (u' ∘ v) * v'
                    Operation::Compose => mul(u_prime.compose(v), v_prime),
                }
            }
        }
    }
}

fn rule_name(op: Operation) -> &'static str {
    match op {
        Operation::Add => "sum",
        Operation::Sub => "difference",
        Operation::Mul => "product",
        Operation::Div => "quotient",
        Operation::Compose => "chain",
    }
}
