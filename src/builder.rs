//! Builder pattern API for differentiation
//!
//! Provides a fluent interface for configuring the safety limits and the
//! derivative order used when differentiating, evaluating and rendering.
//!
//! # Example
//! ```ignore
//! use diffable_fn::{Diff, Expr};
//!
//! let f = Expr::real_power(1.0, 4.0)?;
//! let second = Diff::new().order(2).max_depth(64).differentiate(&f)?;
//! assert_eq!(second.render()?, "12*x^2");
//! ```

use crate::{DEFAULT_MAX_DEPTH, DiffError, Expr};
use log::debug;

/// Builder for differentiation operations
#[derive(Debug, Clone)]
pub struct Diff {
    max_depth: Option<usize>,
    max_nodes: Option<usize>,
    order: u32,
}

impl Default for Diff {
    fn default() -> Self {
        Self {
            max_depth: None,
            max_nodes: None,
            order: 1,
        }
    }
}

impl Diff {
    /// Create a new differentiation builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum tree depth for every walk (defaults to `DEFAULT_MAX_DEPTH`)
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Set maximum node count accepted as input
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = Some(nodes);
        self
    }

    /// Set the derivative order; `0` returns a copy of the input
    pub fn order(mut self, order: u32) -> Self {
        self.order = order;
        self
    }

    fn depth_limit(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// Reject inputs over the configured limits before any work (or copy) is done
    fn check_limits(&self, expr: &Expr) -> Result<(), DiffError> {
        let limit = self.depth_limit();
        if expr.max_depth() > limit {
            debug!("rejecting expression nested deeper than {}", limit);
            return Err(DiffError::RecursionLimitExceeded { limit });
        }
        if let Some(max_n) = self.max_nodes
            && expr.node_count() > max_n
        {
            debug!("rejecting expression with more than {} nodes", max_n);
            return Err(DiffError::MaxNodesExceeded { limit: max_n });
        }
        Ok(())
    }

    /// Differentiate `expr` `order` times
    ///
    /// # Example
    /// ```ignore
    /// let f = Expr::sine(1.0)?;
    /// let d = Diff::new().order(3).differentiate(&f)?; // -cos(x)
    /// ```
    pub fn differentiate(&self, expr: &Expr) -> Result<Expr, DiffError> {
        self.check_limits(expr)?;
        let limit = self.depth_limit();
        if self.order > 1 {
            debug!("computing derivative of order {}", self.order);
        }

        let mut current = expr.clone();
        for _ in 0..self.order {
            current = current.derive(0, limit)?;
        }
        Ok(current)
    }

    /// Value of the configured derivative at `x`
    pub fn derivative_at(&self, expr: &Expr, x: f64) -> Result<f64, DiffError> {
        let derivative = self.differentiate(expr)?;
        derivative.evaluate_within(x, self.depth_limit())
    }

    /// Rendering of the configured derivative
    pub fn render_derivative(&self, expr: &Expr) -> Result<String, DiffError> {
        let derivative = self.differentiate(expr)?;
        derivative.render_within(self.depth_limit())
    }

    /// Evaluate `expr` at `x` under this builder's limits
    pub fn evaluate(&self, expr: &Expr, x: f64) -> Result<f64, DiffError> {
        self.check_limits(expr)?;
        expr.evaluate_within(x, self.depth_limit())
    }

    /// Render `expr` under this builder's limits
    pub fn render(&self, expr: &Expr) -> Result<String, DiffError> {
        self.check_limits(expr)?;
        expr.render_within(self.depth_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{Flavor, Leaf};
    use crate::Argument;

    #[test]
    fn test_diff_builder_basic() {
        let f = Expr::polynomial([1.0, 0.0, 0.0]).unwrap();
        let result = Diff::new().render_derivative(&f).unwrap();
        assert_eq!(result, "2x");
    }

    #[test]
    fn test_higher_order() {
        let f = Expr::real_power(1.0, 4.0).unwrap();
        let second = Diff::new().order(2).differentiate(&f).unwrap();
        assert_eq!(second.render().unwrap(), "12*x^2");

        let p = Expr::polynomial([1.0, 1.0, 1.0, 1.0]).unwrap();
        let fourth = Diff::new().order(4).render_derivative(&p).unwrap();
        assert_eq!(fourth, "0");
    }

    #[test]
    fn test_order_zero_is_identity() {
        let f = Expr::cosine(2.0).unwrap();
        assert_eq!(Diff::new().order(0).differentiate(&f).unwrap(), f);
    }

    #[test]
    fn test_derivative_at() {
        let f = Expr::exponential(2.0, 3.0).unwrap();
        let at_zero = Diff::new().derivative_at(&f, 0.0).unwrap();
        assert_eq!(at_zero, 2.0 * 3f64.ln());
    }

    #[test]
    fn test_node_limit() {
        let x = Expr::polynomial([1.0, 0.0]).unwrap();
        let mut broad = x.clone();
        for _ in 0..20 {
            broad = crate::add(broad, x.clone()).unwrap();
        }
        let res = Diff::new().max_nodes(10).differentiate(&broad);
        assert_eq!(res, Err(DiffError::MaxNodesExceeded { limit: 10 }));
        assert!(Diff::new().max_nodes(100).differentiate(&broad).is_ok());
    }

    fn deep_sum(n: usize) -> Expr {
        let x = Expr::polynomial([1.0, 0.0]).unwrap();
        let mut f = x.clone();
        for _ in 0..n {
            f = crate::add(f, x.clone()).unwrap();
        }
        f
    }

    #[test]
    fn test_very_deep_tree_is_rejected_not_overflowed() {
        let f = deep_sum(200_000);
        assert_eq!(f.max_depth(), 200_001);

        let diff = Diff::new();
        let limit = Some(DiffError::RecursionLimitExceeded {
            limit: DEFAULT_MAX_DEPTH,
        });
        assert_eq!(diff.differentiate(&f).err(), limit);
        assert_eq!(diff.evaluate(&f, 1.0).err(), limit);
        assert_eq!(diff.render(&f).err(), limit);
        assert_eq!(f.differentiate().err(), limit);
        assert!(f.in_var("t").is_err());

        // copies and drops walk the tree without recursion
        let copy = f.clone();
        assert_eq!(copy.node_count(), f.node_count());
        drop(copy);
        drop(f);
    }

    #[test]
    fn test_very_deep_leaf_composition() {
        let x = Expr::polynomial([1.0, 0.0]).unwrap();
        let mut nested = x.clone();
        for _ in 0..100_000 {
            let sine = Leaf::trigonometric(1.0, Flavor::Sine).unwrap();
            nested = Expr::from_leaf(sine, Argument::Expr(Box::new(nested)));
        }
        // composing at the bottom of the chain stays iterative
        let deeper = nested.compose(&x);
        assert_eq!(deeper.max_depth(), nested.max_depth() + 1);
        assert!(matches!(deeper.argument(), Argument::Expr(_)));
        assert!(matches!(
            Diff::new().evaluate(&deeper, 0.5),
            Err(DiffError::RecursionLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut nested = Expr::polynomial([1.0, 0.0]).unwrap();
        for _ in 0..20 {
            nested = Expr::cosine(1.0).unwrap().compose(&nested);
        }
        let strict = Diff::new().max_depth(8);
        assert!(matches!(
            strict.differentiate(&nested),
            Err(DiffError::RecursionLimitExceeded { limit: 8 })
        ));
        assert!(matches!(
            strict.evaluate(&nested, 0.5),
            Err(DiffError::RecursionLimitExceeded { .. })
        ));
        assert!(matches!(
            strict.render(&nested),
            Err(DiffError::RecursionLimitExceeded { .. })
        ));
        assert!(Diff::new().differentiate(&nested).is_ok());
    }
}
