//! Composable Differentiable Functions
//!
//! Single-variable real functions modelled as an explicit expression tree and
//! differentiated symbolically by structural recursion.
//!
//! # Features
//! - Five elementary families: polynomial, exponential, trigonometric, real power, logarithm
//! - Sum, difference, product, quotient and composition of any two expressions
//! - Rule-driven differentiation producing a new expression tree
//! - Canonical rendering of any node back to a readable formula
//! - **Builder pattern API** for safety limits and higher-order derivatives
//!
//! # Usage Examples
//!
//! ```ignore
//! use diffable_fn::{Expr, compose, mul};
//!
//! let x = Expr::polynomial([1.0, 0.0])?;
//! let x2 = Expr::polynomial([1.0, 0.0, 0.0])?;
//! let f = mul(x, x2)?;
//! assert_eq!(f.differentiate()?.evaluate(2.0)?, 12.0);
//!
//! let g = compose(Expr::real_power(1.0, 3.0)?, Expr::polynomial([1.0, 0.0, 1.0])?)?;
//! assert_eq!(g.render()?, "(x^2 + 1)^3");
//! ```

mod ast;
mod builder;
mod differentiation;
mod display;
mod error;
mod evaluator;
pub mod functions;

#[cfg(feature = "parallel")]
pub mod parallel;


// Re-export key types for easier usage
pub use ast::{Argument, DEFAULT_VARIABLE, Expr, ExprKind, Operation};
pub use builder::Diff;
pub use error::DiffError;
pub use functions::{Flavor, Leaf};

/// Default maximum tree depth for evaluate, differentiate and render
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// `f + g`; both must depend on the same variable
pub fn add(f: Expr, g: Expr) -> Result<Expr, DiffError> {
    Expr::composite(Operation::Add, f, g)
}

/// `f - g`; both must depend on the same variable
pub fn sub(f: Expr, g: Expr) -> Result<Expr, DiffError> {
    Expr::composite(Operation::Sub, f, g)
}

/// `f * g`; both must depend on the same variable
pub fn mul(f: Expr, g: Expr) -> Result<Expr, DiffError> {
    Expr::composite(Operation::Mul, f, g)
}

/// `f / g`; both must depend on the same variable.
///
/// A vanishing denominator is only reported when evaluating.
pub fn div(f: Expr, g: Expr) -> Result<Expr, DiffError> {
    Expr::composite(Operation::Div, f, g)
}

/// `f ∘ g` as a composite node: `g` is evaluated first
pub fn compose(f: Expr, g: Expr) -> Result<Expr, DiffError> {
    Expr::composite(Operation::Compose, f, g)
}

/// Evaluate `expr` at `x`
///
/// # Example
/// ```ignore
/// let f = diffable_fn::Expr::exponential(3.0, 2.0)?;
/// assert_eq!(diffable_fn::evaluate(&f, 1.0)?, 6.0);
/// ```
pub fn evaluate(expr: &Expr, x: f64) -> Result<f64, DiffError> {
    expr.evaluate(x)
}

/// Symbolic derivative of `expr`
///
/// For more control (depth limits, node limits, higher orders), use the `Diff` builder:
/// ```ignore
/// Diff::new().order(2).max_depth(64).differentiate(&expr)
/// ```
pub fn differentiate(expr: &Expr) -> Result<Expr, DiffError> {
    expr.differentiate()
}

/// Canonical rendering of `expr`
pub fn render(expr: &Expr) -> Result<String, DiffError> {
    expr.render()
}
