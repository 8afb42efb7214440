//! Evaluation and closed-form differentiation rules for the elementary families
//!
//! # Derivative references
//! - Polynomial: term-wise power rule, `d/dx a·x^k = k·a·x^(k-1)`
//! - Exponential: `d/dx c·b^x = c·ln(b)·b^x`
//! - Trigonometric: `sin' = cos`, `cos' = -sin`
//! - Real power: `d/dx c·x^e = c·e·x^(e-1)`
//! - Logarithm: `d/dx log_b(x) = 1 / (ln(b)·x)`
//!
//! The rules here only know about the bare variable. Chain-rule factors for a
//! leaf whose argument is itself an expression are applied by the engine.

use super::{Flavor, Leaf};
use crate::ast::{Argument, Expr};
use crate::DiffError;

/// Evaluate a leaf at an already-evaluated argument value `t`
///
/// A point outside the family's real domain is a `Domain` error; a NaN never
/// escapes unless `t` itself is NaN.
pub(crate) fn eval(leaf: &Leaf, t: f64) -> Result<f64, DiffError> {
    let value = match leaf {
        // Horner's scheme, highest degree first
        Leaf::Polynomial { coefficients } => coefficients.iter().fold(0.0, |acc, c| acc * t + c),
        // 0·b^x is 0 even where b^x overflows
        Leaf::Exponential { coefficient, .. } if *coefficient == 0.0 => 0.0,
        Leaf::Exponential { coefficient, base } => coefficient * base.powf(t),
        Leaf::Trigonometric {
            coefficient,
            flavor,
        } => match flavor {
            Flavor::Sine => coefficient * t.sin(),
            Flavor::Cosine => coefficient * t.cos(),
        },
        Leaf::RealPower {
            coefficient,
            exponent,
        } => {
            // x^e with e < 0 has a pole at 0
            if t == 0.0 && *exponent < 0.0 {
                return Err(domain(leaf, t));
            }
            coefficient * t.powf(*exponent)
        }
        Leaf::Logarithm { base } => {
            if !(t > 0.0) {
                return Err(domain(leaf, t));
            }
            if *base == 2.0 {
                t.log2()
            } else if *base == 10.0 {
                t.log10()
            } else {
                t.ln() / base.ln()
            }
        }
    };
    if value.is_nan() && !t.is_nan() {
        return Err(domain(leaf, t));
    }
    Ok(value)
}

fn domain(leaf: &Leaf, at: f64) -> DiffError {
    DiffError::Domain {
        function: leaf.kind_name(),
        at,
    }
}

/// Closed-form derivative of a leaf with respect to its own argument.
///
/// The result keeps `argument` unchanged, so for a composed leaf it is the outer
/// derivative `f'(g)` without the inner factor `g'`.
pub(crate) fn derivative(leaf: &Leaf, argument: &Argument) -> Result<Expr, DiffError> {
    let derived = match leaf {
        Leaf::Polynomial { coefficients } => {
            let n = coefficients.len();
            let shrunk = coefficients
                .iter()
                .take(n.saturating_sub(1))
                .enumerate()
                .map(|(i, c)| c * (n - 1 - i) as f64)
                .collect();
            Leaf::Polynomial {
                coefficients: shrunk,
            }
        }
        Leaf::Exponential { coefficient, base } => Leaf::Exponential {
            coefficient: coefficient * base.ln(),
            base: *base,
        },
        Leaf::Trigonometric {
            coefficient,
            flavor: Flavor::Sine,
        } => Leaf::Trigonometric {
            coefficient: *coefficient,
            flavor: Flavor::Cosine,
        },
        Leaf::Trigonometric {
            coefficient,
            flavor: Flavor::Cosine,
        } => Leaf::Trigonometric {
            coefficient: -coefficient,
            flavor: Flavor::Sine,
        },
        Leaf::RealPower {
            coefficient,
            exponent,
        } => Leaf::RealPower {
            coefficient: coefficient * exponent,
            exponent: exponent - 1.0,
        },
        // 1 / (ln(b)·x), as a quotient of two polynomials
        Leaf::Logarithm { base } => {
            let numerator = Expr::from_leaf(
                Leaf::Polynomial {
                    coefficients: vec![1.0],
                },
                argument.clone(),
            );
            let denominator = Expr::from_leaf(
                Leaf::Polynomial {
                    coefficients: vec![base.ln(), 0.0],
                },
                argument.clone(),
            );
            return crate::div(numerator, denominator);
        }
    };
    Ok(Expr::from_leaf(derived, argument.clone()))
}
