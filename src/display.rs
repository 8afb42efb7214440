// Rendering of expressions as human-readable formulas
//
// Shared policy for every node:
// - zero-coefficient terms are dropped, and an expression with no terms left is "0"
// - terms are joined with " + " or " - " (the latter prints the absolute value)
// - coefficients of 1 and -1 are never printed, -1 becomes a leading minus
// - a substituted argument is parenthesized when raised to a power or qualified
//   by a coefficient, unless it is a bare identifier
//
// Composition renders by textual substitution: the inner expression's rendering
// replaces the outer expression's variable everywhere it appears.

use crate::ast::{Argument, Expr, ExprKind, Operation, descend, is_identifier};
use crate::functions::Leaf;
use crate::{DEFAULT_MAX_DEPTH, DiffError};
use std::fmt;

impl Expr {
    /// Canonical textual form of the expression
    ///
    /// # Example
    /// ```ignore
    /// let p = Expr::polynomial([0.0, 0.0, 3.0, 0.0])?;
    /// assert_eq!(p.render()?, "3x");
    /// ```
    pub fn render(&self) -> Result<String, DiffError> {
        self.render_within(DEFAULT_MAX_DEPTH)
    }

    pub(crate) fn render_within(&self, limit: usize) -> Result<String, DiffError> {
        self.render_with(None, 0, limit)
    }

    /// Render, replacing the bottom variable by `substitute` when given
    fn render_with(
        &self,
        substitute: Option<&str>,
        depth: usize,
        limit: usize,
    ) -> Result<String, DiffError> {
        let depth = descend(depth, limit)?;
        match &self.kind {
            ExprKind::Leaf { leaf, argument } => {
                let (text, compound) = match argument {
                    Argument::Var(name) => match substitute {
                        Some(s) => (s.to_string(), true),
                        None => (name.clone(), false),
                    },
                    Argument::Expr(inner) => (inner.render_with(substitute, depth, limit)?, true),
                };
                Ok(render_leaf(leaf, &text, compound))
            }
            ExprKind::Composite {
                op: Operation::Compose,
                left,
                right,
            } => {
                let inner = right.render_with(substitute, depth, limit)?;
                left.render_with(Some(&inner), depth, limit)
            }
            ExprKind::Composite { op, left, right } => {
                let l = left.render_with(substitute, depth, limit)?;
                let r = right.render_with(substitute, depth, limit)?;
                Ok(join(*op, l, r))
            }
        }
    }
}

impl fmt::Display for Expr {
    /// Formats like [`Expr::render`]; a tree deeper than the default limit
    /// prints a marker instead, since `Display` cannot report the error
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(DiffError::RecursionLimitExceeded { limit }) => {
                write!(f, "<expression nested deeper than {}>", limit)
            }
            Err(e) => write!(f, "<{}>", e),
        }
    }
}

/// Combine two rendered operands
fn join(op: Operation, l: String, r: String) -> String {
    match op {
        Operation::Add => {
            if r == "0" {
                l
            } else if l == "0" {
                r
            } else if let Some(rest) = r.strip_prefix('-') {
                format!("{} - {}", l, rest)
            } else {
                format!("{} + {}", l, r)
            }
        }
        Operation::Sub => {
            if r == "0" {
                l
            } else if l == "0" {
                negate(&r)
            } else if has_top_level_sum(&r) {
                format!("{} - ({})", l, r)
            } else if let Some(rest) = r.strip_prefix('-') {
                format!("{} + {}", l, rest)
            } else {
                format!("{} - {}", l, r)
            }
        }
        Operation::Mul => {
            if l == "0" || r == "0" {
                "0".to_string()
            } else {
                format!("({})({})", l, r)
            }
        }
        Operation::Div => {
            if l == "0" {
                "0".to_string()
            } else {
                format!("({}) / ({})", l, r)
            }
        }
        Operation::Compose => unreachable!("compose renders by substitution"),
    }
}

fn negate(term: &str) -> String {
    if has_top_level_sum(term) {
        format!("-({})", term)
    } else if let Some(rest) = term.strip_prefix('-') {
        rest.to_string()
    } else {
        format!("-{}", term)
    }
}

/// True when `s` contains a " + " or " - " outside any parentheses
fn has_top_level_sum(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'+' | b'-' if depth == 0 && i > 0 => {
                if bytes[i - 1] == b' ' && bytes.get(i + 1) == Some(&b' ') {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

// ===== Leaf rendering =====

fn render_leaf(leaf: &Leaf, arg: &str, compound: bool) -> String {
    // Argument as it appears under a power or after a coefficient
    let qualified = if compound && !is_identifier(arg) {
        format!("({})", arg)
    } else {
        arg.to_string()
    };

    match leaf {
        Leaf::Polynomial { coefficients } => render_polynomial(coefficients, &qualified),

        Leaf::Exponential { coefficient, base } => {
            if *coefficient == 0.0 {
                return "0".to_string();
            }
            if *base == 1.0 {
                return format_number(*coefficient);
            }
            let base_text = if *base == std::f64::consts::E {
                "e".to_string()
            } else {
                format_number(*base)
            };
            with_coefficient(*coefficient, &format!("{}^{}", base_text, qualified))
        }

        Leaf::Trigonometric {
            coefficient,
            flavor,
        } => {
            if *coefficient == 0.0 {
                return "0".to_string();
            }
            with_coefficient(*coefficient, &format!("{}({})", flavor.name(), arg))
        }

        Leaf::RealPower {
            coefficient,
            exponent,
        } => {
            if *coefficient == 0.0 {
                return "0".to_string();
            }
            if *exponent == 0.0 {
                return format_number(*coefficient);
            }
            let body = if *exponent == 1.0 {
                qualified
            } else if *exponent < 0.0 {
                format!("{}^({})", qualified, format_number(*exponent))
            } else {
                format!("{}^{}", qualified, format_number(*exponent))
            };
            with_coefficient(*coefficient, &body)
        }

        Leaf::Logarithm { base } => {
            let name = if *base == std::f64::consts::E {
                "ln".to_string()
            } else if *base == 2.0 {
                "lg".to_string()
            } else if *base == 10.0 {
                "log".to_string()
            } else {
                format!("log_{}", format_number(*base))
            };
            format!("{}({})", name, arg)
        }
    }
}

/// `c*body`, with `1` and `-1` folded into the sign
fn with_coefficient(coefficient: f64, body: &str) -> String {
    if coefficient == 1.0 {
        body.to_string()
    } else if coefficient == -1.0 {
        format!("-{}", body)
    } else {
        format!("{}*{}", format_number(coefficient), body)
    }
}

fn render_polynomial(coefficients: &[f64], arg: &str) -> String {
    let n = coefficients.len();
    let mut out = String::new();

    for (i, &c) in coefficients.iter().enumerate() {
        if c == 0.0 {
            continue;
        }
        let power = n - 1 - i;
        let magnitude = c.abs();
        let term = match power {
            0 => format_number(magnitude),
            _ => {
                let body = if power == 1 {
                    arg.to_string()
                } else {
                    format!("{}^{}", arg, power)
                };
                if magnitude == 1.0 {
                    body
                } else {
                    format!("{}{}", format_number(magnitude), body)
                }
            }
        };

        if out.is_empty() {
            if c < 0.0 {
                out.push('-');
            }
        } else if c < 0.0 {
            out.push_str(" - ");
        } else {
            out.push_str(" + ");
        }
        out.push_str(&term);
    }

    if out.is_empty() {
        "0".to_string()
    } else {
        out
    }
}

/// Integral values below 1e10 print without a fractional part
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
