//! Elementary function families
//!
//! The leaves of every expression tree come from this closed set. Each family
//! validates its parameters once, at construction, and is immutable afterwards.
//! Numeric evaluation and the closed-form derivative of each family live in
//! [`definitions`].

use crate::DiffError;
use std::fmt;
use std::str::FromStr;

pub(crate) mod definitions;

/// Which trigonometric function a [`Leaf::Trigonometric`] node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flavor {
    Sine,
    Cosine,
}

impl Flavor {
    /// Short function name used when rendering (`sin` / `cos`)
    pub fn name(self) -> &'static str {
        match self {
            Flavor::Sine => "sin",
            Flavor::Cosine => "cos",
        }
    }
}

impl FromStr for Flavor {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "sin" | "sine" => Ok(Flavor::Sine),
            "c" | "cos" | "cosine" => Ok(Flavor::Cosine),
            other => Err(DiffError::validation(
                "trigonometric",
                format!("unknown flavor '{}', expected sine or cosine", other),
            )),
        }
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One elementary function family together with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// `a_n·x^n + ... + a_1·x + a_0`, coefficients stored highest degree first.
    /// An empty coefficient list is the zero polynomial.
    Polynomial { coefficients: Vec<f64> },

    /// `c·b^x` with `b > 0`
    Exponential { coefficient: f64, base: f64 },

    /// `c·sin(x)` or `c·cos(x)`
    Trigonometric { coefficient: f64, flavor: Flavor },

    /// `c·x^e` for any real exponent `e`
    RealPower { coefficient: f64, exponent: f64 },

    /// `log_b(x)` with `b > 0`, `b != 1`
    Logarithm { base: f64 },
}

impl Leaf {
    pub fn polynomial(coefficients: Vec<f64>) -> Result<Self, DiffError> {
        if let Some(bad) = coefficients.iter().find(|c| !c.is_finite()) {
            return Err(DiffError::validation(
                "polynomial",
                format!("coefficients must be finite, got {}", bad),
            ));
        }
        Ok(Leaf::Polynomial { coefficients })
    }

    pub fn exponential(coefficient: f64, base: f64) -> Result<Self, DiffError> {
        require_finite("exponential", "coefficient", coefficient)?;
        // NaN fails the comparison as well
        if !(base > 0.0) || !base.is_finite() {
            return Err(DiffError::validation(
                "exponential",
                format!("base must be positive and finite, got {}", base),
            ));
        }
        Ok(Leaf::Exponential { coefficient, base })
    }

    pub fn trigonometric(coefficient: f64, flavor: Flavor) -> Result<Self, DiffError> {
        require_finite("trigonometric", "coefficient", coefficient)?;
        Ok(Leaf::Trigonometric {
            coefficient,
            flavor,
        })
    }

    pub fn real_power(coefficient: f64, exponent: f64) -> Result<Self, DiffError> {
        require_finite("real power", "coefficient", coefficient)?;
        require_finite("real power", "exponent", exponent)?;
        Ok(Leaf::RealPower {
            coefficient,
            exponent,
        })
    }

    pub fn logarithm(base: f64) -> Result<Self, DiffError> {
        if !(base > 0.0) || !base.is_finite() {
            return Err(DiffError::validation(
                "logarithm",
                format!("base must be positive and finite, got {}", base),
            ));
        }
        if base == 1.0 {
            return Err(DiffError::validation("logarithm", "base must not be 1"));
        }
        Ok(Leaf::Logarithm { base })
    }

    /// Family name, as used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Leaf::Polynomial { .. } => "polynomial",
            Leaf::Exponential { .. } => "exponential",
            Leaf::Trigonometric { .. } => "trigonometric",
            Leaf::RealPower { .. } => "real power",
            Leaf::Logarithm { .. } => "logarithm",
        }
    }
}

fn require_finite(kind: &'static str, what: &str, value: f64) -> Result<(), DiffError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(DiffError::validation(
            kind,
            format!("{} must be finite, got {}", what, value),
        ))
    }
}
