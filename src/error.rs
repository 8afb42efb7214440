use thiserror::Error;

use crate::ast::Operation;

/// Errors that can occur while building, evaluating, differentiating or rendering
/// an expression
///
/// Construction-time errors (`Validation`, `ArgumentMismatch`) are reported by the
/// constructors; the remaining variants only surface from the operations that walk
/// an existing tree.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiffError {
    /// Illegal parameters for an elementary function family
    #[error("Invalid {kind} parameters: {reason}")]
    Validation { kind: &'static str, reason: String },

    /// Two operands of an arithmetic combination depend on different variables
    #[error("Cannot {op} functions of '{left}' and '{right}': arguments must match")]
    ArgumentMismatch {
        op: Operation,
        left: String,
        right: String,
    },

    /// A quotient's denominator evaluated to exactly zero
    #[error("Division by zero: denominator vanishes at {at}")]
    DivisionByZero { at: f64 },

    /// An elementary function was evaluated outside its real domain
    #[error("{function} has no real value at {at}")]
    Domain { function: &'static str, at: f64 },

    // Safety limits
    #[error("Expression nesting depth exceeds maximum limit of {limit}")]
    RecursionLimitExceeded { limit: usize },

    #[error("Expression size exceeds maximum node count limit of {limit}")]
    MaxNodesExceeded { limit: usize },
}

impl DiffError {
    /// Create a validation error for the given function family
    pub(crate) fn validation(kind: &'static str, reason: impl Into<String>) -> Self {
        DiffError::Validation {
            kind,
            reason: reason.into(),
        }
    }

    /// Returns true for errors raised while constructing an expression
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            DiffError::Validation { .. } | DiffError::ArgumentMismatch { .. }
        )
    }
}
