//! Expression tree for composable single-variable functions

use std::fmt;
use std::ops::Deref;

use crate::functions::{Flavor, Leaf};
use crate::{DEFAULT_MAX_DEPTH, DiffError};

/// Name of the independent variable used by the leaf constructors
pub const DEFAULT_VARIABLE: &str = "x";

/// Binary operation held by a composite node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    /// `left ∘ right`: `right` is evaluated first and fed to `left`
    Compose,
}

impl Operation {
    /// Whether both operands must depend on the same variable
    pub fn requires_matching_arguments(self) -> bool {
        !matches!(self, Operation::Compose)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Add => "add",
            Operation::Sub => "subtract",
            Operation::Mul => "multiply",
            Operation::Div => "divide",
            Operation::Compose => "compose",
        })
    }
}

/// The input of a leaf: either the bare variable or another expression
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Var(String),
    Expr(Box<Expr>),
}

impl Argument {
    /// The inner expression, if this argument is a composition
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Argument::Var(_) => None,
            Argument::Expr(inner) => Some(inner.as_ref()),
        }
    }
}

#[derive(Debug)]
pub struct Expr {
    pub kind: ExprKind,
    /// Independent variable the whole subtree depends on (cached at construction)
    variable: String,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

// Equality is structural; `variable` is derived from `kind`
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

// =============================================================================
// CLONE AND DROP - iterative, so tree height is bounded by memory, not stack
// =============================================================================

impl Clone for Expr {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Visit(&'a Expr),
            Build(&'a Expr),
        }

        // Post-order: children are copied onto `built` before their parent
        let mut steps = vec![Step::Visit(self)];
        let mut built: Vec<Expr> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(node) => {
                    steps.push(Step::Build(node));
                    match &node.kind {
                        ExprKind::Leaf { argument, .. } => {
                            steps.extend(argument.as_expr().map(Step::Visit));
                        }
                        ExprKind::Composite { left, right, .. } => {
                            steps.push(Step::Visit(right.as_ref()));
                            steps.push(Step::Visit(left.as_ref()));
                        }
                    }
                }
                Step::Build(node) => {
                    let kind = match &node.kind {
                        ExprKind::Leaf { leaf, argument } => ExprKind::Leaf {
                            leaf: leaf.clone(),
                            argument: match argument {
                                Argument::Var(name) => Argument::Var(name.clone()),
                                Argument::Expr(_) => Argument::Expr(Box::new(take_built(&mut built))),
                            },
                        },
                        ExprKind::Composite { op, .. } => {
                            let right = take_built(&mut built);
                            let left = take_built(&mut built);
                            ExprKind::Composite {
                                op: *op,
                                left: Box::new(left),
                                right: Box::new(right),
                            }
                        }
                    };
                    built.push(Expr {
                        kind,
                        variable: node.variable.clone(),
                    });
                }
            }
        }
        take_built(&mut built)
    }
}

fn take_built(built: &mut Vec<Expr>) -> Expr {
    match built.pop() {
        Some(expr) => expr,
        None => unreachable!("every Build step follows the copies of its children"),
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        fn drain_children(kind: &mut ExprKind, queue: &mut Vec<Box<Expr>>) {
            match kind {
                ExprKind::Leaf { argument, .. } => {
                    if let Argument::Expr(inner) =
                        std::mem::replace(argument, Argument::Var(String::new()))
                    {
                        queue.push(inner);
                    }
                }
                ExprKind::Composite { left, right, .. } => {
                    for child in [left, right] {
                        if child.has_children() {
                            queue.push(std::mem::replace(child, Box::new(Expr::placeholder())));
                        }
                    }
                }
            }
        }

        let mut work_queue = Vec::new();
        drain_children(&mut self.kind, &mut work_queue);
        while let Some(mut child) = work_queue.pop() {
            drain_children(&mut child.kind, &mut work_queue);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Elementary function applied to its argument
    Leaf { leaf: Leaf, argument: Argument },

    /// Binary combination of two sub-expressions
    Composite {
        op: Operation,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    // Leaf constructors

    /// Polynomial in `x`, coefficients highest degree first
    ///
    /// # Example
    /// ```ignore
    /// let p = Expr::polynomial([2.0, 0.0, 3.0, -1.0])?;
    /// assert_eq!(p.render()?, "2x^3 + 3x - 1");
    /// ```
    pub fn polynomial(coefficients: impl Into<Vec<f64>>) -> Result<Self, DiffError> {
        Ok(Self::leaf(Leaf::polynomial(coefficients.into())?))
    }

    /// `coefficient·base^x`; fails unless `base > 0`
    pub fn exponential(coefficient: f64, base: f64) -> Result<Self, DiffError> {
        Ok(Self::leaf(Leaf::exponential(coefficient, base)?))
    }

    /// `coefficient·sin(x)` or `coefficient·cos(x)`, flavor given by name
    /// (`"s"`, `"sin"`, `"sine"`, `"c"`, `"cos"`, `"cosine"`)
    pub fn trigonometric(coefficient: f64, flavor: &str) -> Result<Self, DiffError> {
        let flavor: Flavor = flavor.parse()?;
        Ok(Self::leaf(Leaf::trigonometric(coefficient, flavor)?))
    }

    pub fn sine(coefficient: f64) -> Result<Self, DiffError> {
        Ok(Self::leaf(Leaf::trigonometric(coefficient, Flavor::Sine)?))
    }

    pub fn cosine(coefficient: f64) -> Result<Self, DiffError> {
        Ok(Self::leaf(Leaf::trigonometric(coefficient, Flavor::Cosine)?))
    }

    /// `coefficient·x^exponent` for any finite real exponent
    pub fn real_power(coefficient: f64, exponent: f64) -> Result<Self, DiffError> {
        Ok(Self::leaf(Leaf::real_power(coefficient, exponent)?))
    }

    /// `log_base(x)`; fails unless `base > 0` and `base != 1`
    pub fn logarithm(base: f64) -> Result<Self, DiffError> {
        Ok(Self::leaf(Leaf::logarithm(base)?))
    }

    fn leaf(leaf: Leaf) -> Self {
        Self::from_leaf(leaf, Argument::Var(DEFAULT_VARIABLE.to_string()))
    }

    /// Wrap an already validated leaf
    pub(crate) fn from_leaf(leaf: Leaf, argument: Argument) -> Self {
        let variable = match &argument {
            Argument::Var(name) => name.clone(),
            Argument::Expr(inner) => inner.variable.clone(),
        };
        Expr {
            kind: ExprKind::Leaf { leaf, argument },
            variable,
        }
    }

    /// Combine two expressions under `op`
    ///
    /// Every operation except `Compose` requires both operands to depend on the
    /// same variable. A composition depends on the variable of its inner operand.
    pub(crate) fn composite(op: Operation, left: Expr, right: Expr) -> Result<Self, DiffError> {
        if op.requires_matching_arguments() && left.variable != right.variable {
            return Err(DiffError::ArgumentMismatch {
                op,
                left: left.variable.clone(),
                right: right.variable.clone(),
            });
        }
        let variable = match op {
            Operation::Compose => right.variable.clone(),
            _ => left.variable.clone(),
        };
        Ok(Expr {
            kind: ExprKind::Composite {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            variable,
        })
    }

    // Accessors

    /// Independent variable this expression ultimately depends on
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Symbolic argument of this expression
    ///
    /// For a leaf this is its own argument. A composition's argument is its inner
    /// expression; the arithmetic combinations share the argument of their left
    /// operand.
    pub fn argument(&self) -> Argument {
        let mut node = self;
        loop {
            match &node.kind {
                ExprKind::Leaf { argument, .. } => return argument.clone(),
                ExprKind::Composite {
                    op: Operation::Compose,
                    right,
                    ..
                } => return Argument::Expr(right.clone()),
                ExprKind::Composite { left, .. } => node = left.as_ref(),
            }
        }
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            ExprKind::Leaf { leaf, .. } => Some(leaf),
            ExprKind::Composite { .. } => None,
        }
    }

    pub fn operation(&self) -> Option<Operation> {
        match &self.kind {
            ExprKind::Leaf { .. } => None,
            ExprKind::Composite { op, .. } => Some(*op),
        }
    }

    /// Left and right operands of a composite node
    pub fn operands(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Leaf { .. } => None,
            ExprKind::Composite { left, right, .. } => Some((left.as_ref(), right.as_ref())),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ExprKind::Composite { .. })
    }

    fn has_children(&self) -> bool {
        match &self.kind {
            ExprKind::Leaf { argument, .. } => argument.as_expr().is_some(),
            ExprKind::Composite { .. } => true,
        }
    }

    /// Childless stand-in left behind when a node's children are detached
    fn placeholder() -> Expr {
        Expr {
            kind: ExprKind::Leaf {
                leaf: Leaf::Polynomial {
                    coefficients: Vec::new(),
                },
                argument: Argument::Var(String::new()),
            },
            variable: String::new(),
        }
    }

    // Transformations

    /// `self ∘ inner`, evaluating `inner` first
    ///
    /// A leaf composes into a leaf of the same family whose argument is `inner`
    /// (nested when the leaf is already composed); all other parameters are kept.
    /// A composite becomes a `Compose` node. `self` is never modified.
    ///
    /// # Example
    /// ```ignore
    /// let cube = Expr::real_power(1.0, 3.0)?;
    /// let shifted = Expr::polynomial([1.0, 0.0, 1.0])?;
    /// assert_eq!(cube.compose(&shifted).render()?, "(x^2 + 1)^3");
    /// ```
    pub fn compose(&self, inner: &Expr) -> Expr {
        // Walk down the chain of composed leaves to the bare variable (or a composite)
        let mut wrappers = Vec::new();
        let mut node = self;
        while let ExprKind::Leaf {
            leaf,
            argument: Argument::Expr(next),
        } = &node.kind
        {
            wrappers.push(leaf);
            node = next.as_ref();
        }

        let mut result = match &node.kind {
            ExprKind::Leaf { leaf, .. } => {
                Expr::from_leaf(leaf.clone(), Argument::Expr(Box::new(inner.clone())))
            }
            ExprKind::Composite { .. } => Expr {
                kind: ExprKind::Composite {
                    op: Operation::Compose,
                    left: Box::new(node.clone()),
                    right: Box::new(inner.clone()),
                },
                variable: inner.variable.clone(),
            },
        };
        for leaf in wrappers.into_iter().rev() {
            result = Expr::from_leaf(leaf.clone(), Argument::Expr(Box::new(result)));
        }
        result
    }

    /// Rename the independent variable of the whole tree
    ///
    /// # Example
    /// ```ignore
    /// let p = Expr::polynomial([1.0, 0.0])?.in_var("y")?;
    /// assert_eq!(p.variable(), "y");
    /// ```
    pub fn in_var(&self, name: &str) -> Result<Expr, DiffError> {
        if !is_identifier(name) {
            return Err(DiffError::validation(
                "variable",
                format!("'{}' is not a valid variable name", name),
            ));
        }
        if self.max_depth() > DEFAULT_MAX_DEPTH {
            return Err(DiffError::RecursionLimitExceeded {
                limit: DEFAULT_MAX_DEPTH,
            });
        }
        Ok(self.renamed(name))
    }

    fn renamed(&self, name: &str) -> Expr {
        match &self.kind {
            ExprKind::Leaf { leaf, argument } => {
                let argument = match argument {
                    Argument::Var(_) => Argument::Var(name.to_string()),
                    Argument::Expr(inner) => Argument::Expr(Box::new(inner.renamed(name))),
                };
                Expr::from_leaf(leaf.clone(), argument)
            }
            ExprKind::Composite { op, left, right } => Expr {
                kind: ExprKind::Composite {
                    op: *op,
                    left: Box::new(left.renamed(name)),
                    right: Box::new(right.renamed(name)),
                },
                variable: name.to_string(),
            },
        }
    }

    // Analysis methods

    /// Count the total number of nodes, including the nodes of composed arguments
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            match &node.kind {
                ExprKind::Leaf { argument, .. } => pending.extend(argument.as_expr()),
                ExprKind::Composite { left, right, .. } => {
                    pending.push(left);
                    pending.push(right);
                }
            }
        }
        count
    }

    /// Maximum nesting depth; a bare leaf has depth 1
    pub fn max_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match &node.kind {
                ExprKind::Leaf { argument, .. } => {
                    if let Some(inner) = argument.as_expr() {
                        pending.push((inner, depth + 1));
                    }
                }
                ExprKind::Composite { left, right, .. } => {
                    pending.push((left.as_ref(), depth + 1));
                    pending.push((right.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }
}

/// Step one level deeper into a tree walk, failing once `limit` is reached
#[inline]
pub(crate) fn descend(depth: usize, limit: usize) -> Result<usize, DiffError> {
    if depth >= limit {
        Err(DiffError::RecursionLimitExceeded { limit })
    } else {
        Ok(depth + 1)
    }
}

/// A bare symbol name such as `x`, `t` or `theta_1`
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
