use std::fmt;

use num_bigint::BigInt;

use crate::{builtins::Builtins, namespace::NamespaceId, parse::CodeRange};

/// An identifier (variable or function name) with source location and resolved scope.
///
/// Module-level name lookup checks the global slot first and falls back to the
/// builtin of the same name, so `str = "gulfem"` shadows the `str` type only
/// from the assignment onwards.
#[derive(Debug, Clone)]
pub(crate) struct Identifier {
    pub position: CodeRange,
    pub name: String,
    /// Global slot, set during prepare for names that are assigned somewhere.
    pub slot: Option<NamespaceId>,
    /// Builtin used while the slot is unbound.
    pub builtin: Option<Builtins>,
}

impl Identifier {
    /// Creates a new identifier with unknown scope (to be resolved during prepare phase).
    pub fn new(name: String, position: CodeRange) -> Self {
        Self {
            position,
            name,
            slot: None,
            builtin: None,
        }
    }
}

/// A constant written directly in the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    None,
    Bool(bool),
    Int(i64),
    LongInt(BigInt),
    Float(f64),
    /// An imaginary literal such as `3j`.
    Imag(f64),
    Str(String),
}

/// Binary operators of the supported subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mult,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mult => "*",
        })
    }
}

/// Prefix operators of the supported subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnaryOperator {
    Neg,
    Pos,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Neg => "-",
            Self::Pos => "+",
        })
    }
}

/// An expression in the AST.
#[derive(Debug, Clone)]
pub(crate) enum Expr {
    Literal(Literal),
    Name(Identifier),
    /// Function call expression; the callable is any expression.
    Call {
        callable: Box<ExprLoc>,
        args: Vec<ExprLoc>,
    },
    Op {
        left: Box<ExprLoc>,
        op: Operator,
        right: Box<ExprLoc>,
    },
    Unary {
        op: UnaryOperator,
        operand: Box<ExprLoc>,
    },
    Tuple(Vec<ExprLoc>),
    List(Vec<ExprLoc>),
    Dict(Vec<(ExprLoc, ExprLoc)>),
}

/// An expression together with where it starts in the source.
#[derive(Debug, Clone)]
pub(crate) struct ExprLoc {
    pub position: CodeRange,
    pub expr: Expr,
}

impl ExprLoc {
    pub fn new(position: CodeRange, expr: Expr) -> Self {
        Self { position, expr }
    }
}

/// A statement.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    Expr(ExprLoc),
    Assign { target: Identifier, object: ExprLoc },
}

impl Node {
    /// Where the statement starts, used for tracebacks.
    pub fn position(&self) -> CodeRange {
        match self {
            Self::Expr(expr) => expr.position,
            Self::Assign { target, .. } => target.position,
        }
    }
}
