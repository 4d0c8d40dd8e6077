use thiserror::Error;

use crate::language::{BinaryOperator, Kind, Type};

/// Raised by the node factories when the requested shape is not a valid
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("{role} must be a boolean expression, not {found}")]
    NotBoolean { role: &'static str, found: Type },

    #[error("the continue label of a loop must be void, not {0}")]
    ContinueNotVoid(Type),

    #[error("cannot assign a value of type {from} to {to}")]
    NotAssignable { to: Type, from: Type },

    #[error("type {0} does not support iteration")]
    NotEnumerable(Type),

    #[error("type {0} does not implement IDisposable")]
    NotDisposable(Type),

    #[error("a {0:?} expression cannot be assigned to")]
    NotWritable(Kind),

    #[error("type {0} is not an array")]
    NotArray(Type),

    #[error("{0:?} has no compound assignment form")]
    NoCompoundForm(BinaryOperator),

    #[error("{0:?} has no checked form")]
    NoCheckedForm(BinaryOperator),

    #[error("a block must contain at least one expression")]
    EmptyBlock,

    #[error("conditional branches have different types, {0} and {1}")]
    BranchMismatch(Type, Type),

    #[error("a try expression needs a catch handler, a fault or a finally block")]
    EmptyTry,

    #[error("expected a constructor call, found {0:?}")]
    NotNew(Kind),

    #[error("expected a quoted lambda, found {0:?}")]
    NotLambda(Kind),
}
