use thiserror::Error;

use crate::language::{
    BinaryOperator, ConstructionError, Form, Kind, Named, Type, UnaryOperator, Value,
};

/// Failures while evaluating a tree. Host objects return
/// [`EvaluationError::Thrown`] to raise an exception the tree itself can
/// catch; an exception nothing catches comes back out as
/// [`EvaluationError::Uncaught`].
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error("{0:?} expressions cannot be evaluated")]
    Unsupported(Kind),

    #[error("variable {0} is not in scope")]
    Unbound(String),

    #[error("type {ty} has no member {name}")]
    MissingMember { ty: Type, name: String },

    #[error("object reference not set to an instance of an object")]
    NullReference,

    #[error("unable to cast a value of type {from} to {to}")]
    InvalidCast { from: Type, to: Type },

    #[error("arithmetic operation resulted in an overflow")]
    Overflow,

    #[error("attempted to divide by zero")]
    DivideByZero,

    #[error("index {0} was outside the bounds of the array")]
    IndexOutOfRange(i64),

    #[error("operator {operator:?} cannot be applied to {left} and {right}")]
    Mismatch {
        operator: BinaryOperator,
        left: Type,
        right: Type,
    },

    #[error("operator {operator:?} cannot be applied to {operand}")]
    Operand {
        operator: UnaryOperator,
        operand: Type,
    },

    #[error("expected a boolean, found {0}")]
    NotBoolean(Type),

    #[error("no enclosing label {0} to jump to")]
    UnresolvedLabel(String),

    #[error("exception of type {} was thrown", .0.type_of())]
    Thrown(Value),

    #[error("unhandled exception of type {}", .0.type_of())]
    Uncaught(Value),

    #[error("expected {expected} arguments, found {found}")]
    ArgumentCount { expected: usize, found: usize },

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl EvaluationError {
    /// The runtime exception a failure raises inside the tree, for the
    /// failures a `catch` can handle.
    pub fn exception_type(&self) -> Option<Type> {
        let name = match self {
            EvaluationError::NullReference => "NullReferenceException",
            EvaluationError::InvalidCast { .. } => "InvalidCastException",
            EvaluationError::Overflow => "OverflowException",
            EvaluationError::DivideByZero => "DivideByZeroException",
            EvaluationError::IndexOutOfRange(_) => "IndexOutOfRangeException",
            _ => return None,
        };
        Some(
            Named::new(name, Form::Class)
                .deriving(Type::exception())
                .into(),
        )
    }
}
