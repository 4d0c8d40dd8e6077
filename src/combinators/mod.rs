//! Composing lambdas by splicing their bodies together

use thiserror::Error;

use crate::language::{ConstructionError, Type};

mod combine;
mod predicate;

pub use combine::*;
pub use predicate::*;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("lambdas take {0} and {1} parameters")]
    Arity(usize, usize),

    #[error("parameter {position} is {left} in one lambda and {right} in the other")]
    Mismatch {
        position: usize,
        left: Type,
        right: Type,
    },

    #[error("expected a lambda with a single parameter, found {0}")]
    NotUnary(usize),

    #[error("expected a lambda returning bool, found {0}")]
    NotPredicate(Type),

    #[error(transparent)]
    Construction(#[from] ConstructionError),
}
