//! Boolean predicates over a single parameter

use crate::combinators::{combine, combine_with, CombineError};
use crate::language::*;

/// `(T _) => true`
pub fn always(ty: Type) -> Lambda {
    Lambda::new(Expression::constant(true), vec![Parameter::anonymous(ty)])
}

/// `(T _) => false`
pub fn never(ty: Type) -> Lambda {
    Lambda::new(Expression::constant(false), vec![Parameter::anonymous(ty)])
}

pub fn and_also(first: &Lambda, second: &Lambda) -> Result<Lambda, CombineError> {
    require_predicate(first)?;
    require_predicate(second)?;
    combine_with(first, second, |left, right| Ok(Expression::and_also(left, right)))
}

pub fn or_else(first: &Lambda, second: &Lambda) -> Result<Lambda, CombineError> {
    require_predicate(first)?;
    require_predicate(second)?;
    combine_with(first, second, |left, right| Ok(Expression::or_else(left, right)))
}

pub fn not(predicate: &Lambda) -> Result<Lambda, CombineError> {
    require_predicate(predicate)?;
    combine(predicate, |body| Ok(Expression::not(body)))
}

fn require_predicate(lambda: &Lambda) -> Result<(), CombineError> {
    if lambda
        .parameters
        .len()
        != 1
    {
        return Err(CombineError::NotUnary(
            lambda
                .parameters
                .len(),
        ));
    }
    if lambda.returns != Type::Boolean {
        return Err(CombineError::NotPredicate(
            lambda
                .returns
                .clone(),
        ));
    }
    Ok(())
}
