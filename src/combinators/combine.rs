use tracing::debug;

use crate::combinators::CombineError;
use crate::language::rewrite::Rewrite;
use crate::language::*;

/// Substitutes parameters by identity. Parameters not in the mapping, such
/// as those of nested lambdas, are left alone.
struct ParameterRewriter<'a> {
    mapping: Vec<(&'a Parameter, &'a Parameter)>,
}

impl<'a> ParameterRewriter<'a> {
    fn new(candidates: &'a [Parameter], replacements: &'a [Parameter]) -> ParameterRewriter<'a> {
        ParameterRewriter {
            mapping: candidates
                .iter()
                .zip(replacements)
                .collect(),
        }
    }
}

impl Rewrite for ParameterRewriter<'_> {
    fn rewrite_parameter(&mut self, parameter: &Parameter) -> Parameter {
        self.mapping
            .iter()
            .find(|(candidate, _)| *candidate == parameter)
            .map(|(_, replacement)| (*replacement).clone())
            .unwrap_or_else(|| parameter.clone())
    }
}

/// Fresh parameters with the names and types of the given ones.
pub(crate) fn fresh(parameters: &[Parameter]) -> Vec<Parameter> {
    parameters
        .iter()
        .map(Parameter::duplicate)
        .collect()
}

/// The body of a lambda with its own parameters replaced.
pub(crate) fn rebind(lambda: &Lambda, parameters: &[Parameter]) -> Result<Expression, ConstructionError> {
    ParameterRewriter::new(&lambda.parameters, parameters).rewrite(&lambda.body)
}

/// Build a new lambda over fresh copies of the parameters of `lambda`,
/// whose body is whatever `combinator` makes of the original body.
pub fn combine<F>(lambda: &Lambda, combinator: F) -> Result<Lambda, CombineError>
where
    F: FnOnce(Expression) -> Result<Expression, ConstructionError>,
{
    let parameters = fresh(&lambda.parameters);
    let body = combinator(rebind(lambda, &parameters)?)?;

    Ok(Lambda::new(body, parameters))
}

/// Splice two lambdas taking the same parameters into one. Both bodies are
/// rewritten onto a single fresh set of parameters, copied from `first`.
pub fn combine_with<F>(first: &Lambda, second: &Lambda, combinator: F) -> Result<Lambda, CombineError>
where
    F: FnOnce(Expression, Expression) -> Result<Expression, ConstructionError>,
{
    check_compatible(first, second)?;

    debug!(
        parameters = first
            .parameters
            .len(),
        "Combining lambdas"
    );

    let parameters = fresh(&first.parameters);
    let left = rebind(first, &parameters)?;
    let right = rebind(second, &parameters)?;
    let body = combinator(left, right)?;

    Ok(Lambda::new(body, parameters))
}

fn check_compatible(first: &Lambda, second: &Lambda) -> Result<(), CombineError> {
    if first
        .parameters
        .len()
        != second
            .parameters
            .len()
    {
        return Err(CombineError::Arity(
            first
                .parameters
                .len(),
            second
                .parameters
                .len(),
        ));
    }

    for (position, (left, right)) in first
        .parameters
        .iter()
        .zip(&second.parameters)
        .enumerate()
    {
        if left.ty() != right.ty() {
            return Err(CombineError::Mismatch {
                position,
                left: left
                    .ty()
                    .clone(),
                right: right
                    .ty()
                    .clone(),
            });
        }
    }
    Ok(())
}
