//! Lowering of the loop-shaped nodes to primitive nodes

use tracing::debug;

use crate::language::rewrite::{walk, Rewrite};
use crate::language::*;

mod foreach;
mod loops;
mod using;

/// A node that can be expressed with primitive nodes only. The result of
/// `reduce()` contains no derived node anywhere in it: nested derived
/// nodes in the body or test are lowered as well.
pub trait Reduce {
    fn reduce(&self) -> Result<Expression, ConstructionError>;
}

impl Expression {
    /// Whether [`Expression::reduce`] would change this node.
    pub fn can_reduce(&self) -> bool {
        self.kind()
            .is_derived()
    }

    /// The primitive equivalent of a derived node. Other nodes come back
    /// unchanged, as the same node.
    pub fn reduce(&self) -> Result<Expression, ConstructionError> {
        match self.node() {
            Node::For(node) => node.reduce(),
            Node::ForEach(node) => node.reduce(),
            Node::While(node) => node.reduce(),
            Node::DoWhile(node) => node.reduce(),
            Node::Using(node) => node.reduce(),
            _ => Ok(self.clone()),
        }
    }
}

struct Lowering;

impl Rewrite for Lowering {
    fn rewrite(&mut self, expression: &Expression) -> Result<Expression, ConstructionError> {
        if expression.can_reduce() {
            debug!(kind = ?expression.kind(), "Lowering");
            expression.reduce()
        } else {
            walk(self, expression)
        }
    }
}

/// Replace every derived node in a tree with its primitive equivalent.
/// Subtrees without derived nodes are shared with the input.
pub fn lower(expression: &Expression) -> Result<Expression, ConstructionError> {
    Lowering.rewrite(expression)
}

/// Lower the body of a lambda.
pub fn lower_lambda(lambda: &Lambda) -> Result<Lambda, ConstructionError> {
    let body = lower(&lambda.body)?;
    if Expression::ptr_eq(&body, &lambda.body) {
        return Ok(lambda.clone());
    }
    Ok(lambda.with_body(body))
}

/// The caller's label, or a fresh one named after the loop.
fn label_or(target: &Option<LabelTarget>, name: &str) -> LabelTarget {
    target
        .clone()
        .unwrap_or_else(|| LabelTarget::new(name))
}

/// The closing label of a lowered loop. A break label carrying a value
/// yields the default of its type when the loop ends normally.
fn closing_label(target: LabelTarget) -> Expression {
    let ty = target
        .ty()
        .clone();
    if ty.is_void() {
        Expression::label(target)
    } else {
        Expression::label_with(target, Some(Expression::default(ty)))
    }
}

/// The synthetic labels that the lowered `Loop` node itself owns.
fn inner_labels() -> (LabelTarget, LabelTarget) {
    (
        LabelTarget::new("inner_loop_break"),
        LabelTarget::new("inner_loop_continue"),
    )
}

/// `value`, converted to `ty` if it is not already of that type.
fn converted(value: Expression, ty: &Type) -> Expression {
    if value.ty() == *ty {
        value
    } else {
        Expression::convert(value, ty.clone())
    }
}
