//! Loop-shaped nodes that keep their natural syntax for writing and lower
//! themselves to primitive nodes for execution.

use crate::language::factory::require_continue;
use crate::language::*;

fn loop_type(break_target: &Option<LabelTarget>) -> Type {
    break_target
        .as_ref()
        .map_or(Type::Void, |target| target.ty().clone())
}

fn require_test(test: &Expression) -> Result<(), ConstructionError> {
    let found = test.ty();
    if found == Type::Boolean {
        Ok(())
    } else {
        Err(ConstructionError::NotBoolean {
            role: "the test of a loop",
            found,
        })
    }
}

/// `for (T v = initializer; test; step) body`
#[derive(Debug)]
pub struct For {
    pub variable: Parameter,
    pub initializer: Expression,
    pub test: Expression,
    pub step: Expression,
    pub body: Expression,
    pub break_target: Option<LabelTarget>,
    pub continue_target: Option<LabelTarget>,
}

impl For {
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        variable: Parameter,
        initializer: Expression,
        test: Expression,
        step: Expression,
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<For, ConstructionError> {
        require_continue(&continue_target)?;
        let to = variable
            .ty()
            .clone();
        let from = initializer.ty();
        if !to.is_assignable_from(&from) {
            return Err(ConstructionError::NotAssignable { to, from });
        }
        require_test(&test)?;

        Ok(For {
            variable,
            initializer,
            test,
            step,
            body,
            break_target,
            continue_target,
        })
    }

    pub fn ty(&self) -> Type {
        loop_type(&self.break_target)
    }
}

/// `foreach (T v in enumerable) body`
#[derive(Debug)]
pub struct ForEach {
    pub variable: Parameter,
    pub enumerable: Expression,
    pub body: Expression,
    pub break_target: Option<LabelTarget>,
    pub continue_target: Option<LabelTarget>,
}

impl ForEach {
    pub fn create(
        variable: Parameter,
        enumerable: Expression,
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<ForEach, ConstructionError> {
        require_continue(&continue_target)?;
        let ty = enumerable.ty();
        if !ty.supports_iteration() {
            return Err(ConstructionError::NotEnumerable(ty));
        }

        Ok(ForEach {
            variable,
            enumerable,
            body,
            break_target,
            continue_target,
        })
    }

    pub fn ty(&self) -> Type {
        loop_type(&self.break_target)
    }
}

/// `while (test) body`
#[derive(Debug)]
pub struct While {
    pub test: Expression,
    pub body: Expression,
    pub break_target: Option<LabelTarget>,
    pub continue_target: Option<LabelTarget>,
}

impl While {
    pub fn create(
        test: Expression,
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<While, ConstructionError> {
        require_continue(&continue_target)?;
        require_test(&test)?;

        Ok(While {
            test,
            body,
            break_target,
            continue_target,
        })
    }

    pub fn ty(&self) -> Type {
        loop_type(&self.break_target)
    }
}

/// `do body while (test);`
#[derive(Debug)]
pub struct DoWhile {
    pub body: Expression,
    pub test: Expression,
    pub break_target: Option<LabelTarget>,
    pub continue_target: Option<LabelTarget>,
}

impl DoWhile {
    pub fn create(
        body: Expression,
        test: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<DoWhile, ConstructionError> {
        require_continue(&continue_target)?;
        require_test(&test)?;

        Ok(DoWhile {
            body,
            test,
            break_target,
            continue_target,
        })
    }

    pub fn ty(&self) -> Type {
        loop_type(&self.break_target)
    }
}

/// `using (resource) body`
#[derive(Debug)]
pub struct Using {
    pub resource: Expression,
    pub body: Expression,
}

impl Using {
    pub fn create(resource: Expression, body: Expression) -> Result<Using, ConstructionError> {
        let ty = resource.ty();
        if !ty.is_disposable() {
            return Err(ConstructionError::NotDisposable(ty));
        }

        Ok(Using { resource, body })
    }
}

impl Expression {
    #[allow(clippy::too_many_arguments)]
    pub fn for_loop(
        variable: Parameter,
        initializer: Expression,
        test: Expression,
        step: Expression,
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<Expression, ConstructionError> {
        let node = For::create(
            variable,
            initializer,
            test,
            step,
            body,
            break_target,
            continue_target,
        )?;
        Ok(Expression::new(Node::For(node)))
    }

    pub fn for_each(
        variable: Parameter,
        enumerable: Expression,
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<Expression, ConstructionError> {
        let node = ForEach::create(variable, enumerable, body, break_target, continue_target)?;
        Ok(Expression::new(Node::ForEach(node)))
    }

    pub fn while_loop(
        test: Expression,
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<Expression, ConstructionError> {
        let node = While::create(test, body, break_target, continue_target)?;
        Ok(Expression::new(Node::While(node)))
    }

    pub fn do_while(
        body: Expression,
        test: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<Expression, ConstructionError> {
        let node = DoWhile::create(body, test, break_target, continue_target)?;
        Ok(Expression::new(Node::DoWhile(node)))
    }

    pub fn using(resource: Expression, body: Expression) -> Result<Expression, ConstructionError> {
        let node = Using::create(resource, body)?;
        Ok(Expression::new(Node::Using(node)))
    }
}
