//! `for`, `while` and `do … while` as labelled infinite loops

use crate::language::*;
use crate::reduction::{closing_label, inner_labels, label_or, lower, Reduce};

impl Reduce for For {
    fn reduce(&self) -> Result<Expression, ConstructionError> {
        let (inner_break, inner_continue) = inner_labels();
        let break_target = label_or(&self.break_target, "for_break");
        let continue_target = label_or(&self.continue_target, "for_continue");

        let body = Expression::block_typed(
            Type::Void,
            Vec::new(),
            vec![
                lower(&self.body)?,
                Expression::label(continue_target),
                lower(&self.step)?,
                Expression::continue_to(inner_continue.clone()),
            ],
        )?;

        let test = Expression::if_then_else(
            lower(&self.test)?,
            body,
            Expression::break_to(inner_break.clone()),
        )?;

        let looping = Expression::infinite(
            Expression::block_typed(Type::Void, Vec::new(), vec![test])?,
            Some(inner_break),
            Some(inner_continue),
        )?;

        Expression::block_typed(
            self.ty(),
            vec![self
                .variable
                .clone()],
            vec![
                Expression::assign(self.variable.expression(), lower(&self.initializer)?)?,
                looping,
                closing_label(break_target),
            ],
        )
    }
}

impl Reduce for While {
    fn reduce(&self) -> Result<Expression, ConstructionError> {
        let (inner_break, inner_continue) = inner_labels();
        let break_target = label_or(&self.break_target, "while_break");
        let continue_target = label_or(&self.continue_target, "while_continue");

        let body = Expression::block_typed(
            Type::Void,
            Vec::new(),
            vec![
                lower(&self.body)?,
                Expression::continue_to(inner_continue.clone()),
            ],
        )?;

        let test = Expression::if_then_else(
            lower(&self.test)?,
            body,
            Expression::break_to(inner_break.clone()),
        )?;

        let looping = Expression::infinite(
            Expression::block_typed(
                Type::Void,
                Vec::new(),
                vec![Expression::label(continue_target), test],
            )?,
            Some(inner_break),
            Some(inner_continue),
        )?;

        Expression::block_typed(
            self.ty(),
            Vec::new(),
            vec![looping, closing_label(break_target)],
        )
    }
}

impl Reduce for DoWhile {
    fn reduce(&self) -> Result<Expression, ConstructionError> {
        let (inner_break, inner_continue) = inner_labels();
        let break_target = label_or(&self.break_target, "do_break");
        let continue_target = label_or(&self.continue_target, "do_continue");

        let test = Expression::if_then_else(
            lower(&self.test)?,
            Expression::continue_to(inner_continue.clone()),
            Expression::break_to(inner_break.clone()),
        )?;

        let looping = Expression::infinite(
            Expression::block_typed(
                Type::Void,
                Vec::new(),
                vec![lower(&self.body)?, Expression::label(continue_target), test],
            )?,
            Some(inner_break),
            Some(inner_continue),
        )?;

        Expression::block_typed(
            self.ty(),
            Vec::new(),
            vec![looping, closing_label(break_target)],
        )
    }
}
