//! `foreach` over arrays and enumerable sources

use tracing::debug;

use crate::language::*;
use crate::reduction::{closing_label, converted, inner_labels, label_or, lower, Reduce};

/// How a source is enumerated: the type `GetEnumerator()` is called on,
/// the enumerator it returns, and the element type `Current` yields.
struct Protocol {
    receiver: Type,
    enumerator: Type,
    element: Type,
}

impl Protocol {
    /// Prefer a `GetEnumerator()` found on the source type itself, then
    /// `IEnumerable<T>` when the variable can hold a `T`, then the untyped
    /// `IEnumerable`.
    fn resolve(source: &Type, variable: &Type) -> Protocol {
        if let Some(enumerator) = source
            .named()
            .and_then(|named| {
                named
                    .enumerator
                    .clone()
            })
        {
            let element = enumerator
                .enumerator_element()
                .unwrap_or(Type::Object);
            return Protocol {
                receiver: source.clone(),
                enumerator,
                element,
            };
        }

        if let Some(element) = source.enumerable_element() {
            if variable.is_assignable_from(&element) {
                return Protocol {
                    receiver: Type::enumerable_of(element.clone()),
                    enumerator: Type::enumerator_of(element.clone()),
                    element,
                };
            }
        }

        Protocol {
            receiver: Type::enumerable(),
            enumerator: Type::enumerator(),
            element: Type::Object,
        }
    }
}

impl Reduce for ForEach {
    fn reduce(&self) -> Result<Expression, ConstructionError> {
        let source = self
            .enumerable
            .ty();
        if source.is_array() && source.rank() == 1 {
            self.reduce_array(&source)
        } else {
            self.reduce_enumerable(&source)
        }
    }
}

impl ForEach {
    /// Walk a vector by index. Arrays have no enumerator to dispose.
    fn reduce_array(&self, source: &Type) -> Result<Expression, ConstructionError> {
        debug!(%source, "Indexing over array");

        let (inner_break, inner_continue) = inner_labels();
        let break_target = label_or(&self.break_target, "foreach_break");
        let continue_target = label_or(&self.continue_target, "foreach_continue");

        let array = Parameter::new(source.clone(), "array");
        let index = Parameter::new(Type::Int32, "index");

        let element = Expression::array_index(array.expression(), index.expression())?;
        let step = Expression::assign(
            index.expression(),
            Expression::add(index.expression(), Expression::constant(1)),
        )?;

        let body = Expression::block_typed(
            Type::Void,
            Vec::new(),
            vec![
                Expression::assign(
                    self.variable
                        .expression(),
                    converted(element, self.variable.ty()),
                )?,
                lower(&self.body)?,
                Expression::label(continue_target),
                step,
                Expression::continue_to(inner_continue.clone()),
            ],
        )?;

        let test = Expression::if_then_else(
            Expression::less_than(
                index.expression(),
                Expression::array_length(array.expression())?,
            ),
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
            vec![
                array.clone(),
                index.clone(),
                self.variable
                    .clone(),
            ],
            vec![
                Expression::assign(array.expression(), lower(&self.enumerable)?)?,
                Expression::assign(index.expression(), Expression::constant(0))?,
                looping,
                closing_label(break_target),
            ],
        )
    }

    /// Drive an enumerator, disposing of it however the loop is left.
    fn reduce_enumerable(&self, source: &Type) -> Result<Expression, ConstructionError> {
        let protocol = Protocol::resolve(source, self.variable.ty());
        debug!(
            %source,
            enumerator = %protocol.enumerator,
            "Enumerating"
        );

        let (inner_break, inner_continue) = inner_labels();
        let break_target = label_or(&self.break_target, "foreach_break");
        let continue_target = label_or(&self.continue_target, "foreach_continue");

        let enumerator = Parameter::new(
            protocol
                .enumerator
                .clone(),
            "enumerator",
        );

        let get_enumerator = Expression::call(
            converted(lower(&self.enumerable)?, &protocol.receiver),
            Method::get_enumerator(
                protocol
                    .receiver
                    .clone(),
                protocol
                    .enumerator
                    .clone(),
            ),
            Vec::new(),
        );

        let current = Expression::member(
            enumerator.expression(),
            Member::current(
                protocol
                    .enumerator
                    .clone(),
                protocol
                    .element
                    .clone(),
            ),
        );

        let body = Expression::block_typed(
            Type::Void,
            Vec::new(),
            vec![
                Expression::assign(
                    self.variable
                        .expression(),
                    converted(current, self.variable.ty()),
                )?,
                lower(&self.body)?,
                Expression::label(continue_target),
                Expression::continue_to(inner_continue.clone()),
            ],
        )?;

        let move_next = Expression::call(
            enumerator.expression(),
            Method::move_next(
                protocol
                    .enumerator
                    .clone(),
            ),
            Vec::new(),
        );

        let test = Expression::if_then_else(
            move_next,
            body,
            Expression::break_to(inner_break.clone()),
        )?;

        let looping = Expression::infinite(
            Expression::block_typed(Type::Void, Vec::new(), vec![test])?,
            Some(inner_break),
            Some(inner_continue),
        )?;

        let looping = match disposal(&enumerator)? {
            Some(finally) => Expression::try_finally(looping, finally)?,
            None => looping,
        };

        Expression::block_typed(
            self.ty(),
            vec![
                enumerator.clone(),
                self.variable
                    .clone(),
            ],
            vec![
                Expression::assign(enumerator.expression(), get_enumerator)?,
                looping,
                closing_label(break_target),
            ],
        )
    }
}

/// The clean-up run when the loop is left. An enumerator known to be
/// disposable is disposed directly; a struct that is not disposable needs
/// nothing; anything else is asked at run time.
fn disposal(enumerator: &Parameter) -> Result<Option<Expression>, ConstructionError> {
    let ty = enumerator.ty();

    if ty.is_disposable() {
        let dispose = Expression::call(enumerator.expression(), Method::dispose(), Vec::new());
        return Ok(Some(dispose));
    }

    if ty.is_value_type() {
        return Ok(None);
    }

    let disposable = Parameter::new(Type::disposable(), "disposable");
    let check = Expression::if_then(
        Expression::not_equal(
            disposable.expression(),
            Expression::null(Type::disposable()),
        ),
        Expression::call(disposable.expression(), Method::dispose(), Vec::new()),
    )?;

    let block = Expression::block_typed(
        Type::Void,
        vec![disposable.clone()],
        vec![
            Expression::assign(
                disposable.expression(),
                Expression::type_as(enumerator.expression(), Type::disposable()),
            )?,
            check,
        ],
    )?;
    Ok(Some(block))
}
