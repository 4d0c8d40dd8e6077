#[cfg(test)]
mod verify {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use exprwriter::evaluation::{EvaluationError, Instance, Interpreter};
    use exprwriter::language::*;
    use exprwriter::reduction::lower_lambda;

    fn hit() -> Method {
        Method::function(Type::class("Counter"), "Hit", Vec::new(), Type::Void)
    }

    fn hit_call() -> Expression {
        Expression::call_static(hit(), Vec::new())
    }

    /// An interpreter whose `Counter.Hit()` bumps the returned cell.
    fn counting() -> (Interpreter, Rc<Cell<usize>>) {
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        let mut interpreter = Interpreter::new();
        interpreter.define("Counter.Hit", move |_| {
            counter.set(counter.get() + 1);
            Ok(Value::Void)
        });
        (interpreter, hits)
    }

    fn statements(expressions: Vec<Expression>) -> Expression {
        Expression::block_typed(Type::Void, Vec::new(), expressions).unwrap()
    }

    fn for_hits(
        l: i32,
        body: impl Fn(&Parameter) -> Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> usize {
        let limit = Parameter::new(Type::Int32, "l");
        let i = Parameter::new(Type::Int32, "i");
        let looping = Expression::for_loop(
            i.clone(),
            Expression::constant(0),
            Expression::less_than(i.expression(), limit.expression()),
            Expression::pre_increment_assign(i.expression()).unwrap(),
            body(&i),
            break_target,
            continue_target,
        )
        .unwrap();
        let lambda = Lambda::new(looping, vec![limit]);

        let (mut interpreter, hits) = counting();
        interpreter
            .invoke(&lambda, vec![Value::Int32(l)])
            .unwrap();
        hits.get()
    }

    #[test]
    fn for_runs_its_body_once_per_iteration() {
        assert_eq!(for_hits(10, |_| hit_call(), None, None), 10);
        assert_eq!(for_hits(0, |_| hit_call(), None, None), 0);
    }

    #[test]
    fn for_break_leaves_the_loop() {
        let stop = LabelTarget::new("stop");
        let target = stop.clone();
        let hits = for_hits(
            10,
            move |i| {
                statements(vec![
                    Expression::if_then(
                        Expression::equal(i.expression(), Expression::constant(5)),
                        Expression::break_to(target.clone()),
                    )
                    .unwrap(),
                    hit_call(),
                ])
            },
            Some(stop),
            None,
        );
        assert_eq!(hits, 5);
    }

    #[test]
    fn for_continue_still_steps() {
        let next = LabelTarget::new("next");
        let target = next.clone();
        let hits = for_hits(
            10,
            move |i| {
                statements(vec![
                    Expression::if_then(
                        Expression::equal(
                            Expression::modulo(i.expression(), Expression::constant(2)),
                            Expression::constant(0),
                        ),
                        Expression::continue_to(target.clone()),
                    )
                    .unwrap(),
                    hit_call(),
                ])
            },
            None,
            Some(next),
        );
        assert_eq!(hits, 5);
    }

    #[test]
    fn while_tests_before_each_iteration() {
        let n = Parameter::new(Type::Int32, "n");
        let body = Expression::block(vec![
            Expression::while_loop(
                Expression::greater_than(n.expression(), Expression::constant(0)),
                statements(vec![
                    Expression::pre_decrement_assign(n.expression()).unwrap(),
                    hit_call(),
                ]),
                None,
                None,
            )
            .unwrap(),
            n.expression(),
        ])
        .unwrap();
        let lambda = Lambda::new(body, vec![n]);

        let (mut interpreter, hits) = counting();
        let result = interpreter
            .invoke(&lambda, vec![Value::Int32(7)])
            .unwrap();
        assert_eq!(result, Value::Int32(0));
        assert_eq!(hits.get(), 7);

        let result = interpreter
            .invoke(&lambda, vec![Value::Int32(-3)])
            .unwrap();
        assert_eq!(result, Value::Int32(-3));
        assert_eq!(hits.get(), 7);
    }

    #[test]
    fn do_while_runs_at_least_once() {
        let n = Parameter::new(Type::Int32, "n");
        let body = Expression::do_while(
            statements(vec![
                hit_call(),
                Expression::pre_decrement_assign(n.expression()).unwrap(),
            ]),
            Expression::greater_than(n.expression(), Expression::constant(0)),
            None,
            None,
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![n]);

        let (mut interpreter, hits) = counting();
        interpreter
            .invoke(&lambda, vec![Value::Int32(0)])
            .unwrap();
        assert_eq!(hits.get(), 1);

        interpreter
            .invoke(&lambda, vec![Value::Int32(4)])
            .unwrap();
        assert_eq!(hits.get(), 5);
    }

    #[test]
    fn loop_with_valued_break_yields_the_value() {
        let n = Parameter::new(Type::Int32, "n");
        let found = LabelTarget::typed(Type::Int32, Some("found"));
        let body = Expression::while_loop(
            Expression::constant(true),
            Expression::if_then(
                Expression::greater_than(
                    Expression::multiply(n.expression(), n.expression()),
                    Expression::constant(50),
                ),
                Expression::jump(GotoKind::Break, found.clone(), Some(n.expression())),
            )
            .and_then(|test| {
                Expression::block_typed(
                    Type::Void,
                    Vec::new(),
                    vec![test, Expression::pre_increment_assign(n.expression())?],
                )
            })
            .unwrap(),
            Some(found),
            None,
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![n]);

        let result = Interpreter::new()
            .invoke(&lambda, vec![Value::Int32(1)])
            .unwrap();
        assert_eq!(result, Value::Int32(8));
    }

    fn summing(source: Parameter, variable: Parameter, body: impl FnOnce(&Parameter, &Parameter) -> Expression) -> Lambda {
        let sum = Parameter::new(Type::Int32, "sum");
        let looping = Expression::for_each(
            variable.clone(),
            source.expression(),
            body(&sum, &variable),
            None,
            None,
        )
        .unwrap();
        let block = Expression::block_with(
            vec![sum.clone()],
            vec![
                Expression::assign(sum.expression(), Expression::constant(0)).unwrap(),
                looping,
                sum.expression(),
            ],
        )
        .unwrap();
        Lambda::new(block, vec![source])
    }

    fn accumulate(sum: &Parameter, item: &Parameter) -> Expression {
        Expression::compound(BinaryOperator::Add, sum.expression(), item.expression()).unwrap()
    }

    #[test]
    fn foreach_over_an_array() {
        let items = Parameter::new(Type::array(Type::Int32), "items");
        let item = Parameter::new(Type::Int32, "item");
        let lambda = summing(items, item, accumulate);

        let array = Value::array(
            Type::Int32,
            vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)],
        );
        let result = Interpreter::new()
            .invoke(&lambda, vec![array])
            .unwrap();
        assert_eq!(result, Value::Int32(6));

        let empty = Value::array(Type::Int32, Vec::new());
        let result = Interpreter::new()
            .invoke(&lambda, vec![empty])
            .unwrap();
        assert_eq!(result, Value::Int32(0));
    }

    /// A sequence of numbers that counts how often its enumerators are
    /// disposed.
    struct Numbers {
        ty: Type,
        items: Vec<i32>,
        disposed: Rc<Cell<usize>>,
    }

    struct Cursor {
        items: Vec<i32>,
        position: Cell<usize>,
        disposed: Rc<Cell<usize>>,
    }

    impl Object for Numbers {
        fn type_of(&self) -> Type {
            self.ty
                .clone()
        }

        fn invoke(&self, method: &Method, _arguments: &[Value]) -> Result<Value, EvaluationError> {
            match method
                .name
                .as_str()
            {
                "GetEnumerator" => Ok(Value::Object(Rc::new(Cursor {
                    items: self
                        .items
                        .clone(),
                    position: Cell::new(0),
                    disposed: self
                        .disposed
                        .clone(),
                }))),
                _ => Err(EvaluationError::MissingMember {
                    ty: self.type_of(),
                    name: method
                        .name
                        .clone(),
                }),
            }
        }
    }

    impl Object for Cursor {
        fn type_of(&self) -> Type {
            Type::enumerator_of(Type::Int32)
        }

        fn invoke(&self, method: &Method, _arguments: &[Value]) -> Result<Value, EvaluationError> {
            match method
                .name
                .as_str()
            {
                "MoveNext" => {
                    let next = self
                        .position
                        .get()
                        + 1;
                    self.position
                        .set(next);
                    Ok(Value::Boolean(next <= self.items.len()))
                }
                "Dispose" => {
                    self.disposed
                        .set(
                            self.disposed
                                .get()
                                + 1,
                        );
                    Ok(Value::Void)
                }
                _ => Err(EvaluationError::MissingMember {
                    ty: self.type_of(),
                    name: method
                        .name
                        .clone(),
                }),
            }
        }

        fn get(&self, member: &Member) -> Result<Value, EvaluationError> {
            match member
                .name
                .as_str()
            {
                "Current" => Ok(Value::Int32(self.items[self.position.get() - 1])),
                _ => Err(EvaluationError::MissingMember {
                    ty: self.type_of(),
                    name: member
                        .name
                        .clone(),
                }),
            }
        }
    }

    fn numbers(ty: Type, items: &[i32]) -> (Value, Rc<Cell<usize>>) {
        let disposed = Rc::new(Cell::new(0));
        let value = Value::Object(Rc::new(Numbers {
            ty,
            items: items.to_vec(),
            disposed: disposed.clone(),
        }));
        (value, disposed)
    }

    fn sequence() -> Type {
        Named::new("Numbers", Form::Class)
            .implementing(Type::enumerable_of(Type::Int32))
            .into()
    }

    #[test]
    fn foreach_over_an_enumerable_disposes_the_enumerator() {
        let source = Parameter::new(sequence(), "numbers");
        let item = Parameter::new(Type::Int32, "item");
        let lambda = summing(source, item, accumulate);

        let (value, disposed) = numbers(sequence(), &[4, 5, 6]);
        let result = Interpreter::new()
            .invoke(&lambda, vec![value])
            .unwrap();
        assert_eq!(result, Value::Int32(15));
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn foreach_over_an_untyped_enumerable() {
        let source = Parameter::new(Type::enumerable(), "numbers");
        let item = Parameter::new(Type::Int32, "item");
        let lambda = summing(source, item, accumulate);

        let (value, disposed) = numbers(sequence(), &[1, 2]);
        let result = Interpreter::new()
            .invoke(&lambda, vec![value])
            .unwrap();
        assert_eq!(result, Value::Int32(3));
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn foreach_disposes_when_leaving_early() {
        let source = Parameter::new(sequence(), "numbers");
        let item = Parameter::new(Type::Int32, "item");
        let stop = LabelTarget::new("stop");
        let sum = Parameter::new(Type::Int32, "sum");

        let looping = Expression::for_each(
            item.clone(),
            source.expression(),
            statements(vec![
                Expression::if_then(
                    Expression::greater_than(item.expression(), Expression::constant(2)),
                    Expression::break_to(stop.clone()),
                )
                .unwrap(),
                accumulate(&sum, &item),
            ]),
            Some(stop),
            None,
        )
        .unwrap();
        let body = Expression::block_with(
            vec![sum.clone()],
            vec![looping, sum.expression()],
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![source]);

        let (value, disposed) = numbers(sequence(), &[1, 2, 3, 4]);
        let result = Interpreter::new()
            .invoke(&lambda, vec![value])
            .unwrap();
        assert_eq!(result, Value::Int32(3));
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn foreach_disposes_when_the_body_throws() {
        let source = Parameter::new(sequence(), "numbers");
        let item = Parameter::new(Type::Int32, "item");
        let lambda = summing(source, item, |_, _| {
            Expression::throw(Expression::new_object(Type::exception(), Vec::new()))
        });

        let (value, disposed) = numbers(sequence(), &[1]);
        let result = Interpreter::new().invoke(&lambda, vec![value]);
        assert!(matches!(result, Err(EvaluationError::Uncaught(_))));
        assert_eq!(disposed.get(), 1);
    }

    /// A resource counting its disposals.
    struct Resource {
        disposed: Rc<Cell<usize>>,
    }

    fn stream() -> Type {
        Named::new("Stream", Form::Class)
            .implementing(Type::disposable())
            .into()
    }

    impl Object for Resource {
        fn type_of(&self) -> Type {
            stream()
        }

        fn invoke(&self, method: &Method, _arguments: &[Value]) -> Result<Value, EvaluationError> {
            match method
                .name
                .as_str()
            {
                "Dispose" => {
                    self.disposed
                        .set(
                            self.disposed
                                .get()
                                + 1,
                        );
                    Ok(Value::Void)
                }
                _ => Err(EvaluationError::Thrown(Value::Object(Rc::new(Instance::new(
                    Type::exception(),
                ))))),
            }
        }
    }

    fn using_lambda(body: impl FnOnce(&Parameter) -> Expression) -> Lambda {
        let s = Parameter::new(stream(), "s");
        let using = Expression::using(s.expression(), body(&s)).unwrap();
        Lambda::new(using, vec![s])
    }

    fn resource() -> (Value, Rc<Cell<usize>>) {
        let disposed = Rc::new(Cell::new(0));
        let value = Value::Object(Rc::new(Resource {
            disposed: disposed.clone(),
        }));
        (value, disposed)
    }

    #[test]
    fn using_disposes_after_the_body() {
        let lambda = using_lambda(|_| hit_call());

        let (mut interpreter, hits) = counting();
        let (value, disposed) = resource();
        interpreter
            .invoke(&lambda, vec![value])
            .unwrap();
        assert_eq!(hits.get(), 1);
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn using_disposes_when_the_body_throws() {
        let fail = Method::instance(stream(), "Fail", Vec::new(), Type::Void);
        let lambda = using_lambda(|s| Expression::call(s.expression(), fail, Vec::new()));

        let (value, disposed) = resource();
        let result = Interpreter::new().invoke(&lambda, vec![value]);
        assert!(matches!(result, Err(EvaluationError::Uncaught(_))));
        assert_eq!(disposed.get(), 1);
    }

    #[test]
    fn using_tolerates_null() {
        let lambda = using_lambda(|_| hit_call());

        let (mut interpreter, hits) = counting();
        interpreter
            .invoke(&lambda, vec![Value::Null])
            .unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn lowered_lambdas_behave_the_same() {
        let limit = Parameter::new(Type::Int32, "l");
        let i = Parameter::new(Type::Int32, "i");
        let looping = Expression::for_loop(
            i.clone(),
            Expression::constant(0),
            Expression::less_than(i.expression(), limit.expression()),
            Expression::pre_increment_assign(i.expression()).unwrap(),
            hit_call(),
            None,
            None,
        )
        .unwrap();
        let lambda = Lambda::new(looping, vec![limit]);
        let lowered = lower_lambda(&lambda).unwrap();

        let (mut interpreter, hits) = counting();
        interpreter
            .invoke(&lowered, vec![Value::Int32(3)])
            .unwrap();
        assert_eq!(hits.get(), 3);
    }
}
