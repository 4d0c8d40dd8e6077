#[cfg(test)]
mod verify {
    use pretty_assertions::assert_eq;

    use exprwriter::combinators::{always, and_also, combine, combine_with, never, not, or_else};
    use exprwriter::evaluation::Interpreter;
    use exprwriter::language::*;

    fn positive() -> Lambda {
        let x = Parameter::new(Type::Int32, "x");
        Lambda::new(
            Expression::greater_than(x.expression(), Expression::constant(0)),
            vec![x],
        )
    }

    fn even() -> Lambda {
        let y = Parameter::new(Type::Int32, "y");
        Lambda::new(
            Expression::equal(
                Expression::modulo(y.expression(), Expression::constant(2)),
                Expression::constant(0),
            ),
            vec![y],
        )
    }

    fn answers(predicate: &Lambda, inputs: &[i32]) -> Vec<bool> {
        let mut interpreter = Interpreter::new();
        inputs
            .iter()
            .map(|input| {
                let result = interpreter
                    .invoke(predicate, vec![Value::Int32(*input)])
                    .unwrap();
                result
                    .as_bool()
                    .unwrap()
            })
            .collect()
    }

    const INPUTS: [i32; 4] = [-3, -2, 5, 8];

    #[test]
    fn conjunction() {
        let both = and_also(&positive(), &even()).unwrap();
        assert_eq!(answers(&both, &INPUTS), vec![false, false, false, true]);
    }

    #[test]
    fn disjunction() {
        let either = or_else(&positive(), &even()).unwrap();
        assert_eq!(answers(&either, &INPUTS), vec![false, true, true, true]);
    }

    #[test]
    fn negation() {
        let odd = not(&even()).unwrap();
        assert_eq!(answers(&odd, &INPUTS), vec![true, false, true, false]);
    }

    #[test]
    fn constants_ignore_their_argument() {
        assert_eq!(answers(&always(Type::Int32), &INPUTS), vec![true; 4]);
        assert_eq!(answers(&never(Type::Int32), &INPUTS), vec![false; 4]);

        let mixed = and_also(&always(Type::Int32), &positive()).unwrap();
        assert_eq!(answers(&mixed, &INPUTS), vec![false, false, true, true]);
    }

    #[test]
    fn combined_lambdas_leave_the_originals_alone() {
        let first = positive();
        let second = even();
        let both = and_also(&first, &second).unwrap();

        assert_eq!(both.parameters.len(), 1);
        assert!(both.parameters[0] != first.parameters[0]);
        assert!(both.parameters[0] != second.parameters[0]);

        assert_eq!(answers(&first, &[4]), vec![true]);
        assert_eq!(answers(&second, &[3]), vec![false]);
    }

    #[test]
    fn arbitrary_bodies_can_be_combined() {
        let x = Parameter::new(Type::Int32, "x");
        let double = Lambda::new(
            Expression::multiply(x.expression(), Expression::constant(2)),
            vec![x],
        );

        let shifted = combine(&double, |body| Ok(Expression::add(body, Expression::constant(1)))).unwrap();
        let result = Interpreter::new()
            .invoke(&shifted, vec![Value::Int32(20)])
            .unwrap();
        assert_eq!(result, Value::Int32(41));

        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");
        let difference = Lambda::new(
            Expression::subtract(a.expression(), b.expression()),
            vec![a, b],
        );
        let c = Parameter::new(Type::Int32, "c");
        let d = Parameter::new(Type::Int32, "d");
        let product = Lambda::new(
            Expression::multiply(c.expression(), d.expression()),
            vec![c, d],
        );

        let total = combine_with(&difference, &product, |left, right| {
            Ok(Expression::add(left, right))
        })
        .unwrap();
        let result = Interpreter::new()
            .invoke(&total, vec![Value::Int32(7), Value::Int32(3)])
            .unwrap();
        assert_eq!(result, Value::Int32(4 + 21));
    }
}
