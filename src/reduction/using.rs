//! `using` as try/finally

use crate::language::*;
use crate::reduction::{lower, Reduce};

impl Reduce for Using {
    fn reduce(&self) -> Result<Expression, ConstructionError> {
        let disposable = Parameter::new(Type::disposable(), "disposable");
        let body = lower(&self.body)?;
        let ty = body.ty();

        let finally = Expression::if_then(
            Expression::not_equal(
                disposable.expression(),
                Expression::null(Type::disposable()),
            ),
            Expression::call(disposable.expression(), Method::dispose(), Vec::new()),
        )?;

        Expression::block_typed(
            ty,
            vec![disposable.clone()],
            vec![
                Expression::assign(
                    disposable.expression(),
                    Expression::convert(lower(&self.resource)?, Type::disposable()),
                )?,
                Expression::try_finally(body, finally)?,
            ],
        )
    }
}

#[cfg(test)]
mod check {
    use crate::formatting::to_code;
    use crate::language::*;

    #[test]
    fn resource_is_disposed_in_finally() {
        let stream: Type = Named::new("Stream", Form::Class)
            .implementing(Type::disposable())
            .into();
        let s = Parameter::new(stream.clone(), "s");
        let touch = Method::instance(stream, "Touch", Vec::new(), Type::Void);

        let using = Expression::using(
            s.expression(),
            Expression::call(s.expression(), touch, Vec::new()),
        )
        .unwrap();

        let reduced = using
            .reduce()
            .unwrap();
        let lambda = Lambda::new(reduced, vec![s]);

        let expected = [
            "void (Stream s)",
            "{",
            "\tIDisposable disposable;",
            "",
            "\tdisposable = (IDisposable)s;",
            "\ttry",
            "\t{",
            "\t\ts.Touch();",
            "\t}",
            "\tfinally",
            "\t{",
            "\t\tif (disposable != null)",
            "\t\t{",
            "\t\t\tdisposable.Dispose();",
            "\t\t}",
            "\t}",
            "}",
        ];
        assert_eq!(to_code(&lambda).unwrap(), expected.join("\n"));
    }

    #[test]
    fn value_of_the_body_is_kept() {
        let s = Parameter::new(Type::disposable(), "s");
        let using = Expression::using(s.expression(), Expression::constant(42)).unwrap();

        let reduced = using
            .reduce()
            .unwrap();
        assert_eq!(reduced.ty(), Type::Int32);
    }
}
