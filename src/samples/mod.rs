//! A catalogue of ready-made trees, for trying out the writer from the
//! command line.

use crate::combinators::{and_also, CombineError};
use crate::language::*;

pub type Builder = fn() -> Result<Lambda, CombineError>;

pub struct Sample {
    pub name: &'static str,
    pub summary: &'static str,
    pub build: Builder,
}

static SAMPLES: &[Sample] = &[
    Sample {
        name: "add",
        summary: "Sum of two parameters",
        build: add,
    },
    Sample {
        name: "checked",
        summary: "Checked arithmetic in both branches of a conditional",
        build: checked,
    },
    Sample {
        name: "for",
        summary: "Counting loop calling a static method",
        build: counting,
    },
    Sample {
        name: "foreach",
        summary: "Iterating over a sequence of strings",
        build: iterating,
    },
    Sample {
        name: "while",
        summary: "Halving a number until it reaches one",
        build: halving,
    },
    Sample {
        name: "do",
        summary: "A do/while loop with an early break",
        build: repeating,
    },
    Sample {
        name: "using",
        summary: "Disposing a resource after use",
        build: disposing,
    },
    Sample {
        name: "try",
        summary: "Catch with a filter, and a finally block",
        build: guarded,
    },
    Sample {
        name: "switch",
        summary: "Mapping numbers to names",
        build: naming,
    },
    Sample {
        name: "goto",
        summary: "Jumping forward to a label",
        build: skipping,
    },
    Sample {
        name: "init",
        summary: "Object and collection initializers",
        build: initializing,
    },
    Sample {
        name: "typeof",
        summary: "Exact type test",
        build: exact,
    },
    Sample {
        name: "predicate",
        summary: "Two predicates combined with &&",
        build: predicate,
    },
];

/// Every sample, in catalogue order.
pub fn all() -> &'static [Sample] {
    SAMPLES
}

pub fn find(name: &str) -> Option<&'static Sample> {
    SAMPLES
        .iter()
        .find(|sample| sample.name == name)
}

fn console() -> Method {
    Method::function(
        Type::class("Console"),
        "WriteLine",
        vec![Type::Object],
        Type::Void,
    )
}

fn print(value: Expression) -> Expression {
    Expression::call_static(console(), vec![value])
}

fn add() -> Result<Lambda, CombineError> {
    let a = Parameter::new(Type::Int32, "a");
    let b = Parameter::new(Type::Int32, "b");
    let body = Expression::add(a.expression(), b.expression());
    Ok(Lambda::new(body, vec![a, b]))
}

fn checked() -> Result<Lambda, CombineError> {
    let a = Parameter::new(Type::Int32, "a");
    let b = Parameter::new(Type::Int32, "b");
    let c = Parameter::new(Type::Int32, "c");
    let d = Parameter::new(Type::Int32, "d");

    let left = Expression::block_with(
        vec![c.clone()],
        vec![
            Expression::assign(
                c.expression(),
                Expression::add_checked(a.expression(), b.expression()),
            )?,
            Expression::compound_checked(
                BinaryOperator::Add,
                c.expression(),
                Expression::constant(42),
            )?,
            c.expression(),
        ],
    )?;
    let right = Expression::block_with(
        vec![d.clone()],
        vec![
            Expression::assign(
                d.expression(),
                Expression::subtract_checked(a.expression(), b.expression()),
            )?,
            Expression::compound_checked(
                BinaryOperator::Subtract,
                d.expression(),
                Expression::constant(42),
            )?,
            d.expression(),
        ],
    )?;
    let body = Expression::condition(
        Expression::greater_than(a.expression(), b.expression()),
        left,
        right,
    )?;
    Ok(Lambda::new(body, vec![a, b]))
}

fn counting() -> Result<Lambda, CombineError> {
    let l = Parameter::new(Type::Int32, "l");
    let i = Parameter::new(Type::Int32, "i");
    let body = Expression::for_loop(
        i.clone(),
        Expression::constant(0),
        Expression::less_than(i.expression(), l.expression()),
        Expression::pre_increment_assign(i.expression())?,
        print(Expression::convert(i.expression(), Type::Object)),
        None,
        None,
    )?;
    Ok(Lambda::new(body, vec![l]))
}

fn iterating() -> Result<Lambda, CombineError> {
    let items = Parameter::new(Type::enumerable_of(Type::String), "items");
    let item = Parameter::new(Type::String, "item");
    let body = Expression::for_each(
        item.clone(),
        items.expression(),
        print(item.expression()),
        None,
        None,
    )?;
    Ok(Lambda::new(body, vec![items]))
}

fn halving() -> Result<Lambda, CombineError> {
    let n = Parameter::new(Type::Int32, "n");
    let body = Expression::while_loop(
        Expression::greater_than(n.expression(), Expression::constant(1)),
        Expression::compound(
            BinaryOperator::Divide,
            n.expression(),
            Expression::constant(2),
        )?,
        None,
        None,
    )?;
    Ok(Lambda::new(body, vec![n]))
}

fn repeating() -> Result<Lambda, CombineError> {
    let n = Parameter::new(Type::Int32, "n");
    let done = LabelTarget::new("done");
    let body = Expression::do_while(
        Expression::block_typed(
            Type::Void,
            Vec::new(),
            vec![
                Expression::if_then(
                    Expression::equal(n.expression(), Expression::constant(13)),
                    Expression::break_to(done.clone()),
                )?,
                Expression::post_decrement_assign(n.expression())?,
            ],
        )?,
        Expression::greater_than(n.expression(), Expression::constant(0)),
        Some(done),
        None,
    )?;
    Ok(Lambda::new(body, vec![n]))
}

fn disposing() -> Result<Lambda, CombineError> {
    let stream: Type = Named::new("Stream", Form::Class)
        .implementing(Type::disposable())
        .into();
    let s = Parameter::new(stream.clone(), "s");
    let flush = Method::instance(stream, "Flush", Vec::new(), Type::Void);
    let body = Expression::using(
        s.expression(),
        Expression::call(s.expression(), flush, Vec::new()),
    )?;
    Ok(Lambda::new(body, vec![s]))
}

fn guarded() -> Result<Lambda, CombineError> {
    let x = Parameter::new(Type::Int32, "x");
    let e = Parameter::new(Type::exception(), "e");
    let message = Member::property(Type::exception(), "Message", Type::String);

    let body = Expression::try_with(
        print(Expression::convert(
            Expression::divide(Expression::constant(100), x.expression()),
            Type::Object,
        )),
        vec![CatchBlock::new(
            Type::exception(),
            Some(e.clone()),
            Some(Expression::not_equal(
                Expression::member(e.expression(), message.clone()),
                Expression::null(Type::String),
            )),
            print(Expression::member(e.expression(), message)),
        )],
        None,
        Some(print(Expression::constant("done"))),
    )?;
    Ok(Lambda::new(body, vec![x]))
}

fn naming() -> Result<Lambda, CombineError> {
    let n = Parameter::new(Type::Int32, "n");
    let body = Expression::switch(
        n.expression(),
        Some(Expression::constant("many")),
        vec![
            SwitchCase::new(Expression::constant("none"), vec![Expression::constant(0)]),
            SwitchCase::new(
                Expression::constant("few"),
                vec![
                    Expression::constant(1),
                    Expression::constant(2),
                    Expression::constant(3),
                ],
            ),
        ],
    );
    Ok(Lambda::new(body, vec![n]))
}

fn skipping() -> Result<Lambda, CombineError> {
    let x = Parameter::new(Type::Int32, "x");
    let end = LabelTarget::new("end");
    let body = Expression::block(vec![
        Expression::if_then(
            Expression::less_than(x.expression(), Expression::constant(0)),
            Expression::goto(end.clone()),
        )?,
        print(Expression::convert(x.expression(), Type::Object)),
        Expression::label(end),
    ])?;
    Ok(Lambda::new(body, vec![x]))
}

fn initializing() -> Result<Lambda, CombineError> {
    let list = Type::generic("List", vec![Type::Int32]);
    let point = Type::class("Point");
    let add = Method::instance(list.clone(), "Add", vec![Type::Int32], Type::Void);

    let x = Member::property(point.clone(), "X", Type::Int32);
    let values = Member::property(point.clone(), "Values", list.clone());

    let body = Expression::member_init(
        Expression::new_object(point, Vec::new()),
        vec![
            MemberBinding::Assignment(x, Expression::constant(1)),
            MemberBinding::List(
                values,
                vec![
                    ElementInit::new(add.clone(), vec![Expression::constant(2)]),
                    ElementInit::new(add, vec![Expression::constant(3)]),
                ],
            ),
        ],
    )?;
    Ok(Lambda::new(body, Vec::new()))
}

fn exact() -> Result<Lambda, CombineError> {
    let o = Parameter::new(Type::Object, "o");
    let body = Expression::type_equal(o.expression(), Type::generic("List", vec![Type::Int32]));
    Ok(Lambda::new(body, vec![o]))
}

fn predicate() -> Result<Lambda, CombineError> {
    let length = Member::property(Type::String, "Length", Type::Int32);
    let starts = Method::instance(Type::String, "StartsWith", vec![Type::String], Type::Boolean);

    let s = Parameter::new(Type::String, "s");
    let long = Lambda::new(
        Expression::greater_than(
            Expression::member(s.expression(), length),
            Expression::constant(3),
        ),
        vec![s],
    );

    let t = Parameter::new(Type::String, "t");
    let prefixed = Lambda::new(
        Expression::call(t.expression(), starts, vec![Expression::constant("a")]),
        vec![t],
    );

    and_also(&long, &prefixed)
}
