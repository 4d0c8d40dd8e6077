#[cfg(test)]
mod verify {
    use pretty_assertions::assert_eq;

    use exprwriter::combinators::{and_also, not};
    use exprwriter::formatting::*;
    use exprwriter::language::*;
    use exprwriter::samples;

    fn lines(expected: &[&str]) -> String {
        expected.join("\n")
    }

    fn write_line() -> Method {
        Method::function(
            Type::class("Console"),
            "WriteLine",
            vec![Type::Object],
            Type::Void,
        )
    }

    fn print(value: Expression) -> Expression {
        Expression::call_static(write_line(), vec![value])
    }

    fn sample(name: &str) -> String {
        let sample = samples::find(name).unwrap();
        let lambda = (sample.build)().unwrap();
        to_code(&lambda).unwrap()
    }

    #[test]
    fn addition() {
        let x = Parameter::new(Type::Int32, "x");
        let y = Parameter::new(Type::Int32, "y");
        let lambda = Lambda::new(
            Expression::add(x.expression(), y.expression()),
            vec![x, y],
        );

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&["int (int x, int y)", "{", "\treturn x + y;", "}"])
        );
    }

    #[test]
    fn checked_compound_assignment() {
        let a = Parameter::new(Type::Int32, "a");
        let body = Expression::block_typed(
            Type::Void,
            Vec::new(),
            vec![Expression::compound_checked(
                BinaryOperator::Add,
                a.expression(),
                Expression::constant(42),
            )
            .unwrap()],
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![a]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&["void (int a)", "{", "\tchecked { a += 42 };", "}"])
        );
    }

    #[test]
    fn checked_differs_only_by_wrapper() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");

        let pairs = [
            (
                Expression::add(a.expression(), b.expression()),
                Expression::add_checked(a.expression(), b.expression()),
            ),
            (
                Expression::multiply(
                    a.expression(),
                    Expression::subtract(b.expression(), Expression::constant(1)),
                ),
                Expression::multiply_checked(
                    a.expression(),
                    Expression::subtract(b.expression(), Expression::constant(1)),
                ),
            ),
            (
                Expression::negate(a.expression()),
                Expression::negate_checked(a.expression()),
            ),
        ];

        for (unchecked, checked) in pairs {
            let plain = render_expression(&Identity, &unchecked).unwrap();
            let wrapped = render_expression(&Identity, &checked).unwrap();
            assert_eq!(wrapped, format!("checked {{ {} }}", plain));
        }
    }

    #[test]
    fn operands_are_parenthesized() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");
        let c = Parameter::new(Type::Int32, "c");

        let expression = Expression::subtract(
            Expression::add(a.expression(), b.expression()),
            Expression::multiply(b.expression(), c.expression()),
        );
        assert_eq!(
            render_expression(&Identity, &expression).unwrap(),
            "(a + b) - (b * c)"
        );

        let expression = Expression::not(Expression::equal(a.expression(), b.expression()));
        assert_eq!(render_expression(&Identity, &expression).unwrap(), "!(a == b)");

        let expression = Expression::convert(
            Expression::add(a.expression(), b.expression()),
            Type::Int64,
        );
        assert_eq!(render_expression(&Identity, &expression).unwrap(), "(long)(a + b)");
    }

    #[test]
    fn rendering_is_stable() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");
        let expression = Expression::and_also(
            Expression::less_than(a.expression(), b.expression()),
            Expression::not_equal(a.expression(), Expression::constant(0)),
        );

        let first = render_expression(&Identity, &expression).unwrap();
        let second = render_expression(&Identity, &expression).unwrap();
        assert_eq!(first, "(a < b) && (a != 0)");
        assert_eq!(first, second);
    }

    #[test]
    fn ternary_when_both_branches_are_expressions() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");
        let body = Expression::condition(
            Expression::greater_than(a.expression(), b.expression()),
            a.expression(),
            b.expression(),
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![a, b]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&["int (int a, int b)", "{", "\treturn a > b ? a : b;", "}"])
        );
    }

    #[test]
    fn statement_form_for_void_conditionals() {
        let a = Parameter::new(Type::Int32, "a");
        let body = Expression::if_then(
            Expression::greater_than(a.expression(), Expression::constant(0)),
            print(a.expression()),
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![a]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&[
                "void (int a)",
                "{",
                "\tif (a > 0)",
                "\t{",
                "\t\tConsole.WriteLine(a);",
                "\t}",
                "}",
            ])
        );
    }

    #[test]
    fn block_branches_return_their_value() {
        assert_eq!(
            sample("checked"),
            lines(&[
                "int (int a, int b)",
                "{",
                "\tif (a > b)",
                "\t{",
                "\t\tint c;",
                "",
                "\t\tc = checked { a + b };",
                "\t\tchecked { c += 42 };",
                "\t\treturn c;",
                "\t}",
                "\telse",
                "\t{",
                "\t\tint d;",
                "",
                "\t\td = checked { a - b };",
                "\t\tchecked { d -= 42 };",
                "\t\treturn d;",
                "\t}",
                "}",
            ])
        );
    }

    #[test]
    fn explicit_return_is_not_doubled() {
        let x = Parameter::new(Type::Int32, "x");
        let done = LabelTarget::typed(Type::Int32, Some("done"));
        let body = Expression::block_typed(
            Type::Int32,
            Vec::new(),
            vec![Expression::return_to(done, Some(x.expression()))],
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![x]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&["int (int x)", "{", "\treturn x;", "}"])
        );
    }

    #[test]
    fn derived_loops_keep_their_keywords() {
        assert_eq!(
            sample("for"),
            lines(&[
                "void (int l)",
                "{",
                "\tfor (int i = 0; i < l; ++i)",
                "\t{",
                "\t\tConsole.WriteLine((object)i);",
                "\t}",
                "}",
            ])
        );

        assert_eq!(
            sample("foreach"),
            lines(&[
                "void (IEnumerable<string> items)",
                "{",
                "\tforeach (string item in items)",
                "\t{",
                "\t\tConsole.WriteLine(item);",
                "\t}",
                "}",
            ])
        );

        assert_eq!(
            sample("while"),
            lines(&[
                "void (int n)",
                "{",
                "\twhile (n > 1)",
                "\t{",
                "\t\tn /= 2;",
                "\t}",
                "}",
            ])
        );

        assert_eq!(
            sample("do"),
            lines(&[
                "void (int n)",
                "{",
                "\tdo",
                "\t{",
                "\t\tif (n == 13)",
                "\t\t{",
                "\t\t\tbreak;",
                "\t\t}",
                "\t\tn--;",
                "\t}",
                "\twhile (n > 0);",
                "}",
            ])
        );

        assert_eq!(
            sample("using"),
            lines(&[
                "void (Stream s)",
                "{",
                "\tusing (s)",
                "\t{",
                "\t\ts.Flush();",
                "\t}",
                "}",
            ])
        );
    }

    #[test]
    fn try_catch_finally() {
        assert_eq!(
            sample("try"),
            lines(&[
                "void (int x)",
                "{",
                "\ttry",
                "\t{",
                "\t\tConsole.WriteLine((object)(100 / x));",
                "\t}",
                "\tcatch (Exception e) if (e.Message != null)",
                "\t{",
                "\t\tConsole.WriteLine(e.Message);",
                "\t}",
                "\tfinally",
                "\t{",
                "\t\tConsole.WriteLine(\"done\");",
                "\t}",
                "}",
            ])
        );
    }

    #[test]
    fn switch_cases_share_bodies() {
        assert_eq!(
            sample("switch"),
            lines(&[
                "string (int n)",
                "{",
                "\tswitch (n)",
                "\t{",
                "\t\tcase 0:",
                "\t\t{",
                "\t\t\treturn \"none\";",
                "\t\t}",
                "\t\tcase 1:",
                "\t\tcase 2:",
                "\t\tcase 3:",
                "\t\t{",
                "\t\t\treturn \"few\";",
                "\t\t}",
                "\t\tdefault:",
                "\t\t{",
                "\t\t\treturn \"many\";",
                "\t\t}",
                "\t}",
                "}",
            ])
        );
    }

    #[test]
    fn labels_sit_one_level_out() {
        assert_eq!(
            sample("goto"),
            lines(&[
                "void (int x)",
                "{",
                "\tif (x < 0)",
                "\t{",
                "\t\tgoto end;",
                "\t}",
                "\tConsole.WriteLine((object)x);",
                "end:",
                "}",
            ])
        );
    }

    #[test]
    fn anonymous_labels_are_numbered() {
        let first = LabelTarget::anonymous();
        let second = LabelTarget::anonymous();
        let body = Expression::block(vec![
            Expression::goto(second.clone()),
            Expression::label(first.clone()),
            Expression::goto(first),
            Expression::label(second),
        ])
        .unwrap();

        assert_eq!(
            to_code(&Lambda::new(body, Vec::new())).unwrap(),
            lines(&[
                "void ()",
                "{",
                "\tgoto label_$0;",
                "label_$1:",
                "\tgoto label_$1;",
                "label_$0:",
                "}",
            ])
        );
    }

    #[test]
    fn initializers() {
        assert_eq!(
            sample("init"),
            lines(&[
                "Point ()",
                "{",
                "\treturn new Point()",
                "\t{",
                "\t\tX = 1,",
                "\t\tValues = {2, 3}",
                "\t};",
                "}",
            ])
        );

        let arrays = Expression::new_array_init(
            Type::Int32,
            vec![Expression::constant(1), Expression::constant(2)],
        );
        assert_eq!(render_expression(&Identity, &arrays).unwrap(), "new int[] {1, 2}");

        let bounds = Expression::new_array_bounds(
            Type::String,
            vec![Expression::constant(2), Expression::constant(3)],
        );
        assert_eq!(render_expression(&Identity, &bounds).unwrap(), "new string[2, 3]");
    }

    #[test]
    fn type_tests() {
        assert_eq!(
            sample("typeof"),
            lines(&[
                "bool (object o)",
                "{",
                "\treturn o.GetType() == typeof(List<int>);",
                "}",
            ])
        );

        let o = Parameter::new(Type::Object, "o");
        let is = Expression::type_is(o.expression(), Type::String);
        assert_eq!(render_expression(&Identity, &is).unwrap(), "o is string");

        let cast = Expression::type_as(o.expression(), Type::String);
        assert_eq!(render_expression(&Identity, &cast).unwrap(), "o as string");
    }

    #[test]
    fn casts_are_closed_off_before_member_access() {
        let o = Parameter::new(Type::Object, "o");
        let length = Member::property(Type::String, "Length", Type::Int32);
        let expression = Expression::member(Expression::convert(o.expression(), Type::String), length);

        assert_eq!(
            render_expression(&Identity, &expression).unwrap(),
            "((string)o).Length"
        );
    }

    #[test]
    fn sugar_for_primitive_operators() {
        let x = Parameter::new(Type::Double, "x");
        let y = Parameter::new(Type::Double, "y");
        let items = Parameter::new(Type::array(Type::Int32), "items");

        let cases = [
            (
                Expression::power(x.expression(), y.expression()),
                "Math.Pow(x, y)",
            ),
            (Expression::increment(x.expression()), "x + 1"),
            (Expression::is_false(Expression::constant(true)), "true == false"),
            (
                Expression::array_length(items.expression()).unwrap(),
                "items.Length",
            ),
            (
                Expression::array_index(items.expression(), Expression::constant(0)).unwrap(),
                "items[0]",
            ),
            (
                Expression::post_increment_assign(x.expression()).unwrap(),
                "x++",
            ),
        ];

        for (expression, expected) in cases {
            assert_eq!(render_expression(&Identity, &expression).unwrap(), expected);
        }
    }

    #[test]
    fn anonymous_parameters_are_named_in_order() {
        let first = Parameter::anonymous(Type::Int32);
        let second = Parameter::anonymous(Type::Int32);
        let lambda = Lambda::new(
            Expression::add(second.expression(), first.expression()),
            vec![first, second],
        );

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&[
                "int (int var_$0, int var_$1)",
                "{",
                "\treturn var_$1 + var_$0;",
                "}",
            ])
        );
    }

    #[test]
    fn combined_predicates_share_a_parameter() {
        assert_eq!(
            sample("predicate"),
            lines(&[
                "bool (string s)",
                "{",
                "\treturn (s.Length > 3) && s.StartsWith(\"a\");",
                "}",
            ])
        );

        let s = Parameter::new(Type::String, "s");
        let empty = Lambda::new(
            Expression::equal(s.expression(), Expression::constant("")),
            vec![s],
        );
        let t = Parameter::new(Type::String, "t");
        let null = Lambda::new(
            Expression::equal(t.expression(), Expression::null(Type::String)),
            vec![t],
        );
        let combined = and_also(&empty, &null).unwrap();
        assert_eq!(
            to_code(&combined).unwrap(),
            lines(&[
                "bool (string s)",
                "{",
                "\treturn (s == \"\") && (s == null);",
                "}",
            ])
        );
    }

    #[test]
    fn strings_are_escaped() {
        let expression = Expression::constant("say \"hi\"\n");
        assert_eq!(
            render_expression(&Identity, &expression).unwrap(),
            "\"say \\\"hi\\\"\\n\""
        );
    }

    #[test]
    fn nested_lambdas() {
        let x = Parameter::new(Type::Int32, "x");
        let inner = Lambda::new(
            Expression::multiply(x.expression(), Expression::constant(2)),
            vec![x],
        );
        let outer = Lambda::new(Expression::lambda(inner), Vec::new());

        assert_eq!(
            to_code(&outer).unwrap(),
            lines(&[
                "Func<int, int> ()",
                "{",
                "\treturn (int x) =>",
                "\t{",
                "\t\treturn x * 2;",
                "\t};",
                "}",
            ])
        );
    }

    #[test]
    fn type_tests_are_closed_off_as_operands() {
        let o = Parameter::new(Type::Object, "o");
        let is_string = Lambda::new(Expression::type_is(o.expression(), Type::String), vec![o]);

        assert_eq!(
            to_code(&not(&is_string).unwrap()).unwrap(),
            lines(&["bool (object o)", "{", "\treturn !(o is string);", "}"])
        );

        let o = Parameter::new(Type::Object, "o");
        let cast = Expression::convert(
            Expression::type_as(o.expression(), Type::String),
            Type::Object,
        );
        assert_eq!(render_expression(&Identity, &cast).unwrap(), "(object)(o as string)");
    }

    #[test]
    fn ternaries_and_assignments_are_closed_off_as_operands() {
        let x = Parameter::new(Type::Int32, "x");
        let y = Parameter::new(Type::Int32, "y");
        let c = Parameter::new(Type::Boolean, "c");

        let ternary = Expression::multiply(
            x.expression(),
            Expression::condition(
                c.expression(),
                Expression::constant(1),
                Expression::constant(2),
            )
            .unwrap(),
        );
        assert_eq!(render_expression(&Identity, &ternary).unwrap(), "x * (c ? 1 : 2)");

        let assign = Expression::add(
            x.expression(),
            Expression::assign(y.expression(), Expression::constant(3)).unwrap(),
        );
        assert_eq!(render_expression(&Identity, &assign).unwrap(), "x + (y = 3)");

        let compound = Expression::negate(
            Expression::compound(BinaryOperator::Add, y.expression(), x.expression()).unwrap(),
        );
        assert_eq!(render_expression(&Identity, &compound).unwrap(), "-(y += x)");
    }

    #[test]
    fn valued_blocks_return_a_throw() {
        let e = Parameter::new(Type::exception(), "e");
        let body =
            Expression::block_typed(Type::Int32, Vec::new(), vec![Expression::throw(e.expression())])
                .unwrap();
        let lambda = Lambda::new(body, vec![e]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&["int (Exception e)", "{", "\treturn throw e;", "}"])
        );
    }

    #[test]
    fn label_defaults_follow_the_label() {
        let x = Parameter::new(Type::Int32, "x");
        let done = LabelTarget::typed(Type::Int32, Some("done"));
        let body = Expression::block_typed(
            Type::Int32,
            Vec::new(),
            vec![
                print(Expression::convert(x.expression(), Type::Object)),
                Expression::label_with(done, Some(x.expression())),
            ],
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![x]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&[
                "int (int x)",
                "{",
                "\tConsole.WriteLine((object)x);",
                "done:",
                "\treturn x;",
                "}",
            ])
        );
    }

    #[test]
    fn shapes_without_a_source_form_are_refused() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");

        let equal_assign = Expression::new(Node::Binary(Binary {
            operator: BinaryOperator::Equal,
            left: a.expression(),
            right: b.expression(),
            assign: true,
            checked: false,
            ty: Type::Boolean,
        }));
        let result = render_expression(&Identity, &equal_assign);
        assert!(matches!(result, Err(RenderError::Unsupported { .. })));

        let checked_power = Expression::new(Node::Binary(Binary {
            operator: BinaryOperator::Power,
            left: a.expression(),
            right: b.expression(),
            assign: false,
            checked: true,
            ty: Type::Double,
        }));
        let result = render_expression(&Identity, &checked_power);
        assert!(matches!(result, Err(RenderError::Unsupported { .. })));

        let lambda = Lambda::new(equal_assign, vec![a, b]);
        assert!(to_code(&lambda).is_err());
    }

    #[test]
    fn power_assignment_calls_math_pow() {
        let x = Parameter::new(Type::Double, "x");
        let y = Parameter::new(Type::Double, "y");
        let assign =
            Expression::compound(BinaryOperator::Power, x.expression(), y.expression()).unwrap();

        assert_eq!(render_expression(&Identity, &assign).unwrap(), "x = Math.Pow(x, y)");
    }

    #[test]
    fn checked_conversions_and_negation() {
        let i = Parameter::new(Type::Int64, "i");

        let convert = Expression::convert_checked(i.expression(), Type::Int32);
        assert_eq!(render_expression(&Identity, &convert).unwrap(), "checked { (int)i }");

        let negate = Expression::negate_checked(i.expression());
        assert_eq!(render_expression(&Identity, &negate).unwrap(), "checked { -i }");

        let nested = Expression::negate_checked(Expression::subtract(
            i.expression(),
            Expression::constant(1i64),
        ));
        assert_eq!(render_expression(&Identity, &nested).unwrap(), "checked { -(i - 1) }");
    }

    #[test]
    fn decrements() {
        let x = Parameter::new(Type::Int32, "x");

        let cases = [
            (Expression::decrement(x.expression()), "x - 1"),
            (Expression::pre_decrement_assign(x.expression()).unwrap(), "--x"),
            (Expression::post_decrement_assign(x.expression()).unwrap(), "x--"),
        ];
        for (expression, expected) in cases {
            assert_eq!(render_expression(&Identity, &expression).unwrap(), expected);
        }
    }

    #[test]
    fn open_generic_definitions_use_placeholders() {
        let dictionary = Type::definition("Dictionary", &["TKey", "TValue"]);
        assert_eq!(
            render_expression(&Identity, &Expression::default(dictionary)).unwrap(),
            "default(Dictionary<,>)"
        );

        let list = Type::generic("List", vec![Type::Int32]);
        assert_eq!(
            render_expression(&Identity, &Expression::default(list)).unwrap(),
            "default(List<int>)"
        );

        let empty = Method::function(Type::class("Enumerable"), "Empty", Vec::new(), Type::Object);
        let open = Expression::call_static(
            empty
                .clone()
                .as_definition(&["T"]),
            Vec::new(),
        );
        assert_eq!(render_expression(&Identity, &open).unwrap(), "Enumerable.Empty<>()");

        let closed = Expression::call_static(
            empty.with_generic_arguments(vec![Type::String]),
            Vec::new(),
        );
        assert_eq!(render_expression(&Identity, &closed).unwrap(), "Enumerable.Empty<string>()");
    }

    #[test]
    fn fault_blocks() {
        let x = Parameter::new(Type::Int32, "x");
        let body = Expression::try_fault(
            print(Expression::convert(x.expression(), Type::Object)),
            print(Expression::constant("failed")),
        )
        .unwrap();
        let lambda = Lambda::new(body, vec![x]);

        assert_eq!(
            to_code(&lambda).unwrap(),
            lines(&[
                "void (int x)",
                "{",
                "\ttry",
                "\t{",
                "\t\tConsole.WriteLine((object)x);",
                "\t}",
                "\tfault",
                "\t{",
                "\t\tConsole.WriteLine(\"failed\");",
                "\t}",
                "}",
            ])
        );
    }
}
