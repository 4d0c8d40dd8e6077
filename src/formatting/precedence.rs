//! Parenthesization and statement classification

use crate::language::*;

/// Whether a node must be wrapped in parentheses when it is the operand of
/// a binary or unary operator or of a conversion. There are no precedence
/// levels, only a fixed set of kinds.
pub fn requires_parentheses(kind: Kind) -> bool {
    match kind {
        Kind::Binary {
            operator: BinaryOperator::ArrayIndex,
            assign: false,
            ..
        } => false,
        Kind::Binary { .. } => true,
        Kind::Unary(operator) => matches!(
            operator,
            UnaryOperator::Negate
                | UnaryOperator::NegateChecked
                | UnaryOperator::Not
                | UnaryOperator::OnesComplement
                | UnaryOperator::Increment
                | UnaryOperator::Decrement
                | UnaryOperator::UnaryPlus
                | UnaryOperator::TypeAs
        ),
        Kind::TypeBinary(_) | Kind::Conditional => true,
        _ => false,
    }
}

/// Whether a node needs parentheses as the target of a member access, call
/// or index, where casts must be closed off as well.
pub fn requires_parentheses_as_target(kind: Kind) -> bool {
    match kind {
        Kind::Unary(
            UnaryOperator::Convert
            | UnaryOperator::ConvertChecked
            | UnaryOperator::Unbox
            | UnaryOperator::TypeAs,
        ) => true,
        _ => requires_parentheses(kind),
    }
}

/// A conditional reads as `t ? a : b` only when it yields a value and has
/// two branches, neither of them a block.
pub fn is_ternary(conditional: &Conditional) -> bool {
    if conditional
        .ty
        .is_void()
    {
        return false;
    }
    match &conditional.if_false {
        Some(if_false) => {
            conditional
                .if_true
                .kind()
                != Kind::Block
                && if_false.kind() != Kind::Block
        }
        None => false,
    }
}

/// Statements end their own lines and never take a `return` prefix or a
/// trailing `;`.
pub fn is_statement(expression: &Expression) -> bool {
    match expression.node() {
        Node::Block(_) | Node::Try(_) | Node::Loop(_) | Node::Switch(_) => true,
        Node::Conditional(conditional) => !is_ternary(conditional),
        node => node
            .kind()
            .is_derived(),
    }
}

/// A `return` goto already carries its keyword; every other last
/// expression of a valued block is prefixed with one.
pub fn is_return(expression: &Expression) -> bool {
    matches!(expression.kind(), Kind::Goto(GotoKind::Return))
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn arithmetic_is_parenthesized() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");

        assert!(requires_parentheses(
            Expression::add(a.expression(), b.expression()).kind()
        ));
        assert!(requires_parentheses(
            Expression::add_checked(a.expression(), b.expression()).kind()
        ));
        assert!(requires_parentheses(
            Expression::negate(a.expression()).kind()
        ));
        assert!(!requires_parentheses(a.expression().kind()));
    }

    #[test]
    fn assignments_and_type_tests_are_parenthesized() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "b");
        let o = Parameter::new(Type::Object, "o");

        let assign = Expression::assign(a.expression(), b.expression()).unwrap();
        assert!(requires_parentheses(assign.kind()));

        let compound =
            Expression::compound(BinaryOperator::Add, a.expression(), b.expression()).unwrap();
        assert!(requires_parentheses(compound.kind()));

        let is = Expression::type_is(o.expression(), Type::String);
        assert!(requires_parentheses(is.kind()));

        let cast = Expression::type_as(o.expression(), Type::String);
        assert!(requires_parentheses(cast.kind()));

        let ternary = Expression::condition(
            Expression::constant(true),
            a.expression(),
            b.expression(),
        )
        .unwrap();
        assert!(requires_parentheses(ternary.kind()));
    }

    #[test]
    fn indexing_and_conversions_stand_alone() {
        let items = Parameter::new(Type::array(Type::Int32), "items");
        let index =
            Expression::array_index(items.expression(), Expression::constant(0)).unwrap();
        assert!(!requires_parentheses(index.kind()));

        let convert = Expression::convert(items.expression(), Type::Object);
        assert!(!requires_parentheses(convert.kind()));
        assert!(requires_parentheses_as_target(convert.kind()));
    }

    #[test]
    fn ternary_classification() {
        let t = Expression::constant(true);
        let one = Expression::constant(1);
        let two = Expression::constant(2);

        let ternary = Expression::condition(t.clone(), one.clone(), two.clone()).unwrap();
        assert!(!is_statement(&ternary));

        let statement = Expression::if_then_else(t.clone(), one.clone(), two.clone()).unwrap();
        assert!(is_statement(&statement));

        let block = Expression::block(vec![one.clone()]).unwrap();
        let mixed = Expression::condition(t, block, two).unwrap();
        assert!(is_statement(&mixed));
    }

    #[test]
    fn only_return_gotos_count_as_returns() {
        let target = LabelTarget::typed(Type::Int32, Some("exit"));
        let value = Some(Expression::constant(1));

        assert!(is_return(&Expression::return_to(target.clone(), value.clone())));
        assert!(!is_return(&Expression::jump(GotoKind::Break, target.clone(), value)));
        assert!(!is_return(&Expression::goto(target)));
        assert!(!is_return(&Expression::throw(Expression::null(Type::exception()))));
    }
}
