//! Validating constructors for every node variant

use crate::language::*;

fn require_boolean(role: &'static str, expression: &Expression) -> Result<(), ConstructionError> {
    let found = expression.ty();
    if found == Type::Boolean {
        Ok(())
    } else {
        Err(ConstructionError::NotBoolean { role, found })
    }
}

fn require_writable(expression: &Expression) -> Result<(), ConstructionError> {
    match expression.kind() {
        Kind::Parameter | Kind::Member | Kind::Index => Ok(()),
        Kind::Binary {
            operator: BinaryOperator::ArrayIndex,
            assign: false,
            ..
        } => Ok(()),
        kind => Err(ConstructionError::NotWritable(kind)),
    }
}

fn require_array(expression: &Expression) -> Result<Type, ConstructionError> {
    let ty = expression.ty();
    match ty.element() {
        Some(element) => Ok(element.clone()),
        None => Err(ConstructionError::NotArray(ty)),
    }
}

pub(crate) fn require_continue(target: &Option<LabelTarget>) -> Result<(), ConstructionError> {
    match target {
        Some(target) if !target.ty().is_void() => {
            Err(ConstructionError::ContinueNotVoid(target.ty().clone()))
        }
        _ => Ok(()),
    }
}

impl Expression {
    pub fn kind(&self) -> Kind {
        self.node()
            .kind()
    }

    /// A constant whose type is that of the value.
    pub fn constant(value: impl Into<Value>) -> Expression {
        let value = value.into();
        Expression::constant_typed(value.type_of(), value)
    }

    pub fn constant_typed(ty: Type, value: Value) -> Expression {
        Expression::new(Node::Constant(Constant { value, ty }))
    }

    pub fn null(ty: Type) -> Expression {
        Expression::constant_typed(ty, Value::Null)
    }

    pub fn default(ty: Type) -> Expression {
        Expression::new(Node::Default(ty))
    }

    pub fn lambda(lambda: Lambda) -> Expression {
        Expression::new(Node::Lambda(lambda))
    }

    // unary

    pub fn make_unary(operator: UnaryOperator, operand: Expression, ty: Type) -> Expression {
        Expression::new(Node::Unary(Unary {
            operator,
            operand,
            ty,
        }))
    }

    fn unary_same(operator: UnaryOperator, operand: Expression) -> Expression {
        let ty = operand.ty();
        Expression::make_unary(operator, operand, ty)
    }

    pub fn negate(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::Negate, operand)
    }

    pub fn negate_checked(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::NegateChecked, operand)
    }

    pub fn unary_plus(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::UnaryPlus, operand)
    }

    pub fn not(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::Not, operand)
    }

    pub fn ones_complement(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::OnesComplement, operand)
    }

    pub fn convert(operand: Expression, ty: Type) -> Expression {
        Expression::make_unary(UnaryOperator::Convert, operand, ty)
    }

    pub fn convert_checked(operand: Expression, ty: Type) -> Expression {
        Expression::make_unary(UnaryOperator::ConvertChecked, operand, ty)
    }

    pub fn unbox(operand: Expression, ty: Type) -> Expression {
        Expression::make_unary(UnaryOperator::Unbox, operand, ty)
    }

    pub fn type_as(operand: Expression, ty: Type) -> Expression {
        Expression::make_unary(UnaryOperator::TypeAs, operand, ty)
    }

    pub fn array_length(array: Expression) -> Result<Expression, ConstructionError> {
        require_array(&array)?;
        Ok(Expression::make_unary(
            UnaryOperator::ArrayLength,
            array,
            Type::Int32,
        ))
    }

    pub fn throw(exception: Expression) -> Expression {
        Expression::make_unary(UnaryOperator::Throw, exception, Type::Void)
    }

    pub fn quote(lambda: Lambda) -> Expression {
        let ty = lambda.ty();
        Expression::make_unary(UnaryOperator::Quote, Expression::lambda(lambda), ty)
    }

    pub fn increment(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::Increment, operand)
    }

    pub fn decrement(operand: Expression) -> Expression {
        Expression::unary_same(UnaryOperator::Decrement, operand)
    }

    pub fn pre_increment_assign(operand: Expression) -> Result<Expression, ConstructionError> {
        require_writable(&operand)?;
        Ok(Expression::unary_same(
            UnaryOperator::PreIncrementAssign,
            operand,
        ))
    }

    pub fn post_increment_assign(operand: Expression) -> Result<Expression, ConstructionError> {
        require_writable(&operand)?;
        Ok(Expression::unary_same(
            UnaryOperator::PostIncrementAssign,
            operand,
        ))
    }

    pub fn pre_decrement_assign(operand: Expression) -> Result<Expression, ConstructionError> {
        require_writable(&operand)?;
        Ok(Expression::unary_same(
            UnaryOperator::PreDecrementAssign,
            operand,
        ))
    }

    pub fn post_decrement_assign(operand: Expression) -> Result<Expression, ConstructionError> {
        require_writable(&operand)?;
        Ok(Expression::unary_same(
            UnaryOperator::PostDecrementAssign,
            operand,
        ))
    }

    pub fn is_true(operand: Expression) -> Expression {
        Expression::make_unary(UnaryOperator::IsTrue, operand, Type::Boolean)
    }

    pub fn is_false(operand: Expression) -> Expression {
        Expression::make_unary(UnaryOperator::IsFalse, operand, Type::Boolean)
    }

    // binary

    /// Build any binary node, checking that the flags make sense for the
    /// operator and that assignments have a writable target.
    pub fn make_binary(
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
        assign: bool,
        checked: bool,
    ) -> Result<Expression, ConstructionError> {
        if checked && !operator.has_checked_form() {
            return Err(ConstructionError::NoCheckedForm(operator));
        }
        if assign && !operator.has_compound_form() {
            return Err(ConstructionError::NoCompoundForm(operator));
        }
        match operator {
            BinaryOperator::Assign => {
                require_writable(&left)?;
                let to = left.ty();
                let from = right.ty();
                if !to.is_assignable_from(&from) {
                    return Err(ConstructionError::NotAssignable { to, from });
                }
            }
            BinaryOperator::ArrayIndex => {
                require_array(&left)?;
            }
            _ if assign => require_writable(&left)?,
            _ => {}
        }
        Ok(Expression::binary(operator, left, right, assign, checked))
    }

    pub(crate) fn binary(
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
        assign: bool,
        checked: bool,
    ) -> Expression {
        let ty = match operator {
            BinaryOperator::AndAlso | BinaryOperator::OrElse => Type::Boolean,
            _ if operator.is_comparison() => Type::Boolean,
            BinaryOperator::ArrayIndex => left
                .ty()
                .element()
                .cloned()
                .unwrap_or(Type::Object),
            BinaryOperator::Power if !assign => Type::Double,
            _ => left.ty(),
        };
        Expression::new(Node::Binary(Binary {
            operator,
            left,
            right,
            assign,
            checked,
            ty,
        }))
    }

    pub fn add(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Add, left, right, false, false)
    }

    pub fn add_checked(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Add, left, right, false, true)
    }

    pub fn subtract(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Subtract, left, right, false, false)
    }

    pub fn subtract_checked(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Subtract, left, right, false, true)
    }

    pub fn multiply(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Multiply, left, right, false, false)
    }

    pub fn multiply_checked(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Multiply, left, right, false, true)
    }

    pub fn divide(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Divide, left, right, false, false)
    }

    pub fn modulo(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Modulo, left, right, false, false)
    }

    pub fn and(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::And, left, right, false, false)
    }

    pub fn or(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Or, left, right, false, false)
    }

    pub fn exclusive_or(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::ExclusiveOr, left, right, false, false)
    }

    pub fn left_shift(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::LeftShift, left, right, false, false)
    }

    pub fn right_shift(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::RightShift, left, right, false, false)
    }

    pub fn power(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Power, left, right, false, false)
    }

    pub fn and_also(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::AndAlso, left, right, false, false)
    }

    pub fn or_else(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::OrElse, left, right, false, false)
    }

    pub fn coalesce(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Coalesce, left, right, false, false)
    }

    pub fn equal(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::Equal, left, right, false, false)
    }

    pub fn not_equal(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::NotEqual, left, right, false, false)
    }

    pub fn less_than(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::LessThan, left, right, false, false)
    }

    pub fn less_than_or_equal(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::LessThanOrEqual, left, right, false, false)
    }

    pub fn greater_than(left: Expression, right: Expression) -> Expression {
        Expression::binary(BinaryOperator::GreaterThan, left, right, false, false)
    }

    pub fn greater_than_or_equal(left: Expression, right: Expression) -> Expression {
        Expression::binary(
            BinaryOperator::GreaterThanOrEqual,
            left,
            right,
            false,
            false,
        )
    }

    pub fn assign(left: Expression, right: Expression) -> Result<Expression, ConstructionError> {
        Expression::make_binary(BinaryOperator::Assign, left, right, false, false)
    }

    /// `left op= right`
    pub fn compound(
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
    ) -> Result<Expression, ConstructionError> {
        Expression::make_binary(operator, left, right, true, false)
    }

    pub fn compound_checked(
        operator: BinaryOperator,
        left: Expression,
        right: Expression,
    ) -> Result<Expression, ConstructionError> {
        Expression::make_binary(operator, left, right, true, true)
    }

    pub fn array_index(array: Expression, index: Expression) -> Result<Expression, ConstructionError> {
        Expression::make_binary(BinaryOperator::ArrayIndex, array, index, false, false)
    }

    pub fn type_is(operand: Expression, test: Type) -> Expression {
        Expression::new(Node::TypeBinary(TypeBinary {
            operator: TypeOperator::TypeIs,
            operand,
            test,
        }))
    }

    pub fn type_equal(operand: Expression, test: Type) -> Expression {
        Expression::new(Node::TypeBinary(TypeBinary {
            operator: TypeOperator::TypeEqual,
            operand,
            test,
        }))
    }

    // statements

    pub fn block(expressions: Vec<Expression>) -> Result<Expression, ConstructionError> {
        Expression::block_with(Vec::new(), expressions)
    }

    pub fn block_with(
        variables: Vec<Parameter>,
        expressions: Vec<Expression>,
    ) -> Result<Expression, ConstructionError> {
        let ty = match expressions.last() {
            Some(last) => last.ty(),
            None => return Err(ConstructionError::EmptyBlock),
        };
        Expression::block_typed(ty, variables, expressions)
    }

    pub fn block_typed(
        ty: Type,
        variables: Vec<Parameter>,
        expressions: Vec<Expression>,
    ) -> Result<Expression, ConstructionError> {
        if expressions.is_empty() {
            return Err(ConstructionError::EmptyBlock);
        }
        Ok(Expression::new(Node::Block(Block {
            variables,
            expressions,
            ty,
        })))
    }

    /// `test ? if_true : if_false`, both branches of the same type.
    pub fn condition(
        test: Expression,
        if_true: Expression,
        if_false: Expression,
    ) -> Result<Expression, ConstructionError> {
        let left = if_true.ty();
        let right = if_false.ty();
        if left != right {
            return Err(ConstructionError::BranchMismatch(left, right));
        }
        Expression::condition_typed(left, test, if_true, Some(if_false))
    }

    pub fn condition_typed(
        ty: Type,
        test: Expression,
        if_true: Expression,
        if_false: Option<Expression>,
    ) -> Result<Expression, ConstructionError> {
        require_boolean("the test of a conditional", &test)?;
        Ok(Expression::new(Node::Conditional(Conditional {
            test,
            if_true,
            if_false,
            ty,
        })))
    }

    pub fn if_then(test: Expression, if_true: Expression) -> Result<Expression, ConstructionError> {
        Expression::condition_typed(Type::Void, test, if_true, None)
    }

    pub fn if_then_else(
        test: Expression,
        if_true: Expression,
        if_false: Expression,
    ) -> Result<Expression, ConstructionError> {
        Expression::condition_typed(Type::Void, test, if_true, Some(if_false))
    }

    /// An endless loop, left only through its break label.
    pub fn infinite(
        body: Expression,
        break_target: Option<LabelTarget>,
        continue_target: Option<LabelTarget>,
    ) -> Result<Expression, ConstructionError> {
        require_continue(&continue_target)?;
        Ok(Expression::new(Node::Loop(Loop {
            body,
            break_target,
            continue_target,
        })))
    }

    pub fn jump(kind: GotoKind, target: LabelTarget, value: Option<Expression>) -> Expression {
        Expression::new(Node::Goto(Goto {
            kind,
            target,
            value,
        }))
    }

    pub fn goto(target: LabelTarget) -> Expression {
        Expression::jump(GotoKind::Goto, target, None)
    }

    pub fn break_to(target: LabelTarget) -> Expression {
        Expression::jump(GotoKind::Break, target, None)
    }

    pub fn continue_to(target: LabelTarget) -> Expression {
        Expression::jump(GotoKind::Continue, target, None)
    }

    pub fn return_to(target: LabelTarget, value: Option<Expression>) -> Expression {
        Expression::jump(GotoKind::Return, target, value)
    }

    pub fn label(target: LabelTarget) -> Expression {
        Expression::label_with(target, None)
    }

    pub fn label_with(target: LabelTarget, default: Option<Expression>) -> Expression {
        Expression::new(Node::Label(Label { target, default }))
    }

    /// A switch typed after its first case body, or its default body when
    /// there are no cases.
    pub fn switch(value: Expression, default: Option<Expression>, cases: Vec<SwitchCase>) -> Expression {
        let ty = cases
            .first()
            .map(|case| case.body.ty())
            .or_else(|| {
                default
                    .as_ref()
                    .map(|body| body.ty())
            })
            .unwrap_or(Type::Void);
        Expression::new(Node::Switch(Switch {
            value,
            cases,
            default,
            ty,
        }))
    }

    pub fn try_with(
        body: Expression,
        handlers: Vec<CatchBlock>,
        fault: Option<Expression>,
        finally: Option<Expression>,
    ) -> Result<Expression, ConstructionError> {
        if handlers.is_empty() && fault.is_none() && finally.is_none() {
            return Err(ConstructionError::EmptyTry);
        }
        Ok(Expression::new(Node::Try(Try {
            body,
            handlers,
            fault,
            finally,
        })))
    }

    pub fn try_catch(body: Expression, handlers: Vec<CatchBlock>) -> Result<Expression, ConstructionError> {
        Expression::try_with(body, handlers, None, None)
    }

    pub fn try_finally(body: Expression, finally: Expression) -> Result<Expression, ConstructionError> {
        Expression::try_with(body, Vec::new(), None, Some(finally))
    }

    pub fn try_fault(body: Expression, fault: Expression) -> Result<Expression, ConstructionError> {
        Expression::try_with(body, Vec::new(), Some(fault), None)
    }

    // objects

    pub fn new_object(ty: Type, arguments: Vec<Expression>) -> Expression {
        Expression::new(Node::New(New { ty, arguments }))
    }

    /// `new T[] {a, b}`
    pub fn new_array_init(element: Type, expressions: Vec<Expression>) -> Expression {
        Expression::new(Node::NewArray(NewArray {
            form: ArrayForm::Init,
            ty: Type::array(element),
            expressions,
        }))
    }

    /// `new T[n, m]`, one bound per dimension.
    pub fn new_array_bounds(element: Type, bounds: Vec<Expression>) -> Expression {
        let rank = bounds.len();
        Expression::new(Node::NewArray(NewArray {
            form: ArrayForm::Bounds,
            ty: Type::array_of_rank(element, rank),
            expressions: bounds,
        }))
    }

    pub fn list_init(
        new: Expression,
        initializers: Vec<ElementInit>,
    ) -> Result<Expression, ConstructionError> {
        if new.kind() != Kind::New {
            return Err(ConstructionError::NotNew(new.kind()));
        }
        Ok(Expression::new(Node::ListInit(ListInit {
            new,
            initializers,
        })))
    }

    pub fn member_init(
        new: Expression,
        bindings: Vec<MemberBinding>,
    ) -> Result<Expression, ConstructionError> {
        if new.kind() != Kind::New {
            return Err(ConstructionError::NotNew(new.kind()));
        }
        Ok(Expression::new(Node::MemberInit(MemberInit { new, bindings })))
    }

    pub fn call(target: Expression, method: Method, arguments: Vec<Expression>) -> Expression {
        Expression::new(Node::MethodCall(MethodCall {
            target: Some(target),
            method,
            arguments,
        }))
    }

    pub fn call_static(method: Method, arguments: Vec<Expression>) -> Expression {
        Expression::new(Node::MethodCall(MethodCall {
            target: None,
            method,
            arguments,
        }))
    }

    pub fn member(target: Expression, member: Member) -> Expression {
        Expression::new(Node::Member(MemberAccess {
            target: Some(target),
            member,
        }))
    }

    pub fn member_static(member: Member) -> Expression {
        Expression::new(Node::Member(MemberAccess {
            target: None,
            member,
        }))
    }

    /// Invoke a delegate. A `Func<…>` target gives its last type argument as
    /// the result type; anything else is treated as an action.
    pub fn invoke(target: Expression, arguments: Vec<Expression>) -> Expression {
        let ty = match target.ty() {
            Type::Named(named) if named.name == "Func" => named
                .arguments
                .last()
                .cloned()
                .unwrap_or(Type::Void),
            _ => Type::Void,
        };
        Expression::new(Node::Invocation(Invocation {
            target,
            arguments,
            ty,
        }))
    }

    pub fn index(target: Expression, arguments: Vec<Expression>, ty: Type) -> Expression {
        Expression::new(Node::Index(Index {
            target,
            arguments,
            ty,
        }))
    }
}
