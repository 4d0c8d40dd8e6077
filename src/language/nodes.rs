//! The expression tree node variants

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::language::{DoWhile, For, ForEach, Member, Method, Type, Using, Value, While};

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

fn identity() -> u64 {
    NEXT_IDENTITY.fetch_add(1, Ordering::Relaxed)
}

/// A shared, immutable node. Cloning an Expression shares the node; use
/// [`Expression::ptr_eq`] to ask whether two handles are the same node.
#[derive(Clone)]
pub struct Expression(Rc<Node>);

impl Expression {
    pub fn new(node: Node) -> Expression {
        Expression(Rc::new(node))
    }

    pub fn node(&self) -> &Node {
        &self.0
    }

    pub fn ptr_eq(a: &Expression, b: &Expression) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for Expression {
    type Target = Node;

    fn deref(&self) -> &Node {
        &self.0
    }
}

impl fmt::Debug for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.node(), f)
    }
}

#[derive(Debug)]
pub enum Node {
    Constant(Constant),
    Parameter(Parameter),
    Default(Type),
    Lambda(Lambda),
    Unary(Unary),
    Binary(Binary),
    TypeBinary(TypeBinary),
    Block(Block),
    Conditional(Conditional),
    Loop(Loop),
    Goto(Goto),
    Label(Label),
    Switch(Switch),
    Try(Try),
    New(New),
    NewArray(NewArray),
    ListInit(ListInit),
    MemberInit(MemberInit),
    MethodCall(MethodCall),
    Member(MemberAccess),
    Invocation(Invocation),
    Index(Index),
    For(For),
    ForEach(ForEach),
    While(While),
    DoWhile(DoWhile),
    Using(Using),
}

/// Discriminant of a node, used for dispatch and classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Constant,
    Parameter,
    Default,
    Lambda,
    Unary(UnaryOperator),
    Binary {
        operator: BinaryOperator,
        assign: bool,
        checked: bool,
    },
    TypeBinary(TypeOperator),
    Block,
    Conditional,
    Loop,
    Goto(GotoKind),
    Label,
    Switch,
    Try,
    New,
    NewArray(ArrayForm),
    ListInit,
    MemberInit,
    MethodCall,
    Member,
    Invocation,
    Index,
    For,
    ForEach,
    While,
    DoWhile,
    Using,
}

impl Kind {
    /// Whether this is one of the loop-shaped variants that lower
    /// themselves to primitive nodes.
    pub fn is_derived(&self) -> bool {
        matches!(
            self,
            Kind::For | Kind::ForEach | Kind::While | Kind::DoWhile | Kind::Using
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    NegateChecked,
    UnaryPlus,
    Not,
    OnesComplement,
    Convert,
    ConvertChecked,
    Unbox,
    TypeAs,
    ArrayLength,
    Throw,
    Quote,
    Increment,
    Decrement,
    PreIncrementAssign,
    PostIncrementAssign,
    PreDecrementAssign,
    PostDecrementAssign,
    IsTrue,
    IsFalse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    ExclusiveOr,
    LeftShift,
    RightShift,
    AndAlso,
    OrElse,
    Coalesce,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Power,
    Assign,
    ArrayIndex,
}

impl BinaryOperator {
    /// The infix token, for operators written as one.
    pub fn token(&self) -> Option<&'static str> {
        let token = match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
            BinaryOperator::And => "&",
            BinaryOperator::Or => "|",
            BinaryOperator::ExclusiveOr => "^",
            BinaryOperator::LeftShift => "<<",
            BinaryOperator::RightShift => ">>",
            BinaryOperator::AndAlso => "&&",
            BinaryOperator::OrElse => "||",
            BinaryOperator::Coalesce => "??",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::Assign => "=",
            BinaryOperator::Power | BinaryOperator::ArrayIndex => return None,
        };
        Some(token)
    }

    /// Whether `a op= b` exists for this operator.
    pub fn has_compound_form(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add
                | BinaryOperator::Subtract
                | BinaryOperator::Multiply
                | BinaryOperator::Divide
                | BinaryOperator::Modulo
                | BinaryOperator::And
                | BinaryOperator::Or
                | BinaryOperator::ExclusiveOr
                | BinaryOperator::LeftShift
                | BinaryOperator::RightShift
                | BinaryOperator::Power
        )
    }

    pub fn has_checked_form(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Add | BinaryOperator::Subtract | BinaryOperator::Multiply
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::LessThan
                | BinaryOperator::LessThanOrEqual
                | BinaryOperator::GreaterThan
                | BinaryOperator::GreaterThanOrEqual
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeOperator {
    TypeIs,
    TypeEqual,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GotoKind {
    Return,
    Break,
    Continue,
    Goto,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArrayForm {
    Init,
    Bounds,
}

#[derive(Debug)]
struct Variable {
    id: u64,
    name: Option<String>,
    ty: Type,
}

/// A parameter or block variable. Two parameters are the same only when
/// they come from the same construction; names play no part.
#[derive(Clone)]
pub struct Parameter(Rc<Variable>);

impl Parameter {
    pub fn new(ty: Type, name: &str) -> Parameter {
        Parameter(Rc::new(Variable {
            id: identity(),
            name: Some(name.to_string()),
            ty,
        }))
    }

    pub fn anonymous(ty: Type) -> Parameter {
        Parameter(Rc::new(Variable {
            id: identity(),
            name: None,
            ty,
        }))
    }

    pub fn id(&self) -> u64 {
        self.0
            .id
    }

    pub fn name(&self) -> Option<&str> {
        self.0
            .name
            .as_deref()
    }

    pub fn ty(&self) -> &Type {
        &self.0
            .ty
    }

    /// A fresh parameter with the same name and type but its own identity.
    pub fn duplicate(&self) -> Parameter {
        match self.name() {
            Some(name) => Parameter::new(self.ty().clone(), name),
            None => Parameter::anonymous(self.ty().clone()),
        }
    }

    pub fn expression(&self) -> Expression {
        Expression::new(Node::Parameter(self.clone()))
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Parameter) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id()
            .hash(state);
    }
}

impl fmt::Debug for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Parameter({} {} #{})", self.ty(), name, self.id()),
            None => write!(f, "Parameter({} #{})", self.ty(), self.id()),
        }
    }
}

impl From<&Parameter> for Expression {
    fn from(parameter: &Parameter) -> Expression {
        parameter.expression()
    }
}

impl From<Parameter> for Expression {
    fn from(parameter: Parameter) -> Expression {
        Expression::new(Node::Parameter(parameter))
    }
}

#[derive(Debug)]
struct Target {
    id: u64,
    name: Option<String>,
    ty: Type,
}

/// The destination of a jump. Identity-compared like [`Parameter`].
#[derive(Clone)]
pub struct LabelTarget(Rc<Target>);

impl LabelTarget {
    pub fn new(name: &str) -> LabelTarget {
        LabelTarget::typed(Type::Void, Some(name))
    }

    pub fn anonymous() -> LabelTarget {
        LabelTarget::typed(Type::Void, None)
    }

    pub fn typed(ty: Type, name: Option<&str>) -> LabelTarget {
        LabelTarget(Rc::new(Target {
            id: identity(),
            name: name.map(str::to_string),
            ty,
        }))
    }

    pub fn id(&self) -> u64 {
        self.0
            .id
    }

    pub fn name(&self) -> Option<&str> {
        self.0
            .name
            .as_deref()
    }

    pub fn ty(&self) -> &Type {
        &self.0
            .ty
    }
}

impl PartialEq for LabelTarget {
    fn eq(&self, other: &LabelTarget) -> bool {
        self.id() == other.id()
    }
}

impl Eq for LabelTarget {}

impl fmt::Debug for LabelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LabelTarget({} #{})", self.name().unwrap_or("_"), self.id())
    }
}

#[derive(Debug)]
pub struct Constant {
    pub value: Value,
    pub ty: Type,
}

/// A lambda. Used both as the root handed to the writer and, quoted, as a
/// node nested inside another tree.
#[derive(Debug, Clone)]
pub struct Lambda {
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    pub body: Expression,
    pub returns: Type,
}

impl Lambda {
    /// A lambda returning whatever its body produces.
    pub fn new(body: Expression, parameters: Vec<Parameter>) -> Lambda {
        Lambda {
            name: None,
            returns: body.ty(),
            parameters,
            body,
        }
    }

    pub fn named(mut self, name: &str) -> Lambda {
        self.name = Some(name.to_string());
        self
    }

    pub fn returning(mut self, returns: Type) -> Lambda {
        self.returns = returns;
        self
    }

    /// The same lambda over a different body.
    pub fn with_body(&self, body: Expression) -> Lambda {
        Lambda {
            name: self
                .name
                .clone(),
            parameters: self
                .parameters
                .clone(),
            body,
            returns: self
                .returns
                .clone(),
        }
    }

    pub fn ty(&self) -> Type {
        let parameters: Vec<Type> = self
            .parameters
            .iter()
            .map(|parameter| parameter.ty().clone())
            .collect();
        Type::delegate(&parameters, &self.returns)
    }
}

#[derive(Debug)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub operand: Expression,
    pub ty: Type,
}

#[derive(Debug)]
pub struct Binary {
    pub operator: BinaryOperator,
    pub left: Expression,
    pub right: Expression,
    pub assign: bool,
    pub checked: bool,
    pub ty: Type,
}

#[derive(Debug)]
pub struct TypeBinary {
    pub operator: TypeOperator,
    pub operand: Expression,
    pub test: Type,
}

#[derive(Debug)]
pub struct Block {
    pub variables: Vec<Parameter>,
    pub expressions: Vec<Expression>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct Conditional {
    pub test: Expression,
    pub if_true: Expression,
    pub if_false: Option<Expression>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct Loop {
    pub body: Expression,
    pub break_target: Option<LabelTarget>,
    pub continue_target: Option<LabelTarget>,
}

#[derive(Debug)]
pub struct Goto {
    pub kind: GotoKind,
    pub target: LabelTarget,
    pub value: Option<Expression>,
}

#[derive(Debug)]
pub struct Label {
    pub target: LabelTarget,
    pub default: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub tests: Vec<Expression>,
    pub body: Expression,
}

impl SwitchCase {
    pub fn new(body: Expression, tests: Vec<Expression>) -> SwitchCase {
        SwitchCase { tests, body }
    }
}

#[derive(Debug)]
pub struct Switch {
    pub value: Expression,
    pub cases: Vec<SwitchCase>,
    pub default: Option<Expression>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct CatchBlock {
    pub test: Type,
    pub variable: Option<Parameter>,
    pub filter: Option<Expression>,
    pub body: Expression,
}

impl CatchBlock {
    pub fn new(
        test: Type,
        variable: Option<Parameter>,
        filter: Option<Expression>,
        body: Expression,
    ) -> CatchBlock {
        CatchBlock {
            test,
            variable,
            filter,
            body,
        }
    }

    pub fn catch(test: Type, body: Expression) -> CatchBlock {
        CatchBlock::new(test, None, None, body)
    }
}

#[derive(Debug)]
pub struct Try {
    pub body: Expression,
    pub handlers: Vec<CatchBlock>,
    pub fault: Option<Expression>,
    pub finally: Option<Expression>,
}

#[derive(Debug)]
pub struct New {
    pub ty: Type,
    pub arguments: Vec<Expression>,
}

#[derive(Debug)]
pub struct NewArray {
    pub form: ArrayForm,
    pub ty: Type,
    pub expressions: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct ElementInit {
    pub method: Method,
    pub arguments: Vec<Expression>,
}

impl ElementInit {
    pub fn new(method: Method, arguments: Vec<Expression>) -> ElementInit {
        ElementInit { method, arguments }
    }
}

#[derive(Debug)]
pub struct ListInit {
    pub new: Expression,
    pub initializers: Vec<ElementInit>,
}

#[derive(Debug, Clone)]
pub enum MemberBinding {
    Assignment(Member, Expression),
    List(Member, Vec<ElementInit>),
    Member(Member, Vec<MemberBinding>),
}

impl MemberBinding {
    pub fn member(&self) -> &Member {
        match self {
            MemberBinding::Assignment(member, _) => member,
            MemberBinding::List(member, _) => member,
            MemberBinding::Member(member, _) => member,
        }
    }
}

#[derive(Debug)]
pub struct MemberInit {
    pub new: Expression,
    pub bindings: Vec<MemberBinding>,
}

#[derive(Debug)]
pub struct MethodCall {
    pub target: Option<Expression>,
    pub method: Method,
    pub arguments: Vec<Expression>,
}

#[derive(Debug)]
pub struct MemberAccess {
    pub target: Option<Expression>,
    pub member: Member,
}

#[derive(Debug)]
pub struct Invocation {
    pub target: Expression,
    pub arguments: Vec<Expression>,
    pub ty: Type,
}

#[derive(Debug)]
pub struct Index {
    pub target: Expression,
    pub arguments: Vec<Expression>,
    pub ty: Type,
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Constant(_) => Kind::Constant,
            Node::Parameter(_) => Kind::Parameter,
            Node::Default(_) => Kind::Default,
            Node::Lambda(_) => Kind::Lambda,
            Node::Unary(unary) => Kind::Unary(unary.operator),
            Node::Binary(binary) => Kind::Binary {
                operator: binary.operator,
                assign: binary.assign,
                checked: binary.checked,
            },
            Node::TypeBinary(binary) => Kind::TypeBinary(binary.operator),
            Node::Block(_) => Kind::Block,
            Node::Conditional(_) => Kind::Conditional,
            Node::Loop(_) => Kind::Loop,
            Node::Goto(goto) => Kind::Goto(goto.kind),
            Node::Label(_) => Kind::Label,
            Node::Switch(_) => Kind::Switch,
            Node::Try(_) => Kind::Try,
            Node::New(_) => Kind::New,
            Node::NewArray(array) => Kind::NewArray(array.form),
            Node::ListInit(_) => Kind::ListInit,
            Node::MemberInit(_) => Kind::MemberInit,
            Node::MethodCall(_) => Kind::MethodCall,
            Node::Member(_) => Kind::Member,
            Node::Invocation(_) => Kind::Invocation,
            Node::Index(_) => Kind::Index,
            Node::For(_) => Kind::For,
            Node::ForEach(_) => Kind::ForEach,
            Node::While(_) => Kind::While,
            Node::DoWhile(_) => Kind::DoWhile,
            Node::Using(_) => Kind::Using,
        }
    }

    /// The static type of the node; `void` for statements.
    pub fn ty(&self) -> Type {
        match self {
            Node::Constant(constant) => constant
                .ty
                .clone(),
            Node::Parameter(parameter) => parameter
                .ty()
                .clone(),
            Node::Default(ty) => ty.clone(),
            Node::Lambda(lambda) => lambda.ty(),
            Node::Unary(unary) => unary
                .ty
                .clone(),
            Node::Binary(binary) => binary
                .ty
                .clone(),
            Node::TypeBinary(_) => Type::Boolean,
            Node::Block(block) => block
                .ty
                .clone(),
            Node::Conditional(conditional) => conditional
                .ty
                .clone(),
            Node::Loop(looping) => looping
                .break_target
                .as_ref()
                .map_or(Type::Void, |target| target.ty().clone()),
            Node::Goto(_) => Type::Void,
            Node::Label(label) => label
                .target
                .ty()
                .clone(),
            Node::Switch(switch) => switch
                .ty
                .clone(),
            Node::Try(attempt) => attempt
                .body
                .ty(),
            Node::New(new) => new
                .ty
                .clone(),
            Node::NewArray(array) => array
                .ty
                .clone(),
            Node::ListInit(init) => init
                .new
                .ty(),
            Node::MemberInit(init) => init
                .new
                .ty(),
            Node::MethodCall(call) => call
                .method
                .returns
                .clone(),
            Node::Member(access) => access
                .member
                .ty
                .clone(),
            Node::Invocation(invocation) => invocation
                .ty
                .clone(),
            Node::Index(index) => index
                .ty
                .clone(),
            Node::For(node) => node.ty(),
            Node::ForEach(node) => node.ty(),
            Node::While(node) => node.ty(),
            Node::DoWhile(node) => node.ty(),
            Node::Using(node) => node
                .body
                .ty(),
        }
    }

    /// The direct child expressions, in source order.
    pub fn children(&self) -> Vec<&Expression> {
        let mut children = Vec::new();
        match self {
            Node::Constant(_) | Node::Parameter(_) | Node::Default(_) => {}
            Node::Lambda(lambda) => children.push(&lambda.body),
            Node::Unary(unary) => children.push(&unary.operand),
            Node::Binary(binary) => {
                children.push(&binary.left);
                children.push(&binary.right);
            }
            Node::TypeBinary(binary) => children.push(&binary.operand),
            Node::Block(block) => children.extend(&block.expressions),
            Node::Conditional(conditional) => {
                children.push(&conditional.test);
                children.push(&conditional.if_true);
                children.extend(&conditional.if_false);
            }
            Node::Loop(looping) => children.push(&looping.body),
            Node::Goto(goto) => children.extend(&goto.value),
            Node::Label(label) => children.extend(&label.default),
            Node::Switch(switch) => {
                children.push(&switch.value);
                for case in &switch.cases {
                    children.extend(&case.tests);
                    children.push(&case.body);
                }
                children.extend(&switch.default);
            }
            Node::Try(attempt) => {
                children.push(&attempt.body);
                for handler in &attempt.handlers {
                    children.extend(&handler.filter);
                    children.push(&handler.body);
                }
                children.extend(&attempt.fault);
                children.extend(&attempt.finally);
            }
            Node::New(new) => children.extend(&new.arguments),
            Node::NewArray(array) => children.extend(&array.expressions),
            Node::ListInit(init) => {
                children.push(&init.new);
                for initializer in &init.initializers {
                    children.extend(&initializer.arguments);
                }
            }
            Node::MemberInit(init) => {
                children.push(&init.new);
                binding_children(&init.bindings, &mut children);
            }
            Node::MethodCall(call) => {
                children.extend(&call.target);
                children.extend(&call.arguments);
            }
            Node::Member(access) => children.extend(&access.target),
            Node::Invocation(invocation) => {
                children.push(&invocation.target);
                children.extend(&invocation.arguments);
            }
            Node::Index(index) => {
                children.push(&index.target);
                children.extend(&index.arguments);
            }
            Node::For(node) => {
                children.push(&node.initializer);
                children.push(&node.test);
                children.push(&node.step);
                children.push(&node.body);
            }
            Node::ForEach(node) => {
                children.push(&node.enumerable);
                children.push(&node.body);
            }
            Node::While(node) => {
                children.push(&node.test);
                children.push(&node.body);
            }
            Node::DoWhile(node) => {
                children.push(&node.body);
                children.push(&node.test);
            }
            Node::Using(node) => {
                children.push(&node.resource);
                children.push(&node.body);
            }
        }
        children
    }
}

fn binding_children<'a>(bindings: &'a [MemberBinding], children: &mut Vec<&'a Expression>) {
    for binding in bindings {
        match binding {
            MemberBinding::Assignment(_, expression) => children.push(expression),
            MemberBinding::List(_, initializers) => {
                for initializer in initializers {
                    children.extend(&initializer.arguments);
                }
            }
            MemberBinding::Member(_, nested) => binding_children(nested, children),
        }
    }
}

#[cfg(test)]
mod check {
    use super::*;

    #[test]
    fn parameters_compare_by_identity() {
        let a = Parameter::new(Type::Int32, "a");
        let b = Parameter::new(Type::Int32, "a");

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn duplicate_keeps_name_and_type() {
        let a = Parameter::new(Type::String, "s");
        let b = a.duplicate();

        assert_ne!(a, b);
        assert_eq!(b.name(), Some("s"));
        assert_eq!(b.ty(), &Type::String);
    }

    #[test]
    fn shared_nodes() {
        let x = Parameter::new(Type::Int32, "x").expression();
        let y = x.clone();
        let z = Parameter::new(Type::Int32, "z").expression();

        assert!(Expression::ptr_eq(&x, &y));
        assert!(!Expression::ptr_eq(&x, &z));
    }

    #[test]
    fn operator_tables() {
        assert!(BinaryOperator::Power.has_compound_form());
        assert!(!BinaryOperator::AndAlso.has_compound_form());
        assert!(!BinaryOperator::Divide.has_checked_form());
        assert_eq!(BinaryOperator::Coalesce.token(), Some("??"));
        assert_eq!(BinaryOperator::ArrayIndex.token(), None);
    }
}
