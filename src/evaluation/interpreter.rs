//! A tree-walking interpreter for lambdas

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::evaluation::arithmetic;
use crate::evaluation::EvaluationError;
use crate::language::*;
use crate::reduction::lower;

/// A host function callable from a tree as a static method.
pub type Function = Rc<dyn Fn(&[Value]) -> Result<Value, EvaluationError>>;

/// How evaluation of a node ended, other than by producing a value.
enum Flow {
    /// A goto looking for its label, carrying the value for the label.
    Jump(LabelTarget, Value),
    /// An exception travelling up to the nearest matching handler.
    Throw(Value),
    Fail(EvaluationError),
}

impl From<EvaluationError> for Flow {
    fn from(error: EvaluationError) -> Flow {
        match error {
            EvaluationError::Thrown(value) => Flow::Throw(value),
            error => Flow::Fail(error),
        }
    }
}

impl From<ConstructionError> for Flow {
    fn from(error: ConstructionError) -> Flow {
        Flow::Fail(error.into())
    }
}

type Outcome = Result<Value, Flow>;

/// Evaluates trees directly. Variables live in a single scope keyed by
/// parameter identity; blocks and lambdas restore what they shadow on exit.
#[derive(Default)]
pub struct Interpreter {
    scope: HashMap<u64, Value>,
    functions: HashMap<String, Function>,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::default()
    }

    /// Make a host function callable as the static method `name`, written
    /// as `Type.Method`.
    pub fn define<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[Value]) -> Result<Value, EvaluationError> + 'static,
    {
        self.functions
            .insert(name.to_string(), Rc::new(function));
    }

    /// Call a lambda with the given arguments.
    pub fn invoke(&mut self, lambda: &Lambda, arguments: Vec<Value>) -> Result<Value, EvaluationError> {
        debug!(
            parameters = lambda
                .parameters
                .len(),
            "Invoking lambda"
        );

        if arguments.len()
            != lambda
                .parameters
                .len()
        {
            return Err(EvaluationError::ArgumentCount {
                expected: lambda
                    .parameters
                    .len(),
                found: arguments.len(),
            });
        }

        let body = lower(&lambda.body)?;

        let mut saved = Vec::new();
        for (parameter, argument) in lambda
            .parameters
            .iter()
            .zip(arguments)
        {
            saved.push((parameter, self.bind(parameter, argument)));
        }

        let result = self.eval(&body);

        for (parameter, previous) in saved
            .into_iter()
            .rev()
        {
            self.unbind(parameter, previous);
        }

        finish(result)
    }

    /// Evaluate an expression against the variables currently in scope.
    pub fn evaluate(&mut self, expression: &Expression) -> Result<Value, EvaluationError> {
        let expression = lower(expression)?;
        finish(self.eval(&expression))
    }

    fn bind(&mut self, parameter: &Parameter, value: Value) -> Option<Value> {
        self.scope
            .insert(parameter.id(), value)
    }

    fn unbind(&mut self, parameter: &Parameter, previous: Option<Value>) {
        match previous {
            Some(value) => {
                self.scope
                    .insert(parameter.id(), value);
            }
            None => {
                self.scope
                    .remove(&parameter.id());
            }
        }
    }

    fn eval(&mut self, expression: &Expression) -> Outcome {
        match expression.node() {
            Node::Constant(constant) => Ok(constant
                .value
                .clone()),
            Node::Parameter(parameter) => self.load(parameter),
            Node::Default(ty) => Ok(Value::default_of(ty)),
            Node::Lambda(lambda) => Ok(self.closure(lambda)),
            Node::Unary(unary) => self.unary(unary),
            Node::Binary(binary) => self.binary(binary),
            Node::TypeBinary(binary) => {
                let value = self.eval(&binary.operand)?;
                let result = !value.is_null()
                    && match binary.operator {
                        TypeOperator::TypeIs => binary
                            .test
                            .is_assignable_from(&value.type_of()),
                        TypeOperator::TypeEqual => value.type_of() == binary.test,
                    };
                Ok(Value::Boolean(result))
            }
            Node::Block(block) => self.block(block),
            Node::Conditional(conditional) => {
                let test = self.eval(&conditional.test)?;
                if truth(&test)? {
                    self.eval(&conditional.if_true)
                } else {
                    match &conditional.if_false {
                        Some(if_false) => self.eval(if_false),
                        None => Ok(Value::Void),
                    }
                }
            }
            Node::Loop(looping) => self.repeat(looping),
            Node::Goto(goto) => {
                let value = match &goto.value {
                    Some(value) => self.eval(value)?,
                    None => Value::Void,
                };
                Err(Flow::Jump(
                    goto.target
                        .clone(),
                    value,
                ))
            }
            Node::Label(label) => match &label.default {
                Some(default) => self.eval(default),
                None => Ok(Value::Void),
            },
            Node::Switch(switch) => self.switch(switch),
            Node::Try(attempt) => self.attempt(attempt),
            Node::New(new) => {
                if !new
                    .arguments
                    .is_empty()
                {
                    return Err(EvaluationError::Unsupported(Kind::New).into());
                }
                if new
                    .ty
                    .is_value_type()
                {
                    Ok(Value::default_of(&new.ty))
                } else {
                    Ok(Value::Object(Rc::new(Instance::new(
                        new.ty
                            .clone(),
                    ))))
                }
            }
            Node::NewArray(array) => self.new_array(array),
            Node::ListInit(init) => {
                let object = self.eval(&init.new)?;
                self.initialize(&object, &init.initializers)?;
                Ok(object)
            }
            Node::MemberInit(init) => {
                let object = self.eval(&init.new)?;
                self.bindings(&object, &init.bindings)?;
                Ok(object)
            }
            Node::MethodCall(call) => self.call(call),
            Node::Member(access) => {
                let Some(target) = &access.target else {
                    return Err(EvaluationError::MissingMember {
                        ty: access
                            .member
                            .declaring
                            .clone(),
                        name: access
                            .member
                            .name
                            .clone(),
                    }
                    .into());
                };
                let target = self.eval(target)?;
                Ok(get(&target, &access.member)?)
            }
            Node::Invocation(invocation) => {
                let target = self.eval(&invocation.target)?;
                let arguments = self.arguments(&invocation.arguments)?;
                let method = Method::instance(
                    target.type_of(),
                    "Invoke",
                    Vec::new(),
                    invocation
                        .ty
                        .clone(),
                );
                Ok(call_on(&target, &method, &arguments)?)
            }
            Node::Index(index) => {
                let target = self.eval(&index.target)?;
                let arguments = self.arguments(&index.arguments)?;
                Ok(index_get(&target, &arguments, &index.ty)?)
            }
            Node::For(_) | Node::ForEach(_) | Node::While(_) | Node::DoWhile(_) | Node::Using(_) => {
                let reduced = expression.reduce()?;
                self.eval(&reduced)
            }
        }
    }

    fn load(&self, parameter: &Parameter) -> Outcome {
        match self
            .scope
            .get(&parameter.id())
        {
            Some(value) => Ok(value.clone()),
            None => Err(EvaluationError::Unbound(describe(parameter)).into()),
        }
    }

    /// Write a value to an assignable node.
    fn store(&mut self, target: &Expression, value: Value) -> Result<(), Flow> {
        match target.node() {
            Node::Parameter(parameter) => {
                if !self
                    .scope
                    .contains_key(&parameter.id())
                {
                    return Err(EvaluationError::Unbound(describe(parameter)).into());
                }
                self.bind(parameter, value);
                Ok(())
            }
            Node::Member(MemberAccess {
                target: Some(object),
                member,
            }) => {
                let object = self.eval(object)?;
                Ok(set(&object, member, value)?)
            }
            Node::Binary(Binary {
                operator: BinaryOperator::ArrayIndex,
                left,
                right,
                ..
            }) => {
                let array = self.eval(left)?;
                let index = self.eval(right)?;
                Ok(array_set(&array, &index, value)?)
            }
            Node::Index(index) => {
                let object = self.eval(&index.target)?;
                let mut arguments = self.arguments(&index.arguments)?;
                if let [position] = arguments.as_slice() {
                    if let Value::Array(..) = object {
                        return Ok(array_set(&object, position, value)?);
                    }
                }
                arguments.push(value);
                let method = Method::instance(
                    object.type_of(),
                    "set_Item",
                    Vec::new(),
                    Type::Void,
                );
                call_on(&object, &method, &arguments)?;
                Ok(())
            }
            _ => Err(EvaluationError::Unsupported(target.kind()).into()),
        }
    }

    fn arguments(&mut self, expressions: &[Expression]) -> Result<Vec<Value>, Flow> {
        let mut values = Vec::with_capacity(expressions.len());
        for expression in expressions {
            values.push(self.eval(expression)?);
        }
        Ok(values)
    }

    fn closure(&self, lambda: &Lambda) -> Value {
        Value::Object(Rc::new(Closure {
            lambda: lambda.clone(),
            captured: self
                .scope
                .clone(),
            functions: self
                .functions
                .clone(),
        }))
    }

    fn unary(&mut self, unary: &Unary) -> Outcome {
        let operator = unary.operator;
        match operator {
            UnaryOperator::Quote => self.eval(&unary.operand),
            UnaryOperator::Throw => {
                let exception = self.eval(&unary.operand)?;
                if exception.is_null() {
                    return Err(EvaluationError::NullReference.into());
                }
                Err(Flow::Throw(exception))
            }
            UnaryOperator::PreIncrementAssign
            | UnaryOperator::PreDecrementAssign
            | UnaryOperator::PostIncrementAssign
            | UnaryOperator::PostDecrementAssign => {
                let current = self.eval(&unary.operand)?;
                let updated = arithmetic::unary(operator, &current)?;
                self.store(&unary.operand, updated.clone())?;
                match operator {
                    UnaryOperator::PreIncrementAssign | UnaryOperator::PreDecrementAssign => {
                        Ok(updated)
                    }
                    _ => Ok(current),
                }
            }
            UnaryOperator::ArrayLength => {
                let array = self.eval(&unary.operand)?;
                Ok(get(&array, &Member::length(array.type_of()))?)
            }
            UnaryOperator::TypeAs => {
                let value = self.eval(&unary.operand)?;
                if !value.is_null()
                    && unary
                        .ty
                        .is_assignable_from(&value.type_of())
                {
                    Ok(value)
                } else {
                    Ok(Value::Null)
                }
            }
            UnaryOperator::Convert | UnaryOperator::Unbox => {
                let value = self.eval(&unary.operand)?;
                Ok(arithmetic::convert(&value, &unary.ty, false)?)
            }
            UnaryOperator::ConvertChecked => {
                let value = self.eval(&unary.operand)?;
                Ok(arithmetic::convert(&value, &unary.ty, true)?)
            }
            _ => {
                let value = self.eval(&unary.operand)?;
                Ok(arithmetic::unary(operator, &value)?)
            }
        }
    }

    fn binary(&mut self, binary: &Binary) -> Outcome {
        match binary.operator {
            BinaryOperator::Assign => {
                let value = self.eval(&binary.right)?;
                self.store(&binary.left, value.clone())?;
                Ok(value)
            }
            BinaryOperator::AndAlso => {
                let left = self.eval(&binary.left)?;
                if !truth(&left)? {
                    return Ok(Value::Boolean(false));
                }
                let right = self.eval(&binary.right)?;
                Ok(Value::Boolean(truth(&right)?))
            }
            BinaryOperator::OrElse => {
                let left = self.eval(&binary.left)?;
                if truth(&left)? {
                    return Ok(Value::Boolean(true));
                }
                let right = self.eval(&binary.right)?;
                Ok(Value::Boolean(truth(&right)?))
            }
            BinaryOperator::Coalesce => {
                let left = self.eval(&binary.left)?;
                if left.is_null() {
                    self.eval(&binary.right)
                } else {
                    Ok(left)
                }
            }
            BinaryOperator::ArrayIndex => {
                let array = self.eval(&binary.left)?;
                let index = self.eval(&binary.right)?;
                Ok(array_get(&array, &index)?)
            }
            operator => {
                let left = self.eval(&binary.left)?;
                let right = self.eval(&binary.right)?;
                let result = arithmetic::binary(operator, &left, &right, binary.checked)?;
                if binary.assign {
                    self.store(&binary.left, result.clone())?;
                }
                Ok(result)
            }
        }
    }

    fn block(&mut self, block: &Block) -> Outcome {
        let mut saved = Vec::with_capacity(
            block
                .variables
                .len(),
        );
        for variable in &block.variables {
            let previous = self.bind(variable, Value::default_of(variable.ty()));
            saved.push((variable, previous));
        }

        let result = self.statements(&block.expressions);

        for (variable, previous) in saved
            .into_iter()
            .rev()
        {
            self.unbind(variable, previous);
        }

        let value = result?;
        if block
            .ty
            .is_void()
        {
            Ok(Value::Void)
        } else {
            Ok(value)
        }
    }

    /// Run statements in order. A jump to a label among them resumes right
    /// after that label, with the jump's value as the label's value.
    fn statements(&mut self, expressions: &[Expression]) -> Outcome {
        let mut last = Value::Void;
        let mut position = 0;

        while position < expressions.len() {
            match self.eval(&expressions[position]) {
                Ok(value) => {
                    last = value;
                    position += 1;
                }
                Err(Flow::Jump(target, value)) => {
                    match expressions
                        .iter()
                        .position(|expression| is_label(expression, &target))
                    {
                        Some(index) => {
                            last = value;
                            position = index + 1;
                        }
                        None => return Err(Flow::Jump(target, value)),
                    }
                }
                Err(flow) => return Err(flow),
            }
        }
        Ok(last)
    }

    fn repeat(&mut self, looping: &Loop) -> Outcome {
        loop {
            match self.eval(&looping.body) {
                Ok(_) => {}
                Err(Flow::Jump(target, value))
                    if looping
                        .break_target
                        .as_ref()
                        == Some(&target) =>
                {
                    return Ok(value);
                }
                Err(Flow::Jump(target, _))
                    if looping
                        .continue_target
                        .as_ref()
                        == Some(&target) => {}
                Err(flow) => return Err(flow),
            }
        }
    }

    fn switch(&mut self, switch: &Switch) -> Outcome {
        let value = self.eval(&switch.value)?;
        for case in &switch.cases {
            for test in &case.tests {
                if self.eval(test)? == value {
                    return self.eval(&case.body);
                }
            }
        }
        match &switch.default {
            Some(default) => self.eval(default),
            None => Ok(Value::Void),
        }
    }

    fn attempt(&mut self, attempt: &Try) -> Outcome {
        let mut result = self.eval(&attempt.body);

        let exception = match &result {
            Err(Flow::Throw(exception)) => Some(exception.clone()),
            Err(Flow::Fail(error)) => error
                .exception_type()
                .map(|ty| Value::Object(Rc::new(Instance::new(ty)))),
            _ => None,
        };

        if let Some(exception) = exception {
            match self.handle(attempt, &exception) {
                Some(handled) => result = handled,
                None => {
                    if let Some(fault) = &attempt.fault {
                        self.eval(fault)?;
                    }
                }
            }
        }

        if let Some(finally) = &attempt.finally {
            self.eval(finally)?;
        }
        result
    }

    /// Run the first handler whose type and filter accept the exception.
    fn handle(&mut self, attempt: &Try, exception: &Value) -> Option<Outcome> {
        let thrown = exception.type_of();

        for handler in &attempt.handlers {
            if !handler
                .test
                .is_assignable_from(&thrown)
            {
                continue;
            }

            let previous = handler
                .variable
                .as_ref()
                .map(|variable| (variable, self.bind(variable, exception.clone())));

            let accepted = match &handler.filter {
                Some(filter) => matches!(self.eval(filter), Ok(Value::Boolean(true))),
                None => true,
            };
            let outcome = accepted.then(|| self.eval(&handler.body));

            if let Some((variable, previous)) = previous {
                self.unbind(variable, previous);
            }
            if outcome.is_some() {
                return outcome;
            }
        }
        None
    }

    fn new_array(&mut self, array: &NewArray) -> Outcome {
        let element = array
            .ty
            .element()
            .cloned()
            .unwrap_or(Type::Object);
        match array.form {
            ArrayForm::Init => {
                let values = self.arguments(&array.expressions)?;
                Ok(Value::array(element, values))
            }
            ArrayForm::Bounds => {
                let bounds = self.arguments(&array.expressions)?;
                let [length] = bounds.as_slice() else {
                    return Err(EvaluationError::Unsupported(Kind::NewArray(ArrayForm::Bounds)).into());
                };
                let length = length
                    .as_integer()
                    .unwrap_or(-1);
                let length =
                    usize::try_from(length).map_err(|_| EvaluationError::Overflow)?;
                let values = vec![Value::default_of(&element); length];
                Ok(Value::array(element, values))
            }
        }
    }

    fn initialize(&mut self, object: &Value, initializers: &[ElementInit]) -> Result<(), Flow> {
        for initializer in initializers {
            let arguments = self.arguments(&initializer.arguments)?;
            call_on(object, &initializer.method, &arguments)?;
        }
        Ok(())
    }

    fn bindings(&mut self, object: &Value, bindings: &[MemberBinding]) -> Result<(), Flow> {
        for binding in bindings {
            match binding {
                MemberBinding::Assignment(member, expression) => {
                    let value = self.eval(expression)?;
                    set(object, member, value)?;
                }
                MemberBinding::List(member, initializers) => {
                    let collection = get(object, member)?;
                    self.initialize(&collection, initializers)?;
                }
                MemberBinding::Member(member, nested) => {
                    let inner = get(object, member)?;
                    self.bindings(&inner, nested)?;
                }
            }
        }
        Ok(())
    }

    fn call(&mut self, call: &MethodCall) -> Outcome {
        let target = match &call.target {
            Some(target) => Some(self.eval(target)?),
            None => None,
        };
        let arguments = self.arguments(&call.arguments)?;

        match target {
            Some(target) => Ok(call_on(&target, &call.method, &arguments)?),
            None => Ok(self.call_static(&call.method, &arguments)?),
        }
    }

    fn call_static(&self, method: &Method, arguments: &[Value]) -> Result<Value, EvaluationError> {
        let name = format!("{}.{}", method.declaring, method.name);
        if let Some(function) = self
            .functions
            .get(&name)
        {
            return function(arguments);
        }

        if *method == Method::pow() {
            if let [x, y] = arguments {
                return arithmetic::binary(BinaryOperator::Power, x, y, false);
            }
        }

        Err(EvaluationError::MissingMember {
            ty: method
                .declaring
                .clone(),
            name: method
                .name
                .clone(),
        })
    }
}

fn finish(result: Outcome) -> Result<Value, EvaluationError> {
    match result {
        Ok(value) => Ok(value),
        Err(Flow::Jump(target, _)) => Err(EvaluationError::UnresolvedLabel(
            target
                .name()
                .unwrap_or("(anonymous)")
                .to_string(),
        )),
        Err(Flow::Throw(exception)) => Err(EvaluationError::Uncaught(exception)),
        Err(Flow::Fail(error)) => Err(error),
    }
}

fn describe(parameter: &Parameter) -> String {
    match parameter.name() {
        Some(name) => name.to_string(),
        None => format!("#{}", parameter.id()),
    }
}

fn is_label(expression: &Expression, target: &LabelTarget) -> bool {
    match expression.node() {
        Node::Label(label) => label.target == *target,
        _ => false,
    }
}

fn truth(value: &Value) -> Result<bool, Flow> {
    value
        .as_bool()
        .ok_or_else(|| EvaluationError::NotBoolean(value.type_of()).into())
}

fn missing(value: &Value, name: &str) -> EvaluationError {
    EvaluationError::MissingMember {
        ty: value.type_of(),
        name: name.to_string(),
    }
}

fn get(target: &Value, member: &Member) -> Result<Value, EvaluationError> {
    match target {
        Value::Null => Err(EvaluationError::NullReference),
        Value::Object(object) => object.get(member),
        Value::Array(values, _) if member.name == "Length" => {
            let length = values
                .borrow()
                .len();
            Ok(Value::Int32(
                i32::try_from(length).map_err(|_| EvaluationError::Overflow)?,
            ))
        }
        Value::String(text) if member.name == "Length" => {
            let length = text
                .chars()
                .count();
            Ok(Value::Int32(
                i32::try_from(length).map_err(|_| EvaluationError::Overflow)?,
            ))
        }
        _ => Err(missing(target, &member.name)),
    }
}

fn set(target: &Value, member: &Member, value: Value) -> Result<(), EvaluationError> {
    match target {
        Value::Null => Err(EvaluationError::NullReference),
        Value::Object(object) => object.set(member, value),
        _ => Err(missing(target, &member.name)),
    }
}

fn call_on(target: &Value, method: &Method, arguments: &[Value]) -> Result<Value, EvaluationError> {
    match target {
        Value::Null => Err(EvaluationError::NullReference),
        _ if method.name == "GetType" && arguments.is_empty() => Ok(Value::Type(target.type_of())),
        Value::Object(object) => object.invoke(method, arguments),
        _ => Err(missing(target, &method.name)),
    }
}

fn position(array: &[Value], index: &Value) -> Result<usize, EvaluationError> {
    let index = index
        .as_integer()
        .ok_or(EvaluationError::InvalidCast {
            from: index.type_of(),
            to: Type::Int32,
        })?;
    match usize::try_from(index) {
        Ok(position) if position < array.len() => Ok(position),
        _ => Err(EvaluationError::IndexOutOfRange(index as i64)),
    }
}

fn array_get(array: &Value, index: &Value) -> Result<Value, EvaluationError> {
    match array {
        Value::Null => Err(EvaluationError::NullReference),
        Value::Array(values, _) => {
            let values = values.borrow();
            let position = position(&values, index)?;
            Ok(values[position].clone())
        }
        _ => Err(missing(array, "[]")),
    }
}

fn array_set(array: &Value, index: &Value, value: Value) -> Result<(), EvaluationError> {
    match array {
        Value::Null => Err(EvaluationError::NullReference),
        Value::Array(values, _) => {
            let mut values = values.borrow_mut();
            let position = position(&values, index)?;
            values[position] = value;
            Ok(())
        }
        _ => Err(missing(array, "[]")),
    }
}

fn index_get(target: &Value, arguments: &[Value], ty: &Type) -> Result<Value, EvaluationError> {
    match (target, arguments) {
        (Value::Array(..), [index]) => array_get(target, index),
        (Value::String(text), [index]) => {
            let characters: Vec<Value> = text
                .chars()
                .map(Value::Char)
                .collect();
            let position = position(&characters, index)?;
            Ok(characters[position].clone())
        }
        _ => {
            let method = Method::instance(target.type_of(), "get_Item", Vec::new(), ty.clone());
            call_on(target, &method, arguments)
        }
    }
}

/// An object created by `new` for a type the host did not supply. Fields
/// spring into existence when assigned; a member of class type that was
/// never assigned is created on first read so that nested initializers
/// have something to fill. `Add` collects items, which `Count` and the
/// indexer read back.
pub struct Instance {
    ty: Type,
    fields: RefCell<HashMap<String, Value>>,
    items: RefCell<Vec<Value>>,
}

impl Instance {
    pub fn new(ty: Type) -> Instance {
        Instance {
            ty,
            fields: RefCell::new(HashMap::new()),
            items: RefCell::new(Vec::new()),
        }
    }

    pub fn items(&self) -> Vec<Value> {
        self.items
            .borrow()
            .clone()
    }
}

impl Object for Instance {
    fn type_of(&self) -> Type {
        self.ty
            .clone()
    }

    fn invoke(&self, method: &Method, arguments: &[Value]) -> Result<Value, EvaluationError> {
        match (method.name.as_str(), arguments) {
            ("Add", [item]) => {
                self.items
                    .borrow_mut()
                    .push(item.clone());
                Ok(Value::Void)
            }
            ("Add", entry) => {
                let entry = Value::array(Type::Object, entry.to_vec());
                self.items
                    .borrow_mut()
                    .push(entry);
                Ok(Value::Void)
            }
            ("get_Item", [index]) => {
                let items = self.items.borrow();
                let position = position(&items, index)?;
                Ok(items[position].clone())
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
        if let Some(value) = self
            .fields
            .borrow()
            .get(&member.name)
        {
            return Ok(value.clone());
        }

        if member.name == "Count" {
            let count = self
                .items
                .borrow()
                .len();
            return Ok(Value::Int32(
                i32::try_from(count).map_err(|_| EvaluationError::Overflow)?,
            ));
        }

        let value = match &member.ty {
            Type::Named(_) if !member
                .ty
                .is_value_type() =>
            {
                Value::Object(Rc::new(Instance::new(
                    member
                        .ty
                        .clone(),
                )))
            }
            ty => Value::default_of(ty),
        };
        self.fields
            .borrow_mut()
            .insert(
                member
                    .name
                    .clone(),
                value.clone(),
            );
        Ok(value)
    }

    fn set(&self, member: &Member, value: Value) -> Result<(), EvaluationError> {
        self.fields
            .borrow_mut()
            .insert(
                member
                    .name
                    .clone(),
                value,
            );
        Ok(())
    }
}

/// A lambda evaluated as a value. It sees the variables that were in scope
/// when it was created, as they were at that moment.
struct Closure {
    lambda: Lambda,
    captured: HashMap<u64, Value>,
    functions: HashMap<String, Function>,
}

impl Object for Closure {
    fn type_of(&self) -> Type {
        self.lambda
            .ty()
    }

    fn invoke(&self, method: &Method, arguments: &[Value]) -> Result<Value, EvaluationError> {
        if method.name != "Invoke" {
            return Err(EvaluationError::MissingMember {
                ty: self.type_of(),
                name: method
                    .name
                    .clone(),
            });
        }

        let mut interpreter = Interpreter {
            scope: self
                .captured
                .clone(),
            functions: self
                .functions
                .clone(),
        };
        interpreter.invoke(&self.lambda, arguments.to_vec())
    }
}
