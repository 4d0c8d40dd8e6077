//! Writes expression trees as C# source through a Formatter

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::slice;

use tracing::debug;

use crate::formatting::precedence::{
    is_return, is_statement, is_ternary, requires_parentheses, requires_parentheses_as_target,
};
use crate::formatting::{Formatter, Referent, RenderError};
use crate::language::*;

type Outcome = Result<(), RenderError>;

/// Walks a tree and emits it through a [`Formatter`]. Synthesized names for
/// anonymous parameters and labels are numbered per writer, so a fresh
/// writer is needed for each render.
pub struct Writer<'f, F: Formatter + ?Sized> {
    output: &'f mut F,
    names: HashMap<u64, String>,
    parameters: usize,
    labels: usize,
}

impl<'f, F: Formatter + ?Sized> Writer<'f, F> {
    pub fn new(output: &'f mut F) -> Writer<'f, F> {
        Writer {
            output,
            names: HashMap::new(),
            parameters: 0,
            labels: 0,
        }
    }

    /// Write a lambda as a method: its signature, then its body as a block.
    pub fn write_lambda(&mut self, lambda: &Lambda) -> Outcome {
        debug!(
            parameters = lambda
                .parameters
                .len(),
            "Writing lambda"
        );

        self.write_type(&lambda.returns);
        self.output
            .space();
        if let Some(name) = &lambda.name {
            self.output
                .identifier(name, Referent::Lambda(lambda));
        }
        self.write_parameters(&lambda.parameters);
        self.output
            .newline();

        self.write_lambda_body(lambda)
    }

    fn write_lambda_body(&mut self, lambda: &Lambda) -> Outcome {
        match lambda
            .body
            .node()
        {
            Node::Block(block) => self.write_block(block),
            _ => self.braced(|w| {
                w.write_statements(slice::from_ref(&lambda.body), &lambda.returns)
            }),
        }
    }

    fn write_nested_lambda(&mut self, lambda: &Lambda) -> Outcome {
        self.write_parameters(&lambda.parameters);
        self.output
            .space();
        self.output
            .token("=>");
        self.output
            .newline();

        self.write_lambda_body(lambda)
    }

    fn write_parameters(&mut self, parameters: &[Parameter]) {
        self.output
            .token("(");
        for (i, parameter) in parameters
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.output
                    .token(",");
                self.output
                    .space();
            }
            self.write_type(parameter.ty());
            self.output
                .space();
            self.write_parameter(parameter);
        }
        self.output
            .token(")");
    }

    fn parameter_name(&mut self, parameter: &Parameter) -> String {
        if let Some(name) = parameter.name() {
            return name.to_string();
        }
        if let Some(name) = self
            .names
            .get(&parameter.id())
        {
            return name.clone();
        }
        let name = format!("var_${}", self.parameters);
        self.parameters += 1;
        self.names
            .insert(parameter.id(), name.clone());
        name
    }

    fn label_name(&mut self, target: &LabelTarget) -> String {
        if let Some(name) = target.name() {
            return name.to_string();
        }
        if let Some(name) = self
            .names
            .get(&target.id())
        {
            return name.clone();
        }
        let name = format!("label_${}", self.labels);
        self.labels += 1;
        self.names
            .insert(target.id(), name.clone());
        name
    }

    fn write_parameter(&mut self, parameter: &Parameter) {
        let name = self.parameter_name(parameter);
        self.output
            .identifier(&name, Referent::Parameter(parameter));
    }

    pub fn write_type(&mut self, ty: &Type) {
        match ty {
            Type::Array(element, rank) => {
                self.write_type(element);
                self.output
                    .token("[");
                for _ in 1..*rank {
                    self.output
                        .token(",");
                }
                self.output
                    .token("]");
            }
            Type::Parameter(name) => {
                self.output
                    .reference(name, Referent::Type(ty));
            }
            Type::Named(named) => {
                self.output
                    .reference(&named.name, Referent::Type(ty));
                if named.definition {
                    self.write_placeholders(
                        named
                            .arguments
                            .len(),
                    );
                } else if !named
                    .arguments
                    .is_empty()
                {
                    self.write_generic_arguments(&named.arguments);
                }
            }
            _ => {
                let keyword = ty
                    .keyword()
                    .unwrap_or("object");
                self.output
                    .reference(keyword, Referent::Type(ty));
            }
        }
    }

    fn write_placeholders(&mut self, arity: usize) {
        self.output
            .token("<");
        for _ in 1..arity {
            self.output
                .token(",");
        }
        self.output
            .token(">");
    }

    fn write_generic_arguments(&mut self, arguments: &[Type]) {
        self.output
            .token("<");
        for (i, argument) in arguments
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.output
                    .token(",");
                self.output
                    .space();
            }
            self.write_type(argument);
        }
        self.output
            .token(">");
    }

    fn braced(&mut self, body: impl FnOnce(&mut Self) -> Outcome) -> Outcome {
        self.output
            .token("{");
        self.output
            .newline();
        self.output
            .indent();

        body(self)?;

        self.output
            .dedent();
        self.output
            .token("}");
        Ok(())
    }

    fn checked(&mut self, body: impl FnOnce(&mut Self) -> Outcome) -> Outcome {
        self.output
            .keyword("checked");
        self.output
            .space();
        self.output
            .token("{");
        self.output
            .space();

        body(self)?;

        self.output
            .space();
        self.output
            .token("}");
        Ok(())
    }

    fn write_list<T>(
        &mut self,
        items: &[T],
        opening: &str,
        closing: &str,
        mut each: impl FnMut(&mut Self, &T) -> Outcome,
    ) -> Outcome {
        self.output
            .token(opening);
        for (i, item) in items
            .iter()
            .enumerate()
        {
            if i > 0 {
                self.output
                    .token(",");
                self.output
                    .space();
            }
            each(self, item)?;
        }
        self.output
            .token(closing);
        Ok(())
    }

    fn write_arguments(&mut self, arguments: &[Expression]) -> Outcome {
        self.write_list(arguments, "(", ")", |w, argument| w.write(argument))
    }

    fn write_block(&mut self, block: &Block) -> Outcome {
        self.braced(|w| {
            w.write_declarations(&block.variables);
            w.write_statements(&block.expressions, &block.ty)
        })
    }

    fn write_declarations(&mut self, variables: &[Parameter]) {
        for variable in variables {
            self.write_type(variable.ty());
            self.output
                .space();
            self.write_parameter(variable);
            self.output
                .token(";");
            self.output
                .newline();
        }
        if !variables.is_empty() {
            self.output
                .newline();
        }
    }

    /// Write the statements of a block whose value has type `ty`. The last
    /// expression of a non-void block is returned. A label carrying a
    /// default value is followed by that value as a statement of its own.
    fn write_statements(&mut self, expressions: &[Expression], ty: &Type) -> Outcome {
        let last = expressions
            .len()
            .saturating_sub(1);

        for (i, expression) in expressions
            .iter()
            .enumerate()
        {
            let valued = i == last && !ty.is_void();

            if let Node::Label(label) = expression.node() {
                self.write(expression)?;
                if let Some(default) = &label.default {
                    self.write_statement(default, valued)?;
                }
                continue;
            }

            self.write_statement(expression, valued)?;
        }
        Ok(())
    }

    fn write_statement(&mut self, expression: &Expression, valued: bool) -> Outcome {
        let plain = !is_statement(expression) && expression.kind() != Kind::Label;

        if plain && valued && !is_return(expression) {
            self.output
                .keyword("return");
            self.output
                .space();
        }

        self.write(expression)?;

        if plain {
            self.output
                .token(";");
            self.output
                .newline();
        } else if expression.kind() == Kind::Block {
            self.output
                .newline();
        }
        Ok(())
    }

    /// Write a node in block form, wrapping it in braces if it is not a
    /// block already.
    fn write_as_block(&mut self, expression: &Expression, ty: &Type) -> Outcome {
        match expression.node() {
            Node::Block(block) => self.write_block(block)?,
            _ => self.braced(|w| w.write_statements(slice::from_ref(expression), ty))?,
        }
        self.output
            .newline();
        Ok(())
    }

    fn write_operand(&mut self, expression: &Expression) -> Outcome {
        self.write_enclosed(expression, requires_parentheses(expression.kind()))
    }

    /// The receiver of `.member`, `(arguments)` or `[index]`.
    fn write_target(&mut self, expression: &Expression) -> Outcome {
        self.write_enclosed(
            expression,
            requires_parentheses_as_target(expression.kind()),
        )
    }

    fn write_enclosed(&mut self, expression: &Expression, parenthesize: bool) -> Outcome {
        if parenthesize {
            self.output
                .token("(");
            self.write(expression)?;
            self.output
                .token(")");
            Ok(())
        } else {
            self.write(expression)
        }
    }

    /// Write any node.
    pub fn write(&mut self, expression: &Expression) -> Outcome {
        match expression.node() {
            Node::Constant(constant) => {
                let text = literal(&constant.value);
                self.output
                    .literal(&text);
                Ok(())
            }
            Node::Parameter(parameter) => {
                self.write_parameter(parameter);
                Ok(())
            }
            Node::Default(ty) => {
                self.output
                    .keyword("default");
                self.output
                    .token("(");
                self.write_type(ty);
                self.output
                    .token(")");
                Ok(())
            }
            Node::Lambda(lambda) => self.write_nested_lambda(lambda),
            Node::Unary(unary) => self.write_unary(unary),
            Node::Binary(binary) => self.write_binary(expression, binary),
            Node::TypeBinary(binary) => self.write_type_binary(binary),
            Node::Block(block) => self.write_block(block),
            Node::Conditional(conditional) => self.write_conditional(conditional),
            Node::Loop(looping) => {
                self.output
                    .keyword("for");
                self.output
                    .space();
                self.output
                    .token("(");
                self.output
                    .token(";");
                self.output
                    .token(";");
                self.output
                    .token(")");
                self.output
                    .newline();
                self.write_as_block(&looping.body, &Type::Void)
            }
            Node::Goto(goto) => self.write_goto(goto),
            Node::Label(label) => {
                let name = self.label_name(&label.target);
                self.output
                    .dedent();
                self.output
                    .identifier(&name, Referent::Label(&label.target));
                self.output
                    .token(":");
                self.output
                    .newline();
                self.output
                    .indent();
                Ok(())
            }
            Node::Switch(switch) => self.write_switch(switch),
            Node::Try(attempt) => self.write_try(attempt),
            Node::New(new) => {
                self.output
                    .keyword("new");
                self.output
                    .space();
                self.write_type(&new.ty);
                self.write_arguments(&new.arguments)
            }
            Node::NewArray(array) => self.write_new_array(array),
            Node::ListInit(init) => {
                self.write(&init.new)?;
                self.output
                    .space();
                self.write_initializers(&init.initializers)
            }
            Node::MemberInit(init) => {
                self.write(&init.new)?;
                self.write_bindings(&init.bindings)
            }
            Node::MethodCall(call) => self.write_call(call),
            Node::Member(access) => {
                match &access.target {
                    Some(target) => self.write_target(target)?,
                    None => self.write_type(
                        &access
                            .member
                            .declaring,
                    ),
                }
                self.output
                    .token(".");
                self.output
                    .reference(
                        &access
                            .member
                            .name,
                        Referent::Member(&access.member),
                    );
                Ok(())
            }
            Node::Invocation(invocation) => {
                self.write_target(&invocation.target)?;
                self.write_arguments(&invocation.arguments)
            }
            Node::Index(index) => {
                self.write_target(&index.target)?;
                self.write_list(&index.arguments, "[", "]", |w, argument| w.write(argument))
            }
            Node::For(node) => self.write_for(node),
            Node::ForEach(node) => self.write_foreach(node),
            Node::While(node) => {
                self.output
                    .keyword("while");
                self.output
                    .space();
                self.output
                    .token("(");
                self.write(&node.test)?;
                self.output
                    .token(")");
                self.output
                    .newline();
                self.write_as_block(&node.body, &Type::Void)
            }
            Node::DoWhile(node) => {
                self.output
                    .keyword("do");
                self.output
                    .newline();
                self.write_as_block(&node.body, &Type::Void)?;
                self.output
                    .keyword("while");
                self.output
                    .space();
                self.output
                    .token("(");
                self.write(&node.test)?;
                self.output
                    .token(")");
                self.output
                    .token(";");
                self.output
                    .newline();
                Ok(())
            }
            Node::Using(node) => {
                self.output
                    .keyword("using");
                self.output
                    .space();
                self.output
                    .token("(");
                self.write(&node.resource)?;
                self.output
                    .token(")");
                self.output
                    .newline();
                self.write_as_block(&node.body, &Type::Void)
            }
        }
    }

    fn write_unary(&mut self, unary: &Unary) -> Outcome {
        let operand = &unary.operand;
        match unary.operator {
            UnaryOperator::Throw => {
                self.output
                    .keyword("throw");
                self.output
                    .space();
                self.write(operand)
            }
            UnaryOperator::IsTrue => self.write(&Expression::equal(
                operand.clone(),
                Expression::constant(true),
            )),
            UnaryOperator::IsFalse => self.write(&Expression::equal(
                operand.clone(),
                Expression::constant(false),
            )),
            UnaryOperator::Increment => self.write(&Expression::add(
                operand.clone(),
                Expression::constant(1),
            )),
            UnaryOperator::Decrement => self.write(&Expression::subtract(
                operand.clone(),
                Expression::constant(1),
            )),
            UnaryOperator::ArrayLength => {
                let length = Member::length(operand.ty());
                self.write(&Expression::member(operand.clone(), length))
            }
            UnaryOperator::TypeAs => {
                self.write(operand)?;
                self.output
                    .space();
                self.output
                    .keyword("as");
                self.output
                    .space();
                self.write_type(&unary.ty);
                Ok(())
            }
            UnaryOperator::Convert | UnaryOperator::Unbox => self.write_convert(unary),
            UnaryOperator::ConvertChecked => self.checked(|w| w.write_convert(unary)),
            UnaryOperator::Quote => self.write(operand),
            UnaryOperator::PreIncrementAssign => {
                self.output
                    .token("++");
                self.write(operand)
            }
            UnaryOperator::PostIncrementAssign => {
                self.write(operand)?;
                self.output
                    .token("++");
                Ok(())
            }
            UnaryOperator::PreDecrementAssign => {
                self.output
                    .token("--");
                self.write(operand)
            }
            UnaryOperator::PostDecrementAssign => {
                self.write(operand)?;
                self.output
                    .token("--");
                Ok(())
            }
            UnaryOperator::NegateChecked => self.checked(|w| w.write_prefix("-", operand)),
            UnaryOperator::Negate => self.write_prefix("-", operand),
            UnaryOperator::UnaryPlus => self.write_prefix("+", operand),
            UnaryOperator::Not => self.write_prefix("!", operand),
            UnaryOperator::OnesComplement => self.write_prefix("~", operand),
        }
    }

    fn write_prefix(&mut self, token: &str, operand: &Expression) -> Outcome {
        self.output
            .token(token);
        self.write_operand(operand)
    }

    fn write_convert(&mut self, unary: &Unary) -> Outcome {
        self.output
            .token("(");
        self.write_type(&unary.ty);
        self.output
            .token(")");
        self.write_operand(&unary.operand)
    }

    fn write_binary(&mut self, expression: &Expression, binary: &Binary) -> Outcome {
        if binary.assign && !binary
            .operator
            .has_compound_form()
        {
            return Err(RenderError::Unsupported {
                kind: expression.kind(),
                reason: "operator has no compound assignment form",
            });
        }

        if binary.checked {
            return self.checked(|w| w.write_simple_binary(expression, binary));
        }

        match binary.operator {
            BinaryOperator::Assign => {
                self.write(&binary.left)?;
                self.output
                    .space();
                self.output
                    .token("=");
                self.output
                    .space();
                self.write(&binary.right)
            }
            BinaryOperator::Power => {
                let pow = Expression::call_static(
                    Method::pow(),
                    vec![binary.left.clone(), binary.right.clone()],
                );
                if binary.assign {
                    let assign = Expression::binary(
                        BinaryOperator::Assign,
                        binary
                            .left
                            .clone(),
                        pow,
                        false,
                        false,
                    );
                    self.write(&assign)
                } else {
                    self.write(&pow)
                }
            }
            BinaryOperator::ArrayIndex => {
                self.write_target(&binary.left)?;
                self.output
                    .token("[");
                self.write(&binary.right)?;
                self.output
                    .token("]");
                Ok(())
            }
            _ => self.write_simple_binary(expression, binary),
        }
    }

    fn write_simple_binary(&mut self, expression: &Expression, binary: &Binary) -> Outcome {
        let token = binary
            .operator
            .token()
            .ok_or(RenderError::Unsupported {
                kind: expression.kind(),
                reason: "operator has no infix form",
            })?;

        if binary.assign {
            self.write(&binary.left)?;
        } else {
            self.write_operand(&binary.left)?;
        }
        self.output
            .space();
        if binary.assign {
            self.output
                .token(&format!("{}=", token));
        } else {
            self.output
                .token(token);
        }
        self.output
            .space();
        if binary.assign {
            self.write(&binary.right)
        } else {
            self.write_operand(&binary.right)
        }
    }

    fn write_type_binary(&mut self, binary: &TypeBinary) -> Outcome {
        match binary.operator {
            TypeOperator::TypeIs => {
                self.write(&binary.operand)?;
                self.output
                    .space();
                self.output
                    .keyword("is");
                self.output
                    .space();
                self.write_type(&binary.test);
                Ok(())
            }
            TypeOperator::TypeEqual => {
                let call = Expression::call(binary.operand.clone(), Method::get_type(), Vec::new());
                self.write(&call)?;
                self.output
                    .space();
                self.output
                    .token("==");
                self.output
                    .space();
                self.output
                    .keyword("typeof");
                self.output
                    .token("(");
                self.write_type(&binary.test);
                self.output
                    .token(")");
                Ok(())
            }
        }
    }

    fn write_conditional(&mut self, conditional: &Conditional) -> Outcome {
        if is_ternary(conditional) {
            self.write(&conditional.test)?;
            self.output
                .space();
            self.output
                .token("?");
            self.output
                .space();
            self.write(&conditional.if_true)?;
            self.output
                .space();
            self.output
                .token(":");
            self.output
                .space();
            if let Some(if_false) = &conditional.if_false {
                self.write(if_false)?;
            }
            return Ok(());
        }

        self.output
            .keyword("if");
        self.output
            .space();
        self.output
            .token("(");
        self.write(&conditional.test)?;
        self.output
            .token(")");
        self.output
            .newline();

        self.write_as_block(&conditional.if_true, &conditional.ty)?;

        if let Some(if_false) = &conditional.if_false {
            self.output
                .keyword("else");
            self.output
                .newline();
            self.write_as_block(if_false, &conditional.ty)?;
        }
        Ok(())
    }

    fn write_goto(&mut self, goto: &Goto) -> Outcome {
        match goto.kind {
            GotoKind::Return => {
                self.output
                    .keyword("return");
                if let Some(value) = &goto.value {
                    self.output
                        .space();
                    self.write(value)?;
                }
            }
            GotoKind::Break => self
                .output
                .keyword("break"),
            GotoKind::Continue => self
                .output
                .keyword("continue"),
            GotoKind::Goto => {
                let name = self.label_name(&goto.target);
                self.output
                    .keyword("goto");
                self.output
                    .space();
                self.output
                    .identifier(&name, Referent::Label(&goto.target));
            }
        }
        Ok(())
    }

    fn write_switch(&mut self, switch: &Switch) -> Outcome {
        self.output
            .keyword("switch");
        self.output
            .space();
        self.output
            .token("(");
        self.write(&switch.value)?;
        self.output
            .token(")");
        self.output
            .newline();

        self.braced(|w| {
            for case in &switch.cases {
                for test in &case.tests {
                    w.output
                        .keyword("case");
                    w.output
                        .space();
                    w.write(test)?;
                    w.output
                        .token(":");
                    w.output
                        .newline();
                }
                w.write_as_block(&case.body, &switch.ty)?;
            }

            if let Some(default) = &switch.default {
                w.output
                    .keyword("default");
                w.output
                    .token(":");
                w.output
                    .newline();
                w.write_as_block(default, &switch.ty)?;
            }
            Ok(())
        })?;

        self.output
            .newline();
        Ok(())
    }

    fn write_try(&mut self, attempt: &Try) -> Outcome {
        let ty = attempt
            .body
            .ty();

        self.output
            .keyword("try");
        self.output
            .newline();
        self.write_as_block(&attempt.body, &ty)?;

        for handler in &attempt.handlers {
            self.output
                .keyword("catch");
            self.output
                .space();
            self.output
                .token("(");
            self.write_type(&handler.test);
            if let Some(variable) = &handler.variable {
                self.output
                    .space();
                self.write_parameter(variable);
            }
            self.output
                .token(")");

            if let Some(filter) = &handler.filter {
                self.output
                    .space();
                self.output
                    .keyword("if");
                self.output
                    .space();
                self.output
                    .token("(");
                self.write(filter)?;
                self.output
                    .token(")");
            }
            self.output
                .newline();

            self.write_as_block(&handler.body, &ty)?;
        }

        if let Some(fault) = &attempt.fault {
            self.output
                .keyword("fault");
            self.output
                .newline();
            self.write_as_block(fault, &Type::Void)?;
        }

        if let Some(finally) = &attempt.finally {
            self.output
                .keyword("finally");
            self.output
                .newline();
            self.write_as_block(finally, &Type::Void)?;
        }
        Ok(())
    }

    fn write_new_array(&mut self, array: &NewArray) -> Outcome {
        self.output
            .keyword("new");
        self.output
            .space();
        match array.form {
            ArrayForm::Init => {
                self.write_type(&array.ty);
                self.output
                    .space();
                self.write_list(&array.expressions, "{", "}", |w, element| w.write(element))
            }
            ArrayForm::Bounds => {
                let element = array
                    .ty
                    .element()
                    .cloned()
                    .unwrap_or(Type::Object);
                self.write_type(&element);
                self.write_list(&array.expressions, "[", "]", |w, bound| w.write(bound))
            }
        }
    }

    fn write_initializers(&mut self, initializers: &[ElementInit]) -> Outcome {
        self.write_list(initializers, "{", "}", |w, initializer| {
            match initializer
                .arguments
                .as_slice()
            {
                [single] => w.write(single),
                arguments => w.write_list(arguments, "{", "}", |w, argument| w.write(argument)),
            }
        })
    }

    fn write_bindings(&mut self, bindings: &[MemberBinding]) -> Outcome {
        self.output
            .newline();
        self.output
            .token("{");
        self.output
            .newline();
        self.output
            .indent();

        let last = bindings
            .len()
            .saturating_sub(1);
        for (i, binding) in bindings
            .iter()
            .enumerate()
        {
            let member = binding.member();
            self.output
                .reference(&member.name, Referent::Member(member));
            self.output
                .space();
            self.output
                .token("=");

            match binding {
                MemberBinding::Assignment(_, value) => {
                    self.output
                        .space();
                    self.write(value)?;
                }
                MemberBinding::List(_, initializers) => {
                    self.output
                        .space();
                    self.write_initializers(initializers)?;
                }
                MemberBinding::Member(_, nested) => {
                    self.write_bindings(nested)?;
                }
            }

            if i < last {
                self.output
                    .token(",");
            }
            self.output
                .newline();
        }

        self.output
            .dedent();
        self.output
            .token("}");
        Ok(())
    }

    fn write_call(&mut self, call: &MethodCall) -> Outcome {
        let method = &call.method;
        match &call.target {
            Some(target) => self.write_target(target)?,
            None => self.write_type(&method.declaring),
        }
        self.output
            .token(".");
        self.output
            .reference(&method.name, Referent::Method(method));

        if method.definition {
            self.write_placeholders(
                method
                    .generic_arguments
                    .len(),
            );
        } else if !method
            .generic_arguments
            .is_empty()
        {
            self.write_generic_arguments(&method.generic_arguments);
        }

        self.write_arguments(&call.arguments)
    }

    fn write_for(&mut self, node: &For) -> Outcome {
        self.output
            .keyword("for");
        self.output
            .space();
        self.output
            .token("(");
        self.write_type(node.variable.ty());
        self.output
            .space();
        self.write_parameter(&node.variable);
        self.output
            .space();
        self.output
            .token("=");
        self.output
            .space();
        self.write(&node.initializer)?;
        self.output
            .token(";");
        self.output
            .space();
        self.write(&node.test)?;
        self.output
            .token(";");
        self.output
            .space();
        self.write(&node.step)?;
        self.output
            .token(")");
        self.output
            .newline();

        self.write_as_block(&node.body, &Type::Void)
    }

    fn write_foreach(&mut self, node: &ForEach) -> Outcome {
        self.output
            .keyword("foreach");
        self.output
            .space();
        self.output
            .token("(");
        self.write_type(node.variable.ty());
        self.output
            .space();
        self.write_parameter(&node.variable);
        self.output
            .space();
        self.output
            .keyword("in");
        self.output
            .space();
        self.write(&node.enumerable)?;
        self.output
            .token(")");
        self.output
            .newline();

        self.write_as_block(&node.body, &Type::Void)
    }
}

/// The source text of a constant.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Void => String::new(),
        Value::Null => "null".to_string(),
        Value::Boolean(true) => "true".to_string(),
        Value::Boolean(false) => "false".to_string(),
        Value::Char(c) => {
            let mut buffer = [0u8; 4];
            format!("'{}'", escape(c.encode_utf8(&mut buffer), '\''))
        }
        Value::String(s) => format!("\"{}\"", escape(s, '"')),
        Value::SByte(i) => i.to_string(),
        Value::Byte(i) => i.to_string(),
        Value::Int16(i) => i.to_string(),
        Value::UInt16(i) => i.to_string(),
        Value::Int32(i) => i.to_string(),
        Value::UInt32(i) => i.to_string(),
        Value::Int64(i) => i.to_string(),
        Value::UInt64(i) => i.to_string(),
        Value::Single(x) => x.to_string(),
        Value::Double(x) => x.to_string(),
        Value::Array(..) | Value::Object(_) => value
            .type_of()
            .to_string(),
        Value::Type(ty) => format!("typeof({})", ty),
    }
}

/// Escape backslashes, the surrounding quote character and control
/// characters.
fn escape(text: &str, quote: char) -> Cow<'_, str> {
    if !text
        .chars()
        .any(|c| c == '\\' || c == quote || c.is_control())
    {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\0' => result.push_str("\\0"),
            c if c == quote => {
                result.push('\\');
                result.push(c);
            }
            c if c.is_control() => {
                let _ = write!(result, "\\u{:04x}", c as u32);
            }
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}
