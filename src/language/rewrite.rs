//! Tree rewriting with structural sharing

use crate::language::*;

/// A rewriting pass over a tree. The default methods rebuild nothing: a
/// node is only reconstructed when one of its children comes back as a
/// different node, so unchanged subtrees stay shared with the input.
pub trait Rewrite {
    fn rewrite(&mut self, expression: &Expression) -> Result<Expression, ConstructionError> {
        walk(self, expression)
    }

    fn rewrite_parameter(&mut self, parameter: &Parameter) -> Parameter {
        parameter.clone()
    }
}

/// Rewrite the children of a node and rebuild it if any of them changed.
/// Derived loop variants are rebuilt through their validating constructors.
pub fn walk<R>(rewriter: &mut R, expression: &Expression) -> Result<Expression, ConstructionError>
where
    R: Rewrite + ?Sized,
{
    let mut changed = false;

    macro_rules! visit {
        ($child:expr) => {{
            let child: &Expression = $child;
            let result = rewriter.rewrite(child)?;
            if !Expression::ptr_eq(&result, child) {
                changed = true;
            }
            result
        }};
    }

    macro_rules! visit_option {
        ($child:expr) => {
            match $child {
                Some(child) => Some(visit!(child)),
                None => None,
            }
        };
    }

    macro_rules! visit_all {
        ($children:expr) => {{
            let mut results = Vec::new();
            for child in $children {
                results.push(visit!(child));
            }
            results
        }};
    }

    macro_rules! visit_parameter {
        ($parameter:expr) => {{
            let parameter: &Parameter = $parameter;
            let result = rewriter.rewrite_parameter(parameter);
            if result != *parameter {
                changed = true;
            }
            result
        }};
    }

    macro_rules! visit_initializers {
        ($initializers:expr) => {{
            let mut results = Vec::new();
            for initializer in $initializers {
                let initializer: &ElementInit = initializer;
                results.push(ElementInit {
                    method: initializer
                        .method
                        .clone(),
                    arguments: visit_all!(&initializer.arguments),
                });
            }
            results
        }};
    }

    let node = match expression.node() {
        Node::Constant(_) | Node::Default(_) => return Ok(expression.clone()),
        Node::Parameter(parameter) => {
            let result = visit_parameter!(parameter);
            if !changed {
                return Ok(expression.clone());
            }
            return Ok(result.expression());
        }
        Node::Lambda(lambda) => {
            let parameters: Vec<Parameter> = lambda
                .parameters
                .iter()
                .map(|parameter| visit_parameter!(parameter))
                .collect();
            let body = visit!(&lambda.body);
            Node::Lambda(Lambda {
                name: lambda
                    .name
                    .clone(),
                parameters,
                body,
                returns: lambda
                    .returns
                    .clone(),
            })
        }
        Node::Unary(unary) => Node::Unary(Unary {
            operator: unary.operator,
            operand: visit!(&unary.operand),
            ty: unary
                .ty
                .clone(),
        }),
        Node::Binary(binary) => Node::Binary(Binary {
            operator: binary.operator,
            left: visit!(&binary.left),
            right: visit!(&binary.right),
            assign: binary.assign,
            checked: binary.checked,
            ty: binary
                .ty
                .clone(),
        }),
        Node::TypeBinary(binary) => Node::TypeBinary(TypeBinary {
            operator: binary.operator,
            operand: visit!(&binary.operand),
            test: binary
                .test
                .clone(),
        }),
        Node::Block(block) => {
            let variables: Vec<Parameter> = block
                .variables
                .iter()
                .map(|variable| visit_parameter!(variable))
                .collect();
            Node::Block(Block {
                variables,
                expressions: visit_all!(&block.expressions),
                ty: block
                    .ty
                    .clone(),
            })
        }
        Node::Conditional(conditional) => Node::Conditional(Conditional {
            test: visit!(&conditional.test),
            if_true: visit!(&conditional.if_true),
            if_false: visit_option!(&conditional.if_false),
            ty: conditional
                .ty
                .clone(),
        }),
        Node::Loop(looping) => Node::Loop(Loop {
            body: visit!(&looping.body),
            break_target: looping
                .break_target
                .clone(),
            continue_target: looping
                .continue_target
                .clone(),
        }),
        Node::Goto(goto) => Node::Goto(Goto {
            kind: goto.kind,
            target: goto
                .target
                .clone(),
            value: visit_option!(&goto.value),
        }),
        Node::Label(label) => Node::Label(Label {
            target: label
                .target
                .clone(),
            default: visit_option!(&label.default),
        }),
        Node::Switch(switch) => {
            let value = visit!(&switch.value);
            let mut cases = Vec::new();
            for case in &switch.cases {
                cases.push(SwitchCase {
                    tests: visit_all!(&case.tests),
                    body: visit!(&case.body),
                });
            }
            Node::Switch(Switch {
                value,
                cases,
                default: visit_option!(&switch.default),
                ty: switch
                    .ty
                    .clone(),
            })
        }
        Node::Try(attempt) => {
            let body = visit!(&attempt.body);
            let mut handlers = Vec::new();
            for handler in &attempt.handlers {
                handlers.push(CatchBlock {
                    test: handler
                        .test
                        .clone(),
                    variable: handler
                        .variable
                        .as_ref()
                        .map(|variable| visit_parameter!(variable)),
                    filter: visit_option!(&handler.filter),
                    body: visit!(&handler.body),
                });
            }
            Node::Try(Try {
                body,
                handlers,
                fault: visit_option!(&attempt.fault),
                finally: visit_option!(&attempt.finally),
            })
        }
        Node::New(new) => Node::New(New {
            ty: new
                .ty
                .clone(),
            arguments: visit_all!(&new.arguments),
        }),
        Node::NewArray(array) => Node::NewArray(NewArray {
            form: array.form,
            ty: array
                .ty
                .clone(),
            expressions: visit_all!(&array.expressions),
        }),
        Node::ListInit(init) => Node::ListInit(ListInit {
            new: visit!(&init.new),
            initializers: visit_initializers!(&init.initializers),
        }),
        Node::MemberInit(init) => {
            let new = visit!(&init.new);
            let bindings = rewrite_bindings(rewriter, &init.bindings, &mut changed)?;
            Node::MemberInit(MemberInit { new, bindings })
        }
        Node::MethodCall(call) => Node::MethodCall(MethodCall {
            target: visit_option!(&call.target),
            method: call
                .method
                .clone(),
            arguments: visit_all!(&call.arguments),
        }),
        Node::Member(access) => Node::Member(MemberAccess {
            target: visit_option!(&access.target),
            member: access
                .member
                .clone(),
        }),
        Node::Invocation(invocation) => Node::Invocation(Invocation {
            target: visit!(&invocation.target),
            arguments: visit_all!(&invocation.arguments),
            ty: invocation
                .ty
                .clone(),
        }),
        Node::Index(index) => Node::Index(Index {
            target: visit!(&index.target),
            arguments: visit_all!(&index.arguments),
            ty: index
                .ty
                .clone(),
        }),
        Node::For(node) => {
            let variable = visit_parameter!(&node.variable);
            let initializer = visit!(&node.initializer);
            let test = visit!(&node.test);
            let step = visit!(&node.step);
            let body = visit!(&node.body);
            if !changed {
                return Ok(expression.clone());
            }
            Node::For(For::create(
                variable,
                initializer,
                test,
                step,
                body,
                node.break_target
                    .clone(),
                node.continue_target
                    .clone(),
            )?)
        }
        Node::ForEach(node) => {
            let variable = visit_parameter!(&node.variable);
            let enumerable = visit!(&node.enumerable);
            let body = visit!(&node.body);
            if !changed {
                return Ok(expression.clone());
            }
            Node::ForEach(ForEach::create(
                variable,
                enumerable,
                body,
                node.break_target
                    .clone(),
                node.continue_target
                    .clone(),
            )?)
        }
        Node::While(node) => {
            let test = visit!(&node.test);
            let body = visit!(&node.body);
            if !changed {
                return Ok(expression.clone());
            }
            Node::While(While::create(
                test,
                body,
                node.break_target
                    .clone(),
                node.continue_target
                    .clone(),
            )?)
        }
        Node::DoWhile(node) => {
            let body = visit!(&node.body);
            let test = visit!(&node.test);
            if !changed {
                return Ok(expression.clone());
            }
            Node::DoWhile(DoWhile::create(
                body,
                test,
                node.break_target
                    .clone(),
                node.continue_target
                    .clone(),
            )?)
        }
        Node::Using(node) => {
            let resource = visit!(&node.resource);
            let body = visit!(&node.body);
            if !changed {
                return Ok(expression.clone());
            }
            Node::Using(Using::create(resource, body)?)
        }
    };

    if changed {
        Ok(Expression::new(node))
    } else {
        Ok(expression.clone())
    }
}

fn rewrite_bindings<R>(
    rewriter: &mut R,
    bindings: &[MemberBinding],
    changed: &mut bool,
) -> Result<Vec<MemberBinding>, ConstructionError>
where
    R: Rewrite + ?Sized,
{
    let mut results = Vec::new();
    for binding in bindings {
        let result = match binding {
            MemberBinding::Assignment(member, value) => {
                let rewritten = rewriter.rewrite(value)?;
                if !Expression::ptr_eq(&rewritten, value) {
                    *changed = true;
                }
                MemberBinding::Assignment(member.clone(), rewritten)
            }
            MemberBinding::List(member, initializers) => {
                let mut rewritten = Vec::new();
                for initializer in initializers {
                    let mut arguments = Vec::new();
                    for argument in &initializer.arguments {
                        let result = rewriter.rewrite(argument)?;
                        if !Expression::ptr_eq(&result, argument) {
                            *changed = true;
                        }
                        arguments.push(result);
                    }
                    rewritten.push(ElementInit {
                        method: initializer
                            .method
                            .clone(),
                        arguments,
                    });
                }
                MemberBinding::List(member.clone(), rewritten)
            }
            MemberBinding::Member(member, nested) => MemberBinding::Member(
                member.clone(),
                rewrite_bindings(rewriter, nested, changed)?,
            ),
        };
        results.push(result);
    }
    Ok(results)
}
