//! Expression evaluation.
//! 表达式求值。

use crate::context::Context;
use crate::env::{Binder, Bindings, Environment, Key};
use crate::error::{EvalError, Result};
use crate::methods;
use crate::pattern::match_pattern;
use crate::stream::{Container, iterate, materialize};
use crate::value::{Dict, Function, RangeValue, Tuple, TypeRef, TypeTag, Value};
use async_recursion::async_recursion;
use futures::future::try_join_all;
use futures::try_join;
use rill_syntax::{BinaryOp, Expr, ExprKind, Member, Program, Stmt, UnaryOp};
use std::rc::Rc;

/// Run a program's statements in order. Each statement sees the bindings of
/// the statements before it. `None` for a program without statements.
///
/// A top-level statement binds into a scope of its own, which is committed
/// to the global scope only if the statement succeeds.
pub async fn run_program(program: &Program, ctx: &Context) -> Result<Option<Value>> {
    let mut last = None;
    for statement in &program.statements {
        let value = match &ctx.binder {
            Binder::Global(global) => {
                let scope = Binder::block(Environment::global(global.clone()));
                let value = execute(statement, &ctx.scoped(scope.clone())).await?;
                global.commit(&scope.environment());
                value
            }
            binder => execute(statement, &ctx.scoped(binder.clone())).await?,
        };
        last = Some(value);
    }
    Ok(last)
}

/// Execute one statement. Assignments bind through the context's binder and
/// yield `()`.
pub async fn execute(statement: &Stmt, ctx: &Context) -> Result<Value> {
    match statement {
        Stmt::Expr(expr) => evaluate(expr, ctx).await,
        Stmt::Assign { pattern, value, .. } => {
            let value = evaluate(value, ctx).await?;
            let bindings = match_pattern(pattern, value, ctx).await?;
            name_struct_types(&bindings);
            ctx.binder.bind(bindings);
            Ok(Value::empty())
        }
    }
}

/// `Point = struct (...)` names the struct type `Point`.
fn name_struct_types(bindings: &Bindings) {
    for (key, value) in bindings {
        if let (Key::Name(name), Value::Type(TypeRef::Struct(st))) = (key, value) {
            st.name_once(name);
        }
    }
}

/// Evaluate an expression.
/// 对表达式求值。
#[async_recursion(?Send)]
pub async fn evaluate(expr: &Expr, ctx: &Context) -> Result<Value> {
    ctx.cancel_token().check()?;

    match &expr.kind {
        ExprKind::Number(n) => Ok(Value::Number(*n)),
        ExprKind::String(s) => Ok(Value::string(s.as_str())),
        ExprKind::Bool(b) => Ok(Value::boolean(*b)),

        ExprKind::Ident(ident) => ctx.env.get(&ident.name).ok_or_else(|| EvalError::UnboundIdentifier {
            name: ident.name.clone(),
        }),

        ExprKind::Block(statements) => {
            let scope = Binder::block(ctx.env.clone());
            let mut last = Value::empty();
            for statement in statements {
                last = execute(statement, &ctx.scoped(scope.clone())).await?;
            }
            Ok(last)
        }

        ExprKind::Pipe { receiver, method, arg } => {
            let (receiver, arg) = match arg {
                Some(arg) => try_join!(evaluate(receiver, ctx), evaluate(arg, ctx))?,
                None => (evaluate(receiver, ctx).await?, Value::empty()),
            };
            invoke(&receiver, &method.name, arg, ctx).await
        }

        ExprKind::Operator { op, left, right } => {
            let (left, right) = try_join!(evaluate(left, ctx), evaluate(right, ctx))?;
            if let (Value::Number(a), Value::Number(b)) = (&left, &right) {
                if let Some(result) = numeric(*op, *a, *b) {
                    return Ok(result);
                }
            }
            invoke(&left, op.symbol(), right, ctx).await
        }

        ExprKind::Conditional {
            condition,
            consequent,
            alternate,
        } => {
            if condition_holds(evaluate(condition, ctx).await?)? {
                evaluate(consequent, ctx).await
            } else {
                match alternate {
                    Some(alternate) => evaluate(alternate, ctx).await,
                    None => Ok(Value::empty()),
                }
            }
        }

        ExprKind::LogicalOr(left, right) => {
            if condition_holds(evaluate(left, ctx).await?)? {
                Ok(Value::TRUE)
            } else {
                evaluate(right, ctx).await
            }
        }

        ExprKind::LogicalAnd(left, right) => {
            if condition_holds(evaluate(left, ctx).await?)? {
                evaluate(right, ctx).await
            } else {
                Ok(Value::FALSE)
            }
        }

        ExprKind::Apply { callee, arg } => {
            let (callee, arg) = try_join!(evaluate(callee, ctx), evaluate(arg, ctx))?;
            apply(&callee, arg, ctx).await
        }

        ExprKind::Range { from, to } => {
            let (from, to) = try_join!(evaluate(from, ctx), evaluate(to, ctx))?;
            Ok(Value::Range(Rc::new(RangeValue::new(from, to))))
        }

        ExprKind::Member { object, member } => {
            let object = evaluate(object, ctx).await?;
            get_member(&object, member)
        }

        ExprKind::Unary { op, operand } => {
            let operand = evaluate(operand, ctx).await?;
            match (op, &operand) {
                (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                (UnaryOp::Not, Value::Boolean(b)) => Ok(Value::boolean(!b)),
                _ => invoke(&operand, op.method(), Value::empty(), ctx).await,
            }
        }

        ExprKind::Function(function) => Ok(Value::Function(Rc::new(Function {
            expr: function.clone(),
            env: ctx.env.clone(),
        }))),

        ExprKind::Tuple(fields) => {
            let values = try_join_all(fields.iter().map(|field| evaluate(&field.value, ctx))).await?;
            let named = fields
                .iter()
                .zip(values)
                .map(|(field, value)| (field.name.as_ref().map(|name| name.name.clone()), value))
                .collect();
            Ok(Value::Tuple(Tuple::named(named)))
        }

        ExprKind::Array(elements) => {
            let values = try_join_all(elements.iter().map(|element| evaluate(element, ctx))).await?;
            Ok(Value::array(values))
        }

        ExprKind::Dict(entries) => {
            let pairs = try_join_all(
                entries
                    .iter()
                    .map(|(key, value)| async move { try_join!(evaluate(key, ctx), evaluate(value, ctx)) }),
            )
            .await?;
            Ok(Value::Dict(Rc::new(pairs.into_iter().collect::<Dict>())))
        }
    }
}

/// The numeric fast path for operators. `None` defers to method dispatch.
fn numeric(op: BinaryOp, a: f64, b: f64) -> Option<Value> {
    Some(match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Sub => Value::Number(a - b),
        BinaryOp::Mul => Value::Number(a * b),
        BinaryOp::Div => Value::Number(a / b),
        BinaryOp::Mod => Value::Number(a % b),
        BinaryOp::Pow => Value::Number(a.powf(b)),
        BinaryOp::Eq => Value::boolean(a == b),
        BinaryOp::Ne => Value::boolean(a != b),
        BinaryOp::Lt => Value::boolean(a < b),
        BinaryOp::Le => Value::boolean(a <= b),
        BinaryOp::Gt => Value::boolean(a > b),
        BinaryOp::Ge => Value::boolean(a >= b),
        BinaryOp::Merge => return None,
    })
}

fn condition_holds(value: Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(b),
        other => Err(EvalError::NonBooleanCondition {
            type_name: other.type_name(),
            value: other.inspect(),
        }),
    }
}

/// Own-property access: tuple fields, dictionary keys, range bounds.
fn get_member(object: &Value, member: &Member) -> Result<Value> {
    let found = match (object, member) {
        (Value::Tuple(t), Member::Index(index)) => t.get(*index).cloned(),
        (Value::Tuple(t), Member::Name(name)) => t.field(name).cloned(),
        (Value::Array(items), Member::Index(index)) => items.get(*index).cloned(),
        (Value::Dict(d), Member::Name(name)) => d.get_str(name).cloned(),
        (Value::Dict(d), Member::Index(index)) => d.get(&Value::Number(*index as f64)).cloned(),
        (Value::Range(r), Member::Name(name)) => match name.as_str() {
            "from" => Some(r.from.clone()),
            "to" => Some(r.to.clone()),
            "stride" => Some(Value::Number(r.stride)),
            _ => None,
        },
        (Value::Type(t), Member::Name(name)) if name == "name" => Some(Value::string(t.name())),
        _ => None,
    };
    found.ok_or_else(|| EvalError::NoSuchMember {
        receiver: object.inspect(),
        type_name: object.type_name(),
        member: member.to_string(),
    })
}

/// Apply a callee to one argument.
/// 将函数应用于参数。
#[async_recursion(?Send)]
pub async fn apply(callee: &Value, arg: Value, ctx: &Context) -> Result<Value> {
    match callee {
        Value::Function(function) => call_function(function, arg, None, ctx).await,
        Value::Builtin(builtin) => builtin.call(arg, ctx.clone()).await,
        Value::Type(ty) => construct(ty, arg, ctx).await,
        other => Err(EvalError::NotApplicable {
            value: other.inspect(),
            type_name: other.type_name(),
        }),
    }
}

/// Call a closure directly. A failing guard is a pattern mismatch.
async fn call_function(function: &Rc<Function>, arg: Value, this: Option<Value>, ctx: &Context) -> Result<Value> {
    let closure = ctx.with_env(function.env.clone());
    let found = function.expr.guard.as_ref().map(|_| arg.inspect());
    let bindings = match_pattern(&function.expr.param, arg, &closure).await?;
    if !guard_allows(function, &bindings, ctx).await? {
        return Err(EvalError::PatternMismatch {
            expected: format!("{} if <guard>", function.expr.param.describe()),
            found: found.unwrap_or_default(),
        });
    }
    enter_function(function, bindings, this, ctx).await
}

/// Evaluate a function's guard (if any) with the parameter bindings.
pub(crate) async fn guard_allows(function: &Function, bindings: &Bindings, ctx: &Context) -> Result<bool> {
    match &function.expr.guard {
        Some(guard) => {
            let env = function.env.extend(bindings.clone());
            condition_holds(evaluate(guard, &ctx.with_env(env)).await?)
        }
        None => Ok(true),
    }
}

/// Evaluate a function body with its parameter bindings, its self name and
/// an optional `this`. The body binds through the caller's binder.
pub(crate) async fn enter_function(
    function: &Rc<Function>,
    bindings: Bindings,
    this: Option<Value>,
    ctx: &Context,
) -> Result<Value> {
    let mut scope = Vec::with_capacity(bindings.len() + 2);
    if let Some(name) = function.name() {
        scope.push((Key::name(name), Value::Function(function.clone())));
    }
    if let Some(this) = this {
        scope.push((Key::name("this"), this));
    }
    scope.extend(bindings);
    evaluate(&function.expr.body, &ctx.with_env(function.env.extend(scope))).await
}

/// Invoke `method` on `receiver`: extensions first, then the receiver's
/// built-in methods, the sequence operations and the common methods.
#[async_recursion(?Send)]
pub async fn invoke(receiver: &Value, method: &str, arg: Value, ctx: &Context) -> Result<Value> {
    if let Some(extension) = find_extension(receiver, method, ctx) {
        tracing::trace!(method, type_name = %receiver.type_name(), "extension dispatch");
        return match &extension {
            Value::Function(function) => call_function(function, arg, Some(receiver.clone()), ctx).await,
            other => apply(other, Value::tuple(vec![receiver.clone(), arg]), ctx).await,
        };
    }
    tracing::trace!(method, type_name = %receiver.type_name(), "builtin dispatch");
    methods::call(receiver, method, arg, ctx).await
}

fn find_extension(receiver: &Value, method: &str, ctx: &Context) -> Option<Value> {
    let extensions = ctx.env.extensions();
    let tag = receiver.type_tag();
    extensions.lookup(tag, method).or_else(|| match tag {
        TypeTag::Struct(_) => extensions.lookup(TypeTag::Tuple, method),
        _ => None,
    })
}

/// Apply a type value: conversion for builtin types, construction for
/// struct types.
async fn construct(ty: &TypeRef, arg: Value, ctx: &Context) -> Result<Value> {
    let tag = match ty {
        TypeRef::Struct(st) => return methods::construct_struct(st, arg),
        TypeRef::Builtin(tag) => *tag,
    };

    let cannot = |arg: &Value| {
        EvalError::Type(format!("cannot convert {} ({}) to {}", arg.inspect(), arg.type_name(), tag.name()))
    };

    match (tag, &arg) {
        (TypeTag::Number, Value::Number(_)) => Ok(arg.clone()),
        (TypeTag::Number, Value::String(s)) => {
            s.as_str().trim().parse::<f64>().map(Value::Number).map_err(|_| cannot(&arg))
        }
        (TypeTag::Number, Value::Boolean(b)) => Ok(Value::Number(if *b { 1.0 } else { 0.0 })),
        (TypeTag::String, _) => Ok(Value::string(arg.to_text())),
        (TypeTag::Boolean, Value::Boolean(_)) => Ok(arg.clone()),
        (TypeTag::Range, Value::Tuple(t)) if t.len() == 2 => Ok(Value::Range(Rc::new(RangeValue::new(
            t.fields()[0].clone(),
            t.fields()[1].clone(),
        )))),
        (TypeTag::Function, Value::Function(_) | Value::Builtin(_)) => Ok(arg.clone()),
        (TypeTag::Array | TypeTag::Tuple | TypeTag::Dict | TypeTag::Stream, _) => {
            let Some(stream) = iterate(&arg, ctx) else {
                return match tag {
                    TypeTag::Array => Ok(Value::array(vec![arg.clone()])),
                    _ => Err(cannot(&arg)),
                };
            };
            let container = match tag {
                TypeTag::Array => Container::Array,
                TypeTag::Tuple => Container::Tuple,
                TypeTag::Dict => Container::Dict,
                _ => return Ok(Value::Stream(stream)),
            };
            materialize(stream.values().await?, container)
        }
        _ => Err(cannot(&arg)),
    }
}
