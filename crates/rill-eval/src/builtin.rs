//! The prelude: control primitives and type values.
//! 预置环境：控制原语与类型值。

use crate::context::Context;
use crate::coroutine::Coroutine;
use crate::env::Key;
use crate::error::{EvalError, Result};
use crate::eval::{apply, enter_function, guard_allows};
use crate::pattern::{match_pattern, test_pattern};
use crate::value::{ContextCell, StructType, TypeRef, TypeTag, Value};
use std::rc::Rc;

/// Every prelude binding.
pub fn builtins() -> Vec<(&'static str, Value)> {
    let mut prelude = vec![
        ("let", Value::host("let", trampoline)),
        ("loop", Value::host("loop", |next, _| async move { Ok(Value::Loop(Rc::new(next))) })),
        ("match", Value::host("match", |subject, _| async move { Ok(matcher(subject)) })),
        ("spawn", Value::host("spawn", spawn)),
        ("context", Value::host("context", |initial, _| async move {
            Ok(Value::Cell(Rc::new(ContextCell {
                key: Key::symbol(),
                initial,
            })))
        })),
        ("struct", Value::host("struct", |descriptor, _| async move {
            let st = StructType::from_descriptor(&descriptor)?;
            Ok(Value::Type(TypeRef::Struct(Rc::new(st))))
        })),
        ("extend", Value::host("extend", |target, _| async move { extender(target) })),
        ("PI", Value::Number(std::f64::consts::PI)),
        ("E", Value::Number(std::f64::consts::E)),
    ];

    let types = [
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::Tuple,
        TypeTag::Array,
        TypeTag::Dict,
        TypeTag::Range,
        TypeTag::Function,
        TypeTag::Stream,
    ];
    prelude.extend(types.into_iter().map(|tag| (tag.name(), Value::Type(TypeRef::Builtin(tag)))));
    prelude
}

/// Iterations of `let` between yields to the scheduler.
const YIELD_EVERY: usize = 4096;

/// `let f`: apply `f` to `()`, then keep applying it to whatever it wraps
/// in `loop` until it returns anything else.
///
/// A long loop that never awaits would starve other tasks, including the
/// one that cancels the session, so it yields now and then.
async fn trampoline(body: Value, ctx: Context) -> Result<Value> {
    let mut state = Value::empty();
    let mut iterations = 0usize;
    loop {
        match apply(&body, state, &ctx).await? {
            Value::Loop(next) => state = (*next).clone(),
            done => return Ok(done),
        }
        iterations += 1;
        if iterations % YIELD_EVERY == 0 {
            tokio::task::yield_now().await;
        }
    }
}

/// `match subject` returns a function taking the clauses.
fn matcher(subject: Value) -> Value {
    Value::host("match", move |clauses, ctx| {
        let subject = subject.clone();
        async move { select_clause(subject, clauses, ctx).await }
    })
}

/// Run the first clause whose pattern and guard accept `subject`.
async fn select_clause(subject: Value, clauses: Value, ctx: Context) -> Result<Value> {
    let clauses = match &clauses {
        Value::Tuple(t) if t.tag().is_none() => t.fields().to_vec(),
        Value::Array(items) => items.as_ref().clone(),
        single => vec![single.clone()],
    };

    for clause in &clauses {
        let Value::Function(function) = clause else {
            return Err(EvalError::TypeMismatch {
                expected: "a function clause".to_string(),
                found: clause.inspect(),
                type_name: clause.type_name(),
            });
        };
        let closure = ctx.with_env(function.env.clone());
        if !test_pattern(&function.expr.param, &subject, &closure).await {
            continue;
        }
        let bindings = match_pattern(&function.expr.param, subject.clone(), &closure).await?;
        if !guard_allows(function, &bindings, &ctx).await? {
            continue;
        }
        return enter_function(function, bindings, None, &ctx).await;
    }

    Err(EvalError::MatchExhausted {
        value: subject.inspect(),
        type_name: subject.type_name(),
    })
}

/// `spawn f`: run `f` with a fresh coroutine on the local task set and
/// return the coroutine at once. If `f` raises, sends to the coroutine
/// raise the same error.
async fn spawn(body: Value, ctx: Context) -> Result<Value> {
    let coroutine = Coroutine::new();
    let handle = Value::Coroutine(coroutine.clone());
    tracing::debug!(body = %body.inspect(), "spawning coroutine");

    tokio::task::spawn_local(async move {
        let outcome = apply(&body, Value::Coroutine(coroutine.clone()), &ctx).await;
        if let Err(error) = &outcome {
            tracing::debug!(%error, "coroutine failed");
        }
        coroutine.finish(outcome);
    });
    Ok(handle)
}

/// `extend Type` returns a function taking the method table.
fn extender(target: Value) -> Result<Value> {
    let Value::Type(ty) = target else {
        return Err(EvalError::TypeMismatch {
            expected: "a type".to_string(),
            found: target.inspect(),
            type_name: target.type_name(),
        });
    };

    Ok(Value::host("extend", move |methods, ctx| {
        let ty = ty.clone();
        async move {
            let Value::Tuple(table) = &methods else {
                return Err(EvalError::TypeMismatch {
                    expected: "a tuple of named methods".to_string(),
                    found: methods.inspect(),
                    type_name: methods.type_name(),
                });
            };
            let mut entries = Vec::with_capacity(table.len());
            for (index, method) in table.fields().iter().enumerate() {
                let Some(name) = table.name_at(index) else {
                    return Err(EvalError::Type(format!(
                        "extension method {index} of {} has no name",
                        ty.name()
                    )));
                };
                entries.push((name.to_string(), method.clone()));
            }

            tracing::debug!(
                type_name = %ty.name(),
                methods = ?entries.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
                "extending type"
            );
            let merged = ctx.env.extensions().merged(ty.tag(), entries);
            ctx.binder.bind_extensions(merged);
            Ok(Value::empty())
        }
    }))
}
