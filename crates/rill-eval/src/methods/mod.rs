//! Built-in method tables.
//!
//! Each value type has a table of native methods. A method missing from the
//! table falls through to the sequence operations (for iterable receivers)
//! and then to the methods every value has.

mod collection;
mod number;
mod string;

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::eval::invoke;
use crate::stream;
use crate::value::{FieldSpec, StructType, Tuple, Value};
use async_recursion::async_recursion;
use std::rc::Rc;

/// Dispatch `method` on `receiver` through the built-in tables.
pub async fn call(receiver: &Value, method: &str, arg: Value, ctx: &Context) -> Result<Value> {
    let found = match receiver {
        Value::Number(n) => number::call(*n, method, &arg)?,
        Value::String(s) => string::call(s, method, &arg, ctx).await?,
        Value::Boolean(b) => match method {
            "not" => Some(Value::boolean(!b)),
            _ => None,
        },
        Value::Tuple(t) => collection::tuple(t, method, &arg)?,
        Value::Array(items) => collection::array(items, method, &arg, ctx).await?,
        Value::Dict(d) => collection::dict(d, method, &arg)?,
        Value::Range(r) => collection::range(r, method, &arg)?,
        Value::Coroutine(coroutine) => match method {
            "send" => Some(coroutine.send(arg.clone()).await?),
            "yield" => Some(coroutine.yield_with(&arg, ctx).await?),
            _ => None,
        },
        Value::Cell(cell) => match method {
            "get" => Some(ctx.env.lookup(&cell.key).unwrap_or_else(|| cell.initial.clone())),
            "set" => {
                ctx.binder.bind(vec![(cell.key.clone(), arg.clone())]);
                Some(arg.clone())
            }
            _ => None,
        },
        _ => None,
    };
    if let Some(value) = found {
        return Ok(value);
    }

    if stream::is_sequence_method(method) {
        if let Some(source) = stream::iterate(receiver, ctx) {
            if let Some(value) = stream::call(source, method, arg.clone(), ctx).await? {
                return Ok(value);
            }
        }
    }

    match method {
        "==" => Ok(Value::boolean(equals(receiver, &arg, ctx).await?)),
        "!=" => Ok(Value::boolean(!equals(receiver, &arg, ctx).await?)),
        "toString" => Ok(Value::string(receiver.to_text())),
        "inspect" => Ok(Value::string(receiver.inspect())),
        "type" => Ok(Value::Type(receiver.type_ref())),
        _ => Err(EvalError::NoSuchMethod {
            receiver: receiver.inspect(),
            type_name: receiver.type_name(),
            method: method.to_string(),
        }),
    }
}

/// Structural equality. Elements are compared by invoking `==` on them, so
/// extensions and numeric operand checks apply element-wise.
#[async_recursion(?Send)]
pub async fn equals(a: &Value, b: &Value, ctx: &Context) -> Result<bool> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(x == y),
        (Value::String(x), Value::String(y)) => Ok(x.as_str() == y.as_str()),
        (Value::Boolean(x), Value::Boolean(y)) => Ok(x == y),
        (Value::Tuple(x), Value::Tuple(y)) => {
            if Rc::ptr_eq(x, y) {
                return Ok(true);
            }
            let same_tag = match (x.tag(), y.tag()) {
                (Some(p), Some(q)) => p.id == q.id,
                (None, None) => true,
                _ => false,
            };
            Ok(same_tag && all_equal(x.fields(), y.fields(), ctx).await?)
        }
        (Value::Array(x), Value::Array(y)) => all_equal(x, y, ctx).await,
        (Value::Dict(x), Value::Dict(y)) => {
            if x.len() != y.len() {
                return Ok(false);
            }
            for (key, value) in x.entries() {
                let Some(other) = y.get(key) else {
                    return Ok(false);
                };
                if !element_equal(value, other, ctx).await? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Range(x), Value::Range(y)) => Ok(x.stride == y.stride
            && element_equal(&x.from, &y.from, ctx).await?
            && element_equal(&x.to, &y.to, ctx).await?),
        (Value::Stream(x), other) | (other, Value::Stream(x)) => {
            let Some(other) = stream::iterate(other, ctx) else {
                return Ok(false);
            };
            let (left, right) = futures::try_join!(x.values(), other.values())?;
            all_equal(&left, &right, ctx).await
        }
        (Value::Type(x), Value::Type(y)) => Ok(x == y),
        (Value::Function(x), Value::Function(y)) => Ok(Rc::ptr_eq(x, y)),
        (Value::Builtin(x), Value::Builtin(y)) => Ok(Rc::ptr_eq(x, y)),
        (Value::Coroutine(x), Value::Coroutine(y)) => Ok(Rc::ptr_eq(x, y)),
        (Value::Cell(x), Value::Cell(y)) => Ok(x.key == y.key),
        (Value::Loop(x), Value::Loop(y)) => equals(x, y, ctx).await,
        _ => Ok(false),
    }
}

async fn element_equal(a: &Value, b: &Value, ctx: &Context) -> Result<bool> {
    Ok(matches!(invoke(a, "==", b.clone(), ctx).await?, Value::Boolean(true)))
}

async fn all_equal(xs: &[Value], ys: &[Value], ctx: &Context) -> Result<bool> {
    if xs.len() != ys.len() {
        return Ok(false);
    }
    for (x, y) in xs.iter().zip(ys) {
        if !element_equal(x, y, ctx).await? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Build an instance of `st` from a tuple of field values. Named fields are
/// matched by name, the rest by position; missing fields take their
/// default.
pub fn construct_struct(st: &Rc<StructType>, arg: Value) -> Result<Value> {
    let args = match &arg {
        Value::Tuple(t) => t.clone(),
        other => Tuple::new(vec![other.clone()]),
    };

    let mut fields = Vec::with_capacity(st.fields.len());
    for (index, (name, spec)) in st.fields.iter().zip(&st.specs).enumerate() {
        let given = args.field(name).or_else(|| match args.name_at(index) {
            None => args.get(index),
            Some(_) => None,
        });
        let value = match (given, spec) {
            (Some(value), FieldSpec::Typed(ty)) if !ty.admits(value) => {
                return Err(EvalError::TypeMismatch {
                    expected: format!("{} for field `{name}` of {}", ty.name(), st.name()),
                    found: value.inspect(),
                    type_name: value.type_name(),
                });
            }
            (Some(value), _) => value.clone(),
            (None, FieldSpec::Default(default)) => default.clone(),
            (None, _) => {
                return Err(EvalError::Type(format!("{} is missing field `{name}`", st.name())));
            }
        };
        fields.push(value);
    }
    Ok(Value::Tuple(Tuple::tagged(st.clone(), fields)))
}

/// Shared argument check for methods that need a Number.
fn number_arg(method: &str, arg: &Value) -> Result<f64> {
    match arg {
        Value::Number(n) => Ok(*n),
        other => Err(EvalError::OperandType {
            op: method.to_string(),
            value: other.inspect(),
            type_name: other.type_name(),
        }),
    }
}

/// Resolve an index, counting negative values from the end.
fn resolve_index(len: usize, index: f64) -> Option<usize> {
    let index = index.trunc();
    let resolved = if index < 0.0 { len as f64 + index } else { index };
    (resolved >= 0.0 && resolved < len as f64).then_some(resolved as usize)
}

/// Inclusive slice bounds `from..to`, negative values counted from the
/// end, as a half-open range clamped to `len`.
fn slice_bounds(len: usize, from: f64, to: f64) -> std::ops::Range<usize> {
    let resolve = |i: f64| {
        let i = i.trunc();
        if i < 0.0 { len as f64 + i } else { i }
    };
    let start = resolve(from).max(0.0);
    let end = (resolve(to) + 1.0).min(len as f64);
    if end <= start {
        return 0..0;
    }
    start as usize..end as usize
}
