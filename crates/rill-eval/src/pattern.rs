//! Pattern matching.
//! 模式匹配。
//!
//! [`test_pattern`] answers "would this match" without side effects other
//! than evaluating defaults; [`match_pattern`] produces the bindings and
//! reports why a match failed.

use crate::context::Context;
use crate::env::{Bindings, Key};
use crate::error::{EvalError, Result};
use crate::eval::evaluate;
use crate::stream::iterate;
use crate::value::{TypeRef, Value};
use async_recursion::async_recursion;
use futures::stream::{StreamExt, TryStreamExt};
use rill_syntax::{Expr, Ident, Pattern, PatternField, PatternKind};

/// Whether `value` matches `pattern`. Never fails; an error while looking
/// at the value counts as a mismatch.
#[async_recursion(?Send)]
pub async fn test_pattern(pattern: &Pattern, value: &Value, ctx: &Context) -> bool {
    match &pattern.kind {
        PatternKind::Identifier { .. } => true,
        PatternKind::Number(n) => matches!(value, Value::Number(v) if v == n),
        PatternKind::String(s) => matches!(value, Value::String(v) if v.as_str() == s),
        PatternKind::Boolean(b) => matches!(value, Value::Boolean(v) if v == b),

        PatternKind::Tuple { fields, default } => {
            let Ok(value) = substitute_default(value, default.as_deref(), ctx).await else {
                return false;
            };
            for (index, field) in fields.iter().enumerate() {
                if !test_pattern(&field.pattern, &tuple_field(&value, index, field), ctx).await {
                    return false;
                }
            }
            true
        }

        PatternKind::Array { elements, rest } => {
            let Ok(Some((prefix, remainder))) = split_elements(value, elements.len(), rest.is_some(), ctx).await
            else {
                return false;
            };
            for (element, item) in elements.iter().zip(&prefix) {
                if !test_pattern(element, item, ctx).await {
                    return false;
                }
            }
            match rest {
                Some(rest) => test_pattern(rest, &Value::array(remainder), ctx).await,
                None => true,
            }
        }

        PatternKind::Constructor { tag, inner } => match lookup_type(tag, ctx) {
            Ok(ty) if ty.admits(value) => test_pattern(inner, value, ctx).await,
            _ => false,
        },
    }
}

/// Match `value` against `pattern`, producing its bindings.
pub async fn match_pattern(pattern: &Pattern, value: Value, ctx: &Context) -> Result<Bindings> {
    let mut bindings = Vec::new();
    bind(pattern, value, ctx, &mut bindings).await?;
    Ok(bindings)
}

#[async_recursion(?Send)]
async fn bind(pattern: &Pattern, value: Value, ctx: &Context, out: &mut Bindings) -> Result<()> {
    match &pattern.kind {
        PatternKind::Identifier { name, default } => {
            if name.name == "_" {
                return Ok(());
            }
            let value = match default {
                Some(default) if value.is_empty_tuple() => evaluate(default, ctx).await?,
                _ => value,
            };
            out.push((Key::name(&name.name), value));
            Ok(())
        }

        PatternKind::Number(_) | PatternKind::String(_) | PatternKind::Boolean(_) => {
            if test_pattern(pattern, &value, ctx).await {
                Ok(())
            } else {
                Err(mismatch(pattern, &value))
            }
        }

        PatternKind::Tuple { fields, default } => {
            let value = substitute_default(&value, default.as_deref(), ctx).await?;
            for (index, field) in fields.iter().enumerate() {
                bind(&field.pattern, tuple_field(&value, index, field), ctx, out).await?;
            }
            Ok(())
        }

        PatternKind::Array { elements, rest } => {
            let Some((prefix, remainder)) = split_elements(&value, elements.len(), rest.is_some(), ctx).await?
            else {
                return Err(mismatch(pattern, &value));
            };
            for (element, item) in elements.iter().zip(prefix) {
                bind(element, item, ctx, out).await?;
            }
            if let Some(rest) = rest {
                bind(rest, Value::array(remainder), ctx, out).await?;
            }
            Ok(())
        }

        PatternKind::Constructor { tag, inner } => {
            let ty = lookup_type(tag, ctx)?;
            if !ty.admits(&value) {
                return Err(EvalError::TypeMismatch {
                    expected: ty.name(),
                    found: value.inspect(),
                    type_name: value.type_name(),
                });
            }
            bind(inner, value, ctx, out).await
        }
    }
}

fn mismatch(pattern: &Pattern, value: &Value) -> EvalError {
    EvalError::PatternMismatch {
        expected: pattern.describe(),
        found: value.inspect(),
    }
}

/// The empty value is replaced by the pattern's default, if any.
async fn substitute_default(value: &Value, default: Option<&Expr>, ctx: &Context) -> Result<Value> {
    match default {
        Some(default) if value.is_empty_tuple() => evaluate(default, ctx).await,
        _ => Ok(value.clone()),
    }
}

/// The value a tuple pattern field reads. Named fields look up by name
/// (dictionary keys too), positional fields by index; missing fields read as
/// the empty value.
fn tuple_field(value: &Value, index: usize, field: &PatternField) -> Value {
    let found = match (value, &field.name) {
        (Value::Tuple(t), Some(name)) => t.field(&name.name).cloned(),
        (Value::Tuple(t), None) => t.get(index).cloned(),
        (Value::Dict(d), Some(name)) => d.get_str(&name.name).cloned(),
        (other, None) if index == 0 => Some(other.clone()),
        _ => None,
    };
    found.unwrap_or_else(Value::empty)
}

/// The first `count` elements of an iterable and, if wanted, the rest.
/// `None` when the value is not iterable or too short.
async fn split_elements(
    value: &Value,
    count: usize,
    want_rest: bool,
    ctx: &Context,
) -> Result<Option<(Vec<Value>, Vec<Value>)>> {
    if let Value::Array(items) = value {
        if items.len() < count {
            return Ok(None);
        }
        let rest = if want_rest { items[count..].to_vec() } else { Vec::new() };
        return Ok(Some((items[..count].to_vec(), rest)));
    }

    let Some(stream) = iterate(value, ctx) else {
        return Ok(None);
    };
    let mut items = stream.open();
    let mut prefix = Vec::with_capacity(count);
    while prefix.len() < count {
        match items.next().await {
            Some(item) => prefix.push(item?),
            None => return Ok(None),
        }
    }
    let rest = if want_rest { items.try_collect().await? } else { Vec::new() };
    Ok(Some((prefix, rest)))
}

fn lookup_type(tag: &Ident, ctx: &Context) -> Result<TypeRef> {
    match ctx.env.get(&tag.name) {
        Some(Value::Type(ty)) => Ok(ty),
        Some(other) => Err(EvalError::Type(format!("`{}` is not a type, found {}", tag.name, other.inspect()))),
        None => Err(EvalError::UnboundIdentifier {
            name: tag.name.clone(),
        }),
    }
}
