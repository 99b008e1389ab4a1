//! String methods.

use super::{resolve_index, slice_bounds};
use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::stream::iterate;
use crate::value::{Str, Value};

pub(super) async fn call(s: &Str, method: &str, arg: &Value, ctx: &Context) -> Result<Option<Value>> {
    let value = match method {
        "+" => Value::string(format!("{}{}", s.as_str(), arg.to_text())),
        "<" => Value::boolean(s.as_str() < string_arg(method, arg)?),
        "<=" => Value::boolean(s.as_str() <= string_arg(method, arg)?),
        ">" => Value::boolean(s.as_str() > string_arg(method, arg)?),
        ">=" => Value::boolean(s.as_str() >= string_arg(method, arg)?),

        "size" => Value::Number(s.size() as f64),
        "at" => at(s, arg)?,
        "upper" => Value::string(s.as_str().to_uppercase()),
        "lower" => Value::string(s.as_str().to_lowercase()),
        "trim" => Value::string(s.as_str().trim()),
        "chars" => Value::array(s.chars().iter().map(|c| Value::string(c.to_string())).collect()),
        "split" => {
            let separator = string_arg(method, arg)?;
            let parts: Vec<Value> = if separator.is_empty() {
                s.chars().iter().map(|c| Value::string(c.to_string())).collect()
            } else {
                s.as_str().split(separator).map(Value::string).collect()
            };
            Value::array(parts)
        }
        "contains" => Value::boolean(s.as_str().contains(string_arg(method, arg)?)),
        "startsWith" => Value::boolean(s.as_str().starts_with(string_arg(method, arg)?)),
        "endsWith" => Value::boolean(s.as_str().ends_with(string_arg(method, arg)?)),
        "succ" => Value::string(shift_last(s, 1)),
        "pred" => Value::string(shift_last(s, -1)),
        "toNumber" => match s.as_str().trim().parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => {
                return Err(EvalError::Type(format!("cannot convert {:?} to Number", s.as_str())));
            }
        },
        "combine" => {
            let Some(parts) = iterate(arg, ctx) else {
                return Err(EvalError::TypeMismatch {
                    expected: "an iterable".to_string(),
                    found: arg.inspect(),
                    type_name: arg.type_name(),
                });
            };
            let parts: Vec<String> = parts.values().await?.iter().map(Value::to_text).collect();
            Value::string(parts.join(s.as_str()))
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn string_arg<'a>(method: &str, arg: &'a Value) -> Result<&'a str> {
    arg.as_str().ok_or_else(|| EvalError::OperandType {
        op: method.to_string(),
        value: arg.inspect(),
        type_name: arg.type_name(),
    })
}

fn at(s: &Str, arg: &Value) -> Result<Value> {
    let chars = s.chars();
    match arg {
        Value::Number(index) => Ok(match resolve_index(chars.len(), *index) {
            Some(i) => Value::string(chars[i].to_string()),
            None => Value::empty(),
        }),
        Value::Range(range) => match (&range.from, &range.to) {
            (Value::Number(from), Value::Number(to)) => {
                Ok(Value::string(chars[slice_bounds(chars.len(), *from, *to)].iter().collect::<String>()))
            }
            _ => Err(EvalError::Type(format!("cannot slice a String with {}", arg.inspect()))),
        },
        other => Err(EvalError::TypeMismatch {
            expected: "a Number or Range index".to_string(),
            found: other.inspect(),
            type_name: other.type_name(),
        }),
    }
}

/// Move the last code point by `delta`, so `"a" | succ` is `"b"`.
///
/// There is no carry: `"z" | succ` is `"{"` and `"az" | succ` is `"a{"`.
/// A String range therefore walks code points in its last position only,
/// and its endpoints should differ only there.
/// 只移动最后一个码点，不进位。
fn shift_last(s: &Str, delta: i64) -> String {
    let mut chars = s.chars().to_vec();
    if let Some(last) = chars.last_mut() {
        let mut shifted = (*last as i64 + delta).clamp(0, char::MAX as i64) as u32;
        // Skip the surrogate gap.
        if (0xD800..=0xDFFF).contains(&shifted) {
            shifted = if delta > 0 { 0xE000 } else { 0xD7FF };
        }
        if let Some(c) = char::from_u32(shifted) {
            *last = c;
        }
    }
    chars.into_iter().collect()
}
