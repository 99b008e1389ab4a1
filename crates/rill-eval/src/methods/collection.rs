//! Tuple, Array, Dict and Range methods.

use super::{number_arg, resolve_index, slice_bounds};
use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::stream::iterate;
use crate::value::{Dict, RangeValue, Tuple, Value};
use std::rc::Rc;

pub(super) fn tuple(t: &Tuple, method: &str, arg: &Value) -> Result<Option<Value>> {
    let value = match method {
        "size" => Value::Number(t.len() as f64),
        "at" => match arg {
            Value::String(name) => t.field(name.as_str()).cloned().unwrap_or_else(Value::empty),
            _ => match resolve_index(t.len(), number_arg(method, arg)?) {
                Some(i) => t.fields()[i].clone(),
                None => Value::empty(),
            },
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

pub(super) async fn array(items: &Rc<Vec<Value>>, method: &str, arg: &Value, ctx: &Context) -> Result<Option<Value>> {
    let value = match method {
        "+" => match arg {
            Value::Array(other) => Value::array(items.iter().chain(other.iter()).cloned().collect()),
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "an Array".to_string(),
                    found: other.inspect(),
                    type_name: other.type_name(),
                });
            }
        },
        "size" => Value::Number(items.len() as f64),
        "at" => match arg {
            Value::Range(range) => match (&range.from, &range.to) {
                (Value::Number(from), Value::Number(to)) => {
                    Value::array(items[slice_bounds(items.len(), *from, *to)].to_vec())
                }
                _ => return Err(EvalError::Type(format!("cannot slice an Array with {}", arg.inspect()))),
            },
            _ => match resolve_index(items.len(), number_arg(method, arg)?) {
                Some(i) => items[i].clone(),
                None => Value::empty(),
            },
        },
        "first" => items.first().cloned().unwrap_or_else(Value::empty),
        "last" => items.last().cloned().unwrap_or_else(Value::empty),
        "reverse" => Value::array(items.iter().rev().cloned().collect()),
        "push" => {
            let mut pushed = items.as_ref().clone();
            pushed.push(arg.clone());
            Value::array(pushed)
        }
        // Joins a sequence of iterables with this array between them.
        "combine" => {
            let Some(parts) = iterate(arg, ctx) else {
                return Err(EvalError::TypeMismatch {
                    expected: "an iterable".to_string(),
                    found: arg.inspect(),
                    type_name: arg.type_name(),
                });
            };
            let mut joined = Vec::new();
            for (i, part) in parts.values().await?.into_iter().enumerate() {
                if i > 0 {
                    joined.extend(items.iter().cloned());
                }
                match iterate(&part, ctx) {
                    Some(inner) => joined.extend(inner.values().await?),
                    None => joined.push(part),
                }
            }
            Value::array(joined)
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

pub(super) fn dict(d: &Dict, method: &str, arg: &Value) -> Result<Option<Value>> {
    let value = match method {
        "size" => Value::Number(d.len() as f64),
        "at" => d.get(arg).cloned().unwrap_or_else(Value::empty),
        "has" => Value::boolean(d.contains(arg)),
        "keys" => Value::array(d.entries().iter().map(|(k, _)| k.clone()).collect()),
        "values" => Value::array(d.entries().iter().map(|(_, v)| v.clone()).collect()),
        "with" => match arg {
            Value::Tuple(pair) if pair.len() == 2 => {
                let mut updated = d.clone();
                updated.insert(pair.fields()[0].clone(), pair.fields()[1].clone());
                Value::Dict(Rc::new(updated))
            }
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "a (key, value) pair".to_string(),
                    found: other.inspect(),
                    type_name: other.type_name(),
                });
            }
        },
        "merge" | "<<" => match arg {
            Value::Dict(other) => Value::Dict(Rc::new(d.merge(other))),
            other => {
                return Err(EvalError::TypeMismatch {
                    expected: "a Dict".to_string(),
                    found: other.inspect(),
                    type_name: other.type_name(),
                });
            }
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

pub(super) fn range(r: &RangeValue, method: &str, arg: &Value) -> Result<Option<Value>> {
    match method {
        "by" => {
            let stride = number_arg(method, arg)?;
            if stride <= 0.0 || !stride.is_finite() {
                return Err(EvalError::Type(format!("range stride must be positive, found {}", arg.inspect())));
            }
            Ok(Some(Value::Range(Rc::new(RangeValue {
                from: r.from.clone(),
                to: r.to.clone(),
                stride,
            }))))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Rc<Vec<Value>> {
        Rc::new(values.iter().map(|n| Value::Number(*n)).collect())
    }

    #[test]
    fn tuple_at_by_index_and_name() {
        let t = Tuple::named(vec![(None, 1.0.into()), (Some("y".into()), 2.0.into())]);
        assert_eq!(tuple(&t, "at", &Value::Number(-1.0)).unwrap().unwrap().inspect(), "2");
        assert_eq!(tuple(&t, "at", &Value::string("y")).unwrap().unwrap().inspect(), "2");
        assert!(tuple(&t, "at", &Value::Number(5.0)).unwrap().unwrap().is_empty_tuple());
    }

    #[test]
    fn dict_with_and_merge_keep_order() {
        let d: Dict = [("a".into(), Value::Number(1.0)), ("b".into(), Value::Number(2.0))]
            .into_iter()
            .collect();
        let pair = Value::tuple(vec!["a".into(), 9.0.into()]);
        let updated = dict(&d, "with", &pair).unwrap().unwrap();
        assert_eq!(updated.inspect(), "#{\"a\": 9, \"b\": 2}");
        assert_eq!(d.len(), 2);
        assert!(dict(&d, "merge", &Value::Number(1.0)).is_err());
    }

    #[test]
    fn range_stride_must_be_positive() {
        let r = RangeValue::new(1.0.into(), 10.0.into());
        assert_eq!(range(&r, "by", &Value::Number(3.0)).unwrap().unwrap().inspect(), "1..10 by 3");
        assert!(range(&r, "by", &Value::Number(0.0)).is_err());
    }

    #[test]
    fn slices_are_inclusive() {
        let items = numbers(&[1.0, 2.0, 3.0, 4.0]);
        let slice = Value::Range(Rc::new(RangeValue::new(1.0.into(), (-2.0).into())));
        let bounds = match &slice {
            Value::Range(r) => slice_bounds(items.len(), r.from.as_number().unwrap(), r.to.as_number().unwrap()),
            _ => unreachable!(),
        };
        assert_eq!(bounds, 1..3);
        assert_eq!(slice_bounds(4, 3.0, 1.0), 0..0);
    }
}
