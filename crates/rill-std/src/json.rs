//! JSON decoding.

use crate::{HostError, string_arg};
use rill_eval::{Context, Dict, EvalError, Value};
use std::rc::Rc;

pub fn builtins() -> Vec<(&'static str, Value)> {
    vec![("json", Value::host("json", parse))]
}

async fn parse(text: Value, _ctx: Context) -> Result<Value, EvalError> {
    let parsed: serde_json::Value = serde_json::from_str(string_arg("json", &text)?).map_err(HostError::from)?;
    Ok(from_json(parsed))
}

/// Convert decoded JSON into a Rill value. Objects become dictionaries with
/// string keys and `null` becomes `()`.
/// 将 JSON 转换为 Rill 值。
pub fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::empty(),
        serde_json::Value::Bool(b) => Value::boolean(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::string(s),
        serde_json::Value::Array(items) => Value::array(items.into_iter().map(from_json).collect()),
        serde_json::Value::Object(members) => Value::Dict(Rc::new(
            members
                .into_iter()
                .map(|(key, value)| (Value::string(key), from_json(value)))
                .collect::<Dict>(),
        )),
    }
}
