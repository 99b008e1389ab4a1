//! Number methods.

use super::number_arg;
use crate::error::Result;
use crate::value::Value;

pub(super) fn call(n: f64, method: &str, arg: &Value) -> Result<Option<Value>> {
    let value = match method {
        "+" => Value::Number(n + number_arg(method, arg)?),
        "-" => Value::Number(n - number_arg(method, arg)?),
        "*" => Value::Number(n * number_arg(method, arg)?),
        "/" => Value::Number(n / number_arg(method, arg)?),
        "%" => Value::Number(n % number_arg(method, arg)?),
        "^" => Value::Number(n.powf(number_arg(method, arg)?)),
        "==" => Value::boolean(n == number_arg(method, arg)?),
        "!=" => Value::boolean(n != number_arg(method, arg)?),
        "<" => Value::boolean(n < number_arg(method, arg)?),
        "<=" => Value::boolean(n <= number_arg(method, arg)?),
        ">" => Value::boolean(n > number_arg(method, arg)?),
        ">=" => Value::boolean(n >= number_arg(method, arg)?),
        "min" => Value::Number(n.min(number_arg(method, arg)?)),
        "max" => Value::Number(n.max(number_arg(method, arg)?)),
        "atan2" => Value::Number(n.atan2(number_arg(method, arg)?)),

        "neg" => Value::Number(-n),
        "abs" => Value::Number(n.abs()),
        "sqrt" => Value::Number(n.sqrt()),
        "floor" => Value::Number(n.floor()),
        "ceil" => Value::Number(n.ceil()),
        "round" => Value::Number(n.round()),
        "sin" => Value::Number(n.sin()),
        "cos" => Value::Number(n.cos()),
        "tan" => Value::Number(n.tan()),
        "log" => Value::Number(n.ln()),
        "exp" => Value::Number(n.exp()),
        "succ" => Value::Number(n + 1.0),
        "pred" => Value::Number(n - 1.0),
        "isInteger" => Value::boolean(n.is_finite() && n == n.trunc()),
        _ => return Ok(None),
    };
    Ok(Some(value))
}
