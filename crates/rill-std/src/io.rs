//! Console, timers and files.

use crate::{HostError, string_arg};
use rill_eval::{Context, EvalError, Value, settle};
use std::time::Duration;

pub fn builtins() -> Vec<(&'static str, Value)> {
    vec![
        ("print", Value::host("print", print)),
        ("sleep", Value::host("sleep", sleep)),
        ("readFile", Value::host("readFile", read_file)),
    ]
}

/// Print the display form of a value, forcing streams first.
async fn print(value: Value, ctx: Context) -> Result<Value, EvalError> {
    let settled = settle(&value, &ctx, ctx.config().display_limit).await?;
    println!("{}", settled.to_text());
    Ok(Value::empty())
}

/// Suspend for `ms` milliseconds, or until the session is cancelled.
async fn sleep(ms: Value, ctx: Context) -> Result<Value, EvalError> {
    let millis = match ms {
        Value::Number(n) if n >= 0.0 && n.is_finite() => n as u64,
        other => {
            return Err(EvalError::TypeMismatch {
                expected: "a non-negative number of milliseconds".to_string(),
                found: other.inspect(),
                type_name: other.type_name(),
            });
        }
    };
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_millis(millis)) => Ok(Value::empty()),
        _ = ctx.cancel_token().cancelled() => Err(EvalError::Cancelled),
    }
}

async fn read_file(path: Value, ctx: Context) -> Result<Value, EvalError> {
    let path = ctx.config().resolve(string_arg("readFile", &path)?);
    tracing::debug!(path = %path.display(), "reading file");
    let text = tokio::fs::read_to_string(&path).await.map_err(HostError::from)?;
    Ok(Value::string(text))
}
