//! Dynamic imports.
//! 动态导入。
//!
//! `import "path"` loads a file (or an `http(s)://` URL). JSON documents
//! become data: an object is re-exported as a named tuple of its members.
//! Anything else is Rill source, run in a scope nested in the importer's
//! environment; the import evaluates to the source's last value.

use crate::json::from_json;
use crate::net::{fetch_text, is_url};
use crate::{HostError, string_arg};
use rill_eval::{Context, EvalError, Tuple, Value, run_source};

pub fn builtins() -> Vec<(&'static str, Value)> {
    vec![("import", Value::host("import", import))]
}

async fn import(path: Value, ctx: Context) -> Result<Value, EvalError> {
    let path = string_arg("import", &path)?;
    tracing::debug!(path, "importing");
    let text = load(path, &ctx).await?;

    if path.ends_with(".json") {
        let json: serde_json::Value = serde_json::from_str(&text).map_err(HostError::from)?;
        return Ok(match json {
            serde_json::Value::Object(members) => Value::Tuple(Tuple::named(
                members
                    .into_iter()
                    .map(|(name, value)| (Some(name), from_json(value)))
                    .collect(),
            )),
            other => from_json(other),
        });
    }

    Ok(run_source(&text, &ctx).await?.unwrap_or_else(Value::empty))
}

async fn load(path: &str, ctx: &Context) -> Result<String, HostError> {
    if is_url(path) {
        fetch_text(path, ctx.config()).await
    } else {
        Ok(tokio::fs::read_to_string(ctx.config().resolve(path)).await?)
    }
}
