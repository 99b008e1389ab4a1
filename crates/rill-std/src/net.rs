//! HTTP access.

use crate::{HostError, string_arg};
use rill_eval::{Context, EvalError, InterpreterConfig, Value};
use std::time::Duration;

/// Default timeout for HTTP requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default user agent.
const USER_AGENT: &str = concat!("rill/", env!("CARGO_PKG_VERSION"));

pub fn builtins() -> Vec<(&'static str, Value)> {
    vec![("fetch", Value::host("fetch", fetch))]
}

async fn fetch(url: Value, ctx: Context) -> Result<Value, EvalError> {
    let text = fetch_text(string_arg("fetch", &url)?, ctx.config()).await?;
    Ok(Value::string(text))
}

/// GET `url` and return the response body as text.
pub(crate) async fn fetch_text(url: &str, config: &InterpreterConfig) -> Result<String, HostError> {
    if !config.allow_network {
        return Err(HostError::NetworkDisabled);
    }
    tracing::debug!(url, "fetching");
    let client = reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

pub(crate) fn is_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_urls() {
        assert!(is_url("https://example.com/lib.rill"));
        assert!(is_url("http://localhost:8080/data.json"));
        assert!(!is_url("lib/http.rill"));
    }

    #[tokio::test]
    async fn offline_config_refuses_requests() {
        let config = InterpreterConfig::new().allow_network(false);
        let err = fetch_text("https://example.com", &config).await.unwrap_err();
        assert!(matches!(err, HostError::NetworkDisabled));
    }
}
