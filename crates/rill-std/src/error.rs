//! Host I/O errors.

use rill_eval::EvalError;
use thiserror::Error;

/// Failures of host functions. They reach scripts as
/// [`EvalError::Host`] with the message unchanged.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("network access is disabled")]
    NetworkDisabled,
}

impl From<HostError> for EvalError {
    fn from(error: HostError) -> Self {
        EvalError::host(error)
    }
}
