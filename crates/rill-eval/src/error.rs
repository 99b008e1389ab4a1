//! Runtime errors.

use rill_diagnostic::ErrorCode;
use thiserror::Error;

pub type Result<T, E = EvalError> = std::result::Result<T, E>;

/// Everything that can go wrong while evaluating. Errors always propagate to
/// the host; the evaluator never recovers locally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    // Reference errors
    #[error("unbound identifier `{name}`")]
    UnboundIdentifier { name: String },

    #[error("{receiver} ({type_name}) has no member `{member}`")]
    NoSuchMember {
        receiver: String,
        type_name: String,
        member: String,
    },

    #[error("{receiver} ({type_name}) has no method `{method}`")]
    NoSuchMethod {
        receiver: String,
        type_name: String,
        method: String,
    },

    // Type errors
    #[error("operator `{op}` expects a Number, found {value} ({type_name})")]
    OperandType {
        op: String,
        value: String,
        type_name: String,
    },

    #[error("condition must be a Boolean, found {value} ({type_name})")]
    NonBooleanCondition { value: String, type_name: String },

    #[error("{value} ({type_name}) cannot be applied")]
    NotApplicable { value: String, type_name: String },

    #[error("expected {expected}, found {found} ({type_name})")]
    TypeMismatch {
        expected: String,
        found: String,
        type_name: String,
    },

    #[error("type error: {0}")]
    Type(String),

    // Pattern errors
    #[error("pattern mismatch: expected {expected}, found {found}")]
    PatternMismatch { expected: String, found: String },

    #[error("no match clause accepted {value} ({type_name})")]
    MatchExhausted { value: String, type_name: String },

    // Concurrency
    #[error("coroutine has finished")]
    CoroutineClosed,

    #[error("evaluation cancelled")]
    Cancelled,

    // Host
    #[error("{0}")]
    Host(String),

    #[error("syntax error: {0}")]
    Syntax(String),
}

impl EvalError {
    /// The diagnostic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalError::UnboundIdentifier { .. } => ErrorCode::UnboundIdentifier,
            EvalError::NoSuchMember { .. } => ErrorCode::NoSuchMember,
            EvalError::NoSuchMethod { .. } => ErrorCode::NoSuchMethod,
            EvalError::OperandType { .. } => ErrorCode::OperandType,
            EvalError::NonBooleanCondition { .. } => ErrorCode::NonBooleanCondition,
            EvalError::NotApplicable { .. } => ErrorCode::NotApplicable,
            EvalError::TypeMismatch { .. } | EvalError::Type(_) => ErrorCode::TypeMismatch,
            EvalError::PatternMismatch { .. } => ErrorCode::PatternMismatch,
            EvalError::MatchExhausted { .. } => ErrorCode::MatchExhausted,
            EvalError::CoroutineClosed => ErrorCode::CoroutineClosed,
            EvalError::Cancelled => ErrorCode::Cancelled,
            EvalError::Host(_) => ErrorCode::HostError,
            EvalError::Syntax(_) => ErrorCode::UnexpectedToken,
        }
    }

    /// Wrap a host failure, keeping its message unchanged.
    pub fn host(error: impl std::fmt::Display) -> Self {
        EvalError::Host(error.to_string())
    }
}
