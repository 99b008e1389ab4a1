//! Error codes for Rill diagnostics.

/// Stable codes for every class of lexer, parser and runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer errors (E0001 - E0099)
    UnexpectedCharacter,
    UnterminatedString,
    InvalidEscape,
    InvalidNumber,

    // Parser errors (E0100 - E0199)
    UnexpectedToken,
    ExpectedExpression,
    ExpectedPattern,
    UnclosedDelimiter,
    MalformedTree,

    // Runtime errors (E0300 - E0399)
    UnboundIdentifier,
    NoSuchMember,
    NoSuchMethod,
    OperandType,
    NonBooleanCondition,
    NotApplicable,
    TypeMismatch,
    PatternMismatch,
    MatchExhausted,
    CoroutineClosed,
    HostError,
    Cancelled,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "E0001",
            ErrorCode::UnterminatedString => "E0002",
            ErrorCode::InvalidEscape => "E0003",
            ErrorCode::InvalidNumber => "E0004",

            // Parser
            ErrorCode::UnexpectedToken => "E0100",
            ErrorCode::ExpectedExpression => "E0101",
            ErrorCode::ExpectedPattern => "E0102",
            ErrorCode::UnclosedDelimiter => "E0103",
            ErrorCode::MalformedTree => "E0104",

            // Runtime
            ErrorCode::UnboundIdentifier => "E0300",
            ErrorCode::NoSuchMember => "E0301",
            ErrorCode::NoSuchMethod => "E0302",
            ErrorCode::OperandType => "E0303",
            ErrorCode::NonBooleanCondition => "E0304",
            ErrorCode::NotApplicable => "E0305",
            ErrorCode::TypeMismatch => "E0306",
            ErrorCode::PatternMismatch => "E0307",
            ErrorCode::MatchExhausted => "E0308",
            ErrorCode::CoroutineClosed => "E0309",
            ErrorCode::HostError => "E0310",
            ErrorCode::Cancelled => "E0311",
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedCharacter => "unexpected character in input",
            ErrorCode::UnterminatedString => "string literal is not terminated",
            ErrorCode::InvalidEscape => "invalid escape sequence in string",
            ErrorCode::InvalidNumber => "invalid number literal",

            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::ExpectedExpression => "expected an expression",
            ErrorCode::ExpectedPattern => "expected a pattern",
            ErrorCode::UnclosedDelimiter => "unclosed delimiter",
            ErrorCode::MalformedTree => "parse tree node has an unexpected shape",

            ErrorCode::UnboundIdentifier => "cannot find identifier in this scope",
            ErrorCode::NoSuchMember => "value has no such member",
            ErrorCode::NoSuchMethod => "value has no such method",
            ErrorCode::OperandType => "operator applied to an operand of the wrong type",
            ErrorCode::NonBooleanCondition => "condition is not a Boolean",
            ErrorCode::NotApplicable => "value cannot be applied",
            ErrorCode::TypeMismatch => "mismatched types",
            ErrorCode::PatternMismatch => "pattern did not match",
            ErrorCode::MatchExhausted => "no match clause accepted the value",
            ErrorCode::CoroutineClosed => "coroutine has finished",
            ErrorCode::HostError => "host function failed",
            ErrorCode::Cancelled => "evaluation was cancelled",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnterminatedString => Some("add a closing quote `\"` to terminate the string"),
            ErrorCode::UnclosedDelimiter => Some("add the matching closing delimiter"),
            ErrorCode::UnboundIdentifier => Some("check the spelling or bind the name before using it"),
            ErrorCode::NoSuchMethod => Some("add the method with `extend Type (name: fn)`"),
            ErrorCode::MatchExhausted => Some("add a final `_ => …` clause"),
            ErrorCode::NonBooleanCondition => Some("compare the value explicitly, e.g. `x != 0`"),
            _ => None,
        }
    }
}
