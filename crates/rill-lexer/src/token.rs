//! Token definitions for Rill.

use rill_common::Span;

/// A token with its kind and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    String(String),

    // Identifiers
    Ident(String),

    // Keywords
    If,
    Then,
    Else,
    True,
    False,

    // Delimiters
    LParen,     // (
    RParen,     // )
    LBracket,   // [
    RBracket,   // ]
    LBrace,     // {
    RBrace,     // }
    HashLBrace, // #{

    // Operators
    Plus,     // +
    Minus,    // -
    Star,     // *
    Slash,    // /
    Percent,  // %
    Caret,    // ^
    Eq,       // =
    EqEq,     // ==
    BangEq,   // !=
    Lt,       // <
    LtEq,     // <=
    LtLt,     // <<
    Gt,       // >
    GtEq,     // >=
    AndAnd,   // &&
    OrOr,     // ||
    Bang,     // !
    Pipe,     // |
    FatArrow, // =>
    DotDot,   // ..

    // Punctuation
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Dot,       // .
    Newline,

    // Special
    Eof,
    Error,
}

impl TokenKind {
    /// Returns true if this token is a keyword.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::If | TokenKind::Then | TokenKind::Else | TokenKind::True | TokenKind::False
        )
    }

    /// Returns the keyword for an identifier, if any.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "if" => Some(TokenKind::If),
            "then" => Some(TokenKind::Then),
            "else" => Some(TokenKind::Else),
            "true" => Some(TokenKind::True),
            "false" => Some(TokenKind::False),
            _ => None,
        }
    }

    /// The operator's source text, for binary operators.
    pub fn binary_symbol(&self) -> Option<&'static str> {
        Some(match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::LtLt => "<<",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            _ => return None,
        })
    }

    /// A line ending after this token continues onto the next line.
    pub(crate) fn continues_line(&self) -> bool {
        self.binary_symbol().is_some()
            || matches!(
                self,
                TokenKind::AndAnd
                    | TokenKind::OrOr
                    | TokenKind::Bang
                    | TokenKind::Pipe
                    | TokenKind::FatArrow
                    | TokenKind::DotDot
                    | TokenKind::Dot
                    | TokenKind::Eq
                    | TokenKind::Comma
                    | TokenKind::Colon
                    | TokenKind::Semicolon
                    | TokenKind::LParen
                    | TokenKind::LBracket
                    | TokenKind::LBrace
                    | TokenKind::HashLBrace
                    | TokenKind::If
                    | TokenKind::Then
                    | TokenKind::Else
                    | TokenKind::Newline
            )
    }

    /// A line starting with this token continues the previous line.
    pub(crate) fn resumes_line(&self) -> bool {
        (self.binary_symbol().is_some() && *self != TokenKind::Minus)
            || matches!(
                self,
                TokenKind::AndAnd
                    | TokenKind::OrOr
                    | TokenKind::Pipe
                    | TokenKind::FatArrow
                    | TokenKind::DotDot
                    | TokenKind::Dot
                    | TokenKind::Then
                    | TokenKind::Else
            )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(symbol) = self.binary_symbol() {
            return write!(f, "`{symbol}`");
        }
        let text = match self {
            TokenKind::Number(n) => return write!(f, "number `{n}`"),
            TokenKind::String(_) => "string literal",
            TokenKind::Ident(name) => return write!(f, "identifier `{name}`"),
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Else => "`else`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::HashLBrace => "`#{`",
            TokenKind::Eq => "`=`",
            TokenKind::AndAnd => "`&&`",
            TokenKind::OrOr => "`||`",
            TokenKind::Bang => "`!`",
            TokenKind::Pipe => "`|`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::DotDot => "`..`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dot => "`.`",
            TokenKind::Newline => "line break",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "invalid token",
            _ => "operator",
        };
        f.write_str(text)
    }
}
