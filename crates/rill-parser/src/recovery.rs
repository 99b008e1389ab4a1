//! Backtracking and error recovery support for the parser.

use rill_lexer::TokenKind;

/// Tokens that end a statement.
pub const STMT_ENDS: &[TokenKind] = &[TokenKind::Newline, TokenKind::Semicolon];

/// Check if a token kind is in a set.
pub fn is_in_set(kind: &TokenKind, set: &[TokenKind]) -> bool {
    set.iter()
        .any(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
}

/// Check if a token ends a statement.
pub fn is_stmt_end(kind: &TokenKind) -> bool {
    is_in_set(kind, STMT_ENDS)
}

/// Tokens that may begin a juxtaposed argument, as in `f x`.
pub fn can_start_argument(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::HashLBrace
    )
}

/// Tokens that may begin a pattern.
pub fn can_start_pattern(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Number(_)
            | TokenKind::String(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Minus
            | TokenKind::LParen
            | TokenKind::LBracket
    )
}

/// A saved parser position. Restoring it also drops diagnostics reported
/// after it was taken.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pub pos: usize,
    pub diagnostics: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_membership_ignores_payload() {
        assert!(is_in_set(&TokenKind::Ident("x".into()), &[TokenKind::Ident(String::new())]));
        assert!(is_stmt_end(&TokenKind::Semicolon));
        assert!(!is_stmt_end(&TokenKind::Comma));
    }
}
