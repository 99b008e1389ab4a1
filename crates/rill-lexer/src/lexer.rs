//! The Rill lexer.
//! Rill 词法分析器。

use crate::token::{Token, TokenKind};
use rill_common::Span;
use rill_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};

/// The Rill lexer.
/// Rill 词法分析器。
///
/// Converts source code into a sequence of tokens. Raw line breaks are
/// emitted as `Newline` tokens and then folded by [`fold_newlines`].
/// 将源代码转换为 token 序列。
pub struct Lexer<'src> {
    /// Character iterator with position info
    /// 带位置信息的字符迭代器
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    /// Current byte position in source
    /// 当前在源码中的字节位置
    pos: usize,
    /// Collected diagnostics
    /// 收集的诊断信息
    diagnostics: Vec<Diagnostic>,
    /// Whether the previous token was `.`; a number after it is a field index.
    /// 上一个 token 是否为 `.`，其后的数字是字段下标。
    after_dot: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    /// 为给定的源代码创建新的词法分析器。
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            pos: 0,
            diagnostics: Vec::new(),
            after_dot: false,
        }
    }

    /// Tokenize the entire source and return tokens and diagnostics.
    /// 对整个源代码进行词法分析，返回 token 列表和诊断信息。
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            self.after_dot = token.kind == TokenKind::Dot;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        (fold_newlines(tokens), self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.pos;

        let Some((_, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::from_usize(start, start));
        };

        let kind = match ch {
            '\n' => TokenKind::Newline,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '^' => TokenKind::Caret,
            '%' => TokenKind::Percent,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '-' => TokenKind::Minus,

            // Dict literal #{ - 字典字面量 #{
            '#' => {
                if self.eat_char('{') {
                    TokenKind::HashLBrace
                } else {
                    self.error_unexpected_char(ch, start);
                    TokenKind::Error
                }
            }

            '.' => {
                if self.eat_char('.') {
                    TokenKind::DotDot
                } else {
                    TokenKind::Dot
                }
            }

            '=' => {
                if self.eat_char('=') {
                    TokenKind::EqEq
                } else if self.eat_char('>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Eq
                }
            }

            '!' => {
                if self.eat_char('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }

            '<' => {
                if self.eat_char('=') {
                    TokenKind::LtEq
                } else if self.eat_char('<') {
                    TokenKind::LtLt
                } else {
                    TokenKind::Lt
                }
            }

            '>' => {
                if self.eat_char('=') {
                    TokenKind::GtEq
                } else {
                    TokenKind::Gt
                }
            }

            '&' => {
                if self.eat_char('&') {
                    TokenKind::AndAnd
                } else {
                    self.error_unexpected_char(ch, start);
                    TokenKind::Error
                }
            }

            '|' => {
                if self.eat_char('|') {
                    TokenKind::OrOr
                } else {
                    TokenKind::Pipe
                }
            }

            '"' => self.string_literal(start),

            '0'..='9' => self.number(ch, start),

            c if c.is_alphabetic() || c == '_' => self.identifier(ch),

            _ => {
                self.error_unexpected_char(ch, start);
                TokenKind::Error
            }
        };

        Token::new(kind, Span::from_usize(start, self.pos))
    }

    /// Advance to the next character.
    /// 前进到下一个字符。
    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.pos = pos + ch.len_utf8();
        }
        result
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n).map(|(_, ch)| ch)
    }

    fn eat_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip spaces, tabs and `--` line comments, stopping at line breaks.
    /// 跳过空白与 `--` 行注释，在换行处停止。
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '-' && self.peek_nth(1) == Some('-') {
                while let Some(ch) = self.peek_char() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if ch.is_whitespace() && ch != '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse a string literal (double-quoted).
    /// 解析字符串字面量（双引号包围）。
    fn string_literal(&mut self, start: usize) -> TokenKind {
        let mut value = String::new();

        loop {
            match self.advance() {
                Some((_, '"')) => break,
                Some((_, '\\')) => {
                    if let Some(escaped) = self.escape_char() {
                        value.push(escaped);
                    }
                }
                Some((_, ch)) => value.push(ch),
                None => {
                    let span = Span::from_usize(start, self.pos);
                    self.diagnostics.push(
                        Diagnostic::error(DiagnosticKind::Lexer, span, "unterminated string")
                            .with_code(ErrorCode::UnterminatedString)
                            .with_label(Label::new(Span::from_usize(start, start + 1), "string starts here")),
                    );
                    return TokenKind::Error;
                }
            }
        }

        TokenKind::String(value)
    }

    /// Parse an escape character sequence.
    /// 解析转义字符序列。
    fn escape_char(&mut self) -> Option<char> {
        match self.advance() {
            Some((_, 'n')) => Some('\n'),
            Some((_, 'r')) => Some('\r'),
            Some((_, 't')) => Some('\t'),
            Some((_, '0')) => Some('\0'),
            Some((_, '\\')) => Some('\\'),
            Some((_, '"')) => Some('"'),
            Some((_, 'u')) => self.unicode_escape(),
            Some((pos, ch)) => {
                let span = Span::from_usize(pos - 1, self.pos);
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Lexer,
                        span,
                        format!("invalid escape sequence: \\{}", ch),
                    )
                    .with_code(ErrorCode::InvalidEscape),
                );
                None
            }
            None => None,
        }
    }

    /// `\u{1F600}` style escape.
    fn unicode_escape(&mut self) -> Option<char> {
        let start = self.pos;
        if !self.eat_char('{') {
            self.invalid_unicode_escape(start);
            return None;
        }
        let mut digits = String::new();
        while let Some(ch) = self.peek_char() {
            if ch == '}' {
                break;
            }
            digits.push(ch);
            self.advance();
        }
        if !self.eat_char('}') {
            self.invalid_unicode_escape(start);
            return None;
        }
        let decoded = u32::from_str_radix(&digits, 16).ok().and_then(char::from_u32);
        if decoded.is_none() {
            self.invalid_unicode_escape(start);
        }
        decoded
    }

    fn invalid_unicode_escape(&mut self, start: usize) {
        self.diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::Lexer,
                Span::from_usize(start, self.pos),
                "invalid unicode escape, expected `\\u{XXXX}`",
            )
            .with_code(ErrorCode::InvalidEscape),
        );
    }

    /// Parse a number literal. After `.` only the integer part is read, so
    /// `pair.0.1` lexes as two field accesses.
    /// 解析数字字面量。
    fn number(&mut self, first: char, start: usize) -> TokenKind {
        let mut value = String::from(first);

        self.digits(&mut value);

        if !self.after_dot && self.peek_char() == Some('.') {
            if let Some(next) = self.peek_nth(1) {
                if next.is_ascii_digit() {
                    self.advance();
                    value.push('.');
                    self.digits(&mut value);
                }
            }
        }

        if !self.after_dot {
            if let Some('e' | 'E') = self.peek_char() {
                let signed = matches!(self.peek_nth(1), Some('+' | '-'));
                let digit_at = if signed { 2 } else { 1 };
                if self.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                    value.push('e');
                    if signed {
                        if let Some((_, sign)) = self.advance() {
                            value.push(sign);
                        }
                    }
                    self.digits(&mut value);
                }
            }
        }

        match value.parse::<f64>() {
            Ok(n) => TokenKind::Number(n),
            Err(_) => {
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Lexer,
                        Span::from_usize(start, self.pos),
                        format!("invalid number literal `{value}`"),
                    )
                    .with_code(ErrorCode::InvalidNumber),
                );
                TokenKind::Error
            }
        }
    }

    fn digits(&mut self, into: &mut String) {
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.advance();
            } else if ch == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Parse an identifier or keyword.
    /// 解析标识符或关键字。
    fn identifier(&mut self, first: char) -> TokenKind {
        let mut value = String::from(first);

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::keyword_from_str(&value).unwrap_or(TokenKind::Ident(value))
    }

    /// Report an unexpected character error.
    /// 报告意外字符错误。
    fn error_unexpected_char(&mut self, ch: char, pos: usize) {
        let span = Span::from_usize(pos, self.pos);
        self.diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::Lexer,
                span,
                format!("unexpected character: '{}'", ch),
            )
            .with_code(ErrorCode::UnexpectedCharacter)
            .with_label(Label::new(span, "unexpected character here")),
        );
    }
}

/// Decide which raw line breaks act as statement separators.
/// 决定哪些换行符作为语句分隔符。
///
/// A line break is dropped when it sits inside `(…)`, `[…]` or `#{…}`, when
/// the previous token cannot end an expression, or when the next line starts
/// with a token that can only continue one (`|`, `then`, `else`, a binary
/// operator other than `-`). Runs of breaks collapse into one.
fn fold_newlines(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut nesting: Vec<TokenKind> = Vec::new();

    for token in tokens {
        if token.kind == TokenKind::Newline {
            let in_group = matches!(
                nesting.last(),
                Some(TokenKind::LParen | TokenKind::LBracket | TokenKind::HashLBrace)
            );
            let after_continuation = out.last().is_none_or(|prev| prev.kind.continues_line());
            if !in_group && !after_continuation {
                out.push(token);
            }
            continue;
        }

        if token.kind.resumes_line() && out.last().is_some_and(|prev| prev.kind == TokenKind::Newline) {
            out.pop();
        }

        match token.kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::HashLBrace => {
                nesting.push(token.kind.clone());
            }
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                nesting.pop();
            }
            _ => {}
        }

        out.push(token);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn field_index_after_dot() {
        assert_eq!(
            kinds("p.0.1"),
            vec![
                TokenKind::Ident("p".into()),
                TokenKind::Dot,
                TokenKind::Number(0.0),
                TokenKind::Dot,
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn range_is_not_a_float() {
        assert_eq!(
            kinds("1..5"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::DotDot,
                TokenKind::Number(5.0),
                TokenKind::Eof
            ]
        );
        assert_eq!(kinds("2.5e2"), vec![TokenKind::Number(250.0), TokenKind::Eof]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("x -- the answer\n"),
            vec![TokenKind::Ident("x".into()), TokenKind::Newline, TokenKind::Eof]
        );
    }

    #[test]
    fn pipe_continuation_folds_newline() {
        assert_eq!(
            kinds("xs\n  | size\ny"),
            vec![
                TokenKind::Ident("xs".into()),
                TokenKind::Pipe,
                TokenKind::Ident("size".into()),
                TokenKind::Newline,
                TokenKind::Ident("y".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_inside_parens_are_dropped() {
        assert_eq!(
            kinds("(1,\n 2\n)"),
            vec![
                TokenKind::LParen,
                TokenKind::Number(1.0),
                TokenKind::Comma,
                TokenKind::Number(2.0),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_inside_braces_separate() {
        assert_eq!(
            kinds("{\n a\n\n b\n}"),
            vec![
                TokenKind::LBrace,
                TokenKind::Ident("a".into()),
                TokenKind::Newline,
                TokenKind::Ident("b".into()),
                TokenKind::Newline,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_reports() {
        let (tokens, diagnostics) = Lexer::new("\"abc").tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(diagnostics[0].code, Some(ErrorCode::UnterminatedString));
    }

    #[test]
    fn escapes() {
        assert_eq!(
            kinds(r#""a\tb\u{41}""#),
            vec![TokenKind::String("a\tbA".into()), TokenKind::Eof]
        );
    }
}
