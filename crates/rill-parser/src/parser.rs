//! The Rill parser.

use rill_common::Span;
use rill_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use rill_lexer::{Token, TokenKind};
use rill_syntax::{RawKind, RawNode};

use crate::recovery::{Checkpoint, can_start_argument, can_start_pattern, is_stmt_end};

/// The Rill parser.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(Span::DUMMY, |t| Span::new(t.span.end, t.span.end));
            tokens.push(Token::new(TokenKind::Eof, end));
        }
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Parse a complete program. Returns `None` when there are no statements.
    pub fn parse_program(&mut self) -> Option<RawNode> {
        self.skip_separators();
        if self.at_end() {
            return None;
        }

        let statements = self.parse_statements(TokenKind::Eof);
        Some(RawNode::spanning(RawKind::Program, statements))
    }

    /// Parse separated statements up to (not including) `closing`.
    fn parse_statements(&mut self, closing: TokenKind) -> Vec<RawNode> {
        let mut statements = Vec::new();
        self.skip_separators();

        while !self.check(&closing) && !self.at_end() {
            let before = self.pos;
            let reported = self.diagnostics.len();

            statements.push(self.parse_statement());

            if !self.at_separator() && !self.check(&closing) && !self.at_end() {
                if self.diagnostics.len() == reported {
                    self.error(&format!("expected end of statement, found {}", self.current_kind()));
                }
                self.synchronize();
            }
            if self.pos == before {
                self.advance();
            }
            self.skip_separators();
        }

        statements
    }

    fn parse_statement(&mut self) -> RawNode {
        if let Some(assign) = self.try_assignment() {
            return assign;
        }
        self.parse_expr()
    }

    /// `pattern = value`, or `None` (position restored) when the statement
    /// is not an assignment.
    fn try_assignment(&mut self) -> Option<RawNode> {
        if !can_start_pattern(self.current_kind()) {
            return None;
        }
        let checkpoint = self.checkpoint();
        if let Some(pattern) = self.try_pattern() {
            if self.eat(TokenKind::Eq) {
                let value = self.parse_expr();
                return Some(RawNode::spanning(RawKind::Assign, vec![pattern, value]));
            }
        }
        self.restore(checkpoint);
        None
    }

    // ========== Expressions ==========

    fn parse_expr(&mut self) -> RawNode {
        self.parse_pipe_expr()
    }

    /// `receiver | method arg | method …`
    fn parse_pipe_expr(&mut self) -> RawNode {
        let mut expr = self.parse_conditional_expr();

        while self.eat(TokenKind::Pipe) {
            let TokenKind::Ident(method) = self.current_kind().clone() else {
                self.error_expected("a method name after `|`", ErrorCode::ExpectedExpression);
                break;
            };
            let method_span = self.current_span();
            self.advance();

            let mut node = RawNode::new(RawKind::Pipe, expr.span.merge(method_span))
                .with_text(method)
                .with_child(expr);
            if can_start_argument(self.current_kind()) {
                let arg = self.parse_conditional_expr();
                node.span = node.span.merge(arg.span);
                node.children.push(arg);
            }
            expr = node;
        }

        expr
    }

    fn parse_conditional_expr(&mut self) -> RawNode {
        if let Some(function) = self.try_function() {
            return function;
        }
        self.parse_or_expr()
    }

    /// `pattern [if guard] => body`, or `None` (position restored).
    fn try_function(&mut self) -> Option<RawNode> {
        if !can_start_pattern(self.current_kind()) {
            return None;
        }
        let checkpoint = self.checkpoint();

        if let Some(pattern) = self.try_pattern() {
            let guard = if self.check(&TokenKind::If) {
                let start = self.current_span();
                self.advance();
                let condition = self.parse_or_expr();
                Some(RawNode::new(RawKind::Guard, start.merge(condition.span)).with_child(condition))
            } else {
                None
            };

            if self.eat(TokenKind::FatArrow) {
                let body = self.parse_expr();
                let mut children = vec![pattern];
                children.extend(guard);
                children.push(body);
                return Some(RawNode::spanning(RawKind::Function, children));
            }
        }

        self.restore(checkpoint);
        None
    }

    fn parse_or_expr(&mut self) -> RawNode {
        let mut left = self.parse_and_expr();
        while self.eat(TokenKind::OrOr) {
            let right = self.parse_and_expr();
            left = RawNode::spanning(RawKind::Or, vec![left, right]);
        }
        left
    }

    fn parse_and_expr(&mut self) -> RawNode {
        let mut left = self.parse_comparison_expr();
        while self.eat(TokenKind::AndAnd) {
            let right = self.parse_comparison_expr();
            left = RawNode::spanning(RawKind::And, vec![left, right]);
        }
        left
    }

    fn parse_comparison_expr(&mut self) -> RawNode {
        self.parse_binary_level(
            &[
                TokenKind::EqEq,
                TokenKind::BangEq,
                TokenKind::Lt,
                TokenKind::LtEq,
                TokenKind::Gt,
                TokenKind::GtEq,
            ],
            Self::parse_merge_expr,
        )
    }

    fn parse_merge_expr(&mut self) -> RawNode {
        self.parse_binary_level(&[TokenKind::LtLt], Self::parse_range_expr)
    }

    fn parse_range_expr(&mut self) -> RawNode {
        let from = self.parse_additive_expr();
        if self.eat(TokenKind::DotDot) {
            let to = self.parse_additive_expr();
            return RawNode::spanning(RawKind::Range, vec![from, to]);
        }
        from
    }

    fn parse_additive_expr(&mut self) -> RawNode {
        self.parse_binary_level(&[TokenKind::Plus, TokenKind::Minus], Self::parse_multiplicative_expr)
    }

    fn parse_multiplicative_expr(&mut self) -> RawNode {
        self.parse_binary_level(
            &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
            Self::parse_power_expr,
        )
    }

    /// Left-associative binary operators of one precedence level.
    fn parse_binary_level(&mut self, ops: &[TokenKind], next: fn(&mut Self) -> RawNode) -> RawNode {
        let mut left = next(self);
        while ops.contains(self.current_kind()) {
            let symbol = self.current_kind().binary_symbol().unwrap_or_default();
            self.advance();
            let right = next(self);
            left = RawNode::spanning(RawKind::Binary, vec![left, right]).with_text(symbol);
        }
        left
    }

    /// `a ^ b`, right-associative.
    fn parse_power_expr(&mut self) -> RawNode {
        let base = self.parse_unary_expr();
        if self.eat(TokenKind::Caret) {
            let exponent = self.parse_power_expr();
            return RawNode::spanning(RawKind::Binary, vec![base, exponent]).with_text("^");
        }
        base
    }

    fn parse_unary_expr(&mut self) -> RawNode {
        let symbol = match self.current_kind() {
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            _ => return self.parse_apply_expr(),
        };
        let start = self.current_span();
        self.advance();
        let operand = self.parse_unary_expr();
        RawNode::new(RawKind::Unary, start.merge(operand.span))
            .with_text(symbol)
            .with_child(operand)
    }

    /// Juxtaposition: `f x y` is `(f x) y`. A function literal may appear as
    /// the last argument, as in `let (n = 0) => …`.
    fn parse_apply_expr(&mut self) -> RawNode {
        let mut callee = self.parse_postfix_expr();
        while can_start_argument(self.current_kind()) {
            let arg = match self.try_function() {
                Some(function) => function,
                None => self.parse_postfix_expr(),
            };
            callee = RawNode::spanning(RawKind::Apply, vec![callee, arg]);
        }
        callee
    }

    /// `x.name`, `x.0`
    fn parse_postfix_expr(&mut self) -> RawNode {
        let mut expr = self.parse_primary_expr();
        while self.check(&TokenKind::Dot) {
            self.advance();
            let member = match self.current_kind().clone() {
                TokenKind::Ident(name) => name,
                TokenKind::Number(n) if n.fract() == 0.0 && n >= 0.0 => format!("{}", n as u64),
                _ => {
                    self.error_expected("a member name or index after `.`", ErrorCode::ExpectedExpression);
                    break;
                }
            };
            let span = expr.span.merge(self.current_span());
            self.advance();
            expr = RawNode::new(RawKind::Member, span).with_text(member).with_child(expr);
        }
        expr
    }

    fn parse_primary_expr(&mut self) -> RawNode {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Number(n) => {
                self.advance();
                RawNode::leaf(RawKind::Number, span, n.to_string())
            }
            TokenKind::String(s) => {
                self.advance();
                RawNode::leaf(RawKind::String, span, s)
            }
            TokenKind::True => {
                self.advance();
                RawNode::leaf(RawKind::Bool, span, "true")
            }
            TokenKind::False => {
                self.advance();
                RawNode::leaf(RawKind::Bool, span, "false")
            }
            TokenKind::Ident(name) => {
                self.advance();
                RawNode::leaf(RawKind::Ident, span, name)
            }
            TokenKind::LParen => self.parse_paren_or_tuple(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::HashLBrace => self.parse_dict(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            _ => {
                self.error_expected("an expression", ErrorCode::ExpectedExpression);
                if !self.at_closing() {
                    self.advance();
                }
                RawNode::new(RawKind::Tuple, span)
            }
        }
    }

    /// `()`, `(expr)`, `(a, b)`, `(x: 1, y: 2)`, `(a,)`
    fn parse_paren_or_tuple(&mut self) -> RawNode {
        let open = self.current_span();
        self.advance();

        let mut fields = Vec::new();
        let mut saw_comma = false;
        while !self.check(&TokenKind::RParen) && !self.at_end() {
            fields.push(self.parse_tuple_field());
            if !self.eat(TokenKind::Comma) {
                break;
            }
            saw_comma = true;
        }
        let close = self.expect_closing(TokenKind::RParen, open);
        let span = open.merge(close);

        if fields.len() == 1 && !saw_comma && fields[0].text.is_none() {
            if let Some(inner) = fields.pop().and_then(|field| field.children.into_iter().next()) {
                return inner;
            }
        }
        RawNode::new(RawKind::Tuple, span).with_children(fields)
    }

    fn parse_tuple_field(&mut self) -> RawNode {
        let start = self.current_span();
        let name = match (self.current_kind(), self.peek_kind(1)) {
            (TokenKind::Ident(name) | TokenKind::String(name), TokenKind::Colon) => Some(name.clone()),
            _ => None,
        };
        if name.is_some() {
            self.advance();
            self.advance();
        }
        let value = self.parse_expr();
        let mut field = RawNode::new(RawKind::Field, start.merge(value.span)).with_child(value);
        field.text = name;
        field
    }

    fn parse_array(&mut self) -> RawNode {
        let open = self.current_span();
        self.advance();
        let elements = self.parse_comma_list(TokenKind::RBracket, |p| Some(p.parse_expr()));
        let close = self.expect_closing(TokenKind::RBracket, open);
        RawNode::new(RawKind::Array, open.merge(close)).with_children(elements)
    }

    /// `#{ key: value, … }`; a bare identifier key is a string.
    fn parse_dict(&mut self) -> RawNode {
        let open = self.current_span();
        self.advance();
        let entries = self.parse_comma_list(TokenKind::RBrace, |p| {
            let named = matches!(p.peek_kind(1), TokenKind::Colon);
            let key = match p.current_kind().clone() {
                TokenKind::Ident(name) if named => {
                    let span = p.current_span();
                    p.advance();
                    RawNode::leaf(RawKind::String, span, name)
                }
                _ => p.parse_or_expr(),
            };
            if !p.eat(TokenKind::Colon) {
                p.error_expected("`:` after dictionary key", ErrorCode::UnexpectedToken);
                return None;
            }
            let value = p.parse_expr();
            Some(RawNode::spanning(RawKind::Entry, vec![key, value]))
        });
        let close = self.expect_closing(TokenKind::RBrace, open);
        RawNode::new(RawKind::Dict, open.merge(close)).with_children(entries)
    }

    fn parse_block(&mut self) -> RawNode {
        let open = self.current_span();
        self.advance();
        let statements = self.parse_statements(TokenKind::RBrace);
        let close = self.expect_closing(TokenKind::RBrace, open);
        RawNode::new(RawKind::Block, open.merge(close)).with_children(statements)
    }

    /// `if c then a [else b]`
    fn parse_if(&mut self) -> RawNode {
        let start = self.current_span();
        self.advance();
        let condition = self.parse_expr();
        if !self.eat(TokenKind::Then) {
            self.error_expected("`then`", ErrorCode::UnexpectedToken);
        }
        let consequent = self.parse_expr();
        let mut children = vec![condition, consequent];
        if self.eat(TokenKind::Else) {
            children.push(self.parse_expr());
        }
        let end = self.previous_span();
        RawNode::new(RawKind::Conditional, start.merge(end)).with_children(children)
    }

    // ========== Patterns ==========

    /// Parse a pattern without reporting errors; callers restore a checkpoint
    /// on `None`.
    fn try_pattern(&mut self) -> Option<RawNode> {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                let is_tag = name.chars().next().is_some_and(char::is_uppercase);
                if is_tag && can_start_pattern(self.current_kind()) && !self.check(&TokenKind::Minus) {
                    let inner = self.try_pattern()?;
                    return Some(
                        RawNode::new(RawKind::PatConstructor, span.merge(inner.span))
                            .with_text(name)
                            .with_child(inner),
                    );
                }
                Some(RawNode::leaf(RawKind::PatIdent, span, name))
            }
            TokenKind::Number(n) => {
                self.advance();
                Some(RawNode::leaf(RawKind::PatNumber, span, n.to_string()))
            }
            TokenKind::Minus => {
                let &TokenKind::Number(n) = self.peek_kind(1) else {
                    return None;
                };
                self.advance();
                let end = self.current_span();
                self.advance();
                Some(RawNode::leaf(RawKind::PatNumber, span.merge(end), (-n).to_string()))
            }
            TokenKind::String(s) => {
                self.advance();
                Some(RawNode::leaf(RawKind::PatString, span, s))
            }
            TokenKind::True | TokenKind::False => {
                let text = if self.check(&TokenKind::True) { "true" } else { "false" };
                self.advance();
                Some(RawNode::leaf(RawKind::PatBool, span, text))
            }
            TokenKind::LParen => self.try_tuple_pattern(),
            TokenKind::LBracket => self.try_array_pattern(),
            _ => None,
        }
    }

    /// A nested pattern, which may carry `= default`.
    fn try_pattern_with_default(&mut self) -> Option<RawNode> {
        let mut pattern = self.try_pattern()?;
        let defaultable = matches!(pattern.kind, RawKind::PatIdent | RawKind::PatTuple);
        if defaultable && self.check(&TokenKind::Eq) {
            let start = self.current_span();
            self.advance();
            let value = self.parse_conditional_expr();
            pattern.span = pattern.span.merge(value.span);
            pattern
                .children
                .push(RawNode::new(RawKind::Default, start.merge(value.span)).with_child(value));
        }
        Some(pattern)
    }

    fn try_tuple_pattern(&mut self) -> Option<RawNode> {
        let open = self.current_span();
        self.advance();

        let mut fields = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let start = self.current_span();
            let name = match (self.current_kind(), self.peek_kind(1)) {
                (TokenKind::Ident(name) | TokenKind::String(name), TokenKind::Colon) => Some(name.clone()),
                _ => None,
            };
            if name.is_some() {
                self.advance();
                self.advance();
            }
            let pattern = self.try_pattern_with_default()?;
            let mut field = RawNode::new(RawKind::PatField, start.merge(pattern.span)).with_child(pattern);
            field.text = name;
            fields.push(field);

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        let close = self.current_span();
        if !self.eat(TokenKind::RParen) {
            return None;
        }
        Some(RawNode::new(RawKind::PatTuple, open.merge(close)).with_children(fields))
    }

    fn try_array_pattern(&mut self) -> Option<RawNode> {
        let open = self.current_span();
        self.advance();

        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.check(&TokenKind::DotDot) {
                let start = self.current_span();
                self.advance();
                let rest = self.try_pattern()?;
                elements.push(RawNode::new(RawKind::PatRest, start.merge(rest.span)).with_child(rest));
                self.eat(TokenKind::Comma);
                break;
            }
            elements.push(self.try_pattern_with_default()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        let close = self.current_span();
        if !self.eat(TokenKind::RBracket) {
            return None;
        }
        Some(RawNode::new(RawKind::PatArray, open.merge(close)).with_children(elements))
    }

    // ========== Token Helpers ==========

    fn current(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_kind(&self, n: usize) -> &TokenKind {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)].kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn at_separator(&self) -> bool {
        is_stmt_end(self.current_kind())
    }

    fn at_closing(&self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace | TokenKind::Eof
        ) || self.at_separator()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(&kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_separators(&mut self) {
        while self.at_separator() {
            self.advance();
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            diagnostics: self.diagnostics.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.diagnostics.truncate(checkpoint.diagnostics);
    }

    fn error(&mut self, message: &str) {
        let span = self.current_span();
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::Parser, span, message)
                .with_code(ErrorCode::UnexpectedToken)
                .with_label(Label::new(span, "here")),
        );
    }

    fn error_expected(&mut self, what: &str, code: ErrorCode) {
        let span = self.current_span();
        let found = self.current_kind().to_string();
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::Parser, span, format!("expected {what}, found {found}"))
                .with_code(code)
                .with_label(Label::new(span, "here")),
        );
    }

    /// Consume a closing delimiter, reporting the opening one if it is missing.
    fn expect_closing(&mut self, closing: TokenKind, open: Span) -> Span {
        let span = self.current_span();
        if self.eat(closing.clone()) {
            return span;
        }
        self.diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::Parser,
                span,
                format!("expected {closing}, found {}", self.current_kind()),
            )
            .with_code(ErrorCode::UnclosedDelimiter)
            .with_label(Label::new(open, "opened here")),
        );
        self.previous_span()
    }

    // ========== Error Recovery ==========

    /// Skip to the next statement boundary at the current nesting level.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace | TokenKind::HashLBrace => {
                    depth += 1;
                }
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                }
                kind if depth == 0 && is_stmt_end(kind) => return,
                _ => {}
            }
            self.advance();
        }
    }

    /// Parse a comma-separated list with error recovery.
    fn parse_comma_list<T, F>(&mut self, closing: TokenKind, mut parse_item: F) -> Vec<T>
    where
        F: FnMut(&mut Self) -> Option<T>,
    {
        let mut items = Vec::new();

        while !self.check(&closing) && !self.at_end() {
            if let Some(item) = parse_item(self) {
                items.push(item);
            } else {
                // Recovery: skip to comma or closing delimiter
                while !self.check(&TokenKind::Comma) && !self.check(&closing) && !self.at_end() {
                    self.advance();
                }
            }

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use crate::parse;

    fn sexp(source: &str) -> String {
        let (tree, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tree.map(|t| t.sexp()).unwrap_or_default()
    }

    #[test]
    fn empty_program_is_none() {
        assert!(parse("").0.is_none());
        assert!(parse("\n -- nothing here\n;").0.is_none());
    }

    #[test]
    fn assignment_vs_expression() {
        assert_eq!(
            sexp("x = 1"),
            r#"(Program (Assign (PatIdent "x") (Number "1")))"#
        );
        assert_eq!(
            sexp("(a, b) = (1, 2)"),
            r#"(Program (Assign (PatTuple (PatField (PatIdent "a")) (PatField (PatIdent "b"))) (Tuple (Field (Number "1")) (Field (Number "2")))))"#
        );
        assert_eq!(sexp("x == 1"), r#"(Program (Binary "==" (Ident "x") (Number "1")))"#);
    }

    #[test]
    fn pipe_with_function_argument() {
        assert_eq!(
            sexp("1..5 | map (n) => n * n"),
            r#"(Program (Pipe "map" (Range (Number "1") (Number "5")) (Function (PatTuple (PatField (PatIdent "n"))) (Binary "*" (Ident "n") (Ident "n")))))"#
        );
    }

    #[test]
    fn apply_with_trailing_function() {
        assert_eq!(
            sexp("let (n = 0) => loop n"),
            r#"(Program (Apply (Ident "let") (Function (PatTuple (PatField (PatIdent "n" (Default (Number "0"))))) (Apply (Ident "loop") (Ident "n")))))"#
        );
    }

    #[test]
    fn guard_and_constructor_patterns() {
        assert_eq!(
            sexp("Point (x, y) if x > 0 => x"),
            r#"(Program (Function (PatConstructor "Point" (PatTuple (PatField (PatIdent "x")) (PatField (PatIdent "y")))) (Guard (Binary ">" (Ident "x") (Number "0"))) (Ident "x")))"#
        );
    }

    #[test]
    fn parenthesized_expression_is_not_a_tuple() {
        assert_eq!(sexp("(1 + 2) * 3"), r#"(Program (Binary "*" (Binary "+" (Number "1") (Number "2")) (Number "3")))"#);
        assert_eq!(sexp("(1,)"), r#"(Program (Tuple (Field (Number "1"))))"#);
    }

    #[test]
    fn named_fields_members_and_dicts() {
        assert_eq!(
            sexp("(x: 1).x"),
            r#"(Program (Member "x" (Tuple (Field "x" (Number "1")))))"#
        );
        assert_eq!(
            sexp("#{ a: 1, \"b\": 2 }"),
            r#"(Program (Dict (Entry (String "a") (Number "1")) (Entry (String "b") (Number "2"))))"#
        );
    }

    #[test]
    fn conditional_and_logic() {
        assert_eq!(
            sexp("if a && b then 1 else 2"),
            r#"(Program (Conditional (And (Ident "a") (Ident "b")) (Number "1") (Number "2")))"#
        );
    }

    #[test]
    fn array_rest_pattern() {
        assert_eq!(
            sexp("[h, ..t] = xs"),
            r#"(Program (Assign (PatArray (PatIdent "h") (PatRest (PatIdent "t"))) (Ident "xs")))"#
        );
    }

    #[test]
    fn block_statements() {
        assert_eq!(
            sexp("{ a = 1; a }"),
            r#"(Program (Block (Assign (PatIdent "a") (Number "1")) (Ident "a")))"#
        );
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(
            sexp("2 ^ 3 ^ 2"),
            r#"(Program (Binary "^" (Number "2") (Binary "^" (Number "3") (Number "2"))))"#
        );
    }

    #[test]
    fn reports_multiple_errors() {
        let (_, diagnostics) = parse("x = )\ny = (1, 2\nz = 3");
        assert!(diagnostics.len() >= 2, "{diagnostics:?}");
    }
}
