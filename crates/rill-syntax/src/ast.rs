//! Top-level AST nodes.

use crate::{Expr, Pattern};
use rill_common::Span;

/// A whole program: top-level statements run against the global scope.
#[derive(Debug, Clone)]
pub struct Program {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

/// A statement inside a program or block.
/// 程序或块中的语句。
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `pattern = value`
    Assign {
        pattern: Pattern,
        value: Expr,
        span: Span,
    },
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Assign { span, .. } => *span,
            Stmt::Expr(expr) => expr.span,
        }
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}
