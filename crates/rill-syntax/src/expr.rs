//! Expression AST nodes.
//! 表达式 AST 节点。

use crate::{Ident, Pattern, Stmt};
use rill_common::Span;
use std::rc::Rc;

/// An expression.
/// 表达式。
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kind.
/// 表达式类型。
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Number literal / 数字字面量
    Number(f64),
    /// String literal / 字符串字面量
    String(String),
    /// Boolean literal / 布尔字面量
    Bool(bool),
    /// Identifier reference / 标识符引用
    Ident(Ident),

    /// `{ stmt; stmt }` / 块表达式
    Block(Vec<Stmt>),

    /// `receiver | method arg` / 管道方法调用
    Pipe {
        receiver: Box<Expr>,
        method: Ident,
        arg: Option<Box<Expr>>,
    },

    /// `left op right` / 二元运算
    Operator {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// `if c then a else b` / 条件表达式
    Conditional {
        condition: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Option<Box<Expr>>,
    },

    /// `a || b`
    LogicalOr(Box<Expr>, Box<Expr>),
    /// `a && b`
    LogicalAnd(Box<Expr>, Box<Expr>),

    /// `f x` / 函数应用
    Apply { callee: Box<Expr>, arg: Box<Expr> },

    /// `from..to`
    Range { from: Box<Expr>, to: Box<Expr> },

    /// `x.name` or `x.0` / 成员访问
    Member { object: Box<Expr>, member: Member },

    /// `-x`, `!x`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// `pattern => body` / 函数
    Function(Rc<FunctionExpr>),

    /// `(a, name: b)` / 元组
    Tuple(Vec<TupleField>),

    /// `[a, b]` / 数组
    Array(Vec<Expr>),

    /// `#{ k: v }` / 字典
    Dict(Vec<(Expr, Expr)>),
}

/// A function literal. Shared behind `Rc` so closures keep their body alive
/// without copying it.
#[derive(Debug)]
pub struct FunctionExpr {
    /// Self-reference name, set when the literal is assigned to an identifier.
    pub name: Option<String>,
    pub param: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
    pub span: Span,
}

/// A tuple field, optionally named.
#[derive(Debug, Clone)]
pub struct TupleField {
    pub name: Option<Ident>,
    pub value: Expr,
}

/// The right-hand side of `.` in a member expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Name(String),
    Index(usize),
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Member::Name(name) => f.write_str(name),
            Member::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Binary operators.
/// 二元运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic 算术运算
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
    Mod, // %
    Pow, // ^

    // Comparison 比较运算
    Eq, // ==
    Ne, // !=
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=

    // Other 其他
    Merge, // <<
}

impl BinaryOp {
    /// The method name the operator dispatches to.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Merge => "<<",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        Some(match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "^" => BinaryOp::Pow,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "<<" => BinaryOp::Merge,
            _ => return None,
        })
    }
}

/// Unary operators.
/// 一元运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg, // -
    Not, // !
}

impl UnaryOp {
    /// The method name the operator dispatches to.
    pub fn method(self) -> &'static str {
        match self {
            UnaryOp::Neg => "neg",
            UnaryOp::Not => "not",
        }
    }
}
