//! The raw parse tree.
//! 原始语法树。
//!
//! The parser emits a uniform, loosely-typed tree: each node has a kind, an
//! optional text payload and positional children. Only [`crate::transform`]
//! interprets the child layout, so the parser stays small and the AST stays
//! strongly typed.

use rill_common::Span;

/// Kind of a raw node; selects the transform branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    /// children: statements
    Program,
    /// children: statements
    Block,
    /// children: [pattern, value]
    Assign,
    /// text: method; children: [receiver, arg?]
    Pipe,
    /// text: operator; children: [left, right]
    Binary,
    /// children: [left, right]
    Or,
    /// children: [left, right]
    And,
    /// children: [condition, consequent, alternate?]
    Conditional,
    /// children: [callee, arg]
    Apply,
    /// children: [from, to]
    Range,
    /// text: member name or index; children: [object]
    Member,
    /// text: operator; children: [operand]
    Unary,
    /// children: [pattern, Guard?, body]
    Function,
    /// children: [condition]
    Guard,
    /// children: Field*
    Tuple,
    /// text: name?; children: [value]
    Field,
    /// children: elements
    Array,
    /// children: Entry*
    Dict,
    /// children: [key, value]
    Entry,
    /// text: name
    Ident,
    /// text: literal
    Number,
    /// text: contents
    String,
    /// text: "true" | "false"
    Bool,

    /// text: name; children: [Default?]
    PatIdent,
    /// text: literal
    PatNumber,
    /// text: contents
    PatString,
    /// text: "true" | "false"
    PatBool,
    /// children: PatField*, Default?
    PatTuple,
    /// text: name?; children: [pattern]
    PatField,
    /// children: patterns, PatRest?
    PatArray,
    /// children: [pattern]
    PatRest,
    /// text: type name; children: [pattern]
    PatConstructor,
    /// children: [expr]
    Default,
}

/// A node of the raw parse tree.
/// 原始语法树节点。
#[derive(Debug, Clone)]
pub struct RawNode {
    pub kind: RawKind,
    pub span: Span,
    pub text: Option<String>,
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(kind: RawKind, span: Span) -> Self {
        Self {
            kind,
            span,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: RawNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = RawNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Node with a leaf text payload.
    pub fn leaf(kind: RawKind, span: Span, text: impl Into<String>) -> Self {
        Self::new(kind, span).with_text(text)
    }

    /// Node spanning from its first to last child.
    pub fn spanning(kind: RawKind, children: Vec<RawNode>) -> Self {
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span.merge(last.span),
            _ => Span::DUMMY,
        };
        Self::new(kind, span).with_children(children)
    }

    /// S-expression rendering, handy in tests and `--verbose` output.
    pub fn sexp(&self) -> String {
        let mut out = format!("({:?}", self.kind);
        if let Some(text) = &self.text {
            out.push_str(&format!(" {text:?}"));
        }
        for child in &self.children {
            out.push(' ');
            out.push_str(&child.sexp());
        }
        out.push(')');
        out
    }
}
