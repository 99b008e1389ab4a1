//! Pattern AST nodes.

use crate::{Expr, Ident};
use rill_common::Span;

/// A destructuring pattern, used by assignments, function parameters and
/// match clauses.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub kind: PatternKind,
    pub span: Span,
}

impl Pattern {
    pub fn new(kind: PatternKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Default of the first tuple field, if this is a tuple pattern whose first
    /// field is an identifier carrying one. Decides whether `reduce` is seeded.
    pub fn first_field_default(&self) -> Option<&Expr> {
        match &self.kind {
            PatternKind::Tuple { fields, .. } => match &fields.first()?.pattern.kind {
                PatternKind::Identifier { default, .. } => default.as_deref(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Source-like rendering, used in mismatch messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            PatternKind::Identifier { name, .. } => name.name.clone(),
            PatternKind::Number(n) => format!("{n}"),
            PatternKind::String(s) => format!("{s:?}"),
            PatternKind::Boolean(b) => b.to_string(),
            PatternKind::Tuple { fields, .. } => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|field| match &field.name {
                        Some(name) => format!("{}: {}", name.name, field.pattern.describe()),
                        None => field.pattern.describe(),
                    })
                    .collect();
                format!("({})", inner.join(", "))
            }
            PatternKind::Array { elements, rest } => {
                let mut inner: Vec<String> = elements.iter().map(Pattern::describe).collect();
                if let Some(rest) = rest {
                    inner.push(format!("..{}", rest.describe()));
                }
                format!("[{}]", inner.join(", "))
            }
            PatternKind::Constructor { tag, inner } => format!("{} {}", tag.name, inner.describe()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum PatternKind {
    /// `x` or `x = default`; `_` binds nothing.
    Identifier {
        name: Ident,
        default: Option<Box<Expr>>,
    },

    /// Literal patterns `42`, `"hi"`, `true`
    Number(f64),
    String(String),
    Boolean(bool),

    /// `(a, name: b)`, optionally with a default for the whole value
    Tuple {
        fields: Vec<PatternField>,
        default: Option<Box<Expr>>,
    },

    /// `[a, b, ..rest]`
    Array {
        elements: Vec<Pattern>,
        rest: Option<Box<Pattern>>,
    },

    /// `Point (x, y)`
    Constructor { tag: Ident, inner: Box<Pattern> },
}

/// A field of a tuple pattern; named fields are resolved by name.
#[derive(Debug, Clone)]
pub struct PatternField {
    pub name: Option<Ident>,
    pub pattern: Pattern,
}
