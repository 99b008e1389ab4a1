//! Syntax trees for Rill.
//!
//! The parser produces a loosely-typed [`RawNode`] tree; [`transform`]
//! validates it and builds the immutable AST ([`Program`], [`Expr`],
//! [`Pattern`]) that the evaluator walks.

mod ast;
mod expr;
mod pattern;
mod raw;
mod transform;

pub use ast::*;
pub use expr::*;
pub use pattern::*;
pub use raw::{RawKind, RawNode};
pub use transform::transform;
