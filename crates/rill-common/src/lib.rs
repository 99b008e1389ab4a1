//! Common data structures for Rill.
//!
//! This crate provides the source location types used by the lexer, parser,
//! AST and diagnostics:
//! - `BytePos`: a byte offset into source text
//! - `Span`: a half-open byte range

mod span;

pub use span::{BytePos, Span};
