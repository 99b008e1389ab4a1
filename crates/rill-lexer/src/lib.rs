//! Lexical analysis for Rill.
//! Rill 词法分析模块。
//!
//! This crate provides the lexer that converts source code into tokens.
//! Line breaks are significant as statement separators, except where a line
//! obviously continues the previous one.
//! 本 crate 提供词法分析器，将源代码转换为 token 序列。换行符作为语句分隔符，
//! 但明显延续上一行的情况除外。

mod lexer;
mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

/// Tokenize `source`, returning tokens (always ending in `Eof`) and diagnostics.
/// 对 `source` 进行词法分析。
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<rill_diagnostic::Diagnostic>) {
    Lexer::new(source).tokenize()
}
