//! Parser for Rill.
//!
//! This crate provides a recursive descent parser that converts tokens into
//! the raw parse tree ([`RawNode`]). The AST is built from it by
//! [`rill_syntax::transform`]; [`parse_program`] runs both steps.
//!
//! ## Ambiguity
//!
//! Patterns and expressions share most of their surface syntax, so `(a, b)`
//! may start an assignment, a function or a tuple. The parser tries the
//! pattern reading first and backtracks to a checkpoint when the token after
//! it is not `=` or `=>`.
//!
//! ## Error Recovery
//!
//! After an error the parser skips to the next statement boundary, allowing
//! multiple errors to be reported in a single parse pass.

mod parser;
mod recovery;

pub use parser::Parser;

use rill_diagnostic::Diagnostic;
use rill_lexer::Lexer;
use rill_syntax::{Program, RawNode};

/// Parse source code into a raw tree. `None` means the program has no
/// statements.
pub fn parse(source: &str) -> (Option<RawNode>, Vec<Diagnostic>) {
    let (tokens, mut diagnostics) = Lexer::new(source).tokenize();

    let mut parser = Parser::new(tokens);
    let tree = parser.parse_program();

    diagnostics.extend(parser.diagnostics());
    (tree, diagnostics)
}

/// Parse and transform source code into an AST.
///
/// Returns `Ok(None)` for an empty program and every error diagnostic on
/// failure.
pub fn parse_program(source: &str) -> Result<Option<Program>, Vec<Diagnostic>> {
    let (tree, diagnostics) = parse(source);
    if diagnostics.iter().any(Diagnostic::is_error) {
        return Err(diagnostics);
    }
    match tree {
        None => Ok(None),
        Some(tree) => rill_syntax::transform(&tree).map(Some).map_err(|d| vec![d]),
    }
}
