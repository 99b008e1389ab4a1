//! The `rill check` command.

use super::Session;
use crate::output;
use rill_diagnostic::emit;
use std::fs;
use std::path::Path;

pub fn run(file: &Path, session: &Session) -> Result<(), String> {
    let source = fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file.display(), e))?;
    let filename = file.display().to_string();

    match rill_parser::parse_program(&source) {
        Ok(program) => {
            if !session.quiet {
                let count = program.map_or(0, |p| p.statements.len());
                output::success(&format!("{filename}: {count} statement(s), no syntax errors"));
            }
            Ok(())
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                emit(&source, &filename, diagnostic).map_err(|e| e.to_string())?;
            }
            Err(format!("{} syntax error(s)", diagnostics.len()))
        }
    }
}
