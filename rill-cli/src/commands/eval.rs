//! The `rill eval` command.

use super::{Session, execute};
use crate::output;

pub fn run(expr: &str, session: &Session) -> Result<(), String> {
    let cwd = std::env::current_dir().map_err(|e| format!("cannot read current directory: {e}"))?;
    let interpreter = session.interpreter(&cwd);

    if session.verbose {
        output::info(&format!("evaluating {} bytes", expr.len()));
    }

    if let Some(shown) = execute(&interpreter, expr, "<eval>")? {
        if !session.quiet {
            output::success(&shown);
        }
    }
    Ok(())
}
