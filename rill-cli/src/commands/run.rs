//! The `rill run` command.

use super::{Session, execute};
use std::fs;
use std::path::Path;

pub fn run(file: &Path, session: &Session) -> Result<(), String> {
    let source = fs::read_to_string(file).map_err(|e| format!("cannot read file '{}': {}", file.display(), e))?;

    // Imports resolve next to the script unless --base-path says otherwise.
    let parent = file.parent().unwrap_or(Path::new("."));
    let interpreter = session.interpreter(parent);

    tracing::debug!(file = %file.display(), "running script");
    if let Some(shown) = execute(&interpreter, &source, &file.display().to_string())? {
        if !session.quiet {
            println!("{shown}");
        }
    }
    Ok(())
}
