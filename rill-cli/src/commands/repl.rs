//! The `rill repl` command.

use super::{Session, execute};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub fn run(session: &Session) -> Result<(), String> {
    println!("Rill REPL v{}", env!("CARGO_PKG_VERSION"));
    println!("Type :help for help, :quit to exit");
    println!();

    let mut rl = DefaultEditor::new().map_err(|e| e.to_string())?;

    // One interpreter for the whole session, so bindings persist between lines.
    let cwd = std::env::current_dir().map_err(|e| format!("cannot read current directory: {e}"))?;
    let interpreter = session.interpreter(&cwd);

    loop {
        match rl.readline("rill> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if line.starts_with(':') {
                    match line {
                        ":quit" | ":q" => break,
                        ":help" | ":h" => {
                            println!("Commands:");
                            println!("  :help, :h    Show this help");
                            println!("  :quit, :q    Exit the REPL");
                            println!("Enter statements separated by `;`. Ctrl-C cancels a running evaluation.");
                        }
                        _ => println!("Unknown command: {line}"),
                    }
                    continue;
                }

                // Errors were already reported; keep the session going.
                if let Ok(Some(shown)) = execute(&interpreter, line, "<repl>") {
                    println!("{shown}");
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
