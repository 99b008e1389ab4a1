//! CLI command implementations.

pub mod check;
pub mod eval;
pub mod repl;
pub mod run;

use crate::output;
use rill_diagnostic::emit;
use rill_eval::{InterpretError, Interpreter, InterpreterConfig, run_local};
use std::path::{Path, PathBuf};

/// Options shared by every command.
pub struct Session {
    pub base_path: Option<PathBuf>,
    pub offline: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl Session {
    /// An interpreter with the standard library installed. Relative paths
    /// resolve against `--base-path`, else `default_base`.
    pub fn interpreter(&self, default_base: &Path) -> Interpreter {
        let base = self.base_path.clone().unwrap_or_else(|| default_base.to_path_buf());
        let config = InterpreterConfig::new().base_path(base).allow_network(!self.offline);
        let interpreter = Interpreter::with_config(config);
        rill_std::install(&interpreter);
        interpreter
    }
}

/// Interpret `source` and return the display form of its result, if it has
/// one worth showing. Ctrl-C cancels the evaluation.
pub fn execute(interpreter: &Interpreter, source: &str, filename: &str) -> Result<Option<String>, String> {
    let cancel = interpreter.cancel_token();
    cancel.reset();

    let outcome = run_local(async {
        let watcher = tokio::task::spawn_local({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            }
        });
        let result = match interpreter.interpret(source).await {
            Ok(Some(value)) if !value.is_empty_tuple() => {
                interpreter.display(&value).await.map(Some).map_err(InterpretError::from)
            }
            Ok(_) => Ok(None),
            Err(error) => Err(error),
        };
        watcher.abort();
        result
    })
    .map_err(|e| format!("cannot start runtime: {e}"))?;

    outcome.map_err(|error| report(source, filename, &error))
}

/// Print an interpretation error and return the summary for the caller.
pub fn report(source: &str, filename: &str, error: &InterpretError) -> String {
    match error {
        InterpretError::Syntax(diagnostics) => {
            for diagnostic in diagnostics {
                if let Err(e) = emit(source, filename, diagnostic) {
                    output::error(&format!("cannot render diagnostic: {e}"));
                }
            }
            "parse error".to_string()
        }
        InterpretError::Eval(error) => {
            output::eval_error(error);
            "evaluation error".to_string()
        }
    }
}
