//! Output formatting utilities.
//! 输出格式化工具。
//!
//! These functions provide colored terminal output for the CLI.
//! 这些函数为 CLI 提供彩色终端输出。

use rill_eval::EvalError;

/// Print a result value in green.
/// 以绿色打印结果值。
pub fn success(msg: &str) {
    println!("\x1b[32m{msg}\x1b[0m");
}

/// Print an error message in red.
/// 以红色打印错误消息。
pub fn error(msg: &str) {
    eprintln!("\x1b[31merror:\x1b[0m {msg}");
}

/// Print an info message in blue.
/// 以蓝色打印信息消息。
pub fn info(msg: &str) {
    println!("\x1b[34minfo:\x1b[0m {msg}");
}

/// Print a runtime error with its code and the code's hint.
/// 打印运行时错误及其错误码和提示。
pub fn eval_error(error: &EvalError) {
    let code = error.code();
    eprintln!("\x1b[31merror[{}]:\x1b[0m {error}", code.as_str());
    if let Some(hint) = code.suggestion() {
        eprintln!("  \x1b[36mhelp:\x1b[0m {hint}");
    }
}
