//! Standard library for Rill.
//! Rill 标准库。
//!
//! Host functions that reach outside the evaluator: console output, timers,
//! the file system, HTTP, JSON and dynamic imports.
//! 访问求值器外部的宿主函数：控制台输出、计时器、文件系统、HTTP、JSON 与动态导入。

mod error;
mod import;
mod io;
mod json;
mod net;

pub use error::HostError;
pub use json::from_json;

use rill_eval::{Interpreter, Value};

/// Initialize the standard library and return all built-in bindings.
/// 初始化标准库并返回所有内置绑定。
pub fn stdlib() -> Vec<(&'static str, Value)> {
    let mut bindings = Vec::new();
    bindings.extend(io::builtins());
    bindings.extend(net::builtins());
    bindings.extend(json::builtins());
    bindings.extend(import::builtins());
    bindings
}

/// Bind the standard library into an interpreter's global scope.
pub fn install(interpreter: &Interpreter) {
    interpreter.define_all(stdlib());
}

/// The string argument of a host function.
fn string_arg<'a>(function: &str, arg: &'a Value) -> Result<&'a str, rill_eval::EvalError> {
    arg.as_str().ok_or_else(|| rill_eval::EvalError::TypeMismatch {
        expected: format!("a String argument to `{function}`"),
        found: arg.inspect(),
        type_name: arg.type_name(),
    })
}
