//! Asynchronous tree-walking evaluator for Rill.
//!
//! Evaluation runs on a single-threaded tokio runtime inside a
//! [`tokio::task::LocalSet`]; see [`run_local`]. Every node is evaluated by
//! [`evaluate`] against a [`Context`], which carries the lexical
//! [`Environment`], the [`Binder`] that statements use to add bindings, and
//! the shared [`Runtime`] (configuration and cancellation).
//!
//! Method calls and operators share one dispatch path, [`invoke`]: block
//! scoped extensions first, then the built-in table of the receiver's type,
//! then the lazy sequence operations for iterable values.

mod builtin;
mod config;
mod context;
mod coroutine;
mod env;
mod error;
mod eval;
mod interpreter;
mod methods;
mod pattern;
mod stream;
mod value;

pub use builtin::builtins;
pub use config::InterpreterConfig;
pub use context::{CancelToken, Context, Runtime};
pub use coroutine::Coroutine;
pub use env::{Binder, Bindings, Environment, Extensions, GlobalScope, Key};
pub use error::{EvalError, Result};
pub use eval::{apply, evaluate, execute, invoke, run_program};
pub use methods::equals;
pub use interpreter::{InterpretError, Interpreter, run_local, run_source, settle};
pub use pattern::{match_pattern, test_pattern};
pub use stream::{Container, Stream, ValueStream, iterate, materialize};
pub use value::{
    Builtin, ContextCell, Dict, FieldSpec, Function, HostFuture, RangeValue, Str, StructType, Tuple,
    TypeRef, TypeTag, Value, format_number,
};
