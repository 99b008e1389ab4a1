//! Host entry point.
//! 宿主入口。

use crate::builtin::builtins;
use crate::config::InterpreterConfig;
use crate::context::{CancelToken, Context, Runtime};
use crate::env::{Binder, Environment, GlobalScope, Key};
use crate::error::{EvalError, Result};
use crate::eval::run_program;
use crate::stream::materialize;
use crate::value::{Dict, Value};
use async_recursion::async_recursion;
use futures::stream::{StreamExt, TryStreamExt};
use rill_diagnostic::Diagnostic;
use std::future::Future;
use std::rc::Rc;
use thiserror::Error;

/// Failure of [`Interpreter::interpret`].
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("{} syntax error(s)", .0.len())]
    Syntax(Vec<Diagnostic>),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// An interpreter session: one global scope, one configuration, one
/// cancellation token.
pub struct Interpreter {
    global: Rc<GlobalScope>,
    runtime: Rc<Runtime>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        let global = GlobalScope::new();
        global.bind(builtins().into_iter().map(|(name, value)| (Key::name(name), value)).collect());
        Self {
            global,
            runtime: Rc::new(Runtime {
                config,
                cancel: CancelToken::new(),
            }),
        }
    }

    /// Bind a global.
    pub fn define(&self, name: &str, value: Value) {
        self.global.bind(vec![(Key::name(name), value)]);
    }

    /// Bind several globals at once.
    pub fn define_all<'a>(&self, values: impl IntoIterator<Item = (&'a str, Value)>) {
        self.global.bind(values.into_iter().map(|(name, value)| (Key::name(name), value)).collect());
    }

    /// Bind a host function.
    pub fn define_host<F, Fut>(&self, name: &str, func: F)
    where
        F: Fn(Value, Context) -> Fut + 'static,
        Fut: Future<Output = Result<Value>> + 'static,
    {
        self.define(name, Value::host(name, func));
    }

    /// Look up a global.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        Environment::global(self.global.clone()).get(name)
    }

    /// A context for top-level code.
    pub fn context(&self) -> Context {
        Context::new(
            Environment::global(self.global.clone()),
            Binder::Global(self.global.clone()),
            self.runtime.clone(),
        )
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.runtime.config
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.runtime.cancel.clone()
    }

    /// Parse and run `source`. Returns the value of the last statement, or
    /// `None` when the program has no statements.
    /// 解析并执行源码。
    pub async fn interpret(&self, source: &str) -> Result<Option<Value>, InterpretError> {
        self.interpret_with(source, Vec::new()).await
    }

    /// Like [`interpret`](Self::interpret), with extra globals bound first.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
    pub async fn interpret_with(
        &self,
        source: &str,
        overrides: Vec<(String, Value)>,
    ) -> Result<Option<Value>, InterpretError> {
        if !overrides.is_empty() {
            self.global
                .bind(overrides.into_iter().map(|(name, value)| (Key::name(&name), value)).collect());
        }
        let Some(program) = rill_parser::parse_program(source).map_err(InterpretError::Syntax)? else {
            return Ok(None);
        };
        tracing::debug!(statements = program.statements.len(), "running program");
        Ok(run_program(&program, &self.context()).await?)
    }

    /// Render a value for display, forcing any streams inside it (up to the
    /// configured display limit).
    pub async fn display(&self, value: &Value) -> Result<String> {
        let settled = settle(value, &self.context(), self.runtime.config.display_limit).await?;
        Ok(settled.inspect())
    }
}

/// Replace every stream inside `value` by its materialized container,
/// pulling at most `limit` elements from each.
#[async_recursion(?Send)]
pub async fn settle(value: &Value, ctx: &Context, limit: usize) -> Result<Value> {
    match value {
        Value::Stream(stream) => {
            let items: Vec<Value> = stream.open().take(limit).try_collect().await?;
            let mut settled = Vec::with_capacity(items.len());
            for item in &items {
                settled.push(settle(item, ctx, limit).await?);
            }
            materialize(settled, stream.container())
        }
        Value::Array(items) => {
            let mut settled = Vec::with_capacity(items.len());
            for item in items.iter() {
                settled.push(settle(item, ctx, limit).await?);
            }
            Ok(Value::array(settled))
        }
        Value::Tuple(t) if !t.is_empty() => {
            let mut settled = Vec::with_capacity(t.len());
            for field in t.fields() {
                settled.push(settle(field, ctx, limit).await?);
            }
            Ok(Value::Tuple(t.with_fields(settled)))
        }
        Value::Dict(d) => {
            let mut settled = Dict::new();
            for (key, value) in d.entries() {
                settled.insert(key.clone(), settle(value, ctx, limit).await?);
            }
            Ok(Value::Dict(Rc::new(settled)))
        }
        other => Ok(other.clone()),
    }
}

/// Parse and run `source` in a block scope nested in `ctx`, so it sees the
/// caller's bindings without adding to them.
pub async fn run_source(source: &str, ctx: &Context) -> Result<Option<Value>> {
    let program = match rill_parser::parse_program(source) {
        Ok(Some(program)) => program,
        Ok(None) => return Ok(None),
        Err(diagnostics) => {
            let first = diagnostics.first().map(|d| d.message.clone()).unwrap_or_default();
            return Err(EvalError::Syntax(match diagnostics.len() {
                0 | 1 => first,
                n => format!("{first} (and {} more)", n - 1),
            }));
        }
    };
    let scope = ctx.scoped(Binder::block(ctx.env.clone()));
    run_program(&program, &scope).await
}

/// Run `future` on a current-thread runtime inside a local task set, which
/// `spawn` requires.
pub fn run_local<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let local = tokio::task::LocalSet::new();
    Ok(local.block_on(&runtime, future))
}
