//! Evaluation context and cancellation.

use crate::config::InterpreterConfig;
use crate::env::{Binder, Environment};
use crate::error::{EvalError, Result};
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::Notify;

/// Shared by every context of one interpreter session.
#[derive(Debug)]
pub struct Runtime {
    pub config: InterpreterConfig,
    pub cancel: CancelToken,
}

/// Cooperative cancellation flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Rc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Cell<bool>,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every task waiting in [`cancelled`](Self::cancelled).
    pub fn cancel(&self) {
        self.inner.cancelled.set(true);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Clear a previous cancellation so the session can be reused.
    pub fn reset(&self) {
        self.inner.cancelled.set(false);
    }

    /// `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(EvalError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when cancellation is requested.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Everything an expression needs to evaluate: where names resolve, where
/// statements bind, and the session runtime.
#[derive(Clone)]
pub struct Context {
    pub env: Environment,
    pub binder: Binder,
    pub runtime: Rc<Runtime>,
}

impl Context {
    pub fn new(env: Environment, binder: Binder, runtime: Rc<Runtime>) -> Self {
        Self { env, binder, runtime }
    }

    /// Same binder and runtime, different lexical environment.
    pub fn with_env(&self, env: Environment) -> Context {
        Context {
            env,
            binder: self.binder.clone(),
            runtime: self.runtime.clone(),
        }
    }

    /// A context that binds through `binder` and sees its current scope.
    pub fn scoped(&self, binder: Binder) -> Context {
        Context {
            env: binder.environment(),
            binder,
            runtime: self.runtime.clone(),
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.runtime.config
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.runtime.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(token.check().is_ok());
        clone.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(EvalError::Cancelled));
        token.reset();
        assert!(clone.check().is_ok());
    }

    #[tokio::test]
    async fn cancelled_wakes_waiter() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let (_, ()) = tokio::join!(waiter.cancelled(), async { token.cancel() });
        assert!(waiter.is_cancelled());
    }
}
