//! Coroutines: a rendezvous between `send` and `yield`.
//! 协程：`send` 与 `yield` 之间的会合。
//!
//! Each coroutine keeps two queues: readers waiting in `yield` for a value,
//! and writes waiting in `send` for a reader. At most one of them is
//! non-empty at any time. Queue operations never await in between, so the
//! single-threaded scheduler cannot observe a half-updated state.

use crate::context::Context;
use crate::error::{EvalError, Result};
use crate::eval::apply;
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use tokio::sync::oneshot;

/// A value in flight from `send` to `yield`, with the channel the result of
/// the yield's function goes back through.
struct Delivery {
    value: Value,
    reply: oneshot::Sender<Result<Value>>,
}

#[derive(Default)]
pub struct Coroutine {
    readers: RefCell<VecDeque<oneshot::Sender<Delivery>>>,
    writes: RefCell<VecDeque<Delivery>>,
    finished: Cell<bool>,
    failure: RefCell<Option<EvalError>>,
}

impl Coroutine {
    pub fn new() -> Rc<Coroutine> {
        Rc::new(Coroutine::default())
    }

    /// Deliver `value` to the coroutine and wait for its reply.
    pub async fn send(&self, value: Value) -> Result<Value> {
        if self.finished.get() {
            return Err(self.closed());
        }
        let (reply, response) = oneshot::channel();
        let mut delivery = Delivery { value, reply };
        loop {
            let reader = self.readers.borrow_mut().pop_front();
            match reader {
                Some(reader) => match reader.send(delivery) {
                    Ok(()) => break,
                    // The reader went away; try the next one.
                    Err(returned) => delivery = returned,
                },
                None => {
                    self.writes.borrow_mut().push_back(delivery);
                    break;
                }
            }
        }
        self.check_queues();
        response.await.unwrap_or_else(|_| Err(self.closed()))
    }

    /// Wait for the next sent value, apply `f` to it, reply with the result
    /// and return it.
    pub async fn yield_with(&self, f: &Value, ctx: &Context) -> Result<Value> {
        let Delivery { value, reply } = self.receive().await?;
        let result = apply(f, value, ctx).await;
        // The sender may have been dropped; the result is still ours.
        let _ = reply.send(result.clone());
        result
    }

    async fn receive(&self) -> Result<Delivery> {
        let pending = self.writes.borrow_mut().pop_front();
        if let Some(delivery) = pending {
            return Ok(delivery);
        }
        let (reader, delivery) = oneshot::channel();
        self.readers.borrow_mut().push_back(reader);
        self.check_queues();
        delivery.await.map_err(|_| EvalError::CoroutineClosed)
    }

    /// Called when the coroutine body returns: pending and later sends fail,
    /// with the body's error if it raised one.
    pub fn finish(&self, outcome: Result<Value>) {
        if let Err(error) = outcome {
            *self.failure.borrow_mut() = Some(error);
        }
        self.finished.set(true);
        self.writes.borrow_mut().clear();
        self.readers.borrow_mut().clear();
    }

    /// The error a send gets once the coroutine has finished.
    fn closed(&self) -> EvalError {
        self.failure.borrow().clone().unwrap_or(EvalError::CoroutineClosed)
    }

    fn check_queues(&self) {
        debug_assert!(
            self.readers.borrow().is_empty() || self.writes.borrow().is_empty(),
            "coroutine has both waiting readers and waiting writes"
        );
    }
}
