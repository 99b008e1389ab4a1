//! Integration tests for coroutines, concurrent evaluation and cancellation.

use rill_eval::{EvalError, InterpretError, Interpreter, Value, run_local};
use std::time::{Duration, Instant};

fn interpreter() -> Interpreter {
    let interpreter = Interpreter::new();
    rill_std::install(&interpreter);
    interpreter
}

fn show(interpreter: &Interpreter, source: &str) -> Result<String, InterpretError> {
    run_local(async {
        let value = interpreter.interpret(source).await?.unwrap_or_else(Value::empty);
        Ok::<_, InterpretError>(interpreter.display(&value).await?)
    })
    .expect("runtime")
}

#[test]
fn test_coroutine_handshake() {
    let source = "c = spawn (co) => { co | yield (x) => x * 2; co | yield (x) => x * 2 }\n(c | send 1, c | send 2)";
    assert_eq!(show(&interpreter(), source).unwrap(), "(2, 4)");
}

#[test]
fn test_sends_are_delivered_in_order() {
    let source = "c = spawn (co) => let (i = 0) => loop (co | yield (x) => x + i)\n(c | send 1, c | send 2, c | send 3)";
    assert_eq!(show(&interpreter(), source).unwrap(), "(1, 3, 6)");
}

#[test]
fn test_send_to_finished_coroutine_fails() {
    let result = show(&interpreter(), "c = spawn (co) => 1\nc | send 1");
    assert!(matches!(result, Err(InterpretError::Eval(EvalError::CoroutineClosed))));
}

#[test]
fn test_send_reports_coroutine_failure() {
    let interpreter = interpreter();
    let result = show(&interpreter, "c = spawn (co) => undefinedThing + 1\nc | send 1");
    match result {
        Err(InterpretError::Eval(EvalError::UnboundIdentifier { name })) => assert_eq!(name, "undefinedThing"),
        other => panic!("expected the coroutine's error, got {other:?}"),
    }

    // Later sends see the same error.
    let again = show(&interpreter, "c | send 2");
    assert!(matches!(again, Err(InterpretError::Eval(EvalError::UnboundIdentifier { .. }))));
}

#[test]
fn test_tuple_fields_run_concurrently() {
    let interpreter = interpreter();
    let started = Instant::now();
    assert_eq!(show(&interpreter, "(sleep 150, sleep 150, 3)").unwrap(), "((), (), 3)");
    assert!(started.elapsed() < Duration::from_millis(400), "took {:?}", started.elapsed());
}

#[test]
fn test_cancel_aborts_sleep() {
    let interpreter = interpreter();
    let token = interpreter.cancel_token();
    let started = Instant::now();
    let result = run_local(async {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        interpreter.interpret("sleep 10000").await
    })
    .unwrap();
    assert!(matches!(result, Err(InterpretError::Eval(EvalError::Cancelled))));
    assert!(started.elapsed() < Duration::from_secs(5));

    interpreter.cancel_token().reset();
    assert_eq!(show(&interpreter, "1 + 1").unwrap(), "2");
}

#[test]
fn test_cancel_interrupts_long_loops() {
    let interpreter = interpreter();
    let token = interpreter.cancel_token();
    let result = run_local(async {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            token.cancel();
        });
        interpreter
            .interpret("let (n = 0) => if n < 2000000 then loop (n + 1) else n")
            .await
    })
    .unwrap();
    assert!(matches!(result, Err(InterpretError::Eval(EvalError::Cancelled))));
}

#[test]
fn test_cancelled_session_refuses_work() {
    let interpreter = interpreter();
    interpreter.cancel_token().cancel();
    assert!(matches!(
        show(&interpreter, "1 + 1"),
        Err(InterpretError::Eval(EvalError::Cancelled))
    ));
}
