//! Integration tests for the rill-std host functions.

use rill_eval::{EvalError, InterpretError, Interpreter, InterpreterConfig, Value, run_local};
use std::fs;
use tempfile::TempDir;

fn interpreter_in(dir: &TempDir) -> Interpreter {
    let config = InterpreterConfig::new().base_path(dir.path()).allow_network(false);
    let interpreter = Interpreter::with_config(config);
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
fn test_stdlib_bindings_are_installed() {
    let interpreter = Interpreter::new();
    rill_std::install(&interpreter);
    for name in ["print", "sleep", "readFile", "fetch", "json", "import"] {
        assert!(interpreter.lookup(name).is_some(), "missing `{name}`");
    }
}

#[test]
fn test_json_decoding() {
    let dir = TempDir::new().unwrap();
    let interpreter = interpreter_in(&dir);
    assert_eq!(
        show(&interpreter, r#"json "{\"a\": [1, true, null]}""#).unwrap(),
        r#"#{"a": [1, true, ()]}"#
    );
    assert!(matches!(
        show(&interpreter, r#"json "{""#),
        Err(InterpretError::Eval(EvalError::Host(message))) if message.starts_with("invalid JSON")
    ));
}

#[test]
fn test_read_file_resolves_against_base_path() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("greeting.txt"), "hello").unwrap();
    let interpreter = interpreter_in(&dir);
    assert_eq!(show(&interpreter, r#"readFile "greeting.txt" | upper"#).unwrap(), r#""HELLO""#);
    assert!(matches!(
        show(&interpreter, r#"readFile "missing.txt""#),
        Err(InterpretError::Eval(EvalError::Host(_)))
    ));
}

#[test]
fn test_json_import_reexports_members() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.json"), r#"{"name": "rill", "size": 3}"#).unwrap();
    let interpreter = interpreter_in(&dir);
    assert_eq!(
        show(&interpreter, "cfg = import \"config.json\"\n(cfg.name, cfg.size + 1)").unwrap(),
        r#"("rill", 4)"#
    );
    assert_eq!(
        show(&interpreter, "(name: n) = import \"config.json\"\nn").unwrap(),
        r#""rill""#
    );
}

#[test]
fn test_source_import_sees_the_importer() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("lib.rill"), "helper = n => n * factor\n(triple: helper 3, name: \"lib\")").unwrap();
    let interpreter = interpreter_in(&dir);
    assert_eq!(
        show(&interpreter, "factor = 3\nlib = import \"lib.rill\"\n(lib.triple, lib.name)").unwrap(),
        r#"(9, "lib")"#
    );
    // Bindings made by the imported source stay inside it.
    assert!(interpreter.lookup("helper").is_none());
}

#[test]
fn test_import_reports_syntax_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.rill"), "x = (1, ").unwrap();
    let interpreter = interpreter_in(&dir);
    assert!(matches!(
        show(&interpreter, "import \"broken.rill\""),
        Err(InterpretError::Eval(EvalError::Syntax(_)))
    ));
}

#[test]
fn test_offline_fetch_is_refused() {
    let dir = TempDir::new().unwrap();
    let interpreter = interpreter_in(&dir);
    match show(&interpreter, r#"fetch "https://example.com""#) {
        Err(InterpretError::Eval(EvalError::Host(message))) => {
            assert_eq!(message, "network access is disabled");
        }
        other => panic!("expected a host error, got {other:?}"),
    }
}

#[test]
fn test_print_returns_empty() {
    let dir = TempDir::new().unwrap();
    let interpreter = interpreter_in(&dir);
    assert_eq!(show(&interpreter, "print (1..3 | map (n) => n * 2)").unwrap(), "()");
}

#[test]
fn test_sleep_rejects_negative_durations() {
    let dir = TempDir::new().unwrap();
    let interpreter = interpreter_in(&dir);
    assert!(matches!(
        show(&interpreter, "sleep (-1)"),
        Err(InterpretError::Eval(EvalError::TypeMismatch { .. }))
    ));
}
