//! Integration tests for the lazy sequence operations.

use rill_eval::{EvalError, InterpretError, Interpreter, Value, run_local};
use std::cell::Cell;
use std::rc::Rc;

fn show(interpreter: &Interpreter, source: &str) -> Result<String, InterpretError> {
    run_local(async {
        let value = interpreter.interpret(source).await?.unwrap_or_else(Value::empty);
        Ok::<_, InterpretError>(interpreter.display(&value).await?)
    })
    .expect("runtime")
}

fn eval(source: &str) -> String {
    match show(&Interpreter::new(), source) {
        Ok(shown) => shown,
        Err(error) => panic!("evaluating {source:?} failed: {error}"),
    }
}

/// An interpreter with a `tick` host function that counts its calls and
/// returns its argument.
fn counting_interpreter() -> (Interpreter, Rc<Cell<usize>>) {
    let ticks = Rc::new(Cell::new(0));
    let interpreter = Interpreter::new();
    let counter = ticks.clone();
    interpreter.define_host("tick", move |value, _| {
        counter.set(counter.get() + 1);
        async move { Ok::<_, EvalError>(value) }
    });
    (interpreter, ticks)
}

#[test]
fn test_range_take_map() {
    assert_eq!(eval("1..5 | take 3 | map (n) => n * n"), "[1, 4, 9]");
}

#[test]
fn test_chained_maps_stay_lazy() {
    let (interpreter, ticks) = counting_interpreter();
    let source = "1..1000000 | map tick | map ((n) => n + 1) | map ((n) => n * 2) | take 3 | toArray";
    assert_eq!(show(&interpreter, source).unwrap(), "[4, 6, 8]");
    assert!(ticks.get() <= 4, "pulled {} source elements", ticks.get());
}

#[test]
fn test_building_a_pipeline_pulls_nothing() {
    let (interpreter, ticks) = counting_interpreter();
    run_local(interpreter.interpret("xs = 1..10 | map tick | filter (n) => n > 2")).unwrap().unwrap();
    assert_eq!(ticks.get(), 0);
}

#[test]
fn test_reduce_seeding() {
    assert_eq!(eval("1..5 | reduce (a, n) => a * n"), "120");
    assert_eq!(eval("1..5 | reduce (a = 1, n) => a * n"), "120");
    assert_eq!(eval("[] | reduce (a = 1, n) => a * n"), "1");
    assert_eq!(eval("[] | reduce (a, n) => a * n"), "()");
    // With a seed every element goes through the reducer.
    assert_eq!(eval("[5] | reduce (a = 0, n) => a + n * 10"), "50");
    assert_eq!(eval("[5] | reduce (a, n) => a + n * 10"), "5");
}

#[test]
fn test_split_on() {
    assert_eq!(eval("1..10 | splitOn 3"), "[[1, 2], [4, 5, 6, 7, 8, 9, 10]]");
    assert_eq!(eval("[1, 2, 3] | splitOn 3"), "[[1, 2], []]");
    assert_eq!(eval("[3, 3] | splitOn 3"), "[[], [], []]");
}

#[test]
fn test_split_at() {
    assert_eq!(eval("1..3 | splitAt 1"), "[[1], [2, 3]]");
    assert_eq!(eval("1..3 | splitAt 0"), "[[], [1, 2, 3]]");
}

#[test]
fn test_split_every() {
    assert_eq!(eval("1..3 | splitEvery 2"), "[[1, 2], [3]]");
    assert_eq!(eval("\"abcde\" | splitEvery 2"), r#"["ab", "cd", "e"]"#);
}

#[test]
fn test_take_skip_repeat() {
    assert_eq!(eval("1..10 | skip 7"), "[8, 9, 10]");
    assert_eq!(eval("[1, 2] | repeat | take 5"), "[1, 2, 1, 2, 1]");
    assert_eq!(eval("[] | repeat | take 5"), "[]");
    assert_eq!(eval("\"hello\" | take 3"), r#""hel""#);
}

#[test]
fn test_filter_and_flat_map() {
    assert_eq!(eval("1..10 | filter (n) => n % 2 == 0"), "[2, 4, 6, 8, 10]");
    assert_eq!(eval("[1, 2] | flatMap (n) => [n, n * 10]"), "[1, 10, 2, 20]");
    assert_eq!(eval("[1, 2] | flatMap (n) => n + 1"), "[2, 3]");
}

#[test]
fn test_searches() {
    assert_eq!(eval("1..10 | count (n) => n > 7"), "3");
    assert_eq!(eval("[1, 2, 3] | count"), "3");
    assert_eq!(eval("1..10 | some (n) => n > 9"), "true");
    assert_eq!(eval("1..10 | every (n) => n > 1"), "false");
    assert_eq!(eval("1..10 | find (n) => n > 3"), "4");
    assert_eq!(eval("1..10 | find (n) => n > 30"), "()");
    assert_eq!(eval("1..10 | includes 5"), "true");
    assert_eq!(eval(r#"["a"] | includes "b""#), "false");
}

#[test]
fn test_searches_stop_early() {
    let (interpreter, ticks) = counting_interpreter();
    assert_eq!(show(&interpreter, "1..1000000 | map tick | some (n) => n == 3").unwrap(), "true");
    assert_eq!(ticks.get(), 3);
}

#[test]
fn test_includes_uses_equality_dispatch() {
    assert_eq!(eval("[(1, 2), (3, 4)] | includes (3, 4)"), "true");
}

#[test]
fn test_join_delegates_to_combine() {
    assert_eq!(eval(r#"["a", "b", "c"] | join ", ""#), r#""a, b, c""#);
    assert_eq!(eval("1..3 | map ((n) => n * 2) | join \"-\""), r#""2-4-6""#);
}

#[test]
fn test_combos_and_zip() {
    assert_eq!(eval("[1, 2, 3] | combos"), "[(1, 2), (1, 3), (2, 3)]");
    assert_eq!(eval("1..5 | filter ((n) => n > 2) | combos"), "[(3, 4), (3, 5), (4, 5)]");
    assert_eq!(eval("[1, 2, 3] | zip \"ab\""), r#"[(1, "a"), (2, "b")]"#);
}

#[test]
fn test_strings_map_back_to_strings() {
    assert_eq!(eval("\"abc\" | map (c) => c | upper"), r#""ABC""#);
    assert_eq!(eval("\"a,b\" | splitOn \",\""), r#"["a", "b"]"#);
}

#[test]
fn test_conversions_force_streams() {
    assert_eq!(eval("Array (1..3 | map (n) => n * 2)"), "[2, 4, 6]");
    assert_eq!(eval("1..3 | map ((n) => n) | toArray | size"), "3");
}

#[test]
fn test_string_ranges_step_the_last_character() {
    assert_eq!(eval(r#""x".."z" | toArray"#), r#"["x", "y", "z"]"#);
    assert_eq!(eval(r#""ax".."az" | toArray"#), r#"["ax", "ay", "az"]"#);
    assert_eq!(eval(r#""z" | succ"#), r#""{""#);
}
