//! Integration tests for the rill-eval crate.
//!
//! Programs are run through the public `Interpreter` surface and checked by
//! their display form or by the error they raise.

use rill_eval::{EvalError, InterpretError, Interpreter, Tuple, Value, run_local};
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

fn eval_err(source: &str) -> EvalError {
    match show(&Interpreter::new(), source) {
        Err(InterpretError::Eval(error)) => error,
        other => panic!("expected an evaluation error from {source:?}, got {other:?}"),
    }
}

// ============================================================================
// 基本值与运算符
// ============================================================================

#[test]
fn test_number_arithmetic() {
    assert_eq!(eval("1 + 2 * 3 - 4"), "3");
    assert_eq!(eval("10 % 3"), "1");
    assert_eq!(eval("7 / 2"), "3.5");
}

#[test]
fn test_string_concatenation_and_methods() {
    assert_eq!(eval(r#""ab" + "cd""#), r#""abcd""#);
    assert_eq!(eval(r#""hello" | upper"#), r#""HELLO""#);
    assert_eq!(eval(r#""hello" | size"#), "5");
}

#[test]
fn test_numeric_operator_rejects_non_number() {
    match eval_err(r#"1 + "a""#) {
        EvalError::OperandType { op, value, type_name } => {
            assert_eq!(op, "+");
            assert_eq!(value, r#""a""#);
            assert_eq!(type_name, "String");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(eval_err("2 < true"), EvalError::OperandType { op, .. } if op == "<"));
}

#[test]
fn test_tuple_equality() {
    assert_eq!(eval("(1, 2, 3) == (1, 2, 3)"), "true");
    assert_eq!(eval("(1, 2) == (1, 2, 3)"), "false");
    assert_eq!(eval("() == ()"), "true");
}

#[test]
fn test_empty_tuple_is_a_singleton() {
    let interpreter = Interpreter::new();
    let value = run_local(interpreter.interpret("()")).unwrap().unwrap().unwrap();
    let Value::Tuple(tuple) = value else {
        panic!("expected a tuple");
    };
    assert!(Rc::ptr_eq(&tuple, &Tuple::empty()));
    assert!(Rc::ptr_eq(&Tuple::new(Vec::new()), &Tuple::empty()));
}

#[test]
fn test_booleans_compare_by_value() {
    assert_eq!(eval("Boolean true == Boolean true"), "true");
    assert_eq!(eval("(Boolean false, false)"), "(false, false)");
    assert_eq!(eval("true | not"), "false");
}

// ============================================================================
// 错误
// ============================================================================

#[test]
fn test_unbound_identifier() {
    assert_eq!(eval_err("nope + 1"), EvalError::UnboundIdentifier { name: "nope".into() });
}

#[test]
fn test_no_such_method_names_the_receiver() {
    match eval_err("5 | frobnicate") {
        EvalError::NoSuchMethod { receiver, type_name, method } => {
            assert_eq!(receiver, "5");
            assert_eq!(type_name, "Number");
            assert_eq!(method, "frobnicate");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_member_access() {
    assert_eq!(eval("(x: 1, y: 2).y"), "2");
    assert_eq!(eval("(10, 20).1"), "20");
    assert!(matches!(eval_err("(1, 2).z"), EvalError::NoSuchMember { member, .. } if member == "z"));
}

#[test]
fn test_applying_a_number_fails() {
    assert!(matches!(eval_err("5 3"), EvalError::NotApplicable { .. }));
}

#[test]
fn test_condition_must_be_boolean() {
    assert!(matches!(
        eval_err("if 1 then 2 else 3"),
        EvalError::NonBooleanCondition { type_name, .. } if type_name == "Number"
    ));
}

#[test]
fn test_failed_statement_binds_nothing() {
    let interpreter = Interpreter::new();
    let result = show(&interpreter, "[a, b] = [1]");
    assert!(matches!(result, Err(InterpretError::Eval(EvalError::PatternMismatch { .. }))));
    assert!(interpreter.lookup("a").is_none());

    // The session keeps working after an error.
    assert_eq!(show(&interpreter, "a = 4\na * 2").unwrap(), "8");
}

#[test]
fn test_failed_statement_discards_cell_updates() {
    let interpreter = Interpreter::new();
    show(&interpreter, "c = context 0").unwrap();
    let result = show(&interpreter, "(c | set 5, nope)");
    assert!(matches!(result, Err(InterpretError::Eval(EvalError::UnboundIdentifier { .. }))));
    assert_eq!(show(&interpreter, "c | get").unwrap(), "0");

    show(&interpreter, "c | set 7").unwrap();
    assert_eq!(show(&interpreter, "c | get").unwrap(), "7");
}

#[test]
fn test_failed_statement_discards_extensions() {
    let interpreter = Interpreter::new();
    let result = show(&interpreter, "(extend Number (dbl: _ => this * 2), nope)");
    assert!(matches!(result, Err(InterpretError::Eval(EvalError::UnboundIdentifier { .. }))));
    assert!(matches!(
        show(&interpreter, "4 | dbl"),
        Err(InterpretError::Eval(EvalError::NoSuchMethod { .. }))
    ));

    show(&interpreter, "extend Number (dbl: _ => this * 2)").unwrap();
    assert_eq!(show(&interpreter, "4 | dbl").unwrap(), "8");
}

// ============================================================================
// 模式
// ============================================================================

#[test]
fn test_array_rest_pattern() {
    assert_eq!(eval("[h, ..t] = [1, 2, 3]\n(h, t)"), "(1, [2, 3])");
    assert_eq!(eval("[first] = 1..100\nfirst"), "1");
}

#[test]
fn test_tuple_pattern_by_name() {
    assert_eq!(eval("(y: b, x: a) = (x: 1, y: 2)\n(a, b)"), "(1, 2)");
}

#[test]
fn test_parameter_defaults() {
    assert_eq!(eval("f = (a, b = 10) => a + b\n(f (1, 2), f (1,))"), "(3, 11)");
}

#[test]
fn test_missing_parameter_binds_empty() {
    assert_eq!(eval("f = (a, b) => b\nf (1,)"), "()");
}

#[test]
fn test_literal_pattern_mismatch() {
    match eval_err("1 = 2") {
        EvalError::PatternMismatch { expected, found } => {
            assert_eq!(expected, "1");
            assert_eq!(found, "2");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================================
// 函数与控制
// ============================================================================

#[test]
fn test_block_scoping() {
    assert_eq!(eval("x = 1\ny = { x = 2; x + 1 }\n(x, y)"), "(1, 3)");
    assert_eq!(eval("{}"), "()");
}

#[test]
fn test_recursion_through_own_name() {
    assert_eq!(eval("fact = n => if n <= 1 then 1 else n * fact (n - 1)\nfact 10"), "3628800");
}

#[test]
fn test_let_loop_trampoline() {
    assert_eq!(eval("let (n = 0) => if n < 5 then loop (n + 1) else n"), "5");
    // Deep iteration must not grow the stack.
    assert_eq!(
        eval("let (n = 0, total = 0) => if n < 20000 then loop (n + 1, total + n) else total"),
        "199990000"
    );
}

#[test]
fn test_fizzbuzz_match() {
    let source = r#"
fizz = n => match (n % 3, n % 5) ((0, 0) => "FizzBuzz", (0, _) => "Fizz", (_, 0) => "Buzz", _ => n)
[15, 3, 5, 7] | map fizz
"#;
    assert_eq!(eval(source), r#"["FizzBuzz", "Fizz", "Buzz", 7]"#);
}

#[test]
fn test_match_guards_and_types() {
    let source = r#"
classify = n => match n (x if x < 0 => "negative", 0 => "zero", _ => "positive")
describe = v => match v (Number n => "number", String s => "string", _ => "other")
(classify (-5), classify 0, classify 5, describe 1, describe "a", describe true)
"#;
    assert_eq!(
        eval(source),
        r#"("negative", "zero", "positive", "number", "string", "other")"#
    );
}

#[test]
fn test_match_exhausted() {
    match eval_err(r#"match 3 (0 => "zero")"#) {
        EvalError::MatchExhausted { value, type_name } => {
            assert_eq!(value, "3");
            assert_eq!(type_name, "Number");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_direct_call_with_failing_guard() {
    assert!(matches!(
        eval_err("f = n if n > 0 => n\nf (-1)"),
        EvalError::PatternMismatch { .. }
    ));
}

// ============================================================================
// 结构体与扩展
// ============================================================================

#[test]
fn test_struct_construction() {
    let source = "Point = struct (x: Number, y: Number)\np = Point (1, 2)\n(p.x + p.y, p | type, p)";
    assert_eq!(eval(source), "(3, Point, Point(x: 1, y: 2))");
}

#[test]
fn test_struct_field_defaults() {
    assert_eq!(
        eval("Config = struct (name: \"anon\", size: 1)\nConfig (size: 5)"),
        r#"Config(name: "anon", size: 5)"#
    );
}

#[test]
fn test_struct_field_type_is_checked() {
    assert!(matches!(
        eval_err("Point = struct (x: Number, y: Number)\nPoint (\"a\", 2)"),
        EvalError::TypeMismatch { .. }
    ));
}

#[test]
fn test_constructor_pattern() {
    let source = "Point = struct (x: Number, y: Number)\nnorm = Point (x, y) => x * x + y * y\nnorm (Point (3, 4))";
    assert_eq!(eval(source), "25");

    let error = eval_err("Point = struct (x: Number, y: Number)\nnorm = Point (x, y) => x\nnorm (3, 4)");
    assert!(matches!(error, EvalError::TypeMismatch { expected, .. } if expected == "Point"));
}

#[test]
fn test_extend_adds_methods() {
    assert_eq!(eval("extend Number (double: _ => this * 2)\n5 | double"), "10");
}

#[test]
fn test_extend_overloads_operators() {
    let source = r#"
Vec = struct (x: Number, y: Number)
extend Vec ("+": other => Vec (this.x + other.x, this.y + other.y))
Vec (1, 2) + Vec (3, 4)
"#;
    assert_eq!(eval(source), "Vec(x: 4, y: 6)");
}

#[test]
fn test_extend_is_block_scoped() {
    let interpreter = Interpreter::new();
    assert_eq!(
        show(&interpreter, "{ extend Number (triple: _ => this * 3); 4 | triple }").unwrap(),
        "12"
    );
    assert!(matches!(
        show(&interpreter, "4 | triple"),
        Err(InterpretError::Eval(EvalError::NoSuchMethod { .. }))
    ));
    // A block evaluated before the extension does not see it either.
    assert!(matches!(
        show(&interpreter, "a = { 4 | triple }\nb = { extend Number (triple: _ => this * 3); 1 }"),
        Err(InterpretError::Eval(EvalError::NoSuchMethod { .. }))
    ));
}

// ============================================================================
// 上下文单元
// ============================================================================

#[test]
fn test_context_cells_follow_scope() {
    let source = "c = context 1\nbefore = c | get\nc | set 5\ninner = { c | set 9; c | get }\n(before, c | get, inner)";
    assert_eq!(eval(source), "(1, 5, 9)");
}

// ============================================================================
// 宿主函数
// ============================================================================

#[test]
fn test_host_functions_and_overrides() {
    let interpreter = Interpreter::new();
    interpreter.define_host("twice", |value, _| async move {
        match value {
            Value::Number(n) => Ok(Value::Number(n * 2.0)),
            other => Err(EvalError::host(format!("twice: not a number: {}", other.inspect()))),
        }
    });
    assert_eq!(show(&interpreter, "twice 21").unwrap(), "42");

    let value = run_local(interpreter.interpret_with("twice base", vec![("base".to_string(), Value::Number(4.0))]))
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(value.as_number(), Some(8.0));
    assert!(matches!(
        show(&interpreter, "twice \"x\""),
        Err(InterpretError::Eval(EvalError::Host(_)))
    ));
}

#[test]
fn test_short_circuit_skips_side_effects() {
    use std::cell::Cell;

    let touched = Rc::new(Cell::new(0));
    let interpreter = Interpreter::new();
    let counter = touched.clone();
    interpreter.define_host("touch", move |value, _| {
        counter.set(counter.get() + 1);
        async move { Ok::<_, EvalError>(value) }
    });

    assert_eq!(show(&interpreter, "if true then 1 else touch 2").unwrap(), "1");
    assert_eq!(show(&interpreter, "if false then touch 1 else 2").unwrap(), "2");
    assert_eq!(show(&interpreter, "false && touch true").unwrap(), "false");
    assert_eq!(show(&interpreter, "true || touch false").unwrap(), "true");
    assert_eq!(touched.get(), 0);

    assert_eq!(show(&interpreter, "true && touch true").unwrap(), "true");
    assert_eq!(touched.get(), 1);
}
