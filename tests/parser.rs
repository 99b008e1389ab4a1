//! Integration tests for rill-parser and the raw-tree transform.

use rill_parser::{parse, parse_program};
use rill_syntax::{ExprKind, PatternKind, Stmt};

fn sexp(source: &str) -> String {
    let (tree, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    tree.map(|t| t.sexp()).unwrap_or_default()
}

#[test]
fn test_empty_programs_have_no_tree() {
    assert!(parse_program("").unwrap().is_none());
    assert!(parse_program("\n\n-- only a comment\n").unwrap().is_none());
    assert!(parse_program(";;").unwrap().is_none());
}

#[test]
fn test_statements_split_on_newlines_and_semicolons() {
    let program = parse_program("a = 1\nb = 2; a + b").unwrap().unwrap();
    assert_eq!(program.statements.len(), 3);
    assert!(matches!(program.statements[0], Stmt::Assign { .. }));
    assert!(matches!(program.statements[2], Stmt::Expr(_)));
}

#[test]
fn test_multiline_pipeline_is_one_statement() {
    let program = parse_program("1..10\n  | filter (n) => n > 2\n").unwrap().unwrap();
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_pipe_is_left_nested() {
    assert_eq!(
        sexp("xs | take 3 | toArray"),
        r#"(Program (Pipe "toArray" (Pipe "take" (Ident "xs") (Number "3"))))"#
    );
}

#[test]
fn test_comparison_binds_looser_than_arithmetic() {
    assert_eq!(
        sexp("n % 2 == 0"),
        r#"(Program (Binary "==" (Binary "%" (Ident "n") (Number "2")) (Number "0")))"#
    );
}

#[test]
fn test_application_is_left_associative() {
    assert_eq!(
        sexp("f x y"),
        r#"(Program (Apply (Apply (Ident "f") (Ident "x")) (Ident "y")))"#
    );
}

#[test]
fn test_function_patterns() {
    let program = parse_program("f = (a, b = 2) => a + b").unwrap().unwrap();
    let Stmt::Assign { value, .. } = &program.statements[0] else {
        panic!("expected an assignment");
    };
    let ExprKind::Function(function) = &value.kind else {
        panic!("expected a function");
    };
    let PatternKind::Tuple { fields, .. } = &function.param.kind else {
        panic!("expected a tuple pattern");
    };
    assert_eq!(fields.len(), 2);
    assert!(matches!(&fields[1].pattern.kind, PatternKind::Identifier { default: Some(_), .. }));
}

#[test]
fn test_match_clauses_parse_as_functions() {
    let program = parse_program(r#"match n ((0, _) => "Fizz", _ => n)"#).unwrap().unwrap();
    let Stmt::Expr(expr) = &program.statements[0] else {
        panic!("expected an expression");
    };
    let ExprKind::Apply { arg, .. } = &expr.kind else {
        panic!("expected an application");
    };
    let ExprKind::Tuple(clauses) = &arg.kind else {
        panic!("expected a tuple of clauses");
    };
    assert_eq!(clauses.len(), 2);
    assert!(clauses.iter().all(|c| matches!(c.value.kind, ExprKind::Function(_))));
}

#[test]
fn test_negative_literal_pattern() {
    let program = parse_program("-1 => true").unwrap().unwrap();
    let Stmt::Expr(expr) = &program.statements[0] else {
        panic!("expected an expression");
    };
    let ExprKind::Function(function) = &expr.kind else {
        panic!("expected a function");
    };
    assert!(matches!(function.param.kind, PatternKind::Number(n) if n == -1.0));
}

#[test]
fn test_dict_literal_keys() {
    assert_eq!(
        sexp("#{a: 1, \"b\": 2}"),
        r#"(Program (Dict (Entry (String "a") (Number "1")) (Entry (String "b") (Number "2"))))"#
    );
}

#[test]
fn test_errors_are_reported_per_statement() {
    let diagnostics = parse_program("a = (1,\nb = ]\nc = 3").unwrap_err();
    assert!(!diagnostics.is_empty());
    assert!(diagnostics.iter().all(|d| d.is_error()));
}

#[test]
fn test_unclosed_delimiter_points_at_opener() {
    let diagnostics = parse_program("[1, 2").unwrap_err();
    assert!(
        diagnostics
            .iter()
            .any(|d| d.code == Some(rill_diagnostic::ErrorCode::UnclosedDelimiter))
    );
}
