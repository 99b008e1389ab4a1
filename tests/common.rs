//! Integration tests for rill-common and rill-diagnostic.

use rill_common::{BytePos, Span};
use rill_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label, render_plain};

#[test]
fn test_span_merge() {
    let a = Span::from_usize(10, 20);
    let b = Span::from_usize(15, 30);
    let merged = a.merge(b);
    assert_eq!(merged.start.0, 10);
    assert_eq!(merged.end.0, 30);
}

#[test]
fn test_span_len_and_range() {
    let span = Span::from_usize(5, 15);
    assert_eq!(span.len(), 10);
    assert_eq!(span.range(), 5..15);
    assert!(Span::from_usize(5, 5).is_empty());
}

#[test]
fn test_byte_pos_offset() {
    assert_eq!(BytePos(10).offset(5), BytePos(15));
}

#[test]
fn test_span_slice_and_line_col() {
    let source = "a = 1\nbb = oops";
    let span = Span::from_usize(11, 15);
    assert_eq!(span.slice(source), Some("oops"));
    assert_eq!(span.line_col(source), (2, 6));
    assert_eq!(Span::from_usize(40, 50).slice(source), None);
}

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ErrorCode::UnterminatedString.as_str(), "E0002");
    assert_eq!(ErrorCode::UnexpectedToken.as_str(), "E0100");
    assert_eq!(ErrorCode::UnboundIdentifier.as_str(), "E0300");
    assert_eq!(ErrorCode::Cancelled.as_str(), "E0311");
}

#[test]
fn test_plain_rendering() {
    let source = "x = 1\ny = )";
    let span = Span::from_usize(10, 11);
    let diagnostic = Diagnostic::error(DiagnosticKind::Parser, span, "expected an expression, found `)`")
        .with_code(ErrorCode::ExpectedExpression)
        .with_label(Label::new(span, "here"));
    assert_eq!(
        render_plain(source, "main.rill", &diagnostic),
        "main.rill:2:5: error[E0101]: expected an expression, found `)`"
    );
}
