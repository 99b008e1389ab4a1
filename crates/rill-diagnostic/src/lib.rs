//! Diagnostic and error reporting for Rill.
//! Rill 的诊断和错误报告。
//!
//! Lexer and parser problems are collected as [`Diagnostic`] values and
//! rendered with ariadne.
//! 词法和语法错误以 [`Diagnostic`] 收集，并通过 ariadne 渲染。

mod codes;
mod diagnostic;

pub use codes::ErrorCode;
pub use diagnostic::{Diagnostic, DiagnosticKind, Label, Severity};

use ariadne::{ColorGenerator, Label as AriadneLabel, Report, ReportKind, Source};

/// Render a diagnostic to stderr.
/// 将诊断信息渲染到标准错误输出。
pub fn emit(source: &str, filename: &str, diagnostic: &Diagnostic) -> std::io::Result<()> {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Note => ReportKind::Advice,
    };

    let mut colors = ColorGenerator::new();
    let mut report = Report::build(kind, filename, usize::from(diagnostic.span.start))
        .with_message(&diagnostic.message);

    if let Some(code) = &diagnostic.code {
        report = report.with_code(code.as_str());
    }

    for label in &diagnostic.labels {
        report = report.with_label(
            AriadneLabel::new((filename, label.span.range()))
                .with_message(&label.message)
                .with_color(colors.next()),
        );
    }

    for note in &diagnostic.notes {
        report = report.with_note(note);
    }

    match (&diagnostic.help, diagnostic.code.and_then(|code| code.suggestion())) {
        (Some(help), _) => report = report.with_help(help),
        (None, Some(suggestion)) => report = report.with_help(suggestion),
        (None, None) => {}
    }

    report
        .finish()
        .eprint((filename, Source::from(source)))
}

/// Render a diagnostic as a single plain line, `file:line:col: error[E0100]: message`.
/// 将诊断渲染为单行纯文本。
pub fn render_plain(source: &str, filename: &str, diagnostic: &Diagnostic) -> String {
    let (line, column) = diagnostic.span.line_col(source);
    let severity = match diagnostic.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Note => "note",
    };
    match diagnostic.code {
        Some(code) => format!(
            "{filename}:{line}:{column}: {severity}[{}]: {}",
            code.as_str(),
            diagnostic.message
        ),
        None => format!("{filename}:{line}:{column}: {severity}: {}", diagnostic.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rill_common::Span;

    #[test]
    fn plain_rendering_has_position_and_code() {
        let source = "x = 1\ny = )";
        let offset = source.find(')').unwrap();
        let diagnostic = Diagnostic::error(
            DiagnosticKind::Parser,
            Span::from_usize(offset, offset + 1),
            "expected an expression",
        )
        .with_code(ErrorCode::ExpectedExpression);

        assert_eq!(
            render_plain(source, "main.rill", &diagnostic),
            "main.rill:2:5: error[E0101]: expected an expression"
        );
    }
}
