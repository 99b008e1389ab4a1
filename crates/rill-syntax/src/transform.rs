//! Raw tree to AST transform.
//! 原始语法树到 AST 的转换。

use crate::raw::{RawKind, RawNode};
use crate::{
    BinaryOp, Expr, ExprKind, FunctionExpr, Ident, Member, Pattern, PatternField, PatternKind,
    Program, Stmt, TupleField, UnaryOp,
};
use rill_common::Span;
use rill_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode};
use std::rc::Rc;

type Result<T> = std::result::Result<T, Diagnostic>;

/// Build the AST for a `Program` raw node.
/// 为 `Program` 原始节点构建 AST。
pub fn transform(raw: &RawNode) -> Result<Program> {
    expect_kind(raw, RawKind::Program)?;
    Ok(Program {
        statements: raw.children.iter().map(statement).collect::<Result<_>>()?,
        span: raw.span,
    })
}

fn malformed(node: &RawNode, message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::Syntax, node.span, message).with_code(ErrorCode::MalformedTree)
}

fn expect_kind(node: &RawNode, kind: RawKind) -> Result<()> {
    if node.kind == kind {
        Ok(())
    } else {
        Err(malformed(node, format!("expected {kind:?} node, found {:?}", node.kind)))
    }
}

fn child(node: &RawNode, index: usize) -> Result<&RawNode> {
    node.children
        .get(index)
        .ok_or_else(|| malformed(node, format!("{:?} node is missing child {index}", node.kind)))
}

fn text(node: &RawNode) -> Result<&str> {
    node.text
        .as_deref()
        .ok_or_else(|| malformed(node, format!("{:?} node has no text", node.kind)))
}

fn boxed(node: &RawNode) -> Result<Box<Expr>> {
    expr(node).map(Box::new)
}

fn number(node: &RawNode) -> Result<f64> {
    text(node)?.parse::<f64>().map_err(|_| {
        Diagnostic::error(DiagnosticKind::Syntax, node.span, "invalid number literal")
            .with_code(ErrorCode::InvalidNumber)
    })
}

fn boolean(node: &RawNode) -> Result<bool> {
    match text(node)? {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(malformed(node, format!("`{other}` is not a boolean"))),
    }
}

fn statement(node: &RawNode) -> Result<Stmt> {
    if node.kind != RawKind::Assign {
        return expr(node).map(Stmt::Expr);
    }

    let pattern = pattern(child(node, 0)?)?;
    let mut value = expr(child(node, 1)?)?;

    // `name = (x) => …` lets the function refer to itself as `name`.
    if let PatternKind::Identifier { name, .. } = &pattern.kind {
        if let ExprKind::Function(function) = &mut value.kind {
            if function.name.is_none() {
                if let Some(function) = Rc::get_mut(function) {
                    function.name = Some(name.name.clone());
                }
            }
        }
    }

    Ok(Stmt::Assign {
        pattern,
        value,
        span: node.span,
    })
}

fn expr(node: &RawNode) -> Result<Expr> {
    let kind = match node.kind {
        RawKind::Number => ExprKind::Number(number(node)?),
        RawKind::String => ExprKind::String(text(node)?.to_string()),
        RawKind::Bool => ExprKind::Bool(boolean(node)?),
        RawKind::Ident => ExprKind::Ident(Ident::new(text(node)?, node.span)),

        RawKind::Block => ExprKind::Block(node.children.iter().map(statement).collect::<Result<_>>()?),

        RawKind::Pipe => ExprKind::Pipe {
            receiver: boxed(child(node, 0)?)?,
            method: Ident::new(text(node)?, node.span),
            arg: node.children.get(1).map(boxed).transpose()?,
        },

        RawKind::Binary => {
            let symbol = text(node)?;
            let op = BinaryOp::from_symbol(symbol)
                .ok_or_else(|| malformed(node, format!("unknown operator `{symbol}`")))?;
            ExprKind::Operator {
                op,
                left: boxed(child(node, 0)?)?,
                right: boxed(child(node, 1)?)?,
            }
        }

        RawKind::Or => ExprKind::LogicalOr(boxed(child(node, 0)?)?, boxed(child(node, 1)?)?),
        RawKind::And => ExprKind::LogicalAnd(boxed(child(node, 0)?)?, boxed(child(node, 1)?)?),

        RawKind::Conditional => ExprKind::Conditional {
            condition: boxed(child(node, 0)?)?,
            consequent: boxed(child(node, 1)?)?,
            alternate: node.children.get(2).map(boxed).transpose()?,
        },

        RawKind::Apply => ExprKind::Apply {
            callee: boxed(child(node, 0)?)?,
            arg: boxed(child(node, 1)?)?,
        },

        RawKind::Range => ExprKind::Range {
            from: boxed(child(node, 0)?)?,
            to: boxed(child(node, 1)?)?,
        },

        RawKind::Member => {
            let name = text(node)?;
            let member = match name.parse::<usize>() {
                Ok(index) => Member::Index(index),
                Err(_) => Member::Name(name.to_string()),
            };
            ExprKind::Member {
                object: boxed(child(node, 0)?)?,
                member,
            }
        }

        RawKind::Unary => {
            let op = match text(node)? {
                "-" => UnaryOp::Neg,
                "!" => UnaryOp::Not,
                other => return Err(malformed(node, format!("unknown unary operator `{other}`"))),
            };
            ExprKind::Unary {
                op,
                operand: boxed(child(node, 0)?)?,
            }
        }

        RawKind::Function => ExprKind::Function(Rc::new(function(node)?)),

        RawKind::Tuple => ExprKind::Tuple(
            node.children
                .iter()
                .map(|field| {
                    expect_kind(field, RawKind::Field)?;
                    Ok(TupleField {
                        name: field.text.as_ref().map(|name| Ident::new(name, field.span)),
                        value: expr(child(field, 0)?)?,
                    })
                })
                .collect::<Result<_>>()?,
        ),

        RawKind::Array => ExprKind::Array(node.children.iter().map(expr).collect::<Result<_>>()?),

        RawKind::Dict => ExprKind::Dict(
            node.children
                .iter()
                .map(|entry| {
                    expect_kind(entry, RawKind::Entry)?;
                    Ok((expr(child(entry, 0)?)?, expr(child(entry, 1)?)?))
                })
                .collect::<Result<_>>()?,
        ),

        other => return Err(malformed(node, format!("{other:?} is not an expression"))),
    };

    Ok(Expr::new(kind, node.span))
}

fn function(node: &RawNode) -> Result<FunctionExpr> {
    let param = pattern(child(node, 0)?)?;
    let (guard, body) = match node.children.len() {
        2 => (None, expr(child(node, 1)?)?),
        3 => {
            let guard = child(node, 1)?;
            expect_kind(guard, RawKind::Guard)?;
            (Some(expr(child(guard, 0)?)?), expr(child(node, 2)?)?)
        }
        n => return Err(malformed(node, format!("function node has {n} children"))),
    };
    Ok(FunctionExpr {
        name: None,
        param,
        guard,
        body,
        span: node.span,
    })
}

/// Splits a trailing `Default` child off a pattern node's children.
fn split_default(node: &RawNode) -> Result<(&[RawNode], Option<Box<Expr>>)> {
    match node.children.split_last() {
        Some((last, rest)) if last.kind == RawKind::Default => {
            Ok((rest, Some(boxed(child(last, 0)?)?)))
        }
        _ => Ok((&node.children[..], None)),
    }
}

fn pattern(node: &RawNode) -> Result<Pattern> {
    let kind = match node.kind {
        RawKind::PatIdent => {
            let (_, default) = split_default(node)?;
            PatternKind::Identifier {
                name: Ident::new(text(node)?, node.span),
                default,
            }
        }
        RawKind::PatNumber => PatternKind::Number(number(node)?),
        RawKind::PatString => PatternKind::String(text(node)?.to_string()),
        RawKind::PatBool => PatternKind::Boolean(boolean(node)?),
        RawKind::PatTuple => {
            let (fields, default) = split_default(node)?;
            let fields = fields
                .iter()
                .map(|field| {
                    expect_kind(field, RawKind::PatField)?;
                    Ok(PatternField {
                        name: field.text.as_ref().map(|name| Ident::new(name, field.span)),
                        pattern: pattern(child(field, 0)?)?,
                    })
                })
                .collect::<Result<_>>()?;
            PatternKind::Tuple { fields, default }
        }
        RawKind::PatArray => {
            let (elements, rest) = match node.children.split_last() {
                Some((last, init)) if last.kind == RawKind::PatRest => {
                    (init, Some(Box::new(pattern(child(last, 0)?)?)))
                }
                _ => (&node.children[..], None),
            };
            PatternKind::Array {
                elements: elements.iter().map(pattern).collect::<Result<_>>()?,
                rest,
            }
        }
        RawKind::PatConstructor => PatternKind::Constructor {
            tag: Ident::new(text(node)?, node.span),
            inner: Box::new(pattern(child(node, 0)?)?),
        },
        other => {
            return Err(Diagnostic::error(
                DiagnosticKind::Syntax,
                node.span,
                format!("{other:?} is not a pattern"),
            )
            .with_code(ErrorCode::ExpectedPattern));
        }
    };

    Ok(Pattern::new(kind, node.span))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: RawKind, text: &str) -> RawNode {
        RawNode::leaf(kind, Span::DUMMY, text)
    }

    #[test]
    fn assignment_names_function() {
        let function = RawNode::spanning(
            RawKind::Function,
            vec![leaf(RawKind::PatIdent, "n"), leaf(RawKind::Ident, "n")],
        );
        let assign = RawNode::spanning(RawKind::Assign, vec![leaf(RawKind::PatIdent, "id"), function]);
        let program = transform(&RawNode::spanning(RawKind::Program, vec![assign])).unwrap();

        let Stmt::Assign { value, .. } = &program.statements[0] else {
            panic!("expected assignment");
        };
        let ExprKind::Function(function) = &value.kind else {
            panic!("expected function");
        };
        assert_eq!(function.name.as_deref(), Some("id"));
    }

    #[test]
    fn tuple_pattern_default_and_seed() {
        let field = RawNode::new(RawKind::PatField, Span::DUMMY).with_child(
            leaf(RawKind::PatIdent, "a").with_child(
                RawNode::new(RawKind::Default, Span::DUMMY).with_child(leaf(RawKind::Number, "1")),
            ),
        );
        let raw = RawNode::new(RawKind::PatTuple, Span::DUMMY)
            .with_child(field)
            .with_child(RawNode::new(RawKind::PatField, Span::DUMMY).with_child(leaf(RawKind::PatIdent, "n")));
        let pattern = pattern(&raw).unwrap();
        assert!(pattern.first_field_default().is_some());
        assert_eq!(pattern.describe(), "(a, n)");
    }

    #[test]
    fn rejects_malformed_nodes() {
        let bad = RawNode::new(RawKind::Apply, Span::DUMMY).with_child(leaf(RawKind::Ident, "f"));
        let err = transform(&RawNode::spanning(RawKind::Program, vec![bad])).unwrap_err();
        assert_eq!(err.code, Some(ErrorCode::MalformedTree));

        let err = transform(&leaf(RawKind::Ident, "x")).unwrap_err();
        assert_eq!(err.code, Some(ErrorCode::MalformedTree));
    }
}
