use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_lexer_core::Cursor;
use ymc_span::Span;

use crate::ast::{ScalarTemplate, TemplatePart};
use crate::expr;
use crate::util::read_balanced_quote_aware;

/// Parses one scalar's text layer (`SPEC_FULL.md` §4.4.2): verbatim text
/// interleaved with `${...}` expressions, or — when the scalar begins with
/// a bare `$` not followed by `{` — a single free expression spanning the
/// whole string.
pub fn parse_scalar(source: &str) -> (ScalarTemplate, Vec<Diagnostic>) {
    parse_scalar_at(source, 0)
}

/// Same as [`parse_scalar`], but rebases every produced span by `base_offset`
/// — used when `source` is itself a substring starting partway through the
/// module (`SPEC_FULL.md` §3.1: spans are absolute byte ranges into the
/// module source, not into whatever substring happened to be parsed).
pub fn parse_scalar_at(source: &str, base_offset: u32) -> (ScalarTemplate, Vec<Diagnostic>) {
    if source.is_empty() {
        return (ScalarTemplate::default(), Vec::new());
    }

    if source.starts_with('$') && !source[1..].starts_with('{') {
        let (node, errors) = expr::parse_expr(&source[1..], base_offset + 1);
        return (
            ScalarTemplate {
                parts: vec![TemplatePart::Expr(node)],
                free_expr: true,
            },
            errors,
        );
    }

    let mut errors = Vec::new();
    let mut parts = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut literal = String::new();
    let mut literal_start = 0u32;

    loop {
        if cursor.current().is_none() {
            break;
        }
        if cursor.rest().starts_with("$${") {
            if literal.is_empty() {
                literal_start = cursor.pos() + base_offset;
            }
            literal.push_str("${");
            cursor.advance();
            cursor.advance();
            cursor.advance();
            continue;
        }
        if cursor.rest().starts_with("${") {
            if !literal.is_empty() {
                parts.push(TemplatePart::Literal(
                    std::mem::take(&mut literal),
                    Span::new(literal_start, cursor.pos() + base_offset),
                ));
            }
            let brace_start = cursor.pos();
            cursor.advance();
            cursor.advance();
            let (inner, closed) = read_balanced_quote_aware(&mut cursor, '{', '}');
            if !closed {
                errors.push(Diagnostic::error(
                    ErrorCode::T001,
                    Span::new(brace_start + base_offset, cursor.pos() + base_offset),
                    "unclosed ${ in scalar",
                ));
            }
            let (node, mut expr_errors) = expr::parse_expr(&inner, brace_start + 2 + base_offset);
            errors.append(&mut expr_errors);
            parts.push(TemplatePart::Expr(node));
            continue;
        }
        let c = cursor.current().expect("checked above");
        if literal.is_empty() {
            literal_start = cursor.pos() + base_offset;
        }
        literal.push(c);
        cursor.advance();
    }

    if !literal.is_empty() {
        parts.push(TemplatePart::Literal(
            literal,
            Span::new(literal_start, cursor.pos() + base_offset),
        ));
    }

    (ScalarTemplate { parts, free_expr: false }, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_has_no_parts_expr() {
        let (tpl, errors) = parse_scalar("hello world");
        assert!(errors.is_empty());
        assert_eq!(tpl.parts.len(), 1);
        assert!(tpl.is_plain_text());
    }

    #[test]
    fn empty_scalar_has_no_parts() {
        let (tpl, errors) = parse_scalar("");
        assert!(errors.is_empty());
        assert!(tpl.parts.is_empty());
    }

    #[test]
    fn escaped_brace_is_literal() {
        let (tpl, errors) = parse_scalar("$${foo}");
        assert!(errors.is_empty());
        assert_eq!(tpl.parts.len(), 1);
        match &tpl.parts[0] {
            TemplatePart::Literal(s, _) => assert_eq!(s, "${foo}"),
            TemplatePart::Expr(_) => panic!("expected literal"),
        }
    }

    #[test]
    fn free_expression_mode() {
        let (tpl, _) = parse_scalar("$this.name");
        assert!(tpl.free_expr);
        assert_eq!(tpl.parts.len(), 1);
    }

    #[test]
    fn interpolated_expression_between_text() {
        let (tpl, errors) = parse_scalar("Hello ${param.name}!");
        assert!(errors.is_empty());
        assert_eq!(tpl.parts.len(), 3);
    }

    #[test]
    fn nested_interpolation_depth_two() {
        let (_tpl, errors) = parse_scalar("${foo.bar(x=${this.y})}");
        assert!(errors.is_empty());
    }

    #[test]
    fn unclosed_interpolation_is_an_error() {
        let (_tpl, errors) = parse_scalar("Hello ${param.name!");
        assert!(errors.iter().any(|d| d.code == ErrorCode::T001));
    }
}
