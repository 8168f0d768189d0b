use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_lexer_core::Cursor;
use ymc_span::Span;

use crate::args;
use crate::ast::ExprNode;
use crate::token::Token;
use crate::util::read_balanced_quote_aware;
use crate::util::read_token;

const TYPE_KEYWORDS: [&str; 3] = ["scalar", "map", "seq"];

/// Parses one `Base ( "." Path )* [ "(" Args ")" ] [ WS Type ]` expression
/// body (`SPEC_FULL.md` §4.4.1/§4.4.2). `base_offset` rebases every span to
/// absolute module-source coordinates.
pub fn parse_expr(content: &str, base_offset: u32) -> (ExprNode, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let mut cursor = Cursor::new(content);
    let expr_start = cursor.pos();

    cursor.bump_while(char::is_whitespace);

    let (base, _) = read_token(&mut cursor, base_offset);
    if base.text.is_empty() {
        errors.push(Diagnostic::error(
            ErrorCode::T005,
            Span::new(base_offset, cursor.pos() + base_offset),
            "expression is missing a base (this|import|param|local)",
        ));
    }

    let mut path = Vec::new();
    let mut first_dot = true;
    while cursor.current() == Some('.') {
        let dot_pos = cursor.pos();
        cursor.advance();
        let (segment, _) = read_token(&mut cursor, base_offset);
        if segment.text.is_empty() {
            let code = if first_dot { ErrorCode::T010 } else { ErrorCode::T006 };
            let message = if first_dot {
                "missing path segment after base"
            } else {
                "repeated . with no path segment between"
            };
            errors.push(Diagnostic::error(
                code,
                Span::new(dot_pos + base_offset, cursor.pos() + base_offset),
                message,
            ));
        }
        path.push(segment);
        first_dot = false;
    }

    let mut args_list = None;
    let mut after_paren = false;
    while cursor.current() == Some('(') {
        let paren_pos = cursor.pos();
        cursor.advance();
        let (inner, closed) = read_balanced_quote_aware(&mut cursor, '(', ')');
        if !closed {
            errors.push(Diagnostic::error(
                ErrorCode::T001,
                Span::new(paren_pos + base_offset, cursor.pos() + base_offset),
                "unclosed ( in expression",
            ));
        }
        if after_paren {
            errors.push(Diagnostic::error(
                ErrorCode::T003,
                Span::new(paren_pos + base_offset, paren_pos + base_offset + 1),
                "repeated ( in expression",
            ));
        } else {
            let (parsed, mut arg_errors) = args::parse_args(&inner, paren_pos + 1 + base_offset);
            errors.append(&mut arg_errors);
            args_list = Some(parsed);
            after_paren = true;
        }
    }

    let type_annotation = parse_type_tail(&mut cursor, base_offset, &mut errors);

    let span = Span::new(expr_start + base_offset, cursor.pos() + base_offset);
    (
        ExprNode {
            base,
            path,
            args: args_list,
            type_annotation,
            span,
        },
        errors,
    )
}

/// Consumes the optional trailing `WS "as" WS (scalar|map|seq)` tail,
/// flagging a second such tail as a repeated-type error (`T004`).
fn parse_type_tail(cursor: &mut Cursor<'_>, base_offset: u32, errors: &mut Vec<Diagnostic>) -> Option<Token> {
    let mut result = None;
    let mut after_whitespace = false;

    loop {
        let ws_start = cursor.pos();
        let consumed_ws = !cursor.bump_while(char::is_whitespace).is_empty();
        if cursor.current().is_none() {
            break;
        }
        if !consumed_ws {
            // Trailing content with no separating whitespace; not a valid
            // type tail position. Stop rather than mis-tokenise it.
            break;
        }

        let (as_kw, _) = read_token(cursor, base_offset);
        if as_kw.text != "as" {
            errors.push(Diagnostic::error(
                ErrorCode::T011,
                Span::new(ws_start + base_offset, cursor.pos() + base_offset),
                format!("expected `as <type>`, found `{}`", as_kw.raw),
            ));
            break;
        }
        cursor.bump_while(char::is_whitespace);
        let (ty, _) = read_token(cursor, base_offset);
        if !TYPE_KEYWORDS.contains(&ty.text.as_str()) {
            errors.push(Diagnostic::error(
                ErrorCode::T011,
                ty.span,
                format!("invalid type annotation `{}`, expected scalar|map|seq", ty.text),
            ));
        }

        if after_whitespace {
            errors.push(Diagnostic::error(
                ErrorCode::T004,
                Span::new(ws_start + base_offset, cursor.pos() + base_offset),
                "repeated type annotation",
            ));
        } else {
            result = Some(ty);
            after_whitespace = true;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_and_path() {
        let (node, errors) = parse_expr("this.a.b", 0);
        assert!(errors.is_empty());
        assert_eq!(node.base.text, "this");
        assert_eq!(node.path.len(), 2);
        assert_eq!(node.path[1].text, "b");
    }

    #[test]
    fn missing_base_is_an_error() {
        let (_node, errors) = parse_expr("", 0);
        assert!(errors.iter().any(|d| d.code == ErrorCode::T005));
    }

    #[test]
    fn type_annotation_is_parsed() {
        let (node, errors) = parse_expr("this.a as scalar", 0);
        assert!(errors.is_empty());
        assert_eq!(node.type_annotation.unwrap().text, "scalar");
    }

    #[test]
    fn invalid_type_keyword_is_flagged() {
        let (_node, errors) = parse_expr("this.a as bogus", 0);
        assert!(errors.iter().any(|d| d.code == ErrorCode::T011));
    }

    #[test]
    fn repeated_paren_is_flagged() {
        let (_node, errors) = parse_expr("this.a(x=1)(y=2)", 0);
        assert!(errors.iter().any(|d| d.code == ErrorCode::T003));
    }

    #[test]
    fn args_are_parsed() {
        let (node, errors) = parse_expr("import.team(who=ops)", 0);
        assert!(errors.is_empty());
        let args = node.args.expect("args present");
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].key.text, "who");
    }
}
