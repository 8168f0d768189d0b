use ymc_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use ymc_lexer_core::{infer_literal, read_balanced, unescape, Cursor, Literal};
use ymc_span::Span;

use crate::token::RawToken;
use crate::types::Directives;
use crate::validate;

/// Tokenises one directive line (whitespace-split, honouring quoted and
/// balanced-bracket tokens per `SPEC_FULL.md` §4.3 item 1) into `RawToken`s,
/// with absolute positions rebased by `line_offset`.
fn tokenize_line(line: &str, line_offset: u32, errors: &mut DiagnosticQueue) -> Vec<RawToken> {
    let mut cursor = Cursor::new(line);
    let mut tokens = Vec::new();

    loop {
        cursor.bump_while(char::is_whitespace);
        let Some(c) = cursor.current() else { break };
        let start = cursor.pos();

        let token = match c {
            '"' | '\'' => {
                cursor.advance();
                let (inner, closed) = read_balanced(&mut cursor, c, c);
                if !closed {
                    errors.push(Diagnostic::error(
                        ErrorCode::D008,
                        Span::new(start + line_offset, cursor.pos() + line_offset),
                        "unterminated quoted directive token",
                    ));
                }
                let text = unescape(&inner);
                let raw = format!("{c}{inner}{}", if closed { c.to_string() } else { String::new() });
                RawToken {
                    raw,
                    text: text.clone(),
                    value: Literal::String(text),
                    quoted: true,
                    span: Span::new(start + line_offset, cursor.pos() + line_offset),
                    terminated: closed,
                }
            }
            '{' | '[' | '(' => {
                let close = match c {
                    '{' => '}',
                    '[' => ']',
                    '(' => ')',
                    _ => unreachable!("matched above"),
                };
                cursor.advance();
                let (inner, closed) = read_bracket_group(&mut cursor, c, close);
                if !closed {
                    errors.push(Diagnostic::error(
                        ErrorCode::D008,
                        Span::new(start + line_offset, cursor.pos() + line_offset),
                        "unterminated bracket group in directive",
                    ));
                }
                let raw = format!("{c}{inner}{}", if closed { close.to_string() } else { String::new() });
                RawToken {
                    raw: raw.clone(),
                    text: raw.clone(),
                    value: Literal::String(raw),
                    quoted: false,
                    span: Span::new(start + line_offset, cursor.pos() + line_offset),
                    terminated: closed,
                }
            }
            _ => {
                let raw = read_bareword(&mut cursor);
                let text = unescape(&raw);
                let value = infer_literal(&text);
                RawToken {
                    raw,
                    text,
                    value,
                    quoted: false,
                    span: Span::new(start + line_offset, cursor.pos() + line_offset),
                    terminated: true,
                }
            }
        };
        tokens.push(token);
    }

    tokens
}

/// Like [`read_balanced`] but treats quoted substrings as opaque: brackets
/// inside a quoted region never affect nesting depth (`SPEC_FULL.md` §4.3
/// item 1: "bracket nesting that ignores contents of quoted regions").
fn read_bracket_group(cursor: &mut Cursor<'_>, open: char, close: char) -> (String, bool) {
    let mut depth: u32 = 1;
    let mut out = String::new();
    loop {
        match cursor.current() {
            None => return (out, false),
            Some(q @ ('"' | '\'')) => {
                out.push(q);
                cursor.advance();
                let (inner, closed) = read_balanced(cursor, q, q);
                out.push_str(&inner);
                if closed {
                    out.push(q);
                } else {
                    return (out, false);
                }
            }
            Some(ch) if open != close && ch == open => {
                depth += 1;
                out.push(ch);
                cursor.advance();
            }
            Some(ch) if ch == close => {
                cursor.advance();
                depth -= 1;
                if depth == 0 {
                    return (out, true);
                }
                out.push(ch);
            }
            Some(ch) => {
                out.push(ch);
                cursor.advance();
            }
        }
    }
}

fn read_bareword(cursor: &mut Cursor<'_>) -> String {
    let mut out = String::new();
    loop {
        match cursor.current() {
            None => break,
            Some(c) if c.is_whitespace() => break,
            Some('\\') => {
                out.push('\\');
                cursor.advance();
                if let Some(c) = cursor.current() {
                    out.push(c);
                    cursor.advance();
                }
            }
            Some(c) => {
                out.push(c);
                cursor.advance();
            }
        }
    }
    out
}

/// Scans an entire module source for its directive region (`SPEC_FULL.md`
/// §4.3, §6.2): consecutive lines whose first character is `%`, ending at
/// the first line that isn't. Returns the built [`Directives`] table and
/// the byte offset where the YAML document body begins.
pub fn scan_directives(source: &str) -> (Directives, u32) {
    let mut directives = Directives::default();
    let mut offset: u32 = 0;

    for line in source.split_inclusive('\n') {
        let trimmed_end = line.trim_end_matches(['\n', '\r']);
        if !trimmed_end.starts_with('%') {
            break;
        }
        let tokens = tokenize_line(trimmed_end, offset, &mut directives.errors);
        if let Some(first) = tokens.first() {
            validate::classify_and_validate(first.clone(), tokens, &mut directives);
        }
        offset += line.len() as u32;
    }

    (directives, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_first_non_directive_line() {
        let (_directives, offset) = scan_directives("%PARAM name world\ngreeting: hi\n");
        assert_eq!(offset, "%PARAM name world\n".len() as u32);
    }

    #[test]
    fn no_directives_means_zero_offset() {
        let (directives, offset) = scan_directives("greeting: hi\n");
        assert_eq!(offset, 0);
        assert!(directives.param.is_empty());
    }

    #[test]
    fn quoted_token_with_internal_whitespace() {
        let (directives, _) = scan_directives("%FILENAME \"my file.yaml\"\n");
        assert_eq!(directives.filename.len(), 1);
        assert_eq!(directives.filename[0].name.text, "my file.yaml");
    }
}
