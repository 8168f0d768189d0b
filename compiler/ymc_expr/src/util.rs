use ymc_lexer_core::{read_balanced, unescape, Cursor};
use ymc_span::Span;

use crate::token::Token;

/// Characters that end a bareword inside an expression: whitespace and the
/// grammar's structural punctuation.
fn is_structural(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '(' | ')' | ',' | '=' | '"' | '\'')
}

/// Reads one `Base`/`Path`/`Key`/`Type` token: a quoted string or a bareword
/// terminated by whitespace or structural punctuation.
pub fn read_token(cursor: &mut Cursor<'_>, base_offset: u32) -> (Token, bool) {
    let start = cursor.pos();
    match cursor.current() {
        Some(q @ ('"' | '\'')) => {
            cursor.advance();
            let (inner, closed) = read_balanced(cursor, q, q);
            let text = unescape(&inner);
            let raw = format!("{q}{inner}{}", if closed { q.to_string() } else { String::new() });
            let span = Span::new(start + base_offset, cursor.pos() + base_offset);
            (
                Token {
                    raw,
                    text,
                    quoted: true,
                    span,
                },
                closed,
            )
        }
        _ => {
            let raw = cursor.bump_while(|c| !is_structural(c)).to_string();
            let text = unescape(&raw);
            let span = Span::new(start + base_offset, cursor.pos() + base_offset);
            (
                Token {
                    raw,
                    text,
                    quoted: false,
                    span,
                },
                true,
            )
        }
    }
}

/// Like [`read_balanced`], but quoted regions are opaque to nesting depth:
/// an unescaped brace or paren inside a quoted argument value never affects
/// when the matching close is found.
pub fn read_balanced_quote_aware(cursor: &mut Cursor<'_>, open: char, close: char) -> (String, bool) {
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
            Some('\\') => {
                out.push('\\');
                cursor.advance();
                if let Some(c) = cursor.current() {
                    out.push(c);
                    cursor.advance();
                }
            }
            Some(c) if open != close && c == open => {
                depth += 1;
                out.push(c);
                cursor.advance();
            }
            Some(c) if c == close => {
                cursor.advance();
                depth -= 1;
                if depth == 0 {
                    return (out, true);
                }
                out.push(c);
            }
            Some(c) => {
                out.push(c);
                cursor.advance();
            }
        }
    }
}

/// Splits `content` on top-level occurrences of `sep`, treating quoted
/// regions and nested `(`/`{` groups as opaque so commas or equals signs
/// inside a nested value don't split early. Returns each chunk with the
/// byte offset (relative to `content`) where it starts.
pub fn split_top_level(content: &str, sep: char) -> Vec<(String, u32)> {
    let mut chunks = Vec::new();
    let mut cursor = Cursor::new(content);
    let mut current = String::new();
    let mut chunk_start = 0u32;
    let mut depth: i32 = 0;

    loop {
        let before = cursor.pos();
        match cursor.current() {
            None => break,
            Some(q @ ('"' | '\'')) => {
                current.push(q);
                cursor.advance();
                let (inner, closed) = read_balanced(&mut cursor, q, q);
                current.push_str(&inner);
                if closed {
                    current.push(q);
                }
            }
            Some(c @ ('(' | '{')) => {
                depth += 1;
                current.push(c);
                cursor.advance();
            }
            Some(c @ (')' | '}')) => {
                depth -= 1;
                current.push(c);
                cursor.advance();
            }
            Some(c) if c == sep && depth == 0 => {
                cursor.advance();
                chunks.push((std::mem::take(&mut current), chunk_start));
                chunk_start = cursor.pos();
            }
            Some(c) => {
                current.push(c);
                cursor.advance();
            }
        }
        debug_assert!(cursor.pos() > before || cursor.is_eof());
    }
    chunks.push((current, chunk_start));
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_top_level_respects_quotes() {
        let chunks = split_top_level(r#"a="x,y", b=2"#, ',');
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].0, r#"a="x,y""#);
        assert_eq!(chunks[1].0, " b=2");
    }

    #[test]
    fn split_top_level_respects_nested_expr() {
        let chunks = split_top_level("a=${this.x,y}, b=2", ',');
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].0, "a=${this.x,y}");
    }
}
