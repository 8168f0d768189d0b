use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_lexer_core::Cursor;
use ymc_span::Span;

use crate::ast::Arg;
use crate::text::parse_scalar_at;
use crate::util::{read_token, split_top_level};

/// Parses the Args layer (`SPEC_FULL.md` §4.4.2): splits on top-level `,`
/// into `key=value` chunks, each re-tokenised by the KeyValue layer.
pub fn parse_args(content: &str, base_offset: u32) -> (Vec<Arg>, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let mut args = Vec::new();

    if content.trim().is_empty() {
        return (args, errors);
    }

    for (chunk, chunk_offset) in split_top_level(content, ',') {
        let chunk_base = base_offset + chunk_offset;
        let equals = find_top_level_equals(&chunk);

        let Some(&first_eq) = equals.first() else {
            errors.push(Diagnostic::error(
                ErrorCode::T009,
                Span::new(chunk_base, chunk_base + chunk.len() as u32),
                "missing `=` in key=value argument",
            ));
            continue;
        };
        if equals.len() > 1 {
            errors.push(Diagnostic::error(
                ErrorCode::T008,
                Span::new(chunk_base + first_eq, chunk_base + first_eq + 1),
                "repeated = in key=value argument",
            ));
        }

        let key_src = &chunk[..first_eq as usize];
        let mut key_cursor = Cursor::new(key_src);
        key_cursor.bump_while(char::is_whitespace);
        let (key, _) = read_token(&mut key_cursor, chunk_base);
        if key.text.is_empty() {
            errors.push(Diagnostic::error(
                ErrorCode::T009,
                Span::new(chunk_base, chunk_base + first_eq),
                "missing key in key=value argument",
            ));
        }

        let value_src = &chunk[first_eq as usize + 1..];
        let (value, mut value_errors) = parse_scalar_at(value_src, chunk_base + first_eq + 1);
        errors.append(&mut value_errors);

        args.push(Arg {
            key,
            value,
            span: Span::new(chunk_base, chunk_base + chunk.len() as u32),
        });
    }

    (args, errors)
}

/// Byte offsets (relative to `s`) of every `=` that isn't inside a quoted
/// region or a nested `(`/`{` group.
fn find_top_level_equals(s: &str) -> Vec<u32> {
    let mut positions = Vec::new();
    let mut depth: i32 = 0;
    let mut cursor = Cursor::new(s);
    loop {
        match cursor.current() {
            None => break,
            Some(q @ ('"' | '\'')) => {
                cursor.advance();
                let (_, _) = ymc_lexer_core::read_balanced(&mut cursor, q, q);
            }
            Some('(' | '{') => {
                depth += 1;
                cursor.advance();
            }
            Some(')' | '}') => {
                depth -= 1;
                cursor.advance();
            }
            Some('=') if depth == 0 => {
                positions.push(cursor.pos());
                cursor.advance();
            }
            Some(_) => {
                cursor.advance();
            }
        }
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_key_value() {
        let (args, errors) = parse_args("who=ops", 0);
        assert!(errors.is_empty());
        assert_eq!(args.len(), 1);
        assert_eq!(args[0].key.text, "who");
    }

    #[test]
    fn multiple_key_values() {
        let (args, errors) = parse_args("who=ops, count=3", 0);
        assert!(errors.is_empty());
        assert_eq!(args.len(), 2);
        assert_eq!(args[1].key.text, "count");
    }

    #[test]
    fn missing_equals_is_an_error() {
        let (_args, errors) = parse_args("bogus", 0);
        assert!(errors.iter().any(|d| d.code == ErrorCode::T009));
    }

    #[test]
    fn empty_args_list_has_no_entries() {
        let (args, errors) = parse_args("", 0);
        assert!(args.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn value_may_interpolate() {
        let (args, errors) = parse_args("msg=hi ${this.name}", 0);
        assert!(errors.is_empty());
        assert_eq!(args[0].value.parts.len(), 2);
    }
}
