/// The typed reading of a `RawToken` (`SPEC_FULL.md` §3.2): a conservative
/// literal parser tries a JSON-shaped number first, then the `true|false|null`
/// barewords, and otherwise falls back to the raw (already unescaped) text.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

pub fn infer_literal(text: &str) -> Literal {
    if text.is_empty() {
        return Literal::Undefined;
    }
    if is_json_number(text) {
        if let Ok(n) = text.parse::<f64>() {
            return Literal::Number(n);
        }
    }
    match text {
        "true" => return Literal::Bool(true),
        "false" => return Literal::Bool(false),
        "null" => return Literal::Null,
        _ => {}
    }
    Literal::String(text.to_string())
}

/// A conservative check that `text` looks like a JSON number literal
/// (optional leading `-`, digits, optional fractional part, optional
/// exponent) so that e.g. `"007"`-the-string isn't mis-read the same way
/// `007` wouldn't be valid JSON either — but we don't need to reject it
/// since `str::parse::<f64>` already agrees on shape for our purposes; the
/// real job of this guard is rejecting things `f64::parse` is lenient about
/// that JSON is not, like `inf`, `nan`, or a bare `+5`.
fn is_json_number(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    if chars.peek() == Some(&'-') {
        chars.next();
    }
    let mut saw_digit = false;
    while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
        chars.next();
        saw_digit = true;
    }
    if !saw_digit {
        return false;
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        let mut saw_frac_digit = false;
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            saw_frac_digit = true;
        }
        if !saw_frac_digit {
            return false;
        }
    }
    if matches!(chars.peek(), Some('e') | Some('E')) {
        chars.next();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut saw_exp_digit = false;
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            chars.next();
            saw_exp_digit = true;
        }
        if !saw_exp_digit {
            return false;
        }
    }
    chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_undefined() {
        assert_eq!(infer_literal(""), Literal::Undefined);
    }

    #[test]
    fn booleans_and_null() {
        assert_eq!(infer_literal("true"), Literal::Bool(true));
        assert_eq!(infer_literal("false"), Literal::Bool(false));
        assert_eq!(infer_literal("null"), Literal::Null);
    }

    #[test]
    fn numbers() {
        assert_eq!(infer_literal("42"), Literal::Number(42.0));
        assert_eq!(infer_literal("-3.5"), Literal::Number(-3.5));
        assert_eq!(infer_literal("1e3"), Literal::Number(1000.0));
    }

    #[test]
    fn non_numeric_falls_back_to_string() {
        assert_eq!(infer_literal("inf"), Literal::String("inf".into()));
        assert_eq!(infer_literal("world"), Literal::String("world".into()));
        assert_eq!(infer_literal("+5"), Literal::String("+5".into()));
    }
}
