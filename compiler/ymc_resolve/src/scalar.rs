use ymc_ast::Value;

/// Resolves an untagged scalar's literal type per the YAML core schema:
/// quoted scalars are always strings; plain scalars try `null`, booleans,
/// then integers/floats, falling back to string.
///
/// This is deliberately distinct from `ymc_lexer_core::infer_literal`,
/// which reads directive/argument tokens under a JSON-ish schema — YAML's
/// plain-scalar rules recognise different spellings (`~`, `Yes`/`No`, a
/// bare empty value as `null`) that don't apply there.
pub fn yaml_scalar_value(raw: &str, quoted: bool) -> Value {
    if quoted {
        return Value::String(raw.to_string());
    }
    match raw {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Int(i);
    }
    if looks_like_float(raw) {
        if let Ok(f) = raw.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::String(raw.to_string())
}

/// A conservative float-shape check so that things `f64::parse` is lenient
/// about but YAML's core schema is not (`inf`, `nan`, a bare `.`) fall back
/// to strings instead.
fn looks_like_float(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    if s.is_empty() {
        return false;
    }
    let mut saw_digit = false;
    let mut saw_dot = false;
    let mut saw_exp = false;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.peek() {
        match c {
            '0'..='9' => {
                saw_digit = true;
                chars.next();
            }
            '.' if !saw_dot && !saw_exp => {
                saw_dot = true;
                chars.next();
            }
            'e' | 'E' if saw_digit && !saw_exp => {
                saw_exp = true;
                chars.next();
                if matches!(chars.peek(), Some('+') | Some('-')) {
                    chars.next();
                }
            }
            _ => return false,
        }
    }
    saw_digit && (saw_dot || saw_exp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_is_always_string() {
        assert_eq!(yaml_scalar_value("123", true), Value::String("123".into()));
    }

    #[test]
    fn null_spellings() {
        assert_eq!(yaml_scalar_value("", false), Value::Null);
        assert_eq!(yaml_scalar_value("~", false), Value::Null);
        assert_eq!(yaml_scalar_value("null", false), Value::Null);
    }

    #[test]
    fn booleans() {
        assert_eq!(yaml_scalar_value("true", false), Value::Bool(true));
        assert_eq!(yaml_scalar_value("False", false), Value::Bool(false));
    }

    #[test]
    fn integers_and_floats() {
        assert_eq!(yaml_scalar_value("42", false), Value::Int(42));
        assert_eq!(yaml_scalar_value("-3.5", false), Value::Float(-3.5));
    }

    #[test]
    fn plain_word_is_a_string() {
        assert_eq!(yaml_scalar_value("hello", false), Value::String("hello".into()));
        assert_eq!(yaml_scalar_value("inf", false), Value::String("inf".into()));
    }
}
