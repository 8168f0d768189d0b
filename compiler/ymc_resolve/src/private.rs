use ymc_ast::Value;
use ymc_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use ymc_directives::Directives;

/// Strips every `%PRIVATE` path from a clone of the resolved tree
/// (`SPEC_FULL.md` §4.6.6). A path that doesn't exist in the output is a
/// diagnostic, not a panic — the module still compiles, just with a
/// warning-shaped error attached to the offending directive.
pub fn strip_private(value: &Value, directives: &Directives, errors: &mut DiagnosticQueue) -> Value {
    let mut out = value.clone();
    for directive in &directives.private {
        for path in &directive.paths {
            if !remove_path(&mut out, &path.segments) {
                errors.push(Diagnostic::error(
                    ErrorCode::P001,
                    directive.base.span,
                    format!("%PRIVATE path `{}` not present in resolved output", path.segments.join(".")),
                ));
            }
        }
    }
    out
}

fn remove_path(value: &mut Value, segments: &[String]) -> bool {
    match segments {
        [] => false,
        [last] => remove_terminal(value, last),
        [first, rest @ ..] => match value {
            Value::Map(map) => map.get_mut(first).is_some_and(|child| remove_path(child, rest)),
            Value::Seq(items) => index_of(items, first)
                .and_then(|idx| items.get_mut(idx))
                .is_some_and(|child| remove_path(child, rest)),
            _ => false,
        },
    }
}

fn remove_terminal(value: &mut Value, key: &str) -> bool {
    match value {
        Value::Map(map) => map.shift_remove(key).is_some(),
        Value::Seq(items) => match index_of(items, key) {
            Some(idx) => {
                items.remove(idx);
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn index_of(items: &[Value], segment: &str) -> Option<usize> {
    if let Ok(idx) = segment.parse::<usize>() {
        if idx < items.len() {
            return Some(idx);
        }
        return None;
    }
    items.iter().position(|item| matches!(item, Value::String(s) if s == segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn map_value() -> Value {
        let mut inner = IndexMap::new();
        inner.insert("secret".to_string(), Value::String("hidden".into()));
        inner.insert("public".to_string(), Value::Int(1));
        let mut outer = IndexMap::new();
        outer.insert("db".to_string(), Value::Map(inner));
        Value::Map(outer)
    }

    #[test]
    fn removes_nested_map_key() {
        let mut v = map_value();
        let segments = vec!["db".to_string(), "secret".to_string()];
        assert!(remove_path(&mut v, &segments));
        let Value::Map(outer) = &v else { panic!("expected map") };
        let Value::Map(inner) = outer.get("db").expect("db") else {
            panic!("expected inner map")
        };
        assert!(!inner.contains_key("secret"));
        assert!(inner.contains_key("public"));
    }

    #[test]
    fn missing_path_reports_false() {
        let mut v = map_value();
        let segments = vec!["db".to_string(), "nope".to_string()];
        assert!(!remove_path(&mut v, &segments));
    }

    #[test]
    fn removes_sequence_element_by_index() {
        let mut v = Value::Seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(remove_path(&mut v, &["1".to_string()]));
        assert_eq!(v, Value::Seq(vec![Value::Int(1), Value::Int(3)]));
    }
}
