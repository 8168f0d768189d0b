use ymc_ast::{Document, NodeId, NodeKind, Value};
use ymc_expr::Token;

/// Walks `path` from `start` through the *unresolved* document tree
/// (`SPEC_FULL.md` §4.6.3), matching map keys by their raw scalar text and
/// falling back to positional/scan lookups on sequences. Returns `None` if
/// any segment has no match. Stops one step short of resolving the final
/// node's *value* — the caller decides whether reaching it is a forward
/// reference, by comparing its `order_index` against the evaluation
/// counter.
pub fn traverse_ast(document: &Document, start: NodeId, path: &[Token]) -> Option<NodeId> {
    let mut current = start;
    for segment in path {
        current = step_ast(document, current, &segment.text)?;
    }
    Some(current)
}

fn step_ast(document: &Document, current: NodeId, segment: &str) -> Option<NodeId> {
    match &document.get(current).kind {
        NodeKind::Map(pairs) => pairs
            .iter()
            .find(|(k, _)| key_text(document, *k) == segment)
            .map(|(_, v)| *v),
        NodeKind::Seq(items) => {
            if let Ok(index) = segment.parse::<usize>() {
                items.get(index).copied()
            } else {
                items.iter().find(|id| key_text(document, **id) == segment).copied()
            }
        }
        NodeKind::Scalar { raw, .. } => {
            if let Ok(index) = segment.parse::<usize>() {
                raw.chars().nth(index).map(|_| current)
            } else {
                None
            }
        }
        NodeKind::Alias { .. } => None,
    }
}

/// The raw text used to match a map/sequence key by string. Keys built
/// from expressions aren't matched against their resolved value — only
/// their literal source text — since the whole point of reaching this
/// node may be that it hasn't resolved yet.
fn key_text(document: &Document, id: NodeId) -> String {
    match &document.get(id).kind {
        NodeKind::Scalar { raw, .. } => raw.clone(),
        _ => String::new(),
    }
}

/// Walks `path` through an already-resolved [`Value`] tree (used for
/// imported modules and chained `param`/`local` lookups, where there is no
/// forward-reference concept since the source is fully resolved).
pub fn traverse_value(value: &Value, path: &[Token]) -> Option<Value> {
    let mut current = value.clone();
    for segment in path {
        current = step_value(&current, &segment.text)?;
    }
    Some(current)
}

fn step_value(value: &Value, segment: &str) -> Option<Value> {
    match value {
        Value::Map(map) => map.get(segment).cloned(),
        Value::Seq(items) => {
            if let Ok(index) = segment.parse::<usize>() {
                items.get(index).cloned()
            } else {
                items
                    .iter()
                    .find(|item| matches!(item, Value::String(s) if s == segment))
                    .cloned()
            }
        }
        Value::String(s) => {
            let index: usize = segment.parse().ok()?;
            s.chars().nth(index).map(|c| Value::String(c.to_string()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymc_ast::build_document;
    use ymc_span::Span;

    fn tok(text: &str) -> Token {
        Token {
            raw: text.to_string(),
            text: text.to_string(),
            quoted: false,
            span: Span::DUMMY,
        }
    }

    #[test]
    fn traverses_nested_map_keys() {
        let doc = build_document("a:\n  b: 1\n").expect("parses");
        let root = doc.root.expect("root");
        let target = traverse_ast(&doc, root, &[tok("a"), tok("b")]).expect("found");
        match &doc.get(target).kind {
            NodeKind::Scalar { raw, .. } => assert_eq!(raw, "1"),
            _ => panic!("expected scalar"),
        }
    }

    #[test]
    fn missing_key_is_an_error() {
        let doc = build_document("a: 1\n").expect("parses");
        let root = doc.root.expect("root");
        assert!(traverse_ast(&doc, root, &[tok("nope")]).is_none());
    }

    #[test]
    fn numeric_segment_indexes_sequence() {
        let doc = build_document("- x\n- y\n").expect("parses");
        let root = doc.root.expect("root");
        let target = traverse_ast(&doc, root, &[tok("1")]).expect("found");
        match &doc.get(target).kind {
            NodeKind::Scalar { raw, .. } => assert_eq!(raw, "y"),
            _ => panic!("expected scalar"),
        }
    }

    #[test]
    fn value_traversal_indexes_string_by_char() {
        let v = Value::String("abc".into());
        assert_eq!(step_value(&v, "1"), Some(Value::String("b".into())));
    }
}
