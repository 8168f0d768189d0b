//! Stable hashing (C2, `SPEC_FULL.md` §4.2): `hash_string` is a plain
//! SHA-256 hex digest; `hash_params` stably stringifies a parameter map by
//! sorting keys lexicographically at every level before hashing, so that
//! equal maps hash equal regardless of insertion order.

use indexmap::IndexMap;
use sha2::{Digest, Sha256};
use ymc_ast::Value;

pub fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex(&hasher.finalize())
}

/// Hash a parameter map, treating `None` (undefined params) as the
/// distinguished "pure" entry (`SPEC_FULL.md` §4.5.1).
pub fn hash_params(params: Option<&IndexMap<String, Value>>) -> String {
    let canonical = match params {
        None => canonical_string(&Value::Map(IndexMap::new())),
        Some(map) => canonical_string(&Value::Map(map.clone())),
    };
    hash_string(&canonical)
}

/// Stably stringifies a value: object keys are sorted lexicographically at
/// every nesting level so insertion order never affects the hash. This is
/// deliberately a bespoke format (not JSON) so that `Undefined` and `Null`
/// -- which JSON cannot distinguish -- hash differently, per the invariant
/// in `SPEC_FULL.md` §8 item 2.
fn canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Undefined => out.push_str("u:"),
        Value::Null => out.push_str("n:"),
        Value::Bool(b) => out.push_str(&format!("b:{b}")),
        Value::Int(i) => out.push_str(&format!("i:{i}")),
        Value::Float(x) => out.push_str(&format!("f:{x}")),
        Value::String(s) => out.push_str(&format!("s:{}:{}", s.len(), s)),
        Value::Seq(items) => {
            out.push('[');
            for item in items {
                write_canonical(item, out);
                out.push(',');
            }
            out.push(']');
        }
        Value::Map(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for key in keys {
                out.push_str(&format!("{}:{}=", key.len(), key));
                write_canonical(&map[key], out);
                out.push(',');
            }
            out.push('}');
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        s.push_str(&format!("{b:02x}"));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn hash_string_is_deterministic() {
        assert_eq!(hash_string("hello"), hash_string("hello"));
        assert_ne!(hash_string("hello"), hash_string("world"));
    }

    #[test]
    fn hash_params_ignores_insertion_order() {
        let a = map(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        let b = map(&[("b", Value::Int(2)), ("a", Value::Int(1))]);
        assert_eq!(hash_params(Some(&a)), hash_params(Some(&b)));
    }

    #[test]
    fn hash_params_distinguishes_types() {
        let a = map(&[("a", Value::Int(1))]);
        let b = map(&[("a", Value::String("1".to_string()))]);
        assert_ne!(hash_params(Some(&a)), hash_params(Some(&b)));
    }

    #[test]
    fn undefined_and_null_hash_differently() {
        let a = map(&[("a", Value::Undefined)]);
        let b = map(&[("a", Value::Null)]);
        assert_ne!(hash_params(Some(&a)), hash_params(Some(&b)));
    }

    #[test]
    fn none_equals_empty_map() {
        let empty: IndexMap<String, Value> = IndexMap::new();
        assert_eq!(hash_params(None), hash_params(Some(&empty)));
    }

    #[test]
    fn nested_maps_sort_at_every_level() {
        let inner_a = map(&[("x", Value::Int(1)), ("y", Value::Int(2))]);
        let inner_b = map(&[("y", Value::Int(2)), ("x", Value::Int(1))]);
        let a = map(&[("outer", Value::Map(inner_a))]);
        let b = map(&[("outer", Value::Map(inner_b))]);
        assert_eq!(hash_params(Some(&a)), hash_params(Some(&b)));
    }
}
