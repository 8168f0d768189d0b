use indexmap::IndexMap;
use std::fmt;

/// A fully (or partially) resolved value.
///
/// `Null` and `Undefined` are kept distinct throughout (per `SPEC_FULL.md`
/// §4.2 and the hashing invariants in §8): `Null` is an explicit YAML
/// `null`/`~`, `Undefined` is the absence of a value (a failed lookup, a
/// forward reference, a missing parameter with no default).
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Stringify for use inside an interpolated scalar (`SPEC_FULL.md` §4.6.4):
    /// strings pass through verbatim, everything else is JSON-serialised.
    pub fn interpolate_to_string(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            other => other.to_json().to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Seq(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// "Type" predicates used by the `as scalar|map|seq` annotation
    /// (`SPEC_FULL.md` §4.4.1, §4.6.3).
    pub fn matches_type_annotation(&self, annotation: &str) -> bool {
        match annotation {
            "scalar" => matches!(
                self,
                Value::Null | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_)
            ),
            "map" => matches!(self, Value::Map(_)),
            "seq" => matches!(self, Value::Seq(_)),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Seq(_) | Value::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_string_passes_through() {
        assert_eq!(Value::String("hi".into()).interpolate_to_string(), "hi");
    }

    #[test]
    fn interpolate_non_string_is_json() {
        assert_eq!(Value::Int(3).interpolate_to_string(), "3");
        assert_eq!(Value::Bool(true).interpolate_to_string(), "true");
    }

    #[test]
    fn undefined_and_null_are_distinct() {
        assert_ne!(Value::Undefined, Value::Null);
        assert!(Value::Undefined.is_undefined());
        assert!(!Value::Null.is_undefined());
    }

    #[test]
    fn type_annotation_matching() {
        assert!(Value::Int(1).matches_type_annotation("scalar"));
        assert!(!Value::Int(1).matches_type_annotation("map"));
        assert!(Value::Seq(vec![]).matches_type_annotation("seq"));
    }
}
