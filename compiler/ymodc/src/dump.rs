//! Resolve-and-dump (`SPEC_FULL.md` §6.3): turns a resolved [`Value`] back
//! into a YAML document string. This is the one place outside `ymc_ast`
//! that touches the external YAML crate's types, and only its emitter side
//! — no parsing.

use yaml_rust2::yaml::Hash;
use yaml_rust2::{Yaml, YamlEmitter};

use ymc_ast::Value;

/// Dump options (`SPEC_FULL.md` §6.3): `sort_keys` re-orders map keys
/// lexicographically; otherwise each map dumps in the order the resolver
/// produced it (source order for an untouched module).
#[derive(Clone, Copy, Debug, Default)]
pub struct DumpOptions {
    pub sort_keys: bool,
}

pub fn dump_to_string(value: &Value, options: DumpOptions) -> String {
    let yaml = to_yaml(value, options);
    let mut out = String::new();
    let mut emitter = YamlEmitter::new(&mut out);
    // Writing into an owned `String` has no failure mode; a formatter error
    // here would indicate a bug in the emitter itself, not a runtime condition.
    let _ = emitter.dump(&yaml);
    out
}

fn to_yaml(value: &Value, options: DumpOptions) -> Yaml {
    match value {
        Value::Undefined | Value::Null => Yaml::Null,
        Value::Bool(b) => Yaml::Boolean(*b),
        Value::Int(i) => Yaml::Integer(*i),
        Value::Float(f) => Yaml::Real(format_float(*f)),
        Value::String(s) => Yaml::String(s.clone()),
        Value::Seq(items) => Yaml::Array(items.iter().map(|v| to_yaml(v, options)).collect()),
        Value::Map(map) => {
            let mut hash = Hash::new();
            if options.sort_keys {
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    hash.insert(Yaml::String(key.clone()), to_yaml(&map[key], options));
                }
            } else {
                for (key, val) in map {
                    hash.insert(Yaml::String(key.clone()), to_yaml(val, options));
                }
            }
            Yaml::Hash(hash)
        }
    }
}

/// `yaml_rust2::Yaml::Real` stores its value pre-formatted, matching the
/// convention its own parser uses when reading a float back in.
fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() {
        format!("{f:.1}")
    } else {
        f.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn dumps_scalar_map_in_source_order() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Int(2));
        map.insert("a".to_string(), Value::Int(1));
        let dumped = dump_to_string(&Value::Map(map), DumpOptions::default());
        let b_pos = dumped.find("b:").expect("has b");
        let a_pos = dumped.find("a:").expect("has a");
        assert!(b_pos < a_pos, "source order preserved: {dumped}");
    }

    #[test]
    fn sort_keys_orders_lexicographically() {
        let mut map = IndexMap::new();
        map.insert("b".to_string(), Value::Int(2));
        map.insert("a".to_string(), Value::Int(1));
        let dumped = dump_to_string(&Value::Map(map), DumpOptions { sort_keys: true });
        let b_pos = dumped.find("b:").expect("has b");
        let a_pos = dumped.find("a:").expect("has a");
        assert!(a_pos < b_pos, "sorted order: {dumped}");
    }

    #[test]
    fn undefined_dumps_as_null() {
        let dumped = dump_to_string(&Value::Undefined, DumpOptions::default());
        assert!(dumped.contains("null") || dumped.contains("~"));
    }
}
