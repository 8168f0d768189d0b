use ymc_ast::{Document, Node, NodeId, NodeKind, Value};
use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_span::Span;

use crate::context::ResolveContext;
use crate::expr_eval::evaluate_scalar;
use crate::scalar::yaml_scalar_value;

/// Resolves one node and every node beneath it (`SPEC_FULL.md` §4.6.2):
/// aliases look up a previously-bound anchor, scalars run the expression
/// text layer and then (unless the result was a free expression, or the
/// scalar was quoted) fall back to YAML core-schema literal typing, and
/// maps/sequences resolve their children depth-first in source order.
///
/// Children are always resolved before their parent — and therefore before
/// the parent's own `order_index` is reachable by a `this.*` lookup, since
/// the bridge assigns container `order_index`s at their closing event —
/// which is what lets the single [`ResolveContext::counter`] high-water
/// mark double as the forward-reference gate without a per-node flag.
pub fn resolve_node(ctx: &mut ResolveContext<'_>, document: &Document, id: NodeId) -> Value {
    let node = document.get(id).clone();

    let value = match &node.kind {
        NodeKind::Alias { anchor_id } => match ctx.anchors.get(anchor_id) {
            Some(value) => value.clone(),
            None => {
                ctx.errors.push(Diagnostic::error(
                    ErrorCode::R001,
                    node.span,
                    "alias references an anchor that has not been defined",
                ));
                Value::Undefined
            }
        },
        NodeKind::Scalar { raw, quoted } => resolve_scalar(ctx, document, raw, *quoted, node.span),
        NodeKind::Map(pairs) => {
            let mut map = indexmap::IndexMap::new();
            for (key_id, value_id) in pairs {
                let key = resolve_node(ctx, document, *key_id);
                let value = resolve_node(ctx, document, *value_id);
                map.insert(key.interpolate_to_string(), value);
            }
            Value::Map(map)
        }
        NodeKind::Seq(items) => {
            let mut seq = Vec::with_capacity(items.len());
            for item_id in items {
                seq.push(resolve_node(ctx, document, *item_id));
            }
            Value::Seq(seq)
        }
    };

    let value = apply_tag(ctx, &node, value);

    if let Some(anchor_id) = node.anchor_id {
        ctx.anchors.insert(anchor_id, value.clone());
    }
    ctx.resolved.insert(id, value.clone());
    ctx.counter = ctx.counter.max(node.order_index);
    value
}

fn resolve_scalar(ctx: &mut ResolveContext<'_>, document: &Document, raw: &str, quoted: bool, span: Span) -> Value {
    let (template, parse_errors) = ymc_expr::parse_scalar_at(raw, span.start.offset());
    ctx.errors.extend(parse_errors);

    let value = evaluate_scalar(ctx, document, &template);
    if template.free_expr {
        return value;
    }
    match value {
        Value::String(s) if !quoted => yaml_scalar_value(&s, false),
        other => other,
    }
}

fn apply_tag(ctx: &mut ResolveContext<'_>, node: &Node, value: Value) -> Value {
    let Some(tag) = &node.tag else {
        return value;
    };
    if ctx.ignore_tags {
        return value;
    }
    let tag_text = tag.display();
    match ctx.schema.find(&tag_text) {
        Some(resolver) => match resolver.resolve(&value) {
            Ok(resolved) => resolved,
            Err(message) => {
                ctx.errors.push(Diagnostic::error(ErrorCode::R007, node.span, message));
                value
            }
        },
        None => {
            ctx.errors.push(Diagnostic::error(
                ErrorCode::R006,
                node.span,
                format!("unknown tag `{tag_text}`"),
            ));
            value
        }
    }
}

/// The outcome of resolving a whole document: the fully resolved tree, and
/// the tree with any `%PRIVATE` paths stripped, which is what a non-root
/// (imported) compile actually hands back to its importer.
pub struct ResolveOutcome {
    pub full: Value,
    pub public: Value,
}

pub fn resolve_document(document: &Document, ctx: &mut ResolveContext<'_>, apply_private: bool) -> ResolveOutcome {
    let Some(root) = document.root else {
        return ResolveOutcome {
            full: Value::Undefined,
            public: Value::Undefined,
        };
    };
    let full = resolve_node(ctx, document, root);
    let public = if apply_private {
        crate::private::strip_private(&full, ctx.directives, &mut ctx.errors)
    } else {
        full.clone()
    };
    ResolveOutcome { full, public }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use ymc_ast::build_document;
    use ymc_directives::Directives;

    use crate::context::NullImportHost;
    use crate::schema::Schema;

    fn fresh_context<'a>(
        directives: &'a Directives,
        params: &'a IndexMap<String, Value>,
        universal: &'a IndexMap<String, Value>,
        schema: &'a Schema,
        host: &'a mut NullImportHost,
    ) -> ResolveContext<'a> {
        ResolveContext::new(directives, params, universal, schema, false, host)
    }

    #[test]
    fn resolves_plain_scalar_literal_typing() {
        let doc = build_document("a: 1\nb: hello\n").expect("parses");
        let directives = Directives::default();
        let params = IndexMap::new();
        let universal = IndexMap::new();
        let schema = Schema::new();
        let mut host = NullImportHost;
        let mut ctx = fresh_context(&directives, &params, &universal, &schema, &mut host);
        let outcome = resolve_document(&doc, &mut ctx, false);
        let Value::Map(map) = outcome.full else { panic!("expected map") };
        assert_eq!(map.get("a"), Some(&Value::Int(1)));
        assert_eq!(map.get("b"), Some(&Value::String("hello".into())));
    }

    #[test]
    fn alias_resolves_to_anchors_value() {
        let doc = build_document("- &x 1\n- *x\n").expect("parses");
        let directives = Directives::default();
        let params = IndexMap::new();
        let universal = IndexMap::new();
        let schema = Schema::new();
        let mut host = NullImportHost;
        let mut ctx = fresh_context(&directives, &params, &universal, &schema, &mut host);
        let outcome = resolve_document(&doc, &mut ctx, false);
        let Value::Seq(items) = outcome.full else { panic!("expected seq") };
        assert_eq!(items[1], Value::Int(1));
    }

    #[test]
    fn quoted_scalar_stays_a_string() {
        let doc = build_document("\"42\"").expect("parses");
        let directives = Directives::default();
        let params = IndexMap::new();
        let universal = IndexMap::new();
        let schema = Schema::new();
        let mut host = NullImportHost;
        let mut ctx = fresh_context(&directives, &params, &universal, &schema, &mut host);
        let outcome = resolve_document(&doc, &mut ctx, false);
        assert_eq!(outcome.full, Value::String("42".into()));
    }
}
