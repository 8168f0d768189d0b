use std::collections::HashMap;

use indexmap::IndexMap;
use ymc_ast::{NodeId, Value};
use ymc_diagnostic::DiagnosticQueue;
use ymc_directives::Directives;
use ymc_span::Span;

use crate::schema::Schema;

/// The driver-provided hook for resolving `import.<alias>...` expressions.
///
/// The resolver only tokenises and dispatches; it has no notion of a
/// filesystem, a sandbox, or a dependency graph. The entry driver (C8)
/// implements this trait to close the loop: sandbox-check the `%IMPORT`
/// path, register the edge in the dependency graph (detecting cycles),
/// and recursively run its own compile, pushing any resulting diagnostics
/// into `errors` under the module's `importedErrors`.
pub trait ImportHost {
    fn resolve_import(
        &mut self,
        alias: &str,
        args: IndexMap<String, Value>,
        span: Span,
        errors: &mut DiagnosticQueue,
    ) -> Value;
}

/// An [`ImportHost`] that treats every import as unresolved — useful for
/// testing the resolver in isolation from a driver.
#[derive(Default)]
pub struct NullImportHost;

impl ImportHost for NullImportHost {
    fn resolve_import(
        &mut self,
        _alias: &str,
        _args: IndexMap<String, Value>,
        _span: Span,
        _errors: &mut DiagnosticQueue,
    ) -> Value {
        Value::Undefined
    }
}

/// Per-document resolution state (`SPEC_FULL.md` §3.8, scoped to the part
/// owned by the resolver rather than the driver: cache/dependency graph
/// are the driver's concern, not this crate's).
pub struct ResolveContext<'a> {
    pub directives: &'a Directives,
    pub params: &'a IndexMap<String, Value>,
    pub universal_params: &'a IndexMap<String, Value>,
    pub schema: &'a Schema,
    pub ignore_tags: bool,
    pub host: &'a mut dyn ImportHost,

    /// Anchor id -> resolved value, populated as anchored nodes finish.
    pub(crate) anchors: HashMap<u64, Value>,
    /// Stack of `this(...)`-pushed locals frames, most recent last.
    pub(crate) locals: Vec<IndexMap<String, Value>>,
    /// Resolved value per node, populated as each node finishes.
    pub(crate) resolved: HashMap<NodeId, Value>,
    /// High-water mark of the highest `order_index` fully resolved so far.
    pub(crate) counter: u32,
    pub errors: DiagnosticQueue,
}

impl<'a> ResolveContext<'a> {
    pub fn new(
        directives: &'a Directives,
        params: &'a IndexMap<String, Value>,
        universal_params: &'a IndexMap<String, Value>,
        schema: &'a Schema,
        ignore_tags: bool,
        host: &'a mut dyn ImportHost,
    ) -> Self {
        ResolveContext {
            directives,
            params,
            universal_params,
            schema,
            ignore_tags,
            host,
            anchors: HashMap::new(),
            locals: Vec::new(),
            resolved: HashMap::new(),
            counter: 0,
            errors: DiagnosticQueue::new(),
        }
    }

    /// Looks up `local.<alias>`, searching pushed frames from most to
    /// least recent, flattening across the whole stack.
    pub(crate) fn find_local(&self, alias: &str) -> Option<&Value> {
        self.locals.iter().rev().find_map(|frame| frame.get(alias))
    }
}
