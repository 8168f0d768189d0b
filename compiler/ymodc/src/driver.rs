//! The entry driver (C8, `SPEC_FULL.md` §4.7): ties the sandbox, the
//! directive scanner, the YAML event bridge, the resolver, the module
//! cache, and the dependency graph together into one recursive compile.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use indexmap::IndexMap;

use ymc_ast::{build_document, Document, Value};
use ymc_cache::ModuleCache;
use ymc_diagnostic::{decorate, Diagnostic, DiagnosticQueue, ErrorCode};
use ymc_directives::{scan_directives, Directives};
use ymc_graph::DependencyGraph;
use ymc_hash::{hash_params, hash_string};
use ymc_resolve::{literal_to_value, ImportHost, ResolveContext, Schema};
use ymc_span::{LineIndex, Span};

use crate::options::{CompileOptions, IgnorePrivate};
use crate::sandbox::{resolve_relative, verify_path};

/// Bucket key used for the parsed-module cache, which (unlike the resolved
/// cache) doesn't vary by parameter hash — every param binding shares the
/// same directives/AST for a given source.
const PARSED_KEY: &str = "ast";

struct ParsedModule {
    directives: Directives,
    document: Document,
}

struct ResolvedEntry {
    value: Value,
    errors: Vec<Diagnostic>,
}

/// Shared state for one outermost compile (`SPEC_FULL.md` §3.8): the
/// module cache and dependency graph live here, reused across every import
/// reached from the entry module, and (for the live loader) across many
/// successive recompiles.
#[derive(Default)]
pub struct CompileState {
    parsed: ModuleCache<Rc<ParsedModule>>,
    resolved: ModuleCache<Rc<ResolvedEntry>>,
    graph: DependencyGraph,
}

impl CompileState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases cache entries for any module no longer reachable from a
    /// live entry point (`SPEC_FULL.md` §4.5.3). Called after every
    /// top-level compile, and on a timer by a long-running live loader.
    pub fn purge(&mut self, removed_entry_points: Option<&[PathBuf]>) -> Vec<PathBuf> {
        let removed = self.graph.purge(removed_entry_points);
        for path in &removed {
            self.parsed.remove_path(path);
            self.resolved.remove_path(path);
        }
        removed
    }

    pub fn reset(&mut self) {
        self.parsed.reset();
        self.resolved.reset();
        self.graph.reset();
    }

    /// Every module path currently reachable from a live entry point — the
    /// set the live loader (C11) should be watching.
    pub fn dependency_paths(&self) -> Vec<PathBuf> {
        self.graph.paths()
    }
}

/// The result of one top-level [`compile`] call.
pub struct CompileOutput {
    pub value: Value,
    pub errors: Vec<Diagnostic>,
}

impl CompileOutput {
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Diagnostic::is_error)
    }
}

/// Compiles `options.filepath` against a fresh [`CompileState`]
/// (`SPEC_FULL.md` §6.1). Use [`compile_with_state`] instead when a state
/// should persist across calls, e.g. in the live loader (C11).
pub fn compile(options: &CompileOptions) -> CompileOutput {
    let mut state = CompileState::new();
    compile_with_state(&mut state, options)
}

/// Compiles `options.filepath` against a caller-owned, possibly reused
/// [`CompileState`], then purges unreachable cache entries.
pub fn compile_with_state(state: &mut CompileState, options: &CompileOptions) -> CompileOutput {
    let fallback_filename = options.fallback_filename();
    let ignore_private = options.normalize_ignore_private(&fallback_filename);
    let result = compile_module(ModuleCall {
        state,
        canonical_hint: &options.filepath,
        base_path: &options.base_path,
        unsafe_mode: options.unsafe_mode,
        filename_hint: &fallback_filename,
        params: &options.params,
        universal_params: &options.universal_params,
        ignore_tags: options.ignore_tags,
        schema: &options.schema,
        ignore_private: &ignore_private,
        is_root: true,
    });
    state.purge(None);
    CompileOutput {
        value: result.value,
        errors: result.errors,
    }
}

struct ModuleResult {
    value: Value,
    errors: Vec<Diagnostic>,
}

/// Bundles a recursive [`compile_module`] call's arguments; the struct
/// exists purely so the (necessarily numerous) parameters don't have to be
/// threaded positionally through every recursive call site.
struct ModuleCall<'a> {
    state: &'a mut CompileState,
    canonical_hint: &'a Path,
    base_path: &'a Path,
    unsafe_mode: bool,
    filename_hint: &'a str,
    params: &'a IndexMap<String, Value>,
    universal_params: &'a IndexMap<String, Value>,
    ignore_tags: bool,
    schema: &'a Schema,
    ignore_private: &'a IgnorePrivate,
    is_root: bool,
}

fn compile_module(call: ModuleCall<'_>) -> ModuleResult {
    let ModuleCall {
        state,
        canonical_hint,
        base_path,
        unsafe_mode,
        filename_hint,
        params,
        universal_params,
        ignore_tags,
        schema,
        ignore_private,
        is_root,
    } = call;

    let mut errors = Vec::new();

    let verified = match verify_path(canonical_hint, base_path, unsafe_mode, Span::DUMMY) {
        Ok(v) => v,
        Err(mut diag) => {
            decorate(&mut diag, filename_hint, &canonical_hint.to_string_lossy(), &LineIndex::new(""));
            errors.push(diag);
            return ModuleResult {
                value: Value::Undefined,
                errors,
            };
        }
    };
    let canonical = verified.canonical;
    let current_dir = canonical.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    state.graph.add_dep(canonical.clone(), is_root);

    let source = match std::fs::read_to_string(&canonical) {
        Ok(s) => s,
        Err(err) => {
            let mut diag = Diagnostic::error(
                ErrorCode::S001,
                Span::DUMMY,
                format!("failed to read `{}`: {err}", canonical.display()),
            );
            decorate(&mut diag, filename_hint, &canonical.to_string_lossy(), &LineIndex::new(""));
            errors.push(diag);
            return ModuleResult {
                value: Value::Undefined,
                errors,
            };
        }
    };
    let line_index = LineIndex::new(&source);
    let source_hash = hash_string(&source);
    let path_str = canonical.to_string_lossy().into_owned();

    let parsed = match state.parsed.get(&canonical, PARSED_KEY, &source_hash).cloned() {
        Some(parsed) => parsed,
        None => {
            let (directives, offset) = scan_directives(&source);
            let body = &source[offset as usize..];
            let document = match build_document(body) {
                // `build_document` only ever sees the body slice, so every
                // node span it assigns is relative to `offset`, not to the
                // full source `decorate` measures against. Rebase once here
                // so every diagnostic downstream (resolver, expressions,
                // private-filter) shares the same absolute coordinate space
                // as directive diagnostics.
                Ok(mut document) => {
                    for node in &mut document.nodes {
                        node.span = node.span.rebase(offset);
                    }
                    document
                }
                Err(err) => {
                    let mut diag = Diagnostic::error(ErrorCode::I001, Span::DUMMY, format!("YAML parse error: {err}"));
                    decorate(&mut diag, filename_hint, &path_str, &line_index);
                    errors.push(diag);
                    Document::default()
                }
            };
            let parsed = Rc::new(ParsedModule { directives, document });
            state
                .parsed
                .insert(canonical.clone(), PARSED_KEY.to_string(), source_hash.clone(), Rc::clone(&parsed));
            parsed
        }
    };

    let filename = effective_filename(&parsed.directives, filename_hint);
    for diag in parsed.directives.errors.iter().cloned() {
        let mut diag = diag;
        decorate(&mut diag, &filename, &path_str, &line_index);
        errors.push(diag);
    }

    // Pre-load every %IMPORT in directive order, using only its declared
    // defaults, so cycles and nested errors surface even if `import.*` is
    // never actually referenced in this module's body (SPEC_FULL.md §4.7).
    for import_directive in &parsed.directives.import {
        let target = resolve_relative(&current_dir, &import_directive.path.text);
        let verified = match verify_path(&target, base_path, unsafe_mode, import_directive.base.span) {
            Ok(v) => v,
            Err(mut diag) => {
                decorate(&mut diag, &filename, &path_str, &line_index);
                errors.push(diag);
                continue;
            }
        };
        if let Some(cycle) = state.graph.bind_paths(&canonical, &verified.canonical) {
            let mut diag = Diagnostic::error(ErrorCode::D007, import_directive.base.span, format!("circular import: {}", format_cycle(&cycle)));
            decorate(&mut diag, &filename, &path_str, &line_index);
            errors.push(diag);
            continue;
        }
        let default_params: IndexMap<String, Value> = import_directive
            .params
            .iter()
            .map(|(key, param)| (key.clone(), literal_to_value(&param.value.value)))
            .collect();
        let preload = compile_module(ModuleCall {
            state,
            canonical_hint: &verified.canonical,
            base_path,
            unsafe_mode,
            filename_hint: &import_directive.alias.text,
            params: &default_params,
            universal_params,
            ignore_tags,
            schema,
            ignore_private,
            is_root: false,
        });
        errors.extend(preload.errors);
    }

    let params_hash = hash_params(Some(params));
    if let Some(entry) = state.resolved.get(&canonical, &params_hash, &source_hash).cloned() {
        errors.extend(entry.errors.iter().cloned());
        return ModuleResult {
            value: entry.value.clone(),
            errors,
        };
    }

    let apply_private = should_apply_private(ignore_private, &filename);
    let (value, resolver_errors) = {
        let mut host = DriverHost {
            state,
            base_path,
            unsafe_mode,
            current_dir: current_dir.clone(),
            current_canonical: canonical.clone(),
            universal_params,
            ignore_tags,
            schema,
            ignore_private,
            directives: &parsed.directives,
        };
        let mut ctx = ResolveContext::new(&parsed.directives, params, universal_params, schema, ignore_tags, &mut host);
        let outcome = ymc_resolve::resolve_document(&parsed.document, &mut ctx, apply_private);
        (outcome.public, ctx.errors.into_vec())
    };

    let mut decorated_resolver_errors = Vec::with_capacity(resolver_errors.len());
    for mut diag in resolver_errors {
        decorate(&mut diag, &filename, &path_str, &line_index);
        decorated_resolver_errors.push(diag);
    }

    state.resolved.insert(
        canonical,
        params_hash,
        source_hash,
        Rc::new(ResolvedEntry {
            value: value.clone(),
            errors: decorated_resolver_errors.clone(),
        }),
    );

    errors.extend(decorated_resolver_errors);
    ModuleResult { value, errors }
}

/// Drives `import.<alias>...` expressions (`SPEC_FULL.md` §4.6.3) back into
/// this crate's sandbox + cache + dependency graph, closing the loop that
/// `ymc_resolve` deliberately leaves as a trait boundary.
struct DriverHost<'a> {
    state: &'a mut CompileState,
    base_path: &'a Path,
    unsafe_mode: bool,
    current_dir: PathBuf,
    current_canonical: PathBuf,
    universal_params: &'a IndexMap<String, Value>,
    ignore_tags: bool,
    schema: &'a Schema,
    ignore_private: &'a IgnorePrivate,
    directives: &'a Directives,
}

impl ImportHost for DriverHost<'_> {
    fn resolve_import(&mut self, alias: &str, args: IndexMap<String, Value>, span: Span, errors: &mut DiagnosticQueue) -> Value {
        let Some(import_directive) = self.directives.find_import(alias) else {
            return Value::Undefined;
        };
        let target = resolve_relative(&self.current_dir, &import_directive.path.text);
        let verified = match verify_path(&target, self.base_path, self.unsafe_mode, span) {
            Ok(v) => v,
            Err(diag) => {
                errors.push(diag);
                return Value::Undefined;
            }
        };
        if let Some(cycle) = self.state.graph.bind_paths(&self.current_canonical, &verified.canonical) {
            errors.push(Diagnostic::error(ErrorCode::D007, span, format!("circular import: {}", format_cycle(&cycle))));
            return Value::Undefined;
        }

        let result = compile_module(ModuleCall {
            state: self.state,
            canonical_hint: &verified.canonical,
            base_path: self.base_path,
            unsafe_mode: self.unsafe_mode,
            filename_hint: &import_directive.alias.text,
            params: &args,
            universal_params: self.universal_params,
            ignore_tags: self.ignore_tags,
            schema: self.schema,
            ignore_private: self.ignore_private,
            is_root: false,
        });
        errors.extend(result.errors);
        result.value
    }
}

fn effective_filename(directives: &Directives, fallback: &str) -> String {
    directives
        .filename
        .iter()
        .find(|f| f.base.valid)
        .map(|f| f.name.text.clone())
        .unwrap_or_else(|| fallback.to_string())
}

/// `policy` is expected to already be normalized (`CompileOptions::normalize_ignore_private`)
/// before it reaches `compile_module`, so `IgnorePrivate::Current` never appears here.
fn should_apply_private(policy: &IgnorePrivate, filename: &str) -> bool {
    match policy {
        IgnorePrivate::All => true,
        IgnorePrivate::Current => false,
        IgnorePrivate::Named(names) => names.iter().any(|name| name == filename),
    }
}

fn format_cycle(cycle: &[PathBuf]) -> String {
    cycle.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_module(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).expect("create");
        file.write_all(contents.as_bytes()).expect("write");
        path
    }

    #[test]
    fn params_with_default_and_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_module(&dir, "s1.yaml", "%PARAM name world\ngreeting: Hello ${param.name}!\n");

        let options = CompileOptions::new(path.clone());
        let output = compile(&options);
        let Value::Map(map) = output.value else { panic!("expected map") };
        assert_eq!(map.get("greeting"), Some(&Value::String("Hello world!".into())));

        let mut with_override = CompileOptions::new(path);
        with_override.params.insert("name".to_string(), Value::String("Alice".into()));
        let output = compile(&with_override);
        let Value::Map(map) = output.value else { panic!("expected map") };
        assert_eq!(map.get("greeting"), Some(&Value::String("Hello Alice!".into())));
    }

    #[test]
    fn imports_bind_params_across_modules() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_module(&dir, "a.yaml", "%PARAM who you\nmsg: hi ${param.who}\n");
        let b = write_module(&dir, "b.yaml", "%IMPORT A ./a.yaml who=team\ntop: ${import.A.msg}\n");

        let options = CompileOptions::new(b);
        let output = compile(&options);
        let Value::Map(map) = output.value else { panic!("expected map") };
        assert_eq!(map.get("top"), Some(&Value::String("hi team".into())));
    }

    #[test]
    fn private_filtering_hides_current_module_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_module(&dir, "s3.yaml", "%PRIVATE secrets\nkeep: 1\nsecrets:\n  token: abcd\n");

        let mut hidden = CompileOptions::new(path.clone());
        hidden.ignore_private = IgnorePrivate::Current;
        let output = compile(&hidden);
        let Value::Map(map) = output.value else { panic!("expected map") };
        assert!(!map.contains_key("secrets"));

        let visible = CompileOptions::new(path);
        let output = compile(&visible);
        let Value::Map(map) = output.value else { panic!("expected map") };
        assert!(map.contains_key("secrets"));
    }

    #[test]
    fn circular_import_is_reported_not_infinite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let x = write_module(&dir, "x.yaml", "%IMPORT Y ./y.yaml\nv: ${import.Y.v}\n");
        write_module(&dir, "y.yaml", "%IMPORT X ./x.yaml\nv: ${import.X.v}\n");

        let options = CompileOptions::new(x);
        let output = compile(&options);
        assert!(output.errors.iter().any(|e| e.code == ErrorCode::D007));
    }

    #[test]
    fn forward_reference_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_module(&dir, "s5.yaml", "a: ${this.b}\nb: 1\n");

        let options = CompileOptions::new(path);
        let output = compile(&options);
        assert!(output.errors.iter().any(|e| e.code == ErrorCode::R002));
        let Value::Map(map) = output.value else { panic!("expected map") };
        assert_eq!(map.get("b"), Some(&Value::Int(1)));
    }

    #[test]
    fn sandbox_violation_blocks_the_import_without_reading_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sub = dir.path().join("proj");
        std::fs::create_dir(&sub).expect("mkdir");
        write_module(&dir, "passwd.yaml", "secret: true\n");
        let entry = write_module(&dir, "proj/entry.yaml", "%IMPORT Leak ../passwd.yaml\nv: ${import.Leak.secret}\n");

        let mut options = CompileOptions::new(entry);
        options.base_path = sub;
        let output = compile(&options);
        assert!(output.errors.iter().any(|e| e.code == ErrorCode::S003));
    }

    #[test]
    fn diagnostic_line_col_is_relative_to_the_full_source_not_the_body() {
        let dir = tempfile::tempdir().expect("tempdir");
        // The directive region pushes the document body to line 2: a
        // diagnostic raised while resolving `this.b` must land on line 2
        // of the full source, not line 1 of the post-directive body slice.
        let path = write_module(&dir, "s6.yaml", "%PARAM x 1\na: ${this.b}\nb: 2\n");

        let options = CompileOptions::new(path);
        let output = compile(&options);
        let diagnostic = output
            .errors
            .iter()
            .find(|e| e.code == ErrorCode::R002)
            .expect("forward reference is reported");
        let ((start_line, _), _) = diagnostic.line_col.expect("decorated");
        assert_eq!(start_line, 2);
    }
}
