//! The resolver (C7, `SPEC_FULL.md` §4.6): walks an unresolved
//! [`ymc_ast::Document`], evaluates `this`/`import`/`param`/`local`
//! expressions embedded in scalars, applies custom tag resolvers, and
//! strips `%PRIVATE` paths from the output.
//!
//! This crate knows nothing about the filesystem, the module cache, or the
//! dependency graph — `import.*` expressions are dispatched through the
//! [`ImportHost`] trait, which the entry driver (C8) implements.

mod context;
mod expr_eval;
mod node_resolve;
mod private;
mod scalar;
mod schema;
mod traverse;

pub use context::{ImportHost, NullImportHost, ResolveContext};
pub use expr_eval::{evaluate_expr, evaluate_scalar, literal_to_value};
pub use node_resolve::{resolve_document, resolve_node, ResolveOutcome};
pub use private::strip_private;
pub use scalar::yaml_scalar_value;
pub use schema::{Schema, TagKind, TagResolver};
pub use traverse::{traverse_ast, traverse_value};
