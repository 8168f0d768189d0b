//! The resolved value tree, the unresolved document AST, and the bridge
//! that builds the latter from a low-level YAML 1.2 event stream.
//!
//! Per `SPEC_FULL.md` §4.8 (C9), this crate is the only one allowed to
//! depend on the external YAML parsing crate; everything downstream of the
//! resolver only ever sees [`Node`] and [`Value`].

mod bridge;
mod node;
mod value;

pub use bridge::{build_document, BridgeError, Document};
pub use node::{Node, NodeId, NodeKind, Tag};
pub use value::Value;
