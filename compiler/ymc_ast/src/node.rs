use ymc_span::Span;

/// Index into a [`crate::bridge::Document`]'s node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeId(pub u32);

/// A resolved `%TAG`/implicit YAML tag attached to a node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    pub handle: String,
    pub suffix: String,
}

impl Tag {
    /// The tag as it would be written back out, e.g. `!!str` or `!my!thing`.
    pub fn display(&self) -> String {
        format!("{}{}", self.handle, self.suffix)
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A scalar; `quoted` mirrors `RawToken::quoted` (`SPEC_FULL.md` §3.2):
    /// true for any non-plain style (single/double-quoted, literal, folded),
    /// meaning the value is already known to be a string and is exempt from
    /// the conservative literal-type inference applied to plain scalars.
    Scalar { raw: String, quoted: bool },
    Map(Vec<(NodeId, NodeId)>),
    Seq(Vec<NodeId>),
    /// References a previously-bound anchor by the underlying parser's
    /// anchor id (see `SPEC_FULL.md` §4.8 — the chosen YAML event parser
    /// resolves anchor *names* to numeric ids during scanning and does not
    /// re-expose the original name string).
    Alias { anchor_id: u64 },
}

/// One node of the unresolved document tree that the resolver (C7) walks.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub anchor_id: Option<u64>,
    pub tag: Option<Tag>,
    pub span: Span,
    /// Pre-order traversal index, assigned during bridging. Used by the
    /// resolver's forward-reference check in place of a per-node runtime
    /// "resolved" boolean (`SPEC_FULL.md` §9).
    pub order_index: u32,
}
