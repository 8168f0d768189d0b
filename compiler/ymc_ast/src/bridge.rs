//! Builds an unresolved [`Document`] from a low-level YAML 1.2 event stream.
//!
//! Per `SPEC_FULL.md` §4.8, this is the only place in the workspace that
//! depends on the external YAML crate. The event parser resolves
//! anchors/aliases to numeric ids and scalar tags during scanning; we keep
//! both on the node rather than flattening aliases away, since forward
//! visibility of anchors is enforced by the resolver, not the parser.

use std::collections::HashMap;

use yaml_rust2::parser::{Event, EventReceiver, Parser};
use yaml_rust2::scanner::{Marker, ScanError, TScalarStyle, TokenType};

use ymc_span::Span;

use crate::node::{Node, NodeId, NodeKind, Tag};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("YAML scan error at {0}")]
    Scan(#[from] ScanError),
    #[error("document has no root node")]
    EmptyDocument,
}

/// An unresolved document: a flat arena of [`Node`]s plus the root.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub root: Option<NodeId>,
}

impl Document {
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }
}

fn marker_offset(mark: Marker) -> u32 {
    mark.index() as u32
}

fn convert_tag(tok: Option<TokenType>) -> Option<Tag> {
    match tok {
        Some(TokenType::Tag(handle, suffix)) => Some(Tag { handle, suffix }),
        _ => None,
    }
}

fn anchor_opt(aid: usize) -> Option<u64> {
    if aid == 0 {
        None
    } else {
        Some(aid as u64)
    }
}

enum Partial {
    Seq {
        anchor_id: Option<u64>,
        tag: Option<Tag>,
        start: u32,
        items: Vec<NodeId>,
    },
    Map {
        anchor_id: Option<u64>,
        tag: Option<Tag>,
        start: u32,
        pending_key: Option<NodeId>,
        pairs: Vec<(NodeId, NodeId)>,
    },
}

struct Builder {
    arena: Vec<Node>,
    stack: Vec<Partial>,
    order_counter: u32,
    root: Option<NodeId>,
}

impl Builder {
    fn new() -> Self {
        Builder {
            arena: Vec::new(),
            stack: Vec::new(),
            order_counter: 0,
            root: None,
        }
    }

    fn push_node(&mut self, kind: NodeKind, anchor_id: Option<u64>, tag: Option<Tag>, span: Span) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        let order_index = self.order_counter;
        self.order_counter += 1;
        self.arena.push(Node {
            kind,
            anchor_id,
            tag,
            span,
            order_index,
        });
        self.attach(id);
        id
    }

    fn attach(&mut self, id: NodeId) {
        match self.stack.last_mut() {
            None => self.root = Some(id),
            Some(Partial::Seq { items, .. }) => items.push(id),
            Some(Partial::Map {
                pending_key, pairs, ..
            }) => {
                if let Some(key) = pending_key.take() {
                    pairs.push((key, id));
                } else {
                    *pending_key = Some(id);
                }
            }
        }
    }

    fn finish(self) -> Document {
        Document {
            nodes: self.arena,
            root: self.root,
        }
    }
}

impl EventReceiver for Builder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        let offset = marker_offset(mark);
        match ev {
            Event::Nothing
            | Event::StreamStart
            | Event::StreamEnd
            | Event::DocumentStart
            | Event::DocumentEnd => {}
            Event::Alias(aid) => {
                self.push_node(
                    NodeKind::Alias {
                        anchor_id: aid as u64,
                    },
                    None,
                    None,
                    Span::at(offset),
                );
            }
            Event::Scalar(text, style, aid, tag) => {
                let quoted = style != TScalarStyle::Plain;
                self.push_node(
                    NodeKind::Scalar { raw: text, quoted },
                    anchor_opt(aid),
                    convert_tag(tag),
                    Span::at(offset),
                );
            }
            Event::SequenceStart(aid, tag) => {
                self.stack.push(Partial::Seq {
                    anchor_id: anchor_opt(aid),
                    tag: convert_tag(tag),
                    start: offset,
                    items: Vec::new(),
                });
            }
            Event::SequenceEnd => {
                if let Some(Partial::Seq {
                    anchor_id,
                    tag,
                    start,
                    items,
                }) = self.stack.pop()
                {
                    self.push_node(
                        NodeKind::Seq(items),
                        anchor_id,
                        tag,
                        Span::new(start, offset),
                    );
                }
            }
            Event::MappingStart(aid, tag) => {
                self.stack.push(Partial::Map {
                    anchor_id: anchor_opt(aid),
                    tag: convert_tag(tag),
                    start: offset,
                    pending_key: None,
                    pairs: Vec::new(),
                });
            }
            Event::MappingEnd => {
                if let Some(Partial::Map {
                    anchor_id,
                    tag,
                    start,
                    pairs,
                    ..
                }) = self.stack.pop()
                {
                    self.push_node(
                        NodeKind::Map(pairs),
                        anchor_id,
                        tag,
                        Span::new(start, offset),
                    );
                }
            }
        }
    }
}

/// Parse one YAML document body (directives already stripped by the caller)
/// into an unresolved [`Document`].
pub fn build_document(source: &str) -> Result<Document, BridgeError> {
    let mut parser = Parser::new(source.chars());
    let mut builder = Builder::new();
    parser.load(&mut builder, false)?;
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    #[test]
    fn scalar_document() {
        let doc = build_document("hello").expect("parses");
        let root = doc.root.expect("has root");
        match &doc.get(root).kind {
            NodeKind::Scalar { raw, quoted } => {
                assert_eq!(raw, "hello");
                assert!(!quoted);
            }
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn mapping_preserves_order() {
        let doc = build_document("b: 1\na: 2\n").expect("parses");
        let root = doc.root.expect("has root");
        match &doc.get(root).kind {
            NodeKind::Map(pairs) => {
                assert_eq!(pairs.len(), 2);
                let NodeKind::Scalar { raw: k0, .. } = &doc.get(pairs[0].0).kind else {
                    panic!("expected scalar key")
                };
                assert_eq!(k0, "b");
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn anchor_and_alias_share_identity() {
        let doc = build_document("- &x 1\n- *x\n").expect("parses");
        let root = doc.root.expect("has root");
        let NodeKind::Seq(items) = &doc.get(root).kind else {
            panic!("expected seq")
        };
        assert_eq!(items.len(), 2);
        let anchored = doc.get(items[0]);
        assert!(anchored.anchor_id.is_some());
        let NodeKind::Alias { anchor_id } = &doc.get(items[1]).kind else {
            panic!("expected alias")
        };
        assert_eq!(Some(*anchor_id), anchored.anchor_id);
    }

    #[test]
    fn quoted_scalar_is_marked() {
        let doc = build_document("\"1\"").expect("parses");
        let root = doc.root.expect("has root");
        let NodeKind::Scalar { quoted, .. } = &doc.get(root).kind else {
            panic!("expected scalar")
        };
        assert!(quoted);
    }
}
