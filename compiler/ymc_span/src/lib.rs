//! Source positions for the YAML module compiler.
//!
//! Every token and diagnostic carries an absolute byte range into the
//! module source (see `SPEC_FULL.md` §3.1), plus an optional line/column
//! pair derived from a per-module [`LineIndex`].

mod line_index;
mod position;

pub use line_index::LineIndex;
pub use position::{LineCol, Position, Span};
