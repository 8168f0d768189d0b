//! The scalar expression tokenizer (C4, `SPEC_FULL.md` §4.4): four nested
//! layers — text, expression, arguments, key/value — over a single scalar
//! string. Each layer's tokens carry positions relative to its parent and
//! are rebased to absolute source offsets as they're produced.
//!
//! This crate only tokenises; it has no opinion on whether `this`/`import`/
//! `param`/`local` is a valid base, or what a path segment resolves to —
//! that's the resolver's job (C7).

mod args;
mod ast;
mod expr;
mod text;
mod token;
mod util;

pub use ast::{Arg, ScalarTemplate, TemplatePart, ExprNode};
pub use text::{parse_scalar, parse_scalar_at};
pub use token::Token;
