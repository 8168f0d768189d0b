//! Low-level scanning primitives shared by the directive scanner (C3) and
//! the scalar expression tokenizer (C4): a small char cursor, a balanced
//! bracket/quote reader that understands the shared escape rules, and the
//! conservative literal-type inference used to build `RawToken` values.

mod cursor;
mod escape;
mod literal;

pub use cursor::{read_balanced, Cursor};
pub use escape::unescape;
pub use literal::{infer_literal, Literal};
