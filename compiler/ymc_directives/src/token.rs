use ymc_lexer_core::Literal;
use ymc_span::Span;

/// `RawToken<T>` from `SPEC_FULL.md` §3.2, specialised to the directive
/// scanner's literal value type.
#[derive(Clone, Debug, PartialEq)]
pub struct RawToken {
    /// The substring as it appears in source, escapes untouched.
    pub raw: String,
    /// Unquoted/unescaped text.
    pub text: String,
    /// Typed reading of `text` (string, number, boolean, null, undefined).
    pub value: Literal,
    pub quoted: bool,
    pub span: Span,
    /// True unless the token was a quoted string or bracket group left
    /// unterminated at end of line.
    pub terminated: bool,
}
