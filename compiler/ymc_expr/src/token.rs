use ymc_span::Span;

/// A bareword or quoted identifier read by the expression layer —
/// a base, a path segment, an argument key, or a type keyword.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub raw: String,
    pub text: String,
    pub quoted: bool,
    pub span: Span,
}
