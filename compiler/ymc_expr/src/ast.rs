use ymc_span::Span;

use crate::token::Token;

/// One piece of a scalar's text layer: either verbatim text or an embedded
/// expression (`SPEC_FULL.md` §4.4.1).
#[derive(Clone, Debug, PartialEq)]
pub enum TemplatePart {
    Literal(String, Span),
    Expr(ExprNode),
}

/// The parsed form of one scalar string. `free_expr` is set when the whole
/// scalar was a bare `$Expr` rather than zero or more interpolations; in
/// that mode `parts` holds exactly one `Expr` part.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ScalarTemplate {
    pub parts: Vec<TemplatePart>,
    pub free_expr: bool,
}

impl ScalarTemplate {
    pub fn is_plain_text(&self) -> bool {
        !self.free_expr && self.parts.iter().all(|p| matches!(p, TemplatePart::Literal(..)))
    }
}

/// One `Base ( "." Path )* [ "(" Args ")" ] [ WS Type ]` expression.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprNode {
    pub base: Token,
    pub path: Vec<Token>,
    pub args: Option<Vec<Arg>>,
    pub type_annotation: Option<Token>,
    pub span: Span,
}

/// One `key=value` pair inside an expression's argument list. The value is
/// itself a scalar template, since `Value := Text` allows interpolation.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub key: Token,
    pub value: ScalarTemplate,
    pub span: Span,
}
