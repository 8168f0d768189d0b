use indexmap::IndexMap;

use ymc_diagnostic::{Diagnostic, DiagnosticQueue};
use ymc_span::Span;

use crate::token::RawToken;

/// Fields shared by every directive variant (`SPEC_FULL.md` §3.3).
#[derive(Clone, Debug)]
pub struct DirectiveBase {
    /// The leading `%KEYWORD` token, uppercased form used for dispatch.
    pub keyword: RawToken,
    /// The directive's full source span, keyword through last token.
    pub span: Span,
    /// False once any validation rule for this directive has failed.
    pub valid: bool,
}

impl DirectiveBase {
    fn new(keyword: RawToken, span: Span) -> Self {
        Self {
            keyword,
            span,
            valid: true,
        }
    }
}

/// `%FILENAME <name>` — binds the logical name used in diagnostics and
/// cache keys for this module (`SPEC_FULL.md` §3.3, §4.3 item 3).
#[derive(Clone, Debug)]
pub struct FilenameDirective {
    pub base: DirectiveBase,
    pub name: RawToken,
}

/// `%YAML <version>` — declares the YAML minor version this module expects.
#[derive(Clone, Debug)]
pub struct YamlDirective {
    pub base: DirectiveBase,
    pub version: RawToken,
}

/// `%TAG <handle> <prefix>` — registers a custom tag handle.
#[derive(Clone, Debug)]
pub struct TagDirective {
    pub base: DirectiveBase,
    pub handle: RawToken,
    pub prefix: RawToken,
}

/// `%PARAM <alias> [scalar|map|seq] [<default>]` — a caller-supplied
/// binding, optionally typed, optionally defaulted.
#[derive(Clone, Debug)]
pub struct ParamDirective {
    pub base: DirectiveBase,
    pub alias: RawToken,
    pub ty: Option<RawToken>,
    pub default: Option<RawToken>,
}

/// `%LOCAL <alias> [scalar|map|seq] [<default>]` — same shape as
/// [`ParamDirective`] but scoped to this module alone; kept as its own
/// type rather than a reuse so the resolver's alias tables stay distinct
/// per `SPEC_FULL.md` §3.5/§4.6.
#[derive(Clone, Debug)]
pub struct LocalDirective {
    pub base: DirectiveBase,
    pub alias: RawToken,
    pub ty: Option<RawToken>,
    pub default: Option<RawToken>,
}

/// One `key=value` argument to `%IMPORT`.
#[derive(Clone, Debug)]
pub struct ImportParamValue {
    pub key: RawToken,
    pub equal_span: Span,
    pub value: RawToken,
}

/// `%IMPORT <alias> <path> [key=value ...]` — binds `alias` to the module
/// at `path`, pre-supplying its `%PARAM`s. Path sandboxing and dependency
/// graph registration happen in the driver (C8), not here.
#[derive(Clone, Debug)]
pub struct ImportDirective {
    pub base: DirectiveBase,
    pub alias: RawToken,
    pub path: RawToken,
    pub params: IndexMap<String, ImportParamValue>,
}

/// `%PRIVATE <dotted.path> ...` — one or more dotted paths to strip from
/// the resolved output before it is returned (`SPEC_FULL.md` §4.6 step 6).
#[derive(Clone, Debug)]
pub struct PrivateDirective {
    pub base: DirectiveBase,
    pub paths: Vec<PrivatePath>,
}

/// A single dotted path argument to `%PRIVATE`, already split on `.`.
#[derive(Clone, Debug)]
pub struct PrivatePath {
    pub token: RawToken,
    pub segments: Vec<String>,
}

/// All directives scanned from one module's directive region, plus any
/// diagnostics raised while scanning or validating them.
#[derive(Default)]
pub struct Directives {
    pub filename: Vec<FilenameDirective>,
    pub yaml: Vec<YamlDirective>,
    pub tag: Vec<TagDirective>,
    pub param: Vec<ParamDirective>,
    pub local: Vec<LocalDirective>,
    pub import: Vec<ImportDirective>,
    pub private: Vec<PrivateDirective>,
    pub errors: DiagnosticQueue,
}

impl Directives {
    pub fn push_error(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    pub fn has_param(&self, alias: &str) -> bool {
        self.param.iter().any(|p| p.alias.text == alias)
    }

    pub fn has_local(&self, alias: &str) -> bool {
        self.local.iter().any(|l| l.alias.text == alias)
    }

    pub fn has_import(&self, alias: &str) -> bool {
        self.import.iter().any(|i| i.alias.text == alias)
    }

    pub fn has_tag_handle(&self, handle: &str) -> bool {
        self.tag.iter().any(|t| t.handle.text == handle)
    }

    pub fn find_import(&self, alias: &str) -> Option<&ImportDirective> {
        self.import.iter().find(|i| i.alias.text == alias)
    }

    pub fn find_param(&self, alias: &str) -> Option<&ParamDirective> {
        self.param.iter().find(|p| p.alias.text == alias)
    }

    pub fn find_local(&self, alias: &str) -> Option<&LocalDirective> {
        self.local.iter().find(|l| l.alias.text == alias)
    }
}

pub(crate) fn base(keyword: RawToken, span: Span) -> DirectiveBase {
    DirectiveBase::new(keyword, span)
}
