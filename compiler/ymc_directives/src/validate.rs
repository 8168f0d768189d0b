use indexmap::IndexMap;

use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_span::Span;

use crate::token::RawToken;
use crate::types::{
    self, Directives, FilenameDirective, ImportDirective, ImportParamValue, LocalDirective,
    ParamDirective, PrivateDirective, PrivatePath, TagDirective, YamlDirective,
};

const TYPE_KEYWORDS: [&str; 3] = ["scalar", "map", "seq"];

fn covering_span(tokens: &[RawToken]) -> Span {
    tokens
        .iter()
        .skip(1)
        .fold(tokens[0].span, |acc, t| acc.cover(t.span))
}

fn is_type_keyword(token: &RawToken) -> bool {
    !token.quoted && TYPE_KEYWORDS.contains(&token.text.as_str())
}

/// Classifies a directive line by its keyword and validates it per the
/// per-kind rules in `SPEC_FULL.md` §4.3 item 3, pushing the typed result
/// (valid or not) onto `directives` along with any diagnostics raised.
pub fn classify_and_validate(first: RawToken, tokens: Vec<RawToken>, directives: &mut Directives) {
    let span = covering_span(&tokens);
    let keyword = first.text.to_ascii_uppercase();

    match keyword.as_str() {
        "%FILENAME" => validate_filename(first, tokens, span, directives),
        "%YAML" => validate_yaml(first, tokens, span, directives),
        "%TAG" => validate_tag(first, tokens, span, directives),
        "%PARAM" => validate_param(first, tokens, span, directives),
        "%LOCAL" => validate_local(first, tokens, span, directives),
        "%IMPORT" => validate_import(first, tokens, span, directives),
        "%PRIVATE" => validate_private(first, tokens, span, directives),
        _ => {
            directives.push_error(Diagnostic::error(
                ErrorCode::D009,
                first.span,
                format!("unrecognised directive keyword `{}`", first.raw),
            ));
        }
    }
}

fn validate_filename(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    if !directives.filename.is_empty() {
        base.valid = false;
        directives.push_error(Diagnostic::error(
            ErrorCode::D001,
            span,
            "duplicate %FILENAME directive",
        ));
    }
    let Some(name) = tokens.get(1).cloned() else {
        directives.push_error(Diagnostic::error(
            ErrorCode::D001,
            span,
            "%FILENAME requires a file name argument",
        ));
        return;
    };
    directives.filename.push(FilenameDirective { base, name });
}

fn validate_yaml(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    if !directives.yaml.is_empty() {
        base.valid = false;
        directives.push_error(Diagnostic::error(ErrorCode::D002, span, "duplicate %YAML directive"));
    }
    let Some(version) = tokens.get(1).cloned() else {
        directives.push_error(Diagnostic::error(
            ErrorCode::D002,
            span,
            "%YAML requires a version argument",
        ));
        return;
    };
    if !matches!(version.text.as_str(), "1.1" | "1.2") {
        base.valid = false;
        directives.push_error(Diagnostic::error(
            ErrorCode::D002,
            version.span,
            format!("unsupported YAML version `{}`", version.text),
        ));
    }
    directives.yaml.push(YamlDirective { base, version });
}

fn validate_tag(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    let (Some(handle), Some(prefix)) = (tokens.get(1).cloned(), tokens.get(2).cloned()) else {
        directives.push_error(Diagnostic::error(
            ErrorCode::D003,
            span,
            "%TAG requires a handle and a prefix",
        ));
        return;
    };
    if directives.has_tag_handle(&handle.text) {
        base.valid = false;
        directives.push_error(Diagnostic::error(
            ErrorCode::D003,
            handle.span,
            format!("duplicate %TAG handle `{}`", handle.text),
        ));
    }
    directives.tag.push(TagDirective { base, handle, prefix });
}

/// Splits the optional `[type] [default]` tail shared by `%PARAM`/`%LOCAL`.
/// If the first remaining token is a bare `scalar|map|seq` keyword it is
/// the type annotation, otherwise it is itself the default value.
fn split_type_and_default(rest: &[RawToken]) -> (Option<RawToken>, Option<RawToken>) {
    match rest {
        [] => (None, None),
        [only] if is_type_keyword(only) => (Some(only.clone()), None),
        [only] => (None, Some(only.clone())),
        [ty, default, ..] if is_type_keyword(ty) => (Some(ty.clone()), Some(default.clone())),
        [default, ..] => (None, Some(default.clone())),
    }
}

fn validate_param(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    let Some(alias) = tokens.get(1).cloned() else {
        directives.push_error(Diagnostic::error(ErrorCode::D004, span, "%PARAM requires an alias"));
        return;
    };
    if directives.has_param(&alias.text) || directives.has_local(&alias.text) {
        base.valid = false;
        directives.push_error(Diagnostic::error(
            ErrorCode::D004,
            alias.span,
            format!("duplicate parameter alias `{}`", alias.text),
        ));
    }
    let (ty, default) = split_type_and_default(&tokens[2..]);
    directives.param.push(ParamDirective { base, alias, ty, default });
}

fn validate_local(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    let Some(alias) = tokens.get(1).cloned() else {
        directives.push_error(Diagnostic::error(ErrorCode::D004, span, "%LOCAL requires an alias"));
        return;
    };
    if directives.has_param(&alias.text) || directives.has_local(&alias.text) {
        base.valid = false;
        directives.push_error(Diagnostic::error(
            ErrorCode::D004,
            alias.span,
            format!("duplicate local alias `{}`", alias.text),
        ));
    }
    let (ty, default) = split_type_and_default(&tokens[2..]);
    directives.local.push(LocalDirective { base, alias, ty, default });
}

/// Splits one `key=value` argument token on its first `=`. The key and
/// value sub-spans are approximate, sliced out of the token's raw text
/// rather than re-scanned, since directive arguments carry no escaped `=`.
fn split_kv(token: &RawToken) -> Option<ImportParamValue> {
    let eq_idx = token.raw.find('=')?;
    let start = token.span.start.offset();
    let key_raw = &token.raw[..eq_idx];
    let value_raw = &token.raw[eq_idx + 1..];

    let key = RawToken {
        raw: key_raw.to_string(),
        text: key_raw.to_string(),
        value: ymc_lexer_core::Literal::String(key_raw.to_string()),
        quoted: false,
        span: Span::new(start, start + eq_idx as u32),
        terminated: true,
    };
    let equal_span = Span::new(start + eq_idx as u32, start + eq_idx as u32 + 1);

    let mut chars = value_raw.chars();
    let quote_pair = match (chars.next(), chars.last()) {
        (Some(a @ ('"' | '\'')), Some(b)) if a == b && value_raw.len() >= 2 => Some(a),
        _ => None,
    };
    let unquoted = quote_pair.and_then(|q| {
        value_raw
            .strip_prefix(q)
            .and_then(|s| s.strip_suffix(q))
    });
    let value = if let Some(inner) = unquoted {
        let text = ymc_lexer_core::unescape(inner);
        RawToken {
            raw: value_raw.to_string(),
            text: text.clone(),
            value: ymc_lexer_core::Literal::String(text),
            quoted: true,
            span: Span::new(start + eq_idx as u32 + 1, token.span.end.offset()),
            terminated: true,
        }
    } else {
        let text = ymc_lexer_core::unescape(value_raw);
        let value = ymc_lexer_core::infer_literal(&text);
        RawToken {
            raw: value_raw.to_string(),
            text,
            value,
            quoted: false,
            span: Span::new(start + eq_idx as u32 + 1, token.span.end.offset()),
            terminated: true,
        }
    };

    Some(ImportParamValue { key, equal_span, value })
}

fn validate_import(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    let (Some(alias), Some(path)) = (tokens.get(1).cloned(), tokens.get(2).cloned()) else {
        directives.push_error(Diagnostic::error(
            ErrorCode::D005,
            span,
            "%IMPORT requires an alias and a path",
        ));
        return;
    };
    if directives.has_import(&alias.text) {
        base.valid = false;
        directives.push_error(Diagnostic::error(
            ErrorCode::D005,
            alias.span,
            format!("duplicate import alias `{}`", alias.text),
        ));
    }

    let mut params = IndexMap::new();
    for arg in &tokens[3..] {
        match split_kv(arg) {
            Some(kv) => {
                params.insert(kv.key.text.clone(), kv);
            }
            None => {
                base.valid = false;
                directives.push_error(Diagnostic::error(
                    ErrorCode::D005,
                    arg.span,
                    format!("expected `key=value`, found `{}`", arg.raw),
                ));
            }
        }
    }

    directives.import.push(ImportDirective { base, alias, path, params });
}

/// Splits a `%PRIVATE` path on unescaped `.` (`SPEC_FULL.md` §4.3 item 3,
/// §6.2). `token.text` has already been through the general escape decoder,
/// which leaves the (unrecognised) `\.` sequence untouched — so a literal
/// dot within a path segment still reads as a backslash followed by a dot
/// here, and gets folded into the segment instead of ending it.
fn split_private_segments(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'.') {
            current.push('.');
            chars.next();
            continue;
        }
        if c == '.' {
            segments.push(std::mem::take(&mut current));
            continue;
        }
        current.push(c);
    }
    segments.push(current);
    segments
}

fn validate_private(keyword: RawToken, tokens: Vec<RawToken>, span: Span, directives: &mut Directives) {
    let mut base = types::base(keyword, span);
    if tokens.len() < 2 {
        directives.push_error(Diagnostic::error(
            ErrorCode::D004,
            span,
            "%PRIVATE requires at least one dotted path",
        ));
        return;
    }
    let mut paths = Vec::new();
    for token in &tokens[1..] {
        if token.text.is_empty() || token.text.starts_with('.') || token.text.ends_with('.') {
            base.valid = false;
            directives.push_error(Diagnostic::error(
                ErrorCode::D004,
                token.span,
                format!("invalid %PRIVATE path `{}`", token.text),
            ));
            continue;
        }
        let segments = split_private_segments(&token.text);
        paths.push(PrivatePath {
            token: token.clone(),
            segments,
        });
    }
    directives.private.push(PrivateDirective { base, paths });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::scan_directives;

    #[test]
    fn param_with_type_and_default() {
        let (directives, _) = scan_directives("%PARAM greeting scalar hello\n");
        assert_eq!(directives.param.len(), 1);
        let p = &directives.param[0];
        assert_eq!(p.alias.text, "greeting");
        assert_eq!(p.ty.as_ref().unwrap().text, "scalar");
        assert_eq!(p.default.as_ref().unwrap().text, "hello");
    }

    #[test]
    fn param_with_only_default_has_no_type() {
        let (directives, _) = scan_directives("%PARAM greeting hello\n");
        let p = &directives.param[0];
        assert!(p.ty.is_none());
        assert_eq!(p.default.as_ref().unwrap().text, "hello");
    }

    #[test]
    fn duplicate_param_alias_is_flagged() {
        let (directives, _) = scan_directives("%PARAM x scalar\n%PARAM x scalar\n");
        assert_eq!(directives.param.len(), 2);
        assert!(!directives.param[1].base.valid);
        assert!(directives.errors.iter().any(|d| d.code == ErrorCode::D004));
    }

    #[test]
    fn import_parses_key_value_params() {
        let (directives, _) = scan_directives("%IMPORT team ./team.yaml who=ops count=3\n");
        let imp = &directives.import[0];
        assert_eq!(imp.alias.text, "team");
        assert_eq!(imp.path.text, "./team.yaml");
        assert_eq!(imp.params["who"].value.text, "ops");
        assert_eq!(imp.params["count"].value.text, "3");
    }

    #[test]
    fn private_splits_dotted_paths() {
        let (directives, _) = scan_directives("%PRIVATE a.b.c other\n");
        let priv_directive = &directives.private[0];
        assert_eq!(priv_directive.paths.len(), 2);
        assert_eq!(priv_directive.paths[0].segments, vec!["a", "b", "c"]);
    }

    #[test]
    fn private_escaped_dot_stays_in_one_segment() {
        let (directives, _) = scan_directives("%PRIVATE a\\.b.c\n");
        let priv_directive = &directives.private[0];
        assert_eq!(priv_directive.paths[0].segments, vec!["a.b", "c"]);
    }

    #[test]
    fn unknown_directive_keyword_is_an_error() {
        let (directives, _) = scan_directives("%BOGUS x\n");
        assert!(directives.errors.iter().any(|d| d.code == ErrorCode::D009));
    }
}
