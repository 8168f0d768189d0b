//! Path sandbox (C1, `SPEC_FULL.md` §4.1): canonicalisation, extension
//! validation, and base-path containment. A failure is a [`Diagnostic`],
//! never a panic — the caller treats the target as absent and keeps going.

use std::path::{Component, Path, PathBuf};

use ymc_diagnostic::{Diagnostic, ErrorCode};
use ymc_span::Span;

/// A path that has passed the sandbox check: canonical, extension-valid,
/// and (unless `unsafe` was set) contained under the base path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedPath {
    pub canonical: PathBuf,
}

pub fn verify_path(target: &Path, base_path: &Path, unsafe_mode: bool, span: Span) -> Result<VerifiedPath, Diagnostic> {
    let has_yaml_extension = target
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if !has_yaml_extension {
        return Err(Diagnostic::error(
            ErrorCode::S002,
            span,
            format!("`{}` does not have a .yaml/.yml extension", target.display()),
        ));
    }

    let canonical = std::fs::canonicalize(target).map_err(|err| {
        Diagnostic::error(
            ErrorCode::S001,
            span,
            format!("`{}` does not exist or cannot be read: {err}", target.display()),
        )
    })?;

    if unsafe_mode {
        return Ok(VerifiedPath { canonical });
    }

    let canonical_base = std::fs::canonicalize(base_path).map_err(|err| {
        Diagnostic::error(
            ErrorCode::S001,
            span,
            format!("base path `{}` does not exist: {err}", base_path.display()),
        )
    })?;

    if !is_contained(&canonical_base, &canonical) {
        return Err(Diagnostic::error(
            ErrorCode::S003,
            span,
            format!(
                "`{}` is out of scope of base path `{}`",
                canonical.display(),
                canonical_base.display()
            ),
        ));
    }

    Ok(VerifiedPath { canonical })
}

/// Whether every component of `base` is a case-insensitive prefix of
/// `target`'s components — covers both case-sensitive and case-insensitive
/// filesystems, since a case-sensitive match is also a case-insensitive one.
fn is_contained(base: &Path, target: &Path) -> bool {
    let base_components: Vec<Component<'_>> = base.components().collect();
    let target_components: Vec<Component<'_>> = target.components().collect();
    if target_components.len() < base_components.len() {
        return false;
    }
    base_components
        .iter()
        .zip(target_components.iter())
        .all(|(b, t)| component_eq(b, t))
}

fn component_eq(a: &Component<'_>, b: &Component<'_>) -> bool {
    a.as_os_str().to_string_lossy().eq_ignore_ascii_case(&b.as_os_str().to_string_lossy())
}

/// Resolves an `%IMPORT` path relative to the *importing module's
/// directory*, not the sandbox base path (`SPEC_FULL.md` §4.1).
pub fn resolve_relative(current_dir: &Path, raw_path: &str) -> PathBuf {
    let candidate = Path::new(raw_path);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        current_dir.join(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_yaml_extension() {
        let span = Span::DUMMY;
        let err = verify_path(Path::new("/tmp/nope.txt"), Path::new("/tmp"), false, span).unwrap_err();
        assert_eq!(err.code, ErrorCode::S002);
    }

    #[test]
    fn relative_import_resolves_against_current_dir() {
        let resolved = resolve_relative(Path::new("/proj/modules"), "./sibling.yaml");
        assert_eq!(resolved, PathBuf::from("/proj/modules/./sibling.yaml"));
    }

    #[test]
    fn absolute_import_path_is_used_verbatim() {
        let resolved = resolve_relative(Path::new("/proj/modules"), "/etc/passwd.yaml");
        assert_eq!(resolved, PathBuf::from("/etc/passwd.yaml"));
    }

    #[test]
    fn containment_rejects_escaping_paths() {
        assert!(is_contained(Path::new("/proj"), Path::new("/proj/sub/a.yaml")));
        assert!(!is_contained(Path::new("/proj"), Path::new("/etc/passwd.yaml")));
    }
}
