use ymc_span::LineIndex;

use crate::Diagnostic;

/// Decorates a diagnostic with the filename, canonical path, and
/// line/column pair derived from the owning module's line index
/// (`SPEC_FULL.md` §6.4, §7): filename is the `%FILENAME` directive's value
/// if present, else the option-supplied filename.
pub fn decorate(diagnostic: &mut Diagnostic, filename: &str, path: &str, lines: &LineIndex) {
    diagnostic.filename = Some(filename.to_string());
    diagnostic.path = Some(path.to_string());
    let (start, end) = lines.span_line_cols(diagnostic.span);
    diagnostic.line_col = Some(((start.line, start.col), (end.line, end.col)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use ymc_span::Span;

    #[test]
    fn decorate_fills_all_fields() {
        let mut d = Diagnostic::error(ErrorCode::R001, Span::new(2, 4), "no anchor");
        let lines = LineIndex::new("ab\ncd\n");
        decorate(&mut d, "mod.yaml", "/abs/mod.yaml", &lines);
        assert_eq!(d.filename.as_deref(), Some("mod.yaml"));
        assert_eq!(d.path.as_deref(), Some("/abs/mod.yaml"));
        assert!(d.line_col.is_some());
        assert!(d.display_message().contains("mod.yaml"));
    }
}
