use crate::DiagnosticQueue;

/// Renders a queue as one line per diagnostic; used by non-interactive
/// consumers (CI logs, the `watch` subcommand's recompile summaries).
pub fn render_plain(queue: &DiagnosticQueue) -> String {
    let mut out = String::new();
    for diagnostic in queue.iter() {
        let severity = match diagnostic.severity {
            crate::Severity::Error => "error",
            crate::Severity::Warning => "warning",
        };
        out.push_str(severity);
        out.push_str(": ");
        out.push_str(&diagnostic.display_message());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostic, ErrorCode};
    use ymc_span::Span;

    #[test]
    fn one_line_per_diagnostic() {
        let mut q = DiagnosticQueue::new();
        q.push(Diagnostic::error(ErrorCode::R001, Span::DUMMY, "boom"));
        q.push(Diagnostic::warning(ErrorCode::D001, Span::DUMMY, "hmm"));
        let rendered = render_plain(&q);
        assert_eq!(rendered.lines().count(), 2);
        assert!(rendered.starts_with("error: boom"));
    }
}
