use crate::{DiagnosticQueue, Severity};

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Renders a queue for an interactive terminal: severity-colored, one
/// diagnostic per paragraph. `color` is threaded explicitly rather than
/// probed from the environment so callers (tests, `--no-color`) control it.
pub fn render_terminal(queue: &DiagnosticQueue, color: bool) -> String {
    let mut out = String::new();
    for diagnostic in queue.iter() {
        let (label, code_color) = match diagnostic.severity {
            Severity::Error => ("error", RED),
            Severity::Warning => ("warning", YELLOW),
        };
        if color {
            out.push_str(code_color);
            out.push_str(BOLD);
            out.push_str(label);
            out.push_str(RESET);
        } else {
            out.push_str(label);
        }
        out.push_str(&format!("[{}]: {}\n", diagnostic.code, diagnostic.message));
        if let (Some(filename), Some((start, _))) = (&diagnostic.filename, diagnostic.line_col) {
            out.push_str(&format!("  --> {}:{}:{}\n", filename, start.0, start.1));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostic, ErrorCode};
    use ymc_span::Span;

    #[test]
    fn no_color_has_no_escape_codes() {
        let mut q = DiagnosticQueue::new();
        q.push(Diagnostic::error(ErrorCode::R001, Span::DUMMY, "boom"));
        let rendered = render_terminal(&q, false);
        assert!(!rendered.contains('\x1b'));
        assert!(rendered.contains("boom"));
    }

    #[test]
    fn color_mode_wraps_label() {
        let mut q = DiagnosticQueue::new();
        q.push(Diagnostic::error(ErrorCode::R001, Span::DUMMY, "boom"));
        let rendered = render_terminal(&q, true);
        assert!(rendered.contains(RED));
    }
}
