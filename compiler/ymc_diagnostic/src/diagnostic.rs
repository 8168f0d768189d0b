use ymc_span::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
}

/// One diagnostic raised anywhere in the pipeline.
///
/// `filename`/`path`/`line_col` are filled in by [`crate::decorate`] once the
/// owning top-level compile knows the module's logical name, canonical
/// path, and line index (`SPEC_FULL.md` §6.4, §7).
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
    pub filename: Option<String>,
    pub path: Option<String>,
    pub line_col: Option<((u32, u32), (u32, u32))>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            code,
            span,
            message: message.into(),
            filename: None,
            path: None,
            line_col: None,
        }
    }

    pub fn warning(code: ErrorCode, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Diagnostic::error(code, span, message)
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Human-readable message suffixed with the file location, once decorated.
    pub fn display_message(&self) -> String {
        match (&self.filename, self.line_col) {
            (Some(name), Some((start, _))) => {
                format!("{} [{}] ({name}:{}:{})", self.message, self.code, start.0, start.1)
            }
            (Some(name), None) => format!("{} [{}] ({name})", self.message, self.code),
            _ => format!("{} [{}]", self.message, self.code),
        }
    }
}
