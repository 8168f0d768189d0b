use crate::Diagnostic;

/// Accumulates diagnostics for one compile. Never panics or aborts —
/// pushing is the only way errors leave the pipeline (`SPEC_FULL.md` §7).
#[derive(Clone, Debug, Default)]
pub struct DiagnosticQueue {
    items: Vec<Diagnostic>,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = Diagnostic>) {
        self.items.extend(other);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for DiagnosticQueue {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use ymc_span::Span;

    #[test]
    fn has_errors_ignores_warnings() {
        let mut q = DiagnosticQueue::new();
        q.push(Diagnostic::warning(ErrorCode::D001, Span::DUMMY, "warn"));
        assert!(!q.has_errors());
        q.push(Diagnostic::error(ErrorCode::D001, Span::DUMMY, "err"));
        assert!(q.has_errors());
        assert_eq!(q.len(), 2);
    }
}
