/// Error codes for all compiler diagnostics.
///
/// Format: `<letter><digits>`, where the letter indicates phase, mirroring
/// this system's own pipeline rather than a generic lexer/parser split:
/// - `Sxxx`: path sandbox (C1)
/// - `Dxxx`: directive scanner (C3)
/// - `Txxx`: scalar expression tokenizer (C4)
/// - `Rxxx`: resolver (C7) — anchors, forward references, imports, tags
/// - `Pxxx`: private-node filtering (C7.6)
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // ===== Path/sandbox errors (S0xx) =====
    /// Source file does not exist.
    S001,
    /// Extension is neither `.yaml` nor `.yml`.
    S002,
    /// Path escapes the configured base path.
    S003,

    // ===== Directive errors (D0xx) =====
    /// Duplicate `%FILENAME`.
    D001,
    /// Invalid or duplicate `%YAML` version.
    D002,
    /// `%TAG` missing handle or prefix, or duplicate handle.
    D003,
    /// `%PARAM`/`%LOCAL` missing alias, duplicate alias, or invalid type keyword.
    D004,
    /// `%IMPORT` missing alias or path, or duplicate alias.
    D005,
    /// `%IMPORT` path failed sandbox verification.
    D006,
    /// `%IMPORT` would close an import cycle.
    D007,
    /// Unterminated quoted or bracketed directive token.
    D008,
    /// Unrecognised directive keyword.
    D009,

    // ===== Tokenizer errors (T0xx) =====
    /// Unclosed `${`.
    T001,
    /// Unclosed quote.
    T002,
    /// Repeated `(` in an expression.
    T003,
    /// Repeated whitespace-then-type in an expression.
    T004,
    /// Missing base (`this|import|param|local`) in an expression.
    T005,
    /// Repeated `.` with no path segment between.
    T006,
    /// Repeated `,` in an argument list.
    T007,
    /// Repeated `=` in a key/value pair.
    T008,
    /// Missing key in a `key=value` argument.
    T009,
    /// Missing path segment (alias) after a base.
    T010,
    /// Invalid `as <type>` annotation keyword.
    T011,

    // ===== Resolver errors (R0xx) =====
    /// Alias references an anchor that does not exist (yet or ever).
    R001,
    /// Node accessed before it was defined (forward reference).
    R002,
    /// Unknown alias used with `import`/`local`/`param`.
    R003,
    /// Path segment not found during a `this`/`import` traversal.
    R004,
    /// Value did not match its `as scalar|map|seq` annotation.
    R005,
    /// Unknown tag, or no schema configured.
    R006,
    /// A tag resolver raised an error.
    R007,
    /// Invalid expression base (not `this|import|param|local`).
    R008,

    // ===== Private-filter errors (P0xx) =====
    /// A `%PRIVATE` path was not present in the resolved output.
    P001,

    // ===== Internal errors (I0xx) =====
    /// An internal invariant was violated; wraps an unexpected failure.
    I001,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::S001 => "S001",
            ErrorCode::S002 => "S002",
            ErrorCode::S003 => "S003",
            ErrorCode::D001 => "D001",
            ErrorCode::D002 => "D002",
            ErrorCode::D003 => "D003",
            ErrorCode::D004 => "D004",
            ErrorCode::D005 => "D005",
            ErrorCode::D006 => "D006",
            ErrorCode::D007 => "D007",
            ErrorCode::D008 => "D008",
            ErrorCode::D009 => "D009",
            ErrorCode::T001 => "T001",
            ErrorCode::T002 => "T002",
            ErrorCode::T003 => "T003",
            ErrorCode::T004 => "T004",
            ErrorCode::T005 => "T005",
            ErrorCode::T006 => "T006",
            ErrorCode::T007 => "T007",
            ErrorCode::T008 => "T008",
            ErrorCode::T009 => "T009",
            ErrorCode::T010 => "T010",
            ErrorCode::T011 => "T011",
            ErrorCode::R001 => "R001",
            ErrorCode::R002 => "R002",
            ErrorCode::R003 => "R003",
            ErrorCode::R004 => "R004",
            ErrorCode::R005 => "R005",
            ErrorCode::R006 => "R006",
            ErrorCode::R007 => "R007",
            ErrorCode::R008 => "R008",
            ErrorCode::P001 => "P001",
            ErrorCode::I001 => "I001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
