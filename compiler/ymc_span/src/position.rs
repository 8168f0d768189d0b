use std::fmt;

/// Line/column pair, both 1-based, matching common editor conventions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// A single absolute byte offset into the module source.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Position(pub u32);

impl Position {
    pub const fn new(offset: u32) -> Self {
        Position(offset)
    }

    pub const fn offset(self) -> u32 {
        self.0
    }
}

/// An absolute, half-open byte range `[start, end)` into the module source.
///
/// Per `SPEC_FULL.md` §3.1, every token and diagnostic carries one of these.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: Position(0),
        end: Position(0),
    };

    pub const fn new(start: u32, end: u32) -> Self {
        Span {
            start: Position(start),
            end: Position(end),
        }
    }

    pub const fn at(offset: u32) -> Self {
        Span::new(offset, offset)
    }

    pub const fn len(self) -> u32 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub const fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Rebase a span that was computed relative to some parent offset
    /// (used when merging nested tokenizer layers, per `SPEC_FULL.md` §4.4.2)
    /// back to absolute module-source coordinates.
    pub const fn rebase(self, base_offset: u32) -> Self {
        Span::new(self.start.0 + base_offset, self.end.0 + base_offset)
    }

    /// Smallest span containing both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.0.min(other.start.0), self.end.0.max(other.end.0))
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}
