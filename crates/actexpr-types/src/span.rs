use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span inside one expression.
///
/// Offsets are 0-based byte offsets into the expression text (the part
/// between `${{` and `}}`). Nodes built by hand use [`Span::DUMMY`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for nodes that were not produced from source text.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Create a new span.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a zero-width span at a single offset.
    pub fn point(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
