//! Source positions and spans.
//!
//! Offsets are byte offsets into the source (0-based). Lines and columns are
//! 1-based; columns count chars, not bytes.

use std::fmt;

/// A point in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// The first character of any source.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }

    /// The position immediately after `text`, assuming `text` starts here.
    pub fn advanced_by(self, text: &str) -> Position {
        let mut pos = self;
        for ch in text.chars() {
            if ch == '\n' {
                pos.line += 1;
                pos.column = 1;
            } else {
                pos.column += 1;
            }
        }
        pos.offset += text.len();
        pos
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `start..end`, plus the line and column of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: Position, end: usize) -> Self {
        debug_assert!(end >= start.offset, "span end {end} precedes start {start:?}");
        Self {
            start: start.offset,
            end,
            line: start.line,
            column: start.column,
        }
    }

    /// A zero-width span at `pos`.
    pub fn at(pos: Position) -> Self {
        Self::new(pos, pos.offset)
    }

    /// The span running from the start of `first` to the end of `last`.
    pub fn between(first: Span, last: Span) -> Span {
        Span {
            start: first.start,
            end: last.end.max(first.start),
            line: first.line,
            column: first.column,
        }
    }

    pub fn start_position(&self) -> Position {
        Position::new(self.start, self.line, self.column)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
