//! Parse diagnostics and the log that collects them.
//!
//! Diagnostics are the only channel through which the parser reports
//! recoverable problems. The log is append-only during normal parsing and is
//! truncated only when a speculative parse is rolled back.

use std::fmt;

use thiserror::Error;

use crate::span::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// Coordinates that cannot describe a source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidPosition {
    #[error("line numbers start at 1, got {0}")]
    Line(u32),
    #[error("column numbers start at 1, got {0}")]
    Column(u32),
}

/// A position-tagged parse problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Diagnostic {
    pub fn try_new(
        severity: Severity,
        position: Position,
        message: impl Into<String>,
    ) -> Result<Self, InvalidPosition> {
        if position.line < 1 {
            return Err(InvalidPosition::Line(position.line));
        }
        if position.column < 1 {
            return Err(InvalidPosition::Column(position.column));
        }
        Ok(Self {
            severity,
            message: message.into(),
            offset: position.offset,
            line: position.line,
            column: position.column,
        })
    }

    /// # Panics
    ///
    /// If `position` has a zero line or column.
    pub fn error(position: Position, message: impl Into<String>) -> Self {
        Self::checked(Severity::Error, position, message)
    }

    /// # Panics
    ///
    /// If `position` has a zero line or column.
    pub fn warning(position: Position, message: impl Into<String>) -> Self {
        Self::checked(Severity::Warning, position, message)
    }

    fn checked(severity: Severity, position: Position, message: impl Into<String>) -> Self {
        match Self::try_new(severity, position, message) {
            Ok(diagnostic) => diagnostic,
            Err(err) => panic!("invalid diagnostic position {position:?}: {err}"),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.offset, self.line, self.column)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.line, self.column, self.severity, self.message
        )
    }
}

/// Ordered, truncatable collection of diagnostics.
///
/// Cloning copies every entry; the parser relies on that when it captures
/// the log for a backtracking marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.entries.len() - self.error_count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_format() {
        let d = Diagnostic::error(Position::new(10, 2, 5), "expected ';', found '}'");
        assert_eq!(d.to_string(), "2:5: error: expected ';', found '}'");
    }

    #[test]
    fn try_new_rejects_zero_line() {
        let err = Diagnostic::try_new(Severity::Error, Position::new(0, 0, 1), "x").unwrap_err();
        assert_eq!(err, InvalidPosition::Line(0));
    }

    #[test]
    fn try_new_rejects_zero_column() {
        let err = Diagnostic::try_new(Severity::Warning, Position::new(0, 1, 0), "x").unwrap_err();
        assert_eq!(err, InvalidPosition::Column(0));
    }

    #[test]
    #[should_panic(expected = "invalid diagnostic position")]
    fn constructing_with_invalid_coordinates_panics() {
        let _ = Diagnostic::error(Position::new(0, 1, 0), "boom");
    }

    #[test]
    fn log_counts_and_truncates() {
        let mut log = DiagnosticLog::new();
        log.push(Diagnostic::error(Position::START, "a"));
        log.push(Diagnostic::warning(Position::START, "b"));
        log.push(Diagnostic::error(Position::START, "c"));
        assert_eq!(log.error_count(), 2);
        assert_eq!(log.warning_count(), 1);

        log.truncate(1);
        let messages: Vec<_> = log.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["a"]);
    }

    #[test]
    fn cloned_log_is_independent() {
        let mut log = DiagnosticLog::new();
        log.push(Diagnostic::error(Position::START, "a"));
        let copy = log.clone();
        log.push(Diagnostic::error(Position::START, "b"));
        assert_eq!(copy.len(), 1);
        assert_eq!(log.len(), 2);
    }
}
