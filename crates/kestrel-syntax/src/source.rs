//! The token source contract consumed by the parser.
//!
//! A [`TokenSource`] hands out tokens one at a time and can save and restore
//! its read position. Snapshots must be cheap: the parser takes one every
//! time it starts a speculative parse.

use crate::span::{Position, Span};
use crate::token::{Token, TokenKind};

/// A synchronous, restartable producer of tokens.
///
/// Once the input is exhausted, `next_token` keeps returning an end-of-input
/// token positioned at the end of the source.
pub trait TokenSource<'src> {
    /// Opaque saved read position.
    type Snapshot: Clone;

    /// Produce the next token, trivia included.
    fn next_token(&mut self) -> Token<'src>;

    fn snapshot(&self) -> Self::Snapshot;

    fn restore(&mut self, snapshot: Self::Snapshot);

    /// Where the next token would start.
    fn position(&self) -> Position;
}

/// A token source over an already materialized token vector.
#[derive(Debug, Clone)]
pub struct VecSource<'src> {
    tokens: Vec<Token<'src>>,
    index: usize,
    end: Position,
}

impl<'src> VecSource<'src> {
    /// Wrap `tokens`. An explicit `Eof` token, if present, ends the stream
    /// early; otherwise the end position follows the last token.
    pub fn new(tokens: Vec<Token<'src>>) -> Self {
        let end = tokens
            .last()
            .map(|t| t.span.start_position().advanced_by(t.text))
            .unwrap_or(Position::START);
        Self {
            tokens,
            index: 0,
            end,
        }
    }

    /// Lay out `(kind, text)` pairs back to back starting at the beginning of
    /// the source.
    pub fn from_pairs(pairs: &[(TokenKind, &'src str)]) -> Self {
        let mut pos = Position::START;
        let tokens = pairs
            .iter()
            .map(|&(kind, text)| {
                let start = pos;
                pos = pos.advanced_by(text);
                Token::new(kind, text, Span::new(start, pos.offset))
            })
            .collect();
        Self::new(tokens)
    }
}

impl<'src> TokenSource<'src> for VecSource<'src> {
    type Snapshot = usize;

    fn next_token(&mut self) -> Token<'src> {
        match self.tokens.get(self.index) {
            Some(token) if !token.is_eof() => {
                self.index += 1;
                *token
            }
            Some(token) => *token,
            None => Token::eof(self.end),
        }
    }

    fn snapshot(&self) -> usize {
        self.index
    }

    fn restore(&mut self, snapshot: usize) {
        self.index = snapshot;
    }

    fn position(&self) -> Position {
        self.tokens
            .get(self.index)
            .map(|t| t.span.start_position())
            .unwrap_or(self.end)
    }
}
