//! Bounded lookahead over a [`TokenSource`].
//!
//! Tokens are pulled from the source on demand and kept in a FIFO buffer until
//! the parser consumes them. Trivia never enters the buffer, and nothing is
//! appended after an end-of-input token, so the buffer holds at most one
//! `Eof` and always at its back.

use std::collections::VecDeque;

use crate::source::TokenSource;
use crate::token::Token;

pub struct Lookahead<'src, S: TokenSource<'src>> {
    source: S,
    buffer: VecDeque<Token<'src>>,
    previous: Option<Token<'src>>,
}

/// Everything [`Lookahead`] needs to return to an earlier state.
pub(crate) struct LookaheadState<'src, S: TokenSource<'src>> {
    source: S::Snapshot,
    buffer: VecDeque<Token<'src>>,
    previous: Option<Token<'src>>,
}

impl<'src, S: TokenSource<'src>> Lookahead<'src, S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: VecDeque::new(),
            previous: None,
        }
    }

    /// The `n`th unconsumed content token, 1-based.
    ///
    /// # Panics
    ///
    /// If `n` is zero.
    pub fn lookahead(&mut self, n: usize) -> Token<'src> {
        assert!(n >= 1, "lookahead distance starts at 1, got {n}");
        self.fill(n);
        match self.buffer.get(n - 1) {
            Some(token) => *token,
            // fill() only stops short after buffering Eof
            None => self
                .buffer
                .back()
                .copied()
                .unwrap_or_else(|| Token::eof(self.source.position())),
        }
    }

    /// Consume the next token and remember it as the previous one.
    ///
    /// At end of input the `Eof` token is returned and stays buffered.
    pub fn advance(&mut self) -> Token<'src> {
        let token = self.lookahead(1);
        if !token.is_eof() {
            self.buffer.pop_front();
        }
        self.previous = Some(token);
        token
    }

    pub fn is_at_end(&mut self) -> bool {
        self.lookahead(1).is_eof()
    }

    /// The last token returned by [`advance`](Self::advance).
    pub fn previous(&self) -> Option<&Token<'src>> {
        self.previous.as_ref()
    }

    pub fn buffered(&self) -> impl ExactSizeIterator<Item = &Token<'src>> + '_ {
        self.buffer.iter()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fill(&mut self, n: usize) {
        while self.buffer.len() < n {
            if self.buffer.back().is_some_and(Token::is_eof) {
                return;
            }
            let token = self.source.next_token();
            if token.is_trivia() {
                continue;
            }
            self.buffer.push_back(token);
        }
    }

    /// Copy out the source position, buffer and previous token.
    pub(crate) fn save(&self) -> LookaheadState<'src, S> {
        LookaheadState {
            source: self.source.snapshot(),
            buffer: self.buffer.clone(),
            previous: self.previous,
        }
    }

    pub(crate) fn restore(&mut self, state: LookaheadState<'src, S>) {
        self.source.restore(state.source);
        self.buffer = state.buffer;
        self.previous = state.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerSource;
    use crate::source::VecSource;
    use crate::token::TokenKind;
    use pretty_assertions::assert_eq;

    fn lookahead(input: &str) -> Lookahead<'_, LexerSource<'_>> {
        Lookahead::new(LexerSource::new(input))
    }

    #[test]
    fn skips_trivia() {
        let mut la = lookahead("  a /* c */ b\n");
        assert_eq!(la.lookahead(1).text, "a");
        assert_eq!(la.lookahead(2).text, "b");
        assert!(la.lookahead(3).is_eof());
        assert!(la.buffered().all(|t| !t.is_trivia()));
    }

    #[test]
    fn lookahead_is_stable_until_advance() {
        let mut la = lookahead("a b c");
        let third = la.lookahead(3);
        let first = la.lookahead(1);
        assert_eq!(la.lookahead(3), third);
        assert_eq!(la.lookahead(1), first);
        assert_eq!(la.advance(), first);
        assert_eq!(la.lookahead(2), third);
    }

    #[test]
    fn lookahead_past_end_returns_eof() {
        let mut la = lookahead("a");
        let eof = la.lookahead(10);
        assert!(eof.is_eof());
        assert_eq!(eof.span.start, 1);
        assert_eq!(la.buffered().len(), 2);
    }

    #[test]
    fn nothing_is_buffered_after_eof() {
        let source = VecSource::from_pairs(&[(TokenKind::Ident, "a"), (TokenKind::Eof, "")]);
        let mut la = Lookahead::new(source);
        la.lookahead(5);
        la.lookahead(7);
        assert_eq!(la.buffered().len(), 2);
    }

    #[test]
    fn advance_at_end_does_not_desynchronize() {
        let mut la = lookahead("x");
        assert_eq!(la.advance().text, "x");
        let eof = la.advance();
        assert!(eof.is_eof());
        assert_eq!(la.advance(), eof);
        assert!(la.is_at_end());
        assert_eq!(la.previous(), Some(&eof));
        assert_eq!(la.buffered().len(), 1);
    }

    #[test]
    fn previous_tracks_last_advance() {
        let mut la = lookahead("a b");
        assert_eq!(la.previous(), None);
        la.advance();
        assert_eq!(la.previous().map(|t| t.text), Some("a"));
    }

    #[test]
    #[should_panic(expected = "lookahead distance starts at 1")]
    fn lookahead_zero_is_a_contract_violation() {
        lookahead("a").lookahead(0);
    }

    #[test]
    fn save_and_restore() {
        let mut la = lookahead("a b c d");
        la.lookahead(2);
        let saved = la.save();
        la.advance();
        la.advance();
        la.lookahead(2);
        la.restore(saved);
        let texts: Vec<_> = (0..4).map(|_| la.advance().text).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }
}
