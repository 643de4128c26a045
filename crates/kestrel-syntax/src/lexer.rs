//! # Lexer - Tokenizing Kestrel Source
//!
//! Source text is broken into tokens by the [Logos]-derived [`TokenKind`].
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte of the input appears in exactly one token. Whitespace, newlines
//! and comments are not skipped; they come out on the trivia
//! [`Channel`](crate::token::Channel) and the parser's lookahead buffer
//! filters them. Characters Logos cannot classify become
//! [`TokenKind::Error`] tokens so they can be reported instead of vanishing:
//!
//! ```
//! use kestrel_syntax::lexer::lex;
//!
//! let input = "int x = 1; // one\n";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Streaming
//!
//! [`LexerSource`] lexes on demand and implements
//! [`TokenSource`](crate::source::TokenSource). Its snapshot is a clone of
//! the Logos cursor plus line/column bookkeeping, so taking one costs the
//! same regardless of how much input has been consumed.

use logos::Logos;

use crate::source::TokenSource;
use crate::span::{Position, Span};
use crate::token::{Token, TokenKind};

/// An on-demand token source backed by the Logos lexer.
#[derive(Clone)]
pub struct LexerSource<'src> {
    lexer: logos::Lexer<'src, TokenKind>,
    position: Position,
}

/// Saved [`LexerSource`] read position.
#[derive(Clone)]
pub struct LexerSnapshot<'src> {
    lexer: logos::Lexer<'src, TokenKind>,
    position: Position,
}

impl<'src> LexerSource<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: TokenKind::lexer(source),
            position: Position::START,
        }
    }

    pub fn source(&self) -> &'src str {
        self.lexer.source()
    }
}

impl<'src> TokenSource<'src> for LexerSource<'src> {
    type Snapshot = LexerSnapshot<'src>;

    fn next_token(&mut self) -> Token<'src> {
        let Some(result) = self.lexer.next() else {
            return Token::eof(self.position);
        };
        // Logos reports unrecognized input as Err(()).
        let kind = result.unwrap_or(TokenKind::Error);
        let text = self.lexer.slice();
        let start = self.position;
        debug_assert_eq!(start.offset, self.lexer.span().start);
        self.position = start.advanced_by(text);
        Token::new(kind, text, Span::new(start, self.position.offset))
    }

    fn snapshot(&self) -> LexerSnapshot<'src> {
        LexerSnapshot {
            lexer: self.lexer.clone(),
            position: self.position,
        }
    }

    fn restore(&mut self, snapshot: LexerSnapshot<'src>) {
        self.lexer = snapshot.lexer;
        self.position = snapshot.position;
    }

    fn position(&self) -> Position {
        self.position
    }
}

/// Lex the whole input, trivia included. The end-of-input token is not part
/// of the result.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut source = LexerSource::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = source.next_token();
        if token.is_eof() {
            break;
        }
        tokens.push(token);
    }
    tokens
}
