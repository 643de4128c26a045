//! Token kinds and the immutable [`Token`] value.
//!
//! Every token carries its kind, the source text it covers, a [`Span`], the
//! [`Channel`] it travels on and a small set of [`TokenFlags`]. Trivia
//! (whitespace, newlines, comments) is kept on its own channel so the parser
//! can skip it while tools that want a lossless view still see it.

use std::fmt;

use logos::{Lexer, Logos};

use crate::span::{Position, Span};

/// All token kinds of the Kestrel language.
///
/// `Error` covers input the lexer does not recognize; `Eof` is never produced
/// by Logos itself and is synthesized by token sources once input runs out.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Trivia ===
    #[regex(r"[ \t\r\f]+")]
    Whitespace,
    #[regex(r"\r?\n")]
    Newline,
    #[token("//", line_comment)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // === Keywords ===
    #[token("class")]
    Class,
    #[token("extends")]
    Extends,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("static")]
    Static,
    #[token("final")]
    Final,
    #[token("abstract")]
    Abstract,
    #[token("void")]
    Void,
    #[token("int")]
    Int,
    #[token("boolean")]
    Boolean,
    #[token("char")]
    Char,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("this")]
    This,

    // === Names and literals ===
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
    #[regex(r"[0-9]+")]
    IntLiteral,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r"'([^'\\\n]|\\.)'")]
    CharLiteral,

    // === Punctuation ===
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // === Operators ===
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    // === Special ===
    /// Input the lexer could not classify.
    Error,
    /// End of input.
    Eof,
}

fn line_comment(lex: &mut Lexer<'_, TokenKind>) -> bool {
    let rest = lex.remainder();
    lex.bump(rest.find('\n').unwrap_or(rest.len()));
    true
}

/// Unterminated block comments swallow the rest of the input and come out
/// as an `Error` token.
fn block_comment(lex: &mut Lexer<'_, TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

impl TokenKind {
    /// Whitespace, newlines and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::Whitespace | Self::Newline | Self::LineComment | Self::BlockComment
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLiteral
                | Self::StringLiteral
                | Self::CharLiteral
                | Self::True
                | Self::False
                | Self::Null
        )
    }

    /// Human-readable description used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Whitespace => "whitespace",
            Self::Newline => "newline",
            Self::LineComment | Self::BlockComment => "comment",
            Self::Class => "'class'",
            Self::Extends => "'extends'",
            Self::Public => "'public'",
            Self::Private => "'private'",
            Self::Protected => "'protected'",
            Self::Static => "'static'",
            Self::Final => "'final'",
            Self::Abstract => "'abstract'",
            Self::Void => "'void'",
            Self::Int => "'int'",
            Self::Boolean => "'boolean'",
            Self::Char => "'char'",
            Self::If => "'if'",
            Self::Else => "'else'",
            Self::While => "'while'",
            Self::Return => "'return'",
            Self::True => "'true'",
            Self::False => "'false'",
            Self::Null => "'null'",
            Self::This => "'this'",
            Self::Ident => "identifier",
            Self::IntLiteral => "integer literal",
            Self::StringLiteral => "string literal",
            Self::CharLiteral => "character literal",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::Semicolon => "';'",
            Self::Comma => "','",
            Self::Dot => "'.'",
            Self::Assign => "'='",
            Self::PlusAssign => "'+='",
            Self::MinusAssign => "'-='",
            Self::EqEq => "'=='",
            Self::BangEq => "'!='",
            Self::Lt => "'<'",
            Self::LtEq => "'<='",
            Self::Gt => "'>'",
            Self::GtEq => "'>='",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Star => "'*'",
            Self::Slash => "'/'",
            Self::Percent => "'%'",
            Self::Bang => "'!'",
            Self::AmpAmp => "'&&'",
            Self::PipePipe => "'||'",
            Self::Error => "unrecognized input",
            Self::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Which stream a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Tokens the grammar consumes.
    Content,
    /// Whitespace and comments; filtered out before the parser sees them.
    Trivia,
}

/// Out-of-band facts about a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TokenFlags {
    /// The token marks the end of input.
    pub end_of_input: bool,
    /// The token was synthesized by the parser in place of one that was
    /// expected but missing. It has no text and a zero-width span.
    pub missing: bool,
}

/// A lexed token. Tokens borrow their text from the source and are never
/// mutated once produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
    pub channel: Channel,
    pub flags: TokenFlags,
}

impl<'src> Token<'src> {
    /// A token produced from source text; the channel follows from the kind.
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        let channel = if kind.is_trivia() {
            Channel::Trivia
        } else {
            Channel::Content
        };
        Self {
            kind,
            text,
            span,
            channel,
            flags: TokenFlags::default(),
        }
    }

    /// The end-of-input token at `pos`.
    pub fn eof(pos: Position) -> Self {
        Self {
            kind: TokenKind::Eof,
            text: "",
            span: Span::at(pos),
            channel: Channel::Content,
            flags: TokenFlags {
                end_of_input: true,
                missing: false,
            },
        }
    }

    /// A placeholder for an expected token of `kind` that was not found at `pos`.
    pub fn missing(kind: TokenKind, pos: Position) -> Self {
        Self {
            kind,
            text: "",
            span: Span::at(pos),
            channel: Channel::Content,
            flags: TokenFlags {
                end_of_input: false,
                missing: true,
            },
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof || self.flags.end_of_input
    }

    pub fn is_missing(&self) -> bool {
        self.flags.missing
    }

    pub fn is_trivia(&self) -> bool {
        self.channel == Channel::Trivia
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_detection() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Newline.is_trivia());
        assert!(TokenKind::LineComment.is_trivia());
        assert!(TokenKind::BlockComment.is_trivia());
        assert!(!TokenKind::Ident.is_trivia());
        assert!(!TokenKind::Eof.is_trivia());
    }

    #[test]
    fn channel_follows_kind() {
        let span = Span::at(Position::START);
        assert_eq!(Token::new(TokenKind::Whitespace, " ", span).channel, Channel::Trivia);
        assert_eq!(Token::new(TokenKind::Ident, "x", span).channel, Channel::Content);
    }

    #[test]
    fn synthesized_tokens_are_flagged() {
        let pos = Position::new(3, 1, 4);
        let eof = Token::eof(pos);
        assert!(eof.is_eof());
        assert!(!eof.is_missing());

        let missing = Token::missing(TokenKind::Semicolon, pos);
        assert!(missing.is_missing());
        assert!(!missing.is_eof());
        assert_eq!(missing.kind, TokenKind::Semicolon);
        assert!(missing.span.is_empty());
        assert_eq!(missing.text, "");
    }

    #[test]
    fn display_uses_description() {
        assert_eq!(TokenKind::Semicolon.to_string(), "';'");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }
}
