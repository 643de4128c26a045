//! # Kestrel Grammar
//!
//! The concrete grammar on top of the [`Parser`] engine. Each rule is a
//! function taking `&mut KestrelParser` and returning the node it built:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.lookahead()`)
//! 2. Consume tokens (`p.eat()`, `p.expect()`)
//! 3. Call other rules, speculating with `p.try_parse()` where two
//!    productions share a prefix
//! 4. Stamp the node with `p.span_from(start)`
//!
//! ## Module Structure
//!
//! - [`decl`] - Classes, fields, methods, parameters, types
//! - [`stmt`] - Blocks and statements
//! - [`expr`] - Expressions, by precedence climbing
//!
//! ## Writing Grammar Rules
//!
//! ```ignore
//! fn while_stmt(p: &mut KestrelParser<'src, S>) -> WhileStmt {
//!     let start = p.advance().span;           // 1. Consume the keyword
//!     p.expect(TokenKind::LParen, None);      // 2. Missing tokens are reported,
//!     let condition = expr::required_expression(p); //    not fatal
//!     p.expect(TokenKind::RParen, None);
//!     let body = Box::new(statement(p));      // 3. Call other rules
//!     WhileStmt { condition, body, span: p.span_from(start) } // 4. Stamp
//! }
//! ```
//!
//! ## Error Recovery
//!
//! Rules are lenient and always return a node:
//!
//! - `expect` stands in a missing token and reports it
//! - Unparseable expressions become `ErrorExpr`
//! - Junk between declarations is reported and skipped with `synchronize`,
//!   unless reporting it already triggered burst recovery
//! - Statements and expressions nested deeper than [`MAX_NESTING`] are
//!   reported once and skipped with their brackets balanced
//!
//! Every loop consumes at least one token per iteration, so recovery always
//! makes progress.

mod decl;
mod expr;
mod stmt;

use crate::ast::{CompilationUnit, Expr, Stmt};
use crate::lexer::LexerSource;
use crate::parser::{Grammar, MAX_NESTING, ParseResult, Parser, SyncPolicy};
use crate::source::TokenSource;
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Recovery points of the Kestrel grammar: statement ends, closing braces
/// and class headers.
#[derive(Debug, Default, Clone, Copy)]
pub struct KestrelSync;

impl SyncPolicy for KestrelSync {
    fn default_sync_set(&self) -> &[TokenKind] {
        &[TokenKind::Semicolon, TokenKind::RBrace, TokenKind::Class]
    }

    fn starts_sync_boundary(&self, prev: Option<&Token<'_>>, _next: &Token<'_>) -> bool {
        prev.is_some_and(|t| matches!(t.kind, TokenKind::Semicolon | TokenKind::RBrace))
    }
}

/// The engine as configured for Kestrel.
pub type KestrelParser<'src, S = LexerSource<'src>> = Parser<'src, S, KestrelSync>;

/// Kestrel grammar over any token source.
pub struct Kestrel<'src, S: TokenSource<'src> = LexerSource<'src>> {
    parser: KestrelParser<'src, S>,
}

impl<'src, S: TokenSource<'src>> Kestrel<'src, S> {
    pub fn new(source: S) -> Self {
        Self {
            parser: Parser::new(source),
        }
    }

    pub fn parser(&mut self) -> &mut KestrelParser<'src, S> {
        &mut self.parser
    }

    pub fn finish<T>(self, root: T) -> ParseResult<T> {
        self.parser.finish(root)
    }
}

impl<'src, S: TokenSource<'src>> Grammar for Kestrel<'src, S> {
    type Root = CompilationUnit;

    fn parse(&mut self) -> CompilationUnit {
        decl::compilation_unit(&mut self.parser)
    }

    fn parse_expression(&mut self) -> Option<Expr> {
        expr::expression(&mut self.parser)
    }
}

/// Parse a source file.
pub fn parse_compilation_unit(source: &str) -> ParseResult<CompilationUnit> {
    let mut grammar = Kestrel::new(LexerSource::new(source));
    let root = grammar.parse();
    grammar.finish(root)
}

/// Parse a single statement; anything after it is reported.
pub fn parse_statement(source: &str) -> ParseResult<Stmt> {
    let mut p: KestrelParser<'_> = Parser::new(LexerSource::new(source));
    let stmt = stmt::statement(&mut p);
    expect_end(&mut p);
    p.finish(stmt)
}

/// Parse a single expression; anything after it is reported.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let mut p: KestrelParser<'_> = Parser::new(LexerSource::new(source));
    let expr = expr::required_expression(&mut p);
    expect_end(&mut p);
    p.finish(expr)
}

/// Zero-width span for a node standing in for something missing. It sits
/// right after the last consumed token so it stays inside the enclosing node.
fn placeholder_span<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) -> Span {
    match p.previous().copied() {
        Some(prev) => Span::at(prev.span.start_position().advanced_by(prev.text)),
        None => Span::at(p.current().span.start_position()),
    }
}

/// Report a construct nested deeper than [`MAX_NESTING`] and skip it. Stops
/// before a closing bracket or `;` of an enclosing level; a statement also
/// takes its `;`. Returns the span of what was skipped.
fn skip_too_deep<'src, S: TokenSource<'src>>(
    p: &mut KestrelParser<'src, S>,
    statement: bool,
) -> Span {
    let start = p.current();
    p.report_error_at(&start, "nesting too deep");
    let mut open = 0usize;
    loop {
        match p.current().kind {
            TokenKind::Eof => break,
            TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket => open += 1,
            TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket => {
                if open == 0 {
                    break;
                }
                open -= 1;
            }
            TokenKind::Semicolon if open == 0 => {
                if statement {
                    p.advance();
                }
                break;
            }
            _ => {}
        }
        p.advance();
    }
    if p.current() == start {
        placeholder_span(p)
    } else {
        p.span_from(start.span)
    }
}

fn expect_end<'src, S: TokenSource<'src>>(p: &mut KestrelParser<'src, S>) {
    let next = p.current();
    if !next.is_eof() {
        p.report_error_at(&next, format!("expected end of input, found {}", next.kind));
    }
}
