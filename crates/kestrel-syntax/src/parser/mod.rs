//! # Parser Engine
//!
//! The grammar-independent core: a recursive-descent toolkit that never
//! aborts. Grammar rules (see [`grammar`]) are plain functions taking
//! `&mut Parser` and building typed AST nodes from these primitives:
//!
//! - Inspect: [`current`](Parser::current), [`lookahead`](Parser::lookahead),
//!   [`at`](Parser::at), [`is_at_end`](Parser::is_at_end)
//! - Consume: [`advance`](Parser::advance), [`eat`](Parser::eat),
//!   [`expect`](Parser::expect)
//! - Speculate: [`mark`](Parser::mark) → [`Marker`], [`try_parse`](Parser::try_parse)
//! - Combine: [`many`](Parser::many), [`separated_list`](Parser::separated_list)
//! - Recover: [`report_error_at`](Parser::report_error_at),
//!   [`synchronize`](Parser::synchronize)
//! - Locate: [`span_from`](Parser::span_from), [`Span::between`]
//!
//! ## Error Tolerance
//!
//! Nothing here returns `Err`. A missing token is reported and replaced by a
//! synthesized token flagged `missing`; an optional element that is not there
//! is `None`. A syntactically broken file still yields a complete tree plus
//! a diagnostic list.
//!
//! ## Error Bursts
//!
//! One real mistake (say a missing `}`) tends to cause a run of follow-on
//! errors. The engine counts consecutive errors; a successful `eat` or
//! `expect` ends the run. When [`ERROR_BURST_LIMIT`] errors pile up, the
//! engine synchronizes on the [`SyncPolicy`]'s default set and starts
//! counting again.
//!
//! ## Speculation
//!
//! [`try_parse`](Parser::try_parse) runs an attempt under a fresh marker.
//! Returning `None` rolls back everything, including diagnostics the attempt
//! reported, so abandoned alternatives never leak into the final log.
//!
//! ## Nesting
//!
//! Grammar rules recurse once per nesting level, so deeply nested input can
//! overflow the stack. Recursive rules run under [`nested`](Parser::nested),
//! which refuses to go deeper than [`MAX_NESTING`] and leaves the grammar to
//! report and skip the construct.

pub mod grammar;
mod lookahead;
mod marker;

use log::{debug, trace};

use crate::ast::Expr;
use crate::diagnostic::{Diagnostic, DiagnosticLog};
use crate::source::TokenSource;
use crate::span::Span;
use crate::token::{Token, TokenKind};

pub use lookahead::Lookahead;
pub use marker::Marker;
use marker::Checkpoint;

/// Consecutive errors after which the engine resynchronizes.
pub const ERROR_BURST_LIMIT: usize = 5;

/// Deepest level of [`Parser::nested`] rules.
pub const MAX_NESTING: usize = 64;

/// Grammar-specific error recovery hooks.
pub trait SyncPolicy {
    /// Token kinds burst recovery skips forward to.
    fn default_sync_set(&self) -> &[TokenKind] {
        &[]
    }

    /// Whether the gap between `prev` and `next` is a recovery boundary.
    fn starts_sync_boundary(&self, _prev: Option<&Token<'_>>, _next: &Token<'_>) -> bool {
        false
    }
}

/// Recovery that only stops at the explicit follow set or end of input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSyncBoundary;

impl SyncPolicy for NoSyncBoundary {}

/// The contract a concrete grammar built on [`Parser`] fulfils.
pub trait Grammar {
    type Root;

    /// Parse the whole input.
    fn parse(&mut self) -> Self::Root;

    /// Parse one expression, or decline if none starts here.
    fn parse_expression(&mut self) -> Option<Expr>;
}

/// A root node paired with the diagnostics of the committed parse path.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    pub root: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ParseResult<T> {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// The parser state machine.
///
/// Single-threaded and non-reentrant: a parse owns its engine for the whole
/// run, and nested speculation resolves before the caller continues.
pub struct Parser<'src, S: TokenSource<'src>, P = NoSyncBoundary> {
    tokens: Lookahead<'src, S>,
    diagnostics: DiagnosticLog,
    error_burst: usize,
    recoveries: usize,
    depth: usize,
    policy: P,
}

impl<'src, S: TokenSource<'src>, P: SyncPolicy + Default> Parser<'src, S, P> {
    pub fn new(source: S) -> Self {
        Self::with_policy(source, P::default())
    }
}

impl<'src, S: TokenSource<'src>, P: SyncPolicy> Parser<'src, S, P> {
    pub fn with_policy(source: S, policy: P) -> Self {
        Self {
            tokens: Lookahead::new(source),
            diagnostics: DiagnosticLog::new(),
            error_burst: 0,
            recoveries: 0,
            depth: 0,
            policy,
        }
    }

    // === Inspecting ===

    /// The `n`th upcoming token, 1-based. See [`Lookahead::lookahead`].
    pub fn lookahead(&mut self, n: usize) -> Token<'src> {
        self.tokens.lookahead(n)
    }

    pub fn current(&mut self) -> Token<'src> {
        self.tokens.lookahead(1)
    }

    pub fn at(&mut self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    pub fn at_any(&mut self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current().kind)
    }

    pub fn is_at_end(&mut self) -> bool {
        self.tokens.is_at_end()
    }

    pub fn previous(&self) -> Option<&Token<'src>> {
        self.tokens.previous()
    }

    // === Consuming ===

    /// Consume the current token unconditionally.
    pub fn advance(&mut self) -> Token<'src> {
        self.tokens.advance()
    }

    /// Consume the current token if it is `kind`. Never reports anything.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.consume();
            true
        } else {
            false
        }
    }

    /// Consume the current token if it is one of `kinds`, returning its kind.
    pub fn eat_any(&mut self, kinds: &[TokenKind]) -> Option<TokenKind> {
        let kind = self.current().kind;
        if kinds.contains(&kind) {
            self.consume();
            Some(kind)
        } else {
            None
        }
    }

    /// Consume a token of `kind`, or report an error and hand back a
    /// synthesized missing token positioned where `kind` was expected.
    ///
    /// Nothing is consumed on mismatch, so this always returns promptly.
    pub fn expect(&mut self, kind: TokenKind, message: Option<&str>) -> Token<'src> {
        let next = self.current();
        if next.kind == kind {
            return self.consume();
        }
        let message = message
            .map(str::to_owned)
            .unwrap_or_else(|| format!("expected {kind}, found {}", next.kind));
        self.report_error_at(&next, message);
        Token::missing(kind, next.span.start_position())
    }

    /// Like [`expect`](Self::expect) against a set; the synthesized token
    /// takes the first kind in `kinds`.
    ///
    /// # Panics
    ///
    /// If `kinds` is empty.
    pub fn expect_any(&mut self, message: Option<&str>, kinds: &[TokenKind]) -> Token<'src> {
        assert!(!kinds.is_empty(), "expect_any needs at least one token kind");
        let next = self.current();
        if kinds.contains(&next.kind) {
            return self.consume();
        }
        let message = message.map(str::to_owned).unwrap_or_else(|| {
            let expected: Vec<_> = kinds.iter().map(|k| k.describe()).collect();
            format!("expected one of {}, found {}", expected.join(", "), next.kind)
        });
        self.report_error_at(&next, message);
        Token::missing(kinds[0], next.span.start_position())
    }

    fn consume(&mut self) -> Token<'src> {
        self.error_burst = 0;
        self.tokens.advance()
    }

    // === Reporting and recovery ===

    /// Record an error at `token`. The fifth error in a row triggers
    /// [`synchronize`](Self::synchronize) on the policy's default set.
    pub fn report_error_at(&mut self, token: &Token<'src>, message: impl Into<String>) {
        let diagnostic = Diagnostic::error(token.span.start_position(), message);
        trace!("{diagnostic}");
        self.diagnostics.push(diagnostic);

        self.error_burst += 1;
        if self.error_burst >= ERROR_BURST_LIMIT {
            let follow = self.policy.default_sync_set().to_vec();
            let skipped = self.synchronize(&follow);
            debug!("{ERROR_BURST_LIMIT} consecutive errors, skipped {skipped} tokens to recover");
            self.recoveries += 1;
            self.error_burst = 0;
        }
    }

    /// Record an error at the current token.
    pub fn report_error(&mut self, message: impl Into<String>) {
        let token = self.current();
        self.report_error_at(&token, message);
    }

    /// Record a warning at `token`. Warnings do not count towards bursts.
    pub fn report_warning_at(&mut self, token: &Token<'src>, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(token.span.start_position(), message);
        trace!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Skip tokens until one in `follow`, a policy sync boundary, or end of
    /// input. Returns how many tokens were skipped.
    pub fn synchronize(&mut self, follow: &[TokenKind]) -> usize {
        let mut skipped = 0;
        loop {
            let next = self.current();
            if next.is_eof()
                || follow.contains(&next.kind)
                || self
                    .policy
                    .starts_sync_boundary(self.tokens.previous(), &next)
            {
                break;
            }
            self.tokens.advance();
            skipped += 1;
        }
        debug!("synchronized after skipping {skipped} tokens");
        skipped
    }

    // === Speculation ===

    /// Capture the full parser state for a later commit or rollback.
    pub fn mark(&self) -> Marker<'src, S> {
        Marker::new(Checkpoint {
            tokens: self.tokens.save(),
            diagnostics: self.diagnostics.clone(),
            error_burst: self.error_burst,
            recoveries: self.recoveries,
        })
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint<'src, S>) {
        self.tokens.restore(checkpoint.tokens);
        self.diagnostics = checkpoint.diagnostics;
        self.error_burst = checkpoint.error_burst;
        self.recoveries = checkpoint.recoveries;
    }

    /// Run `attempt` speculatively. `None` rolls the parser back, dropping
    /// any diagnostics the attempt reported; `Some` keeps everything.
    pub fn try_parse<T>(&mut self, attempt: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let mut marker = self.mark();
        match attempt(self) {
            Some(value) => {
                marker.commit();
                Some(value)
            }
            None => {
                marker.rollback(self);
                None
            }
        }
    }

    // === Nesting ===

    /// Run `rule` one nesting level deeper, or return `None` without running
    /// it once [`MAX_NESTING`] levels are active.
    pub fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.depth >= MAX_NESTING {
            debug!("nesting limit of {MAX_NESTING} reached");
            return None;
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        Some(result)
    }

    /// Currently active [`nested`](Self::nested) levels.
    pub fn depth(&self) -> usize {
        self.depth
    }

    // === Combinators ===

    /// Parse elements while `continue_at` accepts the current token.
    ///
    /// Stops without reporting when `element` declines, at end of input, or
    /// when an element succeeds without consuming anything.
    pub fn many<T>(
        &mut self,
        mut continue_at: impl FnMut(&Token<'src>) -> bool,
        mut element: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let next = self.current();
            if next.is_eof() || !continue_at(&next) {
                break;
            }
            let Some(item) = element(self) else {
                break;
            };
            items.push(item);
            if self.current() == next {
                break;
            }
        }
        items
    }

    /// Parse `element (separator element)*`.
    ///
    /// Each element after a separator is probed under a marker. If the probe
    /// declines it is rolled back; with `allow_trailing` the list simply
    /// ends, otherwise "element expected after separator" is reported at the
    /// token following the separator. A declined first element yields an
    /// empty list.
    pub fn separated_list<T>(
        &mut self,
        separator: TokenKind,
        allow_trailing: bool,
        mut element: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let mut items = Vec::new();
        let Some(first) = element(self) else {
            return items;
        };
        items.push(first);

        while self.eat(separator) {
            let mut probe = self.mark();
            match element(self) {
                Some(item) => {
                    probe.commit();
                    items.push(item);
                }
                None => {
                    probe.rollback(self);
                    if !allow_trailing {
                        self.report_error("element expected after separator");
                    }
                    break;
                }
            }
        }
        items
    }

    // === Spans ===

    /// Span from `start` to the end of the last consumed token.
    ///
    /// If nothing was consumed since `start` (for instance `start` belongs to
    /// a synthesized token) the result is `start` itself.
    pub fn span_from(&self, start: Span) -> Span {
        match self.tokens.previous() {
            Some(prev) if prev.span.end >= start.start && prev.span.start >= start.start => {
                Span::between(start, prev.span)
            }
            _ => start,
        }
    }

    /// Pure span union; see [`Span::between`].
    pub fn span_between(&self, first: Span, last: Span) -> Span {
        Span::between(first, last)
    }

    // === Results ===

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Errors reported since the last successful match.
    pub fn error_burst(&self) -> usize {
        self.error_burst
    }

    /// How many times burst recovery has synchronized.
    pub fn recoveries(&self) -> usize {
        self.recoveries
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn source(&self) -> &S {
        self.tokens.source()
    }

    /// Consume the engine and pair `root` with the committed diagnostics.
    pub fn finish<T>(self, root: T) -> ParseResult<T> {
        ParseResult {
            root,
            diagnostics: self.diagnostics.into_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexerSource;
    use crate::source::VecSource;
    use crate::span::Position;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parser(input: &str) -> Parser<'_, LexerSource<'_>> {
        Parser::new(LexerSource::new(input))
    }

    fn ident<'src, S: TokenSource<'src>, P: SyncPolicy>(
        p: &mut Parser<'src, S, P>,
    ) -> Option<&'src str> {
        if p.at(TokenKind::Ident) {
            Some(p.advance().text)
        } else {
            None
        }
    }

    #[derive(Default)]
    struct SemicolonSync;

    impl SyncPolicy for SemicolonSync {
        fn default_sync_set(&self) -> &[TokenKind] {
            &[TokenKind::Semicolon]
        }
    }

    #[test]
    fn eat_consumes_only_on_match() {
        let mut p = parser("a ;");
        assert!(!p.eat(TokenKind::Semicolon));
        assert!(p.eat(TokenKind::Ident));
        assert!(p.eat(TokenKind::Semicolon));
        assert!(p.is_at_end());
        assert!(p.diagnostics().is_empty());
    }

    #[test]
    fn eat_any_returns_matched_kind() {
        let mut p = parser("+= x");
        let ops = [TokenKind::Assign, TokenKind::PlusAssign];
        assert_eq!(p.eat_any(&ops), Some(TokenKind::PlusAssign));
        assert_eq!(p.eat_any(&ops), None);
        assert_eq!(p.current().text, "x");
    }

    #[test]
    fn expect_synthesizes_missing_token() {
        let mut p = parser("a }");
        p.advance();
        let token = p.expect(TokenKind::Semicolon, None);
        assert!(token.is_missing());
        assert_eq!(token.kind, TokenKind::Semicolon);
        assert_eq!(token.span.start_position(), Position::new(2, 1, 3));
        assert_eq!(p.current().kind, TokenKind::RBrace);

        let messages: Vec<_> = p.diagnostics().iter().map(|d| d.message.clone()).collect();
        assert_eq!(messages, vec!["expected ';', found '}'"]);
    }

    #[test]
    fn expect_uses_custom_message() {
        let mut p = parser("x");
        p.expect(TokenKind::LParen, Some("conditions need parentheses"));
        assert_eq!(p.diagnostics().as_slice()[0].message, "conditions need parentheses");
    }

    #[test]
    fn expect_any_lists_alternatives() {
        let mut p = parser("1");
        let token = p.expect_any(None, &[TokenKind::Ident, TokenKind::This]);
        assert_eq!(token.kind, TokenKind::Ident);
        assert!(token.is_missing());
        assert_eq!(
            p.diagnostics().as_slice()[0].message,
            "expected one of identifier, 'this', found integer literal"
        );
    }

    #[test]
    fn expect_never_blocks_on_absent_kind() {
        let mut p = parser("a b c");
        let before = p.current();
        let token = p.expect(TokenKind::Semicolon, None);
        assert!(token.is_missing());
        assert_eq!(p.current(), before);
        assert_eq!(p.diagnostics().len(), 1);
    }

    #[test]
    fn burst_limit_synchronizes_once_and_resets() {
        let mut p: Parser<'_, _, SemicolonSync> = Parser::new(LexerSource::new("a b c ; d"));
        let at = p.current();
        for _ in 0..ERROR_BURST_LIMIT - 1 {
            p.report_error_at(&at, "boom");
        }
        assert_eq!(p.recoveries(), 0);
        assert_eq!(p.error_burst(), ERROR_BURST_LIMIT - 1);

        p.report_error_at(&at, "boom");
        assert_eq!(p.recoveries(), 1);
        assert_eq!(p.error_burst(), 0);
        assert_eq!(p.current().kind, TokenKind::Semicolon);

        p.report_error_at(&at, "boom");
        assert_eq!(p.error_burst(), 1);
        assert_eq!(p.recoveries(), 1);
        assert_eq!(p.diagnostics().len(), ERROR_BURST_LIMIT + 1);
    }

    #[test]
    fn rolled_back_recovery_is_not_counted() {
        let mut p: Parser<'_, _, SemicolonSync> = Parser::new(LexerSource::new("a b c ; d"));
        let declined = p.try_parse(|p| {
            let at = p.current();
            for _ in 0..ERROR_BURST_LIMIT {
                p.report_error_at(&at, "boom");
            }
            assert_eq!(p.recoveries(), 1);
            None::<()>
        });
        assert!(declined.is_none());
        assert_eq!(p.recoveries(), 0);
        assert_eq!(p.current().text, "a");
        assert!(p.diagnostics().is_empty());
    }

    #[test]
    fn successful_match_ends_the_burst() {
        let mut p = parser("a b");
        p.report_error("one");
        p.report_error("two");
        assert_eq!(p.error_burst(), 2);
        p.expect(TokenKind::Ident, None);
        assert_eq!(p.error_burst(), 0);
    }

    #[test]
    fn warnings_do_not_count_towards_bursts() {
        let mut p = parser("a");
        let at = p.current();
        for _ in 0..10 {
            p.report_warning_at(&at, "meh");
        }
        assert_eq!(p.error_burst(), 0);
        assert_eq!(p.recoveries(), 0);
        assert_eq!(p.diagnostics().warning_count(), 10);
    }

    #[test]
    fn nested_refuses_past_the_limit() {
        fn dive<'src, S: TokenSource<'src>, P: SyncPolicy>(p: &mut Parser<'src, S, P>) -> usize {
            p.nested(dive).map_or(p.depth(), |deepest| deepest)
        }
        let mut p = parser("a");
        assert_eq!(dive(&mut p), MAX_NESTING);
        assert_eq!(p.depth(), 0);
        assert_eq!(p.nested(|p| p.depth()), Some(1));
    }

    #[test]
    fn synchronize_stops_at_follow_set() {
        let mut p = parser("a b ; c");
        assert_eq!(p.synchronize(&[TokenKind::Semicolon]), 2);
        assert_eq!(p.current().kind, TokenKind::Semicolon);
        assert_eq!(p.synchronize(&[TokenKind::Semicolon]), 0);
    }

    #[test]
    fn synchronize_stops_at_end_of_input() {
        let mut p = parser("a b c");
        assert_eq!(p.synchronize(&[TokenKind::RBrace]), 3);
        assert!(p.is_at_end());
    }

    #[test]
    fn synchronize_consults_policy_boundary() {
        struct AfterSemicolon;
        impl SyncPolicy for AfterSemicolon {
            fn starts_sync_boundary(&self, prev: Option<&Token<'_>>, _next: &Token<'_>) -> bool {
                prev.is_some_and(|t| t.kind == TokenKind::Semicolon)
            }
        }
        let mut p = Parser::with_policy(LexerSource::new("a ; b c"), AfterSemicolon);
        assert_eq!(p.synchronize(&[]), 2);
        assert_eq!(p.current().text, "b");
    }

    #[test]
    fn rollback_restores_everything() {
        let mut p = parser("a b c d");
        p.advance();
        p.report_error("before");
        p.lookahead(2);

        let current = p.current();
        let previous = p.previous().copied();
        let buffered: Vec<_> = p.tokens.buffered().copied().collect();
        let diagnostics = p.diagnostics().clone();
        let burst = p.error_burst();

        let mut m = p.mark();
        p.advance();
        p.advance();
        p.report_error("during");
        p.lookahead(3);
        m.rollback(&mut p);

        assert_eq!(p.previous().copied(), previous);
        assert_eq!(p.tokens.buffered().copied().collect::<Vec<_>>(), buffered);
        assert_eq!(p.diagnostics(), &diagnostics);
        assert_eq!(p.error_burst(), burst);
        assert_eq!(p.current(), current);
        let rest: Vec<_> = (0..3).map(|_| p.advance().text).collect();
        assert_eq!(rest, vec!["b", "c", "d"]);
    }

    #[test]
    fn second_rollback_is_a_no_op() {
        let mut p = parser("a b");
        let mut m = p.mark();
        p.advance();
        m.rollback(&mut p);
        p.advance();
        m.rollback(&mut p);
        assert!(m.is_resolved());
        assert_eq!(p.current().text, "b");
    }

    #[test]
    fn commit_keeps_state() {
        let mut p = parser("a b");
        let mut m = p.mark();
        p.advance();
        p.report_error("kept");
        m.commit();
        m.rollback(&mut p);
        assert_eq!(p.current().text, "b");
        assert_eq!(p.diagnostics().len(), 1);
    }

    #[test]
    #[should_panic(expected = "Marker must be either committed or rolled back")]
    fn unresolved_marker_panics_on_drop() {
        let p = parser("a");
        let _m = p.mark();
    }

    #[rstest]
    #[case::failure(false, 1)]
    #[case::success(true, 3)]
    fn try_parse_isolates_diagnostics(#[case] succeed: bool, #[case] expected: usize) {
        let mut p = parser("a b c");
        p.report_error("pre-existing");
        let result = p.try_parse(|p| {
            p.advance();
            p.report_error("one");
            p.report_error("two");
            succeed.then_some(())
        });
        assert_eq!(result.is_some(), succeed);
        assert_eq!(p.diagnostics().len(), expected);
        let expected_next = if succeed { "b" } else { "a" };
        assert_eq!(p.current().text, expected_next);
    }

    #[test]
    fn nested_speculation_unwinds_inner_first() {
        let mut p = parser("a b c");
        let outer = p.try_parse(|p| {
            p.advance();
            let inner = p.try_parse(|p| {
                p.advance();
                p.report_error("inner");
                None::<()>
            });
            assert!(inner.is_none());
            assert_eq!(p.current().text, "b");
            Some(p.advance().text)
        });
        assert_eq!(outer, Some("b"));
        assert!(p.diagnostics().is_empty());
        assert_eq!(p.current().text, "c");
    }

    #[test]
    fn many_stops_when_predicate_fails() {
        let mut p = parser("a b ; c");
        let items = p.many(|t| t.kind != TokenKind::Semicolon, ident);
        assert_eq!(items, vec!["a", "b"]);
        assert_eq!(p.current().kind, TokenKind::Semicolon);
    }

    #[test]
    fn many_stops_when_element_declines() {
        let mut p = parser("a b 1 c");
        let items = p.many(|_| true, ident);
        assert_eq!(items, vec!["a", "b"]);
        assert!(p.diagnostics().is_empty());
    }

    #[test]
    fn many_terminates_on_non_consuming_element() {
        let mut p = parser("a b");
        let items = p.many(|_| true, |_| Some(()));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn many_stops_at_end_of_input() {
        let mut p = parser("a b c");
        let items = p.many(|_| true, ident);
        assert_eq!(items.len(), 3);
        assert!(p.is_at_end());
    }

    #[rstest]
    #[case::trailing_allowed(true, 0)]
    #[case::trailing_rejected(false, 1)]
    fn separated_list_trailing_separator(#[case] allow_trailing: bool, #[case] diagnostics: usize) {
        let mut p = parser("A , B ,");
        let items = p.separated_list(TokenKind::Comma, allow_trailing, ident);
        assert_eq!(items, vec!["A", "B"]);
        assert_eq!(p.diagnostics().len(), diagnostics);
        assert!(p.is_at_end());
    }

    #[test]
    fn separated_list_reports_after_separator() {
        let mut p = parser("A , )");
        let items = p.separated_list(TokenKind::Comma, false, ident);
        assert_eq!(items, vec!["A"]);
        let d = &p.diagnostics().as_slice()[0];
        assert_eq!(d.message, "element expected after separator");
        assert_eq!(d.offset, 4);
        assert_eq!(p.current().kind, TokenKind::RParen);
    }

    #[test]
    fn separated_list_discards_probe_diagnostics() {
        let mut p = parser("A , 1");
        let items = p.separated_list(TokenKind::Comma, true, |p| {
            if p.at(TokenKind::Ident) {
                Some(p.advance().text)
            } else {
                p.report_error("not an identifier");
                p.advance();
                None
            }
        });
        assert_eq!(items, vec!["A"]);
        assert!(p.diagnostics().is_empty());
        assert_eq!(p.current().kind, TokenKind::IntLiteral);
    }

    #[test]
    fn separated_list_empty_when_first_declines() {
        let mut p = parser(")");
        let items = p.separated_list(TokenKind::Comma, false, ident);
        assert!(items.is_empty());
        assert!(p.diagnostics().is_empty());
    }

    #[test]
    fn span_from_covers_consumed_tokens() {
        let mut p = parser("foo ( bar )");
        let start = p.current().span;
        p.advance();
        p.advance();
        p.advance();
        p.advance();
        let span = p.span_from(start);
        assert_eq!((span.start, span.end), (0, 11));
    }

    #[test]
    fn span_from_missing_token_is_zero_width() {
        let mut p = parser("a b");
        p.advance();
        let missing = p.expect(TokenKind::Semicolon, None);
        let span = p.span_from(missing.span);
        assert!(span.is_empty());
        assert_eq!(span.start, 2);
    }

    #[test]
    fn works_over_materialized_tokens() {
        let source = VecSource::from_pairs(&[
            (TokenKind::Ident, "a"),
            (TokenKind::Whitespace, " "),
            (TokenKind::Comma, ","),
            (TokenKind::LineComment, "// x"),
            (TokenKind::Ident, "b"),
        ]);
        let mut p: Parser<'_, _> = Parser::new(source);
        let items = p.separated_list(TokenKind::Comma, false, ident);
        assert_eq!(items, vec!["a", "b"]);
        let result = p.finish(items);
        assert!(!result.has_errors());
    }
}
