//! Backtracking markers.
//!
//! A [`Marker`] captures the complete parser state at the moment
//! [`Parser::mark`](super::Parser::mark) is called:
//!
//! - the token source read position,
//! - a copy of the lookahead buffer,
//! - the previously consumed token,
//! - a copy of the diagnostic log (and the error burst and recovery
//!   counters).
//!
//! It must be resolved exactly once, by [`commit`](Marker::commit) (keep
//! whatever happened since) or [`rollback`](Marker::rollback) (return to the
//! captured state). After either call the marker is inert, so a second
//! `rollback` does nothing.
//!
//! ```ignore
//! let mut m = p.mark();
//! match local_var_decl(p) {
//!     Some(decl) => { m.commit(); decl }
//!     None => { m.rollback(p); expression_statement(p) }
//! }
//! ```
//!
//! Capturing costs O(k) in the size of the lookahead buffer and diagnostic
//! log. The copies are owned by the marker, so nothing the parser does after
//! `mark()` can alter what a rollback restores.
//!
//! Dropping a marker that was never resolved panics, the same way an
//! unfinished tree node would: it means a grammar rule forgot a branch.

use log::trace;

use super::lookahead::LookaheadState;
use super::{Parser, SyncPolicy};
use crate::diagnostic::DiagnosticLog;
use crate::source::TokenSource;

pub(crate) struct Checkpoint<'src, S: TokenSource<'src>> {
    pub(crate) tokens: LookaheadState<'src, S>,
    pub(crate) diagnostics: DiagnosticLog,
    pub(crate) error_burst: usize,
    pub(crate) recoveries: usize,
}

#[must_use = "Markers must be committed or rolled back, dropping them is a bug"]
pub struct Marker<'src, S: TokenSource<'src>> {
    checkpoint: Option<Checkpoint<'src, S>>,
}

impl<'src, S: TokenSource<'src>> Marker<'src, S> {
    pub(crate) fn new(checkpoint: Checkpoint<'src, S>) -> Self {
        Self {
            checkpoint: Some(checkpoint),
        }
    }

    /// Discard the capture and keep the current parser state.
    pub fn commit(&mut self) {
        if self.checkpoint.take().is_some() {
            trace!("marker committed");
        }
    }

    /// Restore the parser to the captured state.
    pub fn rollback<P: SyncPolicy>(&mut self, parser: &mut Parser<'src, S, P>) {
        if let Some(checkpoint) = self.checkpoint.take() {
            trace!(
                "marker rolled back, discarding {} diagnostics",
                parser
                    .diagnostics()
                    .len()
                    .saturating_sub(checkpoint.diagnostics.len())
            );
            parser.restore(checkpoint);
        }
    }

    /// True once `commit` or `rollback` has been called.
    pub fn is_resolved(&self) -> bool {
        self.checkpoint.is_none()
    }
}

impl<'src, S: TokenSource<'src>> Drop for Marker<'src, S> {
    fn drop(&mut self) {
        if self.checkpoint.is_some() && !std::thread::panicking() {
            panic!("Marker must be either committed or rolled back");
        }
    }
}
