//! Greedy longest-match scanning over a token stream.
//!
//! [`Scanner`] is the per-token state machine; [`Matches`] drives it over a
//! token slice and yields each [`NgramMatch`] as soon as it is confirmed.
//!
//! # State
//!
//! | field | meaning |
//! |-------|---------|
//! | `node` | current trie position (root when no candidate is open) |
//! | `start` | index where the open candidate began |
//! | `end` | one past the last token consumed into the candidate |
//! | `best` | the last terminal node reached on the candidate |
//! | `resume_at` | first non-terminal extension after `best` |
//!
//! # INV: matches never overlap and come out in input order
//!
//! After an emit, scanning resumes at or after the emitted match's end.
//!
//! End of input only flushes: a pending match is emitted and the scan
//! stops. A candidate still open at the end is not rescanned, so a shorter
//! ngram inside a trailing partial candidate is not reported.

use std::iter::FusedIterator;
use std::ops::Range;

use crate::trie::{TokenTrie, ROOT};

/// A matched ngram together with its half-open `[start, end)` token span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct NgramMatch<V> {
    /// The payload stored for the ngram.
    pub value: V,
    /// Index of the first matched token.
    pub start: usize,
    /// Index one past the last matched token.
    pub end: usize,
}

impl<V> NgramMatch<V> {
    /// Create a match.
    pub fn new(value: V, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }

    /// The `[start, end)` range of input tokens covered by this match.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Map the payload, keeping the span.
    pub fn map<U>(self, f: impl FnOnce(V) -> U) -> NgramMatch<U> {
        NgramMatch {
            value: f(self.value),
            start: self.start,
            end: self.end,
        }
    }

    /// Split into `(value, start, end)`.
    pub fn into_parts(self) -> (V, usize, usize) {
        (self.value, self.start, self.end)
    }
}

impl<V: Clone> NgramMatch<&V> {
    /// Clone the borrowed payload.
    #[must_use]
    pub fn cloned(self) -> NgramMatch<V> {
        self.map(Clone::clone)
    }
}

impl<V> From<NgramMatch<V>> for (V, usize, usize) {
    fn from(m: NgramMatch<V>) -> Self {
        m.into_parts()
    }
}

/// What the scanner did with one input position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    /// The token extended the open candidate.
    Descend {
        /// Whether the candidate now ends on a stored ngram.
        terminal: bool,
    },
    /// The path broke while holding a completed match; the match was emitted.
    Emit {
        /// Index where scanning continues.
        resume_at: usize,
    },
    /// The path broke before any ngram completed; retry one token after the
    /// candidate's start.
    Retry {
        /// Index where scanning continues.
        resume_at: usize,
    },
    /// No candidate was open and the token starts none.
    Skip,
}

impl ScanAction {
    /// Index the scan moves to after taking this action at `index`.
    #[must_use]
    pub fn next_index(self, index: usize) -> usize {
        match self {
            Self::Descend { .. } | Self::Skip => index + 1,
            Self::Emit { resume_at } | Self::Retry { resume_at } => resume_at,
        }
    }
}

/// Per-token scan state.
#[derive(Debug)]
pub(crate) struct Scanner<'a, V> {
    trie: &'a TokenTrie<V>,
    node: usize,
    start: Option<usize>,
    end: usize,
    best: Option<NgramMatch<&'a V>>,
    resume_at: Option<usize>,
}

impl<'a, V> Scanner<'a, V> {
    pub(crate) fn new(trie: &'a TokenTrie<V>) -> Self {
        Self {
            trie,
            node: ROOT,
            start: None,
            end: 0,
            best: None,
            resume_at: None,
        }
    }

    /// Feed the token at `index`.
    ///
    /// Returns the action taken and, for [`ScanAction::Emit`], the emitted match.
    pub(crate) fn step(
        &mut self,
        index: usize,
        token: &str,
    ) -> (ScanAction, Option<NgramMatch<&'a V>>) {
        let trie = self.trie;
        let Some(child) = trie.node(self.node).child(token) else {
            return self.break_path();
        };

        self.node = child;
        let start = *self.start.get_or_insert(index);
        self.end = index + 1;

        let terminal = match trie.value(child) {
            Some(value) => {
                self.best = Some(NgramMatch::new(value, start, self.end));
                self.resume_at = None;
                true
            }
            None => {
                self.resume_at.get_or_insert(index);
                false
            }
        };

        (ScanAction::Descend { terminal }, None)
    }

    /// Close the open candidate because the current token does not extend it.
    fn break_path(&mut self) -> (ScanAction, Option<NgramMatch<&'a V>>) {
        let start = self.start;
        let end = self.end;
        let resume_at = self.resume_at;
        let best = self.best.take();
        self.reset();

        match (best, start) {
            (Some(best), _) => {
                let resume_at = resume_at.unwrap_or(end);
                tracing::trace!(start = best.start, end = best.end, resume_at, "emitted ngram match");
                (ScanAction::Emit { resume_at }, Some(best))
            }
            (None, Some(start)) => (ScanAction::Retry { resume_at: start + 1 }, None),
            (None, None) => (ScanAction::Skip, None),
        }
    }

    /// Input ended at `index`: take the pending match, if any, and reset.
    ///
    /// Unlike [`break_path`](Self::break_path) this never rewinds.
    pub(crate) fn finish(&mut self, index: usize) -> Option<NgramMatch<&'a V>> {
        let best = self.best.take();
        self.reset();
        if let Some(best) = best {
            tracing::trace!(start = best.start, end = best.end, index, "flushed ngram match at end of input");
        }
        best
    }

    fn reset(&mut self) {
        self.node = ROOT;
        self.start = None;
        self.end = 0;
        self.best = None;
        self.resume_at = None;
    }
}

/// Lazy iterator over the matches in a token slice.
///
/// Created by [`NgramMatcher::matches`](crate::NgramMatcher::matches).
#[derive(Debug)]
pub struct Matches<'a, 't, V, S> {
    scanner: Scanner<'a, V>,
    tokens: &'t [S],
    index: usize,
}

impl<'a, 't, V, S: AsRef<str>> Matches<'a, 't, V, S> {
    pub(crate) fn new(trie: &'a TokenTrie<V>, tokens: &'t [S]) -> Self {
        Self {
            scanner: Scanner::new(trie),
            tokens,
            index: 0,
        }
    }
}

impl<'a, V, S: AsRef<str>> Iterator for Matches<'a, '_, V, S> {
    type Item = NgramMatch<&'a V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (action, emitted) = match self.tokens.get(self.index) {
                Some(token) => self.scanner.step(self.index, token.as_ref()),
                None => return self.scanner.finish(self.index),
            };
            self.index = action.next_index(self.index);
            if emitted.is_some() {
                return emitted;
            }
        }
    }
}

impl<V, S: AsRef<str>> FusedIterator for Matches<'_, '_, V, S> {}
