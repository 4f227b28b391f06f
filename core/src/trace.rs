//! Scan trace types for debugging match results.
//!
//! A [`ScanTrace`] carries the same matches as
//! [`NgramMatcher::match_spans`](crate::NgramMatcher::match_spans) plus every
//! decision the scanner made on the way. Use
//! [`NgramMatcher::match_with_trace`](crate::NgramMatcher::match_with_trace)
//! to find out why an expected phrase was not reported.
//!
//! # Example
//!
//! ```
//! use ngram::{NgramMatcher, ScanAction};
//!
//! let mut matcher = NgramMatcher::new();
//! matcher.insert(["new", "york", "city"], "NYC");
//!
//! let trace = matcher.match_with_trace(&["new", "york", "state"]);
//! assert!(trace.matches.is_empty());
//! assert_eq!(trace.steps[2].action, ScanAction::Retry { resume_at: 1 });
//! ```

use std::fmt;

use crate::scanner::{NgramMatch, ScanAction, Scanner};
use crate::trie::TokenTrie;

/// Trace of a full scan.
///
/// # INV: `matches` == `match_spans()` result
///
/// The `matches` field always equals what
/// [`NgramMatcher::match_spans()`](crate::NgramMatcher::match_spans) returns
/// for the same input.
pub struct ScanTrace<V> {
    /// The matches, in input order.
    pub matches: Vec<NgramMatch<V>>,
    /// Every scanner step, in execution order. Positions are revisited after
    /// a retry or an emit that rewinds, so indices may repeat.
    pub steps: Vec<ScanStep>,
    /// Whether a pending match was flushed when the input ran out.
    pub flushed_at_end: bool,
}

impl<V> ScanTrace<V> {
    pub(crate) fn record<'a, S: AsRef<str>>(trie: &'a TokenTrie<V>, tokens: &[S]) -> ScanTrace<&'a V> {
        let mut scanner = Scanner::new(trie);
        let mut trace = ScanTrace {
            matches: Vec::new(),
            steps: Vec::new(),
            flushed_at_end: false,
        };

        let mut index = 0;
        while let Some(token) = tokens.get(index) {
            let token = token.as_ref();
            let (action, emitted) = scanner.step(index, token);
            trace.steps.push(ScanStep {
                index,
                token: Some(token.to_owned()),
                action,
            });
            trace.matches.extend(emitted);
            index = action.next_index(index);
        }

        if let Some(pending) = scanner.finish(index) {
            trace.flushed_at_end = true;
            trace.steps.push(ScanStep {
                index,
                token: None,
                action: ScanAction::Emit { resume_at: index },
            });
            trace.matches.push(pending);
        }

        trace
    }

    /// Number of matches found.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

impl<V: fmt::Debug> fmt::Debug for ScanTrace<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanTrace")
            .field("matches", &self.matches)
            .field("steps", &self.steps)
            .field("flushed_at_end", &self.flushed_at_end)
            .finish()
    }
}

/// One scanner step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanStep {
    /// Input position the step was taken at.
    pub index: usize,
    /// The token at `index`, or `None` for the flush at end of input.
    pub token: Option<String>,
    /// What the scanner did.
    pub action: ScanAction,
}
