//! ngram - greedy longest-match ngram matching over token sequences
//!
//! Locates a fixed dictionary of phrases inside tokenized text. Each phrase
//! (an *ngram*) is a sequence of tokens mapped to a payload; scanning a token
//! slice reports the longest non-overlapping ngrams, left to right.
//!
//! # Architecture
//!
//! - [`NgramMatcher`]: the dictionary (insert, delete, lookup, enumeration, matching)
//! - [`Matches`]: lazy scan over a token slice, yields [`NgramMatch`]
//! - [`Iter`]: stack-based enumeration of stored ngrams
//! - [`ScanTrace`]: the scan with every decision recorded
//!
//! Internally the trie is an arena of nodes addressed by index. A node is
//! terminal when it holds `Some(value)`, so no token can be mistaken for an
//! end marker.
//!
//! # Key Semantics
//!
//! 1. **Longest match wins**: from a given start, the scanner keeps extending
//!    while the trie allows and reports the last complete ngram it passed.
//!
//! 2. **No overlaps**: after a match, scanning resumes at the match's end.
//!
//! 3. **Failed candidates are retried**: when a partial path dies before
//!    completing, scanning restarts one token after where it began.
//!
//! 4. **End of input only flushes**: a pending match is reported, but a
//!    candidate still open when the tokens run out is not retried.
//!
//! 5. **First insert wins**: re-inserting a stored ngram keeps the old value.
//!
//! Tokenization is up to the caller; tokens are compared as exact strings.
//!
//! # Example
//!
//! ```
//! use ngram::prelude::*;
//!
//! let mut matcher = NgramMatcher::new();
//! matcher.insert(["a"], "X");
//! matcher.insert(["a", "b"], "Y");
//! matcher.insert(["c"], "Z");
//!
//! let spans = matcher.match_spans(&["a", "b", "q", "c"]);
//! assert_eq!(
//!     spans,
//!     vec![NgramMatch::new(&"Y", 0, 2), NgramMatch::new(&"Z", 3, 4)],
//! );
//! ```
//!
//! # Features
//!
//! - `serde` enables [`NgramConfig`] dictionary loading and `Serialize` on [`NgramMatch`]
//! - `config` enables JSON parsing for [`NgramConfig`]

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod iter;
mod matcher;
mod scanner;
mod trace;
mod trie;

#[cfg(feature = "serde")]
mod config;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use iter::Iter;
pub use matcher::NgramMatcher;
pub use scanner::{Matches, NgramMatch, ScanAction};
pub use trace::{ScanStep, ScanTrace};

#[cfg(feature = "serde")]
pub use config::{NgramConfig, NgramEntryConfig};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use ngram::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{NgramError, NgramMatch, NgramMatcher, ScanAction, ScanStep, ScanTrace};

    #[cfg(feature = "serde")]
    pub use crate::{NgramConfig, NgramEntryConfig};
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of tokens in a single config entry.
///
/// Checked at config load time only; [`NgramMatcher::insert`] takes any length.
pub const MAX_NGRAM_TOKENS: usize = 1024;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from loading a dictionary config.
///
/// Matching and the pointwise operations never fail; these errors only come
/// out of config parsing and validation. Fix the dictionary and load again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NgramError {
    /// An entry has no tokens.
    EmptyNgram {
        /// Position of the entry in the config.
        index: usize,
    },
    /// An entry contains an empty token.
    EmptyToken {
        /// Position of the entry in the config.
        index: usize,
        /// Position of the empty token within the entry.
        position: usize,
    },
    /// An entry has more than [`MAX_NGRAM_TOKENS`] tokens.
    NgramTooLong {
        /// Position of the entry in the config.
        index: usize,
        /// Actual number of tokens.
        len: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// The config could not be deserialized.
    InvalidConfig {
        /// The underlying error message.
        source: String,
    },
}

impl std::fmt::Display for NgramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNgram { index } => {
                write!(f, "ngram #{index} has no tokens")
            }
            Self::EmptyToken { index, position } => {
                write!(f, "ngram #{index} has an empty token at position {position}")
            }
            Self::NgramTooLong { index, len, max } => {
                write!(
                    f,
                    "ngram #{index} has {len} tokens, but maximum allowed is {max}"
                )
            }
            Self::InvalidConfig { source } => {
                write!(f, "invalid config: {source}")
            }
        }
    }
}

impl std::error::Error for NgramError {}
