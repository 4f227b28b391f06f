//! `NgramMatcher`: dictionary of token sequences with greedy longest-match scanning.

use std::fmt::Debug;
use std::ops::Index;

use crate::iter::Iter;
use crate::scanner::{Matches, NgramMatch};
use crate::trace::ScanTrace;
use crate::trie::TokenTrie;

/// A dictionary of ngrams (token sequences) mapped to payloads, and a
/// scanner that finds them in tokenized text.
///
/// Keys are any ordered sequence of string-like tokens: `["new", "york"]`,
/// `&[String]`, `vec.iter()` all work. Matching takes a slice because the
/// scanner needs to step back to retry positions.
///
/// # INV: First insert wins
///
/// Inserting an ngram that is already present keeps the original value and
/// leaves [`len`](Self::len) unchanged. Delete it first to replace it.
///
/// # INV: `len()` == number of stored ngrams
///
/// `len()` is O(1) and always equals `self.iter().count()`.
///
/// # Empty ngram
///
/// The empty sequence is a valid key: it is stored on the root node and can
/// be read, counted, enumerated and removed like any other. It never
/// produces a match, since a match always covers at least one token.
///
/// # Example
///
/// ```
/// use ngram::NgramMatcher;
///
/// let mut matcher = NgramMatcher::new();
/// matcher.insert(["programming", "language"], "programming language");
/// matcher.insert(["Python"], "Python");
///
/// let tokens = ["Python", "is", "a", "programming", "language"];
/// assert_eq!(
///     matcher.match_ngrams(&tokens),
///     vec![&"Python", &"programming language"],
/// );
/// ```
#[derive(Clone)]
pub struct NgramMatcher<V> {
    trie: TokenTrie<V>,
    len: usize,
}

impl<V> Default for NgramMatcher<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NgramMatcher<V> {
    /// Create an empty matcher.
    #[must_use]
    pub fn new() -> Self {
        Self {
            trie: TokenTrie::new(),
            len: 0,
        }
    }

    /// Insert an ngram with its payload.
    ///
    /// Returns `true` if the ngram was added. If it was already present the
    /// call is a no-op: `value` is dropped, the stored value is kept and
    /// `false` is returned.
    pub fn insert<I>(&mut self, ngram: I, value: V) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let idx = self.trie.find_or_create(ngram);
        if !self.trie.set_value(idx, value) {
            tracing::debug!(len = self.len, "ngram already present, keeping original value");
            return false;
        }
        self.len += 1;
        tracing::debug!(len = self.len, "inserted ngram");
        true
    }

    /// Remove an ngram, returning its payload.
    ///
    /// Nodes left without children or value are pruned back toward the root.
    /// Returns `None` (and changes nothing) if the ngram is not stored, even
    /// when it is a prefix of a stored ngram.
    pub fn remove<I>(&mut self, ngram: I) -> Option<V>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (value, pruned) = self.trie.remove(ngram)?;
        self.len -= 1;
        tracing::debug!(len = self.len, pruned, "removed ngram");
        Some(value)
    }

    /// Remove an ngram. Returns `true` iff something was removed.
    pub fn delete<I>(&mut self, ngram: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.remove(ngram).is_some()
    }

    /// Returns `true` if the ngram is stored.
    #[must_use]
    pub fn contains<I>(&self, ngram: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.get(ngram).is_some()
    }

    /// Get the payload stored for an ngram.
    #[must_use]
    pub fn get<I>(&self, ngram: I) -> Option<&V>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.trie.find(ngram).and_then(|idx| self.trie.value(idx))
    }

    /// Get a mutable reference to the payload stored for an ngram.
    pub fn get_mut<I>(&mut self, ngram: I) -> Option<&mut V>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let idx = self.trie.find(ngram)?;
        self.trie.value_mut(idx)
    }

    /// Number of stored ngrams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no ngram is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every ngram.
    pub fn clear(&mut self) {
        self.trie.clear();
        self.len = 0;
    }

    /// Number of trie nodes currently in use, root included.
    ///
    /// Always 1 for an empty matcher: deleting ngrams prunes their nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.trie.live_nodes()
    }

    /// Iterate over every `(ngram, value)` pair. Order is unspecified.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.trie, self.len)
    }

    /// Every stored ngram with its value. Order is unspecified.
    #[must_use]
    pub fn ngrams(&self) -> Vec<(Vec<&str>, &V)> {
        self.iter().collect()
    }

    /// Every stored ngram, without values. Order is unspecified.
    #[must_use]
    pub fn keys(&self) -> Vec<Vec<&str>> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Lazily scan `tokens` for stored ngrams.
    ///
    /// Matches come out left to right and never overlap. At each position
    /// the longest ngram wins; tokens that start no ngram are skipped.
    pub fn matches<'t, S: AsRef<str>>(&self, tokens: &'t [S]) -> Matches<'_, 't, V, S> {
        Matches::new(&self.trie, tokens)
    }

    /// Values of every match in `tokens`, in input order.
    #[must_use]
    pub fn match_ngrams<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<&V> {
        self.matches(tokens).map(|m| m.value).collect()
    }

    /// Every match in `tokens` with its `[start, end)` span, in input order.
    #[must_use]
    pub fn match_spans<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<NgramMatch<&V>> {
        self.matches(tokens).collect()
    }

    /// Scan `tokens`, recording every scanner decision.
    ///
    /// `trace.matches` is always identical to [`match_spans`](Self::match_spans).
    #[must_use]
    pub fn match_with_trace<S: AsRef<str>>(&self, tokens: &[S]) -> ScanTrace<&V> {
        ScanTrace::record(&self.trie, tokens)
    }
}

impl<V: Debug> Debug for NgramMatcher<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.iter())
            .finish()
    }
}

impl<V: PartialEq> PartialEq for NgramMatcher<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(key, value)| other.get(&key) == Some(value))
    }
}

impl<V: Eq> Eq for NgramMatcher<V> {}

impl<V, S: AsRef<str>> Index<&[S]> for NgramMatcher<V> {
    type Output = V;

    /// # Panics
    ///
    /// Panics if the ngram is not stored.
    fn index(&self, ngram: &[S]) -> &V {
        self.get(ngram).expect("ngram not found in NgramMatcher")
    }
}

impl<'a, V> IntoIterator for &'a NgramMatcher<V> {
    type Item = (Vec<&'a str>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a matcher from `(ngram, value)` pairs. The first value seen for an
/// ngram wins.
impl<K, V> FromIterator<(K, V)> for NgramMatcher<V>
where
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut matcher = Self::new();
        matcher.extend(iter);
        matcher
    }
}

impl<K, V> Extend<(K, V)> for NgramMatcher<V>
where
    K: IntoIterator,
    K::Item: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (ngram, value) in iter {
            self.insert(ngram, value);
        }
    }
}
