//! Enumeration of stored ngrams.

use std::iter::FusedIterator;

use crate::trie::{TokenTrie, ROOT};

/// Iterator over every stored `(ngram, value)` pair.
///
/// Walks the trie depth-first with an explicit stack, so arbitrarily long
/// ngrams never deepen the call stack. The order is unspecified.
///
/// Created by [`NgramMatcher::iter`](crate::NgramMatcher::iter).
#[derive(Debug)]
pub struct Iter<'a, V> {
    trie: &'a TokenTrie<V>,
    /// Pending nodes as `(index, depth, edge token)`; the root has no edge.
    stack: Vec<(usize, usize, Option<&'a str>)>,
    /// Tokens from the root to the node popped last.
    path: Vec<&'a str>,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(trie: &'a TokenTrie<V>, len: usize) -> Self {
        let stack = if len == 0 { Vec::new() } else { vec![(ROOT, 0, None)] };
        Self {
            trie,
            stack,
            path: Vec::new(),
            remaining: len,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<&'a str>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let trie = self.trie;
        while let Some((idx, depth, edge)) = self.stack.pop() {
            // Depth-first pop order: everything deeper than the parent is stale.
            self.path.truncate(depth.saturating_sub(1));
            self.path.extend(edge);

            let node = trie.node(idx);
            for (token, &child) in &node.children {
                self.stack.push((child, depth + 1, Some(token.as_str())));
            }
            if let Some(value) = node.value.as_ref() {
                self.remaining -= 1;
                return Some((self.path.clone(), value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}
