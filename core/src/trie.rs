//! Token trie storage for [`NgramMatcher`](crate::NgramMatcher).
//!
//! Nodes live in an arena and refer to each other by `usize` index, so
//! pruning after a delete is index bookkeeping rather than pointer surgery.
//!
//! # Layout
//!
//! - Index [`ROOT`] is the root node. It is never freed.
//! - Each node maps a token to the index of its child and holds an optional
//!   value. `Some` marks the node terminal; no token can ever collide with it.
//! - Pruned slots go on a free list and are handed out again by later inserts.

use std::collections::HashMap;

/// Arena index of the root node.
pub(crate) const ROOT: usize = 0;

/// A single trie node.
#[derive(Debug, Clone)]
pub(crate) struct Node<V> {
    /// Outgoing edges, keyed by token.
    pub(crate) children: HashMap<String, usize>,
    /// Payload of the ngram ending here, if any.
    pub(crate) value: Option<V>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }

    /// Index of the child reached through `token`.
    #[inline]
    pub(crate) fn child(&self, token: &str) -> Option<usize> {
        self.children.get(token).copied()
    }

    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    /// A node with no children and no value carries no ngram.
    #[inline]
    fn is_dead(&self) -> bool {
        self.children.is_empty() && self.value.is_none()
    }
}

/// Arena of trie nodes.
#[derive(Debug, Clone)]
pub(crate) struct TokenTrie<V> {
    nodes: Vec<Node<V>>,
    free: Vec<usize>,
}

impl<V> TokenTrie<V> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            free: Vec::new(),
        }
    }

    /// Borrow the node at `idx`.
    ///
    /// Indices handed out by this arena are always in bounds.
    #[inline]
    pub(crate) fn node(&self, idx: usize) -> &Node<V> {
        &self.nodes[idx]
    }

    /// Walk `key` from the root. `None` if any edge is missing.
    pub(crate) fn find<I>(&self, key: I) -> Option<usize>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        key.into_iter()
            .try_fold(ROOT, |idx, token| self.nodes[idx].child(token.as_ref()))
    }

    /// Walk `key` from the root, creating missing nodes along the way.
    pub(crate) fn find_or_create<I>(&mut self, key: I) -> usize
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut idx = ROOT;
        for token in key {
            let token = token.as_ref();
            idx = match self.nodes[idx].child(token) {
                Some(child) => child,
                None => {
                    let child = self.alloc();
                    self.nodes[idx].children.insert(token.to_owned(), child);
                    child
                }
            };
        }
        idx
    }

    /// Store `value` at `idx` unless the node is already terminal.
    ///
    /// Returns `false` (and drops `value`) when a value is already present.
    pub(crate) fn set_value(&mut self, idx: usize, value: V) -> bool {
        let slot = &mut self.nodes[idx].value;
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        true
    }

    pub(crate) fn value(&self, idx: usize) -> Option<&V> {
        self.nodes[idx].value.as_ref()
    }

    pub(crate) fn value_mut(&mut self, idx: usize) -> Option<&mut V> {
        self.nodes[idx].value.as_mut()
    }

    /// Take the value stored at the end of `key` and prune the dead tail.
    ///
    /// Returns the value and the number of nodes freed, or `None` when the
    /// path is missing or does not end at a terminal node (nothing changes).
    pub(crate) fn remove<I>(&mut self, key: I) -> Option<(V, usize)>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        // (parent, edge token, child) for every step of the walk.
        let mut path: Vec<(usize, I::Item, usize)> = Vec::new();
        let mut idx = ROOT;
        for token in key {
            let child = self.nodes[idx].child(token.as_ref())?;
            path.push((idx, token, child));
            idx = child;
        }

        let value = self.nodes[idx].value.take()?;

        let mut pruned = 0;
        while let Some((parent, token, child)) = path.pop() {
            if !self.nodes[child].is_dead() {
                break;
            }
            self.nodes[parent].children.remove(token.as_ref());
            self.free.push(child);
            pruned += 1;
        }

        Some((value, pruned))
    }

    /// Number of nodes currently linked into the tree, root included.
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT] = Node::new();
        self.free.clear();
    }

    fn alloc(&mut self) -> usize {
        // Freed slots were dead when released, so they are already empty.
        if let Some(idx) = self.free.pop() {
            return idx;
        }
        self.nodes.push(Node::new());
        self.nodes.len() - 1
    }
}
