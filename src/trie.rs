//! Bucketed prefix tree over promiscuously normalized keys.
//!
//! A keyed multimap tuned for the LTWA: tens of thousands of short keys
//! over the alphabet `[a-z ]`, queried with "give me every value whose key
//! is a prefix of this string". Internal nodes keep an overflow bucket of
//! `(residual key, value)` pairs and only grow children once the bucket
//! spills, which keeps the tree shallow where keys are sparse.
//!
//! `get` may return false positives (bucket entries whose residual diverges
//! from the query); it never misses a true prefix. Callers re-check matches
//! exactly.

use std::collections::HashMap;

const MAX_NODE_SIZE: usize = 5;

struct Node<T> {
    children: HashMap<u8, Box<Node<T>>>,
    /// `(residual key, value)` pairs deposited at this node.
    bucket: Vec<(String, T)>,
    /// Whether this node has spilled its bucket into children.
    split: bool,
}

impl<T> Node<T> {
    fn new() -> Self {
        Node { children: HashMap::new(), bucket: Vec::new(), split: false }
    }

    fn deposit(&mut self, residual: &str, value: T) {
        self.bucket.push((residual.to_string(), value));
        if !self.split && self.bucket.len() > MAX_NODE_SIZE {
            self.spill();
        }
    }

    fn spill(&mut self) {
        self.split = true;
        let pairs = std::mem::take(&mut self.bucket);
        for (residual, value) in pairs {
            match residual.as_bytes().first().copied() {
                // Pairs whose key ends here stay put.
                None => self.bucket.push((residual, value)),
                Some(b) => {
                    let child = self.children.entry(b).or_insert_with(|| Box::new(Node::new()));
                    child.deposit(&residual[1..], value);
                }
            }
        }
    }
}

pub struct PrefixTree<T> {
    root: Node<T>,
    len: usize,
}

impl<T: Clone> PrefixTree<T> {
    pub fn new() -> Self {
        PrefixTree { root: Node::new(), len: 0 }
    }

    /// Number of insertions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn add(&mut self, key: &str, value: T) {
        self.len += 1;
        let mut node = &mut self.root;
        let mut rest = key;
        loop {
            match rest.as_bytes().first().copied() {
                // Follow existing edges; a split node additionally creates
                // the edge, since residuals no longer live in its bucket.
                Some(b) if node.split || node.children.contains_key(&b) => {
                    node = node.children.entry(b).or_insert_with(|| Box::new(Node::new()));
                    rest = &rest[1..];
                }
                _ => {
                    node.deposit(rest, value);
                    return;
                }
            }
        }
    }

    /// Every value whose key is a prefix of `query`, possibly with false
    /// positives from buckets passed along the way.
    pub fn get(&self, query: &str) -> Vec<T> {
        let mut out = Vec::new();
        let mut node = &self.root;
        out.extend(node.bucket.iter().map(|(_, v)| v.clone()));
        for &b in query.as_bytes() {
            match node.children.get(&b) {
                Some(child) => {
                    node = child;
                    out.extend(node.bucket.iter().map(|(_, v)| v.clone()));
                }
                None => break,
            }
        }
        out
    }
}

impl<T: Clone> Default for PrefixTree<T> {
    fn default() -> Self {
        Self::new()
    }
}
