//! Boxed-node scapegoat tree.
//!
//! The straightforward pointer rendition of the same balancing discipline:
//! one heap allocation per node, subtree sizes stored in the nodes, and a
//! rebuild that flattens the offending subtree into a vector before relinking
//! it perfectly balanced. It exists as a correctness and benchmark baseline
//! for the flat-array form, which does the same job without per-node
//! allocation or rebuild scratch space.

use std::cmp::Ordering;
use std::mem;

// Balance threshold 3/4: a child may hold at most three quarters of its
// parent subtree before the parent becomes a rebuild candidate.
const ALPHA_NUM: usize = 3;
const ALPHA_DEN: usize = 4;

type Link<K, V> = Option<Box<Node<K, V>>>;

struct Node<K, V> {
    key: K,
    value: V,
    size: usize,
    left: Link<K, V>,
    right: Link<K, V>,
}

/// An ordered map kept balanced by subtree rebuilds on boxed nodes.
pub struct NaiveSgTree<K, V> {
    root: Link<K, V>,
    count: usize,
}

struct Inserted<V> {
    old: Option<V>,
    /// The new node landed deeper than the depth limit and no ancestor has
    /// been rebuilt for it yet.
    deep: bool,
}

impl<K: Ord, V> NaiveSgTree<K, V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            root: None,
            count: 0,
        }
    }

    /// Number of entries in the map.
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Reference to the value stored for `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match key.cmp(&n.key) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Greater => n.right.as_deref(),
                Ordering::Equal => return Some(&n.value),
            };
        }
        None
    }

    /// True when `key` has an entry.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts or overwrites. Returns the previous value on overwrite.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let limit = Self::depth_limit(self.count + 1);
        let out = Self::insert_at(&mut self.root, key, value, 0, limit);
        if out.old.is_none() {
            self.count += 1;
        }
        if out.deep {
            // Depth limit exceeded but no ancestor tripped the weight test;
            // rebuild from the top.
            Self::rebuild(&mut self.root);
        }
        out.old
    }

    /// Removes `key`, returning its value. Removal splices nodes out without
    /// rebalancing.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = Self::remove_at(&mut self.root, key);
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }

    /// Cursor over all entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    fn size_of(link: &Link<K, V>) -> usize {
        link.as_ref().map_or(0, |n| n.size)
    }

    fn is_unbalanced(node: &Node<K, V>) -> bool {
        let left = Self::size_of(&node.left);
        let right = Self::size_of(&node.right);
        left * ALPHA_DEN > node.size * ALPHA_NUM || right * ALPHA_DEN > node.size * ALPHA_NUM
    }

    /// Deepest position a node may occupy in a tree of `count` entries
    /// before some ancestor must be out of balance.
    fn depth_limit(count: usize) -> usize {
        if count <= 1 {
            return 0;
        }
        let inv_alpha = ALPHA_DEN as f64 / ALPHA_NUM as f64;
        ((count as f64).ln() / inv_alpha.ln()).floor() as usize + 1
    }

    fn insert_at(link: &mut Link<K, V>, key: K, value: V, depth: usize, limit: usize) -> Inserted<V> {
        let node = match link {
            Some(node) => node,
            None => {
                *link = Some(Box::new(Node {
                    key,
                    value,
                    size: 1,
                    left: None,
                    right: None,
                }));
                return Inserted {
                    old: None,
                    deep: depth > limit,
                };
            }
        };

        let mut out = match key.cmp(&node.key) {
            Ordering::Less => Self::insert_at(&mut node.left, key, value, depth + 1, limit),
            Ordering::Greater => Self::insert_at(&mut node.right, key, value, depth + 1, limit),
            Ordering::Equal => {
                return Inserted {
                    old: Some(mem::replace(&mut node.value, value)),
                    deep: false,
                }
            }
        };

        if out.old.is_none() {
            node.size += 1;
        }
        // Unwinding the insertion path is the walk up the ancestor chain:
        // the first unbalanced ancestor met here is the scapegoat.
        if out.deep && Self::is_unbalanced(node) {
            Self::rebuild(link);
            out.deep = false;
        }
        out
    }

    fn remove_at(link: &mut Link<K, V>, key: &K) -> Option<V> {
        let node = link.as_deref_mut()?;
        match key.cmp(&node.key) {
            Ordering::Less => {
                let removed = Self::remove_at(&mut node.left, key);
                if removed.is_some() {
                    node.size -= 1;
                }
                removed
            }
            Ordering::Greater => {
                let removed = Self::remove_at(&mut node.right, key);
                if removed.is_some() {
                    node.size -= 1;
                }
                removed
            }
            Ordering::Equal => {
                let mut node = link.take().expect("link matched occupied above");
                *link = match (node.left.take(), node.right.take()) {
                    (None, None) => None,
                    (Some(child), None) | (None, Some(child)) => Some(child),
                    (Some(left), Some(right)) => {
                        let (rest, mut successor) = Self::pop_min(right);
                        successor.left = Some(left);
                        successor.right = rest;
                        successor.size = 1
                            + Self::size_of(&successor.left)
                            + Self::size_of(&successor.right);
                        Some(successor)
                    }
                };
                Some(node.value)
            }
        }
    }

    /// Unlinks and returns the smallest node of a nonempty subtree, along
    /// with what remains of that subtree.
    fn pop_min(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                (rest, node)
            }
            Some(left) => {
                let (remaining, min) = Self::pop_min(left);
                node.left = remaining;
                node.size -= 1;
                (Some(node), min)
            }
        }
    }

    /// Flattens the subtree in order and relinks it perfectly balanced.
    fn rebuild(link: &mut Link<K, V>) {
        let mut nodes = Vec::new();
        Self::flatten(link.take(), &mut nodes);
        *link = Self::build(&mut nodes);
    }

    fn flatten(link: Link<K, V>, out: &mut Vec<Option<Box<Node<K, V>>>>) {
        if let Some(mut node) = link {
            let left = node.left.take();
            let right = node.right.take();
            Self::flatten(left, out);
            out.push(Some(node));
            Self::flatten(right, out);
        }
    }

    fn build(nodes: &mut [Option<Box<Node<K, V>>>]) -> Link<K, V> {
        if nodes.is_empty() {
            return None;
        }
        let mid = nodes.len() / 2;
        let mut root = nodes[mid].take().expect("each node rebuilt once");
        let (left, rest) = nodes.split_at_mut(mid);
        root.left = Self::build(left);
        root.right = Self::build(&mut rest[1..]);
        root.size = 1 + Self::size_of(&root.left) + Self::size_of(&root.right);
        Some(root)
    }
}

impl<K: Ord, V> Default for NaiveSgTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over entries in ascending key order.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.key, &node.value))
    }
}
