//! Randomized ordered set (treap).
//!
//! Every node draws a uniform random priority in [0, 1) when it is created
//! and keeps it for life. The tree is a BST over keys and a max-heap over
//! priorities at the same time; because the priorities are independent of
//! key order, the expected height is O(log n) without any deterministic
//! rebalancing rule, and no insertion order can defeat it. Equal keys are
//! rejected: inserting a key that is already present changes nothing.
//!
//! The random source is owned by the instance and can be seeded, so tests
//! get fully deterministic tree shapes.

use std::cmp::Ordering;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::OrderedSet;

#[derive(Clone)]
struct Node<K> {
    key: K,
    /// Immutable for the node's lifetime.
    priority: f64,
    left: Option<Box<Node<K>>>,
    right: Option<Box<Node<K>>>,
}

impl<K> Node<K> {
    fn new(key: K, priority: f64) -> Self {
        Self {
            key,
            priority,
            left: None,
            right: None,
        }
    }
}

/// Randomized ordered set over `Ord` keys.
#[derive(Clone)]
pub struct Treap<K> {
    root: Option<Box<Node<K>>>,
    rng: StdRng,
    len: usize,
}

impl<K> Treap<K> {
    /// A treap seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// A treap with a fixed seed; identical seeds and operation sequences
    /// produce identical tree shapes.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            root: None,
            rng,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Height of the tree: -1 when empty, 0 for a single node. Expected
    /// O(log n), recomputed on each call.
    pub fn height(&self) -> i32 {
        fn depth<K>(node: &Option<Box<Node<K>>>) -> i32 {
            node.as_ref()
                .map_or(-1, |n| 1 + depth(&n.left).max(depth(&n.right)))
        }
        depth(&self.root)
    }

    /// Borrowing in-order iterator, ascending.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.root)
    }
}

impl<K: Ord> Treap<K> {
    /// Inserts `key`. Returns `false` when an equal key is already present;
    /// the tree (and the random source) are untouched in that case.
    pub fn insert(&mut self, key: K) -> bool {
        let mut inserted = false;
        self.root = Some(Self::insert_node(
            self.root.take(),
            key,
            &mut self.rng,
            &mut inserted,
        ));
        if inserted {
            self.len += 1;
        }
        inserted
    }

    pub fn contains(&self, key: &K) -> bool {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            match key.cmp(&node.key) {
                Ordering::Less => cur = node.left.as_deref(),
                Ordering::Greater => cur = node.right.as_deref(),
                Ordering::Equal => return true,
            }
        }
        false
    }

    /// Removes `key`, rotating it down to a leaf first. Returns `false` when
    /// the key is absent.
    pub fn remove(&mut self, key: &K) -> bool {
        let mut removed = false;
        self.root = Self::remove_node(self.root.take(), key, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// All keys in ascending order, recomputed fresh on every call in O(n).
    pub fn in_order(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().cloned().collect()
    }

    fn insert_node(
        node: Option<Box<Node<K>>>,
        key: K,
        rng: &mut StdRng,
        inserted: &mut bool,
    ) -> Box<Node<K>> {
        let mut node = match node {
            Some(node) => node,
            None => {
                *inserted = true;
                return Box::new(Node::new(key, rng.gen()));
            }
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Some(Self::insert_node(node.left.take(), key, rng, inserted));
                if node.left.as_ref().unwrap().priority > node.priority {
                    node = Self::rotate_right(node);
                }
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_node(node.right.take(), key, rng, inserted));
                if node.right.as_ref().unwrap().priority > node.priority {
                    node = Self::rotate_left(node);
                }
            }
            // Already present; no new node, no priority drawn.
            Ordering::Equal => {}
        }
        node
    }

    fn remove_node(
        node: Option<Box<Node<K>>>,
        key: &K,
        removed: &mut bool,
    ) -> Option<Box<Node<K>>> {
        let mut node = node?;
        match key.cmp(&node.key) {
            Ordering::Less => node.left = Self::remove_node(node.left.take(), key, removed),
            Ordering::Greater => node.right = Self::remove_node(node.right.take(), key, removed),
            Ordering::Equal => {
                *removed = true;
                let has_left = node.left.is_some();
                let has_right = node.right.is_some();
                if !has_left && !has_right {
                    return None;
                }
                // Rotate the higher-priority child up (ties favor the right
                // child), then keep deleting in the subtree that now holds
                // the target.
                let lift_left = has_left
                    && (!has_right
                        || node.left.as_ref().unwrap().priority
                            > node.right.as_ref().unwrap().priority);
                let mut ignored = false;
                if lift_left {
                    node = Self::rotate_right(node);
                    node.right = Self::remove_node(node.right.take(), key, &mut ignored);
                } else {
                    node = Self::rotate_left(node);
                    node.left = Self::remove_node(node.left.take(), key, &mut ignored);
                }
            }
        }
        Some(node)
    }

    fn rotate_left(mut node: Box<Node<K>>) -> Box<Node<K>> {
        let mut right = node.right.take().expect("right child expected");
        node.right = right.left.take();
        right.left = Some(node);
        right
    }

    fn rotate_right(mut node: Box<Node<K>>) -> Box<Node<K>> {
        let mut left = node.left.take().expect("left child expected");
        node.left = left.right.take();
        left.right = Some(node);
        left
    }
}

impl<K> Default for Treap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> OrderedSet<K> for Treap<K> {
    fn insert(&mut self, key: K) -> bool {
        Treap::insert(self, key)
    }

    fn remove(&mut self, key: &K) -> bool {
        Treap::remove(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Treap::contains(self, key)
    }

    fn len(&self) -> usize {
        Treap::len(self)
    }

    fn clear(&mut self) {
        Treap::clear(self)
    }

    fn in_order(&self) -> Vec<K>
    where
        K: Clone,
    {
        Treap::in_order(self)
    }
}

impl<K: fmt::Debug> fmt::Debug for Treap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// In-order iterator over borrowed keys, driven by an explicit stack.
pub struct Iter<'a, K> {
    stack: Vec<&'a Node<K>>,
}

impl<'a, K> Iter<'a, K> {
    fn new(root: &'a Option<Box<Node<K>>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left(root.as_deref());
        iter
    }

    fn push_left(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.key)
    }
}

impl<'a, K> IntoIterator for &'a Treap<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<K: Ord> Treap<K> {
    /// Walks the whole tree and asserts the structural invariants: every
    /// parent's priority is >= both children's, priorities are in [0, 1),
    /// the node count matches `len`, and in-order keys strictly increase.
    pub(crate) fn check_invariants(&self) {
        fn walk<K>(node: &Node<K>) -> usize {
            assert!(
                (0.0..1.0).contains(&node.priority),
                "priority outside [0, 1)"
            );
            let mut count = 1;
            for child in [node.left.as_deref(), node.right.as_deref()]
                .into_iter()
                .flatten()
            {
                assert!(
                    node.priority >= child.priority,
                    "heap property violated: parent {} < child {}",
                    node.priority,
                    child.priority
                );
                count += walk(child);
            }
            count
        }
        let count = self.root.as_deref().map_or(0, walk);
        assert_eq!(count, self.len, "node count must match len");
        let keys: Vec<&K> = self.iter().collect();
        assert!(
            keys.windows(2).all(|w| w[0] < w[1]),
            "in-order keys must strictly increase"
        );
    }
}
