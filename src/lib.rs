//! # memidx
//!
//! In-memory index primitives: two interchangeable balanced ordered sets
//! and a chaining hash table.
//!
//! - [`AvlTree`] keeps keys sorted with a height-balance invariant (no two
//!   sibling subtrees differ in height by more than one).
//! - [`Treap`] keeps keys sorted with random heap priorities instead of a
//!   deterministic rebalancing rule; expected height is O(log n) for any
//!   insertion order.
//! - [`HashTable`] maps keys to values in chained buckets with amortized
//!   O(1) operations, growing to the next prime past double its capacity
//!   whenever the load factor would be breached.
//!
//! Both tree types implement [`OrderedSet`], so callers that only need the
//! sorted-key contract can swap one strategy for the other. A typical store
//! keeps every key in an ordered set (for sorted enumeration) and in a hash
//! table (for point lookup) and mutates both together.
//!
//! ## Example
//!
//! ```rust
//! use memidx::{AvlTree, HashTable};
//!
//! let mut rooms = AvlTree::new();
//! let mut guests: HashTable<u32, &str> = HashTable::new();
//!
//! for (room, guest) in [(203, "ada"), (101, "bob"), (505, "eve")] {
//!     rooms.insert(room);
//!     guests.insert(room, guest);
//! }
//!
//! assert_eq!(guests.get(&101), Some(&"bob"));
//! assert_eq!(rooms.in_order(), vec![101, 203, 505]);
//! ```

#![warn(clippy::all)]

pub mod avl;
pub mod hash_table;
pub mod treap;

pub use avl::AvlTree;
pub use hash_table::{HashTable, TableConfigError};
pub use treap::Treap;

/// The contract shared by both balanced ordered-set strategies.
///
/// Implementations differ in how they balance (and in their duplicate-key
/// policy, see each type), but all of them keep keys enumerable in ascending
/// order with logarithmic expected depth.
pub trait OrderedSet<K: Ord> {
    /// Inserts `key`; returns `false` if the implementation rejected it as
    /// a duplicate.
    fn insert(&mut self, key: K) -> bool;

    /// Removes (one occurrence of) `key`; `false` means it was absent,
    /// which is not an error.
    fn remove(&mut self, key: &K) -> bool;

    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    /// All keys in ascending order. Recomputed fresh on every call, O(n).
    fn in_order(&self) -> Vec<K>
    where
        K: Clone;
}
