//! ordered-hashmap: a single-threaded hash map that iterates in insertion
//! order, with an order-preserving JSON codec.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average lookup, insert and delete, plus a stable iteration
//!   order that survives updates, and a text encoding that keeps that order.
//! - Layers:
//!   - NodePool<K, V>: slot arena of nodes addressed by generational
//!     `NodeId`s. Deleting retires a slot onto the arena's free list; the
//!     next new key reuses it.
//!   - OrderedHashMap<K, V, S>: a `hashbrown::HashTable<NodeId>` index over
//!     the pool, plus a doubly linked chain (head/tail and per-node
//!     prev/next ids) that defines iteration order. All mutation, traversal,
//!     sort, merge and clone logic lives here.
//!   - codec / Value: `serde` impls that write members in chain order and
//!     rebuild the chain in source order on decode. `Value` is a dynamic
//!     JSON value whose objects are themselves `OrderedHashMap`s.
//!
//! Invariants (after every public call)
//! - `len() == index.len() == chain length`.
//! - head and tail are both absent iff the map is empty; head has no prev,
//!   tail has no next.
//! - The chain is acyclic and each chain node is reachable through the index
//!   by its cached hash and key, and vice versa.
//! - `set` on an existing key overwrites the value in place and never moves
//!   the node.
//!
//! Constraints
//! - Not a concurrency primitive: the map is `Send` but `!Sync`. Wrap it in
//!   a `Mutex` to share it, and hold the lock across whole traversals.
//! - Links are arena ids, never references, so a retired node cannot be
//!   reached through a stale link: its id no longer resolves.
//! - Each node caches its `u64` hash; the index never rehashes keys.
//! - Sorting by key and serialization need `K: TextKey`. Maps with other key
//!   types lack those methods rather than failing at run time.
//!
//! Reentrancy
//! - Operations that call user code (`Eq`, `Hash`, comparators) while the
//!   index is being probed open a debug-only reentrancy span. Re-entering
//!   the same map from that user code panics in debug builds.
//!
//! Notes and non-goals
//! - The node pool is unbounded; capacity reached under churn is kept.
//! - Decoding is clear-then-fail: on malformed input the target is left
//!   empty, not restored. Decode into a fresh map to keep the old contents.
//! - No schema validation beyond "an object with string member names".

mod error;
mod iter;
mod key;
mod ordered_map;
#[cfg(test)]
mod ordered_map_proptest;
mod pool;
mod reentrancy;

#[cfg(feature = "serde")]
mod codec;
#[cfg(feature = "serde")]
mod value;

// Public surface
pub use error::{MapError, Result};
pub use iter::{IntoIter, Iter, Keys, Values};
pub use key::TextKey;
pub use ordered_map::OrderedHashMap;

#[cfg(feature = "serde")]
pub use codec::DecodeInto;
#[cfg(feature = "serde")]
pub use value::{Object, Value};
