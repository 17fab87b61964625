//! OrderedHashMap: hash index over a linked chain of pooled nodes.

use crate::error::{MapError, Result};
use crate::iter::{IntoIter, Iter, Keys, Values};
use crate::key::TextKey;
use crate::pool::{Links, Node, NodeId, NodePool};
use crate::reentrancy::Reentrancy;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::ops::Index;
use hashbrown::hash_table;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

/// Endpoints of the doubly linked iteration order.
#[derive(Copy, Clone, Debug, Default)]
struct Chain {
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl Chain {
    fn push_back<K, V>(&mut self, pool: &mut NodePool<K, V>, id: NodeId) {
        pool[id].links = Links {
            prev: self.tail,
            next: None,
        };
        match self.tail {
            Some(tail) => pool[tail].links.next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Detach `id`, patching its neighbours (or the endpoints) around it.
    fn unlink<K, V>(&mut self, pool: &mut NodePool<K, V>, id: NodeId) {
        let Links { prev, next } = mem::take(&mut pool[id].links);
        match prev {
            Some(p) => pool[p].links.next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => pool[n].links.prev = prev,
            None => self.tail = prev,
        }
    }

    fn reverse<K, V>(&mut self, pool: &mut NodePool<K, V>) {
        let mut cur = self.head;
        while let Some(id) = cur {
            let links = &mut pool[id].links;
            mem::swap(&mut links.prev, &mut links.next);
            // old `next`, now stored in `prev`
            cur = links.prev;
        }
        mem::swap(&mut self.head, &mut self.tail);
    }

    /// Rewrite every link so the chain visits exactly `order`.
    fn relink<K, V>(&mut self, pool: &mut NodePool<K, V>, order: &[NodeId]) {
        for (i, &id) in order.iter().enumerate() {
            pool[id].links = Links {
                prev: i.checked_sub(1).map(|p| order[p]),
                next: order.get(i + 1).copied(),
            };
        }
        self.head = order.first().copied();
        self.tail = order.last().copied();
    }

    fn ids<'a, K, V>(&self, pool: &'a NodePool<K, V>) -> impl Iterator<Item = NodeId> + 'a {
        core::iter::successors(self.head, move |&id| pool[id].links.next)
    }
}

#[inline]
fn make_hash<Q, S>(hasher: &S, q: &Q) -> u64
where
    Q: ?Sized + Hash,
    S: BuildHasher,
{
    hasher.hash_one(q)
}

/// A hash map that iterates in first-insertion order.
///
/// Lookups go through a `hashbrown` table of node ids; nodes live in a slot
/// arena and are threaded into a doubly linked chain from oldest (`first`)
/// to newest (`last`). Updating an existing key keeps its position.
///
/// The map is `Send` but not `Sync`: share it between threads behind your
/// own lock.
///
/// ```
/// use ordered_hashmap::OrderedHashMap;
///
/// let mut m = OrderedHashMap::new();
/// m.set("b", 2);
/// m.set("a", 1);
/// m.set("b", 20);
/// assert_eq!(m.keys().copied().collect::<Vec<_>>(), ["b", "a"]);
/// assert_eq!(m.get("b").ok(), Some(&20));
/// ```
pub struct OrderedHashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<NodeId>,
    pool: NodePool<K, V>,
    chain: Chain,
    reentrancy: Reentrancy,
}

impl<K, V> OrderedHashMap<K, V> {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V, S: Default> Default for OrderedHashMap<K, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> OrderedHashMap<K, V, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::with_capacity(capacity),
            pool: NodePool::with_capacity(capacity),
            chain: Chain::default(),
            reentrancy: Reentrancy::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.len() == 0
    }

    /// Number of retired node slots that new keys will reuse before the
    /// arena grows again.
    pub fn pooled(&self) -> usize {
        self.pool.retired()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.pool, self.chain.head, self.chain.tail, self.len())
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys(self.iter())
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values(self.iter())
    }

    /// Oldest entry.
    pub fn first(&self) -> Option<(&K, &V)> {
        self.chain.head.map(|id| {
            let node = &self.pool[id];
            (&node.key, &node.value)
        })
    }

    /// Newest entry.
    pub fn last(&self) -> Option<(&K, &V)> {
        self.chain.tail.map(|id| {
            let node = &self.pool[id];
            (&node.key, &node.value)
        })
    }

    /// Visit every entry from oldest to newest.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    /// Visit every entry from newest to oldest.
    pub fn for_each_reverse<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        for (k, v) in self.iter().rev() {
            visit(k, v);
        }
    }

    /// Visit every entry from oldest to newest with mutable access to the value.
    pub fn for_each_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&K, &mut V),
    {
        let mut cur = self.chain.head;
        while let Some(id) = cur {
            let node = &mut self.pool[id];
            visit(&node.key, &mut node.value);
            cur = node.links.next;
        }
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    /// Linear scan comparing each value to `value` with `eq`.
    pub fn contains_value_by<F>(&self, value: &V, mut eq: F) -> bool
    where
        F: FnMut(&V, &V) -> bool,
    {
        self.values().any(|v| eq(v, value))
    }

    /// Reverse the iteration order in place. O(n), no allocation.
    pub fn reverse(&mut self) {
        self.chain.reverse(&mut self.pool);
        tracing::trace!(len = self.len(), "reversed ordered map");
    }

    /// Remove every entry. All nodes are retired to the pool.
    pub fn clear(&mut self) {
        let len = self.len();
        self.index.clear();
        self.pool.clear();
        self.chain = Chain::default();
        tracing::trace!(len, pooled = self.pool.retired(), "cleared ordered map");
    }

    pub fn pop_front(&mut self) -> Option<(K, V)> {
        let id = self.chain.head?;
        self.remove_node(id)
    }

    pub fn pop_back(&mut self) -> Option<(K, V)> {
        let id = self.chain.tail?;
        self.remove_node(id)
    }

    /// Stable sort by a comparator over `(key, value)` pairs. Entries that
    /// compare equal keep their current relative order. Only links change;
    /// index entries and node ids are untouched.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut((&K, &V), (&K, &V)) -> Ordering,
    {
        let _g = self.reentrancy.enter("sort_by");
        let mut order: Vec<NodeId> = self.chain.ids(&self.pool).collect();
        let pool = &self.pool;
        order.sort_by(|&a, &b| {
            let (na, nb) = (&pool[a], &pool[b]);
            compare((&na.key, &na.value), (&nb.key, &nb.value))
        });
        self.chain.relink(&mut self.pool, &order);
    }

    fn nodes(&self) -> impl Iterator<Item = &Node<K, V>> + '_ {
        self.chain.ids(&self.pool).map(move |id| &self.pool[id])
    }

    fn remove_node(&mut self, id: NodeId) -> Option<(K, V)> {
        let hash = self.pool.get(id)?.hash;
        if let Ok(entry) = self.index.find_entry(hash, |&other| other == id) {
            let _ = entry.remove();
        }
        self.chain.unlink(&mut self.pool, id);
        self.pool.release(id)
    }
}

impl<K, V, S> OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn reserve(&mut self, additional: usize) {
        let pool = &self.pool;
        self.index
            .reserve(additional, |&id| pool.get(id).map(|n| n.hash).unwrap_or(0));
        self.pool.reserve(additional);
    }

    fn find<Q>(&self, q: &Q) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        let hash = make_hash(&self.hasher, q);
        self.index
            .find(hash, |&id| {
                self.pool
                    .get(id)
                    .map(|n| n.key.borrow() == q)
                    .unwrap_or(false)
            })
            .copied()
    }

    /// Insert or update. A new key is linked after the current newest entry;
    /// an existing key keeps its position and its stored key, and the
    /// previous value is returned.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        let _g = self.reentrancy.enter("set");
        let hash = make_hash(&self.hasher, &key);
        match self.index.entry(
            hash,
            |&id| self.pool.get(id).map(|n| n.key == key).unwrap_or(false),
            |&id| self.pool.get(id).map(|n| n.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(o) => {
                let id = *o.get();
                Some(mem::replace(&mut self.pool[id].value, value))
            }
            hash_table::Entry::Vacant(v) => {
                let id = self.pool.acquire(key, value, hash);
                let _ = v.insert(id);
                self.chain.push_back(&mut self.pool, id);
                None
            }
        }
    }

    pub fn get<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q)
            .map(|id| &self.pool[id].value)
            .ok_or(MapError::KeyNotFound)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.find(q) {
            Some(id) => Ok(&mut self.pool[id].value),
            None => Err(MapError::KeyNotFound),
        }
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).map(|id| {
            let node = &self.pool[id];
            (&node.key, &node.value)
        })
    }

    /// Like [`get`](Self::get), but an absent key yields `V::default()`.
    pub fn get_or_default<Q>(&self, q: &Q) -> V
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Default + Clone,
    {
        self.get(q).map(V::clone).unwrap_or_default()
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// Position of `q` counting from the oldest entry. O(n).
    pub fn index_of<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let _g = self.reentrancy.enter("index_of");
        self.keys().position(|k| k.borrow() == q)
    }

    /// Remove `q` and return its entry. The neighbours of the removed node
    /// are linked to each other and the node is retired to the pool.
    pub fn pop_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("pop_entry");
        let hash = make_hash(&self.hasher, q);
        let pool = &self.pool;
        let entry = self
            .index
            .find_entry(hash, |&id| {
                pool.get(id).map(|n| n.key.borrow() == q).unwrap_or(false)
            })
            .ok()?;
        let (id, _) = entry.remove();
        self.chain.unlink(&mut self.pool, id);
        self.pool.release(id)
    }

    /// Remove `q` and return its value; `None` if it was absent.
    pub fn pop<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.pop_entry(q).map(|(_, v)| v)
    }

    /// Remove `q`. Returns whether it was present; absent keys are a no-op.
    pub fn delete<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.pop_entry(q).is_some()
    }

    /// `set` every entry of `other`, in `other`'s order. Keys already here
    /// keep their position and take the incoming value; new keys are
    /// appended in `other`'s relative order.
    pub fn merge<S2>(&mut self, other: &OrderedHashMap<K, V, S2>)
    where
        K: Clone,
        V: Clone,
    {
        let before = self.len();
        for (k, v) in other {
            self.set(k.clone(), v.clone());
        }
        tracing::trace!(
            incoming = other.len(),
            appended = self.len() - before,
            "merged ordered map"
        );
    }

    /// Stable sort by key text, ascending (byte order).
    pub fn sort_asc(&mut self)
    where
        K: TextKey,
    {
        self.sort_by(|(a, _), (b, _)| a.as_text().cmp(b.as_text()));
        tracing::debug!(len = self.len(), "sorted ordered map ascending");
    }

    /// Stable sort by key text, descending (byte order).
    pub fn sort_desc(&mut self)
    where
        K: TextKey,
    {
        self.sort_by(|(a, _), (b, _)| b.as_text().cmp(a.as_text()));
        tracing::debug!(len = self.len(), "sorted ordered map descending");
    }

    /// Append a key known to be absent, reusing its cached hash.
    fn push_unique(&mut self, key: K, value: V, hash: u64) {
        let id = self.pool.acquire(key, value, hash);
        let pool = &self.pool;
        let _ = self
            .index
            .insert_unique(hash, id, |&id| pool.get(id).map(|n| n.hash).unwrap_or(0));
        self.chain.push_back(&mut self.pool, id);
    }
}

/// Rebuilds a compact copy in the same order. No node, link or pooled slot
/// is shared with the source.
impl<K, V, S> Clone for OrderedHashMap<K, V, S>
where
    K: Clone + Eq + Hash,
    V: Clone,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(self.len(), self.hasher.clone());
        for node in self.nodes() {
            out.push_unique(node.key.clone(), node.value.clone(), node.hash);
        }
        out
    }
}

impl<K, V, S> fmt::Debug for OrderedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Order-sensitive: equal maps hold equal entries in the same order.
impl<K, V, S1, S2> PartialEq<OrderedHashMap<K, V, S2>> for OrderedHashMap<K, V, S1>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &OrderedHashMap<K, V, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for OrderedHashMap<K, V, S> {}

impl<K, V, S, Q> Index<&Q> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher,
{
    type Output = V;

    /// Panics if the key is absent.
    fn index(&self, q: &Q) -> &V {
        match self.get(q) {
            Ok(v) => v,
            Err(_) => panic!("key not found in OrderedHashMap"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for OrderedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl<'a, K, V, S> IntoIterator for &'a OrderedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for OrderedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { map: self }
    }
}

#[cfg(test)]
impl<K, V, S> OrderedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Walk the whole structure and assert every structural invariant.
    pub(crate) fn assert_invariants(&self) {
        let len = self.len();
        assert_eq!(self.index.len(), len, "index size != node count");
        assert_eq!(self.chain.head.is_none(), len == 0, "head presence");
        assert_eq!(self.chain.tail.is_none(), len == 0, "tail presence");
        if let Some(head) = self.chain.head {
            assert_eq!(self.pool[head].links.prev, None, "head has a predecessor");
        }
        if let Some(tail) = self.chain.tail {
            assert_eq!(self.pool[tail].links.next, None, "tail has a successor");
        }

        let mut walked = 0usize;
        let mut prev: Option<NodeId> = None;
        let mut cur = self.chain.head;
        while let Some(id) = cur {
            walked += 1;
            assert!(walked <= len, "chain is longer than len (cycle?)");
            let node = &self.pool[id];
            assert_eq!(node.links.prev, prev, "back link mismatch");
            assert_eq!(make_hash(&self.hasher, &node.key), node.hash, "stale hash");
            let found = self.index.find(node.hash, |&other| other == id);
            assert!(found.is_some(), "chain node missing from index");
            assert_eq!(self.find(&node.key), Some(id), "key resolves elsewhere");
            prev = Some(id);
            cur = node.links.next;
        }
        assert_eq!(walked, len, "chain length != len");
        assert_eq!(prev, self.chain.tail, "walk did not end at tail");
    }
}
