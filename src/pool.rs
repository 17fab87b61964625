//! Node pool: slot arena with stable indices and a free list of retired slots.

use core::ops::{Index, IndexMut};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable arena index of a node. Generational, so a stale id never
    /// resolves to a node that later reused its slot.
    pub(crate) struct NodeId;
}

/// Ordering links of a node. Non-owning; both ends live in the same pool.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Links {
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) links: Links,
}

/// Storage for every node of one map.
///
/// `release` retires a slot onto the arena's free list; the next `acquire`
/// takes from that list before growing. Retired slots hold no key, value or
/// links. The pool is unbounded: capacity reached under churn is kept until
/// the map is dropped.
#[derive(Debug)]
pub(crate) struct NodePool<K, V> {
    slots: SlotMap<NodeId, Node<K, V>>,
    retired: usize,
}

impl<K, V> NodePool<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(capacity),
            retired: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Number of retired slots waiting to be reused.
    pub(crate) fn retired(&self) -> usize {
        self.retired
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.slots.reserve(additional);
    }

    /// Store a new, unlinked node, reusing a retired slot when one exists.
    pub(crate) fn acquire(&mut self, key: K, value: V, hash: u64) -> NodeId {
        self.retired = self.retired.saturating_sub(1);
        self.slots.insert(Node {
            key,
            value,
            hash,
            links: Links::default(),
        })
    }

    /// Retire `id` and hand back its payload. `None` if `id` is stale.
    pub(crate) fn release(&mut self, id: NodeId) -> Option<(K, V)> {
        let node = self.slots.remove(id)?;
        self.retired += 1;
        Some((node.key, node.value))
    }

    /// Retire every live slot, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.retired += self.slots.len();
        self.slots.clear();
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.slots.get(id)
    }
}

impl<K, V> Index<NodeId> for NodePool<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        &self.slots[id]
    }
}

impl<K, V> IndexMut<NodeId> for NodePool<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.slots[id]
    }
}
