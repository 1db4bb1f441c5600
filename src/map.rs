//! RbMap: the lock-guarded map facade.
//!
//! One `parking_lot::RwLock` owns the tree. Readers (`get`, `contains`,
//! `len`, `is_empty`, traversal) share it; writers (`put`, `remove`,
//! `clear`) take it exclusively. Every guard is scoped RAII, so the lock
//! is released on every exit path, error returns included; parking_lot
//! has no poisoning, so a caller-observed error can never wedge the lock.
//!
//! Traversal holds the read lock for the iterator's whole lifetime: the
//! sequence is a consistent snapshot of the tree as of acquisition, and
//! writers block until the iterator is dropped. That hold is the one
//! caller-controlled lock duration in the crate; dropping the iterator,
//! whether after exhaustion or mid-way, is what releases it.

use crate::order::{OrderError, StructuralOrd};
use crate::tree::{NodeId, RbTree};
use parking_lot::{RwLock, RwLockReadGuard};

/// A thread-safe ordered map. Shareable across threads by reference
/// (or inside an `Arc`); all methods take `&self`.
pub struct RbMap<K, V> {
    tree: RwLock<RbTree<K, V>>,
}

impl<K, V> Default for RbMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RbMap<K, V> {
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(RbTree::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Discard every entry.
    pub fn clear(&self) {
        self.tree.write().clear();
    }
}

impl<K: StructuralOrd, V> RbMap<K, V> {
    /// Insert or replace, returning the displaced value if the key was
    /// already present.
    pub fn put(&self, key: K, value: V) -> Result<Option<V>, OrderError> {
        self.tree.write().insert(key, value)
    }

    /// Remove a key, returning its value; `Ok(None)` if absent.
    pub fn remove(&self, key: &K) -> Result<Option<V>, OrderError> {
        self.tree.write().remove(key)
    }

    pub fn contains(&self, key: &K) -> Result<bool, OrderError> {
        self.tree.read().contains(key)
    }

    /// Look up a key. The value is cloned out under the read lock; no
    /// reference into the tree escapes the facade.
    pub fn get(&self, key: &K) -> Result<Option<V>, OrderError>
    where
        V: Clone,
    {
        Ok(self.tree.read().get(key)?.cloned())
    }
}

impl<K, V> RbMap<K, V> {
    /// Lazy ascending traversal of `(key, value)` pairs. Holds the read
    /// lock until the returned iterator is dropped.
    pub fn iter(&self) -> Entries<'_, K, V>
    where
        K: Clone,
        V: Clone,
    {
        Entries {
            walk: Walk::new(self.tree.read()),
        }
    }

    /// Lazy ascending traversal of keys. Same lock lifetime as [`Self::iter`].
    pub fn keys(&self) -> Keys<'_, K, V>
    where
        K: Clone,
    {
        Keys {
            walk: Walk::new(self.tree.read()),
        }
    }

    /// Lazy ascending traversal of values (by key order). Same lock
    /// lifetime as [`Self::iter`].
    pub fn values(&self) -> Values<'_, K, V>
    where
        V: Clone,
    {
        Values {
            walk: Walk::new(self.tree.read()),
        }
    }
}

// The single underlying in-order walk. Owns the read guard; the three
// public iterator flavors only differ in how they project each node.
struct Walk<'a, K, V> {
    guard: RwLockReadGuard<'a, RbTree<K, V>>,
    next: Option<NodeId>,
}

impl<'a, K, V> Walk<'a, K, V> {
    fn new(guard: RwLockReadGuard<'a, RbTree<K, V>>) -> Self {
        let next = guard.first();
        Self { guard, next }
    }

    fn advance(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.guard.successor(id);
        Some(id)
    }
}

/// Ordered `(key, value)` iterator. Dropping it, exhausted or not,
/// releases the map's read lock.
pub struct Entries<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K: Clone, V: Clone> Iterator for Entries<'a, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.advance()?;
        let (k, v) = self.walk.guard.entry(id);
        Some((k.clone(), v.clone()))
    }
}

/// Ordered key iterator. Same lock lifetime as [`Entries`].
pub struct Keys<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K: Clone, V> Iterator for Keys<'a, K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.advance()?;
        Some(self.walk.guard.entry(id).0.clone())
    }
}

/// Value iterator in ascending key order. Same lock lifetime as
/// [`Entries`].
pub struct Values<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V: Clone> Iterator for Values<'a, K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.advance()?;
        Some(self.walk.guard.entry(id).1.clone())
    }
}
