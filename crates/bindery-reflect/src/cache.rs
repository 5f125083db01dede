//! Process-wide memo tables with lock-free reads.
//!
//! Readers load the current snapshot; writers publish a copy with the new
//! entry through CAS and retry from the latest snapshot on contention. Entries
//! are never evicted. When two threads resolve the same key concurrently, the
//! first published entry wins and the other value is dropped.

use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashMap;
use arc_swap::ArcSwap;

pub(crate) struct SnapshotCache<K, V> {
    map: ArcSwap<AHashMap<K, Arc<V>>>,
}

impl<K: Eq + Hash + Clone, V> SnapshotCache<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            map: ArcSwap::from_pointee(AHashMap::new()),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<Arc<V>> {
        self.map.load().get(key).cloned()
    }

    /// Return the cached entry for `key`, computing and publishing it if absent.
    ///
    /// `make` runs outside the publication loop and at most once per call.
    pub(crate) fn get_or_insert_with(&self, key: K, make: impl FnOnce() -> V) -> Arc<V> {
        if let Some(existing) = self.get(&key) {
            return existing;
        }
        let fresh = Arc::new(make());
        let mut winner = Arc::clone(&fresh);
        self.map.rcu(|current| {
            if let Some(existing) = current.get(&key) {
                winner = Arc::clone(existing);
                return Arc::clone(current);
            }
            winner = Arc::clone(&fresh);
            let mut next = AHashMap::clone(current);
            next.insert(key.clone(), Arc::clone(&fresh));
            Arc::new(next)
        });
        winner
    }

    pub(crate) fn len(&self) -> usize {
        self.map.load().len()
    }
}
