//! # LRU Cache Engine
//!
//! Recency-based eviction: every hit moves the entry to the most-recent end
//! of an ordered sequence, and the entry at the least-recent end is evicted
//! when a new key arrives at capacity.
//!
//! ```text
//!   order (SlotList, front = most recent)          map (FxHashMap)
//!   front ─► [k3] ◄──► [k1] ◄──► [k2] ◄─ back     k1 ─► SlotId(0)
//!                                  │               k2 ─► SlotId(1)
//!                            eviction end          k3 ─► SlotId(2)
//! ```
//!
//! ## Locking
//!
//! `get` resolves the miss/hit question under a shared lock, then drops it
//! and reacquires the exclusive lock to reposition the entry. A racing
//! writer may evict or replace the entry inside that window, so the
//! exclusive section re-resolves the key through the index before touching
//! anything; a stale handle from before the window is never dereferenced.
//! `put` and `clear` hold the exclusive lock throughout.
//!
//! All operations are O(1).

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::linked_list::SlotList;
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, Result};
use crate::traits::{ConcurrentPolicy, EvictionPolicy};

struct Entry<K, V> {
    key: K,
    value: Arc<V>,
}

/// Lock-free interior of the engine; all access goes through the engine's
/// `RwLock`.
struct LruCore<K, V> {
    map: FxHashMap<K, SlotId>,
    order: SlotList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: SlotList::with_capacity(capacity),
            capacity,
        }
    }

    /// Repositions `key` at the most-recent end and returns its value.
    /// Looks the key up fresh, so it is safe to call after a lock upgrade.
    fn touch_and_get(&mut self, key: &K) -> Option<Arc<V>> {
        let id = *self.map.get(key)?;
        self.order.move_to_front(id);
        self.order.get(id).map(|entry| Arc::clone(&entry.value))
    }

    fn put(&mut self, key: K, value: Arc<V>) {
        if let Some(&id) = self.map.get(&key) {
            if let Some(entry) = self.order.get_mut(id) {
                entry.value = value;
            }
            self.order.move_to_front(id);
            return;
        }

        if self.map.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_back() {
                self.map.remove(&evicted.key);
                trace!(len = self.map.len(), "lru evicted least-recent entry");
            }
        }

        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.map.insert(key, id);

        #[cfg(debug_assertions)]
        self.order.debug_validate_invariants();
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

/// Thread-safe LRU cache with an embedded reader/writer lock.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru::LruCache;
/// use evictkit::traits::EvictionPolicy;
///
/// let cache: LruCache<u32, String> = LruCache::try_new(3).unwrap();
/// cache.put(1, "a".to_string()).unwrap();
/// cache.put(2, "b".to_string()).unwrap();
/// cache.put(3, "c".to_string()).unwrap();
///
/// // Touch key 1, protecting it from the next eviction.
/// cache.get(&1).unwrap();
/// cache.put(4, "d".to_string()).unwrap();
///
/// assert!(cache.contains(&1));
/// assert!(!cache.contains(&2)); // least recently used
/// assert!(cache.contains(&3));
/// assert!(cache.contains(&4));
/// ```
pub struct LruCache<K, V> {
    inner: RwLock<LruCore<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidConfiguration`] if `capacity == 0`.
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            inner: RwLock::new(LruCore::new(capacity)),
            capacity,
        })
    }

    /// Current victim candidate (least-recent entry) without repositioning
    /// it. Diagnostic; takes only the shared lock.
    pub fn peek_lru(&self) -> Option<(K, Arc<V>)> {
        let core = self.inner.read();
        core.order
            .back()
            .map(|entry| (entry.key.clone(), Arc::clone(&entry.value)))
    }
}

impl<K, V> EvictionPolicy<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&self, key: &K) -> Result<Arc<V>> {
        // Miss fast path under the shared lock.
        {
            let core = self.inner.read();
            if !core.map.contains_key(key) {
                return Err(CacheError::KeyNotFound);
            }
        }
        // The shared lock is gone; the entry may have been evicted or
        // replaced before we get the exclusive lock. Resolve it again.
        let mut core = self.inner.write();
        core.touch_and_get(key).ok_or(CacheError::KeyNotFound)
    }

    fn put(&self, key: K, value: V) -> Result<()> {
        let mut core = self.inner.write();
        core.put(key, Arc::new(value));
        Ok(())
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.read().map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        let mut core = self.inner.write();
        core.clear();
        trace!("lru cleared");
    }

    fn policy_name(&self) -> String {
        "LRU".to_string()
    }
}

impl<K, V> ConcurrentPolicy for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
