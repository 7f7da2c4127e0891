//! # FIFO Cache Engine
//!
//! Insertion-order eviction: the oldest-inserted entry goes first, no matter
//! how often or how recently it was accessed. This deliberately decouples
//! eviction from the access pattern, which makes eviction timing fully
//! predictable and contrasts with LRU.
//!
//! ```text
//!   queue (VecDeque, insertion order)        values (FxHashMap)
//!   front ─► k1, k2, k3 ◄─ back              k1 ─► Arc<V>
//!     │                                      k2 ─► Arc<V>
//!   eviction end                             k3 ─► Arc<V>
//! ```
//!
//! Because `get` never repositions anything, it is a pure read and holds
//! only the shared lock for its whole duration; FIFO has no lock-upgrade
//! window at all. Updating an existing key replaces the value in place
//! without requeueing. All operations are O(1).

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::{CacheError, Result};
use crate::traits::{ConcurrentPolicy, EvictionPolicy};

struct FifoCore<K, V> {
    values: FxHashMap<K, Arc<V>>,
    queue: VecDeque<K>,
    capacity: usize,
}

impl<K, V> FifoCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn put(&mut self, key: K, value: Arc<V>) {
        if let Some(existing) = self.values.get_mut(&key) {
            // Update in place; insertion order is untouched.
            *existing = value;
            return;
        }

        if self.queue.len() >= self.capacity {
            if let Some(oldest) = self.queue.pop_front() {
                self.values.remove(&oldest);
                trace!(len = self.queue.len(), "fifo evicted oldest entry");
            }
        }

        self.queue.push_back(key.clone());
        self.values.insert(key, value);
    }

    fn clear(&mut self) {
        self.values.clear();
        self.queue.clear();
    }
}

/// Thread-safe FIFO cache with an embedded reader/writer lock.
///
/// # Example
///
/// ```
/// use evictkit::policy::fifo::FifoCache;
/// use evictkit::traits::EvictionPolicy;
///
/// let cache: FifoCache<u32, &str> = FifoCache::try_new(3).unwrap();
/// cache.put(1, "a").unwrap();
/// cache.put(2, "b").unwrap();
/// cache.put(3, "c").unwrap();
///
/// // Accessing key 1 does not protect it: eviction is insertion-ordered.
/// cache.get(&1).unwrap();
/// cache.put(4, "d").unwrap();
///
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&4));
/// ```
pub struct FifoCache<K, V> {
    inner: RwLock<FifoCore<K, V>>,
    capacity: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a FIFO cache holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidConfiguration`] if `capacity == 0`.
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            inner: RwLock::new(FifoCore::new(capacity)),
            capacity,
        })
    }

    /// Oldest entry (next eviction victim) without removing it. Diagnostic.
    pub fn peek_oldest(&self) -> Option<(K, Arc<V>)> {
        let core = self.inner.read();
        let key = core.queue.front()?;
        let value = core.values.get(key)?;
        Some((key.clone(), Arc::clone(value)))
    }
}

impl<K, V> EvictionPolicy<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Pure read: never repositions, shared lock only.
    fn get(&self, key: &K) -> Result<Arc<V>> {
        let core = self.inner.read();
        core.values
            .get(key)
            .map(Arc::clone)
            .ok_or(CacheError::KeyNotFound)
    }

    fn put(&self, key: K, value: V) -> Result<()> {
        let mut core = self.inner.write();
        core.put(key, Arc::new(value));
        Ok(())
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.read().values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.read().values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        let mut core = self.inner.write();
        core.clear();
        trace!("fifo cleared");
    }

    fn policy_name(&self) -> String {
        "FIFO".to_string()
    }
}

impl<K, V> ConcurrentPolicy for FifoCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}
