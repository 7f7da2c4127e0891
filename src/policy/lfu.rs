//! # LFU Cache Engine
//!
//! Frequency-based eviction: every access increments an entry's frequency,
//! and when space is needed the entry with the lowest frequency goes, ties
//! broken by recency (oldest-touched among the tied entries).
//!
//! The ordering lives in a [`FreqBuckets`] structure: one recency-ordered
//! doubly linked bucket per frequency plus a running minimum-frequency
//! scalar, so both touch and evict are O(1) amortized. Values are held
//! separately in the engine's own index.
//!
//! Two semantic details worth calling out:
//!
//! - `put` on an *existing* key counts as an access, exactly like `get`.
//!   Reads and writes share one touch path.
//! - Inserting a fresh key resets the running minimum to 1, since a new
//!   entry is always a new minimum.
//!
//! ## Locking
//!
//! `get` uses the same shared-resolve / exclusive-reposition discipline as
//! the LRU engine: a miss is answered under the shared lock, and the
//! exclusive section re-resolves the key before recording the touch so a
//! racing eviction inside the upgrade window is observed as a miss rather
//! than acted on through a stale handle.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::freq_buckets::FreqBuckets;
use crate::error::{CacheError, Result};
use crate::traits::{ConcurrentPolicy, EvictionPolicy};

struct LfuCore<K, V> {
    values: FxHashMap<K, Arc<V>>,
    buckets: FreqBuckets<K>,
    capacity: usize,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize) -> Self {
        Self {
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FreqBuckets::with_capacity(capacity),
            capacity,
        }
    }

    /// Records an access and returns the value. Re-resolves the key, so it
    /// is safe to call after a lock upgrade.
    fn touch_and_get(&mut self, key: &K) -> Option<Arc<V>> {
        let value = self.values.get(key).map(Arc::clone)?;
        self.buckets.touch(key);
        Some(value)
    }

    fn put(&mut self, key: K, value: Arc<V>) {
        if let Some(existing) = self.values.get_mut(&key) {
            *existing = value;
            // An update counts as an access, same as a read.
            self.buckets.touch(&key);
            return;
        }

        if self.values.len() >= self.capacity {
            if let Some((victim, freq)) = self.buckets.pop_min() {
                self.values.remove(&victim);
                trace!(freq, len = self.values.len(), "lfu evicted minimum-frequency entry");
            }
        }

        self.buckets.insert(key.clone());
        self.values.insert(key, value);

        #[cfg(debug_assertions)]
        self.buckets.debug_validate_invariants();
    }

    fn clear(&mut self) {
        self.values.clear();
        self.buckets.clear();
    }
}

/// Thread-safe LFU cache with an embedded reader/writer lock.
///
/// # Example
///
/// ```
/// use evictkit::policy::lfu::LfuCache;
/// use evictkit::traits::EvictionPolicy;
///
/// let cache: LfuCache<u32, &str> = LfuCache::try_new(3).unwrap();
/// cache.put(1, "a").unwrap();
/// cache.put(2, "b").unwrap();
/// cache.put(3, "c").unwrap();
///
/// cache.get(&1).unwrap();
/// cache.get(&1).unwrap(); // frequency 3
/// cache.get(&2).unwrap(); // frequency 2
///
/// // Key 3 has the lowest frequency and is evicted.
/// cache.put(4, "d").unwrap();
/// assert!(cache.contains(&1));
/// assert!(cache.contains(&2));
/// assert!(!cache.contains(&3));
/// assert!(cache.contains(&4));
/// ```
pub struct LfuCache<K, V> {
    inner: RwLock<LfuCore<K, V>>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache holding at most `capacity` entries.
    ///
    /// Fails with [`CacheError::InvalidConfiguration`] if `capacity == 0`.
    pub fn try_new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            inner: RwLock::new(LfuCore::new(capacity)),
            capacity,
        })
    }

    /// Current access frequency of `key`, if cached. Pure read.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.inner.read().buckets.frequency(key)
    }

    /// Lowest occupied frequency, `None` while empty. Pure read.
    pub fn min_frequency(&self) -> Option<u64> {
        self.inner.read().buckets.min_freq()
    }
}

impl<K, V> EvictionPolicy<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn get(&self, key: &K) -> Result<Arc<V>> {
        {
            let core = self.inner.read();
            if !core.values.contains_key(key) {
                return Err(CacheError::KeyNotFound);
            }
        }
        // Re-validate after the upgrade window; a racing put may have
        // evicted this key in between.
        let mut core = self.inner.write();
        core.touch_and_get(key).ok_or(CacheError::KeyNotFound)
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
        trace!("lfu cleared");
    }

    fn policy_name(&self) -> String {
        "LFU".to_string()
    }
}

impl<K, V> ConcurrentPolicy for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        let err = LfuCache::<u32, u32>::try_new(0).unwrap_err();
        assert!(matches!(err, CacheError::InvalidConfiguration(_)));
    }

    #[test]
    fn evicts_lowest_frequency() {
        let cache: LfuCache<u32, &str> = LfuCache::try_new(3).unwrap();
        cache.put(1, "a").unwrap();
        cache.put(2, "b").unwrap();
        cache.put(3, "c").unwrap();
        cache.get(&1).unwrap();
        cache.get(&1).unwrap();
        cache.get(&2).unwrap();

        assert_eq!(cache.frequency(&1), Some(3));
        assert_eq!(cache.frequency(&2), Some(2));
        assert_eq!(cache.frequency(&3), Some(1));

        cache.put(4, "d").unwrap();
        assert!(cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(!cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn ties_break_by_earliest_touch() {
        let cache: LfuCache<u32, u32> = LfuCache::try_new(3).unwrap();
        cache.put(1, 1).unwrap();
        cache.put(2, 2).unwrap();
        cache.put(3, 3).unwrap();
        // All at frequency 1; key 1 is the earliest.
        cache.put(4, 4).unwrap();
        assert!(!cache.contains(&1));
        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert!(cache.contains(&4));
    }

    #[test]
    fn put_on_existing_key_counts_as_access() {
        let cache: LfuCache<u32, &str> = LfuCache::try_new(2).unwrap();
        cache.put(1, "a").unwrap();
        cache.put(2, "b").unwrap();
        cache.put(1, "a2").unwrap(); // frequency 2
        assert_eq!(cache.frequency(&1), Some(2));
        // Key 2 is the minimum now.
        cache.put(3, "c").unwrap();
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
    }

    #[test]
    fn fresh_insert_resets_minimum() {
        let cache: LfuCache<u32, u32> = LfuCache::try_new(3).unwrap();
        cache.put(1, 1).unwrap();
        cache.get(&1).unwrap();
        cache.get(&1).unwrap();
        assert_eq!(cache.min_frequency(), Some(3));
        cache.put(2, 2).unwrap();
        assert_eq!(cache.min_frequency(), Some(1));
    }

    #[test]
    fn clear_then_reuse() {
        let cache: LfuCache<u32, u32> = LfuCache::try_new(2).unwrap();
        cache.put(1, 1).unwrap();
        cache.get(&1).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.min_frequency(), None);
        cache.put(1, 2).unwrap();
        assert_eq!(cache.frequency(&1), Some(1));
        assert_eq!(*cache.get(&1).unwrap(), 2);
    }

    #[test]
    fn policy_name() {
        let cache: LfuCache<u32, u32> = LfuCache::try_new(1).unwrap();
        assert_eq!(cache.policy_name(), "LFU");
    }
}
