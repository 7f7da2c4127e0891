//! # LRU-K Cache Engine
//!
//! Admission-gated eviction: a key must be observed K times before it is
//! admitted to the value-carrying store at all, which protects the cache
//! from pollution by one-shot scans. Below the threshold only a value-less
//! history record exists.
//!
//! ```text
//!             put(k, v)                 K-th put
//!   unseen ─────────────► tracked(j) ─────────────► promoted
//!                         history map               cache map
//!                         (timestamps only)         (value + timestamps)
//! ```
//!
//! Per key, exactly one of {absent, tracked, promoted} holds at any time.
//! Timestamps are logical ticks from a per-instance monotonic counter; every
//! window is a bounded FIFO of size K ([`AccessWindow`]).
//!
//! ## Access accounting
//!
//! Only `put` advances an unpromoted key's access count. `get` resolves
//! solely against the promoted store: a merely-tracked or unseen key fails
//! with `KeyNotFound`, while a hit on a promoted key records a fresh access
//! to keep its eviction ranking current.
//!
//! ## Eviction
//!
//! When a promotion needs space, the victim search prefers history-tracked
//! keys with fewer than K accesses, oldest first-recorded access first;
//! the promoting key itself (already at K) is never a candidate. If the
//! promoted store is still at capacity afterwards, the promoted entry whose
//! K-th most recent access is earliest is evicted, which keeps the size
//! bound strict. Needing a victim when none exists anywhere is an
//! [`InternalConsistency`](crate::error::CacheError) defect.
//!
//! ## Locking
//!
//! Reads must record history here, so `get` holds the exclusive lock for
//! its entire duration; there is no upgrade window to re-validate.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::access_window::AccessWindow;
use crate::error::{CacheError, Result};
use crate::traits::{ConcurrentPolicy, EvictionPolicy};

/// Promoted entry: value plus its accumulated access window.
struct CacheRecord<V> {
    value: Arc<V>,
    window: AccessWindow,
}

struct LrukCore<K, V> {
    k: usize,
    capacity: usize,
    /// Logical clock; advanced once per recorded access.
    tick: u64,
    /// Keys seen fewer than K times: timestamp window only, no value.
    history: FxHashMap<K, AccessWindow>,
    /// Keys promoted after K observations.
    cache: FxHashMap<K, CacheRecord<V>>,
}

impl<K, V> LrukCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(capacity: usize, k: usize) -> Self {
        Self {
            k,
            capacity,
            tick: 0,
            history: FxHashMap::default(),
            cache: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn put(&mut self, key: K, value: V) -> Result<()> {
        let now = self.next_tick();

        // Already promoted: plain upsert plus a recorded access.
        if let Some(record) = self.cache.get_mut(&key) {
            record.value = Arc::new(value);
            record.window.record(now);
            return Ok(());
        }

        let window = self
            .history
            .entry(key.clone())
            .or_insert_with(|| AccessWindow::new(self.k));
        window.record(now);
        if !window.is_full() {
            // Still below the admission threshold; the value is discarded.
            return Ok(());
        }

        // K-th observed access: promote, evicting first if needed.
        if self.cache.len() >= self.capacity {
            self.make_room()?;
        }
        let window = self.history.remove(&key).ok_or_else(|| {
            CacheError::InternalConsistency(
                "promoting key missing from history tracker".to_string(),
            )
        })?;
        self.cache.insert(key, CacheRecord {
            value: Arc::new(value),
            window,
        });
        debug!(len = self.cache.len(), "lru-k promoted entry");
        Ok(())
    }

    /// Frees promoted-store space for one promotion.
    ///
    /// Victim order: history-tracked keys short of K accesses (earliest
    /// first access wins), then the promoted entry with the earliest K-th
    /// most recent access. A history victim does not shrink the promoted
    /// store, so the second step still runs when it must to keep
    /// `len <= capacity` strict.
    fn make_room(&mut self) -> Result<()> {
        let history_victim = self
            .history
            .iter()
            .filter(|(_, window)| window.len() < self.k)
            .min_by_key(|(_, window)| window.oldest().unwrap_or(u64::MAX))
            .map(|(key, _)| key.clone());
        if let Some(key) = history_victim {
            self.history.remove(&key);
            trace!("lru-k evicted history record");
        }

        if self.cache.len() >= self.capacity {
            let promoted_victim = self
                .cache
                .iter()
                .min_by_key(|(_, record)| record.window.oldest().unwrap_or(u64::MAX))
                .map(|(key, _)| key.clone());
            let key = promoted_victim.ok_or_else(|| {
                CacheError::InternalConsistency(
                    "eviction required but no candidate exists".to_string(),
                )
            })?;
            self.cache.remove(&key);
            trace!(len = self.cache.len(), "lru-k evicted promoted entry");
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.history.clear();
        self.cache.clear();
        self.tick = 0;
    }
}

/// Thread-safe LRU-K cache with an embedded reader/writer lock.
///
/// # Example
///
/// ```
/// use evictkit::policy::lru_k::LrukCache;
/// use evictkit::traits::EvictionPolicy;
/// use evictkit::error::CacheError;
///
/// // K defaults to 2: a key needs two puts before it is admitted.
/// let cache: LrukCache<u32, &str> = LrukCache::try_new(10).unwrap();
///
/// cache.put(1, "v").unwrap();
/// assert!(!cache.contains(&1));
/// assert_eq!(cache.get(&1).unwrap_err(), CacheError::KeyNotFound);
///
/// cache.put(1, "v2").unwrap();
/// assert!(cache.contains(&1));
/// assert_eq!(*cache.get(&1).unwrap(), "v2");
/// ```
pub struct LrukCache<K, V> {
    inner: RwLock<LrukCore<K, V>>,
    capacity: usize,
    k: usize,
}

impl<K, V> LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU-K cache with the customary default of K = 2.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::try_with_k(capacity, 2)
    }

    /// Creates an LRU-K cache holding at most `capacity` promoted entries,
    /// admitting keys after `k` observed accesses.
    ///
    /// Fails with [`CacheError::InvalidConfiguration`] if `capacity == 0`
    /// or `k == 0`.
    pub fn try_with_k(capacity: usize, k: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }
        if k == 0 {
            return Err(CacheError::InvalidConfiguration(
                "k must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            inner: RwLock::new(LrukCore::new(capacity, k)),
            capacity,
            k,
        })
    }

    /// Configured admission threshold.
    pub fn k_value(&self) -> usize {
        self.k
    }

    /// Accesses recorded for a merely-tracked key; 0 if the key is unseen
    /// or already promoted. Pure read.
    pub fn history_access_count(&self, key: &K) -> usize {
        self.inner
            .read()
            .history
            .get(key)
            .map_or(0, |window| window.len())
    }

    /// Accesses retained in a promoted key's window (at most K); 0 if the
    /// key is not promoted. Pure read.
    pub fn cache_access_count(&self, key: &K) -> usize {
        self.inner
            .read()
            .cache
            .get(key)
            .map_or(0, |record| record.window.len())
    }
}

impl<K, V> EvictionPolicy<K, V> for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Whole-call exclusive lock: a hit must append to the access window.
    fn get(&self, key: &K) -> Result<Arc<V>> {
        let mut guard = self.inner.write();
        let core = &mut *guard;
        // A miss burns a tick; only relative order matters.
        let now = core.next_tick();
        let record = core.cache.get_mut(key).ok_or(CacheError::KeyNotFound)?;
        record.window.record(now);
        Ok(Arc::clone(&record.value))
    }

    fn put(&self, key: K, value: V) -> Result<()> {
        self.inner.write().put(key, value)
    }

    /// Only promoted keys count as cached.
    fn contains(&self, key: &K) -> bool {
        self.inner.read().cache.contains_key(key)
    }

    fn len(&self) -> usize {
        self.inner.read().cache.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&self) {
        let mut core = self.inner.write();
        core.clear();
        trace!("lru-k cleared");
    }

    fn policy_name(&self) -> String {
        format!("LRU-{}", self.k)
    }
}

impl<K, V> ConcurrentPolicy for LrukCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Send + Sync,
{
}

impl<K, V> fmt::Debug for LrukCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LrukCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .field("k", &self.k)
            .finish_non_exhaustive()
    }
}
