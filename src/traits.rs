//! # Capability Contract
//!
//! One uniform operation set that every eviction engine implements, so
//! callers can swap policies without touching call sites.
//!
//! ```text
//!                 ┌──────────────────────────────────────────┐
//!                 │          EvictionPolicy<K, V>            │
//!                 │                                          │
//!                 │  get(&K)      → Result<Arc<V>>           │
//!                 │  put(K, V)    → Result<()>               │
//!                 │  contains(&K) → bool                     │
//!                 │  len / is_empty / capacity               │
//!                 │  clear()                                 │
//!                 │  policy_name() → String                  │
//!                 └────────────────────┬─────────────────────┘
//!                                      │
//!          ┌───────────────┬───────────┴────────┬──────────────────┐
//!          ▼               ▼                    ▼                  ▼
//!     LruCache         FifoCache            LfuCache          LrukCache
//!     (recency)     (insertion order)     (frequency)     (admission-gated)
//! ```
//!
//! ## Locking discipline
//!
//! Unlike a `&mut self` single-threaded core, every engine embeds its own
//! `parking_lot::RwLock` and takes `&self` for all operations, so a shared
//! instance can be driven directly from plain threads. The contract only
//! fixes the observable behavior:
//!
//! - `contains`, `len`, `is_empty`, `capacity` and policy-specific
//!   introspection are pure reads and may run concurrently.
//! - `put` and `clear` are exclusive.
//! - `get` is logically a read but mutates ordering metadata; each engine
//!   documents whether it holds the exclusive lock for the whole call or
//!   re-validates after a shared-to-exclusive reacquisition.
//!
//! ## Values
//!
//! Values are stored as `Arc<V>` and `get` returns a clone of the `Arc`.
//! Nothing owned by an engine is ever referenced outside its lock scope.
//!
//! ## Policy comparison
//!
//! | Policy | Eviction basis          | `get` repositions | `get` on unpromoted |
//! |--------|-------------------------|-------------------|---------------------|
//! | LRU    | Last access time        | yes               | n/a                 |
//! | FIFO   | Insertion order         | no                | n/a                 |
//! | LFU    | Access frequency        | yes (freq + MRU)  | n/a                 |
//! | LRU-K  | K-th last access time   | yes (timestamp)   | `KeyNotFound`       |

use std::sync::Arc;

use crate::error::Result;

/// Uniform operation set implemented by every eviction engine.
///
/// All methods take `&self`; locking is internal to each implementation
/// because the required discipline differs between policies.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use evictkit::traits::EvictionPolicy;
/// use evictkit::policy::lru::LruCache;
/// use evictkit::policy::fifo::FifoCache;
///
/// fn warm(cache: &dyn EvictionPolicy<u32, String>, data: &[(u32, &str)]) {
///     for (key, value) in data {
///         cache.put(*key, value.to_string()).unwrap();
///     }
/// }
///
/// let lru = LruCache::try_new(10).unwrap();
/// let fifo = FifoCache::try_new(10).unwrap();
/// for cache in [&lru as &dyn EvictionPolicy<u32, String>, &fifo] {
///     warm(cache, &[(1, "one"), (2, "two")]);
///     assert_eq!(cache.len(), 2);
///     assert_eq!(cache.get(&1).unwrap(), Arc::new("one".to_string()));
/// }
/// ```
pub trait EvictionPolicy<K, V> {
    /// Resolves a key to its cached value.
    ///
    /// Fails with [`CacheError::KeyNotFound`](crate::error::CacheError) on a
    /// miss. Depending on the policy, a hit updates recency, frequency or
    /// access-timestamp metadata.
    fn get(&self, key: &K) -> Result<Arc<V>>;

    /// Inserts or updates a key-value pair (upsert semantics).
    ///
    /// Evicts according to the policy when the cache is at capacity. In
    /// normal operation this always returns `Ok(())`; an `Err` indicates
    /// an internal bookkeeping defect, never a full cache.
    fn put(&self, key: K, value: V) -> Result<()>;

    /// Returns `true` if the key currently resolves via [`get`](Self::get).
    ///
    /// Never updates eviction metadata.
    fn contains(&self, key: &K) -> bool;

    /// Current number of cached entries. Always `<= capacity()`.
    fn len(&self) -> usize;

    /// Returns `true` if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries, fixed at construction.
    fn capacity(&self) -> usize;

    /// Removes every entry as a single atomic step; capacity is unchanged
    /// and the instance behaves like a freshly constructed one afterwards.
    fn clear(&self);

    /// Human-readable policy name, e.g. `"LRU"`, `"FIFO"`, `"LFU"`, `"LRU-2"`.
    fn policy_name(&self) -> String;
}

/// Marker trait for engines that are safe to share between threads as-is.
///
/// All four engines in this crate implement it; the bound is useful for
/// generic callers that spawn threads over one shared instance:
///
/// ```
/// use std::sync::Arc;
/// use evictkit::traits::{ConcurrentPolicy, EvictionPolicy};
///
/// fn drive<C>(cache: Arc<C>)
/// where
///     C: EvictionPolicy<u64, u64> + ConcurrentPolicy + 'static,
/// {
///     let worker = Arc::clone(&cache);
///     std::thread::spawn(move || {
///         worker.put(1, 1).unwrap();
///     })
///     .join()
///     .unwrap();
/// }
/// ```
pub trait ConcurrentPolicy: Send + Sync {}
