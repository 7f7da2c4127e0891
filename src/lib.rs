//! evictkit: pluggable cache eviction engines behind one capability contract.
//!
//! Four thread-safe, fixed-capacity key/value caches sharing the
//! [`EvictionPolicy`](traits::EvictionPolicy) trait:
//!
//! - [`LruCache`](policy::lru::LruCache): evicts the least recently accessed
//!   entry.
//! - [`FifoCache`](policy::fifo::FifoCache): evicts in insertion order,
//!   ignoring accesses.
//! - [`LfuCache`](policy::lfu::LfuCache): evicts the lowest-frequency entry,
//!   ties broken by recency.
//! - [`LrukCache`](policy::lru_k::LrukCache): admission-gated; a key needs K
//!   observed accesses before it is cached at all, and victims are ranked by
//!   their K-th most recent access.
//!
//! Every engine embeds its own reader/writer lock, hands values out as
//! `Arc<V>` clones, and never exceeds its configured capacity.
//!
//! ```
//! use evictkit::prelude::*;
//!
//! let cache: LruCache<u32, String> = LruCache::try_new(2)?;
//! cache.put(1, "one".to_string())?;
//! cache.put(2, "two".to_string())?;
//! cache.get(&1)?;                    // key 1 is now most recent
//! cache.put(3, "three".to_string())?; // key 2 is evicted
//!
//! assert!(cache.contains(&1));
//! assert!(!cache.contains(&2));
//! # Ok::<(), evictkit::error::CacheError>(())
//! ```

pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
