//! Eviction policy engines.
//!
//! Each engine is a self-contained, thread-safe cache behind the shared
//! [`EvictionPolicy`](crate::traits::EvictionPolicy) contract:
//!
//! | Engine        | Victim selection                             | `get` lock      |
//! |---------------|----------------------------------------------|-----------------|
//! | [`LruCache`]  | least recently accessed                      | shared, upgrade |
//! | [`FifoCache`] | oldest inserted, accesses ignored            | shared only     |
//! | [`LfuCache`]  | lowest frequency, ties by recency            | shared, upgrade |
//! | [`LrukCache`] | K-th most recent access, admission-gated     | exclusive       |

pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod lru_k;

pub use fifo::FifoCache;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use lru_k::LrukCache;
