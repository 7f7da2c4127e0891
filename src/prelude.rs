pub use crate::ds::{AccessWindow, FreqBuckets, SlotArena, SlotId, SlotList};
pub use crate::error::{CacheError, Result};
pub use crate::policy::fifo::FifoCache;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru::LruCache;
pub use crate::policy::lru_k::LrukCache;
pub use crate::traits::{ConcurrentPolicy, EvictionPolicy};
