//! Data-structure primitives shared by the policy engines.
//!
//! Entries live in arenas and are addressed by stable [`SlotId`] handles
//! instead of raw pointers, which preserves the O(1) splice and detach
//! operations of a hand-linked list without manual memory management.

pub mod access_window;
pub mod freq_buckets;
pub mod linked_list;
pub mod slot_arena;

pub use access_window::AccessWindow;
pub use freq_buckets::FreqBuckets;
pub use linked_list::SlotList;
pub use slot_arena::{SlotArena, SlotId};
