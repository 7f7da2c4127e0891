//! Frequency-bucketed key tracker for the LFU engine.
//!
//! Keys are held once in a [`SlotArena`] and linked into one doubly linked
//! bucket per frequency; a running `min_freq` scalar names the lowest
//! occupied bucket. Within a bucket, entries are ordered by recency of last
//! touch: most recently touched at the head, eviction candidate at the tail.
//!
//! ```text
//!   buckets: freq -> (head ◄──► ... ◄──► tail)
//!
//!   1 ─► [k9] ◄──► [k4] ◄──► [k1]   ◄─ min_freq = 1
//!   3 ─► [k7]
//!   8 ─► [k2] ◄──► [k5]
//!
//!   pop_min() removes k1 (lowest frequency, oldest touch among ties)
//! ```
//!
//! Values are not stored here; the engine keeps them in its own index. All
//! operations are O(1) except the occasional upward scan of `min_freq` after
//! the minimum bucket drains, which is amortized by touches advancing one
//! frequency at a time.

use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};

#[derive(Debug)]
struct Entry<K> {
    key: K,
    freq: u64,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Head and tail of one frequency bucket. Buckets are removed from the map
/// as soon as they drain, so both ends always point at live entries.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    head: SlotId,
    tail: SlotId,
}

/// Frequency -> recency-ordered bucket structure with a running minimum.
#[derive(Debug)]
pub struct FreqBuckets<K> {
    arena: SlotArena<Entry<K>>,
    index: FxHashMap<K, SlotId>,
    buckets: FxHashMap<u64, Bucket>,
    /// Lowest occupied frequency; 0 only while the structure is empty.
    min_freq: u64,
}

impl<K> FreqBuckets<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            index: FxHashMap::default(),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: SlotArena::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            buckets: FxHashMap::default(),
            min_freq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Current frequency of `key`, if tracked.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        self.arena.get(id).map(|entry| entry.freq)
    }

    /// Lowest occupied frequency; `None` while empty.
    pub fn min_freq(&self) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(self.min_freq)
        }
    }

    /// Starts tracking `key` at frequency 1 (a fresh entry is always a new
    /// minimum). Returns `false` if the key is already tracked.
    pub fn insert(&mut self, key: K) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        let id = self.arena.insert(Entry {
            key: key.clone(),
            freq: 1,
            prev: None,
            next: None,
        });
        self.attach_front(1, id);
        self.index.insert(key, id);
        self.min_freq = 1;
        true
    }

    /// Records an access: moves the key up one frequency and to the
    /// most-recently-touched end of its new bucket. Returns the new
    /// frequency, or `None` if the key is not tracked.
    pub fn touch(&mut self, key: &K) -> Option<u64> {
        let id = *self.index.get(key)?;
        let old_freq = self.arena.get(id)?.freq;
        let new_freq = old_freq + 1;

        let emptied = self.detach(old_freq, id);
        if emptied && old_freq == self.min_freq {
            // The touched entry itself re-occupies old_freq + 1.
            self.min_freq = new_freq;
        }

        if let Some(entry) = self.arena.get_mut(id) {
            entry.freq = new_freq;
        }
        self.attach_front(new_freq, id);
        Some(new_freq)
    }

    /// Stops tracking `key`, returning its last frequency.
    pub fn remove(&mut self, key: &K) -> Option<u64> {
        let id = self.index.remove(key)?;
        let freq = self.arena.get(id)?.freq;
        let emptied = self.detach(freq, id);
        self.arena.remove(id);
        if self.index.is_empty() {
            self.min_freq = 0;
        } else if emptied && freq == self.min_freq {
            self.advance_min();
        }
        Some(freq)
    }

    /// Removes and returns the eviction candidate: the least-recently-touched
    /// entry of the lowest occupied frequency bucket.
    pub fn pop_min(&mut self) -> Option<(K, u64)> {
        let bucket = *self.buckets.get(&self.min_freq)?;
        let id = bucket.tail;
        let freq = self.min_freq;
        let emptied = self.detach(freq, id);
        let entry = self.arena.remove(id)?;
        self.index.remove(&entry.key);
        if self.index.is_empty() {
            self.min_freq = 0;
        } else if emptied {
            self.advance_min();
        }
        Some((entry.key, freq))
    }

    /// Eviction candidate without removing it.
    pub fn peek_min(&self) -> Option<(&K, u64)> {
        let bucket = self.buckets.get(&self.min_freq)?;
        self.arena.get(bucket.tail).map(|entry| (&entry.key, entry.freq))
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.index.clear();
        self.buckets.clear();
        self.min_freq = 0;
    }

    /// Detaches `id` from the bucket at `freq`; returns `true` if the bucket
    /// drained and was dropped from the map.
    fn detach(&mut self, freq: u64, id: SlotId) -> bool {
        let (prev, next) = match self.arena.get(id) {
            Some(entry) => (entry.prev, entry.next),
            None => return false,
        };

        match prev {
            Some(prev_id) => {
                if let Some(entry) = self.arena.get_mut(prev_id) {
                    entry.next = next;
                }
            }
            None => {
                if let (Some(next_id), Some(bucket)) = (next, self.buckets.get_mut(&freq)) {
                    bucket.head = next_id;
                }
            }
        }
        match next {
            Some(next_id) => {
                if let Some(entry) = self.arena.get_mut(next_id) {
                    entry.prev = prev;
                }
            }
            None => {
                if let (Some(prev_id), Some(bucket)) = (prev, self.buckets.get_mut(&freq)) {
                    bucket.tail = prev_id;
                }
            }
        }

        if let Some(entry) = self.arena.get_mut(id) {
            entry.prev = None;
            entry.next = None;
        }

        if prev.is_none() && next.is_none() {
            self.buckets.remove(&freq);
            true
        } else {
            false
        }
    }

    fn attach_front(&mut self, freq: u64, id: SlotId) {
        match self.buckets.get_mut(&freq) {
            Some(bucket) => {
                let old_head = bucket.head;
                if let Some(entry) = self.arena.get_mut(id) {
                    entry.prev = None;
                    entry.next = Some(old_head);
                }
                if let Some(entry) = self.arena.get_mut(old_head) {
                    entry.prev = Some(id);
                }
                bucket.head = id;
            }
            None => {
                self.buckets.insert(freq, Bucket { head: id, tail: id });
            }
        }
    }

    /// Walks `min_freq` up to the next occupied bucket. Only called while
    /// non-empty, so the walk always terminates.
    fn advance_min(&mut self) {
        while !self.buckets.contains_key(&self.min_freq) {
            self.min_freq += 1;
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.arena.len(), self.index.len());
        if self.index.is_empty() {
            assert!(self.buckets.is_empty());
            assert_eq!(self.min_freq, 0);
            return;
        }
        let lowest = self.buckets.keys().min().copied().unwrap();
        assert_eq!(self.min_freq, lowest, "min_freq out of sync");
        let mut seen = 0usize;
        for (&freq, bucket) in &self.buckets {
            let mut current = Some(bucket.head);
            let mut prev = None;
            while let Some(id) = current {
                let entry = self.arena.get(id).expect("bucket entry missing");
                assert_eq!(entry.freq, freq);
                assert_eq!(entry.prev, prev);
                prev = Some(id);
                current = entry.next;
                seen += 1;
                assert!(seen <= self.index.len(), "cycle detected");
            }
            assert_eq!(prev, Some(bucket.tail));
        }
        assert_eq!(seen, self.index.len());
    }
}

impl<K> Default for FreqBuckets<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
