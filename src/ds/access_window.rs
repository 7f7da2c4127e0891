//! Bounded sliding window of access timestamps for the admission-gated
//! engine.
//!
//! A window retains at most K observations in arrival order; recording a
//! (K+1)-th access silently discards the oldest. Once a window is full, its
//! oldest retained timestamp is by definition the K-th most recent access,
//! which is the LRU-K eviction metric.

use std::collections::VecDeque;

/// Bounded FIFO of logical access timestamps, capacity fixed at K.
#[derive(Debug, Clone)]
pub struct AccessWindow {
    times: VecDeque<u64>,
    limit: usize,
}

impl AccessWindow {
    /// Creates an empty window retaining at most `limit` timestamps.
    /// `limit` is clamped to a minimum of 1.
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            times: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Appends a timestamp, discarding the oldest when over capacity.
    pub fn record(&mut self, timestamp: u64) {
        self.times.push_back(timestamp);
        if self.times.len() > self.limit {
            self.times.pop_front();
        }
    }

    /// Number of retained observations, `<= limit`.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns `true` once K observations have been retained.
    pub fn is_full(&self) -> bool {
        self.times.len() >= self.limit
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Oldest retained timestamp. For a full window this is the K-th most
    /// recent access; for a partial window, the earliest recorded access.
    pub fn oldest(&self) -> Option<u64> {
        self.times.front().copied()
    }

    /// Most recent timestamp.
    pub fn latest(&self) -> Option<u64> {
        self.times.back().copied()
    }

    pub fn clear(&mut self) {
        self.times.clear();
    }
}
