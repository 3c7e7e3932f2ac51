//! Cache Statistics Module
//!
//! Tracks lookup hits and misses and the ways entries leave the cache.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of `get`/`peek` calls that found their key
    pub hits: u64,
    /// Number of `get`/`peek` calls that found nothing
    pub misses: u64,
    /// Number of entries removed by the expiration sweep
    pub expired: u64,
    /// Number of entries removed explicitly
    pub removed: u64,
    /// Number of entries removed by a full purge
    pub purged: u64,
    /// Current number of live entries
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Evictions ==
    /// Total number of entries that left the cache, i.e. the number of
    /// eviction callback invocations.
    pub fn evictions(&self) -> u64 {
        self.expired + self.removed + self.purged
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }

    pub fn record_removal(&mut self) {
        self.removed += 1;
    }

    pub fn record_purged(&mut self, count: usize) {
        self.purged += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
