//! Cache Entry Module
//!
//! Defines a single timestamped key/value entry.

// == Cache Entry ==
/// A stored key/value pair plus the second at which it was last touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<K, V> {
    /// Unix timestamp (seconds) of insertion or last refresh
    pub last_touch: i64,
    /// The entry key
    pub key: K,
    /// The stored value
    pub value: V,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry touched at `now`.
    pub fn new(key: K, value: V, now: i64) -> Self {
        Self {
            last_touch: now,
            key,
            value,
        }
    }

    // == Age ==
    /// Returns the number of seconds since the entry was last touched.
    pub fn age(&self, now: i64) -> i64 {
        now.saturating_sub(self.last_touch)
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `duration` seconds.
    ///
    /// Boundary condition: an entry whose age equals `duration` exactly is
    /// still live. Only a strictly greater age counts as expired.
    pub fn is_expired(&self, now: i64, duration: i64) -> bool {
        self.age(now) > duration
    }
}
