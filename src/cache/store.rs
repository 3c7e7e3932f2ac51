//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with an arena recency list
//! and lazy time-based expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::cache::recency::{Handle, RecencyList};
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::Config;

/// Callback invoked with the key and value of every entry leaving the cache.
pub type EvictCallback<K, V> = Box<dyn FnMut(&K, &V) + Send>;

// == Cache State ==
/// Everything guarded by the cache lock.
///
/// `index` and `list` always hold the same key set: every key in `index`
/// maps to the handle of the list node carrying that key.
struct CacheState<K, V> {
    index: HashMap<K, Handle>,
    list: RecencyList<K, V>,
    on_evict: Option<EvictCallback<K, V>>,
    stats: CacheStats,
}

impl<K, V> CacheState<K, V>
where
    K: Eq + Hash + Clone,
{
    fn new(on_evict: Option<EvictCallback<K, V>>) -> Self {
        Self {
            index: HashMap::new(),
            list: RecencyList::new(),
            on_evict,
            stats: CacheStats::new(),
        }
    }

    /// Timestamp for an entry about to become the newest.
    ///
    /// Never earlier than the current front, so the list stays ordered even
    /// if the wall clock steps backwards.
    fn stamp(&self, now: i64) -> i64 {
        match self.list.front() {
            Some(newest) => newest.last_touch.max(now),
            None => now,
        }
    }

    fn notify(&mut self, entry: &CacheEntry<K, V>) {
        if let Some(on_evict) = self.on_evict.as_mut() {
            on_evict(&entry.key, &entry.value);
        }
    }

    /// Refreshes the entry behind `handle` and moves it to the front.
    fn touch(&mut self, handle: Handle, now: i64) -> Option<&mut CacheEntry<K, V>> {
        let stamp = self.stamp(now);
        self.list.move_to_front(handle);
        let entry = self.list.get_mut(handle)?;
        entry.last_touch = stamp;
        Some(entry)
    }

    // == Expiration Sweep ==
    /// Removes every entry older than `duration` seconds.
    ///
    /// Scans from the oldest entry and stops at the first live one: ages
    /// only decrease toward the front, so nothing past it can be expired.
    fn purge_expired(&mut self, now: i64, duration: i64) -> usize {
        let mut removed = 0;
        while let Some(oldest) = self.list.back() {
            if !oldest.is_expired(now, duration) {
                break;
            }
            let Some(entry) = self.list.pop_back() else {
                break;
            };
            self.index.remove(&entry.key);
            self.stats.record_expired(1);
            trace!(age = entry.age(now), "Evicting expired entry");
            self.notify(&entry);
            removed += 1;
        }

        if removed > 0 {
            debug!(removed, remaining = self.list.len(), "Swept expired entries");
        }
        removed
    }
}

// == Timed Cache ==
/// Thread-safe key/value cache whose entries expire `duration` seconds after
/// they were last added, updated or read with [`get`](Self::get).
///
/// There is no background thread: every public operation takes the lock,
/// sweeps expired entries, then does its own work, all in one critical
/// section. Callers never observe an expired entry.
///
/// # Eviction callback
/// The callback runs synchronously while the lock is held, once per removed
/// entry (expired, removed or purged). A slow callback stalls every other
/// caller for its duration.
///
/// # Deadlocks
/// The lock is not reentrant. A callback that calls any method on the same
/// cache deadlocks.
pub struct TimedCache<K, V, C = SystemClock> {
    state: Mutex<CacheState<K, V>>,
    /// Entry lifetime in seconds
    duration: i64,
    clock: C,
}

impl<K, V> TimedCache<K, V, SystemClock>
where
    K: Eq + Hash + Clone,
{
    // == Constructors ==
    /// Creates a cache whose entries live for `duration` seconds.
    ///
    /// A zero or negative duration is legal: every entry then expires on the
    /// first sweep after the second it was touched in (or immediately if
    /// negative).
    pub fn new(duration: i64) -> Self {
        Self::with_clock(duration, None, SystemClock)
    }

    /// Creates a cache that calls `on_evict` for every entry leaving it.
    pub fn with_callback<F>(duration: i64, on_evict: F) -> Self
    where
        F: FnMut(&K, &V) + Send + 'static,
    {
        Self::with_clock(duration, Some(Box::new(on_evict)), SystemClock)
    }

    /// Creates a cache from a loaded [`Config`].
    pub fn from_config(config: &Config, on_evict: Option<EvictCallback<K, V>>) -> Self {
        Self::with_clock(config.duration, on_evict, SystemClock)
    }
}

impl<K, V, C> TimedCache<K, V, C>
where
    K: Eq + Hash + Clone,
    C: Clock,
{
    /// Creates a cache reading time from `clock`.
    pub fn with_clock(duration: i64, on_evict: Option<EvictCallback<K, V>>, clock: C) -> Self {
        Self {
            state: Mutex::new(CacheState::new(on_evict)),
            duration,
            clock,
        }
    }

    /// Returns the configured entry lifetime in seconds.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Takes the lock, reads the clock and sweeps expired entries.
    ///
    /// The clock is read under the lock so the sweep and the operation that
    /// follows agree on "now".
    fn lock_and_sweep(&self) -> (MutexGuard<'_, CacheState<K, V>>, i64) {
        let mut state = self.state.lock();
        let now = self.clock.now();
        state.purge_expired(now, self.duration);
        (state, now)
    }

    // == Add ==
    /// Inserts `key` if it is not already cached.
    ///
    /// Returns false and leaves the existing entry untouched if the key is
    /// present.
    pub fn add(&self, key: K, value: V) -> bool {
        let (mut state, now) = self.lock_and_sweep();
        if state.index.contains_key(&key) {
            return false;
        }

        let stamp = state.stamp(now);
        let handle = state
            .list
            .push_front(CacheEntry::new(key.clone(), value, stamp));
        state.index.insert(key, handle);
        true
    }

    // == Update ==
    /// Replaces the value of a cached key and refreshes its timestamp.
    ///
    /// Returns false if the key is absent; nothing is inserted.
    pub fn update<Q>(&self, key: &Q, value: V) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (mut state, now) = self.lock_and_sweep();
        let Some(&handle) = state.index.get(key) else {
            return false;
        };

        match state.touch(handle, now) {
            Some(entry) => {
                entry.value = value;
                true
            }
            None => false,
        }
    }

    // == Get ==
    /// Returns the value of a cached key, refreshing its timestamp.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let (mut state, now) = self.lock_and_sweep();
        let value = match state.index.get(key).copied() {
            Some(handle) => state.touch(handle, now).map(|entry| entry.value.clone()),
            None => None,
        };

        match value {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        value
    }

    // == Peek ==
    /// Returns the value of a cached key without refreshing it.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let (mut state, _) = self.lock_and_sweep();
        let value = state
            .index
            .get(key)
            .and_then(|&handle| state.list.get(handle))
            .map(|entry| entry.value.clone());

        match value {
            Some(_) => state.stats.record_hit(),
            None => state.stats.record_miss(),
        }
        value
    }

    // == Contains ==
    /// Checks whether a key is cached, without refreshing it.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (state, _) = self.lock_and_sweep();
        state.index.contains_key(key)
    }

    // == Remove ==
    /// Removes a key, invoking the eviction callback.
    ///
    /// Returns false if the key was not cached.
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (mut state, _) = self.lock_and_sweep();
        let Some(handle) = state.index.remove(key) else {
            return false;
        };
        let Some(entry) = state.list.remove(handle) else {
            return false;
        };

        state.notify(&entry);
        state.stats.record_removal();
        true
    }

    // == Keys ==
    /// Returns the live keys, oldest first.
    pub fn keys(&self) -> Vec<K> {
        let (state, _) = self.lock_and_sweep();
        state.list.iter().map(|entry| entry.key.clone()).collect()
    }

    // == Entries ==
    /// Returns a snapshot of the live entries, oldest first.
    pub fn entries(&self) -> Vec<CacheEntry<K, V>>
    where
        V: Clone,
    {
        let (state, _) = self.lock_and_sweep();
        state.list.iter().cloned().collect()
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        let (state, _) = self.lock_and_sweep();
        state.list.len()
    }

    /// Returns true if no live entries remain.
    pub fn is_empty(&self) -> bool {
        let (state, _) = self.lock_and_sweep();
        state.list.is_empty()
    }

    // == Purge ==
    /// Removes every entry regardless of age, oldest first, invoking the
    /// eviction callback for each.
    ///
    /// Each entry leaves both the list and the index before its callback
    /// runs, so a panicking callback leaves the remaining entries intact.
    pub fn purge(&self) {
        let mut state = self.state.lock();
        let mut purged = 0;
        while let Some(entry) = state.list.pop_back() {
            state.index.remove(&entry.key);
            state.stats.record_purged(1);
            state.notify(&entry);
            purged += 1;
        }
        state.list.clear();

        debug!(purged, "Purged cache");
    }

    // == Clear ==
    /// Empties the cache. Same as [`purge`](Self::purge): the eviction
    /// callback still fires for every entry.
    pub fn clear(&self) {
        self.purge();
    }

    // == Purge Expired ==
    /// Runs the expiration sweep on its own.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&self) -> usize {
        let mut state = self.state.lock();
        let now = self.clock.now();
        state.purge_expired(now, self.duration)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let (state, _) = self.lock_and_sweep();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.list.len());
        stats
    }

    /// Asserts that the index and the list agree and the list is ordered.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let state = self.state.lock();
        assert_eq!(state.index.len(), state.list.len());
        assert_eq!(state.list.iter().count(), state.list.len());

        for (key, &handle) in &state.index {
            let entry = state.list.get(handle).expect("index points at a vacant slot");
            assert!(entry.key == *key, "index and list disagree on a key");
        }

        let stamps: Vec<i64> = state.list.iter().map(|e| e.last_touch).collect();
        assert!(
            stamps.windows(2).all(|w| w[0] <= w[1]),
            "list out of order: {:?}",
            stamps
        );
    }
}

impl<K, V, C> fmt::Debug for TimedCache<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedCache")
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}
