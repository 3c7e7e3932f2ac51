//! Integration Tests for the Timed Cache
//!
//! Exercises the public API end to end: expiry scenarios, eviction
//! callbacks, shared use across threads and the background sweep task.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use timed_cache::{spawn_cleanup_task, CacheEntry, Config, EvictCallback, ManualClock, TimedCache};

// == Helper Functions ==

type Log = Arc<Mutex<Vec<(u32, String)>>>;

fn logging_cache(duration: i64) -> (TimedCache<u32, String, ManualClock>, ManualClock, Log) {
    let clock = ManualClock::new(1_700_000_000);
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let on_evict: EvictCallback<u32, String> = Box::new(move |k: &u32, v: &String| {
        sink.lock().unwrap().push((*k, v.clone()));
    });
    let cache = TimedCache::with_clock(duration, Some(on_evict), clock.clone());
    (cache, clock, log)
}

fn logged(log: &Log) -> Vec<(u32, String)> {
    log.lock().unwrap().clone()
}

// == Expiry Scenarios ==

#[test]
fn test_get_after_partial_expiry() {
    let (cache, clock, log) = logging_cache(4);
    cache.add(1, "a".to_string());
    clock.advance(2);
    cache.add(2, "b".to_string());

    clock.advance(3);
    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.get(&2), Some("b".to_string()));

    let entries = cache.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].last_touch, 1_700_000_005);
    assert_eq!(logged(&log), vec![(1, "a".to_string())]);
}

#[test]
fn test_replay_of_demo_sequence() {
    let (cache, clock, log) = logging_cache(4);
    for (key, value) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")] {
        cache.add(key, value.to_string());
        clock.advance(2);
    }
    // Last add happened at +6, clock now reads +8; move to +10
    clock.advance(2);

    // Key 3 was touched at +4 and is 6s old by now
    assert_eq!(cache.get(&3), None);
    cache.purge_expired();

    assert_eq!(cache.keys(), vec![4]);
    assert_eq!(cache.len(), 1);
    let evicted: Vec<u32> = logged(&log).into_iter().map(|(k, _)| k).collect();
    assert_eq!(evicted, vec![1, 2, 3]);
}

#[test]
fn test_entries_snapshot_is_oldest_first() {
    let (cache, clock, _) = logging_cache(100);
    cache.add(1, "a".to_string());
    clock.advance(1);
    cache.add(2, "b".to_string());
    clock.advance(1);
    cache.get(&1);

    let base = 1_700_000_000;
    assert_eq!(
        cache.entries(),
        vec![
            CacheEntry::new(2, "b".to_string(), base + 1),
            CacheEntry::new(1, "a".to_string(), base + 2),
        ]
    );
}

// == Eviction Callback ==

#[test]
fn test_callback_fires_once_per_removal_path() {
    let (cache, clock, log) = logging_cache(4);
    cache.add(1, "expired".to_string());
    clock.advance(3);
    cache.add(2, "removed".to_string());
    cache.add(3, "purged".to_string());

    clock.advance(2);
    assert!(cache.remove(&2));
    cache.purge();

    assert_eq!(
        logged(&log),
        vec![
            (1, "expired".to_string()),
            (2, "removed".to_string()),
            (3, "purged".to_string()),
        ]
    );

    let stats = cache.stats();
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.removed, 1);
    assert_eq!(stats.purged, 1);
    assert_eq!(stats.evictions(), 3);
}

#[test]
fn test_with_callback_constructor() {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    let cache: TimedCache<&'static str, i32> =
        TimedCache::with_callback(300, move |_: &&'static str, _: &i32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    cache.add("x", 1);
    cache.add("y", 2);
    cache.purge();

    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert!(cache.is_empty());
}

#[test]
fn test_from_config() {
    let config = Config {
        duration: 42,
        cleanup_interval: 0,
    };
    let cache: TimedCache<String, String> = TimedCache::from_config(&config, None);

    assert_eq!(cache.duration(), 42);
    assert!(cache.add("k".to_string(), "v".to_string()));
    assert!(cache.contains("k"));
}

// == Concurrency ==

#[test]
fn test_concurrent_access_from_threads() {
    let clock = ManualClock::new(0);
    let cache: Arc<TimedCache<String, usize, ManualClock>> =
        Arc::new(TimedCache::with_clock(10, None, clock.clone()));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("t{}-{}", t, i % 20);
                    cache.add(key.clone(), i);
                    cache.update(&key, i + 1);
                    let _ = cache.get(&key);
                    if i % 7 == 0 {
                        cache.remove(&key);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let keys = cache.keys();
    assert_eq!(keys.len(), cache.len());
    assert!(keys.len() <= 8 * 20);
    for key in &keys {
        assert!(cache.contains(key));
    }

    // Everything ages out together
    clock.advance(11);
    assert!(cache.is_empty());
}

#[test]
fn test_concurrent_adds_of_same_key_insert_once() {
    let cache: Arc<TimedCache<u32, usize>> = Arc::new(TimedCache::new(300));

    let inserted: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..16)
            .map(|t| {
                let cache = &cache;
                s.spawn(move || usize::from(cache.add(7, t)))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(inserted, 1);
    assert_eq!(cache.len(), 1);
}

// == Background Sweep ==

#[tokio::test]
async fn test_cleanup_task_fires_callbacks_without_traffic() {
    let (cache, clock, log) = logging_cache(1);
    let cache = Arc::new(cache);
    cache.add(1, "idle".to_string());

    let handle = spawn_cleanup_task(cache.clone(), Duration::from_millis(10));
    clock.advance(5);
    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.abort();

    assert_eq!(logged(&log), vec![(1, "idle".to_string())]);
}
