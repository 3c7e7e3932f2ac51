//! Timed Cache - A thread-safe in-memory key/value cache
//!
//! Entries expire a fixed number of seconds after they were last touched.
//! Expired entries are swept lazily at the start of every operation.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{
    CacheEntry, CacheStats, Clock, EvictCallback, ManualClock, SystemClock, TimedCache,
};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
