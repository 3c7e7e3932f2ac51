//! Cache Module
//!
//! Provides an in-memory cache with lazy time-based expiration.

mod clock;
mod entry;
mod recency;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{EvictCallback, TimedCache};
