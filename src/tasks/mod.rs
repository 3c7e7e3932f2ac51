//! Background Tasks Module
//!
//! Optional tasks a caller may run alongside a cache.
//!
//! # Tasks
//! - Expiry sweep: Calls `purge_expired` at a fixed interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
