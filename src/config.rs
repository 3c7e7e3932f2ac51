//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::error::{CacheError, Result};

/// Default entry lifetime in seconds
pub const DEFAULT_DURATION: i64 = 4;

/// Default background sweep interval in seconds (0 = disabled)
pub const DEFAULT_CLEANUP_INTERVAL: u64 = 0;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seconds an entry may go untouched before it expires.
    /// Zero or negative values make every entry expire on the next sweep.
    pub duration: i64,
    /// Background sweep interval in seconds, 0 disables the task
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DURATION` - Entry lifetime in seconds (default: 4)
    /// - `CLEANUP_INTERVAL` - Background sweep frequency in seconds (default: 0, disabled)
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidConfig`] if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Returns true if a background sweep task should be started.
    pub fn cleanup_enabled(&self) -> bool {
        self.cleanup_interval > 0
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            duration: parse_var(&lookup, "CACHE_DURATION", DEFAULT_DURATION)?,
            cleanup_interval: parse_var(&lookup, "CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig { var, value: raw }),
    }
}
