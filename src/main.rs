//! Timed Cache demo
//!
//! Fills a cache at two-second intervals, lets part of it expire and logs
//! what survives.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::DateTime;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timed_cache::{spawn_cleanup_task, Config, EvictCallback, TimedCache};

/// Main entry point for the Timed Cache demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Optionally start the background expiry sweep
/// 4. Add four entries two seconds apart, wait, read one back
/// 5. Sweep expired entries and log the survivors and statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timed_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: duration={}s, cleanup_interval={}s",
        config.duration, config.cleanup_interval
    );

    let on_evict: EvictCallback<u32, &'static str> =
        Box::new(|key: &u32, value: &&'static str| info!(key, value, "Entry evicted"));
    let cache = Arc::new(TimedCache::from_config(&config, Some(on_evict)));

    let cleanup_handle = config.cleanup_enabled().then(|| {
        spawn_cleanup_task(cache.clone(), Duration::from_secs(config.cleanup_interval))
    });

    let step = Duration::from_secs(2);
    for (i, (key, value)) in [(1, "a"), (2, "b"), (3, "c"), (4, "d")].into_iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(step).await;
        }
        cache.add(key, value);
    }

    tokio::time::sleep(2 * step).await;
    if cache.get(&3).is_none() {
        warn!("Key 3 already expired");
    }
    let removed = cache.purge_expired();
    info!("Purged {} expired entries", removed);

    for entry in cache.entries() {
        let touched = DateTime::from_timestamp(entry.last_touch, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| entry.last_touch.to_string());
        info!("tm: {}, key: {}, value: {}", touched, entry.key, entry.value);
    }

    let stats = serde_json::to_string(&cache.stats())?;
    info!("Cache stats: {}", stats);

    if let Some(handle) = cleanup_handle {
        handle.abort();
    }
    Ok(())
}
