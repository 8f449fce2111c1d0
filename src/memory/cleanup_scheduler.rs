// src/memory/cleanup_scheduler.rs
//! Background expiry sweep for short-term memory (SQLite-backed).
//!
//! Runs on an interval independent of request traffic, deleting
//! exchanges whose expiration has passed. Sweep failures are logged and
//! never crash the host process; purge is idempotent, so a sweep that
//! was partially applied before shutdown is harmless.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::memory::core::traits::MemoryStore;

/// Spawn the background cleanup task.
///
/// `interval` is the time between sweeps (e.g., 24h). The first sweep
/// runs immediately. Cancelling `shutdown` stops scheduling new sweeps;
/// an in-flight sweep completes before the returned handle resolves, so
/// awaiting the handle after cancellation guarantees no orphaned work.
pub fn spawn_cleanup_scheduler(
    store: Arc<dyn MemoryStore>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Cleanup scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    run_cleanup_sweep(store.as_ref()).await;
                }
            }
        }
    })
}

/// One sweep. Logs the outcome and absorbs failures.
pub async fn run_cleanup_sweep(store: &dyn MemoryStore) {
    match store.purge_expired_short_term().await {
        Ok(removed) => info!("Cleanup sweep removed {} expired exchanges", removed),
        Err(err) => warn!("Cleanup sweep failed: {err:#}"),
    }
}
