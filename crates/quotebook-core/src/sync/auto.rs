//! Periodic sync timer

use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::engine::SyncEngine;
use crate::remote::RemoteSource;

/// Run `engine.sync_once()` every `period`, starting one period from now
///
/// Runs until the task is aborted. A sync that outlasts the period delays
/// the next tick rather than running concurrently with it.
pub(super) async fn auto_sync_loop<R: RemoteSource>(engine: SyncEngine<R>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        debug!("Auto-sync tick");
        // Failures are already reported through the event channel
        if let Err(e) = engine.sync_once().await {
            debug!("Auto-sync attempt failed: {}", e);
        }
    }
}
