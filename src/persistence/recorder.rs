//! Background task that appends every ledger event to the event log.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::PostgresPersistence;
use crate::domain::EventBus;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Spawns the recorder: drains `event_bus` into `persistence` and purges
/// rows older than `cleanup_after_days` once an hour (0 disables the
/// purge).
///
/// Write failures are logged and skipped; the in-memory ledger is
/// unaffected.
pub fn spawn_event_recorder(
    persistence: PostgresPersistence,
    event_bus: &EventBus,
    cleanup_after_days: u64,
) -> JoinHandle<()> {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        let mut cleanup = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Ok(event) => {
                        if let Err(e) = persistence.save_event(&event).await {
                            tracing::warn!(
                                event_type = event.event_type_str(),
                                error = %e,
                                "failed to record ledger event"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "event recorder lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = cleanup.tick(), if cleanup_after_days > 0 => {
                    match persistence.delete_old_events(cleanup_after_days).await {
                        Ok(0) => {}
                        Ok(n) => tracing::info!(deleted = n, "purged old ledger events"),
                        Err(e) => tracing::warn!(error = %e, "event log cleanup failed"),
                    }
                }
            }
        }
        tracing::debug!("event recorder stopped");
    })
}
