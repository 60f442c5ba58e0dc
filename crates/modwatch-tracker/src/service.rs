//! Startup and shutdown of the tracker's background tasks.

use crate::clock::Clock;
use crate::error::{TrackerError, TrackerResult};
use crate::persistence::SnapshotWriter;
use crate::ports::{MuteNotifier, SnapshotStore};
use crate::reconciler::Reconciler;
use crate::settings::TrackingSettings;
use crate::store::{StoreSnapshot, TemporalStore};
use crate::tracker::Tracker;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// A running tracker: the shared [`Tracker`] plus its reconciliation loop and
/// snapshot writer.
#[derive(Debug)]
pub struct TrackerService {
    tracker: Tracker,
    settings: TrackingSettings,
    reconciler_shutdown: CancellationToken,
    writer_shutdown: CancellationToken,
    reconciler: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl TrackerService {
    /// Loads saved state and spawns the background tasks.
    ///
    /// A corrupt state file is logged and replaced by an empty store. Any
    /// other load failure is returned.
    pub async fn start(
        settings: TrackingSettings,
        store: Arc<dyn SnapshotStore>,
        notifier: Arc<dyn MuteNotifier>,
        clock: Arc<dyn Clock>,
    ) -> TrackerResult<Self> {
        let snapshot = match store.load().await {
            Ok(snapshot) => snapshot,
            Err(e @ TrackerError::CorruptSnapshot { .. }) => {
                error!("{}; starting with empty state", e);
                StoreSnapshot::default()
            }
            Err(e) => return Err(e),
        };

        let tracker = Tracker::new(TemporalStore::from_snapshot(snapshot), notifier, clock);

        let writer_shutdown = CancellationToken::new();
        let writer = tokio::spawn(
            SnapshotWriter::new(tracker.clone(), store).run(writer_shutdown.clone()),
        );

        let reconciler_shutdown = CancellationToken::new();
        let reconciler = tokio::spawn(
            Reconciler::new(tracker.clone(), settings).run(reconciler_shutdown.clone()),
        );

        info!(
            "Tracker started with {} active mutes",
            tracker.active_mutes().len()
        );

        Ok(Self {
            tracker,
            settings,
            reconciler_shutdown,
            writer_shutdown,
            reconciler,
            writer,
        })
    }

    /// Handle for commands and event hooks.
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Stops the loop, waits for an in-flight tick, then flushes the final snapshot.
    ///
    /// Each task gets the configured shutdown timeout and is aborted if it
    /// overruns. The writer is always given its chance to flush, even when
    /// the loop had to be aborted.
    pub async fn shutdown(self) -> TrackerResult<()> {
        let limit = self.settings.shutdown_timeout;
        info!("Shutting down tracker");

        self.reconciler_shutdown.cancel();
        let loop_result = join_within("reconciliation loop", self.reconciler, limit).await;

        self.writer_shutdown.cancel();
        let writer_result = join_within("snapshot writer", self.writer, limit).await;

        loop_result?;
        writer_result?;
        info!("Tracker shutdown completed");
        Ok(())
    }
}

async fn join_within(
    task: &'static str,
    mut handle: JoinHandle<()>,
    limit: Duration,
) -> TrackerResult<()> {
    match timeout(limit, &mut handle).await {
        Ok(joined) => joined.map_err(TrackerError::from),
        Err(_) => {
            warn!("{} did not stop within {:?}, aborting", task, limit);
            handle.abort();
            Err(TrackerError::ShutdownTimeout {
                task,
                timeout: limit,
            })
        }
    }
}
