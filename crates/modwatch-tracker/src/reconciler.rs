//! Periodic reconciliation loop.

use crate::settings::TrackingSettings;
use crate::store::ReconcileReport;
use crate::tracker::Tracker;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Drives [`Tracker`] reconciliation on a fixed interval.
#[derive(Debug, Clone)]
pub struct Reconciler {
    tracker: Tracker,
    settings: TrackingSettings,
}

impl Reconciler {
    /// Creates a reconciler for `tracker`.
    pub const fn new(tracker: Tracker, settings: TrackingSettings) -> Self {
        Self { tracker, settings }
    }

    /// Runs one pass now and delivers expiry notifications.
    ///
    /// State is committed before the first notification. A member muted
    /// again before their expiry is reported gets no expiry notification.
    /// A failing notification is logged and the remaining ones are still sent.
    pub async fn tick(&self) -> ReconcileReport {
        let report = self.tracker.reconcile(self.settings.inactivity_delta());

        if !report.is_quiet() {
            debug!(
                expired = report.expired.len(),
                deactivated = report.deactivated.len(),
                rollovers = report.rollovers.len(),
                accrued_seconds = report.accrued_seconds,
                "Reconciliation pass applied"
            );
        }

        for mute in &report.expired {
            info!("Mute for {} expired", mute.user_id);
            if let Err(e) = self.tracker.notify_expired(mute.user_id).await {
                warn!("Failed to lift expired mute for {}: {:#}", mute.user_id, e);
            }
        }

        report
    }

    /// Ticks until `shutdown` fires. A tick already in progress is finished first.
    pub async fn run(self, shutdown: CancellationToken) {
        let period = self.settings.tick_interval.max(Duration::from_millis(1));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Reconciliation loop started with interval {:?}", period);

        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }

        info!("Reconciliation loop stopped");
    }
}
