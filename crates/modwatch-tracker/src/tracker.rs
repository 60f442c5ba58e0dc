//! The mutation port: the only way callers change tracked state.

use crate::clock::Clock;
use crate::ports::MuteNotifier;
use crate::record::{PresenceRecord, TrackedMute};
use crate::store::{ReconcileReport, StoreSnapshot, TemporalStore};
use chrono::{DateTime, TimeDelta, Utc};
use modwatch_common::utils::{parse_mute_duration, DEFAULT_MUTE_SECONDS};
use modwatch_common::UserId;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tracing::{debug, info, warn};

/// Shared handle to the tracked state.
///
/// Cheap to clone. Every mutation takes the store lock, applies the change,
/// bumps the revision watched by the
/// [`SnapshotWriter`](crate::SnapshotWriter) and releases the lock before
/// any notification is awaited.
///
/// Notifications go through a single FIFO lane in the order their mutations
/// were committed, so the last platform effect for a member always matches
/// the stored state.
#[derive(Clone)]
pub struct Tracker {
    inner: Arc<TrackerInner>,
}

struct TrackerInner {
    store: Mutex<TemporalStore>,
    notifier: Arc<dyn MuteNotifier>,
    clock: Arc<dyn Clock>,
    revision: watch::Sender<u64>,
    notify_lane: AsyncMutex<()>,
}

impl fmt::Debug for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let store = self.inner.store.lock();
        f.debug_struct("Tracker")
            .field("mutes", &store.mute_count())
            .field("presence", &store.presence_count())
            .field("revision", &*self.inner.revision.borrow())
            .field("clock", &self.inner.clock)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    /// Wraps `store`, reporting mute changes to `notifier` and reading time from `clock`.
    pub fn new(
        store: TemporalStore,
        notifier: Arc<dyn MuteNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(TrackerInner {
                store: Mutex::new(store),
                notifier,
                clock,
                revision,
                notify_lane: AsyncMutex::new(()),
            }),
        }
    }

    /// Mutes `user_id` for a moderator-entered duration.
    ///
    /// The duration accepts `s`, `m`, `h` and `d` suffixes and falls back to
    /// one minute when it cannot be understood. An existing mute is replaced.
    /// The notifier is told after the state is committed; its failure is
    /// logged and the mute stays in place.
    pub async fn begin_mute(
        &self,
        user_id: UserId,
        duration: Option<&str>,
        reason: impl Into<String>,
        proof: Option<String>,
        issued_by: Option<UserId>,
    ) -> TrackedMute {
        let issued_at = self.inner.clock.now();
        let mute = TrackedMute {
            user_id,
            expires_at: expiry_after(issued_at, parse_mute_duration(duration)),
            reason: reason.into(),
            proof,
            issued_at,
            issued_by,
        };

        {
            let mut store = self.inner.store.lock();
            if let Some(previous) = store.upsert_mute(mute.clone()) {
                debug!(
                    "Replacing mute for {} that ran until {}",
                    user_id, previous.expires_at
                );
            }
            self.mark_dirty();
        }

        info!("Muted {} until {}", user_id, mute.expires_at);

        let _lane = self.inner.notify_lane.lock().await;
        if let Err(e) = self.inner.notifier.on_mute_applied(&mute).await {
            warn!("Failed to apply mute for {}: {:#}", user_id, e);
        }

        mute
    }

    /// Lifts a mute early. Returns whether one was active.
    ///
    /// Nothing is notified when the member was not muted.
    pub async fn end_mute(&self, user_id: UserId, released_by: Option<UserId>) -> bool {
        let removed = {
            let mut store = self.inner.store.lock();
            let removed = store.remove_mute(user_id);
            if removed.is_some() {
                self.mark_dirty();
            }
            removed
        };

        if removed.is_none() {
            debug!("Unmute requested for {} who is not muted", user_id);
            return false;
        }

        info!("Released mute for {}", user_id);

        let _lane = self.inner.notify_lane.lock().await;
        if let Err(e) = self
            .inner
            .notifier
            .on_mute_released(user_id, released_by)
            .await
        {
            warn!("Failed to lift mute for {}: {:#}", user_id, e);
        }

        true
    }

    /// Records that `user_id` was seen at `at`, creating their record on first sight.
    pub fn touch_activity(&self, user_id: UserId, at: DateTime<Utc>) {
        let mut store = self.inner.store.lock();
        if store.record_activity(user_id, at) {
            debug!("Started tracking activity for {}", user_id);
        }
        self.mark_dirty();
    }

    /// The active mute for `user_id`, if any.
    pub fn mute_status(&self, user_id: UserId) -> Option<TrackedMute> {
        self.inner.store.lock().mute(user_id).cloned()
    }

    /// The presence record for `user_id`, if they were ever seen.
    pub fn presence(&self, user_id: UserId) -> Option<PresenceRecord> {
        self.inner.store.lock().presence(user_id).cloned()
    }

    /// All active mutes, soonest expiry first.
    pub fn active_mutes(&self) -> Vec<TrackedMute> {
        let mut mutes: Vec<TrackedMute> = self.inner.store.lock().mutes().cloned().collect();
        mutes.sort_by_key(|mute| (mute.expires_at, mute.user_id));
        mutes
    }

    /// Copies the whole store.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.inner.store.lock().snapshot()
    }

    /// Current instant according to the tracker's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.clock.now()
    }

    /// Subscribes to the revision counter, which increases after every change.
    pub fn subscribe_revisions(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Runs one reconciliation pass at the clock's current instant.
    pub(crate) fn reconcile(&self, inactivity_threshold: TimeDelta) -> ReconcileReport {
        let now = self.inner.clock.now();
        let mut store = self.inner.store.lock();
        let report = store.reconcile(now, inactivity_threshold);
        self.mark_dirty();
        report
    }

    /// Reports a lapsed mute unless `user_id` has been muted again since.
    ///
    /// Returns whether the notifier was called.
    pub(crate) async fn notify_expired(&self, user_id: UserId) -> anyhow::Result<bool> {
        let _lane = self.inner.notify_lane.lock().await;
        if self.mute_status(user_id).is_some() {
            debug!("{} was muted again before expiry was reported", user_id);
            return Ok(false);
        }

        self.inner.notifier.on_mute_expired(user_id).await?;
        Ok(true)
    }

    fn mark_dirty(&self) {
        self.inner
            .revision
            .send_modify(|revision| *revision = revision.wrapping_add(1));
    }
}

fn expiry_after(issued_at: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    let expiry = i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| issued_at.checked_add_signed(delta));

    expiry.unwrap_or_else(|| {
        warn!(
            "Mute of {}s is out of range, using {}s",
            seconds, DEFAULT_MUTE_SECONDS
        );
        issued_at + TimeDelta::seconds(60)
    })
}
