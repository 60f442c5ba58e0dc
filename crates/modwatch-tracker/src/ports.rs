//! Boundaries between the tracker and its collaborators.
//!
//! [`MuteNotifier`] is implemented by the platform layer and is called after
//! a state change has been committed. [`SnapshotStore`] is the durable
//! backing for the store.

use crate::error::TrackerResult;
use crate::record::TrackedMute;
use crate::store::StoreSnapshot;
use async_trait::async_trait;
use modwatch_common::UserId;
use tracing::debug;

/// Receives mute lifecycle events.
///
/// Errors are logged by the caller and never undo the state change that
/// produced the event.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MuteNotifier: Send + Sync {
    /// A mute was applied or replaced.
    async fn on_mute_applied(&self, mute: &TrackedMute) -> anyhow::Result<()>;

    /// A mute lapsed and was removed by the reconciliation loop.
    async fn on_mute_expired(&self, user_id: UserId) -> anyhow::Result<()>;

    /// A moderator lifted a mute before it lapsed.
    async fn on_mute_released(
        &self,
        user_id: UserId,
        released_by: Option<UserId>,
    ) -> anyhow::Result<()> {
        let _ = released_by;
        self.on_mute_expired(user_id).await
    }
}

/// A notifier that only logs. Used when no platform connection is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl MuteNotifier for NoopNotifier {
    async fn on_mute_applied(&self, mute: &TrackedMute) -> anyhow::Result<()> {
        debug!("Mute applied to {} until {}", mute.user_id, mute.expires_at);
        Ok(())
    }

    async fn on_mute_expired(&self, user_id: UserId) -> anyhow::Result<()> {
        debug!("Mute expired for {}", user_id);
        Ok(())
    }
}

/// Durable storage for store snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Loads the last saved snapshot. A store that was never written yields an empty snapshot.
    async fn load(&self) -> TrackerResult<StoreSnapshot>;

    /// Replaces the saved snapshot.
    async fn save(&self, snapshot: &StoreSnapshot) -> TrackerResult<()>;
}
