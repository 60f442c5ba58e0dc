//! Configuration schema definitions using serde.

use modwatch_common::{ChannelId, GuildId, LoggingConfig, RoleId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Modwatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Discord configuration.
    pub discord: DiscordConfig,
    /// Reconciliation loop configuration.
    pub tracking: TrackingConfig,
    /// State file configuration.
    pub storage: StorageConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Discord bot configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Discord bot token.
    pub token: String,
    /// Guild the bot moderates.
    pub guild_id: GuildId,
    /// Role granted while a member is muted.
    pub muted_role_id: RoleId,
    /// Channel that receives mute and unmute log lines.
    pub log_channel_id: ChannelId,
}

/// Reconciliation loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Seconds between reconciliation ticks.
    pub tick_interval_seconds: u64,
    /// Seconds of silence after which a member is considered inactive.
    pub inactivity_threshold_seconds: u64,
    /// Upper bound on how long shutdown waits for the loop and the final flush.
    pub shutdown_timeout_seconds: u64,
}

impl TrackingConfig {
    /// Tick interval as a [`Duration`].
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_seconds)
    }

    /// Inactivity threshold as a [`Duration`].
    pub const fn inactivity_threshold(&self) -> Duration {
        Duration::from_secs(self.inactivity_threshold_seconds)
    }

    /// Shutdown timeout as a [`Duration`].
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_seconds)
    }
}

/// State file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON file holding mutes and presence records.
    pub state_path: PathBuf,
}
