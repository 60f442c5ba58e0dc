//! Default values for every configuration section.

use crate::schema::{DiscordConfig, StorageConfig, TrackingConfig};
use modwatch_common::{ChannelId, GuildId, RoleId};
use std::path::PathBuf;

/// Default seconds between reconciliation ticks.
pub const DEFAULT_TICK_INTERVAL_SECONDS: u64 = 10;

/// Default silence, in seconds, before a member is marked inactive.
pub const DEFAULT_INACTIVITY_THRESHOLD_SECONDS: u64 = 60;

/// Default shutdown grace period in seconds.
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECONDS: u64 = 30;

/// Default location of the state file.
pub const DEFAULT_STATE_PATH: &str = "data/state.json";

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            guild_id: GuildId(0),
            muted_role_id: RoleId(0),
            log_channel_id: ChannelId(0),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: DEFAULT_TICK_INTERVAL_SECONDS,
            inactivity_threshold_seconds: DEFAULT_INACTIVITY_THRESHOLD_SECONDS,
            shutdown_timeout_seconds: DEFAULT_SHUTDOWN_TIMEOUT_SECONDS,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }
}
