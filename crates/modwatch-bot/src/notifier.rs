//! Discord side effects for mute lifecycle events.

use anyhow::Context as _;
use async_trait::async_trait;
use modwatch_common::utils::format_timestamp;
use modwatch_common::UserId;
use modwatch_config::DiscordConfig;
use modwatch_tracker::{MuteNotifier, TrackedMute};
use serenity::all::{ChannelId, GuildId, Http, RoleId};
use std::sync::Arc;
use tracing::{debug, warn};

/// Applies and removes the muted role and posts a line to the log channel.
#[derive(Clone)]
pub struct DiscordNotifier {
    http: Arc<Http>,
    guild_id: GuildId,
    muted_role_id: RoleId,
    log_channel_id: Option<ChannelId>,
}

impl DiscordNotifier {
    /// Builds a notifier from the Discord settings.
    ///
    /// Returns `None` when the guild or the muted role is not configured.
    /// A zero log channel disables log lines.
    pub fn from_config(http: Arc<Http>, config: &DiscordConfig) -> Option<Self> {
        if config.guild_id.get() == 0 || config.muted_role_id.get() == 0 {
            return None;
        }

        Some(Self {
            http,
            guild_id: GuildId::new(config.guild_id.get()),
            muted_role_id: RoleId::new(config.muted_role_id.get()),
            log_channel_id: (config.log_channel_id.get() != 0)
                .then(|| ChannelId::new(config.log_channel_id.get())),
        })
    }

    fn member(user_id: UserId) -> anyhow::Result<serenity::all::UserId> {
        if user_id.get() == 0 {
            anyhow::bail!("member id 0 is not a valid Discord id");
        }
        Ok(serenity::all::UserId::new(user_id.get()))
    }

    /// Posts to the log channel. Failures are logged and swallowed.
    async fn log_line(&self, line: String) {
        let Some(channel) = self.log_channel_id else {
            debug!("No log channel configured, skipping: {}", line);
            return;
        };

        if let Err(e) = channel.say(&self.http, line).await {
            warn!("Failed to post to log channel {}: {}", channel, e);
        }
    }
}

#[async_trait]
impl MuteNotifier for DiscordNotifier {
    async fn on_mute_applied(&self, mute: &TrackedMute) -> anyhow::Result<()> {
        let member = Self::member(mute.user_id)?;
        self.http
            .add_member_role(
                self.guild_id,
                member,
                self.muted_role_id,
                Some(&mute.reason),
            )
            .await
            .with_context(|| format!("adding muted role to {}", mute.user_id))?;

        self.log_line(render_applied(mute)).await;
        Ok(())
    }

    async fn on_mute_expired(&self, user_id: UserId) -> anyhow::Result<()> {
        let member = Self::member(user_id)?;
        self.http
            .remove_member_role(self.guild_id, member, self.muted_role_id, Some("Mute expired"))
            .await
            .with_context(|| format!("removing muted role from {user_id}"))?;

        self.log_line(format!("🔊 <@{user_id}> mute expired")).await;
        Ok(())
    }

    async fn on_mute_released(
        &self,
        user_id: UserId,
        released_by: Option<UserId>,
    ) -> anyhow::Result<()> {
        let member = Self::member(user_id)?;
        self.http
            .remove_member_role(self.guild_id, member, self.muted_role_id, Some("Unmuted"))
            .await
            .with_context(|| format!("removing muted role from {user_id}"))?;

        self.log_line(render_released(user_id, released_by)).await;
        Ok(())
    }
}

/// Log line for a newly applied mute.
pub fn render_applied(mute: &TrackedMute) -> String {
    let mut line = format!(
        "🔇 <@{}> muted until {}",
        mute.user_id,
        format_timestamp(mute.expires_at)
    );
    if let Some(moderator) = mute.issued_by {
        line.push_str(&format!(" by <@{moderator}>"));
    }
    line.push_str(&format!(": {}", mute.reason));
    if let Some(proof) = &mute.proof {
        line.push_str(&format!(" ({proof})"));
    }
    line
}

/// Log line for a mute lifted by a moderator.
pub fn render_released(user_id: UserId, released_by: Option<UserId>) -> String {
    released_by.map_or_else(
        || format!("🔊 <@{user_id}> unmuted"),
        |moderator| format!("🔊 <@{user_id}> unmuted by <@{moderator}>"),
    )
}
