//! Uptime command accessing framework data through Poise's context.

use crate::framework::{Context, Error};
use modwatch_common::utils::format_duration_secs;
use std::time::Duration;
use tracing::info;

/// Shows bot uptime and how many members are muted.
#[poise::command(slash_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let response = render_uptime(data.started_at.elapsed(), data.tracker.active_mutes().len());
    ctx.say(response).await?;

    info!("Uptime command executed by user {}", ctx.author().id);
    Ok(())
}

/// Builds the uptime reply.
pub fn render_uptime(uptime: Duration, active_mutes: usize) -> String {
    format!(
        "⏰ **Bot Uptime**\n\
        🕐 Uptime: {}\n\
        🔇 Active mutes: {}",
        format_duration_secs(uptime.as_secs()),
        active_mutes
    )
}
