//! Config subcommands with Poise's built-in subcommand support.

use crate::framework::{Context, Error};
use modwatch_common::utils::format_duration_secs;
use modwatch_config::Config;
use tracing::info;

/// Configuration commands.
#[poise::command(
    slash_command,
    subcommands("view"),
    default_member_permissions = "MANAGE_GUILD"
)]
pub async fn config(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

/// Shows the active tracking and storage settings.
#[poise::command(slash_command, ephemeral)]
pub async fn view(ctx: Context<'_>) -> Result<(), Error> {
    let config = ctx.data().config.get();
    ctx.say(render_config(&config)).await?;

    info!("Config view executed by user {}", ctx.author().id);
    Ok(())
}

/// Summarises the non-secret parts of the configuration.
pub fn render_config(config: &Config) -> String {
    format!(
        "⚙️ **Modwatch configuration**\n\
        Tick interval: {}\n\
        Inactivity threshold: {}\n\
        Shutdown timeout: {}\n\
        Muted role: <@&{}>\n\
        Log channel: <#{}>\n\
        State file: `{}`",
        format_duration_secs(config.tracking.tick_interval_seconds),
        format_duration_secs(config.tracking.inactivity_threshold_seconds),
        format_duration_secs(config.tracking.shutdown_timeout_seconds),
        config.discord.muted_role_id,
        config.discord.log_channel_id,
        config.storage.state_path.display(),
    )
}
