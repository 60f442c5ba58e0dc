//! About command implementation using Poise's command macro.

use crate::framework::{Context, Error};
use tracing::info;

/// Shows information about the bot.
#[poise::command(slash_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(render_about()).await?;

    info!("About command executed by user {}", ctx.author().id);
    Ok(())
}

/// Static description of the bot and its version.
pub fn render_about() -> String {
    format!(
        "🛡️ **Modwatch**\n\
        Timed mutes and member activity tracking\n\
        🔧 Version: {}\n\
        ⚡ Built with Rust and Poise",
        env!("CARGO_PKG_VERSION")
    )
}
