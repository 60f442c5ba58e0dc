//! Early release of a mute.

use crate::framework::{member_id, Context, Error};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Lifts a member's mute before it expires.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "Member to unmute"] user: serenity::User,
) -> Result<(), Error> {
    let released = ctx
        .data()
        .tracker
        .end_mute(member_id(&user), Some(member_id(ctx.author())))
        .await;

    ctx.say(render_unmute(&user.name, released)).await?;

    info!("Unmute command executed by user {}", ctx.author().id);
    Ok(())
}

/// Builds the reply for an unmute request.
pub fn render_unmute(name: &str, released: bool) -> String {
    if released {
        format!("🔊 Unmuted **{name}**")
    } else {
        format!("**{name}** is not muted")
    }
}
