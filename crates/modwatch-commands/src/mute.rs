//! Timed mute command.

use crate::framework::{member_id, Context, Error};
use modwatch_common::utils::{format_duration_secs, format_timestamp, truncate_string};
use modwatch_tracker::TrackedMute;
use poise::serenity_prelude as serenity;
use tracing::info;

/// Reason recorded when the moderator leaves it blank.
pub const DEFAULT_REASON: &str = "No reason provided";

/// Discord rejects audit log reasons longer than this.
pub const MAX_REASON_CHARS: usize = 512;

/// Mutes a member for a limited time.
#[poise::command(
    slash_command,
    guild_only,
    default_member_permissions = "MODERATE_MEMBERS"
)]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "Member to mute"] user: serenity::User,
    #[description = "How long, e.g. 30s, 5m, 2h or 1d (default 1m)"] duration: Option<String>,
    #[description = "Why the member is muted"] reason: Option<String>,
    #[description = "Link to the offending message or other evidence"] proof: Option<String>,
) -> Result<(), Error> {
    let reason = reason
        .map(|r| truncate_string(r.trim(), MAX_REASON_CHARS))
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REASON.to_string());

    let mute = ctx
        .data()
        .tracker
        .begin_mute(
            member_id(&user),
            duration.as_deref(),
            reason,
            proof,
            Some(member_id(ctx.author())),
        )
        .await;

    ctx.say(render_mute(&user.name, &mute)).await?;

    info!("Mute command executed by user {}", ctx.author().id);
    Ok(())
}

/// Builds the confirmation shown after a mute is applied.
pub fn render_mute(name: &str, mute: &TrackedMute) -> String {
    let seconds = u64::try_from((mute.expires_at - mute.issued_at).num_seconds()).unwrap_or(0);
    let mut response = format!(
        "🔇 Muted **{}** for {} (until {})\nReason: {}",
        name,
        format_duration_secs(seconds),
        format_timestamp(mute.expires_at),
        mute.reason
    );
    if let Some(proof) = &mute.proof {
        response.push_str("\nProof: ");
        response.push_str(proof);
    }
    response
}
