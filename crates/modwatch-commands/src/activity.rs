//! Activity statistics for a member.

use crate::framework::{member_id, Context, Error};
use chrono::{DateTime, Utc};
use modwatch_common::utils::{format_duration_secs, format_timestamp};
use modwatch_tracker::{PresenceRecord, TrackedMute};
use poise::serenity_prelude as serenity;
use tracing::info;

/// Shows how long a member has been active, and whether they are muted.
#[poise::command(slash_command, guild_only)]
pub async fn activity(
    ctx: Context<'_>,
    #[description = "Member to look up (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let target = user.as_ref().unwrap_or_else(|| ctx.author());
    let tracker = &ctx.data().tracker;
    let id = member_id(target);

    let response = render_activity(
        &target.name,
        tracker.presence(id).as_ref(),
        tracker.mute_status(id).as_ref(),
        tracker.now(),
    );
    ctx.say(response).await?;

    info!("Activity command executed by user {}", ctx.author().id);
    Ok(())
}

/// Builds the activity summary for one member.
pub fn render_activity(
    name: &str,
    presence: Option<&PresenceRecord>,
    mute: Option<&TrackedMute>,
    now: DateTime<Utc>,
) -> String {
    let mut response = match presence {
        None => format!("📊 No activity recorded for **{name}** yet"),
        Some(record) => {
            let status = if record.is_active { "🟢 Active" } else { "⚪ Inactive" };
            let last_seen = record
                .last_activity_at
                .map_or_else(|| "never".to_string(), format_timestamp);
            format!(
                "📊 **Activity for {}**\n\
                {}\n\
                🕐 Last seen: {}\n\
                Today: {}\n\
                This week: {}\n\
                This month: {}\n\
                All time: {}",
                name,
                status,
                last_seen,
                format_duration_secs(record.daily_seconds),
                format_duration_secs(record.weekly_seconds),
                format_duration_secs(record.monthly_seconds),
                format_duration_secs(record.total_seconds),
            )
        }
    };

    if let Some(mute) = mute {
        let remaining = u64::try_from(mute.remaining_at(now).num_seconds()).unwrap_or(0);
        response.push_str(&format!(
            "\n🔇 Muted for another {} ({})",
            format_duration_secs(remaining),
            mute.reason
        ));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use modwatch_common::test_utils::mock_timestamp;
    use modwatch_common::UserId;

    #[test]
    fn test_render_unknown_member() {
        let now = mock_timestamp(2024, 6, 1, 12, 0, 0);
        assert_eq!(
            render_activity("carol", None, None, now),
            "📊 No activity recorded for **carol** yet"
        );
    }

    #[test]
    fn test_render_counters() {
        let now = mock_timestamp(2024, 6, 1, 12, 0, 0);
        let mut record = PresenceRecord::new(UserId(3), now);
        record.daily_seconds = 90;
        record.weekly_seconds = 3_600;
        record.monthly_seconds = 7_260;
        record.total_seconds = 90_000;

        let response = render_activity("carol", Some(&record), None, now);
        assert!(response.contains("🟢 Active"));
        assert!(response.contains("Last seen: 2024-06-01 12:00:00 UTC"));
        assert!(response.contains("Today: 1m 30s"));
        assert!(response.contains("This week: 1h"));
        assert!(response.contains("This month: 2h 1m"));
        assert!(response.contains("All time: 1d 1h"));
        assert!(!response.contains("Muted"));
    }

    #[test]
    fn test_render_includes_remaining_mute() {
        let now = mock_timestamp(2024, 6, 1, 12, 0, 0);
        let mute = TrackedMute {
            user_id: UserId(3),
            expires_at: now + TimeDelta::seconds(125),
            reason: "spam".to_string(),
            proof: None,
            issued_at: now - TimeDelta::seconds(5),
            issued_by: None,
        };

        let response = render_activity("carol", None, Some(&mute), now);
        assert!(response.ends_with("\n🔇 Muted for another 2m 5s (spam)"));
    }
}
