//! Shared utility functions with zero-cost abstractions.

use chrono::{DateTime, Utc};

/// Mute length applied when a moderator's duration cannot be understood.
pub const DEFAULT_MUTE_SECONDS: u64 = 60;

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Parses a moderator-entered duration such as `30s`, `5m`, `2h` or `1d`.
///
/// Anything that is missing, empty, unparsable, zero, or too large to
/// represent falls back to [`DEFAULT_MUTE_SECONDS`]. This never fails.
pub fn parse_mute_duration(input: Option<&str>) -> u64 {
    input
        .and_then(parse_suffixed_seconds)
        .filter(|seconds| *seconds > 0)
        .unwrap_or(DEFAULT_MUTE_SECONDS)
}

fn parse_suffixed_seconds(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let unit = trimmed.chars().last()?;
    let amount = &trimmed[..trimmed.len() - unit.len_utf8()];

    let multiplier = match unit.to_ascii_lowercase() {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        'd' => 24 * 60 * 60,
        _ => return None,
    };

    // `u64::from_str` accepts a leading '+', which a moderator never means.
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    amount.parse::<u64>().ok()?.checked_mul(multiplier)
}

/// Formats a number of seconds as a compact human-readable span, e.g. `1h 2m 5s`.
pub fn format_duration_secs(total: u64) -> String {
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let parts: Vec<String> = [(days, "d"), (hours, "h"), (minutes, "m")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .chain((seconds > 0 || total < 60).then(|| format!("{seconds}s")))
        .collect();

    parts.join(" ")
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let formatted = format_timestamp(timestamp);
        assert_eq!(formatted, "2024-01-01 12:00:00 UTC");
    }

    #[test]
    fn test_parse_mute_duration_units() {
        assert_eq!(parse_mute_duration(Some("30s")), 30);
        assert_eq!(parse_mute_duration(Some("5m")), 300);
        assert_eq!(parse_mute_duration(Some("2h")), 7200);
        assert_eq!(parse_mute_duration(Some("1d")), 86400);
    }

    #[test]
    fn test_parse_mute_duration_falls_back() {
        assert_eq!(parse_mute_duration(None), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("soon")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("10")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("m")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("0s")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("-5m")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("+5m")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("1.5h")), DEFAULT_MUTE_SECONDS);
        assert_eq!(parse_mute_duration(Some("5ä")), DEFAULT_MUTE_SECONDS);
    }

    #[test]
    fn test_parse_mute_duration_is_lenient_about_case_and_whitespace() {
        assert_eq!(parse_mute_duration(Some(" 10M ")), 600);
        assert_eq!(parse_mute_duration(Some("3D")), 259_200);
    }

    #[test]
    fn test_parse_mute_duration_overflow() {
        assert_eq!(
            parse_mute_duration(Some("99999999999999999999d")),
            DEFAULT_MUTE_SECONDS
        );
        assert_eq!(
            parse_mute_duration(Some(&format!("{}d", u64::MAX / 10))),
            DEFAULT_MUTE_SECONDS
        );
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration_secs(0), "0s");
        assert_eq!(format_duration_secs(45), "45s");
        assert_eq!(format_duration_secs(60), "1m");
        assert_eq!(format_duration_secs(3_725), "1h 2m 5s");
        assert_eq!(format_duration_secs(90_000), "1d 1h");
    }

    #[test]
    fn test_truncate_string() {
        let input = "This is a very long string that should be truncated";
        let truncated = truncate_string(input, 20);
        assert_eq!(truncated, "This is a very lo...");

        let short = "Short";
        let not_truncated = truncate_string(short, 20);
        assert_eq!(not_truncated, "Short");

        assert_eq!(truncate_string("ääääää", 5), "ää...");
    }
}
