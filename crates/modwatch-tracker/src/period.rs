//! Rolling accounting periods and their rollover rules.

use chrono::{DateTime, Datelike, TimeDelta, Utc};
use std::fmt;

/// A rolling window with its own counter and reset anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    /// Resets once more than a day has passed since the last reset.
    Daily,
    /// Resets once more than seven days have passed since the last reset.
    Weekly,
    /// Resets when the calendar month differs from the last reset's.
    Monthly,
}

impl Period {
    /// Every period, in the order rollovers are evaluated.
    pub const ALL: [Self; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    /// Whether a counter anchored at `anchor` must be reset at `now`.
    ///
    /// A missing anchor is always due, which seeds the anchor on the first tick.
    pub fn is_due(self, anchor: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let Some(anchor) = anchor else {
            return true;
        };

        match self {
            Self::Daily => now - anchor > TimeDelta::days(1),
            Self::Weekly => now - anchor > TimeDelta::days(7),
            // Year is part of the comparison so a reset exactly twelve months
            // later still counts as a new month.
            Self::Monthly => (now.year(), now.month()) != (anchor.year(), anchor.month()),
        }
    }

    /// Lowercase name used in logs and command output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modwatch_common::test_utils::mock_timestamp;

    #[test]
    fn test_unset_anchor_is_always_due() {
        let now = mock_timestamp(2024, 5, 10, 12, 0, 0);
        for period in Period::ALL {
            assert!(period.is_due(None, now), "{period} should seed its anchor");
        }
    }

    #[test]
    fn test_daily_boundary() {
        let anchor = mock_timestamp(2024, 5, 10, 12, 0, 0);
        assert!(!Period::Daily.is_due(Some(anchor), mock_timestamp(2024, 5, 11, 11, 59, 59)));
        assert!(!Period::Daily.is_due(Some(anchor), mock_timestamp(2024, 5, 11, 12, 0, 0)));
        assert!(Period::Daily.is_due(Some(anchor), mock_timestamp(2024, 5, 11, 12, 0, 1)));
    }

    #[test]
    fn test_weekly_boundary() {
        let anchor = mock_timestamp(2024, 5, 10, 12, 0, 0);
        assert!(!Period::Weekly.is_due(Some(anchor), mock_timestamp(2024, 5, 17, 11, 0, 0)));
        assert!(!Period::Weekly.is_due(Some(anchor), mock_timestamp(2024, 5, 17, 12, 0, 0)));
        assert!(Period::Weekly.is_due(Some(anchor), mock_timestamp(2024, 5, 17, 12, 0, 1)));
    }

    #[test]
    fn test_monthly_follows_calendar_not_elapsed_time() {
        let anchor = mock_timestamp(2024, 1, 31, 23, 0, 0);
        // Two hours later, but a new month.
        assert!(Period::Monthly.is_due(Some(anchor), mock_timestamp(2024, 2, 1, 1, 0, 0)));

        let anchor = mock_timestamp(2024, 3, 1, 0, 0, 0);
        // Thirty days later, same month.
        assert!(!Period::Monthly.is_due(Some(anchor), mock_timestamp(2024, 3, 31, 0, 0, 0)));
    }

    #[test]
    fn test_monthly_same_month_next_year_is_due() {
        let anchor = mock_timestamp(2023, 6, 15, 0, 0, 0);
        assert!(Period::Monthly.is_due(Some(anchor), mock_timestamp(2024, 6, 15, 0, 0, 0)));
    }
}
