//! Tracked entity records: active mutes and per-member presence counters.

use crate::period::Period;
use chrono::{DateTime, TimeDelta, Utc};
use modwatch_common::UserId;
use serde::{Deserialize, Serialize};

/// One active mute.
///
/// Present in the store if and only if the member is currently muted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedMute {
    /// Muted member.
    pub user_id: UserId,
    /// Instant from which the mute no longer applies.
    pub expires_at: DateTime<Utc>,
    /// Moderator-supplied reason.
    pub reason: String,
    /// Optional evidence, usually a message link or attachment URL.
    #[serde(default)]
    pub proof: Option<String>,
    /// When the mute was applied.
    pub issued_at: DateTime<Utc>,
    /// Moderator who applied it, when known.
    #[serde(default)]
    pub issued_by: Option<UserId>,
}

impl TrackedMute {
    /// Whether the mute has lapsed at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Time left before expiry, never negative.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> TimeDelta {
        (self.expires_at - now).max(TimeDelta::zero())
    }
}

/// Cumulative activity accounting for one member. Never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// Tracked member.
    pub user_id: UserId,
    /// Whether the member is currently counted as present.
    pub is_active: bool,
    /// Last observed activity. Always set while `is_active`.
    #[serde(default)]
    pub last_activity_at: Option<DateTime<Utc>>,
    /// Last instant elapsed time was folded into the counters.
    #[serde(default)]
    pub last_accrual_at: Option<DateTime<Utc>>,
    /// Lifetime active seconds.
    #[serde(default)]
    pub total_seconds: u64,
    /// Active seconds since the last daily reset.
    #[serde(default)]
    pub daily_seconds: u64,
    /// Active seconds since the last weekly reset.
    #[serde(default)]
    pub weekly_seconds: u64,
    /// Active seconds since the last monthly reset.
    #[serde(default)]
    pub monthly_seconds: u64,
    /// Anchor of the daily counter.
    #[serde(default)]
    pub last_daily_reset: Option<DateTime<Utc>>,
    /// Anchor of the weekly counter.
    #[serde(default)]
    pub last_weekly_reset: Option<DateTime<Utc>>,
    /// Anchor of the monthly counter.
    #[serde(default)]
    pub last_monthly_reset: Option<DateTime<Utc>>,
}

impl PresenceRecord {
    /// A fresh record for a member first seen at `at`.
    pub const fn new(user_id: UserId, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            is_active: true,
            last_activity_at: Some(at),
            last_accrual_at: None,
            total_seconds: 0,
            daily_seconds: 0,
            weekly_seconds: 0,
            monthly_seconds: 0,
            last_daily_reset: None,
            last_weekly_reset: None,
            last_monthly_reset: None,
        }
    }

    /// Records activity at `at`.
    pub fn touch(&mut self, at: DateTime<Utc>) {
        self.is_active = true;
        self.last_activity_at = Some(at);
    }

    /// Counter value for `period`.
    pub const fn seconds_for(&self, period: Period) -> u64 {
        match period {
            Period::Daily => self.daily_seconds,
            Period::Weekly => self.weekly_seconds,
            Period::Monthly => self.monthly_seconds,
        }
    }

    /// Reset anchor for `period`.
    pub const fn anchor(&self, period: Period) -> Option<DateTime<Utc>> {
        match period {
            Period::Daily => self.last_daily_reset,
            Period::Weekly => self.last_weekly_reset,
            Period::Monthly => self.last_monthly_reset,
        }
    }

    /// Zeroes the counter for `period` and re-anchors it at `now`.
    pub(crate) fn roll_over(&mut self, period: Period, now: DateTime<Utc>) {
        let (counter, anchor) = match period {
            Period::Daily => (&mut self.daily_seconds, &mut self.last_daily_reset),
            Period::Weekly => (&mut self.weekly_seconds, &mut self.last_weekly_reset),
            Period::Monthly => (&mut self.monthly_seconds, &mut self.last_monthly_reset),
        };
        *counter = 0;
        *anchor = Some(now);
    }

    /// Flips the record inactive once silence exceeds `threshold`.
    ///
    /// Returns whether the record changed. A record claiming to be active
    /// without any activity instant is treated as silent.
    pub(crate) fn expire_if_silent(&mut self, now: DateTime<Utc>, threshold: TimeDelta) -> bool {
        if !self.is_active {
            return false;
        }

        let silent = self
            .last_activity_at
            .map_or(true, |last| now - last > threshold);
        if silent {
            self.is_active = false;
        }
        silent
    }

    /// Folds active time since the later of the last accrual and the last
    /// activity into every counter. Returns the whole seconds added.
    pub(crate) fn accrue(&mut self, now: DateTime<Utc>, threshold: TimeDelta) -> u64 {
        if !self.is_active {
            return 0;
        }
        let Some(last_activity) = self.last_activity_at else {
            return 0;
        };
        if now - last_activity > threshold {
            return 0;
        }

        let since = self
            .last_accrual_at
            .map_or(last_activity, |accrued| accrued.max(last_activity));
        let elapsed = u64::try_from((now - since).num_seconds()).unwrap_or(0);

        self.total_seconds = self.total_seconds.saturating_add(elapsed);
        self.daily_seconds = self.daily_seconds.saturating_add(elapsed);
        self.weekly_seconds = self.weekly_seconds.saturating_add(elapsed);
        self.monthly_seconds = self.monthly_seconds.saturating_add(elapsed);

        // A clock that stepped backwards must not reopen an already counted span.
        self.last_accrual_at = Some(self.last_accrual_at.map_or(now, |accrued| accrued.max(now)));
        elapsed
    }
}
