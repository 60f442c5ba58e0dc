//! In-memory temporal entity store and the pure reconciliation pass.

use crate::period::Period;
use crate::record::{PresenceRecord, TrackedMute};
use chrono::{DateTime, TimeDelta, Utc};
use modwatch_common::UserId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Immutable copy of the store, in the shape written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Active mutes keyed by member.
    #[serde(default)]
    pub mutes: BTreeMap<UserId, TrackedMute>,
    /// Presence records keyed by member.
    #[serde(default)]
    pub presence: BTreeMap<UserId, PresenceRecord>,
}

impl StoreSnapshot {
    /// Whether the snapshot holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.mutes.is_empty() && self.presence.is_empty()
    }
}

/// What a single reconciliation pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Mutes removed because they lapsed.
    pub expired: Vec<TrackedMute>,
    /// Members flipped to inactive.
    pub deactivated: Vec<UserId>,
    /// Counters reset, per member and period.
    pub rollovers: Vec<(UserId, Period)>,
    /// Sum of seconds accrued across all members.
    pub accrued_seconds: u64,
}

impl ReconcileReport {
    /// Whether the pass changed nothing worth logging.
    pub fn is_quiet(&self) -> bool {
        self.expired.is_empty()
            && self.deactivated.is_empty()
            && self.rollovers.is_empty()
            && self.accrued_seconds == 0
    }
}

/// Two independent maps from member to mute and to presence record.
///
/// A member may appear in both. This type is not synchronized; the
/// [`Tracker`](crate::Tracker) wraps it in a single lock.
#[derive(Debug, Default)]
pub struct TemporalStore {
    mutes: HashMap<UserId, TrackedMute>,
    presence: HashMap<UserId, PresenceRecord>,
}

impl TemporalStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a persisted snapshot.
    ///
    /// Entries whose embedded id disagrees with their key are re-keyed by the
    /// embedded id.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            mutes: snapshot
                .mutes
                .into_values()
                .map(|mute| (mute.user_id, mute))
                .collect(),
            presence: snapshot
                .presence
                .into_values()
                .map(|record| (record.user_id, record))
                .collect(),
        }
    }

    /// Inserts or replaces the mute for its member. Returns the replaced mute.
    pub fn upsert_mute(&mut self, mute: TrackedMute) -> Option<TrackedMute> {
        self.mutes.insert(mute.user_id, mute)
    }

    /// Removes a member's mute. Idempotent; `Some` means a mute was removed.
    pub fn remove_mute(&mut self, user_id: UserId) -> Option<TrackedMute> {
        self.mutes.remove(&user_id)
    }

    /// Records activity for a member, creating the record on first sight.
    ///
    /// Returns `true` when a new record was created.
    pub fn record_activity(&mut self, user_id: UserId, at: DateTime<Utc>) -> bool {
        match self.presence.get_mut(&user_id) {
            Some(record) => {
                record.touch(at);
                false
            }
            None => {
                self.presence
                    .insert(user_id, PresenceRecord::new(user_id, at));
                true
            }
        }
    }

    /// The member's mute, if any.
    pub fn mute(&self, user_id: UserId) -> Option<&TrackedMute> {
        self.mutes.get(&user_id)
    }

    /// All active mutes, in no particular order.
    pub fn mutes(&self) -> impl Iterator<Item = &TrackedMute> {
        self.mutes.values()
    }

    /// The member's presence record, if any.
    pub fn presence(&self, user_id: UserId) -> Option<&PresenceRecord> {
        self.presence.get(&user_id)
    }

    /// Number of active mutes.
    pub fn mute_count(&self) -> usize {
        self.mutes.len()
    }

    /// Number of presence records.
    pub fn presence_count(&self) -> usize {
        self.presence.len()
    }

    /// Copies both maps for persistence.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            mutes: self
                .mutes
                .iter()
                .map(|(id, mute)| (*id, mute.clone()))
                .collect(),
            presence: self
                .presence
                .iter()
                .map(|(id, record)| (*id, record.clone()))
                .collect(),
        }
    }

    /// Applies every time-based transition due at `now`.
    ///
    /// In order: lapsed mutes are removed, silent members go inactive,
    /// period counters roll over independently, and active members accrue
    /// time. Running it twice at the same instant changes nothing the second
    /// time.
    pub fn reconcile(&mut self, now: DateTime<Utc>, inactivity_threshold: TimeDelta) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let mut lapsed: Vec<UserId> = self
            .mutes
            .values()
            .filter(|mute| mute.is_expired_at(now))
            .map(|mute| mute.user_id)
            .collect();
        lapsed.sort_unstable();
        report.expired = lapsed
            .into_iter()
            .filter_map(|user_id| self.remove_mute(user_id))
            .collect();

        for record in self.presence.values_mut() {
            if record.expire_if_silent(now, inactivity_threshold) {
                report.deactivated.push(record.user_id);
            }
        }

        for record in self.presence.values_mut() {
            for period in Period::ALL {
                if period.is_due(record.anchor(period), now) {
                    record.roll_over(period, now);
                    report.rollovers.push((record.user_id, period));
                }
            }
        }

        for record in self.presence.values_mut() {
            report.accrued_seconds = report
                .accrued_seconds
                .saturating_add(record.accrue(now, inactivity_threshold));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modwatch_common::test_utils::mock_timestamp;

    const U1: UserId = UserId(1);
    const U2: UserId = UserId(2);

    fn threshold() -> TimeDelta {
        TimeDelta::seconds(60)
    }

    fn mute(user_id: UserId, issued_at: DateTime<Utc>, seconds: i64) -> TrackedMute {
        TrackedMute {
            user_id,
            expires_at: issued_at + TimeDelta::seconds(seconds),
            reason: "test".to_string(),
            proof: None,
            issued_at,
            issued_by: None,
        }
    }

    fn seeded_store(at: DateTime<Utc>) -> TemporalStore {
        let mut store = TemporalStore::new();
        store.record_activity(U1, at);
        // Seed the period anchors so later ticks only roll what is due.
        store.reconcile(at, threshold());
        store
    }

    #[test]
    fn test_upsert_is_last_writer_wins() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();

        assert!(store.upsert_mute(mute(U1, t0, 10)).is_none());
        let replaced = store.upsert_mute(mute(U1, t0, 25)).unwrap();

        assert_eq!(replaced.expires_at, t0 + TimeDelta::seconds(10));
        assert_eq!(store.mute(U1).unwrap().expires_at, t0 + TimeDelta::seconds(25));
        assert_eq!(store.mute_count(), 1);
    }

    #[test]
    fn test_remove_mute_is_idempotent() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.upsert_mute(mute(U1, t0, 10));

        assert!(store.remove_mute(U1).is_some());
        assert!(store.remove_mute(U1).is_none());
        assert!(store.remove_mute(U2).is_none());
    }

    #[test]
    fn test_record_activity_creates_then_refreshes() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();

        assert!(store.record_activity(U1, t0));
        store.presence.get_mut(&U1).unwrap().is_active = false;

        let later = t0 + TimeDelta::seconds(120);
        assert!(!store.record_activity(U1, later));

        let record = store.presence(U1).unwrap();
        assert!(record.is_active);
        assert_eq!(record.last_activity_at, Some(later));
        assert_eq!(store.presence_count(), 1);
    }

    #[test]
    fn test_mute_survives_tick_before_expiry() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.upsert_mute(mute(U1, t0, 30));

        let report = store.reconcile(t0 + TimeDelta::seconds(29), threshold());
        assert!(report.expired.is_empty());
        assert!(store.mute(U1).is_some());
    }

    #[test]
    fn test_mute_expires_at_boundary_once() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.upsert_mute(mute(U1, t0, 30));
        store.upsert_mute(mute(U2, t0, 300));

        let report = store.reconcile(t0 + TimeDelta::seconds(30), threshold());
        assert_eq!(report.expired.len(), 1);
        assert_eq!(report.expired[0].user_id, U1);
        assert!(store.mute(U1).is_none());
        assert!(store.mute(U2).is_some());

        let again = store.reconcile(t0 + TimeDelta::seconds(40), threshold());
        assert!(again.expired.is_empty());
    }

    #[test]
    fn test_tick_within_threshold_accrues_into_all_counters() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.record_activity(U1, t0);

        let report = store.reconcile(t0 + TimeDelta::milliseconds(42_700), threshold());
        let record = store.presence(U1).unwrap();

        assert_eq!(report.accrued_seconds, 42);
        assert_eq!(record.total_seconds, 42);
        assert_eq!(record.daily_seconds, 42);
        assert_eq!(record.weekly_seconds, 42);
        assert_eq!(record.monthly_seconds, 42);
        assert!(record.is_active);
    }

    #[test]
    fn test_tick_past_threshold_deactivates_without_accrual() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.record_activity(U1, t0);

        let report = store.reconcile(t0 + TimeDelta::seconds(61), threshold());
        let record = store.presence(U1).unwrap();

        assert_eq!(report.deactivated, vec![U1]);
        assert_eq!(report.accrued_seconds, 0);
        assert!(!record.is_active);
        assert_eq!(record.total_seconds, 0);
        assert_eq!(record.last_activity_at, Some(t0));
    }

    #[test]
    fn test_exactly_at_threshold_still_accrues() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.record_activity(U1, t0);

        store.reconcile(t0 + TimeDelta::seconds(60), threshold());
        let record = store.presence(U1).unwrap();
        assert!(record.is_active);
        assert_eq!(record.total_seconds, 60);
    }

    #[test]
    fn test_periodic_ticks_accrue_each_interval_once() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.record_activity(U1, t0);

        for step in 1..=6 {
            store.reconcile(t0 + TimeDelta::seconds(step * 10), threshold());
        }
        assert_eq!(store.presence(U1).unwrap().total_seconds, 60);

        // Silence beyond the threshold stops the clock.
        store.reconcile(t0 + TimeDelta::seconds(70), threshold());
        let record = store.presence(U1).unwrap();
        assert!(!record.is_active);
        assert_eq!(record.total_seconds, 60);
    }

    #[test]
    fn test_daily_rollover_leaves_weekly_and_monthly_alone() {
        let t0 = mock_timestamp(2024, 5, 6, 10, 0, 0);
        let mut store = seeded_store(t0);
        store.reconcile(t0 + TimeDelta::seconds(30), threshold());

        let before = store.presence(U1).unwrap().clone();
        assert_eq!(before.daily_seconds, 30);

        // Exactly one day later is not yet a new day.
        let boundary = t0 + TimeDelta::days(1);
        store.record_activity(U1, boundary);
        assert!(store.reconcile(boundary, threshold()).rollovers.is_empty());
        assert_eq!(store.presence(U1).unwrap().daily_seconds, 30);

        let next_day = boundary + TimeDelta::seconds(1);
        store.record_activity(U1, next_day);
        let report = store.reconcile(next_day, threshold());
        let after = store.presence(U1).unwrap();

        assert_eq!(report.rollovers, vec![(U1, Period::Daily)]);
        assert_eq!(after.daily_seconds, 0);
        assert_eq!(after.last_daily_reset, Some(next_day));
        assert_eq!(after.weekly_seconds, before.weekly_seconds);
        assert_eq!(after.monthly_seconds, before.monthly_seconds);
        assert_eq!(after.last_weekly_reset, before.last_weekly_reset);
        assert_eq!(after.last_monthly_reset, before.last_monthly_reset);
        assert_eq!(after.total_seconds, 30);
    }

    #[test]
    fn test_month_end_rolls_daily_and_monthly_together() {
        let t0 = mock_timestamp(2024, 5, 30, 23, 0, 0);
        let mut store = seeded_store(t0);

        let june = mock_timestamp(2024, 6, 1, 0, 0, 0);
        let report = store.reconcile(june, threshold());

        assert_eq!(
            report.rollovers,
            vec![(U1, Period::Daily), (U1, Period::Monthly)]
        );
        let record = store.presence(U1).unwrap();
        assert_eq!(record.last_weekly_reset, Some(t0));
    }

    #[test]
    fn test_rollover_happens_before_accrual() {
        let t0 = mock_timestamp(2024, 5, 6, 23, 59, 30);
        let mut store = seeded_store(t0);
        store.reconcile(t0 + TimeDelta::seconds(20), threshold());

        // Fake a stale anchor so the next tick crosses the daily boundary.
        store.presence.get_mut(&U1).unwrap().last_daily_reset = Some(t0 - TimeDelta::days(1));
        store.reconcile(t0 + TimeDelta::seconds(30), threshold());

        let record = store.presence(U1).unwrap();
        assert_eq!(record.daily_seconds, 10);
        assert_eq!(record.total_seconds, 30);
    }

    #[test]
    fn test_second_pass_at_same_instant_is_a_noop() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.record_activity(U1, t0);
        store.record_activity(U2, t0 - TimeDelta::seconds(600));
        store.upsert_mute(mute(U1, t0, 5));

        let now = t0 + TimeDelta::seconds(10);
        let first = store.reconcile(now, threshold());
        assert!(!first.is_quiet());
        let after_first = store.snapshot();

        let second = store.reconcile(now, threshold());
        assert!(second.is_quiet());
        assert_eq!(store.snapshot(), after_first);
    }

    #[test]
    fn test_snapshot_round_trips_through_from_snapshot() {
        let t0 = mock_timestamp(2024, 1, 1, 0, 0, 0);
        let mut store = TemporalStore::new();
        store.record_activity(U2, t0);
        store.upsert_mute(mute(U1, t0, 60));

        let snapshot = store.snapshot();
        let rebuilt = TemporalStore::from_snapshot(snapshot.clone());
        assert_eq!(rebuilt.snapshot(), snapshot);
        assert!(!snapshot.is_empty());
    }
}
