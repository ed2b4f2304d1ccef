//! Derived per-user statistics snapshot.
//!
//! A [`UserStatsSnapshot`] is rebuilt on demand from a
//! [`ProgressLedger`] plus a handful of collaborator-supplied inputs
//! (social counts, pain trend, journey start). It is a cache, never a
//! source of truth: discarding it and rebuilding from the raw event set
//! always yields the same snapshot.

use serde::{Deserialize, Serialize};

use crate::calendar::LocalDate;
use crate::harmony::{compute_harmony_score, HarmonyWeights};
use crate::progress::{Category, ProgressLedger};
use crate::streak::{compute_streak, CategoryStreak, StreakSummary};

/// Default trailing window, in days, for the consistency ratio.
pub const DEFAULT_CONSISTENCY_WINDOW_DAYS: u32 = 30;

/// Unique-routine counts per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueRoutineCounts {
    pub mind: u32,
    pub body: u32,
    pub soul: u32,
}

impl UniqueRoutineCounts {
    /// Count for one category.
    pub fn for_category(&self, category: Category) -> u32 {
        match category {
            Category::Mind => self.mind,
            Category::Body => self.body,
            Category::Soul => self.soul,
        }
    }
}

/// Everything the presentation layer and the milestone engine read about
/// one user, rebuilt from the progress ledger at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatsSnapshot {
    pub user_id: String,
    /// Calendar date (under the evaluating client's offset) the snapshot
    /// was built for; "today" for every streak in it
    pub evaluated_on: LocalDate,
    pub mind_streak: CategoryStreak,
    pub body_streak: CategoryStreak,
    pub soul_streak: CategoryStreak,
    /// Streak over days where all three categories were satisfied
    pub harmony_streak: StreakSummary,
    /// Composite balance score, 0..=100
    pub harmony_score: u8,
    /// Distinct completion events across all time
    pub total_routines: u32,
    pub unique_routines: UniqueRoutineCounts,
    pub last_activity_date: Option<LocalDate>,
    /// First day of the user's journey; defaults to the first activity
    /// date when the collaborator does not supply one
    pub journey_started_on: Option<LocalDate>,
    /// Accepted friend connections, supplied by the social collaborator
    pub friend_count: u32,
    /// Wellness circles joined, supplied by the social collaborator
    pub circle_count: u32,
    /// Days with an improving pain trend, supplied by the pain check-in
    /// collaborator
    pub pain_improvement_days: u32,
    /// Fraction of days in the trailing window with any completion,
    /// 0.0..=1.0
    pub consistency_ratio: f64,
}

impl UserStatsSnapshot {
    /// Streak for one category.
    pub fn streak_for(&self, category: Category) -> CategoryStreak {
        match category {
            Category::Mind => self.mind_streak,
            Category::Body => self.body_streak,
            Category::Soul => self.soul_streak,
        }
    }

    /// Whole days elapsed since the journey started, as of
    /// `evaluated_on`. Zero when the journey has not started.
    pub fn journey_days(&self) -> u32 {
        match self.journey_started_on {
            Some(start) => start.days_until(self.evaluated_on).max(0) as u32,
            None => 0,
        }
    }

    /// Friend connections plus circles joined.
    pub fn social_connections(&self) -> u32 {
        self.friend_count.saturating_add(self.circle_count)
    }
}

/// Builder deriving a [`UserStatsSnapshot`] from a ledger, with setters
/// for the fields only external collaborators know.
#[derive(Debug, Clone)]
pub struct StatsSnapshotBuilder<'a> {
    ledger: &'a ProgressLedger,
    weights: HarmonyWeights,
    consistency_window_days: u32,
    journey_started_on: Option<LocalDate>,
    friend_count: u32,
    circle_count: u32,
    pain_improvement_days: u32,
}

impl<'a> StatsSnapshotBuilder<'a> {
    pub fn new(ledger: &'a ProgressLedger) -> Self {
        Self {
            ledger,
            weights: HarmonyWeights::default(),
            consistency_window_days: DEFAULT_CONSISTENCY_WINDOW_DAYS,
            journey_started_on: None,
            friend_count: 0,
            circle_count: 0,
            pain_improvement_days: 0,
        }
    }

    pub fn with_weights(mut self, weights: HarmonyWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_consistency_window(mut self, days: u32) -> Self {
        self.consistency_window_days = days.max(1);
        self
    }

    pub fn with_journey_start(mut self, started_on: LocalDate) -> Self {
        self.journey_started_on = Some(started_on);
        self
    }

    pub fn with_friend_count(mut self, count: u32) -> Self {
        self.friend_count = count;
        self
    }

    pub fn with_circle_count(mut self, count: u32) -> Self {
        self.circle_count = count;
        self
    }

    pub fn with_pain_improvement_days(mut self, days: u32) -> Self {
        self.pain_improvement_days = days;
        self
    }

    /// Build the snapshot as of `today` (the evaluating client's current
    /// calendar date, resolved via [`crate::calendar::today`]).
    pub fn build(self, today: LocalDate) -> UserStatsSnapshot {
        let ledger = self.ledger;

        let streak_of = |category: Category| {
            CategoryStreak::new(category, compute_streak(&ledger.dates_with(category), today))
        };
        let mind_streak = streak_of(Category::Mind);
        let body_streak = streak_of(Category::Body);
        let soul_streak = streak_of(Category::Soul);
        let harmony_streak = compute_streak(&ledger.harmony_dates(), today);

        let harmony_score = compute_harmony_score(
            mind_streak.current,
            body_streak.current,
            soul_streak.current,
            &self.weights,
        );

        let window = self.consistency_window_days;
        let active = ledger.active_dates();
        let active_in_window = active
            .iter()
            .filter(|date| {
                let back = date.days_until(today);
                back >= 0 && back < window as i64
            })
            .count();
        let consistency_ratio = active_in_window as f64 / window as f64;

        UserStatsSnapshot {
            user_id: ledger.user_id().to_string(),
            evaluated_on: today,
            mind_streak,
            body_streak,
            soul_streak,
            harmony_streak,
            harmony_score,
            total_routines: ledger.total_routines(),
            unique_routines: UniqueRoutineCounts {
                mind: ledger.unique_routine_count(Category::Mind),
                body: ledger.unique_routine_count(Category::Body),
                soul: ledger.unique_routine_count(Category::Soul),
            },
            last_activity_date: ledger.last_activity_date(),
            journey_started_on: self.journey_started_on.or_else(|| ledger.first_activity_date()),
            friend_count: self.friend_count,
            circle_count: self.circle_count,
            pain_improvement_days: self.pain_improvement_days,
            consistency_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::CompletionEvent;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn ledger_with_days(days: &[(u32, &[Category])]) -> ProgressLedger {
        let mut ledger = ProgressLedger::new("user-1");
        for &(day, categories) in days {
            for &category in categories {
                let event = CompletionEvent {
                    user_id: "user-1".to_string(),
                    category,
                    occurred_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
                    routine_id: Uuid::new_v4(),
                };
                ledger.record_completion(&event, Some(0)).unwrap();
            }
        }
        ledger
    }

    fn date(day: u32) -> LocalDate {
        LocalDate::from_ymd(2024, 3, day).unwrap()
    }

    #[test]
    fn test_empty_ledger_snapshot() {
        let ledger = ProgressLedger::new("user-1");
        let snapshot = StatsSnapshotBuilder::new(&ledger).build(date(15));

        assert_eq!(snapshot.mind_streak.current, 0);
        assert_eq!(snapshot.harmony_streak, StreakSummary::default());
        assert_eq!(snapshot.harmony_score, 0);
        assert_eq!(snapshot.total_routines, 0);
        assert_eq!(snapshot.last_activity_date, None);
        assert_eq!(snapshot.journey_started_on, None);
        assert_eq!(snapshot.consistency_ratio, 0.0);
    }

    #[test]
    fn test_per_category_and_harmony_streaks() {
        use Category::*;
        let ledger = ledger_with_days(&[
            (13, &[Mind, Body, Soul]),
            (14, &[Mind, Body, Soul]),
            (15, &[Mind, Body]),
        ]);
        let snapshot = StatsSnapshotBuilder::new(&ledger).build(date(15));

        assert_eq!(snapshot.mind_streak.current, 3);
        assert_eq!(snapshot.body_streak.current, 3);
        assert_eq!(snapshot.soul_streak.current, 2); // grace day: soul live through day 14
        // Day 15 is missing soul, so it does not extend the harmony run
        assert_eq!(snapshot.harmony_streak.current, 2);
    }

    #[test]
    fn test_three_balanced_days_harmony_current_is_three() {
        use Category::*;
        let ledger = ledger_with_days(&[
            (13, &[Mind, Body, Soul]),
            (14, &[Mind, Body, Soul]),
            (15, &[Mind, Body, Soul]),
        ]);
        let snapshot = StatsSnapshotBuilder::new(&ledger).build(date(15));
        assert_eq!(snapshot.harmony_streak.current, 3);
    }

    #[test]
    fn test_consistency_ratio_over_window() {
        use Category::*;
        // 6 active days in a 10-day window ending at day 15
        let ledger = ledger_with_days(&[
            (6, &[Mind]),
            (8, &[Body]),
            (10, &[Soul]),
            (12, &[Mind]),
            (14, &[Body]),
            (15, &[Mind]),
        ]);
        let snapshot = StatsSnapshotBuilder::new(&ledger)
            .with_consistency_window(10)
            .build(date(15));
        assert!((snapshot.consistency_ratio - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_consistency_ignores_days_outside_window() {
        use Category::*;
        let ledger = ledger_with_days(&[(1, &[Mind]), (15, &[Mind])]);
        let snapshot = StatsSnapshotBuilder::new(&ledger)
            .with_consistency_window(7)
            .build(date(15));
        assert!((snapshot.consistency_ratio - 1.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_journey_defaults_to_first_activity() {
        use Category::*;
        let ledger = ledger_with_days(&[(10, &[Mind]), (15, &[Body])]);
        let snapshot = StatsSnapshotBuilder::new(&ledger).build(date(15));
        assert_eq!(snapshot.journey_started_on, Some(date(10)));
        assert_eq!(snapshot.journey_days(), 5);
    }

    #[test]
    fn test_journey_start_override_and_social_counts() {
        let ledger = ProgressLedger::new("user-1");
        let snapshot = StatsSnapshotBuilder::new(&ledger)
            .with_journey_start(date(1))
            .with_friend_count(3)
            .with_circle_count(2)
            .with_pain_improvement_days(4)
            .build(date(15));

        assert_eq!(snapshot.journey_days(), 14);
        assert_eq!(snapshot.social_connections(), 5);
        assert_eq!(snapshot.pain_improvement_days, 4);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        use Category::*;
        let ledger = ledger_with_days(&[(13, &[Mind, Body]), (14, &[Soul])]);
        let a = StatsSnapshotBuilder::new(&ledger).build(date(15));
        let b = StatsSnapshotBuilder::new(&ledger).build(date(15));
        assert_eq!(a, b);
    }
}
