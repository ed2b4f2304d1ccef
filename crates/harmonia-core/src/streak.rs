//! Consecutive-day streak calculation.
//!
//! Streaks are derived on demand from the set of dates on which a
//! condition held (a category flag, or all three flags for the harmony
//! streak). Nothing here is authoritative state; callers may cache a
//! [`StreakSummary`] but must treat it as fully replaceable from the
//! underlying date set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calendar::LocalDate;
use crate::progress::Category;

/// Current and longest consecutive-day runs for one condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Length of the live run ending at today or yesterday; 0 if neither
    /// day satisfied the condition
    pub current: u32,
    /// Longest run anywhere in history
    pub longest: u32,
}

/// A streak summary labeled with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStreak {
    pub category: Category,
    pub current: u32,
    pub longest: u32,
}

impl CategoryStreak {
    pub fn new(category: Category, summary: StreakSummary) -> Self {
        Self {
            category,
            current: summary.current,
            longest: summary.longest,
        }
    }
}

/// Compute current and longest streaks over a set of satisfied dates.
///
/// `longest` is the maximum run of consecutive calendar days anywhere in
/// the set. `current` applies the grace-day rule: the streak is live if
/// `today` *or* `today - 1` is in the set, counted backward from
/// whichever is present. A user who has not yet acted today keeps
/// yesterday's streak; a user who last acted the day before yesterday
/// has no current streak. An empty set yields `{0, 0}`.
pub fn compute_streak(dates: &BTreeSet<LocalDate>, today: LocalDate) -> StreakSummary {
    if dates.is_empty() {
        return StreakSummary::default();
    }

    let mut longest = 1u32;
    let mut run = 1u32;
    let mut prev: Option<LocalDate> = None;
    for &date in dates {
        if let Some(prev) = prev {
            if prev.days_until(date) == 1 {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 1;
            }
        }
        prev = Some(date);
    }

    let anchor = if dates.contains(&today) {
        today
    } else if dates.contains(&today.pred()) {
        today.pred()
    } else {
        return StreakSummary { current: 0, longest };
    };

    let mut current = 1u32;
    let mut cursor = anchor.pred();
    while dates.contains(&cursor) {
        current += 1;
        cursor = cursor.pred();
    }

    StreakSummary { current, longest }
}
