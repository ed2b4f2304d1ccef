//! Calendar date resolution under a caller-supplied UTC offset.
//!
//! Every date-sensitive operation in the engine is parameterized by the
//! acting client's UTC offset at the moment of the action. There is
//! deliberately no server-side default timezone: an app-wide default
//! produces incorrect midnight rollovers for users outside the reference
//! zone. When the offset is missing or out of range the resolver falls
//! back to UTC and flags the result rather than guessing.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Westernmost real-world offset (UTC-12:00), in minutes.
pub const MIN_OFFSET_MINUTES: i32 = -12 * 60;
/// Easternmost real-world offset (UTC+14:00), in minutes.
pub const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// A calendar date with no time component, meaningful under a specific
/// UTC offset. Formats as `YYYY-MM-DD`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocalDate(NaiveDate);

impl LocalDate {
    /// Construct from year/month/day, if valid.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(LocalDate)
    }

    /// The previous calendar day.
    pub fn pred(self) -> Self {
        LocalDate(self.0.pred_opt().unwrap_or(self.0))
    }

    /// The next calendar day.
    pub fn succ(self) -> Self {
        LocalDate(self.0.succ_opt().unwrap_or(self.0))
    }

    /// Signed number of calendar days from `self` to `other`.
    pub fn days_until(self, other: LocalDate) -> i64 {
        (other.0 - self.0).num_days()
    }

    /// Underlying chrono date.
    pub fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for LocalDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::from_str(s).map(LocalDate)
    }
}

impl From<NaiveDate> for LocalDate {
    fn from(date: NaiveDate) -> Self {
        LocalDate(date)
    }
}

/// A validated UTC offset in minutes east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtcOffset(i32);

impl UtcOffset {
    /// The UTC offset itself (zero minutes).
    pub const UTC: UtcOffset = UtcOffset(0);

    /// Validate raw minutes into an offset. Returns `None` outside the
    /// real-world range UTC-12:00 ..= UTC+14:00.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        if (MIN_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&minutes) {
            Some(UtcOffset(minutes))
        } else {
            None
        }
    }

    /// Minutes east of UTC.
    pub fn minutes(self) -> i32 {
        self.0
    }
}

impl Default for UtcOffset {
    fn default() -> Self {
        UtcOffset::UTC
    }
}

/// Result of resolving an instant to a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDate {
    /// The calendar date under the effective offset
    pub date: LocalDate,
    /// True when the supplied offset was missing or malformed and the
    /// resolver fell back to UTC
    pub used_utc_fallback: bool,
}

/// Map an absolute instant to the calendar date it falls on under `offset`.
pub fn local_date(instant: DateTime<Utc>, offset: UtcOffset) -> LocalDate {
    LocalDate((instant + Duration::minutes(offset.minutes() as i64)).date_naive())
}

/// Resolve an instant against a raw caller-supplied offset.
///
/// A missing or out-of-range offset falls back to UTC; the returned
/// [`ResolvedDate`] carries the data-quality flag so callers can surface
/// a diagnostic instead of guessing at the user's timezone.
pub fn resolve(instant: DateTime<Utc>, raw_offset_minutes: Option<i32>) -> ResolvedDate {
    match raw_offset_minutes.and_then(UtcOffset::from_minutes) {
        Some(offset) => ResolvedDate {
            date: local_date(instant, offset),
            used_utc_fallback: false,
        },
        None => ResolvedDate {
            date: local_date(instant, UtcOffset::UTC),
            used_utc_fallback: true,
        },
    }
}

/// The current calendar date under `offset`.
pub fn today(offset: UtcOffset) -> LocalDate {
    local_date(Utc::now(), offset)
}

/// One calendar day before [`today`] under `offset`.
pub fn yesterday(offset: UtcOffset) -> LocalDate {
    today(offset).pred()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc_datetime(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec).unwrap()
    }

    #[test]
    fn test_local_date_at_utc() {
        let instant = utc_datetime(2024, 3, 15, 12, 0, 0);
        assert_eq!(
            local_date(instant, UtcOffset::UTC),
            LocalDate::from_ymd(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_positive_offset_rolls_date_forward() {
        // 23:00 UTC is already the next day at UTC+9 (Tokyo)
        let instant = utc_datetime(2024, 3, 15, 23, 0, 0);
        let tokyo = UtcOffset::from_minutes(9 * 60).unwrap();
        assert_eq!(
            local_date(instant, tokyo),
            LocalDate::from_ymd(2024, 3, 16).unwrap()
        );
    }

    #[test]
    fn test_negative_offset_rolls_date_back() {
        // 02:00 UTC is still the previous day at UTC-5 (New York, winter)
        let instant = utc_datetime(2024, 3, 15, 2, 0, 0);
        let new_york = UtcOffset::from_minutes(-5 * 60).unwrap();
        assert_eq!(
            local_date(instant, new_york),
            LocalDate::from_ymd(2024, 3, 14).unwrap()
        );
    }

    #[test]
    fn test_midnight_boundary_splits_adjacent_instants() {
        // Local 23:59:59 and local 00:00:01 two seconds later must land
        // on different calendar dates.
        let offset = UtcOffset::from_minutes(60).unwrap(); // UTC+1
        let before = utc_datetime(2024, 3, 15, 22, 59, 59); // local 23:59:59
        let after = utc_datetime(2024, 3, 15, 23, 0, 1); // local 00:00:01

        let d1 = local_date(before, offset);
        let d2 = local_date(after, offset);
        assert_ne!(d1, d2);
        assert_eq!(d1.succ(), d2);
    }

    #[test]
    fn test_multi_hour_gap_within_one_local_day() {
        let offset = UtcOffset::from_minutes(-7 * 60).unwrap(); // UTC-7
        let morning = utc_datetime(2024, 3, 15, 14, 0, 0); // local 07:00
        let evening = utc_datetime(2024, 3, 16, 5, 0, 0); // local 22:00 same day
        assert_eq!(local_date(morning, offset), local_date(evening, offset));
    }

    #[test]
    fn test_half_hour_offset() {
        // India is UTC+5:30; 18:45 UTC is 00:15 the next day
        let india = UtcOffset::from_minutes(330).unwrap();
        let instant = utc_datetime(2024, 3, 15, 18, 45, 0);
        assert_eq!(
            local_date(instant, india),
            LocalDate::from_ymd(2024, 3, 16).unwrap()
        );
    }

    #[test]
    fn test_offset_validation_range() {
        assert!(UtcOffset::from_minutes(0).is_some());
        assert!(UtcOffset::from_minutes(MIN_OFFSET_MINUTES).is_some());
        assert!(UtcOffset::from_minutes(MAX_OFFSET_MINUTES).is_some());
        assert!(UtcOffset::from_minutes(MIN_OFFSET_MINUTES - 1).is_none());
        assert!(UtcOffset::from_minutes(MAX_OFFSET_MINUTES + 1).is_none());
        assert!(UtcOffset::from_minutes(100_000).is_none());
    }

    #[test]
    fn test_resolve_falls_back_to_utc_on_missing_offset() {
        let instant = utc_datetime(2024, 3, 15, 23, 30, 0);
        let resolved = resolve(instant, None);
        assert!(resolved.used_utc_fallback);
        assert_eq!(resolved.date, LocalDate::from_ymd(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_resolve_falls_back_to_utc_on_malformed_offset() {
        let instant = utc_datetime(2024, 3, 15, 23, 30, 0);
        let resolved = resolve(instant, Some(99_999));
        assert!(resolved.used_utc_fallback);
        assert_eq!(resolved.date, LocalDate::from_ymd(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_resolve_uses_valid_offset() {
        let instant = utc_datetime(2024, 3, 15, 23, 30, 0);
        let resolved = resolve(instant, Some(120));
        assert!(!resolved.used_utc_fallback);
        assert_eq!(resolved.date, LocalDate::from_ymd(2024, 3, 16).unwrap());
    }

    #[test]
    fn test_local_date_display_and_parse() {
        let date = LocalDate::from_ymd(2024, 3, 5).unwrap();
        assert_eq!(date.to_string(), "2024-03-05");
        assert_eq!("2024-03-05".parse::<LocalDate>().unwrap(), date);
    }

    #[test]
    fn test_days_until() {
        let a = LocalDate::from_ymd(2024, 2, 27).unwrap();
        let b = LocalDate::from_ymd(2024, 3, 1).unwrap(); // leap year
        assert_eq!(a.days_until(b), 3);
        assert_eq!(b.days_until(a), -3);
    }
}
