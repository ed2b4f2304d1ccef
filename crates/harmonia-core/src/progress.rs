//! Daily progress aggregation from completion events.
//!
//! A [`ProgressLedger`] folds a user's raw completion events into one
//! record per calendar day, tracking which of the three categories were
//! satisfied that day. Category flags only ever transition false -> true
//! (monotonic OR), which makes recording commutative and idempotent:
//! two devices completing routines near-simultaneously converge to the
//! same aggregate regardless of arrival order, and replaying history is
//! always safe.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{self, LocalDate};
use crate::diagnostics::{Diagnostic, CODE_FOREIGN_USER_EVENT, CODE_OFFSET_FALLBACK};
use crate::error::{EngineError, Result};

/// The three wellness categories a routine can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mind,
    Body,
    Soul,
}

impl Category {
    /// All categories, in canonical order.
    pub const ALL: [Category; 3] = [Category::Mind, Category::Body, Category::Soul];

    fn index(self) -> usize {
        match self {
            Category::Mind => 0,
            Category::Body => 1,
            Category::Soul => 2,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Mind => "mind",
            Category::Body => "body",
            Category::Soul => "soul",
        };
        write!(f, "{name}")
    }
}

/// A single routine completion, created once per user action and never
/// mutated. The acting client's UTC offset travels alongside the event
/// rather than inside it; see [`ProgressLedger::record_completion`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Owning user
    pub user_id: String,
    /// Category of the completed routine
    pub category: Category,
    /// Absolute instant of the completion
    pub occurred_at: DateTime<Utc>,
    /// Completed routine
    pub routine_id: Uuid,
}

/// Which categories were satisfied on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayFlags {
    pub mind: bool,
    pub body: bool,
    pub soul: bool,
}

impl DayFlags {
    /// Flags with a single category set.
    pub fn single(category: Category) -> Self {
        let mut flags = DayFlags::default();
        flags.set(category);
        flags
    }

    /// Set the flag for `category`. Never clears.
    pub fn set(&mut self, category: Category) {
        match category {
            Category::Mind => self.mind = true,
            Category::Body => self.body = true,
            Category::Soul => self.soul = true,
        }
    }

    /// Whether the flag for `category` is set.
    pub fn contains(self, category: Category) -> bool {
        match category {
            Category::Mind => self.mind,
            Category::Body => self.body,
            Category::Soul => self.soul,
        }
    }

    /// Monotonic OR merge. Commutative, associative, idempotent.
    pub fn merge(self, other: DayFlags) -> DayFlags {
        DayFlags {
            mind: self.mind || other.mind,
            body: self.body || other.body,
            soul: self.soul || other.soul,
        }
    }

    /// All three categories satisfied.
    pub fn all_complete(self) -> bool {
        self.mind && self.body && self.soul
    }

    /// At least one category satisfied.
    pub fn any(self) -> bool {
        self.mind || self.body || self.soul
    }

    /// The first category (in canonical order) set in `self` but cleared
    /// in `other`, if any. Used to detect flag regressions.
    fn regressed_in(self, other: DayFlags) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|&c| self.contains(c) && !other.contains(c))
    }
}

/// One user's progress for one calendar day. Keyed by (user, local_date);
/// category flags are set semantics, not counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProgressRecord {
    pub user_id: String,
    pub local_date: LocalDate,
    pub mind_complete: bool,
    pub body_complete: bool,
    pub soul_complete: bool,
}

impl DailyProgressRecord {
    fn new(user_id: &str, local_date: LocalDate, flags: DayFlags) -> Self {
        Self {
            user_id: user_id.to_string(),
            local_date,
            mind_complete: flags.mind,
            body_complete: flags.body,
            soul_complete: flags.soul,
        }
    }

    /// The record's flags as a [`DayFlags`] value.
    pub fn flags(&self) -> DayFlags {
        DayFlags {
            mind: self.mind_complete,
            body: self.body_complete,
            soul: self.soul_complete,
        }
    }
}

/// Result of recording one completion event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// The upserted daily record after the event was applied
    pub record: DailyProgressRecord,
    /// True when this event set a flag that was not set before
    pub newly_completed: bool,
    /// Data-quality signal, e.g. a UTC fallback on a malformed offset
    pub diagnostic: Option<Diagnostic>,
}

/// Identity of an event for replay deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EventKey(Uuid, DateTime<Utc>, Category);

impl EventKey {
    fn of(event: &CompletionEvent) -> Self {
        EventKey(event.routine_id, event.occurred_at, event.category)
    }
}

/// Per-user fold of completion events into daily records plus the
/// counters the stats snapshot needs. All derived; safe to discard and
/// rebuild from the raw event set at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressLedger {
    user_id: String,
    days: BTreeMap<LocalDate, DayFlags>,
    total_routines: u32,
    unique_routines: [BTreeSet<Uuid>; 3],
    seen: HashSet<EventKey>,
}

impl ProgressLedger {
    /// Empty ledger for one user.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            days: BTreeMap::new(),
            total_routines: 0,
            unique_routines: Default::default(),
            seen: HashSet::new(),
        }
    }

    /// Rebuild a ledger from a raw event set. Event order does not
    /// matter; foreign-user events are skipped with a diagnostic.
    /// Replaying this with the same events yields an identical ledger.
    pub fn from_events<I>(user_id: impl Into<String>, events: I) -> (Self, Vec<Diagnostic>)
    where
        I: IntoIterator<Item = (CompletionEvent, Option<i32>)>,
    {
        let mut ledger = Self::new(user_id);
        let mut diagnostics = Vec::new();

        for (event, offset_minutes) in events {
            match ledger.record_completion(&event, offset_minutes) {
                Ok(outcome) => {
                    if let Some(diagnostic) = outcome.diagnostic {
                        diagnostics.push(diagnostic);
                    }
                }
                Err(EngineError::UserMismatch { record_user, .. }) => {
                    diagnostics.push(Diagnostic::warning(
                        CODE_FOREIGN_USER_EVENT,
                        format!("skipped event for user '{record_user}'"),
                    ));
                }
                Err(_) => unreachable!("record_completion only fails on user mismatch"),
            }
        }

        (ledger, diagnostics)
    }

    /// Apply one completion event under the acting client's UTC offset.
    ///
    /// Resolves the event's local date, upserts the day's record, and
    /// sets the flag for the event's category; other categories are left
    /// untouched. Repeated same-category completions on the same local
    /// date collapse to a single true flag; the `total_routines` counter
    /// deduplicates on event identity, so full replays are idempotent.
    pub fn record_completion(
        &mut self,
        event: &CompletionEvent,
        offset_minutes: Option<i32>,
    ) -> Result<RecordOutcome> {
        if event.user_id != self.user_id {
            return Err(EngineError::UserMismatch {
                ledger_user: self.user_id.clone(),
                record_user: event.user_id.clone(),
            });
        }

        let resolved = calendar::resolve(event.occurred_at, offset_minutes);
        let diagnostic = resolved.used_utc_fallback.then(|| {
            Diagnostic::warning(
                CODE_OFFSET_FALLBACK,
                format!(
                    "offset {:?} missing or out of range for event at {}; resolved in UTC",
                    offset_minutes, event.occurred_at
                ),
            )
        });

        let flags = self.days.entry(resolved.date).or_default();
        let newly_completed = !flags.contains(event.category);
        flags.set(event.category);
        let flags = *flags;

        if self.seen.insert(EventKey::of(event)) {
            self.total_routines += 1;
            self.unique_routines[event.category.index()].insert(event.routine_id);
        }

        Ok(RecordOutcome {
            record: DailyProgressRecord::new(&self.user_id, resolved.date, flags),
            newly_completed,
            diagnostic,
        })
    }

    /// Merge a collaborator-persisted daily record into the ledger.
    ///
    /// A record that would clear a flag the ledger already has set is a
    /// data-integrity violation and is reported, never silently fixed --
    /// correcting it here could mask an upstream bug.
    pub fn ingest_record(&mut self, record: &DailyProgressRecord) -> Result<()> {
        if record.user_id != self.user_id {
            return Err(EngineError::UserMismatch {
                ledger_user: self.user_id.clone(),
                record_user: record.user_id.clone(),
            });
        }

        let incoming = record.flags();
        if let Some(existing) = self.days.get(&record.local_date) {
            if let Some(category) = existing.regressed_in(incoming) {
                return Err(EngineError::FlagRegression {
                    user_id: self.user_id.clone(),
                    date: record.local_date,
                    category,
                });
            }
        }

        let flags = self.days.entry(record.local_date).or_default();
        *flags = flags.merge(incoming);
        Ok(())
    }

    /// Owning user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The daily record for one date, if any event landed there.
    pub fn record_for(&self, date: LocalDate) -> Option<DailyProgressRecord> {
        self.days
            .get(&date)
            .map(|flags| DailyProgressRecord::new(&self.user_id, date, *flags))
    }

    /// All daily records, ascending by date.
    pub fn records(&self) -> Vec<DailyProgressRecord> {
        self.days
            .iter()
            .map(|(date, flags)| DailyProgressRecord::new(&self.user_id, *date, *flags))
            .collect()
    }

    /// Dates on which `category` was satisfied.
    pub fn dates_with(&self, category: Category) -> BTreeSet<LocalDate> {
        self.days
            .iter()
            .filter(|(_, flags)| flags.contains(category))
            .map(|(date, _)| *date)
            .collect()
    }

    /// Dates on which all three categories were satisfied.
    pub fn harmony_dates(&self) -> BTreeSet<LocalDate> {
        self.days
            .iter()
            .filter(|(_, flags)| flags.all_complete())
            .map(|(date, _)| *date)
            .collect()
    }

    /// Dates on which at least one category was satisfied.
    pub fn active_dates(&self) -> BTreeSet<LocalDate> {
        self.days
            .iter()
            .filter(|(_, flags)| flags.any())
            .map(|(date, _)| *date)
            .collect()
    }

    /// Count of distinct completion events ever recorded.
    pub fn total_routines(&self) -> u32 {
        self.total_routines
    }

    /// Count of distinct routines ever completed in `category`.
    pub fn unique_routine_count(&self, category: Category) -> u32 {
        self.unique_routines[category.index()].len() as u32
    }

    /// Most recent date with any activity.
    pub fn last_activity_date(&self) -> Option<LocalDate> {
        self.days
            .iter()
            .rev()
            .find(|(_, flags)| flags.any())
            .map(|(date, _)| *date)
    }

    /// Earliest date with any activity.
    pub fn first_activity_date(&self) -> Option<LocalDate> {
        self.days
            .iter()
            .find(|(_, flags)| flags.any())
            .map(|(date, _)| *date)
    }

    /// True when no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
