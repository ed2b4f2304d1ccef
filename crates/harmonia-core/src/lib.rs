//! # Harmonia Core Library
//!
//! This library implements the progress and milestone engine for the
//! Harmonia wellness app: it turns a raw stream of timestamped routine
//! completions into calendar-day-correct daily progress records,
//! per-category and cross-category streaks, a composite harmony score,
//! and a catalog-driven milestone status list.
//!
//! The engine is pure and in-memory. Persistence, transport, and
//! presentation belong to external collaborators; they feed completion
//! events (with the acting client's UTC offset) in and consume derived
//! aggregates out. Every derived structure is a cache that can always
//! be rebuilt from the raw event set, so replays, backfills, and full
//! resets need no special code path.
//!
//! ## Key Components
//!
//! - [`calendar`]: offset-parameterized calendar date resolution
//! - [`ProgressLedger`]: per-user fold of events into daily records
//! - [`compute_streak`]: consecutive-day streaks with the grace-day rule
//! - [`compute_harmony_score`]: bounded balance/magnitude composite
//! - [`milestones`]: catalog-driven achievement evaluation

pub mod calendar;
pub mod diagnostics;
pub mod error;
pub mod harmony;
pub mod milestones;
pub mod progress;
pub mod snapshot;
pub mod streak;

pub use calendar::{LocalDate, ResolvedDate, UtcOffset};
pub use diagnostics::{Diagnostic, Severity};
pub use error::{EngineError, Result};
pub use harmony::{compute_harmony_score, HarmonyWeights};
pub use milestones::{
    builtin_catalog, catalog_from_json, evaluate, AchievementLog, EvaluationReport,
    MilestoneDefinition, MilestoneKind, MilestoneStatus, MilestoneSummary, StreakMeasure,
};
pub use progress::{
    Category, CompletionEvent, DailyProgressRecord, DayFlags, ProgressLedger, RecordOutcome,
};
pub use snapshot::{StatsSnapshotBuilder, UniqueRoutineCounts, UserStatsSnapshot};
pub use streak::{compute_streak, CategoryStreak, StreakSummary};
