//! Milestone catalog types and achievement evaluation.
//!
//! Milestones are data, not code: a [`MilestoneDefinition`] names the
//! snapshot field it reads via its [`MilestoneKind`] and the engine
//! dispatches on that tag. New milestones ship as catalog entries
//! without touching the evaluation core.

mod catalog;
mod engine;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::Category;

pub use catalog::{builtin_catalog, catalog_from_json};
pub use engine::{evaluate, EvaluationReport};

/// Which snapshot aggregate a milestone reads.
///
/// Catalogs supplied by collaborators may carry tags this build does not
/// know; those deserialize to [`MilestoneKind::Unknown`] and are skipped
/// with a diagnostic at evaluation time rather than failing the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    /// Current or longest streak, per category or harmony
    Streak,
    /// Total distinct routine completions
    Completion,
    /// Harmony score
    Balance,
    /// Unique routines completed within one category
    Specialization,
    /// Days with an improving pain trend
    Pain,
    /// Days elapsed since the journey started
    Journey,
    /// Friend and circle connections
    Social,
    /// Rolling-window completion ratio, as a percentage
    Consistency,
    /// Unrecognized tag from a newer or foreign catalog
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MilestoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MilestoneKind::Streak => "streak",
            MilestoneKind::Completion => "completion",
            MilestoneKind::Balance => "balance",
            MilestoneKind::Specialization => "specialization",
            MilestoneKind::Pain => "pain",
            MilestoneKind::Journey => "journey",
            MilestoneKind::Social => "social",
            MilestoneKind::Consistency => "consistency",
            MilestoneKind::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}

/// Whether a streak milestone reads the live or the all-time run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakMeasure {
    #[default]
    Current,
    Longest,
}

/// One entry of the milestone catalog. Static, versioned with the app,
/// never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDefinition {
    /// Stable identifier, also the key for `achieved_at` stamps
    pub id: String,
    /// Display name
    pub name: String,
    /// Which aggregate this milestone reads
    pub kind: MilestoneKind,
    /// Threshold; achieved when the current value reaches it
    pub target: u32,
    /// Category qualifier. For streak milestones `None` means the
    /// harmony streak; specialization milestones require a category.
    #[serde(default)]
    pub category: Option<Category>,
    /// Streak measure for streak milestones; ignored by other kinds
    #[serde(default)]
    pub measure: StreakMeasure,
}

/// Classification of one milestone against the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    /// Current value reached the target
    Achieved,
    /// Some progress, target not yet reached
    InProgress,
    /// Never attempted (current value is zero)
    Upcoming,
}

/// Evaluation result for one milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSummary {
    pub milestone_id: String,
    pub kind: MilestoneKind,
    pub status: MilestoneStatus,
    pub current_value: u32,
    pub target_value: u32,
    /// Instant the target was first crossed; stable across re-evaluations
    pub achieved_at: Option<DateTime<Utc>>,
}

impl MilestoneSummary {
    /// Progress toward the target as a fraction in `0.0..=1.0`.
    pub fn progress_fraction(&self) -> f64 {
        if self.target_value == 0 {
            return 1.0;
        }
        (self.current_value as f64 / self.target_value as f64).min(1.0)
    }
}

/// First-crossing timestamps per milestone id.
///
/// The log is the only piece of milestone state that outlives an
/// evaluation; collaborators persist it so `achieved_at` survives
/// recomputation. Stamps are write-once: re-evaluation never rewrites
/// an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementLog {
    stamps: BTreeMap<String, DateTime<Utc>>,
}

impl AchievementLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first-crossing stamp for a milestone, if ever achieved.
    pub fn achieved_at(&self, milestone_id: &str) -> Option<DateTime<Utc>> {
        self.stamps.get(milestone_id).copied()
    }

    /// Record the first crossing of a milestone. Returns true if this
    /// call created the stamp; an existing stamp is never overwritten.
    pub fn record_first(&mut self, milestone_id: &str, at: DateTime<Utc>) -> bool {
        if self.stamps.contains_key(milestone_id) {
            return false;
        }
        self.stamps.insert(milestone_id.to_string(), at);
        true
    }

    /// Number of milestones ever achieved.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unknown_kind_deserializes_from_foreign_tag() {
        let kind: MilestoneKind = serde_json::from_str("\"levitation\"").unwrap();
        assert_eq!(kind, MilestoneKind::Unknown);
    }

    #[test]
    fn test_definition_defaults() {
        let def: MilestoneDefinition = serde_json::from_str(
            r#"{"id": "routines-25", "name": "Quarter Century", "kind": "completion", "target": 25}"#,
        )
        .unwrap();
        assert_eq!(def.category, None);
        assert_eq!(def.measure, StreakMeasure::Current);
    }

    #[test]
    fn test_achievement_log_is_write_once() {
        let mut log = AchievementLog::new();
        let first = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();

        assert!(log.record_first("harmony-streak-3", first));
        assert!(!log.record_first("harmony-streak-3", later));
        assert_eq!(log.achieved_at("harmony-streak-3"), Some(first));
    }

    #[test]
    fn test_progress_fraction_clamps() {
        let summary = MilestoneSummary {
            milestone_id: "routines-25".to_string(),
            kind: MilestoneKind::Completion,
            status: MilestoneStatus::Achieved,
            current_value: 40,
            target_value: 25,
            achieved_at: None,
        };
        assert_eq!(summary.progress_fraction(), 1.0);
    }
}
