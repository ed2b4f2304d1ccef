//! Batch evaluation of a milestone catalog against a stats snapshot.

use chrono::{DateTime, Utc};

use crate::diagnostics::{
    Diagnostic, CODE_MILESTONE_EVAL_FAILED, CODE_UNKNOWN_MILESTONE_KIND,
};
use crate::snapshot::UserStatsSnapshot;

use super::{
    AchievementLog, MilestoneDefinition, MilestoneKind, MilestoneStatus, MilestoneSummary,
    StreakMeasure,
};

/// Result of evaluating a catalog: one summary per evaluable definition
/// plus diagnostics for the entries that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationReport {
    pub summaries: Vec<MilestoneSummary>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Evaluate every catalog entry against the snapshot.
///
/// Definitions are independent; a failure in one is isolated to a
/// diagnostic and never aborts the rest of the batch. Newly crossed
/// milestones are stamped into `log` with `now`; existing stamps are
/// never rewritten, so `achieved_at` is stable across re-evaluations.
pub fn evaluate(
    catalog: &[MilestoneDefinition],
    snapshot: &UserStatsSnapshot,
    log: &mut AchievementLog,
    now: DateTime<Utc>,
) -> EvaluationReport {
    let mut summaries = Vec::with_capacity(catalog.len());
    let mut diagnostics = Vec::new();

    for definition in catalog {
        match current_value(definition, snapshot) {
            Ok(current) => {
                summaries.push(classify(definition, current, log, now));
            }
            Err(skip) => diagnostics.push(skip.into_diagnostic(definition)),
        }
    }

    EvaluationReport {
        summaries,
        diagnostics,
    }
}

/// Why one definition could not be evaluated.
enum Skip {
    UnknownKind,
    MissingCategory,
}

impl Skip {
    fn into_diagnostic(self, definition: &MilestoneDefinition) -> Diagnostic {
        match self {
            Skip::UnknownKind => Diagnostic::warning(
                CODE_UNKNOWN_MILESTONE_KIND,
                format!("milestone '{}' has an unrecognized kind; skipped", definition.id),
            ),
            Skip::MissingCategory => Diagnostic::error(
                CODE_MILESTONE_EVAL_FAILED,
                format!(
                    "{} milestone '{}' requires a category; skipped",
                    definition.kind, definition.id
                ),
            ),
        }
    }
}

/// Read the snapshot field a definition's kind points at.
fn current_value(
    definition: &MilestoneDefinition,
    snapshot: &UserStatsSnapshot,
) -> Result<u32, Skip> {
    let value = match definition.kind {
        MilestoneKind::Streak => {
            let (current, longest) = match definition.category {
                Some(category) => {
                    let streak = snapshot.streak_for(category);
                    (streak.current, streak.longest)
                }
                None => (snapshot.harmony_streak.current, snapshot.harmony_streak.longest),
            };
            match definition.measure {
                StreakMeasure::Current => current,
                StreakMeasure::Longest => longest,
            }
        }
        MilestoneKind::Completion => snapshot.total_routines,
        MilestoneKind::Balance => snapshot.harmony_score as u32,
        MilestoneKind::Specialization => {
            let category = definition.category.ok_or(Skip::MissingCategory)?;
            snapshot.unique_routines.for_category(category)
        }
        MilestoneKind::Pain => snapshot.pain_improvement_days,
        MilestoneKind::Journey => snapshot.journey_days(),
        MilestoneKind::Social => snapshot.social_connections(),
        MilestoneKind::Consistency => (snapshot.consistency_ratio * 100.0).round() as u32,
        MilestoneKind::Unknown => return Err(Skip::UnknownKind),
    };
    Ok(value)
}

fn classify(
    definition: &MilestoneDefinition,
    current: u32,
    log: &mut AchievementLog,
    now: DateTime<Utc>,
) -> MilestoneSummary {
    let status = if current >= definition.target {
        MilestoneStatus::Achieved
    } else if current > 0 {
        MilestoneStatus::InProgress
    } else {
        MilestoneStatus::Upcoming
    };

    if status == MilestoneStatus::Achieved {
        log.record_first(&definition.id, now);
    }

    MilestoneSummary {
        milestone_id: definition.id.clone(),
        kind: definition.kind,
        status,
        current_value: current,
        target_value: definition.target,
        // A prior stamp survives even if the re-derived value dropped
        // below the target since it was first crossed
        achieved_at: log.achieved_at(&definition.id),
    }
}
