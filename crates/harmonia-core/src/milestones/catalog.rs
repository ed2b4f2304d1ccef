//! Built-in milestone catalog.
//!
//! The catalog ships with the app and is the default input to
//! [`super::evaluate`]. Collaborators may instead supply their own via
//! [`catalog_from_json`]; entries with tags this build does not know
//! survive parsing as [`MilestoneKind::Unknown`] and are skipped at
//! evaluation time.

use crate::error::Result;
use crate::progress::Category;

use super::{MilestoneDefinition, MilestoneKind, StreakMeasure};

fn streak(id: &str, name: &str, category: Option<Category>, target: u32) -> MilestoneDefinition {
    MilestoneDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: MilestoneKind::Streak,
        target,
        category,
        measure: StreakMeasure::Current,
    }
}

fn simple(id: &str, name: &str, kind: MilestoneKind, target: u32) -> MilestoneDefinition {
    MilestoneDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        target,
        category: None,
        measure: StreakMeasure::Current,
    }
}

fn specialization(id: &str, name: &str, category: Category, target: u32) -> MilestoneDefinition {
    MilestoneDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: MilestoneKind::Specialization,
        target,
        category: Some(category),
        measure: StreakMeasure::Current,
    }
}

/// The milestone catalog shipped with this version of the app.
pub fn builtin_catalog() -> Vec<MilestoneDefinition> {
    let mut catalog = vec![
        // Per-category streaks
        streak("mind-streak-7", "Focused Week", Some(Category::Mind), 7),
        streak("mind-streak-30", "Mindful Month", Some(Category::Mind), 30),
        streak("body-streak-7", "Active Week", Some(Category::Body), 7),
        streak("body-streak-30", "Strong Month", Some(Category::Body), 30),
        streak("soul-streak-7", "Grounded Week", Some(Category::Soul), 7),
        streak("soul-streak-30", "Soulful Month", Some(Category::Soul), 30),
        // Harmony streaks (all three categories on the same day)
        streak("harmony-streak-3", "In Balance", None, 3),
        streak("harmony-streak-7", "Week of Harmony", None, 7),
        streak("harmony-streak-21", "Three Weeks Whole", None, 21),
        // Completions
        simple("first-routine", "First Step", MilestoneKind::Completion, 1),
        simple("routines-25", "Getting Into It", MilestoneKind::Completion, 25),
        simple("routines-100", "Century", MilestoneKind::Completion, 100),
        simple("routines-500", "Devoted", MilestoneKind::Completion, 500),
        // Balance score
        simple("harmony-score-60", "Finding Balance", MilestoneKind::Balance, 60),
        simple("harmony-score-85", "Deep Harmony", MilestoneKind::Balance, 85),
        // Specialization
        specialization("mind-explorer", "Mind Explorer", Category::Mind, 5),
        specialization("body-explorer", "Body Explorer", Category::Body, 5),
        specialization("soul-explorer", "Soul Explorer", Category::Soul, 5),
        // Pain trend
        simple("pain-progress-7", "Turning a Corner", MilestoneKind::Pain, 7),
        simple("pain-progress-30", "Lasting Relief", MilestoneKind::Pain, 30),
        // Journey age
        simple("journey-30", "One Month In", MilestoneKind::Journey, 30),
        simple("journey-100", "Hundred Days", MilestoneKind::Journey, 100),
        simple("journey-365", "A Full Year", MilestoneKind::Journey, 365),
        // Social
        simple("first-connection", "Better Together", MilestoneKind::Social, 1),
        simple("social-circle-5", "Inner Circle", MilestoneKind::Social, 5),
        // Consistency (percent of days active in the rolling window)
        simple("consistent-50", "Showing Up", MilestoneKind::Consistency, 50),
        simple("consistent-80", "Steady Practice", MilestoneKind::Consistency, 80),
    ];

    // Longest-streak comeback milestone
    catalog.push(MilestoneDefinition {
        id: "best-streak-50".to_string(),
        name: "Personal Best".to_string(),
        kind: MilestoneKind::Streak,
        target: 50,
        category: None,
        measure: StreakMeasure::Longest,
    });

    catalog
}

/// Parse a collaborator-supplied catalog from JSON.
pub fn catalog_from_json(json: &str) -> Result<Vec<MilestoneDefinition>> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_ids_are_unique() {
        let catalog = builtin_catalog();
        let ids: HashSet<_> = catalog.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn test_builtin_covers_every_kind() {
        let catalog = builtin_catalog();
        for kind in [
            MilestoneKind::Streak,
            MilestoneKind::Completion,
            MilestoneKind::Balance,
            MilestoneKind::Specialization,
            MilestoneKind::Pain,
            MilestoneKind::Journey,
            MilestoneKind::Social,
            MilestoneKind::Consistency,
        ] {
            assert!(
                catalog.iter().any(|d| d.kind == kind),
                "no builtin milestone of kind {kind}"
            );
        }
    }

    #[test]
    fn test_builtin_targets_are_positive() {
        for def in builtin_catalog() {
            assert!(def.target > 0, "milestone '{}' has zero target", def.id);
        }
    }

    #[test]
    fn test_specialization_entries_carry_a_category() {
        for def in builtin_catalog() {
            if def.kind == MilestoneKind::Specialization {
                assert!(def.category.is_some(), "'{}' missing category", def.id);
            }
        }
    }

    #[test]
    fn test_catalog_round_trips_through_json() {
        let catalog = builtin_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let back = catalog_from_json(&json).unwrap();
        assert_eq!(back, catalog);
    }

    #[test]
    fn test_foreign_tag_parses_as_unknown() {
        let json = r#"[{"id": "x", "name": "X", "kind": "telepathy", "target": 3}]"#;
        let catalog = catalog_from_json(json).unwrap();
        assert_eq!(catalog[0].kind, MilestoneKind::Unknown);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(catalog_from_json("not json").is_err());
    }
}
