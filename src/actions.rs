//! Recommended next steps.

use crate::i18n::Translator;
use crate::snapshot::ProgressSnapshot;

/// Upper bound on the number of action items in a report.
pub const MAX_ACTION_ITEMS: usize = 8;

/// Recurring reminders appended after the targeted items, in order.
const GENERIC_ITEM_KEYS: &[&str] = &[
    "action_items.weekly_reviews",
    "action_items.compliance_reminders",
    "action_items.local_resources",
    "action_items.maintain_momentum",
    "action_items.review_progress",
];

/// Build the action-item list: targeted recommendations for incomplete
/// sub-records first, then generic reminders as filler, capped at
/// [`MAX_ACTION_ITEMS`].
pub fn action_items(snapshot: &ProgressSnapshot, translator: &Translator<'_>) -> Vec<String> {
    let mut items = targeted_items(snapshot, translator);

    let room = MAX_ACTION_ITEMS.saturating_sub(items.len());
    items.extend(
        GENERIC_ITEM_KEYS
            .iter()
            .take(room)
            .map(|key| translator.t(key)),
    );
    items.truncate(MAX_ACTION_ITEMS);
    items
}

fn targeted_items(snapshot: &ProgressSnapshot, t: &Translator<'_>) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(checklist) = &snapshot.checklist {
        let remaining = checklist.remaining();
        if checklist.completion_percentage() < 100.0 && remaining > 0 {
            items.push(t.t_with(
                "action_items.complete_remaining",
                &[("count", remaining.to_string())],
            ));
        }
        if checklist.priorities().high > 0 {
            items.push(t.t("action_items.prioritize_high"));
        }
    }

    if let Some(skills) = &snapshot.skills {
        if skills.bookmarked == 0 {
            items.push(t.t("action_items.explore_skills"));
        }
    }

    if let Some(quiz) = &snapshot.quiz {
        if quiz.score < quiz.total_questions {
            items.push(t.t("action_items.review_quiz"));
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Language, TranslationCatalog};
    use crate::snapshot::{ChecklistProgress, QuizProgress, SkillsProgress};
    use proptest::prelude::*;

    fn catalog() -> TranslationCatalog {
        TranslationCatalog::builtin().unwrap()
    }

    // ==================== Targeted Item Tests ====================

    #[test]
    fn test_reference_scenario_items() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ENGLISH);
        let snapshot = ProgressSnapshot {
            checklist: Some(ChecklistProgress::new(15, 10, 67.0).with_priorities(2, 5, 3)),
            skills: Some(SkillsProgress::new(25, 8)),
            quiz: Some(QuizProgress::new(7, 10)),
        };

        let items = action_items(&snapshot, &translator);
        assert_eq!(items.len(), MAX_ACTION_ITEMS);
        assert_eq!(items[0], "Complete remaining 5 compliance tasks");
        assert_eq!(items[1], "Prioritize high-priority compliance tasks");
        assert_eq!(items[2], "Review quiz topics and take additional assessments");
        assert_eq!(items[3], "Schedule weekly progress reviews");
        assert_eq!(
            items[7],
            "Review your progress regularly and adjust strategies as needed."
        );
    }

    #[test]
    fn test_no_bookmarks_suggests_exploring() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ENGLISH);
        let snapshot = ProgressSnapshot {
            skills: Some(SkillsProgress::new(12, 0)),
            ..Default::default()
        };

        let items = action_items(&snapshot, &translator);
        assert_eq!(
            items[0],
            "Explore and bookmark relevant skills development resources"
        );
    }

    #[test]
    fn test_complete_checklist_has_no_remaining_item() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ENGLISH);
        let snapshot = ProgressSnapshot {
            checklist: Some(ChecklistProgress::new(4, 4, 100.0)),
            ..Default::default()
        };

        let items = action_items(&snapshot, &translator);
        assert!(items.iter().all(|item| !item.starts_with("Complete remaining")));
    }

    #[test]
    fn test_stale_percentage_with_nothing_remaining() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ENGLISH);
        let snapshot = ProgressSnapshot {
            checklist: Some(ChecklistProgress::new(4, 4, 90.0)),
            ..Default::default()
        };

        let items = action_items(&snapshot, &translator);
        assert!(items.iter().all(|item| !item.contains("remaining 0")));
    }

    // ==================== Generic Item Tests ====================

    #[test]
    fn test_empty_snapshot_gets_generic_reminders() {
        let catalog = catalog();
        let translator = catalog.translator(Language::ENGLISH);
        let items = action_items(&ProgressSnapshot::default(), &translator);

        assert_eq!(items.len(), GENERIC_ITEM_KEYS.len());
        assert_eq!(items[0], "Schedule weekly progress reviews");
    }

    #[test]
    fn test_items_are_localized() {
        let catalog = catalog();
        let translator = catalog.translator(Language::XHOSA);
        let items = action_items(&ProgressSnapshot::default(), &translator);

        assert_eq!(translator.metrics().misses, 0);
        assert_ne!(items[0], "Schedule weekly progress reviews");
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_action_items_capped(
            total in 0u32..50,
            completed in 0u32..50,
            high in 0u32..5,
            resources in 0u32..30,
            bookmarked in 0u32..30,
            questions in 0u32..20,
            score in 0u32..20,
            has_checklist in any::<bool>(),
            has_skills in any::<bool>(),
            has_quiz in any::<bool>(),
        ) {
            let catalog = catalog();
            let translator = catalog.translator(Language::ENGLISH);
            let checklist = ChecklistProgress::new(total.max(completed), total.min(completed), 50.0)
                .with_priorities(high, 0, 0);
            let snapshot = ProgressSnapshot {
                checklist: has_checklist.then_some(checklist),
                skills: has_skills
                    .then(|| SkillsProgress::new(resources.max(bookmarked), resources.min(bookmarked))),
                quiz: has_quiz.then(|| QuizProgress::new(score.min(questions), score.max(questions))),
            };

            let items = action_items(&snapshot, &translator);
            prop_assert!(items.len() <= MAX_ACTION_ITEMS);
            prop_assert!(!items.is_empty());
        }
    }
}
