//! Property-based tests for the mastery data model.
//!
//! Invariants under arbitrary update sequences:
//! - mastery_score always equals the weighted formula
//! - max-rule components never decrease
//! - consistency after N concept-learning updates is min(1.0, 0.1*N)
//! - overall mastery is the mean of topic mastery, independent of update order

use proptest::prelude::*;

use chrono::Utc;
use learnflow_progress::progress::types::{
    ActivityType, TopicProgress, UserProgress, CONSISTENCY_STEP,
};

const EPS: f64 = 1e-9;

fn arb_score() -> impl Strategy<Value = f64> {
    (0u64..=1000u64).prop_map(|v| v as f64 / 1000.0)
}

fn arb_activity() -> impl Strategy<Value = ActivityType> {
    prop_oneof![
        Just(ActivityType::Exercise),
        Just(ActivityType::Quiz),
        Just(ActivityType::CodeReview),
        Just(ActivityType::ConceptLearning),
    ]
}

// (module, topic, activity, score) with a small key space so sequences
// actually collide on entries.
fn arb_update() -> impl Strategy<Value = (u8, u8, ActivityType, f64)> {
    (0u8..3, 0u8..4, arb_activity(), arb_score())
}

fn apply_all(user: &mut UserProgress, updates: &[(u8, u8, ActivityType, f64)]) {
    let now = Utc::now();
    for (module, topic, activity, score) in updates {
        let module = format!("module-{module}");
        let topic_name = format!("topic-{topic}");
        user.topic_mut(&module, &topic_name, now).apply(*activity, *score, now);
        user.recompute_overall();
    }
}

proptest! {
    #[test]
    fn mastery_always_matches_weighted_formula(updates in prop::collection::vec(arb_update(), 0..60)) {
        let mut user = UserProgress::new("u1");
        apply_all(&mut user, &updates);

        for topics in user.modules.values() {
            for topic in topics.values() {
                prop_assert!((topic.mastery_score - topic.weighted_mastery()).abs() < EPS);
            }
        }
    }

    #[test]
    fn max_components_never_decrease(scores in prop::collection::vec(arb_score(), 1..40)) {
        let now = Utc::now();
        let mut topic = TopicProgress::new(now);
        let mut running_max: f64 = 0.0;

        for score in scores {
            topic.apply(ActivityType::Exercise, score, now);
            running_max = running_max.max(score);
            prop_assert!((topic.exercise_completion - running_max).abs() < EPS);
        }
    }

    #[test]
    fn consistency_is_capped_step_count(n in 0usize..40) {
        let now = Utc::now();
        let mut topic = TopicProgress::new(now);

        for _ in 0..n {
            topic.apply(ActivityType::ConceptLearning, 0.0, now);
        }

        let expected = (CONSISTENCY_STEP * n as f64).min(1.0);
        prop_assert!(
            (topic.consistency_score - expected).abs() < 1e-6,
            "after {} updates: {} vs {}", n, topic.consistency_score, expected
        );
    }

    #[test]
    fn overall_is_order_independent_mean(updates in prop::collection::vec(arb_update(), 1..60)) {
        let mut forward = UserProgress::new("u1");
        apply_all(&mut forward, &updates);

        let mut reversed_updates = updates.clone();
        reversed_updates.reverse();
        let mut backward = UserProgress::new("u1");
        apply_all(&mut backward, &reversed_updates);

        // Every update rule commutes (max and capped increment), so the final
        // aggregate must not depend on submission order.
        prop_assert!((forward.overall_mastery - backward.overall_mastery).abs() < EPS);

        // And it is exactly the mean over tracked topics.
        let masteries: Vec<f64> = forward
            .modules
            .values()
            .flat_map(|topics| topics.values())
            .map(|topic| topic.mastery_score)
            .collect();
        let mean = masteries.iter().sum::<f64>() / masteries.len() as f64;
        prop_assert!((forward.overall_mastery - mean).abs() < EPS);
    }
}
