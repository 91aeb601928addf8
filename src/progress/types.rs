//! Progress data model: per-topic score tuples and per-user aggregates.
//!
//! A topic's mastery is always the weighted combination of its four
//! sub-scores; it is recomputed on every mutation and never set directly.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EXERCISE_WEIGHT: f64 = 0.4;
pub const QUIZ_WEIGHT: f64 = 0.3;
pub const CODE_QUALITY_WEIGHT: f64 = 0.2;
pub const CONSISTENCY_WEIGHT: f64 = 0.1;

/// Increment applied to `consistency_score` per concept-learning activity.
pub const CONSISTENCY_STEP: f64 = 0.1;

/// Category of learning action that triggers a score update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Exercise,
    Quiz,
    CodeReview,
    ConceptLearning,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Exercise => "exercise",
            ActivityType::Quiz => "quiz",
            ActivityType::CodeReview => "code_review",
            ActivityType::ConceptLearning => "concept_learning",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown activity type: {0}")]
pub struct UnknownActivityType(String);

impl FromStr for ActivityType {
    type Err = UnknownActivityType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "exercise" => Ok(ActivityType::Exercise),
            "quiz" => Ok(ActivityType::Quiz),
            "code_review" => Ok(ActivityType::CodeReview),
            "concept_learning" => Ok(ActivityType::ConceptLearning),
            other => Err(UnknownActivityType(other.to_string())),
        }
    }
}

/// Score tuple for one (user, module, topic).
///
/// The three max-rule components and the consistency counter all live in
/// [0, 1]; `mastery_score` is derived from them on every update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicProgress {
    pub mastery_score: f64,
    pub exercise_completion: f64,
    pub quiz_score: f64,
    pub code_quality: f64,
    pub consistency_score: f64,
    pub last_updated: DateTime<Utc>,
}

impl TopicProgress {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            mastery_score: 0.0,
            exercise_completion: 0.0,
            quiz_score: 0.0,
            code_quality: 0.0,
            consistency_score: 0.0,
            last_updated: now,
        }
    }

    /// Apply one activity outcome, then recompute the derived mastery score.
    ///
    /// `score` must already be validated to [0, 1]; concept-learning ignores
    /// it entirely and bumps the consistency counter instead.
    pub fn apply(&mut self, activity: ActivityType, score: f64, now: DateTime<Utc>) {
        debug_assert!((0.0..=1.0).contains(&score), "score out of range: {score}");

        match activity {
            ActivityType::Exercise => {
                self.exercise_completion = self.exercise_completion.max(score);
            }
            ActivityType::Quiz => {
                self.quiz_score = self.quiz_score.max(score);
            }
            ActivityType::CodeReview => {
                self.code_quality = self.code_quality.max(score);
            }
            ActivityType::ConceptLearning => {
                self.consistency_score = (self.consistency_score + CONSISTENCY_STEP).min(1.0);
            }
        }

        self.mastery_score = self.weighted_mastery();
        self.last_updated = now;
    }

    pub fn weighted_mastery(&self) -> f64 {
        self.exercise_completion * EXERCISE_WEIGHT
            + self.quiz_score * QUIZ_WEIGHT
            + self.code_quality * CODE_QUALITY_WEIGHT
            + self.consistency_score * CONSISTENCY_WEIGHT
    }
}

/// All tracked progress for one user, created lazily on first activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: String,
    pub modules: HashMap<String, HashMap<String, TopicProgress>>,
    pub overall_mastery: f64,
}

impl UserProgress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            modules: HashMap::new(),
            overall_mastery: 0.0,
        }
    }

    /// Fetch the topic entry, creating module and topic levels on first use.
    pub fn topic_mut(&mut self, module: &str, topic: &str, now: DateTime<Utc>) -> &mut TopicProgress {
        self.modules
            .entry(module.to_string())
            .or_default()
            .entry(topic.to_string())
            .or_insert_with(|| TopicProgress::new(now))
    }

    /// Recompute `overall_mastery` as the unweighted mean across every
    /// tracked topic. Returns 0.0 for a user with no topics; traversal
    /// order does not matter since this is a commutative sum.
    pub fn recompute_overall(&mut self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for topics in self.modules.values() {
            for topic in topics.values() {
                sum += topic.mastery_score;
                count += 1;
            }
        }

        self.overall_mastery = if count == 0 { 0.0 } else { sum / count as f64 };
        self.overall_mastery
    }

    /// Most recent mutation across all topics, if any.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.modules
            .values()
            .flat_map(|topics| topics.values())
            .map(|topic| topic.last_updated)
            .max()
    }
}
