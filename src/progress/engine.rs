//! In-memory mastery scoring engine.
//!
//! The engine owns every `UserProgress` instance. Each user's record sits
//! behind its own async mutex so the read-modify-write of an activity update
//! (topic mutation plus full `overall_mastery` recomputation) is serialized
//! per user, while updates for different users proceed in parallel. The
//! outer map is only locked long enough to look up or create an entry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::progress::types::{ActivityType, TopicProgress, UserProgress};

/// Result of one activity update: the mutated topic plus the refreshed
/// user-level aggregate.
#[derive(Debug, Clone)]
pub struct ActivityOutcome {
    pub topic: TopicProgress,
    pub overall_mastery: f64,
}

#[derive(Debug, Default)]
pub struct ProgressEngine {
    users: RwLock<HashMap<String, Arc<Mutex<UserProgress>>>>,
}

impl ProgressEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one activity outcome to `(user_id, module, topic)`.
    ///
    /// Missing users, modules, and topics are first-use, never errors: the
    /// entry is created with all scores at zero. `score` must be in [0, 1];
    /// the HTTP boundary rejects anything else before it reaches here.
    pub async fn record_activity(
        &self,
        user_id: &str,
        module: &str,
        topic: &str,
        activity: ActivityType,
        score: f64,
    ) -> ActivityOutcome {
        let entry = self.user_entry(user_id).await;
        let mut user = entry.lock().await;

        let now = Utc::now();
        let topic_progress = user.topic_mut(module, topic, now);
        topic_progress.apply(activity, score, now);
        let snapshot = topic_progress.clone();

        let overall_mastery = user.recompute_overall();

        tracing::debug!(
            user_id,
            module,
            topic,
            activity = activity.as_str(),
            mastery = snapshot.mastery_score,
            overall = overall_mastery,
            "activity recorded"
        );

        ActivityOutcome {
            topic: snapshot,
            overall_mastery,
        }
    }

    /// Read path for progress queries. Unknown users get the empty default
    /// (no modules, overall 0.0) rather than an error.
    pub async fn get_progress(&self, user_id: &str) -> UserProgress {
        match self.lookup(user_id).await {
            Some(entry) => entry.lock().await.clone(),
            None => UserProgress::new(user_id),
        }
    }

    /// User-level aggregate on its own; 0.0 for untracked users.
    pub async fn overall_mastery(&self, user_id: &str) -> f64 {
        match self.lookup(user_id).await {
            Some(entry) => entry.lock().await.overall_mastery,
            None => 0.0,
        }
    }

    /// Snapshot of every tracked user, for class-wide reporting.
    pub async fn all_users(&self) -> Vec<UserProgress> {
        let entries: Vec<Arc<Mutex<UserProgress>>> =
            self.users.read().await.values().map(Arc::clone).collect();

        let mut out = Vec::with_capacity(entries.len());
        for entry in entries {
            out.push(entry.lock().await.clone());
        }
        out
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    async fn lookup(&self, user_id: &str) -> Option<Arc<Mutex<UserProgress>>> {
        self.users.read().await.get(user_id).map(Arc::clone)
    }

    async fn user_entry(&self, user_id: &str) -> Arc<Mutex<UserProgress>> {
        if let Some(entry) = self.lookup(user_id).await {
            return entry;
        }

        let mut users = self.users.write().await;
        Arc::clone(
            users
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(UserProgress::new(user_id)))),
        )
    }
}
