//! Append-only log of flagged struggle signals.
//!
//! Events are retained for instructor review and are never deduplicated;
//! repeat frequency is itself signal for the dashboard. An event's 1-based
//! position in the log doubles as its identifier.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StruggleEventType {
    RepeatedError,
    StuckExercise,
    LowQuizScore,
    FailedExecution,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown struggle event type: {0}")]
pub struct UnknownStruggleEventType(String);

impl FromStr for StruggleEventType {
    type Err = UnknownStruggleEventType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "repeated_error" => Ok(StruggleEventType::RepeatedError),
            "stuck_exercise" => Ok(StruggleEventType::StuckExercise),
            "low_quiz_score" => Ok(StruggleEventType::LowQuizScore),
            "failed_execution" => Ok(StruggleEventType::FailedExecution),
            other => Err(UnknownStruggleEventType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StruggleEvent {
    pub user_id: String,
    pub event_type: StruggleEventType,
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
}

#[derive(Debug, Default)]
pub struct StruggleLog {
    events: RwLock<Vec<StruggleEvent>>,
}

impl StruggleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new unresolved event and return its 1-based log position.
    pub fn record(
        &self,
        user_id: &str,
        event_type: StruggleEventType,
        details: serde_json::Value,
    ) -> usize {
        let mut events = self.events.write();
        events.push(StruggleEvent {
            user_id: user_id.to_string(),
            event_type,
            details,
            timestamp: Utc::now(),
            resolved: false,
        });
        events.len()
    }

    /// All events still awaiting resolution, in insertion order.
    ///
    /// The filter runs over the stored list each call, so repeated reads
    /// always reflect the current resolution state.
    pub fn unresolved(&self) -> Vec<StruggleEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| !event.resolved)
            .cloned()
            .collect()
    }

    /// Flip an event's resolved flag. Returns false for unknown ids.
    pub fn resolve(&self, event_id: usize) -> bool {
        let mut events = self.events.write();
        match event_id.checked_sub(1).and_then(|idx| events.get_mut(idx)) {
            Some(event) => {
                event.resolved = true;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_returns_one_based_positions() {
        let log = StruggleLog::new();
        assert!(log.is_empty());

        let first = log.record("u1", StruggleEventType::RepeatedError, json!({"errors": 3}));
        let second = log.record("u1", StruggleEventType::StuckExercise, json!({"minutes": 12}));

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_unresolved_preserves_insertion_order() {
        let log = StruggleLog::new();
        log.record("u1", StruggleEventType::RepeatedError, json!({}));
        log.record("u2", StruggleEventType::LowQuizScore, json!({}));

        let events = log.unresolved();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, StruggleEventType::RepeatedError);
        assert_eq!(events[1].event_type, StruggleEventType::LowQuizScore);
        assert!(events.iter().all(|event| !event.resolved));
    }

    #[test]
    fn test_identical_events_are_not_deduplicated() {
        let log = StruggleLog::new();
        log.record("u1", StruggleEventType::FailedExecution, json!({"exit": 1}));
        log.record("u1", StruggleEventType::FailedExecution, json!({"exit": 1}));

        assert_eq!(log.unresolved().len(), 2);
    }

    #[test]
    fn test_resolved_events_are_filtered_out() {
        let log = StruggleLog::new();
        let first = log.record("u1", StruggleEventType::RepeatedError, json!({}));
        log.record("u1", StruggleEventType::StuckExercise, json!({}));

        assert!(log.resolve(first));

        let events = log.unresolved();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, StruggleEventType::StuckExercise);
    }

    #[test]
    fn test_resolve_unknown_id_is_rejected() {
        let log = StruggleLog::new();
        log.record("u1", StruggleEventType::RepeatedError, json!({}));

        assert!(!log.resolve(0));
        assert!(!log.resolve(2));
        assert_eq!(log.unresolved().len(), 1);
    }
}
