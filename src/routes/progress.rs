//! Inbound surface for activity tracking, struggle signals, and the
//! teacher-dashboard overview. Class-wide aggregation happens here, not in
//! the engine: the overview is a consumer of per-user state.

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::progress::{ActivityType, StruggleEvent, StruggleEventType, UserProgress};
use crate::response::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/track", post(track_activity))
        .route("/detect-struggle", post(detect_struggle))
        .route("/progress/:user_id", get(get_progress))
        .route("/class-overview", get(class_overview))
}

#[derive(Debug, Deserialize)]
struct ProgressUpdateRequest {
    user_id: String,
    module: String,
    topic: String,
    activity_type: String,
    score: f64,
    #[serde(default)]
    #[allow(dead_code)]
    details: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ProgressUpdateResponse {
    user_id: String,
    module: String,
    topic: String,
    mastery_score: f64,
    exercise_completion: f64,
    quiz_score: f64,
    code_quality: f64,
    consistency_score: f64,
    last_updated: DateTime<Utc>,
    overall_mastery: f64,
}

#[derive(Debug, Deserialize)]
struct StruggleDetectionRequest {
    user_id: String,
    event_type: String,
    #[serde(default)]
    details: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct StruggleDetectionResponse {
    status: &'static str,
    event_id: usize,
}

#[derive(Debug, Serialize)]
struct ClassOverviewResponse {
    class_stats: ClassStats,
    student_progress: Vec<StudentSummary>,
    struggle_alerts: Vec<StruggleEvent>,
}

#[derive(Debug, Serialize)]
struct ClassStats {
    total_students: usize,
    avg_mastery: f64,
    active_students: usize,
}

#[derive(Debug, Serialize)]
struct StudentSummary {
    user_id: String,
    overall_mastery: f64,
    modules_completed: usize,
}

async fn track_activity(
    State(state): State<AppState>,
    Json(request): Json<ProgressUpdateRequest>,
) -> Response {
    if request.user_id.trim().is_empty() {
        return AppError::validation("user_id must not be empty").into_response();
    }

    let activity: ActivityType = match request.activity_type.parse() {
        Ok(activity) => activity,
        Err(err) => return AppError::validation(err.to_string()).into_response(),
    };

    if !(0.0..=1.0).contains(&request.score) {
        return AppError::validation(format!(
            "score must be within [0, 1], got {}",
            request.score
        ))
        .into_response();
    }

    let outcome = state
        .engine()
        .record_activity(
            &request.user_id,
            &request.module,
            &request.topic,
            activity,
            request.score,
        )
        .await;

    Json(ProgressUpdateResponse {
        user_id: request.user_id,
        module: request.module,
        topic: request.topic,
        mastery_score: outcome.topic.mastery_score,
        exercise_completion: outcome.topic.exercise_completion,
        quiz_score: outcome.topic.quiz_score,
        code_quality: outcome.topic.code_quality,
        consistency_score: outcome.topic.consistency_score,
        last_updated: outcome.topic.last_updated,
        overall_mastery: outcome.overall_mastery,
    })
    .into_response()
}

async fn detect_struggle(
    State(state): State<AppState>,
    Json(request): Json<StruggleDetectionRequest>,
) -> Response {
    if request.user_id.trim().is_empty() {
        return AppError::validation("user_id must not be empty").into_response();
    }

    let event_type: StruggleEventType = match request.event_type.parse() {
        Ok(event_type) => event_type,
        Err(err) => return AppError::validation(err.to_string()).into_response(),
    };

    let event_id = state
        .struggle_log()
        .record(&request.user_id, event_type, request.details);

    tracing::info!(user_id = %request.user_id, event_id, "struggle event recorded");

    Json(StruggleDetectionResponse {
        status: "struggle_detected",
        event_id,
    })
    .into_response()
}

async fn get_progress(State(state): State<AppState>, Path(user_id): Path<String>) -> Response {
    let progress: UserProgress = state.engine().get_progress(&user_id).await;
    Json(progress).into_response()
}

async fn class_overview(State(state): State<AppState>) -> Response {
    let users = state.engine().all_users().await;

    let total_students = users.len();
    let avg_mastery = if total_students == 0 {
        0.0
    } else {
        users.iter().map(|u| u.overall_mastery).sum::<f64>() / total_students as f64
    };

    let cutoff = Utc::now() - state.activity_window();
    let active_students = users
        .iter()
        .filter(|user| user.last_activity().is_some_and(|at| at >= cutoff))
        .count();

    let student_progress = users
        .iter()
        .map(|user| StudentSummary {
            user_id: user.user_id.clone(),
            overall_mastery: user.overall_mastery,
            modules_completed: user.modules.len(),
        })
        .collect();

    Json(ClassOverviewResponse {
        class_stats: ClassStats {
            total_students,
            avg_mastery,
            active_students,
        },
        student_progress,
        struggle_alerts: state.struggle_log().unresolved(),
    })
    .into_response()
}
