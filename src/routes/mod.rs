mod health;
mod progress;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/health", health::router())
        .merge(progress::router())
        .fallback(fallback_handler)
        .with_state(state)
}

#[derive(Serialize)]
struct RootResponse {
    message: String,
    purpose: &'static str,
}

async fn root() -> Response {
    Json(RootResponse {
        message: format!("Welcome to {}", health::SERVICE_NAME),
        purpose: "Student progress tracking and struggle detection for LearnFlow",
    })
    .into_response()
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
