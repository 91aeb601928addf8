use axum::Router;

pub fn create_test_app() -> Router {
    learnflow_progress::create_app()
}
