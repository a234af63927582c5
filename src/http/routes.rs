use super::handlers;
use super::state::BackendState;
use crate::config::ApiConfig;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the development backend router, mounting each endpoint at the
/// path the client is configured to call
pub fn create_router(api: &ApiConfig, state: BackendState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(&api.question_path, get(handlers::get_question))
        .route(&api.emotion_path, post(handlers::process_emotion))
        .route(&api.submit_path, post(handlers::submit_answer))
        .route(&api.resume_path, post(handlers::upload_resume))
        // The practice page is served from another origin during development
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
