use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session state
        .route("/interview", get(handlers::get_interview))
        // Lifecycle control
        .route("/interview/start", post(handlers::start_interview))
        .route("/interview/leave", post(handlers::leave_interview))
        .route("/interview/restart", post(handlers::restart_interview))
        // Events forwarded from the media SDK
        .route("/interview/media-event", post(handlers::media_event))
        // The front-end is served from a different origin
        .layer(CorsLayer::permissive())
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
