pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::evaluation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Evaluation API
        .route("/api/v1/evaluations", post(handlers::handle_evaluate))
        .route("/api/v1/skill-match", post(handlers::handle_skill_match))
        // Session API
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/transcript",
            put(handlers::handle_set_transcript),
        )
        .route(
            "/api/v1/sessions/:id/evaluate",
            post(handlers::handle_evaluate_session),
        )
        .with_state(state)
}
