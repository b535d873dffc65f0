pub mod health;
pub mod web;

use axum::{
    routing::{get, post},
    Router,
};

use crate::feedback::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // JSON API
        .route(
            "/generate-feedback",
            post(handlers::handle_generate_feedback),
        )
        .route("/batch-feedback", post(handlers::handle_batch_feedback))
        .route("/feedback", get(handlers::handle_list_feedback))
        .route("/feedback/:id", get(handlers::handle_get_feedback))
        // Server-rendered web form
        .route("/", get(web::index))
        .route("/generate", post(web::generate))
        .route("/history", get(web::history))
        .with_state(state)
}
