//! Route table.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{
    handler::{health_check, online_users, pending_count, send_message, websocket_handler},
    state::AppState,
};

/// Build the relay's router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws/chat/{id}", get(websocket_handler))
        .route("/send", post(send_message))
        .route("/online", get(online_users))
        .route("/api/health", get(health_check))
        .route("/api/users/{id}/pending", get(pending_count))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
