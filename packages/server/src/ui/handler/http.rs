//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    dispatcher::QueueError,
    domain::{Message, UserId},
    infrastructure::dto::{
        http::{ErrorDto, OnlineUsersDto, PendingCountDto, StatusDto},
        websocket::MessageDto,
    },
    ui::state::AppState,
    usecase::ListOnlineUsersUseCase,
};

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// One-shot submission: queue a message without holding a connection
///
/// Goes through the same delivery queue and dispatch decision as messages
/// received over WebSocket. Waits while the queue is full.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MessageDto>, JsonRejection>,
) -> Response {
    let Json(dto) = match payload {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected unparsable send request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request");
        }
    };

    let message = match Message::try_from(dto) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected invalid send request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid request");
        }
    };

    tracing::info!(
        sender = %message.sender(),
        receiver = %message.receiver(),
        "Message submitted over HTTP"
    );

    match state.queue.enqueue(message).await {
        Ok(()) => Json(StatusDto {
            status: "Message processed".to_string(),
        })
        .into_response(),
        Err(QueueError::Closed) => {
            error_response(StatusCode::SERVICE_UNAVAILABLE, "Relay is shutting down")
        }
    }
}

/// Currently connected users
pub async fn online_users(State(state): State<Arc<AppState>>) -> Json<OnlineUsersDto> {
    let online_users: Vec<String> = ListOnlineUsersUseCase::new(state.registry.clone())
        .execute()
        .into_iter()
        .map(UserId::into_string)
        .collect();

    Json(OnlineUsersDto {
        count: online_users.len(),
        online_users,
    })
}

/// Number of messages waiting for a user's next connection
pub async fn pending_count(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Response {
    let user_id = match UserId::try_from(user_id) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!(error = %e, "Invalid user id in pending count request");
            return error_response(StatusCode::BAD_REQUEST, "Invalid user id");
        }
    };

    let counted = state.store.count_undelivered(&user_id).await;
    match counted {
        Ok(pending) => Json(PendingCountDto {
            user_id: user_id.into_string(),
            pending,
        })
        .into_response(),
        Err(e) => {
            tracing::error!(%user_id, error = %e, "Failed to count pending messages");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Store unavailable")
        }
    }
}
