//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    future,
    sink::SinkExt,
    stream::{SplitStream, StreamExt},
};

use crate::{
    dispatcher::QueueSender,
    domain::UserId,
    infrastructure::{
        connection::{ConnectionHandle, drive_outbox},
        dto::websocket::decode_frame,
    },
    ui::state::AppState,
    usecase::{ConnectUserUseCase, DisconnectUserUseCase},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, StatusCode> {
    let user_id = match UserId::try_from(user_id.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid user id '{}': {}", user_id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, user_id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: UserId) {
    let (ws_sender, ws_receiver) = socket.split();

    // The writer task is the only writer of this socket; everything else
    // sends through the handle's mailbox.
    let (handle, outbox) = ConnectionHandle::channel(user_id, state.mailbox_capacity);
    let sink = ws_sender.with(|text: String| {
        future::ready(Ok::<Message, axum::Error>(Message::Text(text.into())))
    });
    let mut send_task = tokio::spawn(drive_outbox(sink, outbox));

    // Register and flush the backlog before reading anything from the client
    let connect_usecase = ConnectUserUseCase::new(state.registry.clone(), state.store.clone());
    if let Err(e) = connect_usecase.execute(&handle).await {
        tracing::error!(user_id = %handle.user_id(), error = %e, "Backlog flush failed");
    }

    let mut recv_task = tokio::spawn(receive_loop(
        ws_receiver,
        state.queue.clone(),
        handle.user_id().clone(),
    ));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    DisconnectUserUseCase::new(state.registry.clone()).execute(&handle);
}

/// Read frames from the client and hand decoded messages to the delivery queue.
async fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    queue: QueueSender,
    user_id: UserId,
) {
    while let Some(frame) = receiver.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "WebSocket read failed");
                break;
            }
        };

        match frame {
            Message::Text(text) => {
                let message = match decode_frame(text.as_str()) {
                    Ok(message) => message,
                    Err(e) => {
                        tracing::warn!(%user_id, error = %e, "Dropping undecodable frame");
                        continue;
                    }
                };

                tracing::info!(
                    sender = %message.sender(),
                    receiver = %message.receiver(),
                    "Message received"
                );

                if let Err(e) = queue.enqueue(message).await {
                    tracing::warn!(%user_id, error = %e, "Message rejected, closing connection");
                    break;
                }
            }
            Message::Ping(_) => {
                tracing::debug!(%user_id, "Received ping");
                // Ping/pong is handled automatically by the WebSocket protocol
            }
            Message::Close(_) => {
                tracing::info!(%user_id, "Client requested close");
                break;
            }
            _ => {}
        }
    }
}
