//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use hikyaku_server::{
    RelayOptions,
    domain::{MessageStore, UserId},
    error::ServerError,
    infrastructure::repository::InMemoryMessageStore,
    ui::{serve, start_relay, state::AppState},
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Relay server running on an ephemeral port with an in-memory store
pub struct TestServer {
    addr: SocketAddr,
    pub store: Arc<dyn MessageStore>,
    pub state: Arc<AppState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with_store(Arc::new(InMemoryMessageStore::new())).await
    }

    pub async fn start_with_store(store: Arc<dyn MessageStore>) -> Self {
        let options = RelayOptions {
            queue_capacity: 64,
            worker_count: 4,
            mailbox_capacity: 16,
        };
        let (state, pool) = start_relay(store.clone(), &options);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(serve(listener, state.clone(), pool, async move {
            let _ = shutdown_rx.await;
        }));

        Self {
            addr,
            store,
            state,
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self, user_id: &str) -> String {
        format!("ws://{}/ws/chat/{}", self.addr, user_id)
    }

    /// Trigger graceful shutdown and wait until the queue is drained.
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(5), self.task)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked")
            .expect("Server returned an error");
    }

    pub async fn connect(&self, user_id: &str) -> WsClient {
        let (ws, _response) = tokio_tungstenite::connect_async(self.ws_url(user_id))
            .await
            .expect("Failed to connect WebSocket");
        ws
    }

    pub async fn pending(&self, user_id: &str) -> usize {
        self.store
            .count_undelivered(&UserId::new(user_id.to_string()).unwrap())
            .await
            .expect("Failed to count pending messages")
    }

    /// Wait until `user_id` appears in the registry.
    pub async fn wait_online(&self, user_id: &str) {
        let user = UserId::new(user_id.to_string()).unwrap();
        poll(|| self.state.registry.lookup(&user).is_some()).await;
    }

    /// Wait until `user_id` has left the registry.
    pub async fn wait_offline(&self, user_id: &str) {
        let user = UserId::new(user_id.to_string()).unwrap();
        poll(|| self.state.registry.lookup(&user).is_none()).await;
    }

    /// Wait until `user_id` has exactly `expected` undelivered messages.
    pub async fn wait_pending(&self, user_id: &str, expected: usize) {
        for _ in 0..300 {
            if self.pending(user_id).await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("{user_id} never reached {expected} pending messages");
    }
}

/// Poll `condition` every 10ms for up to 3s.
async fn poll(mut condition: impl FnMut() -> bool) {
    for _ in 0..300 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("Condition not met within timeout");
}

pub async fn send_json(ws: &mut WsClient, value: serde_json::Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame parsed as JSON, failing after 3s.
pub async fn recv_json(ws: &mut WsClient) -> serde_json::Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(3), ws.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Stream ended")
            .expect("WebSocket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
        }
    }
}

/// Assert no text frame arrives within `window`.
pub async fn assert_silent(ws: &mut WsClient, window: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(window, ws.next()).await {
        panic!("Unexpected frame: {}", text.as_str());
    }
}
