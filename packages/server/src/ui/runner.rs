//! Server startup and shutdown sequence.

use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;

use super::{router::build_router, signal::shutdown_signal, state::AppState};
use crate::{
    config::{RelayOptions, ServerConfig},
    dispatcher::{DeliveryQueue, WorkerPool},
    domain::MessageStore,
    error::ServerError,
    infrastructure::{
        connection::ConnectionRegistry,
        repository::{InMemoryMessageStore, SqliteMessageStore},
    },
    usecase::DispatchMessageUseCase,
};

/// Wire the registry, queue and worker pool around a store.
///
/// Returns the state shared by all handlers and the running worker pool.
pub fn start_relay(
    store: Arc<dyn MessageStore>,
    options: &RelayOptions,
) -> (Arc<AppState>, WorkerPool) {
    let registry = Arc::new(ConnectionRegistry::new());
    let (queue_tx, queue_rx) = DeliveryQueue::bounded(options.queue_capacity);

    let dispatcher = Arc::new(DispatchMessageUseCase::new(
        registry.clone(),
        store.clone(),
    ));
    let pool = WorkerPool::spawn(options.worker_count, queue_rx, dispatcher);

    let state = Arc::new(AppState::new(
        registry,
        store,
        queue_tx,
        options.mailbox_capacity,
    ));
    (state, pool)
}

/// Serve HTTP/WebSocket traffic until `shutdown` resolves, then drain the
/// delivery queue and stop the workers.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    pool: WorkerPool,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    tracing::info!("HTTP server stopped, draining delivery queue");
    pool.shutdown().await;

    served.map_err(ServerError::from)
}

/// Run the relay server with the given configuration.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    tracing::info!("Hikyaku relay v{} starting", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn MessageStore> = if config.in_memory {
        tracing::warn!("Using in-memory store: offline messages are lost on restart");
        Arc::new(InMemoryMessageStore::new())
    } else {
        Arc::new(SqliteMessageStore::open(&config.database)?)
    };

    let (state, pool) = start_relay(store, &config.relay_options());

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    serve(listener, state, pool, shutdown_signal()).await
}
