//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    dispatcher::QueueSender,
    domain::MessageStore,
    infrastructure::connection::ConnectionRegistry,
};

/// Shared application state
///
/// Built once at startup and handed to every handler; the registry and the
/// queue are the only mutable state shared between connections and workers.
pub struct AppState {
    /// Live connections, one per online user
    pub registry: Arc<ConnectionRegistry>,
    /// Repository（データアクセス層の抽象化）
    pub store: Arc<dyn MessageStore>,
    /// Producer side of the delivery queue
    pub queue: QueueSender,
    /// Mailbox size of each new connection
    pub mailbox_capacity: usize,
}

impl AppState {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        store: Arc<dyn MessageStore>,
        queue: QueueSender,
        mailbox_capacity: usize,
    ) -> Self {
        Self {
            registry,
            store,
            queue,
            mailbox_capacity,
        }
    }
}
