//! Bounded delivery queue.
//!
//! Multi-producer, multi-consumer: producers hold cloned [`QueueSender`]s, the
//! worker pool shares one [`QueueReceiver`]. Enqueueing waits for free
//! capacity when the queue is full; nothing is dropped. Once shutdown begins
//! the queue stops accepting messages and reports [`QueueError::Closed`].

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, mpsc, watch};

use crate::domain::Message;

/// Default queue capacity, sized to absorb bursts of offline traffic
pub const DEFAULT_QUEUE_CAPACITY: usize = 5_000;

/// Errors returned when enqueueing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue no longer accepts messages (shutdown in progress)
    #[error("delivery queue is closed")]
    Closed,
}

/// Constructor for the delivery queue halves
pub struct DeliveryQueue;

impl DeliveryQueue {
    /// Create a queue holding at most `capacity` messages.
    pub fn bounded(capacity: usize) -> (QueueSender, QueueReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            QueueSender { tx },
            QueueReceiver {
                rx: Arc::new(Mutex::new(rx)),
            },
        )
    }
}

/// Producer side of the delivery queue
#[derive(Debug, Clone)]
pub struct QueueSender {
    tx: mpsc::Sender<Message>,
}

impl QueueSender {
    /// Enqueue a message, waiting while the queue is full.
    pub async fn enqueue(&self, message: Message) -> Result<(), QueueError> {
        self.tx.send(message).await.map_err(|_| QueueError::Closed)
    }

}

/// Consumer side of the delivery queue, shared by all workers
#[derive(Debug, Clone)]
pub struct QueueReceiver {
    rx: Arc<Mutex<mpsc::Receiver<Message>>>,
}

impl QueueReceiver {
    /// Next message to dispatch.
    ///
    /// When `shutdown` fires the queue is closed to producers and the
    /// remaining messages are handed out until it is empty, then `None`.
    pub async fn next(&self, shutdown: &mut watch::Receiver<bool>) -> Option<Message> {
        let mut rx = self.rx.lock().await;

        if *shutdown.borrow() {
            rx.close();
            return rx.recv().await;
        }

        tokio::select! {
            biased;
            message = rx.recv() => message,
            _ = shutdown.changed() => {
                rx.close();
                rx.recv().await
            }
        }
    }
}
