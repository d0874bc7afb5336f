//! Fixed-size worker pool draining the delivery queue.

use std::sync::Arc;

use tokio::{sync::watch, task::JoinHandle};

use super::queue::QueueReceiver;
use crate::usecase::DispatchMessageUseCase;

/// Default number of workers; bounds concurrent outbound sends
pub const DEFAULT_WORKER_COUNT: usize = 50;

/// Pool of symmetric dispatch workers
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
}

impl WorkerPool {
    /// Spawn `size` workers on the current runtime.
    pub fn spawn(
        size: usize,
        receiver: QueueReceiver,
        dispatcher: Arc<DispatchMessageUseCase>,
    ) -> Self {
        let size = size.max(1);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handles = (0..size)
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    receiver.clone(),
                    shutdown_rx.clone(),
                    dispatcher.clone(),
                ))
            })
            .collect();

        tracing::info!(workers = size, "Worker pool started");

        Self {
            handles,
            shutdown_tx,
        }
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Clean stop: close the queue, dispatch everything still buffered, then
    /// wait for every worker to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);

        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Worker task failed");
            }
        }

        tracing::info!("Worker pool stopped");
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: QueueReceiver,
    mut shutdown: watch::Receiver<bool>,
    dispatcher: Arc<DispatchMessageUseCase>,
) {
    while let Some(message) = receiver.next(&mut shutdown).await {
        if let Err(e) = dispatcher.execute(message).await {
            // best effort: a message that fails to persist is dropped
            tracing::error!(worker_id, error = %e, "Dispatch failed, message abandoned");
        }
    }

    tracing::debug!(worker_id, "Worker exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dispatcher::DeliveryQueue,
        domain::{Message, MessageStore, MessageText, UserId},
        infrastructure::{
            connection::{ConnectionHandle, ConnectionRegistry},
            repository::InMemoryMessageStore,
        },
    };

    fn message(sender: &str, receiver: &str, text: &str) -> Message {
        Message::new(
            UserId::new(sender.to_string()).unwrap(),
            UserId::new(receiver.to_string()).unwrap(),
            MessageText::new(text.to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_shutdown_dispatches_every_queued_message() {
        // テスト項目: シャットダウン時にキューに残ったメッセージが全て処理される
        // given (前提条件): 受信者はオフライン
        let registry = Arc::new(ConnectionRegistry::new());
        let store = Arc::new(InMemoryMessageStore::new());
        let dispatcher = Arc::new(DispatchMessageUseCase::new(registry, store.clone()));
        let (sender, receiver) = DeliveryQueue::bounded(100);
        for i in 0..20 {
            sender
                .enqueue(message("alice", "bob", &format!("msg-{i}")))
                .await
                .unwrap();
        }

        // when (操作):
        let pool = WorkerPool::spawn(4, receiver, dispatcher);
        assert_eq!(pool.size(), 4);
        pool.shutdown().await;

        // then (期待する結果): 全件がストアに保存されている
        let bob = UserId::new("bob".to_string()).unwrap();
        assert_eq!(store.count_undelivered(&bob).await.unwrap(), 20);
        assert!(sender.enqueue(message("alice", "bob", "late")).await.is_err());
    }

    #[tokio::test]
    async fn test_workers_deliver_to_online_receiver() {
        // テスト項目: オンラインの受信者にはワーカー経由で即時配信される
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let store = Arc::new(InMemoryMessageStore::new());
        let (handle, mut outbox) =
            ConnectionHandle::channel(UserId::new("bob".to_string()).unwrap(), 8);
        registry.register(handle);
        let dispatcher = Arc::new(DispatchMessageUseCase::new(registry, store.clone()));
        let (sender, receiver) = DeliveryQueue::bounded(10);
        let pool = WorkerPool::spawn(2, receiver, dispatcher);

        // when (操作):
        sender.enqueue(message("alice", "bob", "hi")).await.unwrap();

        // then (期待する結果):
        let frame = outbox.recv().await.unwrap();
        let (payload, ack) = frame.into_parts();
        ack.ack(Ok(()));
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["text"], "hi");

        pool.shutdown().await;
        let bob = UserId::new("bob".to_string()).unwrap();
        assert_eq!(store.count_undelivered(&bob).await.unwrap(), 0);
    }
}
