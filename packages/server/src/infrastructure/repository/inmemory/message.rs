//! InMemory Message Store 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! Vec を追記ログとして使用します。再起動で内容は失われるため、
//! テストと `--in-memory` モード専用です。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Message, MessageId, MessageStore, MessageText, StoreError, UserId};

#[derive(Debug, Default)]
struct Log {
    rows: Vec<Message>,
    last_id: i64,
}

/// インメモリ Message Store 実装
#[derive(Debug, Default)]
pub struct InMemoryMessageStore {
    log: Mutex<Log>,
}

impl InMemoryMessageStore {
    /// 新しい InMemoryMessageStore を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(
        &self,
        sender: &UserId,
        receiver: &UserId,
        text: &MessageText,
    ) -> Result<MessageId, StoreError> {
        let mut log = self.log.lock().await;
        let id = MessageId::new(log.last_id + 1).map_err(|e| StoreError::Backend(e.to_string()))?;
        log.last_id = id.value();
        log.rows.push(Message::restore(
            id,
            sender.clone(),
            receiver.clone(),
            text.clone(),
            false,
        ));
        Ok(id)
    }

    async fn query_undelivered(&self, receiver: &UserId) -> Result<Vec<Message>, StoreError> {
        let log = self.log.lock().await;
        Ok(log
            .rows
            .iter()
            .filter(|m| m.receiver() == receiver && !m.is_delivered())
            .cloned()
            .collect())
    }

    async fn mark_delivered(&self, ids: &[MessageId]) -> Result<(), StoreError> {
        let mut log = self.log.lock().await;
        for message in log.rows.iter_mut() {
            if message.id().is_some_and(|id| ids.contains(&id)) {
                message.mark_delivered();
            }
        }
        Ok(())
    }

    async fn count_undelivered(&self, receiver: &UserId) -> Result<usize, StoreError> {
        let log = self.log.lock().await;
        Ok(log
            .rows
            .iter()
            .filter(|m| m.receiver() == receiver && !m.is_delivered())
            .count())
    }
}
