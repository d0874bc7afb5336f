//! SQLite Message Store 実装
//!
//! rusqlite is synchronous: the connection lives behind `Arc<Mutex<_>>` and
//! every operation runs on the blocking pool via `spawn_blocking`.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use rusqlite::{Connection, params, params_from_iter};

use super::migrations::migrations;
use crate::domain::{Message, MessageId, MessageStore, MessageText, StoreError, UserId};

/// Upper bound of ids bound into one `UPDATE ... IN (...)` statement
const MARK_CHUNK_SIZE: usize = 500;

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// SQLite-backed durable message log
#[derive(Debug, Clone)]
pub struct SqliteMessageStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMessageStore {
    /// Open (or create) the database file, enable WAL mode and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
        }

        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;
        tracing::info!(path = %path.display(), "Message store opened");
        Ok(store)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(mut conn: Connection) -> Result<Self, StoreError> {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        tracing::debug!(journal_mode = %mode, "SQLite journal mode set");

        migrations()
            .to_latest(&mut conn)
            .map_err(|e| StoreError::Backend(format!("migration failed: {e}")))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Backend("connection mutex poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

/// Raw row as read from `messages`
struct MessageRow {
    id: i64,
    sender_id: String,
    receiver_id: String,
    text: String,
    is_read: bool,
}

impl TryFrom<MessageRow> for Message {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let row_id = row.id;
        let corrupt = |reason: String| StoreError::CorruptRow { id: row_id, reason };
        let id = MessageId::new(row_id).map_err(|e| corrupt(e.to_string()))?;
        let sender = UserId::new(row.sender_id).map_err(|e| corrupt(e.to_string()))?;
        let receiver = UserId::new(row.receiver_id).map_err(|e| corrupt(e.to_string()))?;
        let text = MessageText::new(row.text).map_err(|e| corrupt(e.to_string()))?;
        Ok(Message::restore(id, sender, receiver, text, row.is_read))
    }
}

#[async_trait]
impl MessageStore for SqliteMessageStore {
    async fn append(
        &self,
        sender: &UserId,
        receiver: &UserId,
        text: &MessageText,
    ) -> Result<MessageId, StoreError> {
        let (sender, receiver, text) = (
            sender.as_str().to_string(),
            receiver.as_str().to_string(),
            text.as_str().to_string(),
        );

        let raw_id = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT INTO messages (sender_id, receiver_id, text) VALUES (?1, ?2, ?3)",
                    params![sender, receiver, text],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await?;

        MessageId::new(raw_id).map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn query_undelivered(&self, receiver: &UserId) -> Result<Vec<Message>, StoreError> {
        let receiver = receiver.as_str().to_string();

        let rows = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, sender_id, receiver_id, text, is_read
                     FROM messages
                     WHERE receiver_id = ?1 AND is_read = FALSE
                     ORDER BY id ASC",
                )?;
                let rows = stmt
                    .query_map(params![receiver], |row| {
                        Ok(MessageRow {
                            id: row.get(0)?,
                            sender_id: row.get(1)?,
                            receiver_id: row.get(2)?,
                            text: row.get(3)?,
                            is_read: row.get(4)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        // A row that no longer validates must not hold back the rest of the backlog
        let messages = rows
            .into_iter()
            .filter_map(|row| match Message::try_from(row) {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable stored message");
                    None
                }
            })
            .collect();
        Ok(messages)
    }

    async fn mark_delivered(&self, ids: &[MessageId]) -> Result<(), StoreError> {
        if ids.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = ids.iter().map(|id| id.value()).collect();

        let updated = self
            .with_conn(move |conn| {
                let tx = conn.transaction()?;
                let mut updated = 0;
                for chunk in ids.chunks(MARK_CHUNK_SIZE) {
                    let placeholders = vec!["?"; chunk.len()].join(",");
                    let sql =
                        format!("UPDATE messages SET is_read = TRUE WHERE id IN ({placeholders})");
                    updated += tx.execute(&sql, params_from_iter(chunk.iter()))?;
                }
                tx.commit()?;
                Ok(updated)
            })
            .await?;

        tracing::debug!(updated, "Messages marked delivered");
        Ok(())
    }

    async fn count_undelivered(&self, receiver: &UserId) -> Result<usize, StoreError> {
        let receiver = receiver.as_str().to_string();

        let count: i64 = self
            .with_conn(move |conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND is_read = FALSE",
                    params![receiver],
                    |row| row.get(0),
                )?)
            })
            .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}
