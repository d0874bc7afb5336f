//! Persistent store abstraction.
//!
//! The domain defines the contract; `infrastructure::repository` provides the
//! SQLite and in-memory implementations (dependency inversion).

use async_trait::async_trait;

use super::{Message, MessageId, MessageText, StoreError, UserId};

/// Durable log of messages that could not be delivered live
///
/// Implementations must accept concurrent callers: the worker pool appends
/// while backlog flushes query and mark in parallel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append an undelivered message and return its assigned id
    async fn append(
        &self,
        sender: &UserId,
        receiver: &UserId,
        text: &MessageText,
    ) -> Result<MessageId, StoreError>;

    /// All undelivered messages for `receiver`, in insertion order
    async fn query_undelivered(&self, receiver: &UserId) -> Result<Vec<Message>, StoreError>;

    /// Mark exactly the given messages as delivered, as one batch
    async fn mark_delivered(&self, ids: &[MessageId]) -> Result<(), StoreError>;

    /// Number of undelivered messages waiting for `receiver`
    async fn count_undelivered(&self, receiver: &UserId) -> Result<usize, StoreError>;
}
