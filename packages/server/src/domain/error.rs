//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// UserId validation error
    #[error("UserId cannot be empty")]
    UserIdEmpty,

    /// UserId too long error
    #[error("UserId cannot exceed {max} characters (got {actual})")]
    UserIdTooLong { max: usize, actual: usize },

    /// MessageText too long error
    #[error("MessageText cannot exceed {max} characters (got {actual})")]
    MessageTextTooLong { max: usize, actual: usize },

    /// MessageId must be assigned by the store
    #[error("MessageId must be positive (got {0})")]
    MessageIdNotPositive(i64),
}

/// Errors returned by a persistent message store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The storage backend rejected or failed the operation
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored row could not be turned back into a domain message
    #[error("corrupt stored message {id}: {reason}")]
    CorruptRow { id: i64, reason: String },

    /// The blocking storage task panicked or was cancelled
    #[error("storage task failed: {0}")]
    Task(String),
}
