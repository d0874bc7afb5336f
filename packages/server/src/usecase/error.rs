//! UseCase layer error definitions.

use thiserror::Error;

use crate::domain::{StoreError, UserId};

/// Errors from the dispatch decision
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The message could not be encoded as a frame
    #[error("failed to encode message for '{receiver}': {source}")]
    Encode {
        receiver: UserId,
        #[source]
        source: serde_json::Error,
    },

    /// Falling back to the store failed; the message is lost
    #[error("failed to persist message {sender} -> {receiver}: {source}")]
    Store {
        sender: UserId,
        receiver: UserId,
        #[source]
        source: StoreError,
    },
}

/// Errors from the connect-time backlog flush
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlushError {
    /// The backlog could not be read; nothing was sent
    #[error("failed to query backlog: {0}")]
    Query(#[source] StoreError),

    /// Messages were sent but could not be marked; they will be sent again
    #[error("failed to mark {sent} sent messages as delivered: {source}")]
    MarkDelivered {
        sent: usize,
        #[source]
        source: StoreError,
    },
}
