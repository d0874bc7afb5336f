//! Core domain models for the relay.

use super::value_object::{MessageId, MessageText, UserId};

/// A one-to-one message travelling through the relay
///
/// Everything except `delivered` is fixed at construction. `delivered` only
/// moves from false to true, after the backlog flush confirmed a send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned identifier; `None` until the message is persisted
    id: Option<MessageId>,
    sender: UserId,
    receiver: UserId,
    text: MessageText,
    delivered: bool,
}

impl Message {
    /// Create a new, not yet persisted message
    pub fn new(sender: UserId, receiver: UserId, text: MessageText) -> Self {
        Self {
            id: None,
            sender,
            receiver,
            text,
            delivered: false,
        }
    }

    /// Rebuild a message that was read back from the store
    pub fn restore(
        id: MessageId,
        sender: UserId,
        receiver: UserId,
        text: MessageText,
        delivered: bool,
    ) -> Self {
        Self {
            id: Some(id),
            sender,
            receiver,
            text,
            delivered,
        }
    }

    pub fn id(&self) -> Option<MessageId> {
        self.id
    }

    pub fn sender(&self) -> &UserId {
        &self.sender
    }

    pub fn receiver(&self) -> &UserId {
        &self.receiver
    }

    pub fn text(&self) -> &MessageText {
        &self.text
    }

    pub fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Flag the message as delivered. Calling it again has no effect.
    pub fn mark_delivered(&mut self) {
        self.delivered = true;
    }
}
