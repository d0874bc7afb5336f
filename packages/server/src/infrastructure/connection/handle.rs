//! Per-connection send endpoint.
//!
//! Every frame bound for a connection goes through that connection's mailbox
//! and is written by a single writer task ([`drive_outbox`]). Workers, the
//! backlog flush and anything else holding a [`ConnectionHandle`] only enqueue,
//! so one socket never sees two concurrent writers.
//!
//! A send resolves only once the writer has acknowledged the frame, so callers
//! learn whether the write to the socket actually succeeded.

use std::fmt::Display;

use futures_util::{Sink, SinkExt, pin_mut};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, ConnectionIdFactory, Timestamp, UserId};

/// Default number of frames that may wait in one connection's mailbox
pub const DEFAULT_MAILBOX_CAPACITY: usize = 64;

/// Errors returned when a frame cannot be written to a connection
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SendError {
    /// The writer task is gone; the connection is closed
    #[error("connection is closed")]
    Closed,

    /// The underlying transport rejected the write
    #[error("transport write failed: {0}")]
    Transport(String),
}

/// A frame waiting in a connection's mailbox, with its acknowledgement slot
#[derive(Debug)]
pub struct OutboundFrame {
    payload: String,
    ack: oneshot::Sender<Result<(), SendError>>,
}

impl OutboundFrame {
    /// Split into the payload and the acknowledgement slot.
    pub fn into_parts(self) -> (String, FrameAck) {
        (self.payload, FrameAck(self.ack))
    }
}

/// Acknowledgement slot of one outbound frame
#[derive(Debug)]
pub struct FrameAck(oneshot::Sender<Result<(), SendError>>);

impl FrameAck {
    /// Report the write outcome back to the sender.
    pub fn ack(self, result: Result<(), SendError>) {
        // the sender may have given up waiting
        let _ = self.0.send(result);
    }
}

/// Cloneable send endpoint of one live connection
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    user_id: UserId,
    connected_at: Timestamp,
    mailbox: mpsc::Sender<OutboundFrame>,
}

impl ConnectionHandle {
    /// Create a handle and the outbox its writer task drains.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner of the connection
    /// * `mailbox_capacity` - Frames that may wait for the writer before senders block
    pub fn channel(user_id: UserId, mailbox_capacity: usize) -> (Self, Outbox) {
        let (tx, rx) = mpsc::channel(mailbox_capacity.max(1));
        let handle = Self {
            id: ConnectionIdFactory::generate(),
            user_id,
            connected_at: Timestamp::new(hikyaku_shared::time::get_jst_timestamp()),
            mailbox: tx,
        };
        (handle, Outbox { rx })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// When the connection was opened, as RFC 3339 in JST.
    pub fn connected_since(&self) -> String {
        hikyaku_shared::time::timestamp_to_jst_rfc3339(self.connected_at.value())
    }

    /// Queue a frame and wait until the writer has written it.
    pub async fn send(&self, payload: String) -> Result<(), SendError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.mailbox
            .send(OutboundFrame {
                payload,
                ack: ack_tx,
            })
            .await
            .map_err(|_| SendError::Closed)?;

        // Writer dropped the frame without acknowledging: it stopped mid-queue
        ack_rx.await.map_err(|_| SendError::Closed)?
    }
}

/// Receiving side of a connection's mailbox, owned by its writer task
#[derive(Debug)]
pub struct Outbox {
    rx: mpsc::Receiver<OutboundFrame>,
}

impl Outbox {
    /// Next frame to write, or `None` once every handle is dropped.
    pub async fn recv(&mut self) -> Option<OutboundFrame> {
        self.rx.recv().await
    }

    /// Stop accepting frames. Frames already queued can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Writer loop: the only place that writes to a connection's transport.
///
/// Writes frames in mailbox order and acknowledges each one. Stops at the first
/// failed write; frames still queued are then dropped, which their senders see
/// as [`SendError::Closed`].
pub async fn drive_outbox<S>(sink: S, mut outbox: Outbox)
where
    S: Sink<String>,
    S::Error: Display,
{
    pin_mut!(sink);

    while let Some(frame) = outbox.recv().await {
        let (payload, ack) = frame.into_parts();
        match sink.send(payload).await {
            Ok(()) => ack.ack(Ok(())),
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(error = %reason, "Connection write failed, stopping writer");
                ack.ack(Err(SendError::Transport(reason)));
                break;
            }
        }
    }

    outbox.close();
}
