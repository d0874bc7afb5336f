//! Live connection plumbing: per-connection send actors and the registry.

pub mod handle;
pub mod registry;

pub use handle::{
    ConnectionHandle, DEFAULT_MAILBOX_CAPACITY, FrameAck, OutboundFrame, Outbox, SendError,
    drive_outbox,
};
pub use registry::ConnectionRegistry;
