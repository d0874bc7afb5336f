//! Hikyaku message relay.
//!
//! Clients hold a WebSocket per user id. Messages for connected users are
//! delivered immediately; messages for disconnected users are stored and
//! flushed when the user next connects.
//!
//! Layers follow the usual split: `domain` (messages and the store contract),
//! `usecase` (dispatch decision, connect/disconnect, backlog flush),
//! `dispatcher` (bounded queue and worker pool), `infrastructure` (stores,
//! connection registry, DTOs) and `ui` (axum handlers and lifecycle).

pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{RelayOptions, ServerConfig};
pub use ui::run as run_server;
