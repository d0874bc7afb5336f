//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{health_check, online_users, pending_count, send_message};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
