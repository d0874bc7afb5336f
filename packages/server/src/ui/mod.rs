//! Relay server surface: HTTP and WebSocket handlers, routing and lifecycle.

mod handler;
mod router;
mod runner;
mod signal;
pub mod state;

pub use router::build_router;
pub use runner::{run, serve, start_relay};
pub use signal::shutdown_signal;
