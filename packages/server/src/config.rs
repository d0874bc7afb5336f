//! Server configuration from command-line flags and `HIKYAKU_*` environment variables.

use std::path::PathBuf;

use clap::Parser;

use crate::{
    dispatcher::{DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKER_COUNT},
    infrastructure::connection::DEFAULT_MAILBOX_CAPACITY,
};

/// Hikyaku message relay server
#[derive(Parser, Debug, Clone)]
#[command(name = "hikyaku-server", version, about = "Hikyaku message relay server")]
pub struct ServerConfig {
    /// Bind address
    #[arg(long, env = "HIKYAKU_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "HIKYAKU_PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite database file for undelivered messages
    #[arg(long, env = "HIKYAKU_DATABASE", default_value = "chat.db")]
    pub database: PathBuf,

    /// Keep undelivered messages in memory only (lost on restart)
    #[arg(long, env = "HIKYAKU_IN_MEMORY")]
    pub in_memory: bool,

    /// Capacity of the delivery queue
    #[arg(long, env = "HIKYAKU_QUEUE_CAPACITY", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    pub queue_capacity: usize,

    /// Number of dispatch workers
    #[arg(long, env = "HIKYAKU_WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    pub workers: usize,

    /// Frames that may wait in one connection's mailbox
    #[arg(long, env = "HIKYAKU_MAILBOX_CAPACITY", default_value_t = DEFAULT_MAILBOX_CAPACITY)]
    pub mailbox_capacity: usize,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "HIKYAKU_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    /// `host:port` to bind the listener to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn relay_options(&self) -> RelayOptions {
        RelayOptions {
            queue_capacity: self.queue_capacity,
            worker_count: self.workers,
            mailbox_capacity: self.mailbox_capacity,
        }
    }
}

/// Sizing of the dispatch engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayOptions {
    pub queue_capacity: usize,
    pub worker_count: usize,
    pub mailbox_capacity: usize,
}

impl Default for RelayOptions {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            worker_count: DEFAULT_WORKER_COUNT,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
        }
    }
}
