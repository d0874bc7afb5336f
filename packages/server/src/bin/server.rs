//! Hikyaku relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hikyaku-server -- --port 3000 --database chat.db
//! ```

use clap::Parser;
use hikyaku_server::ServerConfig;
use hikyaku_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = hikyaku_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
