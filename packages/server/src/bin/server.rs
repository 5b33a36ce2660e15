//! Boostroom edge configuration endpoint.
//!
//! Serves `GET /api/config` with the media-provider credentials.
//!
//! Run with:
//! ```not_rust
//! PROVIDER_API_KEY=... cargo run --bin boostroom-server
//! ```

use boostroom_server::{EdgeConfig, ServerArgs};
use boostroom_shared::logger::setup_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let config = EdgeConfig::from(ServerArgs::parse());

    // Run the server
    if let Err(e) = boostroom_server::run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
