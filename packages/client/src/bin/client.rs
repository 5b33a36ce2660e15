//! Boostroom playback console.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin boostroom-client -- --provider-api-url https://api.provider.example play <track_id>...
//! ```

use boostroom_client::ClientArgs;
use boostroom_shared::logger::setup_logger;
use clap::Parser;

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = ClientArgs::parse();

    if let Err(e) = boostroom_client::run_client(args).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
