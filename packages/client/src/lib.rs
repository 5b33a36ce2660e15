//! Boostroom playback and engagement-control client.
//!
//! Shuffle autoplay over contest submissions, guest boost throttling and
//! media-provider stream resolution (with proxy rewriting inside the host
//! container).

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::{ClientArgs, ClientConfig};
pub use error::ClientError;
pub use ui::run_client;
