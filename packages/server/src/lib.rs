//! Edge configuration endpoint for Boostroom.
//!
//! Serves the media-provider credentials (`apiKey`, `appName`) to the playback
//! client so the key never has to be bundled with it.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod ui;

// Re-export entry points
pub use config::{EdgeConfig, ServerArgs};
pub use error::ServerError;
pub use ui::{create_router, run};
