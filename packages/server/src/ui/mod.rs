//! Edge configuration HTTP server.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{create_router, run};
