//! Terminal front end: context wiring and the interactive playback console.

mod console;
mod runner;

pub use console::ConsoleCommand;
pub use runner::{AppContext, build_context, run_client};
