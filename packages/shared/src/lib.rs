//! Shared utilities for Boostroom packages.
//!
//! Logger initialization and time helpers used by both the edge server and
//! the playback client.

pub mod logger;
pub mod time;
