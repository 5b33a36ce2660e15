//! Infrastructure layer: wire formats shared with the client.

pub mod dto;
