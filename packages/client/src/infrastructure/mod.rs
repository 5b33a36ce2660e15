//! Infrastructure layer.
//!
//! Concrete implementations of the domain ports: reqwest gateways, key-value
//! stores and the host container bridge.

pub mod dto;
pub mod gateway;
pub mod host;
pub mod storage;
