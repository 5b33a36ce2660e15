//! HTTP gateways to external services (reqwest).

pub mod config_service;
pub mod media_provider;

pub use config_service::HttpConfigService;
pub use media_provider::HttpMediaProvider;
