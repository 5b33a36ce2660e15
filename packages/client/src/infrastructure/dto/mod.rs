//! Wire formats of external services.

pub mod provider;

pub use boostroom_server::infrastructure::dto::http::ConfigResponseDto;
