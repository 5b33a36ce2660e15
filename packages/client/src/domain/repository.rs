//! Ports implemented by the infrastructure layer.
//!
//! UseCases depend on these traits only (dependency inversion).

use async_trait::async_trait;

use super::{
    entity::{ExternalConfig, ProxyMapping, RemoteConfig, UserProfile},
    error::{HostSdkError, ResolveError, StorageError},
    value_object::TrackId,
};

/// Durable string-keyed storage (values are JSON documents)
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Remote configuration service serving provider credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn fetch_config(&self) -> Result<RemoteConfig, ResolveError>;
}

/// External media-provider gateway
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Playable stream URL for a track.
    ///
    /// `ResolveError::TrackNotFound` when the provider has no stream.
    async fn fetch_stream_url(
        &self,
        config: &ExternalConfig,
        track_id: &TrackId,
    ) -> Result<String, ResolveError>;

    async fn fetch_user_profile(
        &self,
        config: &ExternalConfig,
        user_id: &str,
    ) -> Result<UserProfile, ResolveError>;
}

/// SDK of the embedding host container
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostContainerSdk: Send + Sync {
    /// Settles once the container accepts further calls
    async fn ready(&self) -> Result<(), HostSdkError>;

    async fn register_mappings(&self, mappings: &[ProxyMapping]) -> Result<(), HostSdkError>;
}
