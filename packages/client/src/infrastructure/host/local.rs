//! In-process host container.
//!
//! Stands in for the embedding SDK when the client runs outside a real
//! container runtime: it is always ready and records the registered mappings.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{HostContainerSdk, HostSdkError, ProxyMapping};

#[derive(Debug, Default)]
pub struct LocalHostContainer {
    registered: Mutex<Vec<ProxyMapping>>,
}

impl LocalHostContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registered(&self) -> Vec<ProxyMapping> {
        self.registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl HostContainerSdk for LocalHostContainer {
    async fn ready(&self) -> Result<(), HostSdkError> {
        Ok(())
    }

    async fn register_mappings(&self, mappings: &[ProxyMapping]) -> Result<(), HostSdkError> {
        for mapping in mappings {
            tracing::debug!("Mapping /.proxy{} -> {}", mapping.prefix, mapping.target);
        }
        *self
            .registered
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = mappings.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_mappings_records_list() {
        // テスト項目: 登録したマッピングが記録される
        let host = LocalHostContainer::new();
        let mappings = vec![ProxyMapping::new("/api", "site.example")];

        host.ready().await.unwrap();
        host.register_mappings(&mappings).await.unwrap();

        assert_eq!(host.registered(), mappings);
    }
}
