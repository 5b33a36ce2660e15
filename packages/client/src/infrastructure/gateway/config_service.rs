//! Remote configuration service client.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{ConfigService, RemoteConfig, ResolveError},
    infrastructure::dto::ConfigResponseDto,
    usecase::ProxyRewriter,
};

/// `GET` client for the edge configuration endpoint
pub struct HttpConfigService {
    client: reqwest::Client,
    endpoint: String,
    rewriter: Arc<ProxyRewriter>,
}

impl HttpConfigService {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, rewriter: Arc<ProxyRewriter>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            rewriter,
        }
    }
}

#[async_trait]
impl ConfigService for HttpConfigService {
    async fn fetch_config(&self) -> Result<RemoteConfig, ResolveError> {
        let url = self.rewriter.absolute(&self.rewriter.route(&self.endpoint));
        tracing::debug!("Fetching provider config from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::NetworkFetchFailed(e.to_string()))?;
        let status = response.status();

        // error 付きの 500 も本文を読んで呼び出し側に渡す
        let body: ConfigResponseDto = match response.json().await {
            Ok(body) => body,
            Err(e) if status.is_success() => {
                return Err(ResolveError::ConfigMalformed(e.to_string()));
            }
            Err(_) => {
                return Err(ResolveError::NetworkFetchFailed(format!(
                    "config endpoint answered {status}"
                )));
            }
        };

        if !status.is_success() && body.error.is_none() {
            return Err(ResolveError::NetworkFetchFailed(format!(
                "config endpoint answered {status}"
            )));
        }

        Ok(RemoteConfig {
            api_key: body.api_key,
            app_name: body.app_name,
            error: body.error,
        })
    }
}
