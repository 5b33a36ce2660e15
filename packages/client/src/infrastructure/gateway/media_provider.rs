//! Media-provider API client.
//!
//! `GET {api}/v1/tracks/{id}/stream?no_redirect=true` answers `{"data": "<url>"}`;
//! `GET {api}/v1/users/{id}` answers `{"data": {"id", "handle", "name"}}`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    domain::{ExternalConfig, MediaProvider, ResolveError, TrackId, UserProfile},
    infrastructure::dto::provider::{ProviderEnvelope, UserProfileDto},
    usecase::ProxyRewriter,
};

pub struct HttpMediaProvider {
    client: reqwest::Client,
    api_base: String,
    rewriter: Arc<ProxyRewriter>,
}

impl HttpMediaProvider {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>, rewriter: Arc<ProxyRewriter>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            rewriter,
        }
    }

    /// Build the request URL with credentials, then route it through the rewriter.
    ///
    /// Each segment is percent-encoded on its own, so an id can never leave
    /// its path position.
    fn request_url(
        &self,
        segments: &[&str],
        config: &ExternalConfig,
        extra: &[(&str, &str)],
    ) -> Result<String, ResolveError> {
        let invalid =
            |e: String| ResolveError::NetworkFetchFailed(format!("invalid provider URL: {e}"));

        let mut url = Url::parse(&self.api_base).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("app_name", &config.app_name)
            .append_pair("api_key", &config.api_key)
            .extend_pairs(extra);

        Ok(self.rewriter.absolute(&self.rewriter.route(url.as_str())))
    }

    /// `None` when the provider answers 404 or an empty `data`
    async fn get_data<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ResolveError::NetworkFetchFailed(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status if !status.is_success() => {
                return Err(ResolveError::NetworkFetchFailed(format!(
                    "provider answered {status}"
                )));
            }
            _ => {}
        }

        let envelope: ProviderEnvelope<T> = response
            .json()
            .await
            .map_err(|e| ResolveError::NetworkFetchFailed(format!("unreadable provider response: {e}")))?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl MediaProvider for HttpMediaProvider {
    async fn fetch_stream_url(
        &self,
        config: &ExternalConfig,
        track_id: &TrackId,
    ) -> Result<String, ResolveError> {
        // "." と ".." はパスセグメントとして表現できない
        if is_dot_segment(track_id.as_str()) {
            return Err(ResolveError::TrackNotFound(track_id.to_string()));
        }
        let url = self.request_url(
            &["v1", "tracks", track_id.as_str(), "stream"],
            config,
            &[("no_redirect", "true")],
        )?;

        self.get_data::<String>(&url)
            .await?
            .filter(|stream| !stream.trim().is_empty())
            .ok_or_else(|| ResolveError::TrackNotFound(track_id.to_string()))
    }

    async fn fetch_user_profile(
        &self,
        config: &ExternalConfig,
        user_id: &str,
    ) -> Result<UserProfile, ResolveError> {
        let user_id = user_id.trim();
        if user_id.is_empty() || is_dot_segment(user_id) {
            return Err(ResolveError::UserNotFound(user_id.to_string()));
        }
        let url = self.request_url(&["v1", "users", user_id], config, &[])?;

        self.get_data::<UserProfileDto>(&url)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| ResolveError::UserNotFound(user_id.to_string()))
    }
}

fn is_dot_segment(id: &str) -> bool {
    matches!(id, "." | "..")
}
