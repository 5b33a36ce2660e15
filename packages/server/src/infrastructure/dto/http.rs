//! HTTP API DTOs for the edge configuration endpoint.
//!
//! The same struct is used to serialize the response on the server and to
//! deserialize it on the client, so every field is optional.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/config`
///
/// Success: `{"apiKey": "...", "appName": "..."}`.
/// Failure: `{"error": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponseDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConfigResponseDto {
    pub fn success(api_key: impl Into<String>, app_name: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            app_name: Some(app_name.into()),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}
