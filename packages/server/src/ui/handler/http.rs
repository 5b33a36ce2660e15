//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{infrastructure::dto::http::ConfigResponseDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Serve the media-provider credentials
///
/// Answers 500 with `{"error": ...}` when the API key is not configured.
pub async fn get_config(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<ConfigResponseDto>) {
    match &state.api_key {
        Some(api_key) => {
            tracing::debug!("Serving provider config for app '{}'", state.app_name);
            (
                StatusCode::OK,
                Json(ConfigResponseDto::success(api_key, &state.app_name)),
            )
        }
        None => {
            tracing::error!("PROVIDER_API_KEY is not configured");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ConfigResponseDto::failure(
                    "Provider API key is not configured",
                )),
            )
        }
    }
}

/// Plain `OPTIONS` request (CORS headers are added by the CORS layer)
pub async fn config_preflight() -> &'static str {
    "ok"
}
