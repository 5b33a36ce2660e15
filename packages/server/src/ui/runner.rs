//! Router construction and server entry point.

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{
    handler::{config_preflight, get_config, health_check},
    signal::shutdown_signal,
    state::AppState,
};
use crate::{config::EdgeConfig, error::ServerError};

/// Build the router with CORS and tracing layers applied
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/config", get(get_config).options(config_preflight))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until a shutdown signal arrives
pub async fn run(config: EdgeConfig) -> Result<(), ServerError> {
    if config.api_key.is_none() {
        tracing::warn!("PROVIDER_API_KEY is not set; /api/config will answer 500");
    }

    let state = Arc::new(AppState::from(&config));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    tracing::info!("Listening on {}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
