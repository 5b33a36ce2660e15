//! Test fixtures: in-process edge config server and a fake media provider.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use boostroom_server::{create_router, ui::state::AppState};

/// Serve `router` on an ephemeral port until dropped
pub struct TestServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn serve(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Test server failed");
        });

        Self { addr, handle }
    }

    /// Edge config endpoint serving the given API key
    pub async fn edge(api_key: Option<&str>) -> Self {
        let state = Arc::new(AppState {
            api_key: api_key.map(str::to_string),
            app_name: "boostroom-test".to_string(),
        });
        Self::serve(create_router(state)).await
    }

    /// Media provider that only accepts `expected_key`; track `missing` is unknown
    pub async fn provider(expected_key: &'static str) -> Self {
        let router = Router::new()
            .route(
                "/v1/tracks/{id}/stream",
                get(
                    move |Path(id): Path<String>,
                          Query(params): Query<HashMap<String, String>>| async move {
                        if params.get("api_key").map(String::as_str) != Some(expected_key) {
                            return (StatusCode::UNAUTHORIZED, Json(serde_json::json!({})));
                        }
                        if id == "missing" {
                            return (StatusCode::NOT_FOUND, Json(serde_json::json!({})));
                        }
                        (
                            StatusCode::OK,
                            Json(serde_json::json!({
                                "data": format!("https://cdn.example/{id}.mp3?sig=abc%2F1")
                            })),
                        )
                    },
                ),
            )
            .route(
                "/v1/users/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(serde_json::json!({
                        "data": {"id": id, "handle": "dj_nova", "name": "DJ Nova"}
                    }))
                }),
            );
        Self::serve(router).await
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
