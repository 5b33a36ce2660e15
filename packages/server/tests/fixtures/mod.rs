//! Test fixtures for HTTP integration tests.

use std::{net::SocketAddr, sync::Arc};

use boostroom_server::{create_router, ui::state::AppState};

/// In-process edge server bound to an ephemeral port
pub struct TestServer {
    addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a server serving the given API key
    pub async fn start(api_key: Option<&str>) -> Self {
        let state = Arc::new(AppState {
            api_key: api_key.map(str::to_string),
            app_name: "boostroom-test".to_string(),
        });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, create_router(state))
                .await
                .expect("Test server failed");
        });

        Self { addr, handle }
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
