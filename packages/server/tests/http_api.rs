//! HTTP API integration tests.
//!
//! Tests for the edge endpoints (health check, provider config, CORS).

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start(Some("k-123")).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_config_endpoint_success() {
    // テスト項目: API キーが設定されていれば /api/config が 200 と認証情報を返す
    // given (前提条件):
    let server = TestServer::start(Some("k-123")).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/config", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!({"apiKey": "k-123", "appName": "boostroom-test"})
    );
}

#[tokio::test]
async fn test_config_endpoint_missing_key() {
    // テスト項目: API キー未設定時は 500 と error を返す
    // given (前提条件):
    let server = TestServer::start(None).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/config", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"].is_string());
    assert!(body.get("apiKey").is_none());
}

#[tokio::test]
async fn test_config_endpoint_options() {
    // テスト項目: OPTIONS リクエストに 200 と CORS ヘッダーで応答する
    // given (前提条件):
    let server = TestServer::start(Some("k-123")).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/config", server.base_url()),
        )
        .header("Origin", "https://example.discordsays.com")
        .header("Access-Control-Request-Method", "GET")
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let allow_methods = headers
        .get("access-control-allow-methods")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(allow_methods.contains("GET"));
}
