#![allow(clippy::unwrap_used)]
// Integration tests for `JabsorbClient` using wiremock.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use argo_api::{Error, JabsorbClient, RpcTransport, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, JabsorbClient) {
    let server = MockServer::start().await;
    let client = JabsorbClient::new(&server.address().to_string(), &TransportConfig::default())
        .unwrap();
    (server, client)
}

// ── Priming ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_prime_reports_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/argo"))
        .and(query_param("silent", "true"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.prime().await.unwrap(), 204);
}

#[tokio::test]
async fn test_prime_returns_non_success_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/argo"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    assert_eq!(client.prime().await.unwrap(), 404);
}

#[tokio::test]
async fn test_session_cookie_is_shared_with_rpc_calls() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/argo"))
        .respond_with(
            ResponseTemplate::new(204).insert_header("Set-Cookie", "JSESSIONID=abc123; Path=/"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "result": "1.66.2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    client.prime().await.unwrap();
    let version = client
        .call_string("version.getVersionString", vec![])
        .await
        .unwrap();
    assert_eq!(version.as_deref(), Some("1.66.2"));
}

// ── Calls ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_call_sends_method_and_params() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .and(body_partial_json(json!({
            "method": "authenticationManager.getLoginChallenge",
            "params": ["admin"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "result": "nonce"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let challenge = client
        .call_string("authenticationManager.getLoginChallenge", vec![json!("admin")])
        .await
        .unwrap();
    assert_eq!(challenge.as_deref(), Some("nonce"));
}

#[tokio::test]
async fn test_null_result_reads_as_none() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "result": null
        })))
        .mount(&server)
        .await;

    let user = client
        .call_string("authenticationManager.getAuthorizedUserName", vec![])
        .await
        .unwrap();
    assert_eq!(user, None);
}

#[tokio::test]
async fn test_rpc_error_object() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "error": { "code": 591, "msg": "method not found" }
        })))
        .mount(&server)
        .await;

    let result = client.call("action.playURI", vec![json!("http://x")]).await;

    match result {
        Err(Error::Rpc {
            ref method,
            code,
            ref message,
        }) => {
            assert_eq!(method, "action.playURI");
            assert_eq!(code, 591);
            assert_eq!(message, "method not found");
        }
        other => panic!("expected Rpc error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.call("version.getVersionString", vec![]).await;
    assert!(
        matches!(result, Err(Error::Status { status: 500, .. })),
        "expected Status error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
        .mount(&server)
        .await;

    let result = client.call("version.getVersionString", vec![]).await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => assert!(body.contains("nope")),
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client =
        JabsorbClient::new(&format!("127.0.0.1:{port}"), &TransportConfig::default()).unwrap();

    let err = client.prime().await.unwrap_err();
    assert!(err.is_unreachable(), "expected unreachable, got: {err:?}");
}
