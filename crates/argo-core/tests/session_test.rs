#![allow(clippy::unwrap_used)]
// End-to-end session establishment against a wiremock appliance.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use argo_api::digest_hex;
use argo_core::session::{
    AUTHORIZED_USER_METHOD, LOGIN_CHALLENGE_METHOD, LOGIN_METHOD, VERSION_METHOD,
};
use argo_core::{Credentials, ErrorKind, SessionConfig, SessionEstablisher, VersionPolicy};

// ── Helpers ─────────────────────────────────────────────────────────

fn credentials(server: &MockServer, username: &str, password: &str) -> Credentials {
    Credentials::new(
        server.address().to_string(),
        username,
        password.to_string(),
    )
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "id": 1, "result": result }))
}

async fn mount_prime(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/argo"))
        .and(query_param("silent", "true"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_rpc(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(path("/jabsorb/JSON-RPC"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(rpc_result(result))
        .mount(server)
        .await;
}

/// A device at a supported version with nobody logged in.
async fn setup_logged_out(version: &str) -> MockServer {
    let server = MockServer::start().await;
    mount_prime(&server, 204).await;
    mount_rpc(&server, VERSION_METHOD, json!(version)).await;
    server
}

// ── Validation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_priming_200_is_incompatible_device() {
    let server = MockServer::start().await;
    mount_prime(&server, 200).await;

    let err = SessionEstablisher::default()
        .establish(&credentials(&server, "u", "p"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompatibleDevice);
}

#[tokio::test]
async fn test_old_software_is_rejected() {
    let server = setup_logged_out("1.50.0").await;

    let err = SessionEstablisher::default()
        .establish(&credentials(&server, "u", "p"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompatibleSoftwareVersion);
    assert!(err.to_string().contains("1.50.0"), "got: {err}");
}

#[tokio::test]
async fn test_tagged_build_passes_alternate_threshold() {
    let server = setup_logged_out("1.64.12.PH.3").await;

    let version = SessionEstablisher::default()
        .ensure_valid(&server.address().to_string())
        .await
        .unwrap();

    assert_eq!(version, "1.64.12.PH.3");
}

#[tokio::test]
async fn test_null_version_is_unsupported() {
    let server = MockServer::start().await;
    mount_prime(&server, 204).await;
    mount_rpc(&server, VERSION_METHOD, Value::Null).await;

    let err = SessionEstablisher::default()
        .ensure_valid(&server.address().to_string())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompatibleSoftwareVersion);
}

#[tokio::test]
async fn test_configured_minimum_is_honoured() {
    let server = setup_logged_out("1.66.2").await;
    let establisher = SessionEstablisher::new(SessionConfig {
        version_policy: VersionPolicy::new("1.70", "1.64.10", ".PH."),
        ..SessionConfig::default()
    });

    let err = establisher
        .ensure_valid(&server.address().to_string())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IncompatibleSoftwareVersion);
}

#[tokio::test]
async fn test_ensure_valid_does_not_authenticate() {
    let server = setup_logged_out("1.66.2").await;
    Mock::given(body_partial_json(json!({ "method": AUTHORIZED_USER_METHOD })))
        .respond_with(rpc_result(json!("admin")))
        .expect(0)
        .mount(&server)
        .await;

    let version = SessionEstablisher::default()
        .ensure_valid(&server.address().to_string())
        .await
        .unwrap();

    assert_eq!(version, "1.66.2");
}

#[tokio::test]
async fn test_version_rpc_error_is_communication_failure() {
    let server = MockServer::start().await;
    mount_prime(&server, 204).await;
    Mock::given(path("/jabsorb/JSON-RPC"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = SessionEstablisher::default()
        .ensure_valid(&server.address().to_string())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CommunicationFailure);
}

#[tokio::test]
async fn test_unreachable_device_is_communication_failure() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = SessionEstablisher::default()
        .establish(&Credentials::new(
            format!("127.0.0.1:{port}"),
            "u",
            "p".to_string(),
        ))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CommunicationFailure);
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn test_malformed_address_is_communication_failure() {
    let err = SessionEstablisher::default()
        .establish(&Credentials::new("http://10.0.0.2/", "u", "p".to_string()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CommunicationFailure);
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_existing_login_skips_challenge() {
    let server = setup_logged_out("1.66.2").await;
    mount_rpc(&server, AUTHORIZED_USER_METHOD, json!("admin")).await;
    Mock::given(body_partial_json(json!({ "method": LOGIN_CHALLENGE_METHOD })))
        .respond_with(rpc_result(json!("never")))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(body_partial_json(json!({ "method": LOGIN_METHOD })))
        .respond_with(rpc_result(Value::Null))
        .expect(0)
        .mount(&server)
        .await;

    let session = SessionEstablisher::default()
        .establish(&credentials(&server, "someone-else", "p"))
        .await
        .unwrap();

    assert_eq!(session.authorized_user(), "admin");
    assert_eq!(session.software_version(), "1.66.2");
    assert_eq!(session.address(), server.address().to_string());
}

#[tokio::test]
async fn test_login_submits_challenge_digest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/argo"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    mount_rpc(&server, VERSION_METHOD, json!("1.66.2")).await;

    // Nobody logged in until `login` has been called.
    Mock::given(body_partial_json(json!({ "method": AUTHORIZED_USER_METHOD })))
        .respond_with(rpc_result(Value::Null))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(body_partial_json(json!({ "method": AUTHORIZED_USER_METHOD })))
        .respond_with(rpc_result(json!("u")))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(body_partial_json(json!({
        "method": LOGIN_CHALLENGE_METHOD,
        "params": ["u"],
    })))
    .respond_with(rpc_result(json!("abc123")))
    .expect(1)
    .mount(&server)
    .await;
    Mock::given(body_partial_json(json!({
        "method": LOGIN_METHOD,
        "params": [digest_hex("abc123:u:p")],
    })))
    .respond_with(rpc_result(Value::Null))
    .expect(1)
    .mount(&server)
    .await;

    let session = SessionEstablisher::default()
        .establish(&credentials(&server, "u", "p"))
        .await
        .unwrap();

    assert_eq!(session.authorized_user(), "u");
}

#[tokio::test]
async fn test_literal_null_user_means_logged_out() {
    let server = setup_logged_out("1.66.2").await;
    Mock::given(body_partial_json(json!({ "method": AUTHORIZED_USER_METHOD })))
        .respond_with(rpc_result(json!("null")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_rpc(&server, AUTHORIZED_USER_METHOD, json!("u")).await;
    mount_rpc(&server, LOGIN_CHALLENGE_METHOD, json!("xyz")).await;
    Mock::given(body_partial_json(json!({ "method": LOGIN_METHOD })))
        .respond_with(rpc_result(Value::Null))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionEstablisher::default()
        .establish(&credentials(&server, "u", "p"))
        .await
        .unwrap();

    assert_eq!(session.authorized_user(), "u");
}

#[tokio::test]
async fn test_rejected_login_is_authentication_failure() {
    let server = setup_logged_out("1.66.2").await;
    mount_rpc(&server, AUTHORIZED_USER_METHOD, Value::Null).await;
    mount_rpc(&server, LOGIN_CHALLENGE_METHOD, json!("abc123")).await;
    mount_rpc(&server, LOGIN_METHOD, Value::Null).await;

    let err = SessionEstablisher::default()
        .establish(&credentials(&server, "u", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
}

#[tokio::test]
async fn test_rpc_error_during_login_is_authentication_failure() {
    let server = setup_logged_out("1.66.2").await;
    mount_rpc(&server, AUTHORIZED_USER_METHOD, Value::Null).await;
    mount_rpc(&server, LOGIN_CHALLENGE_METHOD, json!("abc123")).await;
    Mock::given(body_partial_json(json!({ "method": LOGIN_METHOD })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1,
            "error": { "code": 490, "msg": "bad digest" },
        })))
        .mount(&server)
        .await;

    let err = SessionEstablisher::default()
        .establish(&credentials(&server, "u", "p"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationFailure);
    assert!(err.to_string().contains("bad digest"), "got: {err}");
}

// ── Established session ─────────────────────────────────────────────

#[tokio::test]
async fn test_session_call_failure_is_remote_call() {
    let server = setup_logged_out("1.66.2").await;
    mount_rpc(&server, AUTHORIZED_USER_METHOD, json!("admin")).await;
    Mock::given(body_partial_json(json!({ "method": "system.reboot" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = SessionEstablisher::default()
        .establish(&credentials(&server, "admin", "p"))
        .await
        .unwrap();
    let err = session.call("system.reboot", Vec::new()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteCall);
    assert!(err.to_string().contains("system.reboot"));
}
