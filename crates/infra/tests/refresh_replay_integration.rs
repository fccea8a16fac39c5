//! End-to-end token refresh over real HTTP
//!
//! Requests carrying the expired token get 401 from the mock server; the
//! refresh endpoint must be hit exactly once and every request replayed
//! with the new token.

mod support;

use std::time::Duration;

use medibook_core::TokenStore;
use medibook_domain::{ApiError, AuthError, RequestConfig};
use serde_json::{json, Value};
use support::{client_for, signed_in_store};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_expired_token(server: &MockServer, token: &str) {
    Mock::given(method("GET"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn concurrent_401s_share_one_refresh() {
    let server = MockServer::start().await;
    mount_expired_token(&server, "T1").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/(a|b|c)$"))
        .and(header("authorization", "Bearer T2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({ "refreshToken": "R1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "token": "T2", "refreshToken": "R2" }))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store("T1", "R1");
    let client = client_for(&server, store.clone());
    let api = client.api();

    let (a, b, c) = tokio::join!(
        api.get::<Value>("/a", RequestConfig::new()),
        api.get::<Value>("/b", RequestConfig::new()),
        api.get::<Value>("/c", RequestConfig::new()),
    );

    for result in [a, b, c] {
        let response = result.expect("request should succeed after refresh");
        assert_eq!(response.status, 200);
        assert_eq!(response.data, json!({ "ok": true }));
    }

    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("T2"));
    assert_eq!(store.get_refresh_token().await.unwrap().as_deref(), Some("R2"));
    assert!(!api.coordinator().is_refreshing());
}

#[tokio::test]
async fn rejected_refresh_fails_every_waiter() {
    let server = MockServer::start().await;
    mount_expired_token(&server, "T1").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string("refresh token revoked")
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store("T1", "R1");
    let client = client_for(&server, store.clone());
    let api = client.api();

    let (a, b) = tokio::join!(
        api.get::<Value>("/a", RequestConfig::new()),
        api.get::<Value>("/b", RequestConfig::new()),
    );

    for result in [a, b] {
        let err = result.expect_err("refresh failure must reach the caller");
        assert!(matches!(err, ApiError::Auth(AuthError::RefreshRejected { status: 401, .. })));
        assert!(err.requires_reauthentication());
    }

    // Failed refresh leaves the session for the caller to clear
    assert_eq!(store.get_token().await.unwrap().as_deref(), Some("T1"));
}

#[tokio::test]
async fn second_401_after_replay_is_returned() {
    let server = MockServer::start().await;
    mount_expired_token(&server, "T1").await;
    mount_expired_token(&server, "T2").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "T2" })))
        .expect(1)
        .mount(&server)
        .await;

    let store = signed_in_store("T1", "R1");
    let client = client_for(&server, store.clone());

    let err = client.api().get::<Value>("/a", RequestConfig::new()).await.unwrap_err();

    assert!(err.is_unauthorized());
    // Refresh token was not rotated, so the old one is kept
    assert_eq!(store.get_refresh_token().await.unwrap().as_deref(), Some("R1"));
}

#[tokio::test]
async fn server_errors_do_not_trigger_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, signed_in_store("T1", "R1"));
    let err = client.api().get::<Value>("/a", RequestConfig::new()).await.unwrap_err();

    assert_eq!(err, ApiError::Http { status: 503, body: "maintenance".to_string() });
}
