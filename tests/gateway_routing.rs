//! Routing behavior: dual mounts, fallback, body decoding failures, and the
//! unconditional security headers.

mod common;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_both_mounts_behave_identically() {
    let app = common::spawn_default_app();
    let token = common::register_customer(&app, "Ada", "ada@example.com", "correct-horse").await;

    let v1 = app
        .server
        .get("/api/v1/customers/me")
        .authorization_bearer(&token)
        .await;
    let legacy = app
        .server
        .get("/blogify/customers/me")
        .authorization_bearer(&token)
        .await;

    assert_eq!(v1.status_code(), StatusCode::OK);
    assert_eq!(v1.status_code(), legacy.status_code());
    assert_eq!(v1.json::<Value>(), legacy.json::<Value>());
}

#[tokio::test]
async fn test_registration_on_legacy_mount_visible_on_v1() {
    let app = common::spawn_default_app();

    let response = app
        .server
        .post("/blogify/customers/register")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "password": "correct-horse"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let token = response.json::<Value>()["token"].as_str().unwrap().to_string();

    let me = app
        .server
        .get("/api/v1/customers/me")
        .authorization_bearer(&token)
        .await;
    assert_eq!(me.status_code(), StatusCode::OK);
    assert_eq!(me.json::<Value>()["email"], "ada@example.com");
}

#[tokio::test]
async fn test_unknown_route_is_json_not_found() {
    let app = common::spawn_default_app();

    let response = app.server.get("/unknown/path").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "not_found");
    assert!(
        body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("/unknown/path")
    );
}

#[tokio::test]
async fn test_security_headers_on_success_and_error_responses() {
    let app = common::spawn_default_app();

    for response in [
        app.server.get("/health").await,
        app.server.get("/unknown/path").await,
        app.server.get("/public/hello.txt").await,
    ] {
        let headers = response.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
        assert_eq!(
            headers.get("referrer-policy").unwrap(),
            "strict-origin-when-cross-origin"
        );
        assert!(headers.get("content-security-policy").is_some());
    }
}

#[tokio::test]
async fn test_malformed_json_body_is_bad_request() {
    let app = common::spawn_default_app();

    let response = app
        .server
        .post("/api/v1/customers/register")
        .add_header("content-type", "application/json")
        .bytes(Bytes::from_static(b"{ not json"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_unsupported_content_type_is_bad_request() {
    let app = common::spawn_default_app();

    let response = app
        .server
        .post("/api/v1/customers/register")
        .add_header("content-type", "text/plain")
        .bytes(Bytes::from_static(b"name=Ada"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let mut config = common::test_config();
    config.body_limit_bytes = 2048;
    let app = common::spawn_app(config);

    let big_name = "a".repeat(8192);
    let response = app
        .server
        .post("/api/v1/customers/register")
        .json(&json!({
            "name": big_name,
            "email": "ada@example.com",
            "password": "correct-horse"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
}
