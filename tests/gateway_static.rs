//! Static asset serving under `/public`.

mod common;

use axum::http::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_existing_asset_served_idempotently() {
    let app = common::spawn_default_app();

    let first = app.server.get("/public/hello.txt").await;
    assert_eq!(first.status_code(), StatusCode::OK);
    assert_eq!(first.text(), "Hello from Blogify static assets.\n");

    let second = app.server.get("/public/hello.txt").await;
    assert_eq!(second.status_code(), StatusCode::OK);
    assert_eq!(first.text(), second.text());
}

#[tokio::test]
async fn test_missing_asset_is_json_not_found() {
    let app = common::spawn_default_app();

    let response = app.server.get("/public/missing.txt").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_traversal_above_static_root_is_refused() {
    let app = common::spawn_default_app();

    for path in [
        "/public/../Cargo.toml",
        "/public/%2e%2e/Cargo.toml",
        "/public/..%2fCargo.toml",
    ] {
        let response = app.server.get(path).await;
        assert_ne!(
            response.status_code(),
            StatusCode::OK,
            "traversal served for {path}"
        );
    }
}

#[tokio::test]
async fn test_static_bypasses_business_routing() {
    let app = common::spawn_default_app();

    // No session, no auth middleware: assets are public.
    let response = app.server.get("/public/hello.txt").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
