//! Top-level router wiring the gateway's middleware chain and mounts.
//!
//! # Route Structure
//!
//! - `GET /health`            - Component health (public)
//! - `/api/v1/customers/*`    - Customer routes
//! - `/blogify/customers/*`   - Same router value, kept for backward
//!   compatibility with pre-v1 clients
//! - `/public/*`              - Static assets
//! - anything else            - JSON `not_found`
//!
//! # Stage Order
//!
//! Per request, outermost first: access log, security headers, cookie
//! extraction, CORS (answers preflights before anything below), body size
//! limit, global admission control, then routing. The login limiter lives
//! inside the customer router so it wraps both mounts of the login route.

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{access_log, cookies, cors, rate_limit, security_headers};
use crate::error::AppError;
use crate::state::AppState;
use axum::handler::HandlerWithoutStateExt;
use axum::http::Uri;
use axum::routing::get;
use axum::{Router, middleware};
use serde_json::json;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// Path normalization and connect-info wiring happen in
/// [`crate::server::run`]; everything returned here is exercisable directly
/// by an in-process test client.
pub fn app_router(state: AppState) -> Router {
    let config = state.config.clone();

    // A single router value nested twice keeps both prefixes structurally
    // identical.
    let customers = api::routes::customer_routes(state.clone());

    let static_assets = ServeDir::new(&config.static_dir)
        .not_found_service(asset_not_found.into_service());

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/v1/customers", customers.clone())
        .nest("/blogify/customers", customers)
        .nest_service("/public", static_assets)
        .fallback(unmatched_route)
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(
            state,
            rate_limit::global_admission,
        ))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(cors::layer(&config.cors_origins))
        .layer(middleware::from_fn(cookies::layer))
        .layer(middleware::from_fn(security_headers::layer))
        .layer(middleware::from_fn(access_log::layer))
}

async fn unmatched_route(uri: Uri) -> AppError {
    AppError::not_found(
        format!("Route {} not found", uri.path()),
        json!({}),
    )
}

async fn asset_not_found() -> AppError {
    AppError::not_found("Asset not found", json!({}))
}
