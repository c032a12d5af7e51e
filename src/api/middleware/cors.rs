//! Cross-origin policy enforcement.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Builds the CORS layer from the configured origin allow-list.
///
/// Listed origins are reflected back with credential sharing allowed;
/// requests from any other origin get no CORS headers at all, which the
/// browser treats as a rejection. An empty list therefore permits no
/// credentialed cross-origin access. Preflight `OPTIONS` requests are
/// answered by this layer directly and never reach business routing.
///
/// Origins were validated as http(s) URLs at startup; anything that still
/// fails header conversion is skipped.
pub fn layer(origins: &[String]) -> CorsLayer {
    let list: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(list))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
