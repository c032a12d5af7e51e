//! Access logging middleware.
//!
//! Records one line per request with method, path, status, and latency.
//! Purely observational: the request and response pass through unchanged,
//! and nothing here can fail a request.

use axum::{
    extract::{ConnectInfo, Request},
    http::header,
    middleware::Next,
    response::Response,
};
use std::{net::SocketAddr, time::Instant};

pub async fn layer(req: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let version = format!("{:?}", req.version());

    // Peer address is an extension only when served with connect info;
    // absent (e.g. under a mock test transport) it logs as "-".
    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    let ua = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let ms = start.elapsed().as_millis();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "status" => status.to_string(),
    )
    .increment(1);
    metrics::histogram!("http_request_duration_ms").record(ms as f64);

    tracing::info!(
        r#"{ip} - "{method} {path} {version}" {status} "{ua}" {ms}ms"#,
        ip = ip,
        method = method,
        path = path,
        version = version,
        status = status,
        ua = ua,
        ms = ms,
    );

    response
}
