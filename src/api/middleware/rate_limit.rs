//! Admission-control middleware.
//!
//! Two stages share the [`RateLimiter`] interface from the state: the global
//! stage wraps the whole router, the login stage wraps only the login route
//! (and therefore both of its mounts). Rejections raise
//! [`AppError::TooManyRequests`] toward the error translator; no response is
//! written here.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::error::AppError;
use crate::infrastructure::limiter::Decision;
use crate::state::AppState;

/// Message returned when the global limiter rejects a request.
pub const GLOBAL_LIMIT_MESSAGE: &str =
    "Too many requests from this IP, please try again later.";

/// Message returned when the login limiter rejects a request.
pub const LOGIN_LIMIT_MESSAGE: &str =
    "Too many login attempts, please try again after 15 minutes.";

/// Extracts the client key used to bucket rate-limit counters.
///
/// The socket peer address is authoritative. Forwarded headers are consulted
/// only when the deployment declares a trusted reverse proxy in front of the
/// gateway, since any client can forge them otherwise.
pub fn client_key(req: &Request, behind_proxy: bool) -> IpAddr {
    if behind_proxy
        && let Some(ip) = forwarded_ip(req.headers())
    {
        return ip;
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    if let Some(ip) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok())
    {
        return Some(ip);
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

/// Global admission control: counts every request on every route.
pub async fn global_admission(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req, st.config.behind_proxy);

    match st.global_limiter.check(key).await {
        Decision::Allowed { .. } => Ok(next.run(req).await),
        Decision::Denied { retry_after } => {
            metrics::counter!("rate_limit_rejections_total", "limiter" => "global").increment(1);
            Err(AppError::too_many_requests(GLOBAL_LIMIT_MESSAGE, retry_after))
        }
    }
}

/// Login admission control: independent, stricter counter for the login
/// endpoints only.
///
/// The slot is consumed up front and refunded when the handler reports
/// success (final status < 400), so only failed attempts count against the
/// quota. Denied requests never reach the handler and record no outcome.
pub async fn login_admission(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = client_key(&req, st.config.behind_proxy);

    match st.login_limiter.check(key).await {
        Decision::Denied { retry_after } => {
            metrics::counter!("rate_limit_rejections_total", "limiter" => "login").increment(1);
            Err(AppError::too_many_requests(LOGIN_LIMIT_MESSAGE, retry_after))
        }
        Decision::Allowed { .. } => {
            let response = next.run(req).await;
            let succeeded = response.status().as_u16() < 400;
            st.login_limiter.record_outcome(key, succeeded).await;
            Ok(response)
        }
    }
}
