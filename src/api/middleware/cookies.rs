//! Cookie extraction middleware.
//!
//! Parses the `Cookie` header once per request into a [`RequestCookies`] map
//! stored as a request extension. Absent or malformed headers yield an empty
//! map, never an error.

use axum::{
    extract::Request,
    http::{HeaderValue, header::COOKIE},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

/// Cookies sent by the client, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies(HashMap<String, String>);

impl RequestCookies {
    /// Parses a raw `Cookie` header value. Malformed pairs are skipped.
    pub fn parse(header: Option<&HeaderValue>) -> Self {
        let Some(raw) = header.and_then(|v| v.to_str().ok()) else {
            return Self::default();
        };

        let map = raw
            .split(';')
            .filter_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(name), Some(value)) if !name.is_empty() => {
                        Some((name.to_string(), value.to_string()))
                    }
                    _ => None,
                }
            })
            .collect();

        Self(map)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub async fn layer(mut req: Request, next: Next) -> Response {
    let cookies = RequestCookies::parse(req.headers().get(COOKIE));
    req.extensions_mut().insert(cookies);
    next.run(req).await
}
