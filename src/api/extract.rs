//! Content-type-aware request body extractor.

use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::error::AppError;

/// Decodes a request body as JSON or a URL-encoded form, by content type.
///
/// Mirrors the two body decoders the gateway accepts on mutation endpoints.
/// Any decoding failure (syntax error, schema mismatch, unsupported content
/// type) is raised as [`AppError::Validation`] so it reaches the error
/// translator like every other typed condition.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text(), json!({})))?;
            Ok(Payload(value))
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text(), json!({})))?;
            Ok(Payload(value))
        } else {
            Err(AppError::bad_request(
                "Unsupported content type",
                json!({ "content_type": content_type }),
            ))
        }
    }
}
