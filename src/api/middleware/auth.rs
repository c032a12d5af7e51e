//! Session authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::api::middleware::cookies::RequestCookies;
use crate::domain::entities::Customer;
use crate::error::AppError;
use crate::state::AppState;

/// The authenticated customer, inserted as a request extension for handlers.
#[derive(Debug, Clone)]
pub struct CurrentCustomer(pub Customer);

/// Authenticates protected customer routes.
///
/// # Credential Sources
///
/// 1. `Authorization: Bearer <token>` header
/// 2. `token` cookie (set by the login and register handlers)
///
/// The bearer header wins when both are present.
///
/// # Errors
///
/// Returns `401 Unauthorized` if no credential is present or the session
/// token is invalid, expired, or refers to a deleted account.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let bearer = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthBearer(token)| token);

    let mut req = Request::from_parts(parts, body);

    let token = bearer.or_else(|| {
        req.extensions()
            .get::<RequestCookies>()
            .and_then(|cookies| cookies.get("token"))
            .map(str::to_string)
    });

    let Some(token) = token else {
        return Err(AppError::unauthorized(
            "Not authorized to access this route",
            json!({ "reason": "missing credentials" }),
        ));
    };

    let customer = st.customer_service.authenticate(&token).await?;
    req.extensions_mut().insert(CurrentCustomer(customer));

    Ok(next.run(req).await)
}
