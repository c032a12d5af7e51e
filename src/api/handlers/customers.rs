//! Handlers for the customer route group.
//!
//! Mounted twice (under `/api/v1/customers` and `/blogify/customers`), so
//! every handler here serves both prefixes identically.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde_json::json;
use std::time::Duration;
use validator::Validate;

use crate::api::dto::customer::{
    AuthResponse, CustomerListResponse, CustomerResponse, LoginRequest, RegisterRequest,
    SuccessResponse, UpdateCustomerRequest,
};
use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::api::extract::Payload;
use crate::api::middleware::auth::CurrentCustomer;
use crate::application::services::customer_service::Registration;
use crate::domain::entities::{Customer, CustomerChanges};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a customer account and opens a session.
///
/// # Endpoint
///
/// `POST /register`
///
/// # Responses
///
/// - **201 Created** with `{ "success": true, "token": ... }` and a `token`
///   cookie
/// - **400 Bad Request** on validation failure
/// - **409 Conflict** when the email is already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = state
        .customer_service
        .register(Registration {
            name: payload.name,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    let token = state.customer_service.issue_session(&customer);
    let cookie = session_cookie(&token, state.customer_service.session_ttl());

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            success: true,
            token,
        }),
    ))
}

/// Authenticates a customer and opens a session.
///
/// # Endpoint
///
/// `POST /login`
///
/// The login rate limiter wraps this route; only attempts that end with a
/// non-success status count against its quota.
///
/// # Responses
///
/// - **200 OK** with `{ "success": true, "token": ... }` and a `token` cookie
/// - **401 Unauthorized** on bad credentials (uniform message)
pub async fn login_handler(
    State(state): State<AppState>,
    Payload(payload): Payload<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let customer = state
        .customer_service
        .login(&payload.email, &payload.password)
        .await?;

    let token = state.customer_service.issue_session(&customer);
    let cookie = session_cookie(&token, state.customer_service.session_ttl());

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            success: true,
            token,
        }),
    ))
}

/// Clears the session cookie.
///
/// # Endpoint
///
/// `GET /logout`
///
/// Sessions are stateless, so logout is purely client-side: the cookie is
/// expired and the token simply stops being sent.
pub async fn logout_handler() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, expired_session_cookie())]),
        Json(SuccessResponse { success: true }),
    )
}

/// Returns the authenticated customer.
///
/// # Endpoint
///
/// `GET /me`
pub async fn me_handler(
    Extension(CurrentCustomer(customer)): Extension<CurrentCustomer>,
) -> Json<CustomerResponse> {
    Json(customer.into())
}

/// Lists customer accounts (admin only, paginated).
///
/// # Endpoint
///
/// `GET /`
pub async fn list_customers_handler(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Extension(CurrentCustomer(current)): Extension<CurrentCustomer>,
) -> Result<Json<CustomerListResponse>, AppError> {
    if !current.is_admin() {
        return Err(AppError::forbidden(
            "Not authorized to list customers",
            json!({}),
        ));
    }

    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|message| AppError::bad_request(message, json!({})))?;

    let (customers, total) = state.customer_service.list(offset, limit).await?;

    Ok(Json(CustomerListResponse {
        pagination: PaginationMeta::new(params.page(), params.page_size(), total),
        items: customers.into_iter().map(CustomerResponse::from).collect(),
    }))
}

/// Fetches one customer account.
///
/// # Endpoint
///
/// `GET /{id}` — the customer themselves or an admin.
pub async fn get_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentCustomer(current)): Extension<CurrentCustomer>,
) -> Result<Json<CustomerResponse>, AppError> {
    authorize_account_access(&current, id)?;

    let customer = state.customer_service.get(id).await?;
    Ok(Json(customer.into()))
}

/// Partially updates a customer account.
///
/// # Endpoint
///
/// `PUT /{id}` — the customer themselves or an admin.
///
/// # Responses
///
/// - **200 OK** with the updated customer
/// - **403 Forbidden** when editing someone else's account without admin role
/// - **409 Conflict** when the new email collides with another account
pub async fn update_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentCustomer(current)): Extension<CurrentCustomer>,
    Payload(payload): Payload<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, AppError> {
    payload.validate()?;
    authorize_account_access(&current, id)?;

    let customer = state
        .customer_service
        .update(
            id,
            CustomerChanges {
                name: payload.name,
                email: payload.email,
            },
        )
        .await?;

    Ok(Json(customer.into()))
}

/// Deletes a customer account.
///
/// # Endpoint
///
/// `DELETE /{id}` — the customer themselves or an admin.
pub async fn delete_customer_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(CurrentCustomer(current)): Extension<CurrentCustomer>,
) -> Result<Json<SuccessResponse>, AppError> {
    authorize_account_access(&current, id)?;

    state.customer_service.delete(id).await?;
    Ok(Json(SuccessResponse { success: true }))
}

fn authorize_account_access(current: &Customer, id: i64) -> Result<(), AppError> {
    if current.id == id || current.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Not authorized to access this customer",
            json!({ "id": id }),
        ))
    }
}

fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "token={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    )
}

fn expired_session_cookie() -> String {
    "token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0".to_string()
}
