//! DTOs for customer endpoints.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use crate::domain::entities::Customer;

static RE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\pL\pN .'-]+$").expect("name pattern is valid"));

/// Request body for `POST /register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        regex(path = *RE_NAME, message = "Name contains invalid characters")
    )]
    pub name: String,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request body for `PUT /{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        regex(path = *RE_NAME, message = "Name contains invalid characters")
    )]
    pub name: Option<String>,

    #[validate(email(message = "Please provide a valid email"))]
    pub email: Option<String>,
}

/// Customer representation returned to clients. Never carries the hash.
#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            email: customer.email,
            role: customer.role,
            created_at: customer.created_at,
        }
    }
}

/// Response for `POST /register` and `POST /login`.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
}

/// Response for `GET /logout` and `DELETE /{id}`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Paginated customer list.
#[derive(Debug, Serialize)]
pub struct CustomerListResponse {
    pub pagination: super::pagination::PaginationMeta,
    pub items: Vec<CustomerResponse>,
}
