//! Customer account entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Default role assigned to self-registered customers.
pub const ROLE_USER: &str = "user";
/// Role allowed to manage other customers' accounts.
pub const ROLE_ADMIN: &str = "admin";

/// A customer account as stored in the database.
///
/// `password_hash` is an Argon2id PHC string; the raw password is never
/// persisted or logged.
#[derive(Debug, Clone, FromRow)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Fields required to insert a new customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Partial update applied to an existing customer.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<String>,
}
