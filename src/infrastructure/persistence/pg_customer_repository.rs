//! PostgreSQL implementation of the customer repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Customer, CustomerChanges, NewCustomer};
use crate::domain::repositories::CustomerRepository;
use crate::error::{AppError, map_sqlx_error};

const CUSTOMER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// PostgreSQL repository for customer accounts.
///
/// Email uniqueness is enforced by the `customers_email_key` index; violations
/// surface as [`AppError::Conflict`] via [`map_sqlx_error`].
pub struct PgCustomerRepository {
    pool: Arc<PgPool>,
}

impl PgCustomerRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn create(&self, customer: NewCustomer) -> Result<Customer, AppError> {
        let sql = format!(
            "INSERT INTO customers (name, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CUSTOMER_COLUMNS}"
        );

        sqlx::query_as::<_, Customer>(&sql)
            .bind(&customer.name)
            .bind(&customer.email)
            .bind(&customer.password_hash)
            .bind(&customer.role)
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1");

        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE email = $1");

        sqlx::query_as::<_, Customer>(&sql)
            .bind(email)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Customer>, AppError> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             ORDER BY created_at DESC, id DESC \
             OFFSET $1 LIMIT $2"
        );

        sqlx::query_as::<_, Customer>(&sql)
            .bind(offset)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn update(
        &self,
        id: i64,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        let sql = format!(
            "UPDATE customers \
             SET name = COALESCE($2, name), \
                 email = COALESCE($3, email), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {CUSTOMER_COLUMNS}"
        );

        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.email)
            .fetch_optional(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
