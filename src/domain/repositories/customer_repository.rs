//! Repository trait for customer accounts.

use crate::domain::entities::{Customer, CustomerChanges, NewCustomer};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for customer storage.
///
/// Email uniqueness is enforced by the store; `create` and `update` surface
/// violations as [`AppError::Conflict`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgCustomerRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Inserts a new customer and returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, customer: NewCustomer) -> Result<Customer, AppError>;

    /// Finds a customer by database ID.
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError>;

    /// Finds a customer by email (exact match, emails are stored lowercase).
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError>;

    /// Lists customers ordered by creation time, newest first.
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Customer>, AppError>;

    /// Total number of customers.
    async fn count(&self) -> Result<i64, AppError>;

    /// Applies a partial update; `None` if the customer does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a new email collides with another
    /// account. Returns [`AppError::Internal`] on database errors.
    async fn update(&self, id: i64, changes: CustomerChanges)
    -> Result<Option<Customer>, AppError>;

    /// Deletes a customer; `true` if a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}
