//! Customer account management and authentication.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::json;
use std::sync::Arc;

use crate::application::services::session::SessionSigner;
use crate::domain::entities::{Customer, CustomerChanges, NewCustomer, ROLE_USER};
use crate::domain::repositories::CustomerRepository;
use crate::error::AppError;

/// Input for creating a customer account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Service for customer accounts: registration, login, sessions, CRUD.
///
/// Passwords are hashed with Argon2id; login failures are reported with one
/// message whether the email or the password was wrong, so the endpoint does
/// not reveal which accounts exist.
pub struct CustomerService {
    repository: Arc<dyn CustomerRepository>,
    sessions: SessionSigner,
}

impl CustomerService {
    /// Creates a new customer service.
    pub fn new(repository: Arc<dyn CustomerRepository>, sessions: SessionSigner) -> Self {
        Self {
            repository,
            sessions,
        }
    }

    /// Hashes a password into an Argon2id PHC string.
    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                AppError::internal("Password hashing failed", json!({ "source": e.to_string() }))
            })
    }

    /// Checks a password against a stored hash. Unparseable hashes fail closed.
    pub fn verify_password(password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Registers a new customer with the default role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    pub async fn register(&self, registration: Registration) -> Result<Customer, AppError> {
        let email = normalize_email(&registration.email);

        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let password_hash = Self::hash_password(&registration.password)?;

        self.repository
            .create(NewCustomer {
                name: registration.name,
                email,
                password_hash,
                role: ROLE_USER.to_string(),
            })
            .await
    }

    /// Authenticates an email/password pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] with a uniform message when the
    /// email is unknown or the password does not match.
    pub async fn login(&self, email: &str, password: &str) -> Result<Customer, AppError> {
        let email = normalize_email(email);

        let customer = self
            .repository
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !Self::verify_password(password, &customer.password_hash) {
            return Err(invalid_credentials());
        }

        Ok(customer)
    }

    /// Issues a session token for a customer.
    pub fn issue_session(&self, customer: &Customer) -> String {
        self.sessions.issue(customer.id)
    }

    pub fn session_ttl(&self) -> std::time::Duration {
        self.sessions.ttl()
    }

    /// Resolves a session token to the customer it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is invalid, expired,
    /// or the account no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<Customer, AppError> {
        let customer_id = self.sessions.verify(token)?;

        self.repository
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Not authorized to access this route",
                    json!({ "reason": "account no longer exists" }),
                )
            })
    }

    /// Fetches a customer by id.
    pub async fn get(&self, id: i64) -> Result<Customer, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| customer_not_found(id))
    }

    /// Lists a page of customers plus the total count.
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Customer>, i64), AppError> {
        let customers = self.repository.list(offset, limit).await?;
        let total = self.repository.count().await?;
        Ok((customers, total))
    }

    /// Applies a partial update to a customer.
    pub async fn update(&self, id: i64, mut changes: CustomerChanges) -> Result<Customer, AppError> {
        if let Some(email) = changes.email.take() {
            changes.email = Some(normalize_email(&email));
        }

        self.repository
            .update(id, changes)
            .await?
            .ok_or_else(|| customer_not_found(id))
    }

    /// Deletes a customer account.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.repository.delete(id).await? {
            return Err(customer_not_found(id));
        }
        Ok(())
    }

    /// Total number of accounts; used by the health check and admin CLI.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid credentials", json!({}))
}

fn customer_not_found(id: i64) -> AppError {
    AppError::not_found("Customer not found", json!({ "id": id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockCustomerRepository;
    use chrono::Utc;
    use std::time::Duration;

    fn test_signer() -> SessionSigner {
        SessionSigner::new("test-signing-secret".to_string(), Duration::from_secs(3600))
    }

    fn sample_customer(id: i64, email: &str, password: &str) -> Customer {
        Customer {
            id,
            name: "Sample".to_string(),
            email: email.to_string(),
            password_hash: CustomerService::hash_password(password).unwrap(),
            role: ROLE_USER.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = CustomerService::hash_password("hunter2hunter2").unwrap();
        assert!(CustomerService::verify_password("hunter2hunter2", &hash));
        assert!(!CustomerService::verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_password_bad_hash_fails_closed() {
        assert!(!CustomerService::verify_password("anything", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_email()
            .withf(|email| email == "ada@example.com")
            .times(1)
            .returning(|_| Ok(None));

        mock_repo
            .expect_create()
            .withf(|new| new.email == "ada@example.com" && new.role == ROLE_USER)
            .times(1)
            .returning(|new| {
                let mut customer = sample_customer(1, &new.email, "irrelevant");
                customer.name = new.name;
                customer.password_hash = new.password_hash;
                Ok(customer)
            });

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let customer = service
            .register(Registration {
                name: "Ada".to_string(),
                email: "  Ada@Example.COM ".to_string(),
                password: "correct-horse".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(customer.email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(sample_customer(1, email, "pw"))));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let result = service
            .register(Registration {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "correct-horse".to_string(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(sample_customer(7, email, "correct-horse"))));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let customer = service.login("ada@example.com", "correct-horse").await.unwrap();
        assert_eq!(customer.id, 7);
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(sample_customer(7, email, "correct-horse"))));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let result = service.login("ada@example.com", "wrong").await;
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let result = service.login("ghost@example.com", "anything").await;
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_session() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_id()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|id| Ok(Some(sample_customer(id, "ada@example.com", "pw"))));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let customer = sample_customer(7, "ada@example.com", "pw");
        let token = service.issue_session(&customer);

        let resolved = service.authenticate(&token).await.unwrap();
        assert_eq!(resolved.id, 7);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_account() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(None));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let customer = sample_customer(7, "ada@example.com", "pw");
        let token = service.issue_session(&customer);

        let result = service.authenticate(&token).await;
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage_token() {
        let mock_repo = MockCustomerRepository::new();
        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let result = service.authenticate("garbage").await;
        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let mut mock_repo = MockCustomerRepository::new();

        mock_repo.expect_update().times(1).returning(|_, _| Ok(None));

        let service = CustomerService::new(Arc::new(mock_repo), test_signer());

        let result = service.update(99, CustomerChanges::default()).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }
}
