#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use blogify::application::services::{CustomerService, SessionSigner};
use blogify::config::Config;
use blogify::domain::entities::{Customer, CustomerChanges, NewCustomer, ROLE_USER};
use blogify::domain::repositories::CustomerRepository;
use blogify::error::AppError;
use blogify::infrastructure::limiter::{MemoryRateLimiter, RateLimitPolicy};
use blogify::routes::app_router;
use blogify::state::AppState;
use chrono::Utc;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_SIGNING_SECRET: &str = "test-signing-secret";

/// In-memory stand-in for the PostgreSQL repository, so the whole gateway
/// stack is exercisable without a database.
pub struct MemoryCustomerRepository {
    customers: Mutex<HashMap<i64, Customer>>,
    next_id: AtomicI64,
}

impl MemoryCustomerRepository {
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Inserts a customer directly, bypassing the HTTP API.
    pub fn seed(&self, name: &str, email: &str, password: &str, role: &str) -> Customer {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let customer = Customer {
            id,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: CustomerService::hash_password(password).unwrap(),
            role: role.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.customers
            .lock()
            .unwrap()
            .insert(id, customer.clone());
        customer
    }
}

#[async_trait]
impl CustomerRepository for MemoryCustomerRepository {
    async fn create(&self, new: NewCustomer) -> Result<Customer, AppError> {
        let mut customers = self.customers.lock().unwrap();

        if customers.values().any(|c| c.email == new.email) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "customers_email_key" }),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let customer = Customer {
            id,
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>, AppError> {
        Ok(self.customers.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, AppError> {
        Ok(self
            .customers
            .lock()
            .unwrap()
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Customer>, AppError> {
        let mut all: Vec<Customer> = self.customers.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(all
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.customers.lock().unwrap().len() as i64)
    }

    async fn update(
        &self,
        id: i64,
        changes: CustomerChanges,
    ) -> Result<Option<Customer>, AppError> {
        let mut customers = self.customers.lock().unwrap();

        if let Some(ref email) = changes.email
            && customers.values().any(|c| c.id != id && &c.email == email)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "customers_email_key" }),
            ));
        }

        let Some(customer) = customers.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            customer.name = name;
        }
        if let Some(email) = changes.email {
            customer.email = email;
        }
        customer.updated_at = Utc::now();

        Ok(Some(customer.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.customers.lock().unwrap().remove(&id).is_some())
    }
}

/// Configuration used by gateway tests.
///
/// `behind_proxy` is on so tests can vary the client key per request with an
/// `X-Forwarded-For` header; limits are high enough not to interfere unless a
/// test lowers them.
pub fn test_config() -> Config {
    Config {
        port: 0,
        cors_origins: vec![],
        database_url: "postgres://unused".to_string(),
        redis_url: None,
        behind_proxy: true,
        static_dir: "tests/fixtures/assets".to_string(),
        body_limit_bytes: 1024 * 1024,
        rate_limit_window_secs: 900,
        rate_limit_max: 10_000,
        login_rate_limit_max: 5,
        session_signing_secret: TEST_SIGNING_SECRET.to_string(),
        session_ttl_secs: 3600,
        log_level: "info".to_string(),
        log_format: "text".to_string(),
        db_max_connections: 5,
        db_connect_timeout: 5,
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub repo: Arc<MemoryCustomerRepository>,
}

/// Builds the full gateway router on in-memory collaborators.
pub fn spawn_app(config: Config) -> TestApp {
    let repo = Arc::new(MemoryCustomerRepository::new());

    let sessions = SessionSigner::new(
        config.session_signing_secret.clone(),
        Duration::from_secs(config.session_ttl_secs),
    );
    let customer_service = Arc::new(CustomerService::new(repo.clone(), sessions));

    let window = Duration::from_secs(config.rate_limit_window_secs);
    let global_limiter = Arc::new(MemoryRateLimiter::new(RateLimitPolicy::new(
        config.rate_limit_max,
        window,
    )));
    let login_limiter = Arc::new(MemoryRateLimiter::new(
        RateLimitPolicy::new(config.login_rate_limit_max, window).skip_successful(),
    ));

    let state = AppState::new(
        Arc::new(config),
        customer_service,
        global_limiter,
        login_limiter,
    );

    let server = TestServer::new(app_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        repo,
    }
}

pub fn spawn_default_app() -> TestApp {
    spawn_app(test_config())
}

/// Registers a customer through the API and returns the session token.
pub async fn register_customer(app: &TestApp, name: &str, email: &str, password: &str) -> String {
    let response = app
        .server
        .post("/api/v1/customers/register")
        .json(&json!({ "name": name, "email": email, "password": password }))
        .await;

    assert_eq!(response.status_code(), 201, "register failed: {}", response.text());
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

/// Seeds a customer directly and logs in through the API.
pub async fn seed_and_login(app: &TestApp, email: &str, password: &str, role: &str) -> String {
    app.repo.seed("Seeded", email, password, role);

    let response = app
        .server
        .post("/api/v1/customers/login")
        .json(&json!({ "email": email, "password": password }))
        .await;

    assert_eq!(response.status_code(), 200, "login failed: {}", response.text());
    response.json::<Value>()["token"].as_str().unwrap().to_string()
}

/// Seeds a plain user account without going through the API.
pub fn seed_user(app: &TestApp, email: &str, password: &str) -> Customer {
    app.repo.seed("Seeded User", email, password, ROLE_USER)
}
