use std::sync::Arc;

use crate::application::services::CustomerService;
use crate::config::Config;
use crate::infrastructure::limiter::RateLimiter;

/// Shared application state injected into handlers and middleware.
///
/// Everything here is built once at startup; the limiters are the only
/// members with interior mutability.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub customer_service: Arc<CustomerService>,
    pub global_limiter: Arc<dyn RateLimiter>,
    pub login_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        customer_service: Arc<CustomerService>,
        global_limiter: Arc<dyn RateLimiter>,
        login_limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self {
            config,
            customer_service,
            global_limiter,
            login_limiter,
        }
    }
}
