//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod customers;
pub mod health;

pub use customers::{
    delete_customer_handler, get_customer_handler, list_customers_handler, login_handler,
    logout_handler, me_handler, register_handler, update_customer_handler,
};
pub use health::health_handler;
