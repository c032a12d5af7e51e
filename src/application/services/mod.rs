//! Business logic services for the application layer.

pub mod customer_service;
pub mod session;

pub use customer_service::CustomerService;
pub use session::SessionSigner;
