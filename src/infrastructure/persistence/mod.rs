//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.

pub mod pg_customer_repository;

pub use pg_customer_repository::PgCustomerRepository;
