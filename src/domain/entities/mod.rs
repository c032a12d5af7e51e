//! Core domain entities representing the business data model.

pub mod customer;

pub use customer::{Customer, CustomerChanges, NewCustomer, ROLE_ADMIN, ROLE_USER};
