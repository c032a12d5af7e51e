//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers; no service touches SQL or the network directly.

pub mod services;
