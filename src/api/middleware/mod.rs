//! Gateway middleware stages.
//!
//! Each stage is declared here and wired in order by
//! [`crate::routes::app_router`]; none of them writes an error response
//! directly — typed conditions flow to the error translator.

pub mod access_log;
pub mod auth;
pub mod cookies;
pub mod cors;
pub mod rate_limit;
pub mod security_headers;
