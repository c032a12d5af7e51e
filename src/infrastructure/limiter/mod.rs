//! Fixed-window admission control.
//!
//! Two limiter instances guard the gateway: a global one covering every route
//! and a stricter one covering only the login endpoints. Both speak the
//! [`RateLimiter`] interface so the counter store can be swapped without
//! touching gateway logic.
//!
//! # Implementations
//!
//! - [`MemoryRateLimiter`] - per-process counters behind a mutex
//! - [`RedisRateLimiter`] - counters shared across processes, fail-open

pub mod memory;
pub mod redis_limiter;
pub mod service;

pub use memory::MemoryRateLimiter;
pub use redis_limiter::RedisRateLimiter;
pub use service::{Decision, RateLimitPolicy, RateLimiter};

#[cfg(test)]
pub use service::MockRateLimiter;
